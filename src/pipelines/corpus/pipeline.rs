//! Directory to JSON lines corpus pipeline.
use std::path::PathBuf;

use log::{error, info};

use crate::config::CorpusConfig;
use crate::error::Error;
use crate::io::{DirReader, JsonlWriter};
use crate::pipelines::pipeline::Pipeline;

use super::{CorpusBuilder, CorpusStats};

/// Builds a corpus from a directory of `*.txt` documents.
pub struct BuildCorpus {
    src: PathBuf,
    dst: PathBuf,
    config: CorpusConfig,
    limit: Option<usize>,
    stats_dst: Option<PathBuf>,
    append: bool,
}

impl BuildCorpus {
    pub fn new(src: PathBuf, dst: PathBuf, config: CorpusConfig) -> Self {
        Self {
            src,
            dst,
            config,
            limit: None,
            stats_dst: None,
            append: false,
        }
    }

    /// Only process the first `limit` documents.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Also write the run counters as JSON at `stats_dst`.
    pub fn with_stats(mut self, stats_dst: Option<PathBuf>) -> Self {
        self.stats_dst = stats_dst;
        self
    }

    /// Append to `dst` instead of truncating it.
    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Log the summary and write it to the stats file, if any.
    fn report(&self, stats: &CorpusStats) -> Result<(), Error> {
        info!("{}", stats);
        if let Some(stats_dst) = &self.stats_dst {
            stats.write_json(stats_dst)?;
        }
        Ok(())
    }
}

impl Pipeline<CorpusStats> for BuildCorpus {
    fn run(&self) -> Result<CorpusStats, Error> {
        let mut builder = CorpusBuilder::new(&self.config)?;
        let reader = DirReader::new(&self.src)?;
        info!(
            "building corpus from {} documents in {:?}",
            reader.remaining(),
            self.src
        );

        let mut sink = if self.append {
            JsonlWriter::append(&self.dst)?
        } else {
            JsonlWriter::create(&self.dst)?
        };

        let docs = reader.take(self.limit.unwrap_or(usize::MAX));
        let res = builder.run(docs, &mut sink);
        let stats = builder.into_stats();

        // partial counters are reported even when the run is aborted.
        match res {
            Ok(()) => {
                self.report(&stats)?;
                Ok(stats)
            }
            Err(e) => {
                error!("corpus build aborted: {}\n{}", e, stats);
                if let Err(report_err) = self.report(&stats) {
                    error!("could not write run counters: {}", report_err);
                }
                Err(e)
            }
        }
    }
}
