//! Fetch and build in one process.
//!
//! Fetched documents are handed to the corpus builder as they arrive,
//! without going through the file store.
use std::path::PathBuf;

use log::{error, info};

use crate::config::CorpusConfig;
use crate::error::Error;
use crate::io::{JsonlWriter, SentenceSink};
use crate::pipelines::pipeline::Pipeline;
use crate::sources::fetch::{Crawler, Extract, Fetch, FetchStats};
use crate::sources::urls::read_urls;

use super::{CorpusBuilder, CorpusStats};

pub struct CrawlCorpus<F, E> {
    urls: PathBuf,
    dst: PathBuf,
    config: CorpusConfig,
    crawler: Crawler<F, E>,
    stats_dst: Option<PathBuf>,
    append: bool,
}

impl<F: Fetch, E: Extract> CrawlCorpus<F, E> {
    pub fn new(urls: PathBuf, dst: PathBuf, config: CorpusConfig, crawler: Crawler<F, E>) -> Self {
        Self {
            urls,
            dst,
            config,
            crawler,
            stats_dst: None,
            append: false,
        }
    }

    pub fn with_stats(mut self, stats_dst: Option<PathBuf>) -> Self {
        self.stats_dst = stats_dst;
        self
    }

    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }
}

impl<F: Fetch, E: Extract> Pipeline<(FetchStats, CorpusStats)> for CrawlCorpus<F, E> {
    fn run(&self) -> Result<(FetchStats, CorpusStats), Error> {
        let urls = read_urls(&self.urls)?;
        let mut builder = CorpusBuilder::new(&self.config)?;
        let mut sink = if self.append {
            JsonlWriter::append(&self.dst)?
        } else {
            JsonlWriter::create(&self.dst)?
        };

        let res = self
            .crawler
            .run(&urls, |doc| {
                builder.process_document(&doc, &mut sink).map(|_| ())
            })
            .and_then(|fetch_stats| sink.flush().map(|_| fetch_stats));

        let stats = builder.into_stats();
        info!("{}", stats);
        let reported = match &self.stats_dst {
            Some(stats_dst) => stats.write_json(stats_dst),
            None => Ok(()),
        };

        match res {
            Ok(fetch_stats) => reported.map(|_| (fetch_stats, stats)),
            Err(e) => {
                error!("crawl aborted: {}\n{}", e, stats);
                if let Err(report_err) = reported {
                    error!("could not write run counters: {}", report_err);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::io::CorpusReader;
    use crate::pipelines::corpus::Counter;
    use crate::sources::fetch::{Page, PlainText};

    /// Serves the same georgian text for every url.
    struct Echo(String);

    impl Fetch for Echo {
        fn fetch(&self, url: &str) -> Result<Page, Error> {
            Ok(Page {
                url: url.to_string(),
                content_type: Some("text/plain".to_string()),
                body: self.0.clone(),
            })
        }
    }

    fn text() -> String {
        (0..5)
            .map(|i| format!("{} წინადადება ნომერი {}.", vec!["სახლი"; 10].join(" "), i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn duplicates_across_urls() {
        let dst = tempdir().unwrap();
        let urls = dst.path().join("urls.txt");
        fs::write(&urls, "https://a.ge\nhttps://b.ge\nhttps://c.ge\n").unwrap();
        let out = dst.path().join("corpus.jsonl");

        let crawler = Crawler::new(Echo(text()), PlainText, 2);
        let p = CrawlCorpus::new(urls, out.clone(), CorpusConfig::default(), crawler);
        let (fetch_stats, stats) = p.run().unwrap();

        assert_eq!(fetch_stats.saved, 3);
        assert_eq!(stats.get(Counter::Accepted), 1);
        assert_eq!(stats.get(Counter::Duplicates), 2);
        assert_eq!(CorpusReader::from_path(&out).unwrap().count(), 5);
    }

    /// writes to /dev/full fail on flush.
    #[cfg(target_os = "linux")]
    #[test]
    fn sink_error_not_masked_by_stats_error() {
        let dst = tempdir().unwrap();
        let urls = dst.path().join("urls.txt");
        fs::write(&urls, "https://a.ge\n").unwrap();

        let crawler = Crawler::new(Echo(text()), PlainText, 1);
        let p = CrawlCorpus::new(
            urls,
            PathBuf::from("/dev/full"),
            CorpusConfig::default(),
            crawler,
        )
        .with_stats(Some(dst.path().join("nope").join("stats.json")));
        assert!(matches!(p.run(), Err(Error::Sink(_))));
    }
}
