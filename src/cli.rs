//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use crate::config::CorpusConfig;
use crate::error::Error;

#[derive(Debug, StructOpt)]
#[structopt(name = "kartuli", about = "Georgian corpus generation tool.")]
/// Holds every command that is callable by the `kartuli` command.
pub enum Kartuli {
    #[structopt(about = "Download index files listed in a cc-index-table.paths.gz listing")]
    Download(Download),
    #[structopt(about = "Select candidate URLs from index tables")]
    Select(Select),
    #[structopt(about = "Fetch pages and save extracted texts")]
    Fetch(Fetch),
    #[structopt(about = "Build a corpus from a directory of text documents")]
    Build(Build),
    #[structopt(about = "Fetch pages and build a corpus in one go")]
    Crawl(Crawl),
    #[structopt(about = "Character frequencies of a generated corpus")]
    Charfreq(Charfreq),
}

#[derive(Debug, StructOpt)]
/// Download command and parameters.
/// ```sh
/// kartuli-download 0.1.0
/// Download index files listed in a cc-index-table.paths.gz listing
///
/// USAGE:
///     kartuli download [OPTIONS] <index> <dst>
///
/// OPTIONS:
///         --base-url <base-url>    base url of index files [default: https://data.commoncrawl.org]
///     -l, --limit <limit>          number of files to download
///     -s, --start <start>          number of paths to skip [default: 0]
///     -t, --threads <threads>      number of download threads [default: 6]
///
/// ARGS:
///     <index>    url or local path of the cc-index-table.paths.gz listing
///     <dst>      download destination
/// ```
pub struct Download {
    #[structopt(help = "url or local path of the cc-index-table.paths.gz listing")]
    pub index: String,
    #[structopt(parse(from_os_str), help = "download destination")]
    pub dst: PathBuf,
    #[structopt(short, long, default_value = "0", help = "number of paths to skip")]
    pub start: usize,
    #[structopt(short, long, help = "number of files to download")]
    pub limit: Option<usize>,
    #[structopt(short, long, default_value = "6", help = "number of download threads")]
    pub threads: usize,
    #[structopt(
        long,
        default_value = "https://data.commoncrawl.org",
        help = "base url of index files"
    )]
    pub base_url: String,
}

#[derive(Debug, StructOpt)]
pub struct Select {
    #[structopt(parse(from_os_str), help = "directory containing parquet or csv index tables")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "url list destination")]
    pub dst: PathBuf,
    #[structopt(
        long,
        use_delimiter = true,
        help = "comma-separated language codes (default: Georgian codes)"
    )]
    pub codes: Vec<String>,
}

#[derive(Debug, StructOpt)]
pub struct Fetch {
    #[structopt(parse(from_os_str), help = "url list (one per line)")]
    pub urls: PathBuf,
    #[structopt(parse(from_os_str), help = "destination directory of text files")]
    pub dst: PathBuf,
    #[structopt(short, long, default_value = "10", help = "number of fetching threads")]
    pub threads: usize,
    #[structopt(long, default_value = "1", help = "index of the first saved file")]
    pub start_index: usize,
    #[structopt(long, default_value = "100", help = "minimum length of extracted texts")]
    pub min_len: usize,
    #[structopt(long, default_value = "0.3", help = "minimum script ratio of extracted texts")]
    pub threshold: f64,
}

#[derive(Debug, StructOpt)]
/// Corpus configuration: an optional JSON file, and overrides for the common knobs.
pub struct ConfigArgs {
    #[structopt(long, parse(from_os_str), help = "JSON configuration file")]
    pub config: Option<PathBuf>,
    #[structopt(long, help = "near-duplicate similarity threshold")]
    pub dedup_threshold: Option<f64>,
    #[structopt(long, help = "number of minhash permutations")]
    pub num_perm: Option<usize>,
    #[structopt(long, help = "minimum number of sentences of a kept document")]
    pub min_sentences: Option<usize>,
    #[structopt(long, help = "script ratio threshold of documents")]
    pub doc_lang_threshold: Option<f64>,
    #[structopt(long, help = "script ratio threshold of sentences")]
    pub sentence_lang_threshold: Option<f64>,
}

impl ConfigArgs {
    /// Load the configuration file (or defaults) and apply overrides.
    pub fn load(&self) -> Result<CorpusConfig, Error> {
        let mut config = match &self.config {
            Some(path) => CorpusConfig::from_path(path)?,
            None => CorpusConfig::default(),
        };
        if let Some(v) = self.dedup_threshold {
            config.dedup_threshold = v;
        }
        if let Some(v) = self.num_perm {
            config.num_perm = v;
        }
        if let Some(v) = self.min_sentences {
            config.min_sentences = v;
        }
        if let Some(v) = self.doc_lang_threshold {
            config.doc_lang_threshold = v;
        }
        if let Some(v) = self.sentence_lang_threshold {
            config.sentence_lang_threshold = v;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, StructOpt)]
/// Build command and parameters.
///
/// ```sh
/// kartuli-build 0.1.0
/// Build a corpus from a directory of text documents
///
/// USAGE:
///     kartuli build [FLAGS] [OPTIONS] <src> <dst>
///
/// ARGS:
///     <src>    source directory (contains *.txt)
///     <dst>    corpus destination (jsonl)
/// ```
pub struct Build {
    #[structopt(parse(from_os_str), help = "source directory (contains *.txt)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "corpus destination (jsonl)")]
    pub dst: PathBuf,
    #[structopt(flatten)]
    pub config: ConfigArgs,
    #[structopt(long, parse(from_os_str), help = "write run counters as JSON")]
    pub stats: Option<PathBuf>,
    #[structopt(short, long, help = "only process the first <limit> documents")]
    pub limit: Option<usize>,
    #[structopt(short, long, help = "append to the destination instead of truncating it")]
    pub append: bool,
}

#[derive(Debug, StructOpt)]
pub struct Crawl {
    #[structopt(parse(from_os_str), help = "url list (one per line)")]
    pub urls: PathBuf,
    #[structopt(parse(from_os_str), help = "corpus destination (jsonl)")]
    pub dst: PathBuf,
    #[structopt(flatten)]
    pub config: ConfigArgs,
    #[structopt(short, long, default_value = "10", help = "number of fetching threads")]
    pub threads: usize,
    #[structopt(long, parse(from_os_str), help = "write run counters as JSON")]
    pub stats: Option<PathBuf>,
    #[structopt(short, long, help = "append to the destination instead of truncating it")]
    pub append: bool,
}

#[derive(Debug, StructOpt)]
pub struct Charfreq {
    #[structopt(parse(from_os_str), help = "corpus location (jsonl)")]
    pub src: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_args() {
        let opt = Kartuli::from_iter(&[
            "kartuli",
            "build",
            "texts",
            "corpus.jsonl",
            "--dedup-threshold",
            "0.8",
            "--limit",
            "10",
        ]);
        match opt {
            Kartuli::Build(b) => {
                assert_eq!(b.limit, Some(10));
                assert!(!b.append);
                let config = b.config.load().unwrap();
                assert_eq!(config.dedup_threshold, 0.8);
                assert_eq!(config.num_perm, 128);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn select_codes() {
        let opt = Kartuli::from_iter(&["kartuli", "select", "tables", "urls.txt", "--codes", "ka,kat"]);
        match opt {
            Kartuli::Select(s) => assert_eq!(s.codes, vec!["ka", "kat"]),
            _ => panic!("expected select"),
        }
    }

    #[test]
    fn invalid_override() {
        let args = ConfigArgs {
            config: None,
            dedup_threshold: Some(1.5),
            num_perm: None,
            min_sentences: None,
            doc_lang_threshold: None,
            sentence_lang_threshold: None,
        };
        assert!(args.load().is_err());
    }
}
