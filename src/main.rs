//! # Kartuli
//!
//! Georgian corpus generation tool.
//!
//! ```sh
//! kartuli 0.1.0
//! Georgian corpus generation tool.
//!
//! USAGE:
//!     kartuli <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     build       Build a corpus from a directory of text documents
//!     charfreq    Character frequencies of a generated corpus
//!     crawl       Fetch pages and build a corpus in one go
//!     download    Download index files listed in a cc-index-table.paths.gz listing
//!     fetch       Fetch pages and save extracted texts
//!     help        Prints this message or the help of the given subcommand(s)
//!     select      Select candidate URLs from index tables
//! ```
use std::path::PathBuf;

use log::{debug, info};
use structopt::StructOpt;
use url::Url;

use kartuli::cli::{self, Kartuli};
use kartuli::config::ScriptRange;
use kartuli::error::Error;
use kartuli::pipelines::{BuildCorpus, CrawlCorpus, Pipeline};
use kartuli::processing::CharFrequencies;
use kartuli::sources::fetch::{Crawler, DirSaver, HttpFetcher, WebText};
use kartuli::sources::index::{read_listing, IndexDownloader};
use kartuli::sources::urls::{read_urls, write_urls, UrlSelector};

const LISTING_FILE: &str = "cc-index-table.paths.gz";

fn download(d: cli::Download) -> Result<(), Error> {
    let dl = IndexDownloader::new(&d.base_url, d.dst.clone(), d.threads)?;

    let listing = match Url::parse(&d.index) {
        Ok(url) if url.scheme().starts_with("http") => {
            std::fs::create_dir_all(&d.dst)?;
            let local = d.dst.join(LISTING_FILE);
            dl.fetch_listing(&url, &local)?;
            local
        }
        _ => PathBuf::from(&d.index),
    };

    let paths = read_listing(&listing, d.start, d.limit)?;
    if paths.is_empty() {
        info!("no index paths found with subset=warc");
        return Ok(());
    }
    let stats = dl.download_all(&paths)?;
    println!(
        "Download complete. Total: {} files ({} already there, {} failed).",
        stats.downloaded + stats.skipped,
        stats.skipped,
        stats.failed
    );
    Ok(())
}

fn select(s: cli::Select) -> Result<(), Error> {
    let selector = if s.codes.is_empty() {
        UrlSelector::default()
    } else {
        UrlSelector::new(s.codes)
    };
    let urls = selector.select_dir(&s.src)?;
    write_urls(&urls, &s.dst)?;
    println!("Total unique URLs collected: {}", urls.len());
    Ok(())
}

fn fetch(f: cli::Fetch) -> Result<(), Error> {
    let urls = read_urls(&f.urls)?;
    let crawler = Crawler::new(HttpFetcher::new()?, WebText, f.threads)
        .with_language(ScriptRange::default(), f.threshold)
        .with_min_len(f.min_len);
    let mut saver = DirSaver::new(f.dst, f.start_index)?;
    let stats = crawler.run(&urls, |doc| saver.save(doc))?;
    println!("{}", stats);
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = Kartuli::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        Kartuli::Download(d) => download(d)?,
        Kartuli::Select(s) => select(s)?,
        Kartuli::Fetch(f) => fetch(f)?,
        Kartuli::Build(b) => {
            let config = b.config.load()?;
            let p = BuildCorpus::new(b.src, b.dst, config)
                .with_limit(b.limit)
                .with_stats(b.stats)
                .append(b.append);
            let stats = p.run()?;
            println!("{}", stats);
        }
        Kartuli::Crawl(c) => {
            let config = c.config.load()?;
            let crawler = Crawler::new(HttpFetcher::new()?, WebText, c.threads)
                .with_language(config.script, config.doc_lang_threshold);
            let p = CrawlCorpus::new(c.urls, c.dst, config, crawler)
                .with_stats(c.stats)
                .append(c.append);
            let (fetch_stats, stats) = p.run()?;
            println!("{}\n{}", fetch_stats, stats);
        }
        Kartuli::Charfreq(c) => {
            let freqs = CharFrequencies::from_path(&c.src, ScriptRange::default())?;
            println!("{}", freqs);
        }
    };
    Ok(())
}
