/*! Parallel page fetching.

URLs are fetched on a dedicated thread pool. Each page goes through text extraction,
a minimum length check and the script ratio check, and the outcome is sent through a bounded
channel to the calling thread, which is the only one consuming documents.

```text
urls -> [fetch -> extract -> checks] x nb_workers -> channel -> consumer
```

Extraction is pluggable through the [Extract] trait. [WebText] is the default one: it keeps
`text/plain` bodies as is ([PlainText]) and renders HTML pages to text with `html2text` ([Html]).
Pages with no extractable text are counted apart from the ones whose text is too short.
!*/
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::mpsc::sync_channel;
use std::time::Duration;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::ScriptRange;
use crate::document::Document;
use crate::error::Error;
use crate::filtering::{Filter, LanguageRatio};

const TIMEOUT: Duration = Duration::from_secs(30);
/// Line width used when rendering HTML. Wide enough to keep paragraphs on one line.
const HTML_WIDTH: usize = 10_000;

/// A fetched page.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Page retrieval.
pub trait Fetch: Sync {
    fn fetch(&self, url: &str) -> Result<Page, Error>;
}

/// Main text extraction from a page.
pub trait Extract: Sync {
    /// Returns [None] when there is no usable text.
    fn extract(&self, page: &Page) -> Option<String>;
}

/// Blocking http fetcher.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Page, Error> {
        let url = url::Url::parse(url)?;
        let response = self.client.get(url.clone()).send()?.error_for_status()?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text()?;
        Ok(Page {
            url: url.into(),
            content_type,
            body,
        })
    }
}

/// Media type of a `Content-Type` header value, lowercased and without parameters.
fn media_type(page: &Page) -> Option<String> {
    page.content_type
        .as_deref()
        .and_then(|ct| ct.split(';').next())
        .map(|mt| mt.trim().to_ascii_lowercase())
}

/// Keeps `text/plain` bodies as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl Extract for PlainText {
    fn extract(&self, page: &Page) -> Option<String> {
        match media_type(page).as_deref() {
            Some("text/plain") => Some(page.body.clone()),
            _ => None,
        }
    }
}

/// Renders HTML bodies to plain text with `html2text`.
///
/// The content type is not checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html;

impl Extract for Html {
    fn extract(&self, page: &Page) -> Option<String> {
        match html2text::from_read(Cursor::new(page.body.as_bytes()), HTML_WIDTH) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                debug!("{}: could not render html: {}", page.url, e);
                None
            }
        }
    }
}

/// Default extractor, dispatching on the page content type.
///
/// Pages without a content type are treated as HTML when the body starts with `<`,
/// as plain text otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebText;

impl Extract for WebText {
    fn extract(&self, page: &Page) -> Option<String> {
        match media_type(page).as_deref() {
            Some("text/plain") => PlainText.extract(page),
            Some("text/html") | Some("application/xhtml+xml") => Html.extract(page),
            Some(_) => None,
            None if page.body.trim_start().starts_with('<') => Html.extract(page),
            None => Some(page.body.clone()),
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    DownloadFail,
    NoText,
    Short,
    NonGeorgian,
    Fetched(Document),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchStats {
    pub total: usize,
    pub download_fail: usize,
    pub no_text: usize,
    pub short: usize,
    pub non_geo: usize,
    pub saved: usize,
}

impl fmt::Display for FetchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Total URLs processed: {}", self.total)?;
        writeln!(f, "  Skipped (download fail): {}", self.download_fail)?;
        writeln!(f, "  Skipped (no extractable text): {}", self.no_text)?;
        writeln!(f, "  Skipped (empty/short): {}", self.short)?;
        writeln!(f, "  Skipped (not Georgian enough): {}", self.non_geo)?;
        writeln!(f, "  Saved Georgian texts: {}", self.saved)
    }
}

pub struct Crawler<F, E> {
    fetcher: F,
    extractor: E,
    language: LanguageRatio,
    min_len: usize,
    nb_workers: usize,
}

impl<F: Fetch, E: Extract> Crawler<F, E> {
    pub fn new(fetcher: F, extractor: E, nb_workers: usize) -> Self {
        Self {
            fetcher,
            extractor,
            language: LanguageRatio::default(),
            min_len: 100,
            nb_workers: nb_workers.max(1),
        }
    }

    /// Target script and ratio threshold of extracted texts.
    pub fn with_language(mut self, script: ScriptRange, threshold: f64) -> Self {
        self.language = LanguageRatio::new(script, threshold);
        self
    }

    /// Minimum length (in chars, leading and trailing whitespace excluded) of extracted texts.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    fn process_url(&self, url: &str) -> FetchOutcome {
        let page = match self.fetcher.fetch(url) {
            Ok(page) => page,
            Err(e) => {
                debug!("skipped {}: download failed: {}", url, e);
                return FetchOutcome::DownloadFail;
            }
        };

        let text = match self.extractor.extract(&page) {
            Some(text) if text.trim().chars().count() >= self.min_len => text,
            Some(_) => {
                debug!("skipped {}: empty or too short", url);
                return FetchOutcome::Short;
            }
            None => {
                debug!(
                    "skipped {}: no text extracted from {:?}",
                    url, page.content_type
                );
                return FetchOutcome::NoText;
            }
        };

        if !self.language.detect(&text) {
            debug!("skipped {}: not enough characters in script", url);
            return FetchOutcome::NonGeorgian;
        }

        FetchOutcome::Fetched(Document::new(url.to_string(), text))
    }

    /// Fetch `urls` in parallel, handing each kept document to `consume` in arrival order.
    ///
    /// An error from `consume` stops the crawl and is returned.
    pub fn run<C>(&self, urls: &[String], mut consume: C) -> Result<FetchStats, Error>
    where
        C: FnMut(Document) -> Result<(), Error>,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.nb_workers)
            .build()
            .map_err(|e| Error::Custom(e.to_string()))?;
        let (tx, rx) = sync_channel(self.nb_workers * 2);

        info!(
            "fetching {} urls with {} workers",
            urls.len(),
            self.nb_workers
        );

        let mut stats = FetchStats::default();
        let mut res = Ok(());
        std::thread::scope(|s| {
            s.spawn(move || {
                pool.install(|| {
                    urls.par_iter()
                        .try_for_each_with(tx, |tx, url| tx.send(self.process_url(url)))
                })
            });

            for outcome in rx.iter() {
                stats.total += 1;
                match outcome {
                    FetchOutcome::DownloadFail => stats.download_fail += 1,
                    FetchOutcome::NoText => stats.no_text += 1,
                    FetchOutcome::Short => stats.short += 1,
                    FetchOutcome::NonGeorgian => stats.non_geo += 1,
                    FetchOutcome::Fetched(doc) => {
                        if let Err(e) = consume(doc) {
                            warn!("stopping crawl: {}", e);
                            res = Err(e);
                            break;
                        }
                        stats.saved += 1;
                    }
                }
            }
            // unblocks workers waiting on a full channel.
            drop(rx);
        });

        info!("{}", stats);
        res.map(|_| stats)
    }
}

/// Saves documents as `text_NNNNN.txt` files, numbered in arrival order.
pub struct DirSaver {
    dst: PathBuf,
    next_index: usize,
}

impl DirSaver {
    pub fn new(dst: PathBuf, start_index: usize) -> Result<Self, Error> {
        fs::create_dir_all(&dst)?;
        Ok(Self {
            dst,
            next_index: start_index,
        })
    }

    pub fn save(&mut self, doc: Document) -> Result<(), Error> {
        let file_name = format!("text_{:05}.txt", self.next_index);
        fs::write(self.dst.join(&file_name), doc.content())?;
        debug!("saved {} as {}", doc.source(), file_name);
        self.next_index += 1;
        Ok(())
    }
}
