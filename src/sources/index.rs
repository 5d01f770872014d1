/*! Index files download.

The index listing is a gzipped text file with one relative path per line.
Only paths of the `subset=warc` partition are kept.
Each path is downloaded from a base URL into a destination directory, keeping its file name.
Files already present are not downloaded again.
!*/
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::MultiGzDecoder;
use log::{debug, error, info, warn};
use rayon::prelude::*;
use url::Url;

use crate::error::Error;

pub const BASE_URL: &str = "https://data.commoncrawl.org";
const PARTITION: &str = "subset=warc";
const TIMEOUT: Duration = Duration::from_secs(60);

/// Extract the paths of the listing that belong to the warc partition,
/// skipping the first `start` ones and keeping at most `limit` of them.
pub fn warc_paths<R: BufRead>(
    listing: R,
    start: usize,
    limit: Option<usize>,
) -> Result<Vec<String>, Error> {
    let mut paths = Vec::new();
    for line in listing.lines() {
        let line = line?;
        if line.contains(PARTITION) {
            paths.push(line.trim().to_string());
        }
    }

    Ok(paths
        .into_iter()
        .skip(start)
        .take(limit.unwrap_or(usize::MAX))
        .collect())
}

/// Read a listing from disk, gzipped or not. See [warc_paths].
pub fn read_listing(src: &Path, start: usize, limit: Option<usize>) -> Result<Vec<String>, Error> {
    let paths = warc_paths(BufReader::new(open_listing(src)?), start, limit)?;
    info!("found {} index paths to download (from {})", paths.len(), start);
    Ok(paths)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Downloaded,
    Skipped,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStats {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DownloadStats {
    fn record(mut self, res: &Result<DownloadStatus, Error>) -> Self {
        match res {
            Ok(DownloadStatus::Downloaded) => self.downloaded += 1,
            Ok(DownloadStatus::Skipped) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            downloaded: self.downloaded + other.downloaded,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

/// Holds the base URL and the http client that will make the requests.
pub struct IndexDownloader {
    base: String,
    dst: PathBuf,
    client: reqwest::blocking::Client,
    nb_workers: usize,
}

impl IndexDownloader {
    pub fn new(base: &str, dst: PathBuf, nb_workers: usize) -> Result<Self, Error> {
        // fail early on an invalid base.
        Url::parse(base)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            dst,
            client,
            nb_workers: nb_workers.max(1),
        })
    }

    /// Download the listing itself to `local`.
    pub fn fetch_listing(&self, listing: &Url, local: &Path) -> Result<(), Error> {
        info!("downloading index listing from {}", listing);
        self.save(listing.clone(), local)
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!(
            "{}/{}",
            self.base,
            path.trim_start_matches('/')
        ))?)
    }

    /// Local destination of `path`.
    pub fn destination(&self, path: &str) -> Result<PathBuf, Error> {
        let file_name = Path::new(path)
            .file_name()
            .ok_or_else(|| Error::Custom(format!("no file name in index path {}", path)))?;
        Ok(self.dst.join(file_name))
    }

    /// Download a single file, skipping it if it is already there.
    pub fn download_one(&self, path: &str) -> Result<DownloadStatus, Error> {
        let dst = self.destination(path)?;
        if dst.exists() {
            debug!("[SKIP] already exists: {:?}", dst);
            return Ok(DownloadStatus::Skipped);
        }

        let url = self.url(path)?;
        debug!("downloading {}", url);
        self.save(url, &dst)?;
        info!("[OK] downloaded {:?}", dst);
        Ok(DownloadStatus::Downloaded)
    }

    /// Fire a blocking request and stream its body to `dst`.
    ///
    /// The body goes to a `.part` file first, renamed once complete,
    /// so that an interrupted download is not taken as an existing file later.
    fn save(&self, url: Url, dst: &Path) -> Result<(), Error> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let part = dst.with_extension("part");
        let mut out = File::create(&part)?;
        let mut body = BufReader::new(response);
        if let Err(e) = std::io::copy(&mut body, &mut out) {
            if let Err(e) = fs::remove_file(&part) {
                warn!("could not remove {:?}: {}", part, e);
            }
            return Err(e.into());
        }
        fs::rename(&part, dst)?;
        Ok(())
    }

    /// Download every path with a pool of `nb_workers` threads.
    ///
    /// Failures are logged and counted, never retried.
    pub fn download_all(&self, paths: &[String]) -> Result<DownloadStats, Error> {
        fs::create_dir_all(&self.dst)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.nb_workers)
            .build()
            .map_err(|e| Error::Custom(e.to_string()))?;

        info!("starting download with {} workers", self.nb_workers);
        let stats = pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    let res = self.download_one(path);
                    if let Err(e) = &res {
                        error!("[ERR] failed to download {}: {}", path, e);
                    }
                    DownloadStats::default().record(&res)
                })
                .reduce(DownloadStats::default, DownloadStats::merge)
        });

        info!(
            "download complete: {} downloaded, {} skipped, {} failed",
            stats.downloaded, stats.skipped, stats.failed
        );
        Ok(stats)
    }
}

/// Read a local listing that may or may not be gzipped.
pub fn open_listing(src: &Path) -> Result<Box<dyn Read>, Error> {
    let f = File::open(src)?;
    if src.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(MultiGzDecoder::new(f)))
    } else {
        Ok(Box::new(f))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::tempdir;

    use super::*;

    const LISTING: &str = "\
cc-index/table/cc-main/warc/crawl=CC-MAIN-2024-10/subset=warc/part-00000.c000.gz.parquet
cc-index/table/cc-main/warc/crawl=CC-MAIN-2024-10/subset=robotstxt/part-00000.c000.gz.parquet
cc-index/table/cc-main/warc/crawl=CC-MAIN-2024-10/subset=warc/part-00001.c000.gz.parquet
cc-index/table/cc-main/warc/crawl=CC-MAIN-2024-10/subset=crawldiagnostics/part-00000.c000.gz.parquet
cc-index/table/cc-main/warc/crawl=CC-MAIN-2024-10/subset=warc/part-00002.c000.gz.parquet
";

    #[test]
    fn partition_filter() {
        let paths = warc_paths(Cursor::new(LISTING), 0, None).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.contains("subset=warc")));
    }

    #[test]
    fn slicing() {
        let paths = warc_paths(Cursor::new(LISTING), 1, Some(1)).unwrap();
        assert_eq!(
            paths,
            vec!["cc-index/table/cc-main/warc/crawl=CC-MAIN-2024-10/subset=warc/part-00001.c000.gz.parquet"]
        );

        let paths = warc_paths(Cursor::new(LISTING), 5, None).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn gzipped_listing() {
        let dst = tempdir().unwrap();
        let path = dst.path().join("cc-index-table.paths.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(LISTING.as_bytes()).unwrap();
        enc.finish().unwrap();

        let paths = read_listing(&path, 0, Some(2)).unwrap();
        assert_eq!(paths.len(), 2);

        let mut content = String::new();
        open_listing(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, LISTING);
    }

    #[test]
    fn existing_files_skipped() {
        let dst = tempdir().unwrap();
        let dl = IndexDownloader::new(BASE_URL, dst.path().to_path_buf(), 2).unwrap();
        let path = "cc-index/subset=warc/part-00000.c000.gz.parquet";

        let local = dl.destination(path).unwrap();
        assert_eq!(local, dst.path().join("part-00000.c000.gz.parquet"));
        File::create(&local).unwrap();

        assert_eq!(dl.download_one(path).unwrap(), DownloadStatus::Skipped);
        let stats = dl.download_all(&[path.to_string()]).unwrap();
        assert_eq!(
            stats,
            DownloadStats {
                downloaded: 0,
                skipped: 1,
                failed: 0
            }
        );
    }

    #[test]
    fn invalid_base() {
        let dst = tempdir().unwrap();
        assert!(IndexDownloader::new("not a url", dst.path().to_path_buf(), 1).is_err());
    }
}
