/*! Candidate URL selection.

Index tables are parquet files (as downloaded by [crate::sources::index]) or CSV files,
with (at least) a `url` and a `content_languages` column.
Rows whose declared content language is one of the target codes are kept, and their URLs
are collected in a sorted, deduplicated set.
!*/
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::{error, info};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use serde::Deserialize;

use crate::error::Error;

lazy_static! {
    /// Language codes under which Georgian pages are declared in index tables.
    pub static ref GEORGIAN_CODES: HashSet<&'static str> = {
        let mut m = HashSet::new();
        m.insert("ka");
        m.insert("ka-GE");
        m.insert("kat");
        m.insert("GE");
        m.insert("GEO");
        m.insert("ge");
        m.insert("geo");
        m
    };
}

#[derive(Debug, Default, Deserialize)]
struct IndexRow {
    url: Option<String>,
    content_languages: Option<String>,
}

/// Table formats, from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFormat {
    Parquet,
    Csv,
}

impl TableFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("parquet") => Some(Self::Parquet),
            Some("csv") => Some(Self::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UrlSelector {
    codes: HashSet<String>,
}

impl Default for UrlSelector {
    fn default() -> Self {
        Self::new(GEORGIAN_CODES.iter().copied())
    }
}

impl UrlSelector {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    fn keep(&self, row: &IndexRow) -> bool {
        row.content_languages
            .as_deref()
            .map_or(false, |lang| self.codes.contains(lang))
    }

    /// Insert the URL of a kept row, returning whether the row was kept.
    ///
    /// Rows without an URL are skipped.
    fn collect(&self, row: IndexRow, urls: &mut BTreeSet<String>) -> bool {
        if !self.keep(&row) {
            return false;
        }
        match row.url.filter(|url| !url.is_empty()) {
            Some(url) => {
                urls.insert(url);
                true
            }
            None => false,
        }
    }

    /// Add the selected URLs of a CSV table to `urls`, returning the number of rows kept.
    pub fn select<R: Read>(&self, table: R, urls: &mut BTreeSet<String>) -> Result<usize, Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(table);
        let mut nb_kept = 0;
        for row in reader.deserialize::<IndexRow>() {
            if self.collect(row?, urls) {
                nb_kept += 1;
            }
        }
        Ok(nb_kept)
    }

    /// Add the selected URLs of a parquet table to `urls`, returning the number of rows kept.
    ///
    /// Columns other than `url` and `content_languages` are ignored, as are non-string values.
    pub fn select_parquet(&self, table: File, urls: &mut BTreeSet<String>) -> Result<usize, Error> {
        let reader = SerializedFileReader::new(table)?;
        let mut nb_kept = 0;
        for row in reader.get_row_iter(None)? {
            let row = row?;
            let mut index_row = IndexRow::default();
            for (name, field) in row.get_column_iter() {
                match (name.as_str(), field) {
                    ("url", Field::Str(url)) => index_row.url = Some(url.clone()),
                    ("content_languages", Field::Str(lang)) => {
                        index_row.content_languages = Some(lang.clone())
                    }
                    _ => (),
                }
            }
            if self.collect(index_row, urls) {
                nb_kept += 1;
            }
        }
        Ok(nb_kept)
    }

    fn select_table(&self, table: &Path, urls: &mut BTreeSet<String>) -> Result<usize, Error> {
        let f = File::open(table)?;
        match TableFormat::from_path(table) {
            Some(TableFormat::Parquet) => self.select_parquet(f, urls),
            Some(TableFormat::Csv) => self.select(f, urls),
            None => Err(Error::Custom(format!("unknown table format: {:?}", table))),
        }
    }

    /// Select URLs from all `*.parquet` and `*.csv` tables of `src`, in lexicographic filename order.
    ///
    /// Unreadable tables are logged and skipped.
    pub fn select_dir(&self, src: &Path) -> Result<BTreeSet<String>, Error> {
        let src_str = src
            .to_str()
            .ok_or_else(|| Error::Custom(format!("invalid source path {:?}", src)))?;
        let src_str = glob::Pattern::escape(src_str);
        let mut tables: Vec<PathBuf> = Vec::new();
        for ext in ["parquet", "csv"] {
            let pattern = format!("{}/*.{}", src_str, ext);
            tables.extend(glob::glob(&pattern)?.filter_map(Result::ok));
        }
        tables.sort();

        info!("total tables to process: {}", tables.len());
        let mut urls = BTreeSet::new();
        for (idx, table) in tables.iter().enumerate() {
            info!("[{}/{}] processing {:?}", idx + 1, tables.len(), table);
            let res = self.select_table(table, &mut urls);
            match res {
                Ok(nb) => info!("  + {} rows kept (total unique urls: {})", nb, urls.len()),
                Err(e) => error!("failed to read {:?}: {}", table, e),
            }
        }

        Ok(urls)
    }
}

/// Write one URL per line.
pub fn write_urls<'a>(urls: impl IntoIterator<Item = &'a String>, dst: &Path) -> Result<(), Error> {
    let mut out = BufWriter::new(File::create(dst)?);
    for url in urls {
        writeln!(out, "{}", url)?;
    }
    out.flush()?;
    Ok(())
}

/// Read a list of URLs, one per line. Blank lines are skipped.
pub fn read_urls(src: &Path) -> Result<Vec<String>, Error> {
    let content = std::fs::read_to_string(src)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;
    use std::sync::Arc;

    use parquet::data_type::{ByteArray, ByteArrayType};
    use parquet::file::properties::WriterProperties;
    use parquet::file::writer::SerializedFileWriter;
    use parquet::schema::parser::parse_message_type;
    use tempfile::tempdir;

    use super::*;

    type Cells<'a> = (Option<&'a str>, Option<&'a str>);

    /// Write a single row group table with nullable `url` and `content_languages` columns.
    fn write_parquet(path: &Path, rows: &[Cells]) {
        let schema = Arc::new(
            parse_message_type(
                "message schema {
                    OPTIONAL BYTE_ARRAY url (UTF8);
                    OPTIONAL BYTE_ARRAY content_languages (UTF8);
                }",
            )
            .unwrap(),
        );
        let props = Arc::new(WriterProperties::builder().build());
        let mut writer = SerializedFileWriter::new(File::create(path).unwrap(), schema, props).unwrap();
        let mut row_group = writer.next_row_group().unwrap();

        for col in 0..2 {
            let cells: Vec<Option<&str>> = rows
                .iter()
                .map(|r| if col == 0 { r.0 } else { r.1 })
                .collect();
            let values: Vec<ByteArray> = cells.iter().flatten().map(|c| ByteArray::from(*c)).collect();
            let def_levels: Vec<i16> = cells.iter().map(|c| c.is_some() as i16).collect();

            let mut col_writer = row_group.next_column().unwrap().unwrap();
            col_writer
                .typed::<ByteArrayType>()
                .write_batch(&values, Some(&def_levels[..]), None)
                .unwrap();
            col_writer.close().unwrap();
        }
        row_group.close().unwrap();
        writer.close().unwrap();
    }

    const TABLE: &str = "\
url,content_languages,fetch_status
https://example.ge/b,ka,200
https://example.com/a,eng,200
https://example.ge/a,kat,200
,kat,200
https://example.ge/b,kat,200
https://example.ru/c,\"rus,kat\",200
https://example.ge/c,,200
";

    #[test]
    fn select_table() {
        let selector = UrlSelector::default();
        let mut urls = BTreeSet::new();
        let nb = selector.select(Cursor::new(TABLE), &mut urls).unwrap();

        assert_eq!(nb, 3);
        let urls: Vec<_> = urls.into_iter().collect();
        assert_eq!(urls, vec!["https://example.ge/a", "https://example.ge/b"]);
    }

    #[test]
    fn custom_codes() {
        let selector = UrlSelector::new(["eng"]);
        let mut urls = BTreeSet::new();
        selector.select(Cursor::new(TABLE), &mut urls).unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://example.com/a"));
    }

    #[test]
    fn select_dir_skips_broken() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("b.csv"), TABLE).unwrap();
        fs::write(
            src.path().join("a.csv"),
            "url,content_languages\nhttps://example.ge/z,ge\n",
        )
        .unwrap();
        // not utf-8
        fs::write(src.path().join("c.csv"), [b'u', b'r', b'l', b'\n', 0xff, 0xfe]).unwrap();
        fs::write(src.path().join("notes.txt"), "https://ignored.ge,ka").unwrap();

        let urls = UrlSelector::default().select_dir(src.path()).unwrap();
        let urls: Vec<_> = urls.into_iter().collect();
        assert_eq!(
            urls,
            vec![
                "https://example.ge/a",
                "https://example.ge/b",
                "https://example.ge/z"
            ]
        );
    }

    #[test]
    fn select_parquet_table() {
        let src = tempdir().unwrap();
        let path = src.path().join("part-00000.c000.gz.parquet");
        write_parquet(
            &path,
            &[
                (Some("https://example.ge/b"), Some("ka")),
                (Some("https://example.com/a"), Some("eng")),
                (None, Some("kat")),
                (Some("https://example.ge/c"), None),
                (Some("https://example.ge/a"), Some("geo")),
            ],
        );

        let mut urls = BTreeSet::new();
        let nb = UrlSelector::default()
            .select_parquet(File::open(&path).unwrap(), &mut urls)
            .unwrap();
        assert_eq!(nb, 2);
        let urls: Vec<_> = urls.into_iter().collect();
        assert_eq!(urls, vec!["https://example.ge/a", "https://example.ge/b"]);
    }

    #[test]
    fn select_dir_mixed_formats() {
        let src = tempdir().unwrap();
        write_parquet(
            &src.path().join("part-00000.c000.gz.parquet"),
            &[(Some("https://example.ge/p"), Some("ka-GE"))],
        );
        fs::write(src.path().join("extra.csv"), TABLE).unwrap();
        // not a parquet file
        fs::write(src.path().join("part-00001.c000.gz.parquet"), "url\n").unwrap();

        let urls = UrlSelector::default().select_dir(src.path()).unwrap();
        let urls: Vec<_> = urls.into_iter().collect();
        assert_eq!(
            urls,
            vec![
                "https://example.ge/a",
                "https://example.ge/b",
                "https://example.ge/p"
            ]
        );
    }

    #[test]
    fn write_then_read() {
        let dst = tempdir().unwrap();
        let path = dst.path().join("urls.txt");
        let urls: BTreeSet<String> = ["https://b.ge", "https://a.ge"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        write_urls(&urls, &path).unwrap();
        fs::write(
            &path,
            format!("{}\n\n", fs::read_to_string(&path).unwrap()),
        )
        .unwrap();

        assert_eq!(read_urls(&path).unwrap(), vec!["https://a.ge", "https://b.ge"]);
    }
}
