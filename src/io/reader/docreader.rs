/*! File-per-document store reader.

Documents are `*.txt` files at the root of a directory, read in lexicographic filename order.
This order is what makes deduplication reproducible between runs: the first document of
a near-duplicate cluster is the one that is kept.
 * !*/
use std::path::{Path, PathBuf};
use std::vec::IntoIter;

use log::{debug, error};

use crate::document::Document;
use crate::error::Error;

#[derive(Debug)]
pub struct DirReader {
    paths: IntoIter<PathBuf>,
}

impl DirReader {
    /// List `*.txt` files in `src`.
    ///
    /// Entries that can't be listed are logged and skipped.
    pub fn new(src: &Path) -> Result<Self, Error> {
        if !src.is_dir() {
            return Err(Error::Custom(format!(
                "source has to be a directory: {:?}",
                src
            )));
        }

        let src_str = src
            .to_str()
            .ok_or_else(|| Error::Custom(format!("invalid source path {:?}", src)))?;
        let pattern = format!("{}/*.txt", glob::Pattern::escape(src_str));

        let mut paths: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    error!("error reading source directory: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!("{} documents found in {:?}", paths.len(), src);

        Ok(Self {
            paths: paths.into_iter(),
        })
    }

    /// Number of documents left to read.
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }

    fn read(path: &Path) -> Result<Document, Error> {
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let bytes = std::fs::read(path).map_err(|e| Error::MalformedInput {
            source: source.clone(),
            reason: e.to_string(),
        })?;

        let content = String::from_utf8(bytes).map_err(|e| Error::MalformedInput {
            source: source.clone(),
            reason: e.to_string(),
        })?;

        Ok(Document::new(source, content))
    }
}

impl Iterator for DirReader {
    type Item = Result<Document, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.paths.next().map(|path| Self::read(&path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn lexicographic_order() {
        let dst = tempdir().unwrap();
        for name in ["text_00003.txt", "text_00001.txt", "text_00002.txt"] {
            fs::write(dst.path().join(name), name).unwrap();
        }
        // not a document
        fs::write(dst.path().join("notes.md"), "ignored").unwrap();

        let reader = DirReader::new(dst.path()).unwrap();
        assert_eq!(reader.remaining(), 3);

        let sources: Vec<String> = reader
            .map(|doc| doc.unwrap().source().to_string())
            .collect();
        assert_eq!(
            sources,
            vec!["text_00001.txt", "text_00002.txt", "text_00003.txt"]
        );
    }

    #[test]
    fn invalid_utf8() {
        let dst = tempdir().unwrap();
        fs::write(dst.path().join("a.txt"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(dst.path().join("b.txt"), "კარგი").unwrap();

        let docs: Vec<_> = DirReader::new(dst.path()).unwrap().collect();
        assert!(matches!(docs[0], Err(Error::MalformedInput { .. })));
        assert_eq!(docs[1].as_ref().unwrap().content(), "კარგი");
    }

    #[test]
    fn not_a_directory() {
        assert!(DirReader::new(Path::new("sdjkfhsdkjfhskdjfh")).is_err());
    }
}
