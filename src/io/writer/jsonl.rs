/*! JSON lines sentence writer.

Each sentence is written as a single `{"text": "..."}` line.
!*/
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::document::SentenceRecord;
use crate::error::Error;

use super::SentenceSink;

pub struct JsonlWriter<W: Write> {
    handle: BufWriter<W>,
    nb_written: usize,
}

impl JsonlWriter<File> {
    /// Create (truncating) the file at `dst`.
    pub fn create(dst: &Path) -> Result<Self, Error> {
        debug!("writing corpus to {:?}", dst);
        let f = File::create(dst).map_err(Error::Sink)?;
        Ok(Self::new(f))
    }

    /// Open the file at `dst` in append mode, creating it if needed.
    pub fn append(dst: &Path) -> Result<Self, Error> {
        debug!("appending corpus to {:?}", dst);
        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dst)
            .map_err(Error::Sink)?;
        Ok(Self::new(f))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            handle: BufWriter::new(inner),
            nb_written: 0,
        }
    }

    /// Number of records written so far.
    pub fn nb_written(&self) -> usize {
        self.nb_written
    }

    /// Flush and get back the inner writer.
    pub fn into_inner(self) -> Result<W, Error> {
        self.handle
            .into_inner()
            .map_err(|e| Error::Sink(e.into_error()))
    }
}

impl<W: Write> SentenceSink for JsonlWriter<W> {
    fn write_sentence(&mut self, sentence: &str) -> Result<(), Error> {
        serde_json::to_writer(&mut self.handle, &SentenceRecord::new(sentence)).map_err(
            |e| match e.io_error_kind() {
                Some(kind) => Error::Sink(std::io::Error::new(kind, e)),
                None => Error::Serde(e),
            },
        )?;
        self.handle.write_all(b"\n").map_err(Error::Sink)?;
        self.nb_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.handle.flush().map_err(Error::Sink)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use tempfile::tempdir;

    use super::*;
    use crate::io::CorpusReader;

    #[test]
    fn write_lines() {
        let mut w = JsonlWriter::new(Vec::new());
        w.write_sentence("პირველი წინადადება").unwrap();
        w.write_sentence("მეორე \"ციტატით\"").unwrap();
        assert_eq!(w.nb_written(), 2);

        let bytes = w.into_inner().unwrap();
        let s = String::from_utf8(bytes).unwrap();
        assert_eq!(
            s,
            "{\"text\":\"პირველი წინადადება\"}\n{\"text\":\"მეორე \\\"ციტატით\\\"\"}\n"
        );
    }

    #[test]
    fn write_then_read() {
        let dst = tempdir().unwrap();
        let path = dst.path().join("corpus.jsonl");

        let mut w = JsonlWriter::create(&path).unwrap();
        w.write_sentence("ერთი").unwrap();
        w.flush().unwrap();

        let mut w = JsonlWriter::append(&path).unwrap();
        w.write_sentence("ორი").unwrap();
        w.flush().unwrap();

        let sentences: Vec<String> = CorpusReader::from_path(&path)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(sentences, vec!["ერთი", "ორი"]);
    }

    /// writer that always fails
    struct Broken;
    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn sink_error() {
        let mut w = JsonlWriter::new(Broken);
        // buffered, the error only shows on flush.
        let res = w.write_sentence("ერთი").and_then(|_| w.flush());
        assert!(matches!(res, Err(Error::Sink(_))));
    }
}
