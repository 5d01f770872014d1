/*! Generated corpus reader.

Iterates over the `text` field of each JSON line of a corpus file.
 * !*/
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use crate::document::SentenceRecord;
use crate::error::Error;

#[derive(Debug)]
pub struct Reader<T>
where
    T: Read,
{
    lines: Lines<BufReader<T>>,
}

pub type CorpusReader = Reader<File>;

impl CorpusReader {
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        let handler = File::open(src)?;
        Ok(Reader::new(handler))
    }
}

impl<T> Reader<T>
where
    T: Read,
{
    pub fn new(inner: T) -> Self {
        Self {
            lines: BufReader::new(inner).lines(),
        }
    }
}

impl<T> Iterator for Reader<T>
where
    T: Read,
{
    type Item = Result<String, Error>;

    /// iterates over sentences. Empty lines are skipped.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };

            if line.trim().is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str::<SentenceRecord>(&line)
                    .map(|record| record.text.into_owned())
                    .map_err(Error::Serde),
            );
        }
    }
}
