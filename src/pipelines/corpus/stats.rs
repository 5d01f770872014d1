//! Run counters.
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::Error;
use crate::filtering::Stage;

/// Document and sentence counters.
///
/// Each document ends up in exactly one of the terminal document counters
/// (`malformed`, a stage rejection, `duplicates`, `too_few_sentences`, `accepted`).
/// `kept` and `sentences_dropped` count sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Counter {
    Total,
    Malformed,
    Rejected(Stage),
    Duplicates,
    TooFewSentences,
    Accepted,
    Kept,
    SentencesDropped,
}

impl Counter {
    /// Counters in report order.
    pub fn all() -> impl Iterator<Item = Counter> {
        std::iter::once(Counter::Total)
            .chain(std::iter::once(Counter::Malformed))
            .chain(Stage::ALL.into_iter().map(Counter::Rejected))
            .chain([
                Counter::Duplicates,
                Counter::TooFewSentences,
                Counter::Accepted,
                Counter::Kept,
                Counter::SentencesDropped,
            ])
    }

    pub fn name(&self) -> &'static str {
        match self {
            Counter::Total => "total",
            Counter::Malformed => "malformed",
            Counter::Rejected(stage) => stage.name(),
            Counter::Duplicates => "duplicates",
            Counter::TooFewSentences => "too_few_sentences",
            Counter::Accepted => "accepted",
            Counter::Kept => "kept",
            Counter::SentencesDropped => "sentences_dropped",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CorpusStats {
    counts: HashMap<Counter, usize>,
}

impl CorpusStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr(&mut self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn add(&mut self, counter: Counter, n: usize) {
        *self.counts.entry(counter).or_insert(0) += n;
    }

    pub fn get(&self, counter: Counter) -> usize {
        self.counts.get(&counter).copied().unwrap_or(0)
    }

    /// Number of documents that reached a terminal state.
    pub fn nb_documents(&self) -> usize {
        Counter::all()
            .filter(|c| !matches!(c, Counter::Total | Counter::Kept | Counter::SentencesDropped))
            .map(|c| self.get(c))
            .sum()
    }

    /// Counter name -> count, for every counter.
    pub fn to_map(&self) -> BTreeMap<&'static str, usize> {
        Counter::all().map(|c| (c.name(), self.get(c))).collect()
    }

    /// Write counters as a JSON object.
    pub fn write_json(&self, dst: &Path) -> Result<(), Error> {
        let f = File::create(dst)?;
        serde_json::to_writer_pretty(BufWriter::new(f), &self.to_map())?;
        Ok(())
    }
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        for counter in Counter::all() {
            writeln!(f, "  {}: {}", counter.name(), self.get(counter))?;
        }
        Ok(())
    }
}
