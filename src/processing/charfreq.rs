//! Character frequency report of a generated corpus.
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use itertools::Itertools;
use log::{debug, info};

use crate::config::ScriptRange;
use crate::error::Error;
use crate::io::CorpusReader;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CharFrequencies {
    counts: HashMap<char, usize>,
    nb_lines: usize,
    nb_chars: usize,
}

impl CharFrequencies {
    /// Count characters of `script` over sentences.
    ///
    /// Sentences that can't be read are skipped.
    pub fn count<I>(sentences: I, script: ScriptRange) -> Self
    where
        I: IntoIterator<Item = Result<String, Error>>,
    {
        let mut freqs = Self::default();
        for sentence in sentences {
            let sentence = match sentence {
                Ok(s) => s,
                Err(e) => {
                    debug!("skipping line: {}", e);
                    continue;
                }
            };
            freqs.nb_lines += 1;
            for c in sentence.chars().filter(|c| script.contains(*c)) {
                *freqs.counts.entry(c).or_insert(0) += 1;
                freqs.nb_chars += 1;
            }
        }
        freqs
    }

    pub fn from_path(src: &Path, script: ScriptRange) -> Result<Self, Error> {
        let freqs = Self::count(CorpusReader::from_path(src)?, script);
        info!(
            "processed {} lines with {} characters in script",
            freqs.nb_lines, freqs.nb_chars
        );
        Ok(freqs)
    }

    pub fn nb_lines(&self) -> usize {
        self.nb_lines
    }

    pub fn nb_chars(&self) -> usize {
        self.nb_chars
    }

    pub fn get(&self, c: char) -> usize {
        self.counts.get(&c).copied().unwrap_or(0)
    }

    /// Share of `c` among counted characters, in percent.
    pub fn frequency(&self, c: char) -> f64 {
        if self.nb_chars == 0 {
            return 0.0;
        }
        self.get(c) as f64 / self.nb_chars as f64 * 100.0
    }

    /// (char, count) by descending count, ties broken by codepoint.
    pub fn most_common(&self) -> Vec<(char, usize)> {
        self.counts
            .iter()
            .map(|(c, n)| (*c, *n))
            .sorted_by(|(ca, na), (cb, nb)| nb.cmp(na).then(ca.cmp(cb)))
            .collect()
    }
}

impl fmt::Display for CharFrequencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Processed {} lines with {} characters.\n",
            self.nb_lines, self.nb_chars
        )?;
        writeln!(f, "{:^6} | {:^8} | {:^14}", "Char", "Count", "Frequency (%)")?;
        writeln!(f, "{}", "-".repeat(32))?;
        for (c, n) in self.most_common() {
            writeln!(f, "  {}   | {:8} | {:13.4}", c, n, self.frequency(c))?;
        }
        Ok(())
    }
}
