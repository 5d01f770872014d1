/*! Run configuration.

Every threshold used by the filtering and deduplication stages lives in [CorpusConfig].
Defaults target Georgian (Mkhedruli/Asomtavruli block, `U+10A0..=U+10FF`).

A configuration can be loaded from a JSON file; missing fields fall back to their defaults:

```json
{ "dedup_threshold": 0.85, "min_sentences": 5 }
```
!*/
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Inclusive Unicode range of the target script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRange {
    pub start: char,
    pub end: char,
}

impl ScriptRange {
    pub fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.start <= c && c <= self.end
    }
}

impl Default for ScriptRange {
    fn default() -> Self {
        Self {
            start: '\u{10A0}',
            end: '\u{10FF}',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub script: ScriptRange,
    pub doc_lang_threshold: f64,
    pub sentence_lang_threshold: f64,
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub min_dot_ratio: f64,
    pub min_avg_token_len: f64,
    pub max_avg_token_len: f64,
    pub max_symbol_ratio: f64,
    pub dedup_threshold: f64,
    pub num_perm: usize,
    pub seed: u64,
    pub min_sentence_len: usize,
    pub min_sentences: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            script: ScriptRange::default(),
            doc_lang_threshold: 0.3,
            sentence_lang_threshold: 0.3,
            min_tokens: 50,
            max_tokens: 10_000,
            min_dot_ratio: 0.002,
            min_avg_token_len: 3.5,
            max_avg_token_len: 8.0,
            max_symbol_ratio: 0.3,
            dedup_threshold: 0.9,
            num_perm: 128,
            seed: 1,
            min_sentence_len: 10,
            min_sentences: 3,
        }
    }
}

impl CorpusConfig {
    /// Load a configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let f = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(f))?;
        Ok(config)
    }

    /// Checks that thresholds are in range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.script.start > self.script.end {
            return Err(Error::Custom(format!(
                "empty script range: {:?}",
                self.script
            )));
        }
        if self.min_tokens > self.max_tokens {
            return Err(Error::Custom(format!(
                "min_tokens ({}) > max_tokens ({})",
                self.min_tokens, self.max_tokens
            )));
        }
        if self.min_avg_token_len > self.max_avg_token_len {
            return Err(Error::Custom(format!(
                "min_avg_token_len ({}) > max_avg_token_len ({})",
                self.min_avg_token_len, self.max_avg_token_len
            )));
        }
        if !(0.0..=1.0).contains(&self.dedup_threshold) {
            return Err(Error::Custom(format!(
                "dedup_threshold must be in [0, 1], got {}",
                self.dedup_threshold
            )));
        }
        if self.num_perm == 0 {
            return Err(Error::Custom("num_perm must be >= 1".to_string()));
        }
        Ok(())
    }
}
