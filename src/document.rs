//! Input documents and output records.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A raw document, as produced by fetching/extraction or read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source: String,
    content: String,
}

impl Document {
    pub fn new(source: String, content: String) -> Self {
        Self { source, content }
    }

    /// Identifier of the document origin (file name, URL).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// One line of the output corpus.
///
/// Serialized as `{"text": "..."}`, keeping non-ASCII characters as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord<'a> {
    #[serde(borrow)]
    pub text: Cow<'a, str>,
}

impl<'a> SentenceRecord<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text: Cow::Borrowed(text),
        }
    }
}
