//! Corpus builder.
//!
//! Takes documents one at a time and brings each of them to a terminal state:
//!
//! ```text
//! received -> quality checked -> rejected(stage)
//!                             -> dedup checked -> rejected(duplicate)
//!                                              -> segmented -> rejected(too few sentences)
//!                                                           -> emitted
//! ```
//!
//! The builder owns the near-duplicate index and the run counters. It takes `&mut self`,
//! so queries and insertions on the index are serialized in document order.
use log::{debug, error, info};

use crate::config::CorpusConfig;
use crate::dedup::{content_key, MinHasher, NearDuplicateIndex};
use crate::document::Document;
use crate::error::Error;
use crate::filtering::{Filter, LanguageRatio, QualityFilter, Segmenter, Stage, Verdict};
use crate::io::SentenceSink;

use super::stats::{CorpusStats, Counter};

/// Terminal state of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Malformed,
    Rejected(Stage),
    Duplicate,
    TooFewSentences(usize),
    Emitted { kept: usize, dropped: usize },
}

impl Outcome {
    fn counter(&self) -> Counter {
        match self {
            Outcome::Malformed => Counter::Malformed,
            Outcome::Rejected(stage) => Counter::Rejected(*stage),
            Outcome::Duplicate => Counter::Duplicates,
            Outcome::TooFewSentences(_) => Counter::TooFewSentences,
            Outcome::Emitted { .. } => Counter::Accepted,
        }
    }
}

pub struct CorpusBuilder {
    quality: QualityFilter,
    hasher: MinHasher,
    index: NearDuplicateIndex,
    segmenter: Segmenter,
    sentence_language: LanguageRatio,
    min_sentences: usize,
    stats: CorpusStats,
}

impl CorpusBuilder {
    pub fn new(config: &CorpusConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            quality: QualityFilter::from_config(config),
            hasher: MinHasher::new(config.num_perm, config.seed),
            index: NearDuplicateIndex::new(config.dedup_threshold, config.num_perm),
            segmenter: Segmenter::new(config.min_sentence_len),
            sentence_language: LanguageRatio::new(config.script, config.sentence_lang_threshold),
            min_sentences: config.min_sentences,
            stats: CorpusStats::new(),
        })
    }

    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    pub fn into_stats(self) -> CorpusStats {
        self.stats
    }

    pub fn index(&self) -> &NearDuplicateIndex {
        &self.index
    }

    /// Process every document of `docs`, then flush `sink`.
    ///
    /// Stops at the first fatal error (sink failure, index corruption),
    /// in which case the counters reflect what has been processed until then.
    /// An input that ends early is a normal completion.
    pub fn run<I, S>(&mut self, docs: I, sink: &mut S) -> Result<(), Error>
    where
        I: IntoIterator<Item = Result<Document, Error>>,
        S: SentenceSink,
    {
        for doc in docs {
            self.process(doc, sink)?;
        }
        sink.flush()?;
        info!(
            "processed {} documents, kept {} sentences",
            self.stats.get(Counter::Total),
            self.stats.get(Counter::Kept)
        );
        Ok(())
    }

    /// Process an input item, counting recoverable read errors as malformed documents.
    pub fn process<S: SentenceSink>(
        &mut self,
        doc: Result<Document, Error>,
        sink: &mut S,
    ) -> Result<Outcome, Error> {
        match doc {
            Ok(doc) => self.process_document(&doc, sink),
            Err(e) if e.is_recoverable() => {
                self.stats.incr(Counter::Total);
                debug!("skipping document: {}", e);
                self.stats.incr(Counter::Malformed);
                Ok(Outcome::Malformed)
            }
            Err(e) => Err(e),
        }
    }

    /// Bring a document to its terminal state, writing its sentences to `sink` if it is accepted.
    pub fn process_document<S: SentenceSink>(
        &mut self,
        doc: &Document,
        sink: &mut S,
    ) -> Result<Outcome, Error> {
        self.stats.incr(Counter::Total);
        let outcome = self.evaluate(doc, sink).map_err(|e| {
            error!(
                "{}: stopped while processing, counted in total only: {}",
                doc.source(),
                e
            );
            e
        })?;
        self.stats.incr(outcome.counter());
        Ok(outcome)
    }

    fn evaluate<S: SentenceSink>(&mut self, doc: &Document, sink: &mut S) -> Result<Outcome, Error> {
        let text = doc.content().trim();

        if let Verdict::Rejected(stage) = self.quality.evaluate(text) {
            debug!("{}: rejected at {}", doc.source(), stage);
            return Ok(Outcome::Rejected(stage));
        }

        let signature = self.hasher.fingerprint(text);
        if self.index.query(&signature)? {
            debug!("{}: near duplicate", doc.source());
            return Ok(Outcome::Duplicate);
        }

        let sentences: Vec<&str> = self.segmenter.segment(text).collect();
        if sentences.len() < self.min_sentences {
            debug!(
                "{}: too few sentences ({} < {})",
                doc.source(),
                sentences.len(),
                self.min_sentences
            );
            return Ok(Outcome::TooFewSentences(sentences.len()));
        }

        self.index.insert(content_key(text), signature)?;

        let mut kept = 0;
        let mut dropped = 0;
        for &sentence in &sentences {
            if self.sentence_language.detect(sentence) {
                sink.write_sentence(sentence)?;
                self.stats.incr(Counter::Kept);
                kept += 1;
            } else {
                self.stats.incr(Counter::SentencesDropped);
                dropped += 1;
            }
        }

        info!(
            "Accepted {} with {} sentences ({} kept)",
            doc.source(),
            sentences.len(),
            kept
        );
        Ok(Outcome::Emitted { kept, dropped })
    }
}
