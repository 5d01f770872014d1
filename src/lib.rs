/*! # Kartuli

Builds a quality-filtered, near-deduplicated, sentence-segmented Georgian text corpus
from raw web documents.

The core is the [pipelines::corpus::CorpusBuilder], that chains
[filtering] (document quality and script ratio), [dedup] (MinHash/LSH near-duplicate detection)
and sentence segmentation, writing kept sentences through [io] sinks.
[sources] provide the upstream stages (index download, URL selection, page fetching).
!*/
pub mod cli;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod filtering;
pub mod io;
pub mod pipelines;
pub mod processing;
pub mod sources;
