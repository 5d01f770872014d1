/*! Filtering utilities

Filters operate on document or sentence level.

- [language::LanguageRatio] decides whether a text is written in the target script,
- [document::QualityFilter] runs the ordered battery of document heuristics and reports the failing [document::Stage],
- [sentence::Segmenter] splits accepted documents into sentences, using [sentence::Length] to drop short pieces.

Stateless filters implement [Filter] (2 successive equal inputs -> 2 equal outputs).
! */
pub mod document;
mod filter;
pub mod language;
pub mod sentence;

pub use document::{QualityFilter, Stage, Verdict};
pub use filter::Filter;
pub use language::LanguageRatio;
pub use sentence::Segmenter;
