/*! Content processing

Contains structures and functions to aggregate data from generated corpora.
!*/
pub mod charfreq;

pub use charfreq::CharFrequencies;
