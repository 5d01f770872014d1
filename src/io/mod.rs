/*!
# IO utilities

Raw document loading and corpus (JSON lines) reading/writing.
!*/
pub mod reader;
pub mod writer;

pub use reader::{CorpusReader, DirReader};
pub use writer::{JsonlWriter, SentenceSink};
