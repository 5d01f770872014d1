/*! Reading utilities

- [DirReader] reads raw documents from a file-per-document store,
- [CorpusReader] reads back sentence records from a generated corpus.
!*/
mod corpus;
mod docreader;

pub use corpus::CorpusReader;
pub use docreader::DirReader;
