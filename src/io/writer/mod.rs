/*!
# Corpus writing

Accepted sentences are written to a [SentenceSink].
[JsonlWriter] writes them as JSON lines (`{"text": "..."}`) to any [std::io::Write].

Write failures are reported as [crate::error::Error::Sink] and are fatal for a run.
!*/
mod jsonl;
mod writertrait;

pub use jsonl::JsonlWriter;
pub use writertrait::SentenceSink;
