/*! Corpus building pipeline.

Raw documents go through the quality filter, near-duplicate detection and sentence segmentation.
Sentences of kept documents are written as JSON lines.

```text
raw text -> quality filter -> dedup query -> segmentation -> sentence count check -> dedup insert -> sentence filter -> sink
```
!*/
mod builder;
mod crawl;
mod pipeline;
mod stats;

pub use builder::{CorpusBuilder, Outcome};
pub use crawl::CrawlCorpus;
pub use pipeline::BuildCorpus;
pub use stats::{CorpusStats, Counter};
