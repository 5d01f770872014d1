/*! Document sources.

Upstream stages that produce the raw documents fed to the corpus builder:

- [index]: download of the columnar index files listed in a gzipped paths listing,
- [urls]: selection of candidate URLs from index tables by declared content language,
- [fetch]: parallel page fetching and text extraction.
!*/
pub mod fetch;
pub mod index;
pub mod urls;
