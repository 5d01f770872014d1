//! sentence-level filtering
use std::str::Split;

use super::Filter;

/// Simple length filter.
/// Returns `false` if provided sentence is less than `min_size` unicode codepoints.
///
/// `min_size` is 10 by default.
#[derive(Debug, Clone, Copy)]
pub struct Length {
    min_size: usize,
}

impl Length {
    /// specify a minimum length
    pub fn with_min_size(min_size: usize) -> Self {
        Self { min_size }
    }
}

impl Filter<&str> for Length {
    fn detect(&self, sentence: &str) -> bool {
        sentence.chars().count() >= self.min_size
    }
}

impl Default for Length {
    /// Default minimum length for sentences is 10 Unicode Codepoints
    fn default() -> Self {
        Length { min_size: 10 }
    }
}

/// Splits text into sentences on `.`, trimming them and dropping the short ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    filter: Length,
}

impl Segmenter {
    pub fn new(min_sentence_len: usize) -> Self {
        Self {
            filter: Length::with_min_size(min_sentence_len),
        }
    }

    /// Lazily segment `text`.
    ///
    /// The returned iterator can be cloned to restart from the current position.
    pub fn segment<'a>(&self, text: &'a str) -> Sentences<'a> {
        Sentences {
            pieces: text.split('.'),
            filter: self.filter,
        }
    }
}

/// Iterator over the sentences of a text, in source order.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    pieces: Split<'a, char>,
    filter: Length,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.pieces
            .by_ref()
            .map(str::trim)
            .find(|piece| filter.detect(piece))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_default() {
        let valid: String = ['ა'; 10].iter().collect();
        let invalid: String = ['ა'; 9].iter().collect();

        let f = Length::default();
        assert!(f.detect(&valid));
        assert!(!f.detect(&invalid));
    }

    #[test]
    fn segment() {
        let text = "  პირველი წინადადება.  მოკლე. მეორე წინადადება აქ არის .  ";
        let sentences: Vec<_> = Segmenter::default().segment(text).collect();
        assert_eq!(
            sentences,
            vec!["პირველი წინადადება", "მეორე წინადადება აქ არის"]
        );
    }

    #[test]
    fn segment_no_delimiter() {
        let text = "ერთი გრძელი წინადადება წერტილის გარეშე";
        let sentences: Vec<_> = Segmenter::default().segment(text).collect();
        assert_eq!(sentences, vec![text]);
    }

    #[test]
    fn segment_empty() {
        assert_eq!(Segmenter::default().segment("").count(), 0);
        assert_eq!(Segmenter::default().segment("...").count(), 0);
    }

    #[test]
    fn restartable() {
        let text = "aaaaaaaaaaaa. bbbbbbbbbbbb. cccccccccccc";
        let mut sentences = Segmenter::default().segment(text);
        assert_eq!(sentences.next(), Some("aaaaaaaaaaaa"));

        let rest = sentences.clone();
        assert_eq!(
            sentences.collect::<Vec<_>>(),
            rest.collect::<Vec<_>>(),
        );
    }

    #[test]
    fn custom_min_length() {
        let text = "abc. abcdef. abcdefghi";
        let sentences: Vec<_> = Segmenter::new(6).segment(text).collect();
        assert_eq!(sentences, vec!["abcdef", "abcdefghi"]);
    }
}
