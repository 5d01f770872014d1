//! Script ratio language classifier.
//!
//! A text is considered in-language when the share of its characters
//! that fall in the target script range is strictly above a threshold.
use crate::config::ScriptRange;

use super::Filter;

#[derive(Debug, Clone, Copy)]
pub struct LanguageRatio {
    script: ScriptRange,
    threshold: f64,
}

impl LanguageRatio {
    pub fn new(script: ScriptRange, threshold: f64) -> Self {
        Self { script, threshold }
    }

    /// Fraction of characters belonging to the script range.
    /// Returns `0.0` for empty text.
    pub fn ratio(&self, text: &str) -> f64 {
        let (in_script, total) = text.chars().fold((0usize, 0usize), |(in_script, total), c| {
            if self.script.contains(c) {
                (in_script + 1, total + 1)
            } else {
                (in_script, total + 1)
            }
        });

        if total == 0 {
            0.0
        } else {
            in_script as f64 / total as f64
        }
    }
}

impl Filter<&str> for LanguageRatio {
    fn detect(&self, text: &str) -> bool {
        // the ratio of an empty text is 0, which can't be above a non-negative threshold.
        !text.is_empty() && self.ratio(text) > self.threshold
    }
}

impl Default for LanguageRatio {
    /// Georgian, with a 0.3 threshold.
    fn default() -> Self {
        Self::new(ScriptRange::default(), 0.3)
    }
}

/// Shorthand for a one-off classification.
pub fn classify(text: &str, script: ScriptRange, threshold: f64) -> bool {
    LanguageRatio::new(script, threshold).detect(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_false() {
        let f = LanguageRatio::default();
        assert!(!f.detect(""));
        assert_eq!(f.ratio(""), 0.0);

        // even with a negative threshold
        assert!(!classify("", ScriptRange::default(), -1.0));
    }

    #[test]
    fn full_script_is_true() {
        let text = "გამარჯობაროგორხარ";
        for threshold in [0.0, 0.3, 0.5, 0.99, 0.999_999] {
            assert!(classify(text, ScriptRange::default(), threshold));
        }
    }

    #[test]
    fn ratio_is_strict() {
        // 3 georgian chars out of 10
        let text = "აბგ1234567";
        let f = LanguageRatio::default();
        assert!((f.ratio(text) - 0.3).abs() < 1e-9);
        assert!(!f.detect(text));

        let text = "აბგდ123456";
        assert!(f.detect(text));
    }

    #[test]
    fn latin_text() {
        let f = LanguageRatio::default();
        assert!(!f.detect("This is an english sentence, not a georgian one."));
    }

    #[test]
    fn counts_codepoints_not_bytes() {
        // georgian chars are 3 bytes in utf-8, a byte count would skew the ratio.
        let f = LanguageRatio::new(ScriptRange::default(), 0.49);
        assert!(f.detect("აa"));
        assert!((f.ratio("აa") - 0.5).abs() < 1e-9);
    }
}
