//! Document-level filtering.
//!
//! [QualityFilter] applies cheap structural heuristics in a fixed order,
//! stopping at the first failing one:
//!
//! 1. whitespace token count bounds,
//! 2. `.` density,
//! 3. mean token length bounds,
//! 4. symbol density (characters that are neither alphanumeric nor whitespace),
//! 5. target script ratio.
use std::fmt;

use serde::Serialize;

use crate::config::CorpusConfig;

use super::{Filter, LanguageRatio};

/// Document filtering stages, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Length,
    DotRatio,
    AvgWordLength,
    SymbolRatio,
    LanguageRatio,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Length,
        Stage::DotRatio,
        Stage::AvgWordLength,
        Stage::SymbolRatio,
        Stage::LanguageRatio,
    ];

    /// Name of the rejection counter.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Length => "length_fail",
            Stage::DotRatio => "dot_ratio_fail",
            Stage::AvgWordLength => "avg_word_len_fail",
            Stage::SymbolRatio => "symbol_ratio_fail",
            Stage::LanguageRatio => "georgian_ratio_fail",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Stage),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// Failing stage, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(stage) => Some(*stage),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QualityFilter {
    min_tokens: usize,
    max_tokens: usize,
    min_dot_ratio: f64,
    min_avg_token_len: f64,
    max_avg_token_len: f64,
    max_symbol_ratio: f64,
    language: LanguageRatio,
}

impl QualityFilter {
    pub fn from_config(config: &CorpusConfig) -> Self {
        Self {
            min_tokens: config.min_tokens,
            max_tokens: config.max_tokens,
            min_dot_ratio: config.min_dot_ratio,
            min_avg_token_len: config.min_avg_token_len,
            max_avg_token_len: config.max_avg_token_len,
            max_symbol_ratio: config.max_symbol_ratio,
            language: LanguageRatio::new(config.script, config.doc_lang_threshold),
        }
    }

    /// Run the stages on `text`, returning the first failing one.
    pub fn evaluate(&self, text: &str) -> Verdict {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < self.min_tokens || tokens.len() > self.max_tokens {
            return Verdict::Rejected(Stage::Length);
        }

        let nb_chars = text.chars().count();

        // empty text has a ratio of 0.
        let dot_ratio = if nb_chars == 0 {
            0.0
        } else {
            text.chars().filter(|c| *c == '.').count() as f64 / nb_chars as f64
        };
        if dot_ratio < self.min_dot_ratio {
            return Verdict::Rejected(Stage::DotRatio);
        }

        let avg_len = Self::avg_token_len(&tokens);
        if avg_len < self.min_avg_token_len || avg_len > self.max_avg_token_len {
            return Verdict::Rejected(Stage::AvgWordLength);
        }

        let symbols = text
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count();
        // nb_chars can't be 0 there: we have at least min_tokens tokens.
        if nb_chars == 0 || symbols as f64 / nb_chars as f64 > self.max_symbol_ratio {
            return Verdict::Rejected(Stage::SymbolRatio);
        }

        if !self.language.detect(text) {
            return Verdict::Rejected(Stage::LanguageRatio);
        }

        Verdict::Accepted
    }

    /// Mean length of tokens, in unicode codepoints.
    fn avg_token_len(tokens: &[&str]) -> f64 {
        if tokens.is_empty() {
            return 0.0;
        }
        let total: usize = tokens.iter().map(|t| t.chars().count()).sum();
        total as f64 / tokens.len() as f64
    }
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self::from_config(&CorpusConfig::default())
    }
}

impl Filter<&str> for QualityFilter {
    fn detect(&self, text: &str) -> bool {
        self.evaluate(text).is_accepted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `nb` georgian tokens of 5 chars, with a dot every 10 tokens.
    fn georgian_doc(nb: usize) -> String {
        (1..=nb)
            .map(|i| if i % 10 == 0 { "წიგნი." } else { "წიგნი" })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn token_lower_bound_inclusive() {
        let f = QualityFilter::default();
        assert_eq!(
            f.evaluate(&georgian_doc(49)),
            Verdict::Rejected(Stage::Length)
        );
        assert_eq!(f.evaluate(&georgian_doc(50)), Verdict::Accepted);
    }

    #[test]
    fn token_upper_bound() {
        let f = QualityFilter::default();
        assert_eq!(f.evaluate(&georgian_doc(10_000)), Verdict::Accepted);
        assert_eq!(
            f.evaluate(&georgian_doc(10_001)),
            Verdict::Rejected(Stage::Length)
        );
    }

    #[test]
    fn empty() {
        let f = QualityFilter::default();
        assert_eq!(f.evaluate(""), Verdict::Rejected(Stage::Length));
    }

    #[test]
    fn no_dots() {
        let f = QualityFilter::default();
        let text = vec!["წიგნი"; 60].join(" ");
        assert_eq!(f.evaluate(&text), Verdict::Rejected(Stage::DotRatio));
    }

    #[test]
    fn short_tokens() {
        let f = QualityFilter::default();
        let text = (1..=60)
            .map(|i| if i % 10 == 0 { "ა." } else { "ა" })
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(f.evaluate(&text), Verdict::Rejected(Stage::AvgWordLength));
    }

    #[test]
    fn long_tokens() {
        let f = QualityFilter::default();
        let text = (1..=60)
            .map(|i| {
                if i % 10 == 0 {
                    "საქართველოსი."
                } else {
                    "საქართველოსი"
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(f.evaluate(&text), Verdict::Rejected(Stage::AvgWordLength));
    }

    #[test]
    fn symbols() {
        let f = QualityFilter::default();
        // 3 letters, 2 symbols + dot every 10 tokens
        let text = (1..=60)
            .map(|i| if i % 10 == 0 { "წ#გ%ნ." } else { "წ#გ%ნ" })
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(f.evaluate(&text), Verdict::Rejected(Stage::SymbolRatio));
    }

    #[test]
    fn latin_document() {
        let f = QualityFilter::default();
        let text = (1..=60)
            .map(|i| if i % 10 == 0 { "words." } else { "words" })
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(f.evaluate(&text), Verdict::Rejected(Stage::LanguageRatio));
    }

    #[test]
    fn idempotent() {
        let f = QualityFilter::default();
        for text in [georgian_doc(49), georgian_doc(50), georgian_doc(300)] {
            assert_eq!(f.evaluate(&text), f.evaluate(&text));
        }
    }

    #[test]
    fn stage_names() {
        let names: Vec<_> = Stage::ALL.iter().map(Stage::name).collect();
        assert_eq!(
            names,
            vec![
                "length_fail",
                "dot_ratio_fail",
                "avg_word_len_fail",
                "symbol_ratio_fail",
                "georgian_ratio_fail"
            ]
        );
    }
}
