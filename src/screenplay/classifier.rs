// WHY: Stateless line labelling - scene heading, character cue, or action text
// Precedence is fixed: heading, then cue, then everything else

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::trace;

use super::heading::{collapse_whitespace, HeadingParser};
use super::vocabulary::Vocabulary;

/// Punctuation stripped from both ends of a cue candidate
const CUE_PUNCTUATION: &[char] = &[
    '?', '!', ':', '.', ',', '(', ')', '\'', '"', '-',
    '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
];

/// Thresholds for character cue detection
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    /// Lines with more words than this are never cues
    pub max_cue_words: usize,
    /// Minimum alphabetic characters in a cue line
    pub min_alpha_chars: usize,
    /// Uppercase ratio required for multi-word cues
    pub min_uppercase_ratio: f64,
    /// Single-word cues must exceed this uppercase ratio
    pub single_word_min_uppercase_ratio: f64,
    /// Maximum length of a cleaned cue in characters
    pub max_cue_chars: usize,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            max_cue_words: 5,
            min_alpha_chars: 2,
            min_uppercase_ratio: 0.80,
            single_word_min_uppercase_ratio: 0.5,
            max_cue_chars: 40,
        }
    }
}

/// Label assigned to a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    SceneHeading,
    /// Carries the canonical character name
    CharacterCue(String),
    Action,
}

#[derive(Debug)]
pub struct LineClassifier {
    rules: ClassifierRules,
    vocabulary: Vocabulary,
    headings: HeadingParser,
    parenthetical: Regex,
}

impl LineClassifier {
    pub fn new(rules: ClassifierRules, vocabulary: Vocabulary) -> Result<Self> {
        Ok(Self {
            rules,
            vocabulary,
            headings: HeadingParser::new()?,
            // Unterminated trailing parentheticals ("BOB (O.S.") are removed too
            parenthetical: Regex::new(r"\([^)]*(?:\)|$)")?,
        })
    }

    pub fn with_default_rules() -> Result<Self> {
        Self::new(ClassifierRules::default(), Vocabulary::standard()?)
    }

    pub fn headings(&self) -> &HeadingParser {
        &self.headings
    }

    /// Classify a non-blank line; cues are only recognized inside an open scene
    pub fn classify(&self, line: &str, scene_open: bool) -> LineKind {
        if self.is_scene_heading(line) {
            return LineKind::SceneHeading;
        }
        if scene_open {
            if let Some(name) = self.character_cue(line) {
                return LineKind::CharacterCue(name);
            }
        }
        LineKind::Action
    }

    pub fn is_scene_heading(&self, line: &str) -> bool {
        self.headings.is_heading(line)
    }

    pub fn is_character_cue(&self, line: &str) -> bool {
        self.character_cue(line).is_some()
    }

    /// Canonical character name if the line reads as a speaker cue
    pub fn character_cue(&self, line: &str) -> Option<String> {
        let line = line.trim();

        if line.split_whitespace().count() > self.rules.max_cue_words {
            return None;
        }

        if self.vocabulary.contains_blocked_word(&line.to_uppercase()) {
            trace!(line, "Rejected cue: blocked word");
            return None;
        }

        if line.chars().filter(|c| c.is_alphabetic()).count() < self.rules.min_alpha_chars {
            return None;
        }

        let cleaned = self.clean_cue(line);
        if cleaned.is_empty() {
            return None;
        }
        let upper = cleaned.to_uppercase();

        if self.vocabulary.is_blocked(&upper) {
            return None;
        }

        let ratio = uppercase_ratio(&cleaned);
        let too_lowercase = if cleaned.split_whitespace().count() > 1 {
            ratio < self.rules.min_uppercase_ratio
        } else {
            // Strict: "No." and "Hi." sit exactly on the single-word bound
            ratio <= self.rules.single_word_min_uppercase_ratio
        };
        if too_lowercase {
            return None;
        }

        if cleaned.chars().count() > self.rules.max_cue_chars {
            return None;
        }

        if self.headings.is_heading(&cleaned) {
            return None;
        }

        if self.vocabulary.contains_technical_phrase(&upper) {
            trace!(line, "Rejected cue: technical phrase");
            return None;
        }

        Some(upper)
    }

    /// Drop parentheticals, trim cue punctuation, collapse whitespace
    fn clean_cue(&self, line: &str) -> String {
        let mut without_parens = String::with_capacity(line.len());
        let mut last = 0;
        for m in self.parenthetical.find_iter(line) {
            without_parens.push_str(&line[last..m.start()]);
            without_parens.push(' ');
            last = m.end();
        }
        without_parens.push_str(&line[last..]);

        let trimmed = without_parens
            .trim_matches(|c: char| c.is_whitespace() || CUE_PUNCTUATION.contains(&c));
        collapse_whitespace(trimmed)
    }
}

/// Share of uppercase letters among all letters, 0.0 when there are none
fn uppercase_ratio(text: &str) -> f64 {
    let (letters, upper) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(letters, upper), c| {
            (letters + 1, upper + usize::from(c.is_uppercase()))
        });
    if letters == 0 {
        0.0
    } else {
        upper as f64 / letters as f64
    }
}
