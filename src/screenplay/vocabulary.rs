// WHY: Centralized scene-direction vocabulary for character cue rejection
// Frozen word lists compiled once per parser, never mutated at runtime

use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;

/// Scene-direction words that never form part of a character cue
pub const BLOCKED_WORDS: &[&str] = &[
    "INT", "EXT", "CUT", "FADE", "DISSOLVE", "VOICE",
    "TO:", "ANGLE", "TITLE", "OVER", "BY", "END",
    "THE END", "SCENE", "CONTINUED", "TRANSITION",
    "CREDITS", "CREDIT", "SCRIPT",
];

/// Camera, production and technical terms blocked alongside `BLOCKED_WORDS`
pub const TECHNICAL_TERMS: &[&str] = &[
    "CAMERA", "SHOT", "SHOTS", "POV", "INSERT", "MONTAGE", "FLASHBACK",
    "INTERCUT", "SUPER", "SUBTITLE", "SUBTITLES", "CLOSEUP", "CLOSE-UP",
    "ZOOM", "TRACKING", "AERIAL", "ESTABLISHING", "OMITTED", "REVISED",
    "DRAFT", "PRODUCTION", "FRAME", "SPLIT", "SCREEN", "SMASH", "WIPE",
    "IRIS", "SFX", "VFX", "CONTINUOUS", "PAGE",
];

/// Direction phrases rejected wherever they occur in a cue candidate
pub const TECHNICAL_PHRASES: &[&str] = &[
    "WIDE ON", "ANGLE ON", "CLOSE ON", "CLOSE UP", "CUT TO", "FADE IN",
    "FADE OUT", "FADE TO", "DISSOLVE TO", "SMASH CUT", "MATCH CUT",
    "JUMP CUT", "TIME CUT", "BACK TO", "RETURN TO", "PULL BACK", "PUSH IN",
    "PAN TO", "TILT UP", "TILT DOWN", "INTO FRAME", "OUT OF FRAME",
    "ON SCREEN", "OFF SCREEN", "SERIES OF SHOTS", "SLOW MOTION",
    "FREEZE FRAME", "TITLE CARD", "END OF",
];

/// Immutable lookup over the blocked vocabulary
#[derive(Debug, Clone)]
pub struct Vocabulary {
    blocked: HashSet<String>,
    phrases: Vec<String>,
    whole_word: Regex,
}

impl Vocabulary {
    /// Build the vocabulary from blocked words and technical phrases
    pub fn new(blocked: &[&str], phrases: &[&str]) -> Result<Self> {
        let blocked: HashSet<String> = blocked.iter().map(|w| w.to_uppercase()).collect();

        // WHY: longest alternatives first so "THE END" wins over "END" in the alternation
        let mut alternatives: Vec<&String> = blocked.iter().collect();
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = alternatives
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");

        // Whole-word: neighbours must not be letters, digits or apostrophes
        let pattern = format!(r"(?:^|[^\p{{L}}\p{{N}}'])(?:{alternation})(?:$|[^\p{{L}}\p{{N}}'])");
        let whole_word = Regex::new(&pattern)?;

        Ok(Self {
            blocked,
            phrases: phrases.iter().map(|p| p.to_uppercase()).collect(),
            whole_word,
        })
    }

    /// Vocabulary with the standard blocked words, technical terms and phrases
    pub fn standard() -> Result<Self> {
        let blocked: Vec<&str> = BLOCKED_WORDS
            .iter()
            .chain(TECHNICAL_TERMS.iter())
            .copied()
            .collect();
        Self::new(&blocked, TECHNICAL_PHRASES)
    }

    /// True if the upper-cased text contains a blocked word as a whole word
    pub fn contains_blocked_word(&self, upper: &str) -> bool {
        self.whole_word.is_match(upper)
    }

    /// True if the upper-cased text is exactly a blocked word or phrase
    pub fn is_blocked(&self, upper: &str) -> bool {
        self.blocked.contains(upper) || self.phrases.iter().any(|p| p == upper)
    }

    /// True if a technical phrase occurs anywhere in the upper-cased text
    pub fn contains_technical_phrase(&self, upper: &str) -> bool {
        self.phrases.iter().any(|phrase| upper.contains(phrase.as_str()))
    }
}
