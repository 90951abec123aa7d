// WHY: Scene heading recognition and decomposition into type, location and time-of-day
// Headings take precedence over every other line classification

use anyhow::Result;
use regex_automata::meta::Regex;
use serde::Serialize;
use tracing::debug;

/// Interior/exterior setting of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SceneType {
    #[serde(rename = "INT")]
    Interior,
    #[serde(rename = "EXT")]
    Exterior,
    #[serde(rename = "INT/EXT")]
    InteriorExterior,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Time-of-day vocabulary recognized in scene headings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeOfDay {
    Morning,
    Day,
    Afternoon,
    Evening,
    Night,
    Dawn,
    Dusk,
    Continuous,
    Later,
    MomentsLater,
    SameTime,
    Unknown,
}

/// Exact time-of-day tokens
const TIME_EXACT: &[(&str, TimeOfDay)] = &[
    ("MORNING", TimeOfDay::Morning),
    ("DAY", TimeOfDay::Day),
    ("AFTERNOON", TimeOfDay::Afternoon),
    ("EVENING", TimeOfDay::Evening),
    ("NIGHT", TimeOfDay::Night),
    ("DAWN", TimeOfDay::Dawn),
    ("DUSK", TimeOfDay::Dusk),
    ("CONTINUOUS", TimeOfDay::Continuous),
    ("LATER", TimeOfDay::Later),
    ("MOMENTS LATER", TimeOfDay::MomentsLater),
    ("SAME TIME", TimeOfDay::SameTime),
];

/// Substring fallbacks, "AFTERNOON" before "DAY" style ordering matters
const TIME_SUBSTRINGS: &[(&str, TimeOfDay)] = &[
    ("MORNING", TimeOfDay::Morning),
    ("AFTERNOON", TimeOfDay::Afternoon),
    ("EVENING", TimeOfDay::Evening),
    ("NIGHT", TimeOfDay::Night),
    ("DAWN", TimeOfDay::Dawn),
    ("DUSK", TimeOfDay::Dusk),
    ("DAY", TimeOfDay::Day),
];

const DASHES: &[char] = &['-', '\u{2013}', '\u{2014}'];

/// Decomposed scene heading
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHeading {
    pub raw: String,
    pub scene_type: SceneType,
    pub location: String,
    pub time_of_day: TimeOfDay,
}

/// Compiled heading patterns
#[derive(Debug, Clone)]
pub struct HeadingParser {
    heading: Regex,
    prefix: Regex,
    parenthetical: Regex,
}

impl HeadingParser {
    pub fn new() -> Result<Self> {
        // Optional scene number, then an INT/EXT form; bare INT/EXT must not run into a word
        let scene_number = r"(?:\d+[A-Z]?\.?\s*)?";
        let setting = r"(?:INT\.?\s*/\s*EXT\.?|EXT\.?\s*/\s*INT\.?|INT\.|EXT\.|INT|EXT)";

        let heading_pattern = format!(r"(?i)^\s*{scene_number}{setting}(?:[^A-Za-z]|$)");
        let prefix_pattern = format!(r"(?i)^\s*{scene_number}{setting}[\s.:\-\u{{2013}}\u{{2014}}]*");

        Ok(Self {
            heading: Regex::new(&heading_pattern)?,
            prefix: Regex::new(&prefix_pattern)?,
            parenthetical: Regex::new(r"\([^)]*\)")?,
        })
    }

    /// True if the line opens a new scene
    pub fn is_heading(&self, line: &str) -> bool {
        self.heading.is_match(line)
    }

    /// Split a heading line into its parts
    pub fn parse(&self, line: &str) -> SceneHeading {
        let raw = line.trim().to_string();
        let remainder = self.strip_prefix(&raw);

        let heading = SceneHeading {
            scene_type: extract_scene_type(&raw),
            location: self.extract_location(remainder),
            time_of_day: self.extract_time(&raw, remainder),
            raw,
        };

        debug!(
            heading = %heading.raw,
            scene_type = ?heading.scene_type,
            location = %heading.location,
            time_of_day = ?heading.time_of_day,
            "Decomposed scene heading"
        );
        heading
    }

    fn strip_prefix<'a>(&self, heading: &'a str) -> &'a str {
        match self.prefix.find(heading) {
            Some(m) => &heading[m.end()..],
            None => heading,
        }
    }

    fn extract_location(&self, remainder: &str) -> String {
        let without_parens = self.remove_parentheticals(remainder);
        let location = match without_parens.find(DASHES) {
            Some(idx) => &without_parens[..idx],
            None => without_parens.as_str(),
        };
        collapse_whitespace(location)
    }

    /// Parenthetical content wins over the dash suffix
    fn extract_time(&self, heading: &str, remainder: &str) -> TimeOfDay {
        for m in self.parenthetical.find_iter(heading) {
            let inner = &heading[m.start() + 1..m.end() - 1];
            if let Some(time) = resolve_time(inner) {
                return time;
            }
        }

        if let Some(idx) = remainder.find(DASHES) {
            let suffix = self.remove_parentheticals(&remainder[idx..]);
            let suffix = suffix.trim_start_matches(DASHES);
            if let Some(time) = resolve_time(suffix) {
                return time;
            }
        }

        TimeOfDay::Unknown
    }

    fn remove_parentheticals(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        for m in self.parenthetical.find_iter(text) {
            result.push_str(&text[last..m.start()]);
            result.push(' ');
            last = m.end();
        }
        result.push_str(&text[last..]);
        result
    }
}

fn extract_scene_type(heading: &str) -> SceneType {
    let upper = heading.to_uppercase();
    let compact: String = upper.chars().filter(|c| !c.is_whitespace()).collect();

    let mixed = ["INT/EXT", "INT./EXT", "EXT/INT", "EXT./INT"];
    if mixed.iter().any(|form| compact.contains(form)) {
        SceneType::InteriorExterior
    } else if upper.contains("INT.") {
        SceneType::Interior
    } else if upper.contains("EXT.") {
        SceneType::Exterior
    } else {
        SceneType::Unknown
    }
}

/// Map a heading fragment onto the time-of-day vocabulary
pub fn resolve_time(fragment: &str) -> Option<TimeOfDay> {
    let upper = collapse_whitespace(&fragment.to_uppercase());
    if upper.is_empty() {
        return None;
    }

    if let Some((_, time)) = TIME_EXACT.iter().find(|(token, _)| *token == upper) {
        return Some(*time);
    }

    if upper.contains("CONT") {
        return Some(TimeOfDay::Continuous);
    }
    if upper.contains("LATER") {
        if upper.contains("MOMENT") {
            return Some(TimeOfDay::MomentsLater);
        }
        return Some(TimeOfDay::Later);
    }
    if upper.contains("SAME") && upper.contains("TIME") {
        return Some(TimeOfDay::SameTime);
    }

    TIME_SUBSTRINGS
        .iter()
        .find(|(token, _)| upper.contains(token))
        .map(|(_, time)| *time)
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
