// WHY: Parsed screenplay data and the JSON shapes written for each script
// Characters live in a name-keyed map but serialize as a sorted array

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use super::heading::{SceneType, TimeOfDay};
use super::pagination::{serialize_minutes, Pages};

/// One contiguous scene, opened by a heading and closed by the next
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// 1-based, in discovery order
    pub sequence_number: u32,
    pub scene_type: SceneType,
    pub location: String,
    pub time_of_day: TimeOfDay,
    pub heading: String,
    /// Raw lines starting with the heading; empty strings mark paragraph breaks
    #[serde(skip)]
    pub lines: Vec<String>,
    /// Non-blank lines in the scene, heading included
    pub line_count: usize,
    pub page_count: Pages,
    pub start_page: Pages,
    pub end_page: Pages,
    /// Cue speakers in order of first cue, then action mentions in name order
    pub characters: Vec<String>,
    #[serde(rename = "estimated_minutes", serialize_with = "serialize_minutes")]
    pub estimated_duration: Duration,
}

impl Scene {
    pub fn has_character(&self, name: &str) -> bool {
        self.characters.iter().any(|c| c == name)
    }

    /// Adds the character once, keeping first-seen order
    pub(crate) fn add_character(&mut self, name: &str) -> bool {
        if self.has_character(name) {
            return false;
        }
        self.characters.push(name.to_string());
        true
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A speaking role identified by its canonical cue name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub name: String,
    pub scene_appearances: BTreeSet<u32>,
    /// Dialogue lines from the post-parse recount
    pub total_lines: usize,
    /// Running tally kept while segmenting
    pub cue_count: usize,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scene_appearances: BTreeSet::new(),
            total_lines: 0,
            cue_count: 0,
        }
    }
}

/// Non-fatal conditions noticed during a parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// No scene heading anywhere; all text was discarded
    NoSceneHeading { discarded_lines: usize },
    /// Text before the first heading was discarded
    PreambleDiscarded { discarded_lines: usize },
}

/// Parsed screenplay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub scenes: Vec<Scene>,
    #[serde(serialize_with = "serialize_characters")]
    pub characters: BTreeMap<String, Character>,
    pub total_pages: Pages,
    pub warnings: Vec<ParseWarning>,
}

impl Document {
    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    /// Characters sorted by name
    pub fn all_characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn character_names(&self) -> Vec<&str> {
        self.characters.keys().map(String::as_str).collect()
    }

    /// True when the text held no recognizable screenplay structure
    pub fn low_confidence(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, ParseWarning::NoSceneHeading { .. }))
    }

    pub fn total_duration(&self) -> Duration {
        self.scenes.iter().map(|s| s.estimated_duration).sum()
    }

    pub fn summary(&self) -> ScriptSummary {
        ScriptSummary {
            total_scenes: self.scenes.len(),
            total_characters: self.characters.len(),
            total_pages: self.total_pages,
            total_duration: self.total_duration(),
            character_scene_count: self
                .characters
                .values()
                .map(|c| (c.name.clone(), c.scene_appearances.len()))
                .collect(),
        }
    }
}

/// Aggregate figures reported next to a parsed script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptSummary {
    pub total_scenes: usize,
    pub total_characters: usize,
    pub total_pages: Pages,
    #[serde(rename = "total_estimated_minutes", serialize_with = "serialize_minutes")]
    pub total_duration: Duration,
    pub character_scene_count: BTreeMap<String, usize>,
}

/// Report written by the CLI for each script
#[derive(Debug, Serialize)]
pub struct BreakdownReport<'a> {
    pub screenplay: &'a Document,
    pub statistics: ScriptSummary,
}

impl<'a> BreakdownReport<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            screenplay: document,
            statistics: document.summary(),
        }
    }
}

fn serialize_characters<S: Serializer>(
    characters: &BTreeMap<String, Character>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(characters.len()))?;
    for character in characters.values() {
        seq.serialize_element(character)?;
    }
    seq.end()
}
