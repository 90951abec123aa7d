// WHY: Distinct character set plus the post-segmentation attribution passes
// Mention scanning only ever adds (character, scene) pairs, never removes them

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use super::classifier::LineClassifier;
use super::model::{Character, Scene};

/// How character names are matched against action text in the mention pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MentionMatching {
    /// Canonical uppercase name must appear verbatim
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

#[derive(Debug, Clone, Default)]
pub struct CharacterRegistry {
    characters: BTreeMap<String, Character>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cue: register the character if new and note the scene once
    pub fn register_cue(&mut self, name: &str, scene: u32) {
        let character = self
            .characters
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(name, scene, "New character");
                Character::new(name)
            });
        character.scene_appearances.insert(scene);
    }

    /// Bump the inline tally for the active speaker
    pub fn tally_line(&mut self, name: &str) {
        if let Some(character) = self.characters.get_mut(name) {
            character.cue_count += 1;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.characters.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Every (character, scene) pair currently recorded
    pub fn appearance_pairs(&self) -> BTreeSet<(String, u32)> {
        self.characters
            .values()
            .flat_map(|c| c.scene_appearances.iter().map(move |&s| (c.name.clone(), s)))
            .collect()
    }

    /// Second pass: attach characters named in scenes where they never spoke
    ///
    /// Returns the number of (character, scene) pairs added.
    pub fn attribute_mentions(&mut self, scenes: &mut [Scene], matching: MentionMatching) -> usize {
        let matchers: Vec<(String, Regex)> = self
            .characters
            .keys()
            .filter_map(|name| match mention_pattern(name, matching) {
                Ok(regex) => Some((name.clone(), regex)),
                Err(e) => {
                    warn!(name = %name, error = %e, "Skipping mention scan for character");
                    None
                }
            })
            .collect();

        let mut added = 0;
        for scene in scenes.iter_mut() {
            let text = scene.text();
            for (name, regex) in &matchers {
                if scene.has_character(name) || !regex.is_match(&text) {
                    continue;
                }
                scene.add_character(name);
                if let Some(character) = self.characters.get_mut(name) {
                    character.scene_appearances.insert(scene.sequence_number);
                }
                debug!(name = %name, scene = scene.sequence_number, "Attributed by mention");
                added += 1;
            }
        }
        added
    }

    /// Authoritative dialogue line count from the finalized scene buffers
    ///
    /// A cue line for a known character opens a block; the cue and every
    /// following non-blank line up to a blank line or the next cue count.
    pub fn recount_dialogue(&mut self, scenes: &[Scene], classifier: &LineClassifier) {
        for character in self.characters.values_mut() {
            character.total_lines = 0;
        }

        for scene in scenes {
            let mut speaker: Option<String> = None;
            for line in &scene.lines {
                if line.trim().is_empty() {
                    speaker = None;
                    continue;
                }
                if let Some(name) = classifier
                    .character_cue(line)
                    .filter(|name| self.characters.contains_key(name))
                {
                    speaker = Some(name);
                }
                if let Some(character) = speaker.as_ref().and_then(|n| self.characters.get_mut(n)) {
                    character.total_lines += 1;
                }
            }
        }
    }

    pub fn into_characters(self) -> BTreeMap<String, Character> {
        self.characters
    }
}

fn mention_pattern(name: &str, matching: MentionMatching) -> Result<Regex, regex::Error> {
    let flags = match matching {
        MentionMatching::CaseSensitive => "",
        MentionMatching::CaseInsensitive => "(?i)",
    };
    Regex::new(&format!(r"{flags}(?:^|[^\w])(?:{})(?:[^\w]|$)", regex::escape(name)))
}
