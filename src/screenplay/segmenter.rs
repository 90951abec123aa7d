// WHY: Single forward pass turning a flat line stream into ordered scenes
// State is the open scene, its buffer and the active speaker; nothing looks ahead

use tracing::{debug, trace};

use super::classifier::{LineClassifier, LineKind};
use super::heading::SceneHeading;
use super::model::Scene;
use super::pagination::{LineTally, PageCursor, PaginationRules};
use super::registry::CharacterRegistry;

/// Result of the segmentation pass
#[derive(Debug)]
pub struct Segmentation {
    pub scenes: Vec<Scene>,
    /// Pass-1 registry: characters with at least one cue
    pub registry: CharacterRegistry,
    /// Non-blank lines seen while no scene was open
    pub discarded_lines: usize,
}

/// Scene still receiving lines
#[derive(Debug)]
struct OpenScene {
    sequence_number: u32,
    heading: SceneHeading,
    lines: Vec<String>,
    line_count: usize,
    tally: LineTally,
    characters: Vec<String>,
}

impl OpenScene {
    fn new(sequence_number: u32, heading: SceneHeading) -> Self {
        Self {
            sequence_number,
            heading,
            lines: Vec::new(),
            line_count: 0,
            tally: LineTally::default(),
            characters: Vec::new(),
        }
    }
}

pub struct Segmenter<'a> {
    classifier: &'a LineClassifier,
    pagination: &'a PaginationRules,
    scenes: Vec<Scene>,
    registry: CharacterRegistry,
    cursor: PageCursor,
    open: Option<OpenScene>,
    active_speaker: Option<String>,
    discarded_lines: usize,
}

impl<'a> Segmenter<'a> {
    pub fn new(classifier: &'a LineClassifier, pagination: &'a PaginationRules) -> Self {
        Self {
            classifier,
            pagination,
            scenes: Vec::new(),
            registry: CharacterRegistry::new(),
            cursor: PageCursor::default(),
            open: None,
            active_speaker: None,
            discarded_lines: 0,
        }
    }

    /// Segment a whole text in one pass
    pub fn run(mut self, text: &str) -> Segmentation {
        for line in text.lines() {
            self.feed(line);
        }
        self.finish()
    }

    pub fn feed(&mut self, raw: &str) {
        let line = raw.trim();

        if line.is_empty() {
            // Paragraph break: kept for dialogue blocks, never changes the speaker
            if let Some(scene) = self.open.as_mut() {
                scene.lines.push(String::new());
                scene.tally.observe_blank();
            }
            return;
        }

        match self.classifier.classify(line, self.open.is_some()) {
            LineKind::SceneHeading => {
                self.close_scene();
                let number = self.next_sequence_number();
                let heading = self.classifier.headings().parse(line);
                self.open = Some(OpenScene::new(number, heading));
                self.active_speaker = None;
            }
            LineKind::CharacterCue(name) => {
                // Cues are only produced while a scene is open
                if let Some(scene) = self.open.as_mut() {
                    self.registry.register_cue(&name, scene.sequence_number);
                    if !scene.characters.contains(&name) {
                        scene.characters.push(name.clone());
                    }
                    scene.tally.observe_cue();
                }
                trace!(cue = %name, "Active speaker");
                self.active_speaker = Some(name);
            }
            LineKind::Action => {
                self.active_speaker = None;
                match self.open.as_mut() {
                    Some(scene) => scene.tally.observe_line(),
                    None => {
                        self.discarded_lines += 1;
                        return;
                    }
                }
            }
        }

        let Some(scene) = self.open.as_mut() else {
            return;
        };
        if scene.lines.is_empty() {
            // Heading line opens the buffer and counts as action text
            scene.tally.observe_line();
        }
        scene.lines.push(raw.trim_end().to_string());
        scene.line_count += 1;

        if let Some(name) = &self.active_speaker {
            self.registry.tally_line(name);
        }
    }

    pub fn finish(mut self) -> Segmentation {
        self.close_scene();
        debug!(
            scenes = self.scenes.len(),
            characters = self.registry.len(),
            discarded_lines = self.discarded_lines,
            "Segmentation complete"
        );
        Segmentation {
            scenes: self.scenes,
            registry: self.registry,
            discarded_lines: self.discarded_lines,
        }
    }

    fn next_sequence_number(&self) -> u32 {
        u32::try_from(self.scenes.len() + 1).unwrap_or(u32::MAX)
    }

    fn close_scene(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };

        let page_count = self.pagination.estimate_pages(&open.tally);
        let (start_page, end_page) = self.cursor.advance(page_count);
        let estimated_duration = self.pagination.estimate_duration(page_count);

        debug!(
            scene = open.sequence_number,
            heading = %open.heading.raw,
            lines = open.line_count,
            dialogue_lines = open.tally.dialogue,
            action_lines = open.tally.action,
            pages = %page_count,
            "Scene finalized"
        );

        self.scenes.push(Scene {
            sequence_number: open.sequence_number,
            scene_type: open.heading.scene_type,
            location: open.heading.location,
            time_of_day: open.heading.time_of_day,
            heading: open.heading.raw,
            lines: open.lines,
            line_count: open.line_count,
            page_count,
            start_page,
            end_page,
            characters: open.characters,
            estimated_duration,
        });
    }
}
