// WHY: Screenplay text-to-structure inference: segmentation, attribution, pagination
// A parse is a pure function of (text, title, configuration)

use anyhow::Result;
use tracing::{info, warn};

pub mod classifier;
pub mod heading;
pub mod model;
pub mod pagination;
pub mod registry;
pub mod segmenter;
pub mod vocabulary;

pub use classifier::{ClassifierRules, LineClassifier, LineKind};
pub use heading::{HeadingParser, SceneHeading, SceneType, TimeOfDay};
pub use model::{BreakdownReport, Character, Document, ParseWarning, Scene, ScriptSummary};
pub use pagination::{Pages, PaginationRules};
pub use registry::{CharacterRegistry, MentionMatching};
pub use segmenter::{Segmentation, Segmenter};
pub use vocabulary::Vocabulary;

/// Complete parser configuration
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    pub classifier: ClassifierRules,
    pub pagination: PaginationRules,
    pub mentions: MentionMatching,
}

impl ParserConfig {
    pub fn with_mentions(mut self, mentions: MentionMatching) -> Self {
        self.mentions = mentions;
        self
    }
}

/// Reusable parser; immutable after construction and shareable across threads
#[derive(Debug)]
pub struct ScriptParser {
    classifier: LineClassifier,
    config: ParserConfig,
}

impl ScriptParser {
    pub fn new(config: ParserConfig) -> Result<Self> {
        let classifier = LineClassifier::new(config.classifier.clone(), Vocabulary::standard()?)?;
        Ok(Self { classifier, config })
    }

    pub fn with_default_rules() -> Result<Self> {
        Self::new(ParserConfig::default())
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Run segmentation only, before mention attribution and recount
    pub fn segment(&self, text: &str) -> Segmentation {
        Segmenter::new(&self.classifier, &self.config.pagination).run(text)
    }

    /// Parse screenplay text into a document
    pub fn parse(&self, text: &str, title: &str) -> Document {
        let Segmentation {
            mut scenes,
            mut registry,
            discarded_lines,
        } = self.segment(text);

        let mentioned = registry.attribute_mentions(&mut scenes, self.config.mentions);
        registry.recount_dialogue(&scenes, &self.classifier);

        let total_pages: Pages = scenes.iter().map(|s| s.page_count).sum();

        let mut warnings = Vec::new();
        if discarded_lines > 0 {
            if scenes.is_empty() {
                warn!(title, discarded_lines, "No scene heading found, all text discarded");
                warnings.push(ParseWarning::NoSceneHeading { discarded_lines });
            } else {
                warn!(title, discarded_lines, "Discarded text before first scene heading");
                warnings.push(ParseWarning::PreambleDiscarded { discarded_lines });
            }
        }

        info!(
            title,
            scenes = scenes.len(),
            characters = registry.len(),
            mention_attributions = mentioned,
            total_pages = %total_pages,
            "Parsed screenplay"
        );

        Document {
            title: title.to_string(),
            scenes,
            characters: registry.into_characters(),
            total_pages,
            warnings,
        }
    }
}

/// Parse with the default rules
pub fn parse(text: &str, title: &str) -> Result<Document> {
    Ok(ScriptParser::with_default_rules()?.parse(text, title))
}
