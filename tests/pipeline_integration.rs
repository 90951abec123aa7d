use breakdown::{discovery, reader, screenplay, MentionMatching, Pages, ParseWarning, ParserConfig, SceneType, ScriptParser, TimeOfDay};

#[path = "integration/fixtures/mod.rs"]
mod fixtures;
use fixtures::*;

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{character_names, TestFixture};

fn appearances(document: &breakdown::Document, name: &str) -> Vec<u32> {
    document
        .character(name)
        .unwrap_or_else(|| panic!("Missing character {name}"))
        .scene_appearances
        .iter()
        .copied()
        .collect()
}

/// Test complete pipeline with the two-scene script
#[tokio::test]
async fn test_pipeline_two_scenes() {
    let fixture = TestFixture::new();
    let file_path = fixture.create_script("two.txt", TWO_SCENES);

    // Test discovery
    let files = discovery::find_script_files(&fixture.root_path).await
        .expect("Discovery should succeed");
    assert_eq!(files, vec![file_path.clone()]);

    // Test reading
    let content = reader::read_script_async(&file_path).await
        .expect("Script reading should succeed");
    assert_eq!(content, TWO_SCENES);

    // Test parsing
    let document = screenplay::parse(&content, "Two").expect("Parser creation should succeed");

    assert_eq!(document.scenes.len(), 2);
    assert_eq!(character_names(&document), vec!["JANE", "JOHN"]);
    assert_eq!(document.scenes[0].location, "KITCHEN");
    assert_eq!(document.scenes[0].time_of_day, TimeOfDay::Day);
    assert_eq!(document.scenes[1].location, "PARK");
    assert_eq!(document.scenes[1].time_of_day, TimeOfDay::Night);
    assert_eq!(appearances(&document, "JOHN"), vec![1]);
    assert_eq!(appearances(&document, "JANE"), vec![2]);
}

/// Full short film: preamble, transitions, extensions and action mentions
#[tokio::test]
async fn test_pipeline_short_film() {
    let fixture = TestFixture::new();
    let file_path = fixture.create_script("films/last_train.fountain", SHORT_FILM);

    let content = reader::read_script_async(&file_path).await
        .expect("Script reading should succeed");
    let document = screenplay::parse(&content, "The Last Train").expect("Parse should succeed");

    assert_eq!(document.scenes.len(), 3);
    assert_eq!(character_names(&document), vec!["CONDUCTOR", "MARGARET"]);
    assert_eq!(document.warnings, vec![ParseWarning::PreambleDiscarded { discarded_lines: 3 }]);
    assert!(!document.low_confidence());

    let station = &document.scenes[0];
    assert_eq!(station.scene_type, SceneType::Exterior);
    assert_eq!(station.location, "TRAIN STATION");
    assert_eq!(station.characters, vec!["MARGARET", "CONDUCTOR"]);
    assert_eq!(station.line_count, 10);

    let train = &document.scenes[1];
    assert_eq!(train.scene_type, SceneType::InteriorExterior);
    assert_eq!(train.location, "TRAIN CAR");
    assert_eq!(train.time_of_day, TimeOfDay::Continuous);
    assert_eq!(train.characters, vec!["CONDUCTOR", "MARGARET"]);

    // Conductor is only mentioned in action here and is recovered by the mention pass
    let dining = &document.scenes[2];
    assert_eq!(dining.location, "DINING CAR");
    assert_eq!(dining.time_of_day, TimeOfDay::Later);
    assert_eq!(dining.characters, vec!["CONDUCTOR"]);

    assert_eq!(appearances(&document, "CONDUCTOR"), vec![1, 2, 3]);
    assert_eq!(appearances(&document, "MARGARET"), vec![1, 2]);

    let margaret = document.character("MARGARET").unwrap();
    assert_eq!(margaret.cue_count, 3);
    assert_eq!(margaret.total_lines, 7);
    let conductor = document.character("CONDUCTOR").unwrap();
    assert_eq!(conductor.cue_count, 2);
    assert_eq!(conductor.total_lines, 4);
}

/// Page estimates and offsets for the short film
#[test]
fn test_short_film_pagination() {
    let document = screenplay::parse(SHORT_FILM, "The Last Train").unwrap();

    let pages: Vec<Pages> = document.scenes.iter().map(|s| s.page_count).collect();
    assert_eq!(pages, vec![Pages(21), Pages(12), Pages(7)]);
    assert_eq!(document.total_pages, Pages(40));

    let starts: Vec<Pages> = document.scenes.iter().map(|s| s.start_page).collect();
    assert_eq!(starts, vec![Pages(0), Pages(21), Pages(33)]);
    assert_eq!(document.scenes[2].end_page, document.total_pages);

    let minutes: Vec<f64> = document
        .scenes
        .iter()
        .map(|s| s.estimated_duration.as_secs_f64() / 60.0)
        .collect();
    assert!((minutes[0] - 0.63).abs() < 1e-9);
    assert!((minutes[1] - 0.5).abs() < 1e-9);
    assert!((minutes[2] - 0.5).abs() < 1e-9);
}

#[test]
fn test_heading_variants() {
    let document = screenplay::parse(HEADING_VARIANTS, "Variants").unwrap();
    assert_eq!(document.scenes.len(), 4);

    let summary: Vec<(SceneType, &str, TimeOfDay)> = document
        .scenes
        .iter()
        .map(|s| (s.scene_type, s.location.as_str(), s.time_of_day))
        .collect();
    assert_eq!(
        summary,
        vec![
            (SceneType::Interior, "OFFICE", TimeOfDay::Morning),
            (SceneType::Exterior, "ROOFTOP", TimeOfDay::Dusk),
            (SceneType::Unknown, "HALLWAY", TimeOfDay::SameTime),
            (SceneType::Interior, "basement", TimeOfDay::Night),
        ]
    );
    assert_eq!(character_names(&document), vec!["BOSS"]);
}

#[test]
fn test_prose_is_low_confidence() {
    let document = screenplay::parse(PROSE, "Prose").unwrap();
    assert!(document.scenes.is_empty());
    assert!(document.characters.is_empty());
    assert_eq!(document.total_pages, Pages::ZERO);
    assert!(document.low_confidence());
    assert_eq!(document.warnings, vec![ParseWarning::NoSceneHeading { discarded_lines: 4 }]);
}

#[test]
fn test_case_insensitive_mentions_recover_more() {
    let text = "INT. LAB - DAY\nDR. REYES\nReady.\n\nEXT. LAB - NIGHT\nDr. Reyes locks the gate.";

    let strict = screenplay::parse(text, "Lab").unwrap();
    assert_eq!(appearances(&strict, "DR. REYES"), vec![1]);

    let parser = ScriptParser::new(ParserConfig::default().with_mentions(MentionMatching::CaseInsensitive))
        .unwrap();
    let relaxed = parser.parse(text, "Lab");
    assert_eq!(appearances(&relaxed, "DR. REYES"), vec![1, 2]);
}

#[tokio::test]
async fn test_pipeline_multiple_formats_discovered() {
    let fixture = TestFixture::new();
    fixture.create_script("a/one.txt", TWO_SCENES);
    fixture.create_script("b/two.fountain", SHORT_FILM);
    fixture.create_script("b/notes.md", "not a script");

    let files = discovery::find_script_files(&fixture.root_path).await.unwrap();
    assert_eq!(files.len(), 2);

    for file in &files {
        let content = reader::read_script_async(file).await.unwrap();
        let document = screenplay::parse(&content, "x").unwrap();
        assert!(!document.scenes.is_empty(), "No scenes in {}", file.display());
    }
}
