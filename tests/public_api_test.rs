// Tests for the public library surface used by external callers
// WHY: Re-exported functions and types must keep working without the CLI

use breakdown::incremental::{generate_output_path, output_exists, read_output, render_report, write_report};
use breakdown::{
    parse, BreakdownReport, MentionMatching, Pages, ParserConfig, ScriptParser, ScriptSummary,
};
use std::sync::Arc;
use tempfile::TempDir;

const SCRIPT: &str = "INT. DINER - NIGHT\nLOU\nCoffee?\n\nEXT. DINER - NIGHT\nLOU locks up.";

#[test]
fn test_output_file_operations() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let source_file = temp_dir.path().join("diner.fountain");
    std::fs::write(&source_file, SCRIPT).expect("Failed to write source file");

    let output_path = generate_output_path(&source_file);
    assert!(output_path.to_string_lossy().ends_with("diner_breakdown.json"));
    assert!(!output_exists(&source_file), "Report should not exist initially");
}

#[tokio::test]
async fn test_write_then_read_report() {
    let temp_dir = TempDir::new().unwrap();
    let source_file = temp_dir.path().join("diner.txt");
    let document = parse(SCRIPT, "Diner").unwrap();

    let written = write_report(&source_file, &document).await.unwrap();
    assert_eq!(written, generate_output_path(&source_file));
    assert!(output_exists(&source_file));

    let json = read_output(&source_file).await.unwrap();
    assert_eq!(json["screenplay"]["title"], "Diner");
    assert_eq!(json["screenplay"]["scenes"].as_array().unwrap().len(), 2);
    assert_eq!(json["screenplay"]["characters"][0]["name"], "LOU");
    assert_eq!(json["screenplay"]["characters"][0]["scene_appearances"], serde_json::json!([1, 2]));
    assert_eq!(json["statistics"]["character_scene_count"]["LOU"], 2);
}

#[test]
fn test_render_report_shape() {
    let document = parse(SCRIPT, "Diner").unwrap();
    let json: serde_json::Value = serde_json::from_str(&render_report(&document).unwrap()).unwrap();

    let scene = &json["screenplay"]["scenes"][0];
    for key in [
        "sequence_number",
        "scene_type",
        "location",
        "time_of_day",
        "heading",
        "characters",
        "line_count",
        "page_count",
        "start_page",
        "end_page",
        "estimated_minutes",
    ] {
        assert!(scene.get(key).is_some(), "Missing scene field {key}");
    }
    assert_eq!(scene["heading"], "INT. DINER - NIGHT");
    assert!(json["screenplay"]["warnings"].as_array().unwrap().is_empty());
    assert!(json["statistics"]["total_estimated_minutes"].as_f64().unwrap() >= 1.0);
}

#[test]
fn test_summary_matches_document() {
    let document = parse(SCRIPT, "Diner").unwrap();
    let summary: ScriptSummary = document.summary();

    assert_eq!(summary.total_scenes, document.scenes.len());
    assert_eq!(summary.total_characters, document.characters.len());
    assert_eq!(summary.total_pages, document.total_pages);
    assert_eq!(summary.total_duration, document.total_duration());

    let report = BreakdownReport::new(&document);
    assert_eq!(report.statistics, summary);
}

/// A single parser can be shared across threads
#[test]
fn test_parser_is_shareable() {
    let parser = Arc::new(
        ScriptParser::new(ParserConfig::default().with_mentions(MentionMatching::CaseSensitive)).unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = Arc::clone(&parser);
            std::thread::spawn(move || parser.parse(SCRIPT, &format!("copy {i}")).total_pages)
        })
        .collect();

    let totals: Vec<Pages> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(totals.windows(2).all(|w| w[0] == w[1]));
}
