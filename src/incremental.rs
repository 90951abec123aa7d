// WHY: Output-file naming and skip logic for directory runs
// A script is considered done once its `<stem>_breakdown.json` exists next to it

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::screenplay::{BreakdownReport, Document};

pub const OUTPUT_SUFFIX: &str = "_breakdown.json";

/// Generate the report path for a script
pub fn generate_output_path(script_path: &Path) -> PathBuf {
    let mut output_path = script_path.to_path_buf();
    let file_stem = title_from_path(script_path);
    output_path.set_file_name(format!("{file_stem}{OUTPUT_SUFFIX}"));
    output_path
}

/// Check if a report already exists for the given script
pub fn output_exists<P: AsRef<Path>>(script_path: P) -> bool {
    generate_output_path(script_path.as_ref()).exists()
}

/// Default document title: the script's file stem
pub fn title_from_path(script_path: &Path) -> String {
    script_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Render the `{screenplay, statistics}` report as pretty JSON
pub fn render_report(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(&BreakdownReport::new(document))
        .context("Failed to serialize breakdown report")
}

/// Write a report to an explicit location (async)
pub async fn write_report_to(path: &Path, document: &Document) -> Result<()> {
    let json = render_report(document)?;
    tokio::fs::write(path, format!("{json}\n"))
        .await
        .with_context(|| format!("Failed to write report {}", path.display()))
}

/// Write the report next to its script and return the report path
pub async fn write_report<P: AsRef<Path>>(script_path: P, document: &Document) -> Result<PathBuf> {
    let output_path = generate_output_path(script_path.as_ref());
    write_report_to(&output_path, document).await?;
    Ok(output_path)
}

/// Read a previously written report back as JSON
pub async fn read_output<P: AsRef<Path>>(script_path: P) -> Result<serde_json::Value> {
    let output_path = generate_output_path(script_path.as_ref());
    let content = tokio::fs::read_to_string(&output_path)
        .await
        .with_context(|| format!("Failed to read report {}", output_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in report {}", output_path.display()))
}
