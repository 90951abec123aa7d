// WHY: Batch breakdown of many scripts with bounded concurrency and per-script statistics
// Shared by the CLI directory mode, benchmarks and integration tests

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::incremental::{output_exists, title_from_path, write_report};
use crate::reader::{ReaderConfig, ScriptReader};
use crate::screenplay::ScriptParser;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Success,
    Skipped,
    Failed,
}

/// Per-script processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScriptStats {
    pub path: String,
    pub title: String,
    /// Number of characters of extracted text
    pub chars_processed: u64,
    pub scenes_detected: u64,
    pub characters_detected: u64,
    pub total_pages: f64,
    /// No scene heading found anywhere in the text
    pub low_confidence: bool,
    pub read_time_ms: u64,
    /// Parse time in milliseconds (subset of processing_time_ms)
    pub parse_time_ms: u64,
    pub processing_time_ms: u64,
    pub chars_per_sec: f64,
    pub status: ProcessingStatus,
    pub output_path: Option<String>,
    /// Error message if processing failed
    pub error: Option<String>,
}

impl ScriptStats {
    fn new(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            title: title_from_path(path),
            chars_processed: 0,
            scenes_detected: 0,
            characters_detected: 0,
            total_pages: 0.0,
            low_confidence: false,
            read_time_ms: 0,
            parse_time_ms: 0,
            processing_time_ms: 0,
            chars_per_sec: 0.0,
            status: ProcessingStatus::Skipped,
            output_path: None,
            error: None,
        }
    }

    fn failed(mut self, error: impl ToString, started: Instant) -> Self {
        self.status = ProcessingStatus::Failed;
        self.error = Some(error.to_string());
        self.processing_time_ms = started.elapsed().as_millis() as u64;
        self
    }
}

/// Aggregate statistics for one CLI run
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunStats {
    /// Seconds since the Unix epoch
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub total_chars_processed: u64,
    pub total_scenes_detected: u64,
    pub total_characters_detected: u64,
    pub overall_chars_per_sec: f64,
    pub files_processed: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub file_stats: Vec<ScriptStats>,
}

impl RunStats {
    fn from_scripts(run_start: u64, elapsed_ms: u64, mut file_stats: Vec<ScriptStats>) -> Self {
        file_stats.sort_by(|a, b| a.path.cmp(&b.path));

        let count = |status: ProcessingStatus| file_stats.iter().filter(|s| s.status == status).count() as u64;
        let total_chars_processed: u64 = file_stats.iter().map(|s| s.chars_processed).sum();

        Self {
            run_start,
            total_processing_time_ms: elapsed_ms,
            total_chars_processed,
            total_scenes_detected: file_stats.iter().map(|s| s.scenes_detected).sum(),
            total_characters_detected: file_stats.iter().map(|s| s.characters_detected).sum(),
            overall_chars_per_sec: chars_per_sec(total_chars_processed, elapsed_ms),
            files_processed: count(ProcessingStatus::Success),
            files_skipped: count(ProcessingStatus::Skipped),
            files_failed: count(ProcessingStatus::Failed),
            file_stats,
        }
    }
}

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Scripts in flight at once
    pub max_concurrent: usize,
    /// Reprocess scripts whose report already exists
    pub overwrite_all: bool,
    /// Abort the run on the first failed script
    pub fail_fast: bool,
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: num_cpus::get(),
            overwrite_all: false,
            fail_fast: false,
            show_progress: true,
        }
    }
}

/// True if the script still needs a report
pub fn should_process_file(script_path: &Path, overwrite_all: bool) -> bool {
    overwrite_all || !output_exists(script_path)
}

/// Break down every script, writing `<stem>_breakdown.json` next to each one
pub async fn process_scripts_parallel(
    scripts: &[PathBuf],
    parser: Arc<ScriptParser>,
    config: &BatchConfig,
) -> Result<RunStats> {
    let run_start = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let started = Instant::now();
    let reader = Arc::new(ScriptReader::new(ReaderConfig::default()));
    let progress = progress_bar(scripts.len() as u64, config.show_progress);

    info!(
        scripts = scripts.len(),
        max_concurrent = config.max_concurrent,
        "Starting batch breakdown"
    );

    let mut results = stream::iter(scripts.iter().cloned())
        .map(|path| {
            let parser = Arc::clone(&parser);
            let reader = Arc::clone(&reader);
            let overwrite_all = config.overwrite_all;
            async move { process_single_script(&path, parser, reader, overwrite_all).await }
        })
        .buffer_unordered(config.max_concurrent.max(1));

    let mut file_stats = Vec::with_capacity(scripts.len());
    while let Some(stats) = results.next().await {
        progress.inc(1);
        progress.set_message(stats.title.clone());

        if stats.status == ProcessingStatus::Failed && config.fail_fast {
            progress.abandon_with_message("Aborted");
            anyhow::bail!(
                "Failed to process {}: {}",
                stats.path,
                stats.error.as_deref().unwrap_or("unknown error")
            );
        }
        file_stats.push(stats);
    }
    progress.finish_with_message("Breakdown complete");

    let run = RunStats::from_scripts(run_start, started.elapsed().as_millis() as u64, file_stats);
    info!(
        processed = run.files_processed,
        skipped = run.files_skipped,
        failed = run.files_failed,
        total_ms = run.total_processing_time_ms,
        "Batch breakdown complete"
    );
    Ok(run)
}

async fn process_single_script(
    path: &Path,
    parser: Arc<ScriptParser>,
    reader: Arc<ScriptReader>,
    overwrite_all: bool,
) -> ScriptStats {
    let started = Instant::now();
    let mut stats = ScriptStats::new(path);

    if !should_process_file(path, overwrite_all) {
        debug!("Skipping {}: report already exists", path.display());
        return stats;
    }

    let read_started = Instant::now();
    let text = match reader.read_script(path).await {
        Ok((text, _)) => text,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return stats.failed(e, started);
        }
    };
    stats.read_time_ms = read_started.elapsed().as_millis() as u64;
    stats.chars_processed = text.chars().count() as u64;

    // WHY: parsing is CPU-bound; keep it off the async workers
    let parse_started = Instant::now();
    let title = stats.title.clone();
    let document = match tokio::task::spawn_blocking(move || parser.parse(&text, &title)).await {
        Ok(document) => document,
        Err(e) => {
            warn!("Parse task failed for {}: {}", path.display(), e);
            return stats.failed(e, started);
        }
    };
    stats.parse_time_ms = parse_started.elapsed().as_millis() as u64;

    stats.scenes_detected = document.scenes.len() as u64;
    stats.characters_detected = document.characters.len() as u64;
    stats.total_pages = document.total_pages.as_f64();
    stats.low_confidence = document.low_confidence();

    match write_report(path, &document).await {
        Ok(output_path) => stats.output_path = Some(output_path.display().to_string()),
        Err(e) => {
            warn!("Failed to write report for {}: {:#}", path.display(), e);
            return stats.failed(format!("{e:#}"), started);
        }
    }

    stats.status = ProcessingStatus::Success;
    stats.processing_time_ms = started.elapsed().as_millis() as u64;
    stats.chars_per_sec = chars_per_sec(stats.chars_processed, stats.processing_time_ms);
    stats
}

/// Write run statistics as pretty JSON
pub async fn write_run_stats(stats_path: &Path, stats: &RunStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).context("Failed to serialize run stats")?;
    let file = tokio::fs::File::create(stats_path)
        .await
        .with_context(|| format!("Failed to create stats file {}", stats_path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} scripts ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style.progress_chars("=>-"));
    progress
}

fn chars_per_sec(chars: u64, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 {
        chars as f64 * 1000.0
    } else {
        chars as f64 / (elapsed_ms as f64 / 1000.0)
    }
}
