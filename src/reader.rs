use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::errors::BreakdownError;

/// Script file formats recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFormat {
    Pdf,
    Text,
    Fountain,
}

impl ScriptFormat {
    pub const EXTENSIONS: &'static [&'static str] = &["pdf", "txt", "fountain"];

    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            "fountain" => Some(Self::Fountain),
            _ => None,
        }
    }
}

/// Configuration for script reading
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Buffer size for async text reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { buffer_size: 8192 }
    }
}

/// Statistics for one script read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub format: ScriptFormat,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
}

/// Loads script text from plain-text or PDF files
pub struct ScriptReader {
    config: ReaderConfig,
}

impl ScriptReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a script's text; the format comes from the file extension
    pub async fn read_script<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<(String, ReadStats), BreakdownError> {
        let path = file_path.as_ref();
        let start_time = Instant::now();

        let format = ScriptFormat::from_path(path)
            .ok_or_else(|| BreakdownError::UnsupportedFormat(path.to_path_buf()))?;

        debug!("Starting read of {:?} script: {}", format, path.display());

        let (text, bytes_read) = match format {
            ScriptFormat::Pdf => self.read_pdf(path).await?,
            ScriptFormat::Text | ScriptFormat::Fountain => self.read_text(path).await?,
        };

        if text.trim().is_empty() {
            warn!("No text extracted from {}", path.display());
        }

        let stats = ReadStats {
            file_path: path.display().to_string(),
            format,
            lines_read: text.lines().count() as u64,
            bytes_read,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Read {}: {} lines, {} bytes in {}ms",
            path.display(),
            stats.lines_read,
            stats.bytes_read,
            stats.duration_ms
        );

        Ok((text, stats))
    }

    async fn read_text(&self, path: &Path) -> Result<(String, u64), BreakdownError> {
        let file = File::open(path).await?;

        // WHY: BufReader with custom buffer size reduces syscalls for large scripts
        let reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut lines = reader.lines();
        let mut text = String::new();
        let mut byte_count = 0u64;
        let mut line_count = 0u64;

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    byte_count += line.len() as u64 + 1;
                    line_count += 1;
                    if line_count > 1 {
                        text.push('\n');
                    }
                    text.push_str(&line);
                }
                Ok(None) => break,
                Err(e) => {
                    return Err(BreakdownError::extraction(
                        path,
                        format!("decoding error at line {}: {}", line_count + 1, e),
                    ));
                }
            }
        }

        Ok((text, byte_count))
    }

    async fn read_pdf(&self, path: &Path) -> Result<(String, u64), BreakdownError> {
        let bytes = tokio::fs::read(path).await?;
        let byte_count = bytes.len() as u64;
        let owned_path: PathBuf = path.to_path_buf();

        // WHY: extraction is CPU-bound and may panic on malformed input; keep it off the runtime
        let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| BreakdownError::extraction(&owned_path, format!("extraction task failed: {e}")))?
            .map_err(|e| BreakdownError::extraction(&owned_path, e))?;

        // Page breaks arrive as form feeds
        Ok((extracted.replace('\x0C', "\n"), byte_count))
    }
}

/// Convenience function for reading a single script with default configuration
pub async fn read_script_async<P: AsRef<Path>>(file_path: P) -> Result<String, BreakdownError> {
    let reader = ScriptReader::new(ReaderConfig::default());
    let (text, _stats) = reader.read_script(file_path).await?;
    Ok(text)
}
