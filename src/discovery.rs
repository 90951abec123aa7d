use anyhow::Result;
use futures::stream::{Stream, StreamExt};
use glob::glob;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::reader::ScriptFormat;

/// Configuration for script discovery behavior
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
}

/// Result of script discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub format: Option<ScriptFormat>,
    pub error: Option<String>,
}

impl FileValidation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Discovers `**/*.pdf`, `**/*.txt` and `**/*.fountain` under the root directory.
/// Returns an async stream of validated script paths.
pub fn discover_scripts(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();

    futures::stream::unfold(
        DiscoveryState::new(root_path, config),
        |mut state| async move {
            state.next_file().await.map(|result| (result, state))
        }
    )
}

/// Internal state for discovery iteration: one glob per extension, walked in turn
struct DiscoveryState {
    root_dir: PathBuf,
    config: DiscoveryConfig,
    pending_patterns: VecDeque<String>,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(root_dir: PathBuf, config: DiscoveryConfig) -> Self {
        // WHY: glob escapes keep root directories with brackets or stars literal
        let escaped_root = glob::Pattern::escape(&root_dir.display().to_string());
        let pending_patterns = ScriptFormat::EXTENSIONS
            .iter()
            .map(|ext| format!("{escaped_root}/**/*.{ext}"))
            .collect();

        Self {
            root_dir,
            config,
            pending_patterns,
            glob_iter: None,
        }
    }

    async fn next_file(&mut self) -> Option<Result<FileValidation>> {
        loop {
            if self.glob_iter.is_none() {
                let pattern = self.pending_patterns.pop_front()?;
                debug!("Starting script discovery with pattern: {}", pattern);

                match glob(&pattern) {
                    Ok(paths) => self.glob_iter = Some(paths),
                    Err(e) => {
                        return Some(Err(anyhow::anyhow!("Failed to create glob pattern: {}", e)));
                    }
                }
            }

            let next = self.glob_iter.as_mut().and_then(|paths| paths.next());
            match next {
                Some(Ok(path)) => {
                    debug!("Found script: {}", path.display());
                    return Some(self.validate_file(path).await);
                }
                Some(Err(e)) => {
                    let error_msg = format!("Glob iteration error: {e}");
                    warn!("{}", error_msg);

                    if self.config.fail_fast {
                        return Some(Err(anyhow::anyhow!(error_msg)));
                    }
                }
                None => {
                    self.glob_iter = None;
                    if self.pending_patterns.is_empty() {
                        info!("Script discovery completed for root: {}", self.root_dir.display());
                        return None;
                    }
                }
            }
        }
    }

    async fn validate_file(&self, path: PathBuf) -> Result<FileValidation> {
        let format = ScriptFormat::from_path(&path);

        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(FileValidation {
                path,
                format,
                error: None,
            }),
            Ok(_) => {
                let error = format!("Path is not a file: {}", path.display());
                warn!("{}", error);
                Ok(FileValidation {
                    path,
                    format,
                    error: Some(error),
                })
            }
            Err(e) => {
                let error = format!("Cannot access file {}: {}", path.display(), e);
                warn!("{}", error);

                if self.config.fail_fast {
                    Err(anyhow::anyhow!(error))
                } else {
                    Ok(FileValidation {
                        path,
                        format,
                        error: Some(error),
                    })
                }
            }
        }
    }
}

/// Collect all discovered scripts, sorted by path
pub async fn collect_discovered_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(discover_scripts(root_dir, config));

    while let Some(result) = stream.next().await {
        files.push(result?);
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let valid_count = files.iter().filter(|f| f.is_valid()).count();
    let invalid_count = files.len() - valid_count;

    if invalid_count > 0 {
        warn!("Found {} scripts with validation issues", invalid_count);
    }

    info!("Script discovery summary: {} valid, {} invalid", valid_count, invalid_count);

    Ok(files)
}

/// Paths of all valid scripts under the root
pub async fn find_script_files(root_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let files = collect_discovered_files(root_dir, DiscoveryConfig::default()).await?;
    Ok(files
        .into_iter()
        .filter(FileValidation::is_valid)
        .map(|f| f.path)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
        let file_path = dir.join(relative);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(&file_path, content).await.unwrap();
        file_path
    }

    #[tokio::test]
    async fn test_discovers_all_script_formats() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        create_test_file(root, "a/script.txt", "INT. A - DAY").await;
        create_test_file(root, "b/deep/pilot.fountain", "EXT. B - NIGHT").await;
        create_test_file(root, "c/draft.pdf", "%PDF-1.4").await;
        create_test_file(root, "c/draft_breakdown.json", "{}").await;
        create_test_file(root, "notes.md", "# notes").await;

        let files = collect_discovered_files(root, DiscoveryConfig::default()).await.unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.is_valid()));
        let formats: Vec<_> = files.iter().map(|f| f.format).collect();
        assert_eq!(
            formats,
            vec![Some(ScriptFormat::Text), Some(ScriptFormat::Fountain), Some(ScriptFormat::Pdf)]
        );
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = find_script_files(temp_dir.path()).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_directory_with_script_extension_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("folder.txt")).await.unwrap();
        create_test_file(temp_dir.path(), "real.txt", "text").await;

        let files = collect_discovered_files(temp_dir.path(), DiscoveryConfig::default())
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
        let invalid: Vec<_> = files.iter().filter(|f| !f.is_valid()).collect();
        assert_eq!(invalid.len(), 1);
        assert!(invalid[0].path.ends_with("folder.txt"));

        let valid = find_script_files(temp_dir.path()).await.unwrap();
        assert_eq!(valid.len(), 1);
        assert!(valid[0].ends_with("real.txt"));
    }
}
