// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with script files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Create a script file with given content
    pub fn create_script<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        self.create_bytes(relative_path, content.as_bytes())
    }

    /// Create a file with raw bytes (for invalid encodings and fake PDFs)
    pub fn create_bytes<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Report path the CLI writes for a script
    pub fn report_path<P: AsRef<Path>>(&self, script_path: P) -> PathBuf {
        let script_path = script_path.as_ref();
        let file_stem = script_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        script_path.with_file_name(format!("{file_stem}_breakdown.json"))
    }

    pub fn report_exists<P: AsRef<Path>>(&self, script_path: P) -> bool {
        self.report_path(script_path).exists()
    }

    /// Read and parse a written report
    pub fn read_report<P: AsRef<Path>>(&self, script_path: P) -> serde_json::Value {
        let content = fs::read_to_string(self.report_path(script_path))
            .expect("Failed to read report");
        serde_json::from_str(&content).expect("Report should be valid JSON")
    }
}

/// Names of the characters in a document, in registry order
pub fn character_names(document: &breakdown::Document) -> Vec<String> {
    document.all_characters().map(|c| c.name.clone()).collect()
}
