/*!
 * Error types for script loading.
 *
 * Parsing itself never fails: malformed text yields a degenerate document.
 * These errors cover everything that happens before parsing is attempted.
 */

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreakdownError {
    /// Text could not be extracted from the script file
    #[error("Failed to extract text from {}: {reason}", path.display())]
    ExtractionFailed {
        path: PathBuf,
        reason: String,
    },

    /// File extension is not a supported script format
    #[error("Unsupported script format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BreakdownError {
    pub fn extraction(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ExtractionFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BreakdownError::extraction("script.pdf", "no text layer");
        assert_eq!(err.to_string(), "Failed to extract text from script.pdf: no text layer");

        let err = BreakdownError::UnsupportedFormat(PathBuf::from("notes.docx"));
        assert_eq!(err.to_string(), "Unsupported script format: notes.docx");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BreakdownError = io.into();
        assert!(matches!(err, BreakdownError::Io(_)));
    }
}
