pub mod discovery;
pub mod errors;
pub mod incremental;
pub mod parallel_processing;
pub mod reader;
pub mod screenplay;

// Re-export main types for convenient access
pub use errors::BreakdownError;
pub use screenplay::{
    parse, BreakdownReport, Character, Document, LineClassifier, MentionMatching, Pages, ParseWarning,
    ParserConfig, Scene, SceneType, ScriptParser, ScriptSummary, TimeOfDay,
};

// Re-export reading and incremental utilities
pub use reader::{read_script_async, ScriptFormat, ScriptReader};
pub use incremental::{generate_output_path, output_exists, read_output, render_report, write_report};

// Re-export batch processing types and functions for benchmarking
pub use parallel_processing::{
    process_scripts_parallel, should_process_file, BatchConfig, ProcessingStatus, RunStats,
    ScriptStats,
};
