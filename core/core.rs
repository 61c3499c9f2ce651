//! Core logic for reposcribe: ignore-rule compilation and matching,
//! pruning directory traversal, file-tree rendering and export
//! writing. The CLI crate wires these together.

pub mod defaults;
pub mod error;
pub mod export;
pub mod rules;
pub mod scan;
pub mod tree;

pub use defaults::{DEFAULT_IGNORE_PATTERNS, read_ignore_lines};
pub use error::{AppError, Result};
pub use export::{ExportSummary, write_export_file};
pub use rules::{Pattern, RuleSet};
pub use scan::{ScanWarning, TraversalResult, walk};
pub use tree::render_file_tree;
