use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::tree::render_file_tree;

/// Totals reported after writing an export file. `file_count` counts
/// files whose content was read successfully; `total_bytes` sums the
/// bytes of content written for them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportSummary {
    pub file_count: usize,
    pub total_bytes: u64,
}

/// Writes the export document: an optional file tree block followed by
/// every file's content between START/END markers.
///
/// Files are read as bytes and decoded as UTF-8 with lossy
/// replacement. A file that cannot be read gets an inline
/// `Error reading file:` marker instead of aborting the export; only
/// failures writing the output itself are fatal.
pub fn write_export_file(
    output_path: &Path,
    project_root: &Path,
    files: &[String],
    include_tree: bool,
) -> Result<ExportSummary> {
    let write_err = |source: std::io::Error| AppError::FileWrite {
        path: output_path.to_path_buf(),
        source,
    };

    let file = File::create(output_path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    let mut summary = ExportSummary::default();

    if include_tree {
        out.write_all(b"--- START FILE TREE ---\n").map_err(write_err)?;
        out.write_all(render_file_tree(files).as_bytes())
            .map_err(write_err)?;
        out.write_all(b"--- END FILE TREE ---\n\n")
            .map_err(write_err)?;
    }

    for rel in files {
        let full_path = native_path(project_root, rel);
        log::info!("Scribing: {}", rel);

        writeln!(out, "--- START FILE: {} ---", rel).map_err(write_err)?;
        match fs::read(&full_path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                out.write_all(content.as_bytes()).map_err(write_err)?;
                summary.file_count += 1;
                summary.total_bytes += content.len() as u64;
            }
            Err(e) => {
                log::warn!("Could not read file {}: {}", rel, e);
                writeln!(out, "Error reading file: {}", e).map_err(write_err)?;
            }
        }
        write!(out, "\n--- END FILE: {} ---\n\n", rel).map_err(write_err)?;
    }

    out.flush().map_err(write_err)?;
    log::debug!(
        "Export complete: {} files, {} content bytes.",
        summary.file_count,
        summary.total_bytes
    );
    Ok(summary)
}

/// Rebuilds a native path from a forward-slash relative path.
fn native_path(root: &Path, rel: &str) -> PathBuf {
    rel.split('/').fold(root.to_path_buf(), |p, seg| p.join(seg))
}
