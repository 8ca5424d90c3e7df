//! Results documents written next to the run's other outputs.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, WorkflowError};
use crate::report::model::WorkflowResults;
use crate::report::render::render_markdown;

/// Paths of the two results documents for `molecule_name` under `dir`.
pub fn document_paths(dir: &Path, molecule_name: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{molecule_name}_results.json")),
        dir.join(format!("{molecule_name}_results.md")),
    )
}

/// Write the JSON and Markdown documents; returns their paths.
pub fn export_results(
    dir: &Path,
    molecule_name: &str,
    results: &WorkflowResults,
) -> Result<(PathBuf, PathBuf)> {
    let (json_path, md_path) = document_paths(dir, molecule_name);

    let json = serde_json::to_string_pretty(results)?;
    fs::write(&json_path, json).map_err(|e| WorkflowError::io(&json_path, e))?;
    info!("Results exported to {}", json_path.display());

    fs::write(&md_path, render_markdown(molecule_name, results))
        .map_err(|e| WorkflowError::io(&md_path, e))?;
    info!("Markdown summary exported to {}", md_path.display());

    Ok((json_path, md_path))
}
