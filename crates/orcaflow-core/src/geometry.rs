//! SMILES to 3D geometry.
//!
//! Embedding and force-field minimisation are delegated to an external tool.
//! The workflow only depends on the [`GeometryBuilder`] trait, so tests and
//! callers can substitute their own implementation.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::{Result, WorkflowError};

/// Produces an XYZ geometry file (atom count, comment line, one
/// `element x y z` line per atom) from a SMILES string.
pub trait GeometryBuilder {
    /// Write the geometry for `smiles` to `output` and return the path written.
    fn build(&self, smiles: &str, output: &Path, force_field: &str) -> Result<PathBuf>;
}

/// Characters that can appear in a SMILES string.
fn is_smiles_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "[]()=#@+-\\/%.:*$~".contains(c)
}

/// Reject descriptors that cannot be SMILES before anything touches disk.
pub fn validate_smiles(smiles: &str) -> Result<()> {
    if smiles.is_empty() {
        return Err(WorkflowError::InvalidSmiles(
            "SMILES string must be non-empty".to_string(),
        ));
    }

    if let Some(bad) = smiles.chars().find(|c| !is_smiles_char(*c)) {
        return Err(WorkflowError::InvalidSmiles(format!(
            "unexpected character {bad:?} in {smiles:?}"
        )));
    }

    Ok(())
}

/// Force fields the minimiser accepts. Anything other than MMFF94 uses UFF.
fn normalize_force_field(force_field: &str) -> &'static str {
    if force_field.eq_ignore_ascii_case("MMFF94") {
        "MMFF94"
    } else {
        "UFF"
    }
}

/// Geometry via the Open Babel command-line tool.
///
/// Runs `obabel -:<smiles> -oxyz -O <output> -h --gen3d --minimize --ff <ff>
/// --steps <n>`.
#[derive(Debug, Clone)]
pub struct OpenBabel {
    pub executable: PathBuf,
    pub max_steps: u32,
}

impl Default for OpenBabel {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("obabel"),
            max_steps: 500,
        }
    }
}

impl OpenBabel {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    fn command(&self, smiles: &str, output: &Path, force_field: &str) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(format!("-:{smiles}"))
            .arg("-oxyz")
            .arg("-O")
            .arg(output)
            .arg("-h")
            .arg("--gen3d")
            .arg("--minimize")
            .arg("--ff")
            .arg(normalize_force_field(force_field))
            .arg("--steps")
            .arg(self.max_steps.to_string());
        cmd
    }
}

impl GeometryBuilder for OpenBabel {
    fn build(&self, smiles: &str, output: &Path, force_field: &str) -> Result<PathBuf> {
        validate_smiles(smiles)?;

        let mut cmd = self.command(smiles, output, force_field);
        debug!("Running geometry tool: {:?}", cmd);

        let out = cmd.output().map_err(|e| WorkflowError::Launch {
            program: self.executable.clone(),
            source: e,
        })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(WorkflowError::Geometry(format!(
                "{} exited with {}: {}",
                self.executable.display(),
                out.status,
                stderr.trim()
            )));
        }

        // obabel reports conversion failures on stderr but still exits 0.
        let written = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(WorkflowError::Geometry(format!(
                "no geometry written for {smiles:?}"
            )));
        }

        info!("XYZ written: {}", output.display());
        Ok(output.to_path_buf())
    }
}
