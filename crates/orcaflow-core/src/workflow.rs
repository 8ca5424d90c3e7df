//! End-to-end orchestration: SMILES -> XYZ -> input script -> ORCA -> results.
//!
//! Each stage consumes the previous stage's output file, so the pipeline is
//! strictly sequential. Any stage failure aborts the run and is returned to
//! the caller unchanged. The only tolerated failures are an empty engine report
//! (parsed as empty results) and cleanup errors (logged).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::RESULTS_DIR;
use crate::config::RunConfig;
use crate::engine::{ensure_executable, error_stream_path, run_engine};
use crate::error::{Result, WorkflowError};
use crate::geometry::{GeometryBuilder, validate_smiles};
use crate::input::{InputSpec, write_input};
use crate::parser::parse_report;
use crate::report::export::export_results;
use crate::report::model::WorkflowResults;
use crate::util::digest::sha256_file;
use crate::util::profile::RunContext;

/// One molecule to push through the pipeline.
#[derive(Debug, Clone)]
pub struct WorkflowRequest {
    pub smiles: String,
    /// Base name for every file the run writes.
    pub molecule_name: String,
    /// ORCA executable.
    pub engine: PathBuf,
    pub output_dir: PathBuf,
    /// Delete the geometry, the input script and the engine's stderr capture
    /// once results are written.
    pub cleanup: bool,
}

/// Files a run writes under its output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub xyz: PathBuf,
    pub input: PathBuf,
    pub report: PathBuf,
}

impl RunPaths {
    pub fn new(output_dir: &Path, molecule_name: &str) -> Self {
        Self {
            xyz: output_dir.join(format!("{molecule_name}.xyz")),
            input: output_dir.join(format!("{molecule_name}.inp")),
            report: output_dir.join(format!("{molecule_name}.out")),
        }
    }

    /// Intermediate files removed by cleanup.
    pub fn temporaries(&self) -> [PathBuf; 3] {
        [
            self.xyz.clone(),
            self.input.clone(),
            error_stream_path(&self.report),
        ]
    }
}

/// Run the full pipeline for one molecule.
///
/// Preconditions (a plausible SMILES string and an executable engine) are
/// checked before anything is written.
#[instrument(skip_all, name = "orca_workflow", fields(run_id = %ctx.run_id, molecule = %request.molecule_name))]
pub fn run_workflow(
    ctx: &RunContext,
    request: &WorkflowRequest,
    config: &RunConfig,
    geometry: &dyn GeometryBuilder,
) -> Result<WorkflowResults> {
    validate_smiles(&request.smiles)?;
    ensure_executable(&request.engine)?;

    let output_dir = prepare_output_dir(&request.output_dir)?;
    let paths = RunPaths::new(&output_dir, &request.molecule_name);
    debug!("Run paths: {:?}", paths);

    let xyz = ctx.step("SMILES->XYZ").run(|| {
        geometry.build(&request.smiles, &paths.xyz, &config.force_field)
    })?;

    let input = ctx.step("Create INP").run(|| {
        let spec = InputSpec::from_config(&xyz, &request.molecule_name, &request.smiles, config);
        write_input(&spec, &paths.input)
    })?;

    let report = ctx
        .step("Run ORCA")
        .run(|| run_engine(&request.engine, &input, &paths.report))?;

    let mut results = ctx.step("Parse OUT").run(|| parse_report(&report))?;

    results.xyz_digest = Some(sha256_file(&xyz)?);
    results.input_digest = Some(sha256_file(&input)?);

    export_results(&output_dir, &request.molecule_name, &results)?;

    if request.cleanup {
        remove_temporaries(&paths.temporaries());
    }

    info!(
        singlets = results.singlet_excitations.len(),
        triplets = results.triplet_excitations.len(),
        fragments = results.fragment_analysis.len(),
        "Workflow finished for {}",
        request.molecule_name
    );

    Ok(results)
}

/// Create the output directory and its `results` subdirectory; returns the
/// absolute output directory.
///
/// Absolute paths matter because the engine runs with the output directory as
/// its working directory.
fn prepare_output_dir(dir: &Path) -> Result<PathBuf> {
    let results_dir = dir.join(RESULTS_DIR);
    fs::create_dir_all(&results_dir).map_err(|e| WorkflowError::io(&results_dir, e))?;
    dir.canonicalize().map_err(|e| WorkflowError::io(dir, e))
}

/// Best-effort removal; never fails the run.
fn remove_temporaries(files: &[PathBuf]) {
    for file in files {
        match fs::remove_file(file) {
            Ok(()) => info!("Removed temporary file: {}", file.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Temporary file already absent: {}", file.display())
            }
            Err(e) => warn!("Could not remove {}: {}", file.display(), e),
        }
    }
}
