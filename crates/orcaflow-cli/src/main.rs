use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, info_span};

use orcaflow_core::config::RunConfig;
use orcaflow_core::engine::locate_engine;
use orcaflow_core::geometry::OpenBabel;
use orcaflow_core::report::export::document_paths;
use orcaflow_core::util::profile::RunContext;
use orcaflow_core::{WorkflowRequest, run_workflow};

mod args;
mod logging;

fn main() -> ExitCode {
    let args = args::Args::parse();
    let ctx = RunContext::new();

    let log_path = match logging::setup_logging(
        args.verbose,
        args.quiet,
        &args.output_dir,
        &ctx.run_id,
    ) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("orcaflow: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _span = info_span!("run", run_id = %ctx.run_id).entered();
    info!("Run {} logging to {}", ctx.run_id, log_path.display());

    match run(&args, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Workflow failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &args::Args, ctx: &RunContext) -> Result<()> {
    let config =
        RunConfig::load(args.config.as_deref()).context("failed to load configuration")?;

    let engine = locate_engine(args.orca_path.as_deref())
        .context("ORCA not found; pass --orca-path or put orca on PATH")?;
    info!("Using ORCA executable: {}", engine.display());

    let request = WorkflowRequest {
        smiles: args.smiles.clone(),
        molecule_name: args.molecule_name.clone(),
        engine,
        output_dir: args.output_dir.clone(),
        cleanup: args.cleanup,
    };
    let geometry = OpenBabel::new(&args.obabel_path);

    run_workflow(ctx, &request, &config, &geometry)?;

    let (json, markdown) = document_paths(&args.output_dir, &args.molecule_name);
    info!("Results: {} and {}", json.display(), markdown.display());
    Ok(())
}
