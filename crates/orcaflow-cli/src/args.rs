use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "orcaflow",
    version,
    about = "SMILES to ORCA sTDA/PIEDA excited-state workflow"
)]
pub struct Args {
    /// SMILES string of the molecule
    #[arg(long)]
    pub smiles: String,

    /// Name used for every file the run writes
    #[arg(long, alias = "molecule_name", default_value = "molecule")]
    pub molecule_name: String,

    /// ORCA executable (searched on PATH when omitted)
    #[arg(long, alias = "orca_path")]
    pub orca_path: Option<PathBuf>,

    /// Directory for generated files, results and the run log
    #[arg(long, alias = "output_dir", default_value = "output")]
    pub output_dir: PathBuf,

    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Remove the geometry, input script and engine stderr after a successful run
    #[arg(long)]
    pub cleanup: bool,

    /// Open Babel executable used for 3D geometry generation
    #[arg(long, default_value = "obabel")]
    pub obabel_path: PathBuf,

    /// Increase console verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence console output; the run log is still written
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
