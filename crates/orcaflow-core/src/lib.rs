pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod parser;
pub mod report;
pub mod util;
pub mod workflow;

pub use error::{Result, WorkflowError};
pub use workflow::{WorkflowRequest, run_workflow};

pub const TOOL_NAME: &str = "orcaflow";

/// Name of the engine-relative directory that receives compound-job artifacts.
/// Referenced by `%base` in generated input scripts.
pub const RESULTS_DIR: &str = "results";
