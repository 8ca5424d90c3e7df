pub mod runner;

pub use runner::{ensure_executable, error_stream_path, is_executable, locate_engine, run_engine};
