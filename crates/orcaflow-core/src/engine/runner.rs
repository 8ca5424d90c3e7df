//! External engine invocation.
//!
//! The engine runs as `<executable> <input>` with stdout captured to the report
//! file and stderr to a sibling `.err` file. The call blocks until the process
//! exits. There is no timeout and no retry.

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::info;

use crate::error::{Result, WorkflowError};

/// Executable name searched on `PATH` when no explicit engine path is given.
pub const ENGINE_NAME: &str = "orca";

/// `<output>.err`, next to the report file.
pub fn error_stream_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".err");
    PathBuf::from(name)
}

/// Regular file carrying an execute permission bit.
pub fn is_executable(path: &Path) -> bool {
    let Ok(meta) = path.metadata() else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Fail fast unless `path` is an executable file.
pub fn ensure_executable(path: &Path) -> Result<()> {
    if is_executable(path) {
        Ok(())
    } else {
        Err(WorkflowError::ExecutableNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Resolve the engine: the explicit path if given, else the first executable
/// `orca` on `PATH`.
pub fn locate_engine(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    find_on_path(ENGINE_NAME, std::env::var_os("PATH")).ok_or_else(|| {
        WorkflowError::ExecutableNotFound {
            path: PathBuf::from(ENGINE_NAME),
        }
    })
}

fn find_on_path(name: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Run the engine on `input`, writing stdout to `output`.
///
/// Returns `output` on a zero exit status. Partial output files are left in
/// place on failure.
pub fn run_engine(executable: &Path, input: &Path, output: &Path) -> Result<PathBuf> {
    ensure_executable(executable)?;

    // The child runs in the input's directory; pin both paths first.
    let executable =
        std::path::absolute(executable).map_err(|e| WorkflowError::io(executable, e))?;
    let input = std::path::absolute(input).map_err(|e| WorkflowError::io(input, e))?;

    let err_path = error_stream_path(output);
    let stdout = File::create(output).map_err(|e| WorkflowError::io(output, e))?;
    let stderr = File::create(&err_path).map_err(|e| WorkflowError::io(&err_path, e))?;

    info!(
        "Running ORCA: {} {} > {}",
        executable.display(),
        input.display(),
        output.display()
    );

    let mut cmd = Command::new(&executable);
    cmd.arg(&input)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));

    // Relative paths inside the input script resolve against its directory.
    if let Some(dir) = input.parent() {
        cmd.current_dir(dir);
    }

    // TODO: accept an optional wall-clock timeout and kill the child when it expires.
    let status = cmd.status().map_err(|e| WorkflowError::Launch {
        program: executable.clone(),
        source: e,
    })?;

    if !status.success() {
        return Err(WorkflowError::EngineFailed {
            program: executable,
            status,
        });
    }

    info!("ORCA run complete: {}", output.display());
    Ok(output.to_path_buf())
}
