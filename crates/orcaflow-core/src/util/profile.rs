//! Per-step instrumentation.
//!
//! Every pipeline stage runs through [`Step::run`], which records a start
//! event, measures wall-clock time and the change in available system memory,
//! and records an end event once the stage returns successfully. Failures pass
//! through untouched and leave no end event.

use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Logging context for one workflow invocation.
///
/// Built once by the caller and handed down to every component that logs, so
/// records from concurrent runs can be told apart without global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub run_id: String,
}

impl RunContext {
    /// New context with a random 8-character run id.
    pub fn new() -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self::with_run_id(&id[..8])
    }

    pub fn with_run_id(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }

    pub fn step<'a>(&'a self, name: &'a str) -> Step<'a> {
        Step { ctx: self, name }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A named, instrumented pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    ctx: &'a RunContext,
    name: &'a str,
}

impl<'a> Step<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    /// Run `f` under instrumentation and return its result unchanged.
    pub fn run<T, E>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        info!(run_id = %self.ctx.run_id, step = self.name, "[{}] START", self.name);

        let t0 = Instant::now();
        let mem0 = available_memory_mb();

        let value = f()?;

        let elapsed = t0.elapsed();
        let mem_delta_mb = match (mem0, available_memory_mb()) {
            (Some(before), Some(after)) => Some(after - before),
            _ => None,
        };

        info!(
            run_id = %self.ctx.run_id,
            step = self.name,
            duration_s = elapsed.as_secs_f64(),
            mem_delta_mb = ?mem_delta_mb,
            "[{}] END | Duration: {:.1}s | Mem delta: {} MB",
            self.name,
            elapsed.as_secs_f64(),
            mem_delta_mb.map_or_else(|| "n/a".to_string(), |d| d.to_string())
        );

        Ok(value)
    }

    /// Wrap a one-argument stage function, keeping its signature.
    pub fn wrap<A, T, E>(
        self,
        f: impl FnOnce(A) -> Result<T, E>,
    ) -> impl FnOnce(A) -> Result<T, E> {
        move |arg| self.run(|| f(arg))
    }
}

/// Currently available system memory in MiB (Linux only).
pub fn available_memory_mb() -> Option<i64> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|content| parse_mem_available_kb(&content))
            .map(|kb| (kb / 1024) as i64)
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_mem_available_kb(meminfo: &str) -> Option<u64> {
    meminfo
        .lines()
        .find(|l| l.starts_with("MemAvailable"))
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let out = tracing::subscriber::with_default(subscriber, f);
        (out, capture.text())
    }

    #[test]
    fn returns_wrapped_value_and_logs_start_and_end() {
        let ctx = RunContext::with_run_id("abcd1234");

        let (result, logs) =
            capture_logs(|| ctx.step("Create INP").run(|| Ok::<_, String>(42)));

        assert_eq!(result, Ok(42));
        assert_eq!(logs.matches("[Create INP] START").count(), 1);
        assert_eq!(logs.matches("[Create INP] END").count(), 1);
        assert!(logs.contains("abcd1234"));
        assert!(logs.contains("Duration:"));
    }

    #[test]
    fn failure_propagates_without_end_record() {
        let ctx = RunContext::with_run_id("feedbeef");

        let (result, logs) = capture_logs(|| {
            ctx.step("Run ORCA")
                .run(|| Err::<u32, _>("engine exploded".to_string()))
        });

        assert_eq!(result, Err("engine exploded".to_string()));
        assert_eq!(logs.matches("[Run ORCA] START").count(), 1);
        assert!(!logs.contains("[Run ORCA] END"));
    }

    #[test]
    fn wrapped_function_keeps_its_contract() {
        let ctx = RunContext::with_run_id("00000000");
        let double = ctx.step("double").wrap(|x: i32| Ok::<_, ()>(x * 2));

        assert_eq!(double(21), Ok(42));
    }

    #[test]
    fn run_ids_are_short_and_distinct() {
        let a = RunContext::new();
        let b = RunContext::new();

        assert_eq!(a.run_id.len(), 8);
        assert!(a.run_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn parses_mem_available_line() {
        let meminfo = "MemTotal:       16314200 kB\nMemFree:         1024000 kB\nMemAvailable:    8192000 kB\n";
        assert_eq!(parse_mem_available_kb(meminfo), Some(8_192_000));
        assert_eq!(parse_mem_available_kb("MemTotal: 1 kB\n"), None);
    }
}
