//! Run configuration.
//!
//! A [`RunConfig`] is built once per invocation from built-in defaults,
//! optionally overlaid with a YAML file, and is read-only afterwards. Keys the
//! workflow does not know about are kept in [`RunConfig::extra`] rather than
//! rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, WorkflowError};
use crate::input::params::DEFAULT_METHOD;
use crate::util::profile::available_memory_mb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Excited-state functional.
    pub method: String,
    /// Implicit solvent name passed to the CPCM/SMD block.
    pub solvent: String,
    /// Engine process count. `None` means one per logical CPU.
    pub nprocs: Option<usize>,
    /// Number of excited-state roots.
    pub nroots: u32,
    /// Also compute triplet states.
    pub triplets: bool,
    /// Force field for the geometry pre-optimisation (`MMFF94` or `UFF`).
    pub force_field: String,
    /// Memory per engine process, in MB.
    pub maxcore: u64,
    /// Cap `maxcore` at `max_mem_limit`.
    pub auto_memory: bool,
    /// Upper bound for `maxcore` when `auto_memory` is on, in MB.
    pub max_mem_limit: u64,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            solvent: "Toluene".to_string(),
            nprocs: Some(4),
            nroots: 3,
            triplets: true,
            force_field: "MMFF94".to_string(),
            maxcore: 7000,
            auto_memory: true,
            max_mem_limit: 8000,
            extra: BTreeMap::new(),
        }
    }
}

/// File-level view of [`RunConfig`]: every key optional.
#[derive(Debug, Default, Deserialize)]
struct PartialRunConfig {
    method: Option<String>,
    solvent: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    nprocs: Option<Option<usize>>,
    nroots: Option<u32>,
    triplets: Option<bool>,
    force_field: Option<String>,
    maxcore: Option<u64>,
    auto_memory: Option<bool>,
    max_mem_limit: Option<u64>,

    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl PartialRunConfig {
    fn merge_into(self, cfg: &mut RunConfig) {
        if let Some(v) = self.method {
            cfg.method = v;
        }
        if let Some(v) = self.solvent {
            cfg.solvent = v;
        }
        if let Some(v) = self.nprocs {
            cfg.nprocs = v;
        }
        if let Some(v) = self.nroots {
            cfg.nroots = v;
        }
        if let Some(v) = self.triplets {
            cfg.triplets = v;
        }
        if let Some(v) = self.force_field {
            cfg.force_field = v;
        }
        if let Some(v) = self.maxcore {
            cfg.maxcore = v;
        }
        if let Some(v) = self.auto_memory {
            cfg.auto_memory = v;
        }
        if let Some(v) = self.max_mem_limit {
            cfg.max_mem_limit = v;
        }
        cfg.extra.extend(self.extra);
    }
}

/// Distinguishes `key: null` (`Some(None)`) from an absent key (`None`).
fn explicit_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl RunConfig {
    /// Load the defaults overlaid with `path`, if given.
    ///
    /// A path that does not exist is not an error: the defaults are used and a
    /// warning is logged. A file that exists but cannot be parsed is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = Self::default();

        let Some(path) = path else {
            return Ok(cfg);
        };

        if !path.exists() {
            warn!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            return Ok(cfg);
        }

        debug!("Loading configuration from {}", path.display());
        let partial: PartialRunConfig = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| WorkflowError::Config(format!("{}: {}", path.display(), e)))?;

        partial.merge_into(&mut cfg);
        Ok(cfg)
    }

    /// Configured process count, or the number of logical CPUs.
    pub fn resolved_nprocs(&self) -> usize {
        self.nprocs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Per-process memory handed to the engine.
    pub fn effective_maxcore(&self) -> u64 {
        let maxcore = if self.auto_memory {
            self.maxcore.min(self.max_mem_limit)
        } else {
            self.maxcore
        };

        if let Some(available) = available_memory_mb() {
            let requested = maxcore.saturating_mul(self.resolved_nprocs() as u64);
            if requested as i64 > available {
                warn!(
                    "Requested engine memory ({} MB x {} procs) exceeds available memory ({} MB)",
                    maxcore,
                    self.resolved_nprocs(),
                    available
                );
            }
        }

        maxcore
    }
}
