//! ORCA output parsing.
//!
//! A single forward pass over the report's lines drives the
//! [`section::transition`] state machine and appends each extracted record to
//! a [`WorkflowResults`]. Memory use is proportional to the number of records,
//! not the size of the report.

pub mod patterns;
pub mod section;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{error, info};

use crate::error::{Result, WorkflowError};
use crate::report::model::WorkflowResults;
use section::{Record, Section};

/// Incremental scanner. Feed lines in file order, then call [`finish`].
///
/// [`finish`]: ReportScanner::finish
#[derive(Debug, Default)]
pub struct ReportScanner {
    state: Section,
    results: WorkflowResults,
}

impl ReportScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self) -> Section {
        self.state
    }

    pub fn feed(&mut self, line: &str) {
        let (next, record) = section::transition(self.state, line);
        self.state = next;

        match record {
            Some(Record::Singlet(r)) => self.results.singlet_excitations.push(r),
            Some(Record::Triplet(r)) => self.results.triplet_excitations.push(r),
            // Repeated labels overwrite the earlier value.
            Some(Record::Fragment { label, record }) => {
                self.results.fragment_analysis.insert(label, record);
            }
            None => {}
        }
    }

    pub fn finish(self) -> WorkflowResults {
        self.results
    }
}

/// Parse report text already in memory.
pub fn parse_str(text: &str) -> WorkflowResults {
    let mut scanner = ReportScanner::new();
    for line in text.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

/// Parse an ORCA report file.
///
/// A missing or zero-length report means the engine produced nothing. That is
/// logged and yields empty results rather than an error. Read failures on an
/// existing, non-empty file are errors.
pub fn parse_report(path: &Path) -> Result<WorkflowResults> {
    let is_empty = match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };
    if is_empty {
        error!("ORCA output file missing/empty: {}", path.display());
        return Ok(WorkflowResults::default());
    }

    let file = File::open(path).map_err(|e| WorkflowError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut scanner = ReportScanner::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| WorkflowError::io(path, e))?;
        if n == 0 {
            break;
        }
        // Engine output is not guaranteed to be valid UTF-8.
        let line = String::from_utf8_lossy(&buf);
        scanner.feed(line.trim_end_matches(['\n', '\r']));
    }

    let results = scanner.finish();
    info!(
        "Parsed singlets: {}, triplets: {}, fragments: {}",
        results.singlet_excitations.len(),
        results.triplet_excitations.len(),
        results.fragment_analysis.len()
    );

    Ok(results)
}
