//! Section tracking for ORCA output.
//!
//! The scanner is an explicit state machine. [`transition`] is pure: given the
//! current section and one line it returns the next section and at most one
//! extracted record, which keeps it testable without any file I/O.
//!
//! Rules, applied per line:
//!
//! - A singlet, triplet or fragment-analysis header switches to that section.
//!   Header lines never yield records.
//! - A run of ten or more dashes closes a singlet or triplet section. It does
//!   **not** close fragment analysis; that asymmetry is part of the contract.
//! - Inside a section, a line containing the section's keyword is matched
//!   against the section's record pattern. Lines that do not match, or whose
//!   numbers do not parse, are skipped.

use crate::parser::patterns::*;
use crate::report::model::{ExcitationRecord, FragmentRecord};

/// The section the scanner is in. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    None,
    Singlet,
    Triplet,
    FragmentAnalysis,
}

/// A record extracted from a single line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Singlet(ExcitationRecord),
    Triplet(ExcitationRecord),
    Fragment { label: String, record: FragmentRecord },
}

/// Advance the state machine by one line.
pub fn transition(state: Section, line: &str) -> (Section, Option<Record>) {
    if let Some(header) = header(line) {
        return (header, None);
    }

    let state = match state {
        Section::Singlet | Section::Triplet if DASH_RULE.is_match(line) => Section::None,
        other => other,
    };

    (state, extract(state, line))
}

fn header(line: &str) -> Option<Section> {
    if SINGLET_HEADER.is_match(line) {
        Some(Section::Singlet)
    } else if TRIPLET_HEADER.is_match(line) {
        Some(Section::Triplet)
    } else if FRAGMENT_HEADER.is_match(line) {
        Some(Section::FragmentAnalysis)
    } else {
        None
    }
}

fn extract(state: Section, line: &str) -> Option<Record> {
    match state {
        Section::None => None,
        Section::Singlet if line.contains("STATE") => {
            let caps = SINGLET_STATE.captures(line)?;
            Some(Record::Singlet(ExcitationRecord::singlet(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            )))
        }
        Section::Triplet if line.contains("STATE") => {
            let caps = TRIPLET_STATE.captures(line)?;
            Some(Record::Triplet(ExcitationRecord::triplet(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
            )))
        }
        Section::FragmentAnalysis if line.contains("Fragment") => {
            let caps = FRAGMENT_ENERGY.captures(line)?;
            Some(Record::Fragment {
                label: format!("Fragment {}", &caps[1]),
                record: FragmentRecord {
                    total_energy: caps[2].parse().ok()?,
                },
            })
        }
        _ => None,
    }
}
