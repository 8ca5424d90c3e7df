// Line patterns recognised in ORCA output.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Section headers
    pub static ref SINGLET_HEADER: Regex = Regex::new(
        r"(?i)TD-DFT/TDA.*EXCITED\s*STATES.*SINGLETS"
    ).expect("SINGLET_HEADER regex is valid");

    pub static ref TRIPLET_HEADER: Regex = Regex::new(
        r"(?i)TD-DFT/TDA.*EXCITED\s*STATES.*TRIPLETS"
    ).expect("TRIPLET_HEADER regex is valid");

    pub static ref FRAGMENT_HEADER: Regex = Regex::new(
        r"(?i)PIEDA.*FRAGMENT\s*ANALYSIS"
    ).expect("FRAGMENT_HEADER regex is valid");

    // Closes singlet/triplet sections
    pub static ref DASH_RULE: Regex = Regex::new(
        r"-{10,}"
    ).expect("DASH_RULE regex is valid");

    // Records
    pub static ref SINGLET_STATE: Regex = Regex::new(
        r"STATE\s+(\d+):\s*E=\s*([\d\.\-]+)\s*eV\s*.*?f=\s*([\d\.\-]+)"
    ).expect("SINGLET_STATE regex is valid");

    pub static ref TRIPLET_STATE: Regex = Regex::new(
        r"STATE\s+(\d+):\s*E=\s*([\d\.\-]+)\s*eV"
    ).expect("TRIPLET_STATE regex is valid");

    pub static ref FRAGMENT_ENERGY: Regex = Regex::new(
        r"Fragment\s+(\d+)\s+\(\w+\)\s+Total\s+Energy\s*:\s*([\d\.\-]+)"
    ).expect("FRAGMENT_ENERGY regex is valid");
}
