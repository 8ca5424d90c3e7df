//! ORCA compound-job input script.
//!
//! The script has three stages:
//!
//! 1. GFN2-xTB pre-optimisation of the supplied geometry, with connectivity-based
//!    fragmentation.
//! 2. sTDA excited states on the whole optimised system, with functional-group
//!    fragmentation.
//! 3. sTDA excited states on the fragment geometry stored by stage 2.
//!
//! Stages 2 and 3 read geometries the engine writes under `./results/`, relative
//! to its working directory.

use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::RESULTS_DIR;
use crate::config::RunConfig;
use crate::error::{Result, WorkflowError};
use crate::input::params;

/// Everything the input script depends on.
#[derive(Debug, Clone)]
pub struct InputSpec<'a> {
    pub xyz_file: &'a Path,
    pub molecule_name: &'a str,
    pub smiles: &'a str,
    pub nprocs: usize,
    pub method: &'a str,
    pub solvent: &'a str,
    pub nroots: u32,
    pub triplets: bool,
    /// MB per process.
    pub maxcore: u64,
}

impl<'a> InputSpec<'a> {
    pub fn from_config(
        xyz_file: &'a Path,
        molecule_name: &'a str,
        smiles: &'a str,
        config: &'a RunConfig,
    ) -> Self {
        Self {
            xyz_file,
            molecule_name,
            smiles,
            nprocs: config.resolved_nprocs(),
            method: &config.method,
            solvent: &config.solvent,
            nroots: config.nroots,
            triplets: config.triplets,
            maxcore: config.effective_maxcore(),
        }
    }
}

/// Render the compound-job script.
///
/// The geometry file is referenced, never opened; a missing file surfaces when
/// the engine runs.
pub fn render_input(spec: &InputSpec<'_>, generated_on: NaiveDate) -> String {
    let p = params::lookup(spec.method);

    let name = spec.molecule_name;
    let smiles = spec.smiles;
    let date = generated_on.format("%Y-%m-%d");
    let results = RESULTS_DIR;
    let nprocs = spec.nprocs;
    let maxcore = spec.maxcore;
    let method = spec.method;
    let solvent = spec.solvent;
    let nroots = spec.nroots;
    let triplets = if spec.triplets { "true" } else { "false" };
    let xyz_file = spec.xyz_file.display();
    let axstda = format!("{:.2}", p.axstda);
    let beta1 = format!("{:.2}", p.beta1);
    let alpha1 = format!("{:.2}", p.alpha1);

    format!(
        r#"# ORCA 6.1 Compound Job for {name}
# SMILES: {smiles}
# Generated on: {date}
# Three-step calculation: GFN2-xTB optimization -> sTDA/PIEDA -> sTDA on fragments
%base "./{results}/{name}"

%pal
  nprocs {nprocs}
end
%maxcore {maxcore}

%compound
New_Step
  ! Native-GFN2-xTB Opt CPCM({solvent}) VeryTightSCF

  %cpcm
    smd true
    SMDsolvent "{solvent}"
  end

  %frag
    FragProc Connectivity
    PrintLevel 3
    STOREFRAGS true
  end

  * xyzfile 0 1 {xyz_file}
Step_End

New_Step
  ! {method} TightSCF CPCM({solvent}) GCP(HF/MINIS)

  %cpcm
    smd true
    SMDsolvent "{solvent}"
  end

  %tddft
    Mode sTDA
    DoDipoleLength true
    DecomposeFosc true
    Ethresh 10.0
    axstda {axstda}
    beta1 {beta1}
    alpha1 {alpha1}
    NRoots {nroots}
    Triplets {triplets}
  end

  %frag
    FragProc FunctionalGroups, Extend
    PrintLevel 3
    STOREFRAGS true
  end

  * xyzfile 0 1 ./{results}/{name}_Compound_1.xyz
Step_End

New_Step
  ! {method} TightSCF CPCM({solvent})

  %cpcm
    smd true
    SMDsolvent "{solvent}"
  end

  %tddft
    Mode sTDA
    DoDipoleLength true
    DecomposeFosc true
    Ethresh 10.0
    axstda {axstda}
    beta1 {beta1}
    alpha1 {alpha1}
    NRoots {nroots}
    Triplets {triplets}
  end

  * xyzfile 0 1 ./{results}/{name}_Compound_1.fragments.xyz
Step_End
End
"#
    )
}

/// Render the script dated today and write it to `output`.
///
/// Returns `output` so the path can be handed straight to the engine runner.
pub fn write_input(spec: &InputSpec<'_>, output: &Path) -> Result<PathBuf> {
    let text = render_input(spec, Local::now().date_naive());
    fs::write(output, text).map_err(|e| WorkflowError::io(output, e))?;

    info!("ORCA input file written: {}", output.display());
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec<'a>(xyz: &'a Path, method: &'a str) -> InputSpec<'a> {
        InputSpec {
            xyz_file: xyz,
            molecule_name: "benzene",
            smiles: "c1ccccc1",
            nprocs: 8,
            method,
            solvent: "Toluene",
            nroots: 5,
            triplets: true,
            maxcore: 3000,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn header_and_resources_are_rendered() {
        let xyz = Path::new("/data/benzene.xyz");
        let text = render_input(&spec(xyz, "CAM-B3LYP"), date());

        assert!(text.starts_with("# ORCA 6.1 Compound Job for benzene\n"));
        assert!(text.contains("# SMILES: c1ccccc1\n"));
        assert!(text.contains("# Generated on: 2024-03-09\n"));
        assert!(text.contains("%base \"./results/benzene\""));
        assert!(text.contains("  nprocs 8\n"));
        assert!(text.contains("%maxcore 3000\n"));
        assert!(text.trim_end().ends_with("End"));
    }

    #[test]
    fn three_stages_reference_their_geometries() {
        let xyz = Path::new("/data/benzene.xyz");
        let text = render_input(&spec(xyz, "CAM-B3LYP"), date());

        assert_eq!(text.matches("New_Step").count(), 3);
        assert_eq!(text.matches("Step_End").count(), 3);
        assert!(text.contains("* xyzfile 0 1 /data/benzene.xyz"));
        assert!(text.contains("* xyzfile 0 1 ./results/benzene_Compound_1.xyz"));
        assert!(text.contains("* xyzfile 0 1 ./results/benzene_Compound_1.fragments.xyz"));
        assert!(text.contains("! CAM-B3LYP TightSCF CPCM(Toluene) GCP(HF/MINIS)"));
        assert!(text.contains("SMDsolvent \"Toluene\""));
    }

    #[test]
    fn table_coefficients_are_embedded_for_every_known_method() {
        let xyz = Path::new("mol.xyz");
        for row in params::STDA_PARAMETERS {
            let text = render_input(&spec(xyz, row.method), date());

            assert_eq!(
                text.matches(&format!("axstda {:.2}\n", row.axstda)).count(),
                2,
                "{}",
                row.method
            );
            assert_eq!(text.matches(&format!("beta1 {:.2}\n", row.beta1)).count(), 2);
            assert_eq!(text.matches(&format!("alpha1 {:.2}\n", row.alpha1)).count(), 2);
        }
    }

    #[test]
    fn unknown_method_uses_fallback_coefficients() {
        let xyz = Path::new("mol.xyz");
        let text = render_input(&spec(xyz, "PBE0"), date());

        assert!(text.contains("! PBE0 TightSCF"));
        assert!(text.contains("axstda 0.56\n"));
        assert!(text.contains("beta1 8.00\n"));
        assert!(text.contains("alpha1 4.58\n"));
    }

    #[test]
    fn triplet_flag_and_roots() {
        let xyz = Path::new("mol.xyz");
        let mut s = spec(xyz, "wB97X");
        s.triplets = false;
        s.nroots = 12;

        let text = render_input(&s, date());
        assert_eq!(text.matches("Triplets false").count(), 2);
        assert_eq!(text.matches("NRoots 12").count(), 2);
    }

    #[test]
    fn write_input_returns_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("benzene.inp");

        let returned = write_input(&spec(Path::new("missing.xyz"), "wB97X-3c"), &out).unwrap();

        assert_eq!(returned, out);
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("* xyzfile 0 1 missing.xyz"));
    }

    #[test]
    fn from_config_uses_resolved_values() {
        let cfg = RunConfig {
            maxcore: 9000,
            max_mem_limit: 8000,
            nprocs: Some(2),
            ..RunConfig::default()
        };
        let xyz = Path::new("a.xyz");
        let s = InputSpec::from_config(xyz, "a", "C", &cfg);

        assert_eq!(s.nprocs, 2);
        assert_eq!(s.maxcore, 8000);
        assert_eq!(s.method, "wB97X-3c");
    }
}
