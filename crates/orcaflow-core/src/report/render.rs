use std::fmt::Write;

use crate::report::model::WorkflowResults;

/// Markdown summary of a run: digests, then one table per non-empty collection.
pub fn render_markdown(molecule_name: &str, results: &WorkflowResults) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# ORCA results for {molecule_name}");
    let _ = writeln!(
        out,
        "- SHA256(xyz): `{}`",
        results.xyz_digest.as_deref().unwrap_or("n/a")
    );
    let _ = writeln!(
        out,
        "- SHA256(inp): `{}`\n",
        results.input_digest.as_deref().unwrap_or("n/a")
    );

    if !results.singlet_excitations.is_empty() {
        out.push_str("## Singlet Excitations\n\n");
        out.push_str("| State | Energy (eV) | Osc.Strength |\n|---|---|---|\n");
        for exc in &results.singlet_excitations {
            let _ = writeln!(
                out,
                "| {} | {:.3} | {:.3} |",
                exc.state,
                exc.energy,
                exc.osc_strength.unwrap_or_default()
            );
        }
    }

    if !results.triplet_excitations.is_empty() {
        out.push_str("\n## Triplet Excitations\n\n");
        out.push_str("| State | Energy (eV) |\n|---|---|\n");
        for exc in &results.triplet_excitations {
            let _ = writeln!(out, "| {} | {:.3} |", exc.state, exc.energy);
        }
    }

    if !results.fragment_analysis.is_empty() {
        out.push_str("\n## Fragment Analysis\n\n");
        out.push_str("| Fragment | Total Energy (Eh) |\n|---|---|\n");
        for (label, frag) in &results.fragment_analysis {
            let _ = writeln!(out, "| {} | {:.6} |", label, frag.total_energy);
        }
    }

    out
}
