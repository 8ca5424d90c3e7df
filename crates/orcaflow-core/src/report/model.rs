use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Parsed results of one workflow run.
///
/// This struct is the JSON results document. Every collection may be empty:
/// an engine run that never reaches the excited-state section still yields a
/// well-formed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResults {
    pub singlet_excitations: Vec<ExcitationRecord>,
    pub triplet_excitations: Vec<ExcitationRecord>,
    /// Keyed by `"Fragment <n>"`, in first-seen order.
    pub fragment_analysis: IndexMap<String, FragmentRecord>,

    #[serde(rename = "xyz_sha256", default, skip_serializing_if = "Option::is_none")]
    pub xyz_digest: Option<String>,
    #[serde(rename = "inp_sha256", default, skip_serializing_if = "Option::is_none")]
    pub input_digest: Option<String>,
}

impl WorkflowResults {
    pub fn is_empty(&self) -> bool {
        self.singlet_excitations.is_empty()
            && self.triplet_excitations.is_empty()
            && self.fragment_analysis.is_empty()
    }
}

/// One excited state.
///
/// `osc_strength` is only reported for singlets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcitationRecord {
    pub state: u32,
    /// Excitation energy in eV.
    pub energy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osc_strength: Option<f64>,
}

impl ExcitationRecord {
    pub fn singlet(state: u32, energy: f64, osc_strength: f64) -> Self {
        Self {
            state,
            energy,
            osc_strength: Some(osc_strength),
        }
    }

    pub fn triplet(state: u32, energy: f64) -> Self {
        Self {
            state,
            energy,
            osc_strength: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentRecord {
    /// Total energy in Hartree.
    pub total_energy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_results_serialize_all_collections() {
        let value = serde_json::to_value(WorkflowResults::default()).unwrap();

        assert_eq!(
            value,
            json!({
                "singlet_excitations": [],
                "triplet_excitations": [],
                "fragment_analysis": {}
            })
        );
    }

    #[test]
    fn triplets_omit_oscillator_strength() {
        let value = serde_json::to_value(ExcitationRecord::triplet(2, 2.1)).unwrap();
        assert_eq!(value, json!({"state": 2, "energy": 2.1}));

        let value = serde_json::to_value(ExcitationRecord::singlet(1, 3.456, 0.789)).unwrap();
        assert_eq!(value, json!({"state": 1, "energy": 3.456, "osc_strength": 0.789}));
    }

    #[test]
    fn digests_use_document_key_names() {
        let results = WorkflowResults {
            xyz_digest: Some("aa".into()),
            input_digest: Some("bb".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&results).unwrap();

        assert_eq!(value["xyz_sha256"], "aa");
        assert_eq!(value["inp_sha256"], "bb");
    }

    #[test]
    fn fragment_order_is_preserved() {
        let mut results = WorkflowResults::default();
        for n in [10, 2, 7] {
            results.fragment_analysis.insert(
                format!("Fragment {n}"),
                FragmentRecord {
                    total_energy: -(n as f64),
                },
            );
        }

        let text = serde_json::to_string(&results).unwrap();
        let i10 = text.find("Fragment 10").unwrap();
        let i2 = text.find("Fragment 2").unwrap();
        let i7 = text.find("Fragment 7").unwrap();
        assert!(i10 < i2 && i2 < i7);
        assert!(!results.is_empty());
    }
}
