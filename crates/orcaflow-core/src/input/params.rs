//! sTDA coefficients per functional.

use tracing::warn;

/// Functional used when none is configured, and whose coefficients stand in
/// for any functional missing from [`STDA_PARAMETERS`].
pub const DEFAULT_METHOD: &str = "wB97X-3c";

/// Functionals validated for the excited-state stages.
pub const RECOMMENDED_FUNCTIONALS: &[&str] =
    &["CAM-B3LYP", "M06-2X", "wB97X-V", "wB97X", "wB97X-3c"];

/// Empirical sTDA parameters for one functional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StdaParams {
    pub method: &'static str,
    /// Fock-exchange mixing.
    pub axstda: f64,
    pub beta1: f64,
    pub alpha1: f64,
}

pub const STDA_PARAMETERS: &[StdaParams] = &[
    StdaParams { method: "wB97X-3c", axstda: 0.56, beta1: 8.00, alpha1: 4.58 },
    StdaParams { method: "CAM-B3LYP", axstda: 0.50, beta1: 8.00, alpha1: 4.58 },
    StdaParams { method: "M06-2X", axstda: 0.54, beta1: 8.00, alpha1: 4.58 },
    StdaParams { method: "wB97X-V", axstda: 0.56, beta1: 8.00, alpha1: 4.58 },
    StdaParams { method: "wB97X", axstda: 0.56, beta1: 8.00, alpha1: 4.58 },
];

/// Row for [`DEFAULT_METHOD`]; must stay first in the table.
const FALLBACK: StdaParams = STDA_PARAMETERS[0];

fn find(method: &str) -> Option<StdaParams> {
    STDA_PARAMETERS.iter().copied().find(|p| p.method == method)
}

/// Coefficients for `method`, falling back to [`DEFAULT_METHOD`].
///
/// Never fails. Functionals outside [`RECOMMENDED_FUNCTIONALS`] only log a
/// warning.
pub fn lookup(method: &str) -> StdaParams {
    if !RECOMMENDED_FUNCTIONALS.contains(&method) {
        warn!(
            "Functional {} not recommended: {:?}",
            method, RECOMMENDED_FUNCTIONALS
        );
    }

    find(method).unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_methods_return_their_own_row() {
        let p = lookup("CAM-B3LYP");
        assert_eq!(p.method, "CAM-B3LYP");
        assert_eq!(p.axstda, 0.50);

        let p = lookup("M06-2X");
        assert_eq!(p.axstda, 0.54);
    }

    #[test]
    fn unknown_method_falls_back_to_default() {
        let p = lookup("B3LYP");
        assert_eq!(p.method, DEFAULT_METHOD);
        assert_eq!((p.axstda, p.beta1, p.alpha1), (0.56, 8.00, 4.58));
    }

    #[test]
    fn fallback_row_is_default_method() {
        assert_eq!(FALLBACK.method, DEFAULT_METHOD);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(lookup("cam-b3lyp").method, DEFAULT_METHOD);
    }

    #[test]
    fn every_recommended_functional_has_parameters() {
        for method in RECOMMENDED_FUNCTIONALS {
            assert_eq!(find(method).map(|p| p.method), Some(*method));
        }
    }
}
