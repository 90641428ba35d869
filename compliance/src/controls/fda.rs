//! FDA device guidance controls for clinical decision support.

use spectral_common::CoverageStatus;

use super::{ControlDefinition, ControlId};

/// FDA controls evaluated by the engine.
///
/// Clinical validation is met only when both reliability and bias pass;
/// otherwise it is partial, never not-met.
pub fn fda_controls() -> Vec<ControlDefinition> {
    vec![ControlDefinition {
        control_id: ControlId::FdaClinicalValidation,
        gap: "Submit updated clinical validation package and human factors study.",
        evidence_suite: "clinical-validation",
        check: |m, t| {
            if m.reliability_score >= t.reliability && m.bias_parity_gap <= t.bias {
                CoverageStatus::Met
            } else {
                CoverageStatus::Partial
            }
        },
    }]
}
