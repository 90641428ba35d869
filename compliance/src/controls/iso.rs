//! ISO/IEC 42001 AI management system controls.

use super::{at_least, at_most, ControlDefinition, ControlId};

/// ISO/IEC 42001 controls evaluated by the engine.
pub fn iso_controls() -> Vec<ControlDefinition> {
    vec![
        ControlDefinition {
            control_id: ControlId::Iso42001Roles,
            gap: "Fairness KPIs require executive sign-off and mitigation roadmap.",
            evidence_suite: "iso-governance-matrix",
            check: |m, t| at_most(m.bias_parity_gap, t.bias, 1.5),
        },
        ControlDefinition {
            control_id: ControlId::Iso42001RiskTreatment,
            gap: "Evaluation coverage gaps detected for multilingual scenarios.",
            evidence_suite: "iso-eval-suite",
            check: |m, t| at_most(m.hallucination_rate, t.hallucination, 1.3),
        },
        ControlDefinition {
            control_id: ControlId::Iso42001Operation,
            gap: "Incident playbooks must be integrated with runtime monitoring.",
            evidence_suite: "incident-playbook",
            check: |m, t| at_least(m.reliability_score, t.reliability, 15.0),
        },
    ]
}
