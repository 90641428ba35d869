//! NIST AI Risk Management Framework controls.

use super::{at_least, at_most, ControlDefinition, ControlId};

/// NIST AI RMF controls evaluated by the engine.
pub fn nist_controls() -> Vec<ControlDefinition> {
    vec![
        ControlDefinition {
            control_id: ControlId::NistGovern1,
            gap: "Document accountable owners and review cadence for AI governance.",
            evidence_suite: "governance-register",
            check: |m, t| at_least(m.reliability_score, t.reliability, 5.0),
        },
        ControlDefinition {
            control_id: ControlId::NistGovern5,
            gap: "Bias remediation plan and controls must be refreshed.",
            evidence_suite: "bias-probe-results",
            check: |m, t| at_most(m.bias_parity_gap, t.bias, 1.4),
        },
        ControlDefinition {
            control_id: ControlId::NistMap2,
            gap: "Tighten human-in-the-loop review for high-risk intents.",
            evidence_suite: "hallucination-eval",
            check: |m, t| at_most(m.hallucination_rate, t.hallucination, 1.4),
        },
        ControlDefinition {
            control_id: ControlId::NistManage4,
            gap: "Add break-glass workflow and runtime guardrails.",
            evidence_suite: "runtime-guardrail-review",
            check: |m, t| at_least(m.prompt_injection_resilience, t.resilience, 10.0),
        },
        ControlDefinition {
            control_id: ControlId::NistMeasure3,
            gap: "Runtime SLOs falling below threshold; update measurement plan.",
            evidence_suite: "reliability-slo-report",
            check: |m, t| at_least(m.reliability_score, t.reliability, 10.0),
        },
    ]
}
