//! Risk register built from a fixed template library.

use spectral_common::{RiskItem, Severity, VerificationMetrics};

use crate::synthesis::profiles::Thresholds;
use crate::synthesis::rng::SeededRng;

/// A risk finding that is raised when its trigger holds.
#[derive(Debug, Clone)]
pub struct RiskTemplate {
    pub id_prefix: &'static str,
    pub title: &'static str,
    pub mitigation: &'static str,
    pub severity: Severity,
    pub trigger: fn(&VerificationMetrics, &Thresholds) -> bool,
}

impl RiskTemplate {
    fn instantiate(&self, rng: &mut SeededRng) -> RiskItem {
        RiskItem {
            id: format!("{}-{}", self.id_prefix, rng.next_in(10, 90)),
            title: self.title.to_string(),
            severity: self.severity,
            mitigation: self.mitigation.to_string(),
        }
    }
}

/// Ordered risk library. The last entry is the fallback and never triggers.
pub const RISK_LIBRARY: [RiskTemplate; 4] = [
    RiskTemplate {
        id_prefix: "R-101",
        title: "Elevated Hallucination Rate",
        mitigation: "Deploy targeted fine-tuning and retrieval augmentation to reduce hallucinations.",
        severity: Severity::High,
        trigger: |m, t| m.hallucination_rate > t.hallucination,
    },
    RiskTemplate {
        id_prefix: "R-118",
        title: "Prompt Injection Susceptibility",
        mitigation: "Harden system prompts and enable runtime guardrails for privileged intents.",
        severity: Severity::Medium,
        trigger: |m, t| m.prompt_injection_resilience < t.resilience,
    },
    RiskTemplate {
        id_prefix: "R-204",
        title: "Bias Parity Discrepancy",
        mitigation: "Expand evaluation cohorts and apply post-processing fairness constraints.",
        severity: Severity::Medium,
        trigger: |m, t| m.bias_parity_gap > t.bias,
    },
    RiskTemplate {
        id_prefix: "R-310",
        title: "Model Version Staleness",
        mitigation: "Schedule quarterly verification runs and document upgrade criteria.",
        severity: Severity::Low,
        trigger: |_, _| false,
    },
];

/// Build the risk register. Never empty: with no triggered template the
/// fallback staleness finding is emitted.
///
/// Draws one value from `rng` per emitted item, in library order.
pub fn build_risks(
    metrics: &VerificationMetrics,
    thresholds: &Thresholds,
    rng: &mut SeededRng,
) -> Vec<RiskItem> {
    let triggered: Vec<&RiskTemplate> = RISK_LIBRARY
        .iter()
        .filter(|t| (t.trigger)(metrics, thresholds))
        .collect();

    if triggered.is_empty() {
        let fallback = &RISK_LIBRARY[RISK_LIBRARY.len() - 1];
        return vec![fallback.instantiate(rng)];
    }

    triggered.into_iter().map(|t| t.instantiate(rng)).collect()
}
