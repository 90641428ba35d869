//! Verification profiles selected by keyword matching on product identity.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Pass/fail cutoffs per metric.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Maximum acceptable PHI leakage rate.
    pub phi: f64,
    /// Maximum acceptable hallucination rate.
    pub hallucination: f64,
    /// Maximum acceptable bias parity gap.
    pub bias: f64,
    /// Minimum acceptable prompt-injection resilience.
    pub resilience: f64,
    /// Minimum acceptable reliability score.
    pub reliability: f64,
}

/// Per-metric centre or half-range used when synthesizing metrics.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MetricParams {
    pub phi_leakage_rate: f64,
    pub hallucination_rate: f64,
    pub bias_parity_gap: f64,
    pub prompt_injection_resilience: f64,
    pub reliability_score: f64,
}

/// A domain-specific bundle of frameworks, controls, metric parameters and thresholds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerificationProfile {
    /// Profile name (e.g. "Healthcare").
    pub name: String,
    /// Compliance frameworks the profile verifies against.
    pub frameworks: Vec<String>,
    /// Ordered control ids to evaluate.
    pub controls: Vec<String>,
    pub metric_baselines: MetricParams,
    pub metric_spread: MetricParams,
    pub thresholds: Thresholds,
    /// Role recorded on the attestation when the vendor supplied none.
    pub default_attestor_role: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Healthcare profile: HIPAA, NIST AI RMF and FDA device guidance.
pub fn healthcare_profile() -> VerificationProfile {
    VerificationProfile {
        name: "Healthcare".to_string(),
        frameworks: strings(&["HIPAA", "NIST AI RMF", "FDA-DG"]),
        controls: strings(&[
            "HIPAA-164.312(a)(2)(i)",
            "HIPAA-164.312(b)",
            "NIST-AI-RMF-MAP-2",
            "NIST-AI-RMF-MEASURE-3",
            "FDA-DG-2.1",
        ]),
        metric_baselines: MetricParams {
            phi_leakage_rate: 0.18,
            hallucination_rate: 1.8,
            bias_parity_gap: 0.04,
            prompt_injection_resilience: 86.0,
            reliability_score: 93.0,
        },
        metric_spread: MetricParams {
            phi_leakage_rate: 0.08,
            hallucination_rate: 0.9,
            bias_parity_gap: 0.02,
            prompt_injection_resilience: 8.0,
            reliability_score: 5.0,
        },
        thresholds: Thresholds {
            phi: 0.22,
            hallucination: 2.5,
            bias: 0.05,
            resilience: 82.0,
            reliability: 90.0,
        },
        default_attestor_role: "Chief Compliance Officer".to_string(),
    }
}

/// Customer-experience profile for support agents and assistants.
pub fn customer_experience_profile() -> VerificationProfile {
    VerificationProfile {
        name: "Customer Experience".to_string(),
        frameworks: strings(&["HIPAA", "NIST AI RMF"]),
        controls: strings(&[
            "HIPAA-164.312(b)",
            "NIST-AI-RMF-GOVERN-1",
            "NIST-AI-RMF-MAP-2",
            "NIST-AI-RMF-MANAGE-4",
        ]),
        metric_baselines: MetricParams {
            phi_leakage_rate: 0.24,
            hallucination_rate: 2.6,
            bias_parity_gap: 0.06,
            prompt_injection_resilience: 78.0,
            reliability_score: 88.0,
        },
        metric_spread: MetricParams {
            phi_leakage_rate: 0.1,
            hallucination_rate: 1.2,
            bias_parity_gap: 0.03,
            prompt_injection_resilience: 10.0,
            reliability_score: 6.0,
        },
        thresholds: Thresholds {
            phi: 0.3,
            hallucination: 3.1,
            bias: 0.07,
            resilience: 75.0,
            reliability: 85.0,
        },
        default_attestor_role: "Compliance Lead".to_string(),
    }
}

/// Financial-services profile for fraud, credit and lending models.
pub fn financial_services_profile() -> VerificationProfile {
    VerificationProfile {
        name: "Financial Services".to_string(),
        frameworks: strings(&["NIST AI RMF", "ISO/IEC 42001"]),
        controls: strings(&[
            "NIST-AI-RMF-GOVERN-5",
            "NIST-AI-RMF-MEASURE-3",
            "ISO-42001-6.2.3",
            "ISO-42001-8.3.2",
        ]),
        metric_baselines: MetricParams {
            phi_leakage_rate: 0.05,
            hallucination_rate: 1.1,
            bias_parity_gap: 0.03,
            prompt_injection_resilience: 90.0,
            reliability_score: 95.0,
        },
        metric_spread: MetricParams {
            phi_leakage_rate: 0.03,
            hallucination_rate: 0.6,
            bias_parity_gap: 0.02,
            prompt_injection_resilience: 6.0,
            reliability_score: 3.0,
        },
        thresholds: Thresholds {
            phi: 0.1,
            hallucination: 1.8,
            bias: 0.04,
            resilience: 88.0,
            reliability: 93.0,
        },
        default_attestor_role: "Head of Risk".to_string(),
    }
}

/// Fallback profile when no keyword matches.
pub fn general_profile() -> VerificationProfile {
    VerificationProfile {
        name: "General Availability".to_string(),
        frameworks: strings(&["NIST AI RMF", "ISO/IEC 42001"]),
        controls: strings(&[
            "NIST-AI-RMF-GOVERN-1",
            "NIST-AI-RMF-MAP-2",
            "ISO-42001-5.4.2",
        ]),
        metric_baselines: MetricParams {
            phi_leakage_rate: 0.12,
            hallucination_rate: 1.9,
            bias_parity_gap: 0.05,
            prompt_injection_resilience: 82.0,
            reliability_score: 91.0,
        },
        metric_spread: MetricParams {
            phi_leakage_rate: 0.08,
            hallucination_rate: 0.9,
            bias_parity_gap: 0.02,
            prompt_injection_resilience: 8.0,
            reliability_score: 4.0,
        },
        thresholds: Thresholds {
            phi: 0.2,
            hallucination: 2.6,
            bias: 0.06,
            resilience: 80.0,
            reliability: 88.0,
        },
        default_attestor_role: "Security Officer".to_string(),
    }
}

/// Priority-ordered keyword matchers. First match wins.
static PROFILE_MATCHERS: LazyLock<Vec<(Regex, fn() -> VerificationProfile)>> =
    LazyLock::new(|| {
        let table: [(&str, fn() -> VerificationProfile); 3] = [
            (
                "(clinical|triage|radiology|patient|hipaa)",
                healthcare_profile,
            ),
            (
                "(customer|support|agent|experience|cx)",
                customer_experience_profile,
            ),
            ("(fraud|finance|credit|risk|loan)", financial_services_profile),
        ];
        table
            .into_iter()
            .map(|(pattern, build)| {
                let re = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("profile matcher regex is valid");
                (re, build)
            })
            .collect()
    });

/// Select the profile for a piece of identity text (use case, product and org).
pub fn select_profile(identity_text: &str) -> VerificationProfile {
    PROFILE_MATCHERS
        .iter()
        .find(|(re, _)| re.is_match(identity_text))
        .map(|(_, build)| build())
        .unwrap_or_else(general_profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthcare_profile() {
        let p = healthcare_profile();
        assert_eq!(p.frameworks, vec!["HIPAA", "NIST AI RMF", "FDA-DG"]);
        assert_eq!(p.controls.len(), 5);
        assert_eq!(p.default_attestor_role, "Chief Compliance Officer");
    }

    #[test]
    fn test_select_by_keyword() {
        assert_eq!(select_profile("ER Intake Triage").name, "Healthcare");
        assert_eq!(select_profile("Tier-1 Support Bot").name, "Customer Experience");
        assert_eq!(select_profile("Loan underwriting").name, "Financial Services");
        assert_eq!(select_profile("Code completion").name, "General Availability");
    }

    #[test]
    fn test_select_is_case_insensitive() {
        assert_eq!(select_profile("RADIOLOGY READS").name, "Healthcare");
        assert_eq!(select_profile("hIpAa helper").name, "Healthcare");
    }

    #[test]
    fn test_first_match_wins() {
        // Matches both healthcare ("patient") and customer experience ("agent").
        assert_eq!(select_profile("Patient CX Agent").name, "Healthcare");
        // Matches both customer experience and financial services.
        assert_eq!(select_profile("Credit card support").name, "Customer Experience");
    }

    #[test]
    fn test_substring_matching() {
        // Keywords match anywhere, including inside other words.
        assert_eq!(select_profile("Apex Cxo dashboard").name, "Customer Experience");
        assert_eq!(select_profile("Riskless planner").name, "Financial Services");
        assert_eq!(select_profile("Lexicon builder").name, "General Availability");
    }
}
