//! Control definitions and coverage evaluation for regulatory frameworks.
//!
//! Each control inspects one or two metrics against the active profile's
//! thresholds. Lower-is-better metrics get a multiplicative partial band,
//! higher-is-better metrics an additive one; the band width is a per-control
//! constant.

pub mod fda;
pub mod hipaa;
pub mod iso;
pub mod nist;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spectral_common::{CoverageItem, CoverageStatus, VerificationMetrics};
use tracing::debug;

use crate::synthesis::profiles::{Thresholds, VerificationProfile};

/// Every control the engine knows how to evaluate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlId {
    HipaaAccessEncryption,
    HipaaAuditControls,
    NistGovern1,
    NistGovern5,
    NistMap2,
    NistManage4,
    NistMeasure3,
    Iso42001Roles,
    Iso42001RiskTreatment,
    Iso42001Operation,
    FdaClinicalValidation,
}

impl ControlId {
    pub const ALL: [ControlId; 11] = [
        ControlId::HipaaAccessEncryption,
        ControlId::HipaaAuditControls,
        ControlId::NistGovern1,
        ControlId::NistGovern5,
        ControlId::NistMap2,
        ControlId::NistManage4,
        ControlId::NistMeasure3,
        ControlId::Iso42001Roles,
        ControlId::Iso42001RiskTreatment,
        ControlId::Iso42001Operation,
        ControlId::FdaClinicalValidation,
    ];

    /// The published control identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlId::HipaaAccessEncryption => "HIPAA-164.312(a)(2)(i)",
            ControlId::HipaaAuditControls => "HIPAA-164.312(b)",
            ControlId::NistGovern1 => "NIST-AI-RMF-GOVERN-1",
            ControlId::NistGovern5 => "NIST-AI-RMF-GOVERN-5",
            ControlId::NistMap2 => "NIST-AI-RMF-MAP-2",
            ControlId::NistManage4 => "NIST-AI-RMF-MANAGE-4",
            ControlId::NistMeasure3 => "NIST-AI-RMF-MEASURE-3",
            ControlId::Iso42001Roles => "ISO-42001-5.4.2",
            ControlId::Iso42001RiskTreatment => "ISO-42001-6.2.3",
            ControlId::Iso42001Operation => "ISO-42001-8.3.2",
            ControlId::FdaClinicalValidation => "FDA-DG-2.1",
        }
    }

    /// Resolve a published identifier. Unknown identifiers yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == id)
    }
}

/// Signature shared by all control evaluators.
pub type ControlCheck = fn(&VerificationMetrics, &Thresholds) -> CoverageStatus;

/// A control from a regulatory framework and how to evaluate it.
#[derive(Debug, Clone)]
pub struct ControlDefinition {
    pub control_id: ControlId,
    /// Remediation note attached when the control is not fully met.
    pub gap: &'static str,
    /// Evidence suite name, referenced as `{run_id}:{suite}`.
    pub evidence_suite: &'static str,
    pub check: ControlCheck,
}

impl ControlDefinition {
    /// Evaluate the control and build its coverage item.
    pub fn evaluate(
        &self,
        metrics: &VerificationMetrics,
        thresholds: &Thresholds,
        run_id: &str,
    ) -> CoverageItem {
        let status = (self.check)(metrics, thresholds);
        CoverageItem {
            control: self.control_id.as_str().to_string(),
            status,
            gap: (status != CoverageStatus::Met).then(|| self.gap.to_string()),
            evidence: vec![format!("{}:{}", run_id, self.evidence_suite)],
        }
    }
}

/// Met if `value <= limit`, partial if `value <= limit * factor`.
pub fn at_most(value: f64, limit: f64, factor: f64) -> CoverageStatus {
    if value <= limit {
        CoverageStatus::Met
    } else if value <= limit * factor {
        CoverageStatus::Partial
    } else {
        CoverageStatus::NotMet
    }
}

/// Met if `value >= floor`, partial if `value >= floor - margin`.
pub fn at_least(value: f64, floor: f64, margin: f64) -> CoverageStatus {
    if value >= floor {
        CoverageStatus::Met
    } else if value >= floor - margin {
        CoverageStatus::Partial
    } else {
        CoverageStatus::NotMet
    }
}

/// Enum-keyed registry of control evaluators.
pub struct ControlRegistry {
    definitions: BTreeMap<ControlId, ControlDefinition>,
}

impl ControlRegistry {
    /// Create a new registry from definitions. Later duplicates replace earlier ones.
    pub fn new(definitions: Vec<ControlDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|d| (d.control_id, d))
                .collect(),
        }
    }

    /// Registry holding every HIPAA, NIST AI RMF, ISO/IEC 42001 and FDA control.
    pub fn standard() -> Self {
        let mut definitions = hipaa::hipaa_controls();
        definitions.extend(nist::nist_controls());
        definitions.extend(iso::iso_controls());
        definitions.extend(fda::fda_controls());
        Self::new(definitions)
    }

    pub fn get(&self, id: &str) -> Option<&ControlDefinition> {
        ControlId::from_id(id).and_then(|c| self.definitions.get(&c))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Evaluate every control of a profile, in profile order.
    ///
    /// Control ids without a registered evaluator are skipped.
    pub fn build_coverage(
        &self,
        profile: &VerificationProfile,
        metrics: &VerificationMetrics,
        run_id: &str,
    ) -> Vec<CoverageItem> {
        profile
            .controls
            .iter()
            .filter_map(|id| match self.get(id) {
                Some(def) => Some(def.evaluate(metrics, &profile.thresholds, run_id)),
                None => {
                    debug!(event = "control_skipped", control = %id, "no evaluator registered");
                    None
                }
            })
            .collect()
    }
}

impl Default for ControlRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Build the coverage matrix with the standard registry.
pub fn build_coverage(
    profile: &VerificationProfile,
    metrics: &VerificationMetrics,
    run_id: &str,
) -> Vec<CoverageItem> {
    ControlRegistry::standard().build_coverage(profile, metrics, run_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::profiles::{general_profile, healthcare_profile};

    pub(crate) fn metrics(
        phi: f64,
        hallucination: f64,
        bias: f64,
        resilience: f64,
        reliability: f64,
    ) -> VerificationMetrics {
        VerificationMetrics {
            phi_leakage_rate: phi,
            hallucination_rate: hallucination,
            bias_parity_gap: bias,
            prompt_injection_resilience: resilience,
            reliability_score: reliability,
        }
    }

    #[test]
    fn test_standard_registry_covers_all_controls() {
        let registry = ControlRegistry::standard();
        assert_eq!(registry.len(), ControlId::ALL.len());
        for id in ControlId::ALL {
            assert!(registry.get(id.as_str()).is_some(), "{}", id.as_str());
        }
    }

    #[test]
    fn test_control_id_round_trip() {
        for id in ControlId::ALL {
            assert_eq!(ControlId::from_id(id.as_str()), Some(id));
        }
        assert_eq!(ControlId::from_id("SOC2-CC6.1"), None);
    }

    #[test]
    fn test_at_most_bands() {
        assert_eq!(at_most(0.2, 0.2, 1.4), CoverageStatus::Met);
        assert_eq!(at_most(0.25, 0.2, 1.4), CoverageStatus::Partial);
        assert_eq!(at_most(0.3, 0.2, 1.4), CoverageStatus::NotMet);
    }

    #[test]
    fn test_at_least_bands() {
        assert_eq!(at_least(82.0, 82.0, 5.0), CoverageStatus::Met);
        assert_eq!(at_least(77.0, 82.0, 5.0), CoverageStatus::Partial);
        assert_eq!(at_least(76.0, 82.0, 5.0), CoverageStatus::NotMet);
    }

    #[test]
    fn test_unknown_control_skipped() {
        let mut profile = general_profile();
        profile.controls.insert(1, "SOC2-CC6.1".to_string());
        let m = metrics(0.1, 1.0, 0.01, 95.0, 95.0);
        let coverage = build_coverage(&profile, &m, "run_1234");
        assert_eq!(coverage.len(), 3);
        assert!(coverage.iter().all(|c| c.control != "SOC2-CC6.1"));
    }

    #[test]
    fn test_coverage_follows_profile_order() {
        let profile = healthcare_profile();
        let m = metrics(0.1, 1.0, 0.01, 95.0, 95.0);
        let coverage = build_coverage(&profile, &m, "run_1234");
        let ids: Vec<&str> = coverage.iter().map(|c| c.control.as_str()).collect();
        assert_eq!(ids, profile.controls);
    }

    #[test]
    fn test_gap_present_iff_not_met() {
        let profile = healthcare_profile();
        let passing = metrics(0.1, 1.0, 0.01, 95.0, 95.0);
        for item in build_coverage(&profile, &passing, "run_1000") {
            assert_eq!(item.status, CoverageStatus::Met);
            assert!(item.gap.is_none());
        }
        let failing = metrics(0.9, 9.0, 0.2, 50.0, 70.0);
        for item in build_coverage(&profile, &failing, "run_1000") {
            assert_ne!(item.status, CoverageStatus::Met);
            assert!(item.gap.is_some());
        }
    }

    #[test]
    fn test_evidence_reference_format() {
        let profile = healthcare_profile();
        let m = metrics(0.1, 1.0, 0.01, 95.0, 95.0);
        let coverage = build_coverage(&profile, &m, "run_4321");
        assert_eq!(coverage[0].evidence, vec!["run_4321:phi-leakage-suite"]);
        assert_eq!(coverage[4].evidence, vec!["run_4321:clinical-validation"]);
    }
}
