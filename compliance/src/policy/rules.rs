//! Policy rules document: parser and typed representation.
//!
//! ```yaml
//! target:
//!   use_case: 'Clinical Decision Support for Radiology'   # optional
//!   environment: 'Production'                             # optional
//! requirements:
//!   - metric: reliability_score
//!     threshold: 95
//!     condition: '>='
//! ```
//!
//! The document is YAML; JSON is accepted as a subset.

use serde::Deserialize;
use spectral_common::{MetricName, TrustPassport, VerificationMetrics};

use crate::error::{ComplianceError, ComplianceResult, PolicyParseKind};

/// Which passports a policy applies to. Absent filters match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Target {
    pub use_case: Option<String>,
    pub environment: Option<String>,
}

impl Target {
    /// True when every present filter equals the passport's field exactly.
    pub fn matches(&self, passport: &TrustPassport) -> bool {
        let use_case_ok = self
            .use_case
            .as_deref()
            .map_or(true, |uc| uc == passport.subject.use_case);
        let environment_ok = self
            .environment
            .as_deref()
            .map_or(true, |env| env == passport.subject.environment);
        use_case_ok && environment_ok
    }
}

/// Comparison applied between a metric and a threshold.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `>=`
    AtLeast,
    /// `<=`
    AtMost,
    /// `==`, exact floating-point equality.
    Equal,
    /// Anything else. Never satisfied.
    Unrecognized(String),
}

impl Condition {
    pub fn parse(text: &str) -> Self {
        match text {
            ">=" => Condition::AtLeast,
            "<=" => Condition::AtMost,
            "==" => Condition::Equal,
            other => Condition::Unrecognized(other.to_string()),
        }
    }

    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Condition::AtLeast => value >= threshold,
            Condition::AtMost => value <= threshold,
            #[allow(clippy::float_cmp)]
            Condition::Equal => value == threshold,
            Condition::Unrecognized(_) => false,
        }
    }
}

/// A single metric requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    /// Metric field name as written; may name no known metric.
    pub metric: String,
    pub threshold: Option<f64>,
    pub condition: Condition,
}

/// Outcome of checking one requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum RequirementOutcome {
    Satisfied,
    UnknownMetric,
    MissingThreshold,
    Violated { value: f64 },
}

impl Requirement {
    pub fn check(&self, metrics: &VerificationMetrics) -> RequirementOutcome {
        let Some(metric) = MetricName::from_field(&self.metric) else {
            return RequirementOutcome::UnknownMetric;
        };
        let Some(threshold) = self.threshold else {
            return RequirementOutcome::MissingThreshold;
        };
        let value = metrics.get(metric);
        if self.condition.holds(value, threshold) {
            RequirementOutcome::Satisfied
        } else {
            RequirementOutcome::Violated { value }
        }
    }
}

/// Parsed policy rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RulesDocument {
    pub target: Target,
    pub requirements: Vec<Requirement>,
}

// Wire shape, lowered into the typed document above.

#[derive(Deserialize)]
struct RawDocument {
    target: Option<RawTarget>,
    requirements: Option<Vec<RawRequirement>>,
}

#[derive(Deserialize)]
struct RawTarget {
    use_case: Option<String>,
    environment: Option<String>,
}

#[derive(Deserialize)]
struct RawRequirement {
    metric: Option<String>,
    threshold: Option<RawThreshold>,
    condition: Option<String>,
}

/// Thresholds may be written quoted (`threshold: '95'`).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawThreshold {
    Number(f64),
    Text(String),
}

impl RawThreshold {
    /// Blank text reads as zero. Text that is not a number becomes NaN, which
    /// no comparison satisfies.
    fn value(self) -> f64 {
        match self {
            RawThreshold::Number(v) => v,
            RawThreshold::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    0.0
                } else {
                    text.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl RulesDocument {
    /// Parse a rules document.
    pub fn parse(text: &str) -> ComplianceResult<Self> {
        let raw: Option<RawDocument> = serde_yaml::from_str(text)?;
        let raw = raw.ok_or_else(|| {
            ComplianceError::policy_parse(PolicyParseKind::MissingTarget, "document is empty")
        })?;

        let target = raw.target.ok_or_else(|| {
            ComplianceError::policy_parse(PolicyParseKind::MissingTarget, "no `target` map")
        })?;
        let requirements = raw.requirements.ok_or_else(|| {
            ComplianceError::policy_parse(
                PolicyParseKind::MissingRequirements,
                "no `requirements` list",
            )
        })?;

        Ok(Self {
            target: Target {
                use_case: non_empty(target.use_case),
                environment: non_empty(target.environment),
            },
            requirements: requirements
                .into_iter()
                .map(|r| Requirement {
                    metric: r.metric.unwrap_or_default(),
                    threshold: r.threshold.map(RawThreshold::value),
                    condition: Condition::parse(r.condition.as_deref().unwrap_or("")),
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CDS_RULES: &str = r#"
# This policy applies to models with the 'clinical decision support' use case.
target:
  use_case: 'Clinical Decision Support for Radiology'
requirements:
  - metric: reliability_score
    threshold: 95
    condition: '>='
  - metric: hallucination_rate
    threshold: 1.0
    condition: '<='
    "#;

    fn metrics(reliability: f64, hallucination: f64) -> VerificationMetrics {
        VerificationMetrics {
            phi_leakage_rate: 0.0,
            hallucination_rate: hallucination,
            bias_parity_gap: 0.02,
            prompt_injection_resilience: 95.0,
            reliability_score: reliability,
        }
    }

    #[test]
    fn test_parse_seed_policy() {
        let doc = RulesDocument::parse(CDS_RULES).unwrap();
        assert_eq!(
            doc.target.use_case.as_deref(),
            Some("Clinical Decision Support for Radiology")
        );
        assert_eq!(doc.target.environment, None);
        assert_eq!(doc.requirements.len(), 2);
        assert_eq!(doc.requirements[0].metric, "reliability_score");
        assert_eq!(doc.requirements[0].threshold, Some(95.0));
        assert_eq!(doc.requirements[0].condition, Condition::AtLeast);
        assert_eq!(doc.requirements[1].condition, Condition::AtMost);
    }

    #[test]
    fn test_parse_json_document() {
        let doc = RulesDocument::parse(
            r#"{"target": {"environment": "Production"},
                "requirements": [{"metric": "phi_leakage_rate", "threshold": 0.0, "condition": "=="}]}"#,
        )
        .unwrap();
        assert_eq!(doc.target.environment.as_deref(), Some("Production"));
        assert_eq!(doc.requirements[0].condition, Condition::Equal);
    }

    #[test]
    fn test_missing_target_rejected() {
        let err = RulesDocument::parse("requirements: []").unwrap_err();
        assert!(matches!(
            err,
            ComplianceError::PolicyParse {
                kind: PolicyParseKind::MissingTarget,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_requirements_rejected() {
        let err = RulesDocument::parse("target:\n  environment: Production\n").unwrap_err();
        assert!(matches!(
            err,
            ComplianceError::PolicyParse {
                kind: PolicyParseKind::MissingRequirements,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        assert!(RulesDocument::parse("target: [unclosed").is_err());
        assert!(RulesDocument::parse("").is_err());
        assert!(RulesDocument::parse("just a sentence").is_err());
    }

    #[test]
    fn test_empty_filters_ignored() {
        let doc = RulesDocument::parse("target:\n  use_case: ''\nrequirements: []\n").unwrap();
        assert_eq!(doc.target, Target::default());
    }

    #[test]
    fn test_unknown_condition_kept() {
        let doc = RulesDocument::parse(
            "target: {}\nrequirements:\n  - metric: reliability_score\n    threshold: 90\n    condition: '>'\n",
        )
        .unwrap();
        assert_eq!(
            doc.requirements[0].condition,
            Condition::Unrecognized(">".to_string())
        );
        assert!(!doc.requirements[0].condition.holds(99.0, 90.0));
    }

    #[test]
    fn test_requirement_outcomes() {
        let doc = RulesDocument::parse(CDS_RULES).unwrap();
        let reliability = &doc.requirements[0];
        assert_eq!(reliability.check(&metrics(96.0, 0.5)), RequirementOutcome::Satisfied);
        assert_eq!(
            reliability.check(&metrics(94.0, 0.5)),
            RequirementOutcome::Violated { value: 94.0 }
        );

        let unknown = Requirement {
            metric: "latency_ms".to_string(),
            threshold: Some(1.0),
            condition: Condition::AtMost,
        };
        assert_eq!(unknown.check(&metrics(96.0, 0.5)), RequirementOutcome::UnknownMetric);

        let no_threshold = Requirement {
            metric: "reliability_score".to_string(),
            threshold: None,
            condition: Condition::AtLeast,
        };
        assert_eq!(
            no_threshold.check(&metrics(96.0, 0.5)),
            RequirementOutcome::MissingThreshold
        );
    }

    #[test]
    fn test_quoted_threshold_coerced() {
        let doc = RulesDocument::parse(
            "target: {}\nrequirements:\n  - metric: reliability_score\n    threshold: '95'\n    condition: '>='\n  - metric: hallucination_rate\n    threshold: ' 1.5 '\n    condition: '<='\n",
        )
        .unwrap();
        assert_eq!(doc.requirements[0].threshold, Some(95.0));
        assert_eq!(doc.requirements[1].threshold, Some(1.5));
        assert_eq!(
            doc.requirements[0].check(&metrics(96.0, 0.5)),
            RequirementOutcome::Satisfied
        );
    }

    #[test]
    fn test_non_numeric_threshold_never_satisfied() {
        let doc = RulesDocument::parse(
            "target: {}\nrequirements:\n  - metric: reliability_score\n    threshold: high\n    condition: '>='\n",
        )
        .unwrap();
        assert!(doc.requirements[0].threshold.unwrap().is_nan());
        assert!(matches!(
            doc.requirements[0].check(&metrics(99.0, 0.5)),
            RequirementOutcome::Violated { .. }
        ));
    }

    #[test]
    fn test_exact_equality() {
        assert!(Condition::Equal.holds(0.0, 0.0));
        assert!(!Condition::Equal.holds(0.001, 0.0));
    }
}
