//! Policy compliance evaluation against passports.

pub mod rules;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use spectral_common::{
    ComplianceStatus, PassportStatus, Policy, PolicyCompliance, PolicyStatus, TrustPassport,
};
use tracing::warn;

use rules::{RequirementOutcome, RulesDocument};

/// Result of evaluating one policy against one passport, with the reason.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PolicyEvaluation {
    pub policy_id: String,
    pub passport_id: String,
    pub status: ComplianceStatus,
    /// Explanation of the result.
    pub reason: String,
}

/// Evaluates policy rules documents against passports.
///
/// Never fails: malformed documents, unverified passports and verifications
/// without runs yield `NotApplicable`; unknown or failing metrics yield
/// `NonCompliant`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PolicyEngine;

impl PolicyEngine {
    /// Evaluate with a reason attached.
    pub fn evaluate_detailed(&self, passport: &TrustPassport, policy: &Policy) -> PolicyEvaluation {
        let (status, reason) = self.classify(passport, policy);
        PolicyEvaluation {
            policy_id: policy.id.clone(),
            passport_id: passport.id.clone(),
            status,
            reason,
        }
    }

    /// Evaluate one policy against one passport.
    pub fn evaluate(&self, passport: &TrustPassport, policy: &Policy) -> ComplianceStatus {
        self.classify(passport, policy).0
    }

    fn classify(&self, passport: &TrustPassport, policy: &Policy) -> (ComplianceStatus, String) {
        if passport.status == PassportStatus::Draft {
            return (
                ComplianceStatus::NotApplicable,
                "Passport is still a draft".to_string(),
            );
        }
        let Some(verification) = passport.verification.as_ref() else {
            return (
                ComplianceStatus::NotApplicable,
                "Passport has no verification data".to_string(),
            );
        };

        let document = match RulesDocument::parse(&policy.rules) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(
                    event = "policy_parse_failed",
                    policy_id = %policy.id,
                    error = %e,
                    "treating policy as not applicable"
                );
                return (
                    ComplianceStatus::NotApplicable,
                    format!("Policy rules could not be parsed: {}", e),
                );
            }
        };

        if !document.target.matches(passport) {
            return (
                ComplianceStatus::NotApplicable,
                "Passport is outside the policy target".to_string(),
            );
        }

        let primary = verification.primary_metrics();
        for req in &document.requirements {
            let Some(metrics) = primary else {
                return (
                    ComplianceStatus::NotApplicable,
                    "Verification has no runs to check against".to_string(),
                );
            };
            let failure = match req.check(metrics) {
                RequirementOutcome::Satisfied => continue,
                RequirementOutcome::UnknownMetric => {
                    format!("Metric '{}' not found", req.metric)
                }
                RequirementOutcome::MissingThreshold => {
                    format!("Requirement on '{}' has no threshold", req.metric)
                }
                RequirementOutcome::Violated { value } => format!(
                    "{} = {} fails {:?} {}",
                    req.metric,
                    value,
                    req.condition,
                    req.threshold.unwrap_or_default()
                ),
            };
            return (ComplianceStatus::NonCompliant, failure);
        }

        (
            ComplianceStatus::Compliant,
            format!("All {} requirements passed", document.requirements.len()),
        )
    }
}

/// Re-score every passport against every active policy.
///
/// Replaces each passport's `policies` list and returns the policies with
/// `models_applied` recomputed: the number of passports for which the policy
/// was not `NotApplicable`. Draft policies are not evaluated and count zero.
pub fn apply_policies_to_portfolio(
    policies: &[Policy],
    passports: &mut [TrustPassport],
) -> Vec<Policy> {
    let engine = PolicyEngine;
    let active: Vec<&Policy> = policies
        .iter()
        .filter(|p| p.status == PolicyStatus::Active)
        .collect();

    let mut applied: HashMap<&str, u32> = policies.iter().map(|p| (p.id.as_str(), 0)).collect();

    for passport in passports.iter_mut() {
        let statuses: Vec<PolicyCompliance> = active
            .iter()
            .map(|policy| {
                let status = engine.evaluate(passport, policy);
                if status != ComplianceStatus::NotApplicable {
                    if let Some(count) = applied.get_mut(policy.id.as_str()) {
                        *count += 1;
                    }
                }
                PolicyCompliance {
                    policy_id: policy.id.clone(),
                    policy_name: policy.name.clone(),
                    status,
                }
            })
            .collect();
        passport.policies = Some(statuses);
    }

    policies
        .iter()
        .map(|p| Policy {
            models_applied: applied.get(p.id.as_str()).copied().unwrap_or(0),
            ..p.clone()
        })
        .collect()
}
