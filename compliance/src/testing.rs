//! Passport and policy fixtures shared by unit tests.

use spectral_common::{
    CreationStep, ModelInfo, MonitoringStatus, PassportStatus, Policy, PolicyStatus, Subject,
    TrustPassport, Verification, VerificationMetrics, VerificationRun,
};

pub(crate) fn draft_passport(id: &str, product: &str, use_case: &str) -> TrustPassport {
    TrustPassport {
        id: id.to_string(),
        monitoring_status: MonitoringStatus::Inactive,
        overall_compliance: 0,
        passport_version: "1.0".to_string(),
        issued_at: String::new(),
        spectral_signature: None,
        vendor_attestation: None,
        subject: Subject {
            org: "AcmeAI".to_string(),
            product: product.to_string(),
            model: ModelInfo {
                provider: "openai:gpt-4o-mini".to_string(),
                version: "2025-09-15".to_string(),
                customizations: vec![],
            },
            environment: "Production".to_string(),
            use_case: use_case.to_string(),
        },
        verification: None,
        coverage_matrix: None,
        risk_register: None,
        expiration: String::new(),
        status: PassportStatus::Draft,
        creation_step: CreationStep::Complete,
        policies: None,
        review_notes: None,
    }
}

/// Verified passport with one run; leakage 0.1, hallucination 0.5.
pub(crate) fn verified_passport(
    id: &str,
    use_case: &str,
    environment: &str,
    reliability: f64,
) -> TrustPassport {
    let mut p = draft_passport(id, "Fixture Product", use_case);
    p.subject.environment = environment.to_string();
    p.status = PassportStatus::Verified;
    p.verification = Some(Verification {
        frameworks: vec!["HIPAA".to_string()],
        runs: vec![VerificationRun {
            run_id: "run_1234".to_string(),
            started_at: "2026-03-01T08:56:00.000Z".to_string(),
            finished_at: "2026-03-01T09:00:00.000Z".to_string(),
            evidence: vec![],
            metrics: VerificationMetrics {
                phi_leakage_rate: 0.1,
                hallucination_rate: 0.5,
                bias_parity_gap: 0.02,
                prompt_injection_resilience: 95.0,
                reliability_score: reliability,
            },
        }],
    });
    p.coverage_matrix = Some(vec![]);
    p.risk_register = Some(vec![]);
    p
}

pub(crate) fn policy(id: &str, rules: &str) -> Policy {
    Policy {
        id: id.to_string(),
        name: format!("Policy {}", id),
        description: String::new(),
        rules: rules.to_string(),
        status: PolicyStatus::Active,
        models_applied: 0,
    }
}
