//! Demo portfolio and policies installed into an empty store.

use spectral_common::{
    CoverageItem, CoverageStatus, CreationStep, ModelInfo, MonitoringStatus, PassportStatus,
    Policy, PolicyStatus, RiskItem, Severity, Subject, TrustPassport, VendorAttestation,
    Verification, VerificationMetrics, VerificationRun,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn coverage(control: &str, status: CoverageStatus, gap: Option<&str>, evidence: &str) -> CoverageItem {
    CoverageItem {
        control: control.to_string(),
        status,
        gap: gap.map(str::to_string),
        evidence: vec![evidence.to_string()],
    }
}

fn risk(id: &str, title: &str, severity: Severity, mitigation: &str) -> RiskItem {
    RiskItem {
        id: id.to_string(),
        title: title.to_string(),
        severity,
        mitigation: mitigation.to_string(),
    }
}

fn attestation(signer: &str, role: &str, timestamp: &str) -> VendorAttestation {
    VendorAttestation {
        signer: signer.to_string(),
        role: role.to_string(),
        timestamp: timestamp.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn run(
    run_id: &str,
    started_at: &str,
    finished_at: &str,
    phi: f64,
    hallucination: f64,
    bias: f64,
    resilience: f64,
    reliability: f64,
) -> VerificationRun {
    VerificationRun {
        run_id: run_id.to_string(),
        started_at: started_at.to_string(),
        finished_at: finished_at.to_string(),
        evidence: strings(&["s3://..."]),
        metrics: VerificationMetrics {
            phi_leakage_rate: phi,
            hallucination_rate: hallucination,
            bias_parity_gap: bias,
            prompt_injection_resilience: resilience,
            reliability_score: reliability,
        },
    }
}

/// Three passports: one verified, one under review, one expired.
pub fn initial_portfolio() -> Vec<TrustPassport> {
    vec![
        TrustPassport {
            id: "prod_acme_triage_01".to_string(),
            monitoring_status: MonitoringStatus::Active,
            overall_compliance: 92,
            passport_version: "1.0".to_string(),
            issued_at: "2025-10-21T12:00:00Z".to_string(),
            spectral_signature: Some("base64-ed25519-mock-signature-string".to_string()),
            vendor_attestation: Some(attestation("ciso@acmeai.com", "CISO", "2025-10-21T11:55:00Z")),
            subject: Subject {
                org: "AcmeAI".to_string(),
                product: "Acme Triage".to_string(),
                model: ModelInfo {
                    provider: "openai:gpt-4o-mini".to_string(),
                    version: "2025-09-15".to_string(),
                    customizations: strings(&["System Prompts", "Tooling"]),
                },
                environment: "Production".to_string(),
                use_case: "ER Intake Triage".to_string(),
            },
            verification: Some(Verification {
                frameworks: strings(&["HIPAA", "NIST AI RMF", "ISO/IEC 42001"]),
                runs: vec![run(
                    "run_123",
                    "2025-10-20T09:00:00Z",
                    "2025-10-20T09:03:00Z",
                    0.1,
                    1.8,
                    0.04,
                    82.0,
                    91.0,
                )],
            }),
            coverage_matrix: Some(vec![
                coverage(
                    "HIPAA-164.312(a)(2)(i)",
                    CoverageStatus::Met,
                    None,
                    "run_123:phi_leakage_test",
                ),
                coverage(
                    "NIST-AI-RMF-GOVERN-5",
                    CoverageStatus::Partial,
                    Some("Requires human-in-the-loop workflow docs."),
                    "run_123:bias_parity_test",
                ),
            ]),
            risk_register: Some(vec![risk(
                "R-017",
                "Prompt Injection",
                Severity::Medium,
                "System prompt hardening implemented.",
            )]),
            expiration: "2026-01-20T00:00:00Z".to_string(),
            status: PassportStatus::Verified,
            creation_step: CreationStep::Complete,
            policies: Some(vec![]),
            review_notes: None,
        },
        TrustPassport {
            id: "prod_healthco_cx_agent_01".to_string(),
            monitoring_status: MonitoringStatus::Inactive,
            overall_compliance: 75,
            passport_version: "0.9".to_string(),
            issued_at: "2025-09-15T10:00:00Z".to_string(),
            spectral_signature: Some("base64-ed25519-mock-signature-string-2".to_string()),
            vendor_attestation: Some(attestation(
                "compliance@healthco.ai",
                "Compliance Lead",
                "2025-09-15T09:45:00Z",
            )),
            subject: Subject {
                org: "HealthCo AI".to_string(),
                product: "Patient CX Agent".to_string(),
                model: ModelInfo {
                    provider: "anthropic:claude-3-sonnet".to_string(),
                    version: "2025-08-01".to_string(),
                    customizations: strings(&["Fine-tuning"]),
                },
                environment: "Production".to_string(),
                use_case: "Post-discharge patient follow-up".to_string(),
            },
            verification: Some(Verification {
                frameworks: strings(&["HIPAA", "NIST AI RMF"]),
                runs: vec![run(
                    "run_456",
                    "2025-09-14T11:00:00Z",
                    "2025-09-14T11:05:00Z",
                    0.3,
                    3.1,
                    0.08,
                    70.0,
                    85.0,
                )],
            }),
            coverage_matrix: Some(vec![
                coverage(
                    "HIPAA-164.312(b)",
                    CoverageStatus::Met,
                    None,
                    "run_456:access_control_tests",
                ),
                coverage(
                    "NIST-AI-RMF-MAP-2",
                    CoverageStatus::Partial,
                    Some("Hallucination rate exceeds policy threshold."),
                    "run_456:hallucination_test",
                ),
            ]),
            risk_register: Some(vec![risk(
                "R-025",
                "Elevated Hallucination Rate",
                Severity::High,
                "Additional fine-tuning and retrieval-augmented generation (RAG) implementation planned.",
            )]),
            expiration: "2025-12-15T00:00:00Z".to_string(),
            status: PassportStatus::UnderReview,
            creation_step: CreationStep::Complete,
            policies: Some(vec![]),
            review_notes: None,
        },
        TrustPassport {
            id: "prod_radvision_dx_01".to_string(),
            monitoring_status: MonitoringStatus::Active,
            overall_compliance: 88,
            passport_version: "1.1".to_string(),
            issued_at: "2025-07-01T14:00:00Z".to_string(),
            spectral_signature: Some("base64-ed25519-mock-signature-string-3".to_string()),
            vendor_attestation: Some(attestation("cto@radvision.com", "CTO", "2025-07-01T13:50:00Z")),
            subject: Subject {
                org: "RadVision".to_string(),
                product: "Radiology DX".to_string(),
                model: ModelInfo {
                    provider: "google:gemini-2.5-pro".to_string(),
                    version: "2025-06-20".to_string(),
                    customizations: strings(&["Domain-specific fine-tuning"]),
                },
                environment: "Production".to_string(),
                use_case: "Clinical Decision Support for Radiology".to_string(),
            },
            verification: Some(Verification {
                frameworks: strings(&["HIPAA", "FDA-DG"]),
                runs: vec![run(
                    "run_789",
                    "2025-06-30T16:00:00Z",
                    "2025-06-30T16:10:00Z",
                    0.0,
                    0.5,
                    0.02,
                    95.0,
                    96.0,
                )],
            }),
            coverage_matrix: Some(vec![coverage(
                "FDA-DG-2.1",
                CoverageStatus::Met,
                None,
                "run_789:clinical_validation_suite",
            )]),
            risk_register: Some(vec![risk(
                "R-009",
                "Model Version Staleness",
                Severity::Low,
                "Quarterly re-verification schedule is in place.",
            )]),
            expiration: "2025-09-30T00:00:00Z".to_string(),
            status: PassportStatus::Expired,
            creation_step: CreationStep::Complete,
            policies: Some(vec![]),
            review_notes: None,
        },
    ]
}

const CDS_RELIABILITY_RULES: &str = "
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
";

const PHI_LEAKAGE_RULES: &str = "
# Applies to all models in production environments.
target:
  environment: 'Production'
requirements:
  - metric: phi_leakage_rate
    threshold: 0.0
    condition: '=='
";

/// The two starter policies, both active.
pub fn initial_policies() -> Vec<Policy> {
    vec![
        Policy {
            id: "pol_cds_reliability_01".to_string(),
            name: "Clinical Decision Support Reliability".to_string(),
            description: "Ensures all CDS models meet a minimum reliability and performance threshold before deployment.".to_string(),
            rules: CDS_RELIABILITY_RULES.to_string(),
            status: PolicyStatus::Active,
            models_applied: 0,
        },
        Policy {
            id: "pol_phi_leakage_01".to_string(),
            name: "Zero-Tolerance PHI Leakage".to_string(),
            description: "Strictly prohibits any level of PHI leakage for all models handling patient data.".to_string(),
            rules: PHI_LEAKAGE_RULES.to_string(),
            status: PolicyStatus::Active,
            models_applied: 0,
        },
    ]
}
