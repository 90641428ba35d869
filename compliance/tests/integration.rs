//! Integration tests for the compliance crate.
//!
//! These tests exercise the full pipeline: synthesize verification data for a
//! passport, evaluate buyer policies against it, persist the portfolio, and
//! export packets and reports.

use chrono::{DateTime, TimeZone, Utc};
use spectral_common::{
    ComplianceStatus, CoverageStatus, CreationStep, ModelInfo, MonitoringStatus, PassportStatus,
    Policy, PolicyStatus, SpectralConfig, Subject, TrustPassport,
};
use spectral_compliance::export::{board_summary, passport_report, to_json, PassportPacket};
use spectral_compliance::policy::{apply_policies_to_portfolio, PolicyEngine};
use spectral_compliance::portfolio::{NewPassport, NewPolicy, PortfolioService};
use spectral_compliance::store::{FileStore, MemoryStore, Store, PORTFOLIO_KEY};
use spectral_compliance::synthesis::run_deterministic_verification_at;

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn passport(id: &str, org: &str, product: &str, use_case: &str) -> TrustPassport {
    TrustPassport {
        id: id.to_string(),
        monitoring_status: MonitoringStatus::Inactive,
        overall_compliance: 0,
        passport_version: "1.0".to_string(),
        issued_at: String::new(),
        spectral_signature: None,
        vendor_attestation: None,
        subject: Subject {
            org: org.to_string(),
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
        status: PassportStatus::UnderReview,
        creation_step: CreationStep::Complete,
        policies: None,
        review_notes: None,
    }
}

fn verified(p: &TrustPassport) -> TrustPassport {
    let mut out = p.clone();
    run_deterministic_verification_at(p, at()).apply_to(&mut out);
    out.status = PassportStatus::Verified;
    out
}

fn policy(id: &str, rules: &str) -> Policy {
    Policy {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        rules: rules.to_string(),
        status: PolicyStatus::Active,
        models_applied: 0,
    }
}

fn reliability_policy(threshold: u32) -> Policy {
    policy(
        "pol_rel",
        &format!(
            "target:\n  use_case: 'ER Intake Triage'\nrequirements:\n  - metric: reliability_score\n    threshold: {}\n    condition: '>='\n",
            threshold
        ),
    )
}

#[test]
fn test_healthcare_pipeline() {
    let p = passport("prod_x", "AcmeAI", "Acme Triage", "ER Intake Triage");
    let artifacts = run_deterministic_verification_at(&p, at());

    assert_eq!(
        artifacts.verification.frameworks,
        vec!["HIPAA", "NIST AI RMF", "FDA-DG"]
    );
    assert_eq!(artifacts.verification.runs.len(), 1);
    assert_eq!(artifacts.coverage_matrix.len(), 5);
    assert!((55..=100).contains(&artifacts.overall_compliance));
    assert!(!artifacts.risk_register.is_empty());

    let controls: Vec<&str> = artifacts
        .coverage_matrix
        .iter()
        .map(|c| c.control.as_str())
        .collect();
    assert_eq!(
        controls,
        vec![
            "HIPAA-164.312(a)(2)(i)",
            "HIPAA-164.312(b)",
            "NIST-AI-RMF-MAP-2",
            "NIST-AI-RMF-MEASURE-3",
            "FDA-DG-2.1",
        ]
    );
    // FDA is never not-met.
    assert_ne!(artifacts.coverage_matrix[4].status, CoverageStatus::NotMet);
}

#[test]
fn test_reference_scenario_values() {
    let p = passport("prod_x", "AcmeAI", "Acme Triage", "ER Intake Triage");
    let artifacts = run_deterministic_verification_at(&p, at());
    let run = &artifacts.verification.runs[0];
    assert_eq!(run.run_id, "run_7185");

    let m = run.metrics;
    assert_eq!(
        [
            m.phi_leakage_rate,
            m.hallucination_rate,
            m.bias_parity_gap,
            m.prompt_injection_resilience,
            m.reliability_score,
        ],
        [0.15, 2.01, 0.037, 88.0, 91.0]
    );

    let risk_ids: Vec<&str> = artifacts
        .risk_register
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(risk_ids, vec!["R-310-44"]);
}

#[test]
fn test_repeat_synthesis_is_identical_except_time() {
    let p = passport("prod_x", "AcmeAI", "Acme Triage", "ER Intake Triage");
    let a = run_deterministic_verification_at(&p, at());
    let b = run_deterministic_verification_at(&p, at() + chrono::Duration::hours(5));
    assert_eq!(a.verification.runs[0].metrics, b.verification.runs[0].metrics);
    assert_eq!(a.verification.runs[0].run_id, b.verification.runs[0].run_id);
    assert_eq!(a.coverage_matrix, b.coverage_matrix);
    assert_eq!(a.risk_register, b.risk_register);
    assert_eq!(a.overall_compliance, b.overall_compliance);
    assert_eq!(a.spectral_signature, b.spectral_signature);
    assert_ne!(a.issued_at, b.issued_at);
}

#[test]
fn test_profiles_by_use_case() {
    let cases = [
        ("Customer support chatbot", "Compliance Lead", 4),
        ("Loan underwriting", "Head of Risk", 4),
        ("Document summarizer", "Security Officer", 3),
    ];
    for (use_case, role, controls) in cases {
        let p = passport("prod_p", "Plain Org", "Widget", use_case);
        let a = run_deterministic_verification_at(&p, at());
        assert_eq!(a.vendor_attestation.role, role, "use case {}", use_case);
        assert_eq!(a.coverage_matrix.len(), controls, "use case {}", use_case);
    }
}

#[test]
fn test_policy_threshold_on_synthesized_passport() {
    let p = verified(&passport("prod_x", "AcmeAI", "Acme Triage", "ER Intake Triage"));
    let reliability = p.verification.as_ref().unwrap().runs[0]
        .metrics
        .reliability_score as u32;

    let engine = PolicyEngine;
    assert_eq!(
        engine.evaluate(&p, &reliability_policy(reliability)),
        ComplianceStatus::Compliant
    );
    assert_eq!(
        engine.evaluate(&p, &reliability_policy(reliability + 1)),
        ComplianceStatus::NonCompliant
    );
}

#[test]
fn test_policy_target_and_fail_open() {
    let matching = verified(&passport("prod_x", "AcmeAI", "Acme Triage", "ER Intake Triage"));
    let other = verified(&passport("prod_y", "AcmeAI", "Acme Notes", "Clinic notes"));
    let engine = PolicyEngine;

    let rel = reliability_policy(0);
    assert_eq!(engine.evaluate(&matching, &rel), ComplianceStatus::Compliant);
    assert_eq!(engine.evaluate(&other, &rel), ComplianceStatus::NotApplicable);

    let broken = policy("pol_broken", "requirements: [");
    assert_eq!(engine.evaluate(&matching, &broken), ComplianceStatus::NotApplicable);
}

#[test]
fn test_apply_policies_updates_counts() {
    let mut passports = vec![
        verified(&passport("prod_a", "AcmeAI", "Acme Triage", "ER Intake Triage")),
        passport("prod_b", "AcmeAI", "Acme Draft", "ER Intake Triage"),
    ];
    passports[1].status = PassportStatus::Draft;

    let updated = apply_policies_to_portfolio(&[reliability_policy(0)], &mut passports);
    assert_eq!(updated[0].models_applied, 1);
    assert_eq!(
        passports[1].policies.as_ref().unwrap()[0].status,
        ComplianceStatus::NotApplicable
    );
}

#[test]
fn test_portfolio_lifecycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = SpectralConfig {
        data_dir: dir.path().to_path_buf(),
        seed_demo_data: false,
        ..Default::default()
    };

    let id = {
        let mut service = PortfolioService::open(FileStore::new(dir.path()), &config).unwrap();
        assert!(service.list().is_empty());
        let id = service
            .add_passport(NewPassport {
                org: "AcmeAI".to_string(),
                product: "Acme Triage".to_string(),
                use_case: "ER Intake Triage".to_string(),
                environment: "Production".to_string(),
                model: ModelInfo {
                    provider: "openai:gpt-4o-mini".to_string(),
                    version: "2025-09-15".to_string(),
                    customizations: vec!["System Prompts".to_string()],
                },
            })
            .unwrap()
            .id
            .clone();
        service
            .add_policy(NewPolicy {
                name: "Reliability floor".to_string(),
                description: String::new(),
                rules: "target:\n  environment: Production\nrequirements:\n  - metric: reliability_score\n    threshold: 50\n    condition: '>='\n".to_string(),
                status: PolicyStatus::Active,
            })
            .unwrap();
        assert_eq!(service.policies().list()[0].models_applied, 0);

        let p = service.verify(&id).unwrap();
        assert!(p.has_artifacts());
        assert_eq!(
            p.policies.as_ref().unwrap()[0].status,
            ComplianceStatus::Compliant
        );
        id
    };

    let reopened = PortfolioService::open(FileStore::new(dir.path()), &config).unwrap();
    let p = reopened.get(&id).unwrap();
    assert_eq!(p.status, PassportStatus::Verified);
    assert!(p.has_artifacts());
    assert_eq!(reopened.policies().list()[0].models_applied, 1);

    assert!(dir.path().join("spectral_audit_log.json").exists());
    let actions: Vec<&str> = reopened
        .audit()
        .entries()
        .iter()
        .map(|e| e.action.as_str())
        .collect();
    assert_eq!(
        actions,
        vec!["Verification Complete", "Policy Created", "Product Created"]
    );
}

#[test]
fn test_corrupt_store_falls_back_to_empty() {
    let mut store = MemoryStore::new();
    store.save(PORTFOLIO_KEY, "{{{{").unwrap();
    let service = PortfolioService::open(store, &SpectralConfig::default()).unwrap();
    assert!(service.list().is_empty());
    assert_eq!(
        service.load_errors(),
        &["Failed to load data from local storage.".to_string()]
    );
}

#[test]
fn test_exports() {
    let service = PortfolioService::open(MemoryStore::new(), &SpectralConfig::default()).unwrap();
    let passport = service.get("prod_radvision_dx_01").unwrap();

    let json = to_json(&PassportPacket::new(passport, at())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["generated_by"], "Spectral Verification Pipeline");
    assert_eq!(value["passport"]["subject"]["org"], "RadVision");
    assert_eq!(value["coverage_matrix"][0]["control"], "FDA-DG-2.1");

    let report = passport_report(passport, at());
    assert_eq!(report.title, "Radiology DX — RadVision");
    assert!(report.render_text().contains("Reliability Score: 96"));

    let summary = board_summary(service.list(), at()).unwrap();
    assert_eq!(summary.sections[0].lines[0], "Models Tracked: 3");
}
