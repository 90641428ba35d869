//! Deterministic verification-data synthesis.
//!
//! Everything except timestamps is a pure function of the passport's
//! `(id, product, use_case)` triple: the same triple always yields the same
//! metrics, coverage, risks and score.

pub mod metrics;
pub mod profiles;
pub mod rng;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use spectral_common::{
    format_timestamp, CoverageItem, RiskItem, TrustPassport, VendorAttestation, Verification,
    VerificationRun,
};
use tracing::debug;

use crate::attestation::{build_attestation, build_signature};
use crate::controls::ControlRegistry;
use crate::risk::build_risks;
use crate::scoring::score;
use profiles::{select_profile, VerificationProfile};
use rng::SeededRng;

/// How long before the synthesis instant the run is recorded as starting.
pub const RUN_DURATION_MINUTES: i64 = 4;
/// Validity window of a freshly issued passport.
pub const PASSPORT_VALIDITY_DAYS: i64 = 180;
/// Bucket that evidence URIs point into.
pub const EVIDENCE_BUCKET: &str = "s3://spectral-evidence";

/// Everything merged into a passport when it becomes verified.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerificationArtifacts {
    pub verification: Verification,
    pub coverage_matrix: Vec<CoverageItem>,
    pub risk_register: Vec<RiskItem>,
    #[serde(rename = "overallCompliance")]
    pub overall_compliance: u8,
    pub issued_at: String,
    pub expiration: String,
    pub spectral_signature: String,
    pub vendor_attestation: VendorAttestation,
}

impl VerificationArtifacts {
    /// Merge into a passport, replacing any previous verification data.
    pub fn apply_to(self, passport: &mut TrustPassport) {
        passport.verification = Some(self.verification);
        passport.coverage_matrix = Some(self.coverage_matrix);
        passport.risk_register = Some(self.risk_register);
        passport.overall_compliance = self.overall_compliance;
        passport.issued_at = self.issued_at;
        passport.expiration = self.expiration;
        passport.spectral_signature = Some(self.spectral_signature);
        passport.vendor_attestation = Some(self.vendor_attestation);
    }
}

/// Text the profile selector matches against: use case, product and org, unseparated.
pub fn identity_text(passport: &TrustPassport) -> String {
    let s = &passport.subject;
    format!("{}{}{}", s.use_case, s.product, s.org)
}

/// Text the seed is hashed from.
pub fn seed_text(passport: &TrustPassport) -> String {
    format!(
        "{}:{}:{}",
        passport.id, passport.subject.product, passport.subject.use_case
    )
}

/// Profile that applies to a passport.
pub fn profile_for(passport: &TrustPassport) -> VerificationProfile {
    select_profile(&identity_text(passport))
}

/// Synthesizes verification artifacts with a control registry.
pub struct VerificationSynthesizer {
    registry: ControlRegistry,
}

impl VerificationSynthesizer {
    pub fn new(registry: ControlRegistry) -> Self {
        Self { registry }
    }

    /// Run the engine for a passport at the given instant.
    pub fn synthesize(&self, passport: &TrustPassport, now: DateTime<Utc>) -> VerificationArtifacts {
        let profile = profile_for(passport);
        let mut rng = SeededRng::from_text(&seed_text(passport));

        let run_id = format!("run_{}", rng.next_in(1000, 9000));
        let metrics = metrics::synthesize(&profile, &mut rng);

        let verification = Verification {
            frameworks: profile.frameworks.clone(),
            runs: vec![VerificationRun {
                run_id: run_id.clone(),
                started_at: format_timestamp(now - Duration::minutes(RUN_DURATION_MINUTES)),
                finished_at: format_timestamp(now),
                evidence: vec![format!("{}/{}/{}", EVIDENCE_BUCKET, passport.id, run_id)],
                metrics,
            }],
        };

        let coverage_matrix = self.registry.build_coverage(&profile, &metrics, &run_id);
        let risk_register = build_risks(&metrics, &profile.thresholds, &mut rng);
        let overall_compliance = score(&metrics, &coverage_matrix, &profile.thresholds);

        debug!(
            event = "verification_synthesized",
            passport_id = %passport.id,
            profile = %profile.name,
            run_id = %run_id,
            score = overall_compliance,
            risks = risk_register.len(),
        );

        VerificationArtifacts {
            verification,
            coverage_matrix,
            risk_register,
            overall_compliance,
            issued_at: format_timestamp(now),
            expiration: format_timestamp(now + Duration::days(PASSPORT_VALIDITY_DAYS)),
            spectral_signature: build_signature(
                &passport.subject.org,
                &passport.subject.product,
                &metrics,
            ),
            vendor_attestation: build_attestation(passport, &profile, now),
        }
    }
}

impl Default for VerificationSynthesizer {
    fn default() -> Self {
        Self::new(ControlRegistry::standard())
    }
}

/// Run the engine with the standard control registry at the given instant.
pub fn run_deterministic_verification_at(
    passport: &TrustPassport,
    now: DateTime<Utc>,
) -> VerificationArtifacts {
    VerificationSynthesizer::default().synthesize(passport, now)
}

/// Run the engine with the standard control registry at the current time.
pub fn run_deterministic_verification(passport: &TrustPassport) -> VerificationArtifacts {
    run_deterministic_verification_at(passport, Utc::now())
}
