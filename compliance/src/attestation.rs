//! Display signature and vendor attestation for verified passports.
//!
//! The signature is a deterministic label derived from passport identity and
//! two metrics. It is not a cryptographic signature and verifies nothing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use spectral_common::{format_timestamp, TrustPassport, VendorAttestation, VerificationMetrics};

use crate::synthesis::profiles::VerificationProfile;

/// Number of encoded characters kept after the `sig-` prefix.
pub const SIGNATURE_LEN: usize = 44;

/// Build the `sig-` label from `org|product|reliability|bias`.
pub fn build_signature(org: &str, product: &str, metrics: &VerificationMetrics) -> String {
    let payload = format!(
        "{}|{}|{}|{}",
        org, product, metrics.reliability_score, metrics.bias_parity_gap
    );
    let encoded = BASE64.encode(payload.as_bytes());
    let truncated: String = encoded.chars().take(SIGNATURE_LEN).collect();
    format!("sig-{}", truncated)
}

/// Default signer address for an organisation, e.g. `trust@healthcoai.com`.
pub fn default_signer(org: &str) -> String {
    let compact: String = org
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("trust@{}.com", compact)
}

/// Build the attestation record.
///
/// Vendor-provided signer and role take precedence over the synthesized
/// defaults; empty strings count as not provided.
pub fn build_attestation(
    passport: &TrustPassport,
    profile: &VerificationProfile,
    at: DateTime<Utc>,
) -> VendorAttestation {
    let existing = passport.vendor_attestation.as_ref();
    let signer = existing
        .map(|a| a.signer.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_signer(&passport.subject.org));
    let role = existing
        .map(|a| a.role.clone())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| profile.default_attestor_role.clone());

    VendorAttestation {
        signer,
        role,
        timestamp: format_timestamp(at),
    }
}
