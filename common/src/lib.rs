pub mod config;
pub mod types;

// Re-export commonly used types
pub use config::{CliOverrides, EnvState, SpectralConfig};

pub use types::{
    AuditLogEntry, ComplianceStatus, CoverageItem, CoverageStatus, CreationStep, MetricName,
    ModelInfo, MonitoringStatus, PassportStatus, Policy, PolicyCompliance, PolicyStatus, RiskItem,
    Severity, Subject, TrustPassport, VendorAttestation, Verification, VerificationMetrics,
    VerificationRun,
};

use chrono::{DateTime, SecondsFormat, Utc};

/// Version information for the common crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate a new UUID v4 string
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Format an instant the way persisted records store it (`2025-10-21T12:00:00.000Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a persisted RFC 3339 timestamp.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Id fragment for policies: lowercase, each whitespace run becomes one `_`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_run {
                slug.push('_');
            }
            in_run = true;
        } else {
            slug.push(c);
            in_run = false;
        }
    }
    slug
}

/// Id fragment for passports: lowercase, every whitespace character becomes `_`.
pub fn slugify_each(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}
