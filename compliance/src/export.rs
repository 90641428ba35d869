//! Shareable passport packets and board-ready text reports.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use spectral_common::{
    format_timestamp, parse_timestamp, CoverageItem, MonitoringStatus, PassportStatus, RiskItem,
    Subject, TrustPassport, VendorAttestation, Verification,
};

use crate::error::{ComplianceError, ComplianceResult};
use crate::synthesis::run_deterministic_verification_at;

pub const GENERATED_BY: &str = "Spectral Verification Pipeline";
/// Coverage items listed in a passport report.
pub const REPORT_COVERAGE_LIMIT: usize = 6;
pub const TOP_RISK_LIMIT: usize = 5;
pub const EXPIRING_LIMIT: usize = 6;
pub const EXPIRY_WINDOW_DAYS: i64 = 90;

/// Identity and status block of a packet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PassportSummary {
    pub id: String,
    pub subject: Subject,
    pub status: PassportStatus,
    #[serde(rename = "monitoringStatus")]
    pub monitoring_status: MonitoringStatus,
    #[serde(rename = "overallCompliance")]
    pub overall_compliance: u8,
    pub issued_at: String,
    pub expiration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_attestation: Option<VendorAttestation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectral_signature: Option<String>,
}

/// Machine-readable export of one passport.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PassportPacket {
    pub passport: PassportSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_matrix: Option<Vec<CoverageItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_register: Option<Vec<RiskItem>>,
    pub generated_at: String,
    pub generated_by: String,
}

impl PassportPacket {
    /// Packet of the passport exactly as stored. Missing artifacts stay missing.
    pub fn new(passport: &TrustPassport, now: DateTime<Utc>) -> Self {
        Self {
            passport: PassportSummary {
                id: passport.id.clone(),
                subject: passport.subject.clone(),
                status: passport.status,
                monitoring_status: passport.monitoring_status,
                overall_compliance: passport.overall_compliance,
                issued_at: passport.issued_at.clone(),
                expiration: passport.expiration.clone(),
                vendor_attestation: passport.vendor_attestation.clone(),
                spectral_signature: passport.spectral_signature.clone(),
            },
            verification: passport.verification.clone(),
            coverage_matrix: passport.coverage_matrix.clone(),
            risk_register: passport.risk_register.clone(),
            generated_at: format_timestamp(now),
            generated_by: GENERATED_BY.to_string(),
        }
    }
}

/// Serialize a packet to pretty-printed JSON.
pub fn to_json(packet: &PassportPacket) -> ComplianceResult<String> {
    to_pretty_json(packet)
}

/// Pretty-printed JSON of any serializable value.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> ComplianceResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        ComplianceError::serialization_error(format!("JSON serialization failed: {}", e))
    })
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub lines: Vec<String>,
}

impl ReportSection {
    fn new(title: &str, lines: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            lines,
        }
    }
}

/// A titled list of sections, renderable as plain text.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn section(&self, title: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.title);
            out.push('\n');
            for line in &section.lines {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

fn display_datetime(value: &str) -> String {
    parse_timestamp(value)
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| value.to_string())
}

fn display_date(value: &str) -> String {
    parse_timestamp(value)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| value.to_string())
}

fn format_risk(risk: &RiskItem) -> String {
    format!(
        "{} [{}] {} — {}",
        risk.id,
        risk.severity.as_str().to_uppercase(),
        risk.title,
        risk.mitigation
    )
}

fn format_coverage(item: &CoverageItem) -> String {
    let gap = item
        .gap
        .as_deref()
        .map(|g| format!(" ({})", g))
        .unwrap_or_default();
    format!("{} — {}{}", item.control, item.status.as_str().to_uppercase(), gap)
}

/// Human-readable report for one passport.
///
/// A passport missing any of verification, coverage or risk data is
/// reported as the engine would synthesize it at `now`; the stored passport
/// is left untouched.
pub fn passport_report(passport: &TrustPassport, now: DateTime<Utc>) -> Report {
    let enriched;
    let passport = if passport.has_artifacts() {
        passport
    } else {
        let mut copy = passport.clone();
        run_deterministic_verification_at(passport, now).apply_to(&mut copy);
        enriched = copy;
        &enriched
    };

    let mut sections = vec![ReportSection::new(
        "Verification Summary",
        vec![
            format!(
                "Status: {} (Compliance {}%)",
                passport.status.as_str().to_uppercase(),
                passport.overall_compliance
            ),
            format!(
                "Issued: {} • Expires: {}",
                display_datetime(&passport.issued_at),
                display_date(&passport.expiration)
            ),
            format!(
                "Spectral Signature: {}",
                passport.spectral_signature.as_deref().unwrap_or("unsigned")
            ),
        ],
    )];

    if let Some(m) = passport.verification.as_ref().and_then(|v| v.primary_metrics()) {
        sections.push(ReportSection::new(
            "Key Metrics",
            vec![
                format!("PHI Leakage Rate: {}%", m.phi_leakage_rate),
                format!("Hallucination Rate: {}%", m.hallucination_rate),
                format!("Bias Parity Gap: {}", m.bias_parity_gap),
                format!("Prompt Injection Resilience: {}", m.prompt_injection_resilience),
                format!("Reliability Score: {}", m.reliability_score),
            ],
        ));
    }

    let coverage = passport.coverage_matrix.as_deref().unwrap_or_default();
    if !coverage.is_empty() {
        sections.push(ReportSection::new(
            "Control Coverage",
            coverage
                .iter()
                .take(REPORT_COVERAGE_LIMIT)
                .map(format_coverage)
                .collect(),
        ));
    }

    let risks = passport.risk_register.as_deref().unwrap_or_default();
    if !risks.is_empty() {
        sections.push(ReportSection::new(
            "Risk Register",
            risks.iter().map(format_risk).collect(),
        ));
    }

    Report {
        title: format!("{} — {}", passport.subject.product, passport.subject.org),
        sections,
    }
}

/// Portfolio summary for a board pack. `None` for an empty portfolio.
pub fn board_summary(passports: &[TrustPassport], now: DateTime<Utc>) -> Option<Report> {
    if passports.is_empty() {
        return None;
    }

    let count = |status: PassportStatus| passports.iter().filter(|p| p.status == status).count();
    let mut sections = vec![ReportSection::new(
        "Portfolio Overview",
        vec![
            format!("Models Tracked: {}", passports.len()),
            format!(
                "Verified: {} • Under Review: {} • Draft: {} • Expired: {}",
                count(PassportStatus::Verified),
                count(PassportStatus::UnderReview),
                count(PassportStatus::Draft),
                count(PassportStatus::Expired)
            ),
        ],
    )];

    let mut risks: Vec<&RiskItem> = passports
        .iter()
        .flat_map(|p| p.risk_register.iter().flatten())
        .collect();
    // Stable: equal severities keep portfolio order.
    risks.sort_by(|a, b| b.severity.cmp(&a.severity));
    let top_risks: Vec<String> = risks
        .into_iter()
        .take(TOP_RISK_LIMIT)
        .map(format_risk)
        .collect();
    if !top_risks.is_empty() {
        sections.push(ReportSection::new("Top Portfolio Risks", top_risks));
    }

    let horizon = now + Duration::days(EXPIRY_WINDOW_DAYS);
    let mut expiring: Vec<(DateTime<Utc>, &TrustPassport)> = passports
        .iter()
        .filter_map(|p| parse_timestamp(&p.expiration).map(|at| (at, p)))
        .filter(|(at, _)| *at < horizon)
        .collect();
    expiring.sort_by_key(|(at, _)| *at);
    let expiring: Vec<String> = expiring
        .into_iter()
        .take(EXPIRING_LIMIT)
        .map(|(_, p)| format!("{} — {}", p.subject.product, display_date(&p.expiration)))
        .collect();
    if !expiring.is_empty() {
        sections.push(ReportSection::new("Expiring in Next 90 Days", expiring));
    }

    Some(Report {
        title: "Spectral Portfolio Summary".to_string(),
        sections,
    })
}
