use serde::{Deserialize, Serialize};

/// Lifecycle status of a trust passport.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PassportStatus {
    Draft,
    UnderReview,
    Verified,
    Expired,
}

impl PassportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassportStatus::Draft => "draft",
            PassportStatus::UnderReview => "under-review",
            PassportStatus::Verified => "verified",
            PassportStatus::Expired => "expired",
        }
    }
}

/// Whether runtime monitoring ("Sentinel") is switched on for a passport.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MonitoringStatus {
    Active,
    Inactive,
}

impl MonitoringStatus {
    pub fn toggled(self) -> Self {
        match self {
            MonitoringStatus::Active => MonitoringStatus::Inactive,
            MonitoringStatus::Inactive => MonitoringStatus::Active,
        }
    }
}

/// Onboarding step a passport was left at.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CreationStep {
    Product,
    Model,
    Environment,
    Complete,
}

/// The five synthesized verification metrics.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct VerificationMetrics {
    /// Fraction of probes that leaked protected health information, in [0, 1].
    pub phi_leakage_rate: f64,
    /// Hallucinations per hundred answers, in [0, 10].
    pub hallucination_rate: f64,
    /// Largest outcome gap between demographic cohorts, in [0, 0.25].
    pub bias_parity_gap: f64,
    /// Prompt-injection resilience score, in [50, 99]. Higher is better.
    pub prompt_injection_resilience: f64,
    /// Runtime reliability score, in [70, 99]. Higher is better.
    pub reliability_score: f64,
}

/// Name of a single metric field, as referenced by policy requirements.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    PhiLeakageRate,
    HallucinationRate,
    BiasParityGap,
    PromptInjectionResilience,
    ReliabilityScore,
}

impl MetricName {
    /// All metric names in synthesis order.
    pub const ALL: [MetricName; 5] = [
        MetricName::PhiLeakageRate,
        MetricName::HallucinationRate,
        MetricName::BiasParityGap,
        MetricName::PromptInjectionResilience,
        MetricName::ReliabilityScore,
    ];

    /// Resolve a field name. Unknown names yield `None`.
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "phi_leakage_rate" => Some(MetricName::PhiLeakageRate),
            "hallucination_rate" => Some(MetricName::HallucinationRate),
            "bias_parity_gap" => Some(MetricName::BiasParityGap),
            "prompt_injection_resilience" => Some(MetricName::PromptInjectionResilience),
            "reliability_score" => Some(MetricName::ReliabilityScore),
            _ => None,
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            MetricName::PhiLeakageRate => "phi_leakage_rate",
            MetricName::HallucinationRate => "hallucination_rate",
            MetricName::BiasParityGap => "bias_parity_gap",
            MetricName::PromptInjectionResilience => "prompt_injection_resilience",
            MetricName::ReliabilityScore => "reliability_score",
        }
    }
}

impl VerificationMetrics {
    pub fn get(&self, name: MetricName) -> f64 {
        match name {
            MetricName::PhiLeakageRate => self.phi_leakage_rate,
            MetricName::HallucinationRate => self.hallucination_rate,
            MetricName::BiasParityGap => self.bias_parity_gap,
            MetricName::PromptInjectionResilience => self.prompt_injection_resilience,
            MetricName::ReliabilityScore => self.reliability_score,
        }
    }
}

/// One verification run over a model deployment.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VerificationRun {
    pub run_id: String,
    pub started_at: String,
    pub finished_at: String,
    pub evidence: Vec<String>,
    pub metrics: VerificationMetrics,
}

/// Frameworks a passport was verified against, plus the runs backing it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Verification {
    pub frameworks: Vec<String>,
    pub runs: Vec<VerificationRun>,
}

impl Verification {
    /// Metrics of the first run, which policies are evaluated against.
    pub fn primary_metrics(&self) -> Option<&VerificationMetrics> {
        self.runs.first().map(|r| &r.metrics)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageStatus {
    Met,
    Partial,
    NotMet,
}

impl CoverageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageStatus::Met => "met",
            CoverageStatus::Partial => "partial",
            CoverageStatus::NotMet => "not-met",
        }
    }
}

/// Verdict for one framework control.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CoverageItem {
    pub control: String,
    pub status: CoverageStatus,
    /// Remediation note. Present iff `status` is not `Met`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    pub evidence: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RiskItem {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    pub mitigation: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VendorAttestation {
    pub signer: String,
    pub role: String,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelInfo {
    pub provider: String,
    pub version: String,
    #[serde(default)]
    pub customizations: Vec<String>,
}

/// What the passport describes: an organisation's AI product in one environment.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Subject {
    pub org: String,
    pub product: String,
    pub model: ModelInfo,
    pub environment: String,
    pub use_case: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    NotApplicable,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::NonCompliant => "non-compliant",
            ComplianceStatus::NotApplicable => "not-applicable",
        }
    }
}

/// Result of evaluating one policy against one passport.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PolicyCompliance {
    #[serde(rename = "policyId")]
    pub policy_id: String,
    #[serde(rename = "policyName")]
    pub policy_name: String,
    pub status: ComplianceStatus,
}

/// The aggregate compliance record for one AI product deployment.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrustPassport {
    pub id: String,
    #[serde(rename = "monitoringStatus")]
    pub monitoring_status: MonitoringStatus,
    #[serde(rename = "overallCompliance")]
    pub overall_compliance: u8,
    pub passport_version: String,
    pub issued_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectral_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_attestation: Option<VendorAttestation>,
    pub subject: Subject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_matrix: Option<Vec<CoverageItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_register: Option<Vec<RiskItem>>,
    pub expiration: String,
    pub status: PassportStatus,
    #[serde(rename = "creationStep")]
    pub creation_step: CreationStep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<PolicyCompliance>>,
    #[serde(
        rename = "reviewNotes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub review_notes: Option<String>,
}

impl TrustPassport {
    /// True when verification, coverage and risk data are all present.
    pub fn has_artifacts(&self) -> bool {
        self.verification.is_some() && self.coverage_matrix.is_some() && self.risk_register.is_some()
    }

    /// Drop synthesized artifacts. Drafts must never carry them.
    pub fn clear_artifacts(&mut self) {
        self.verification = None;
        self.coverage_matrix = None;
        self.risk_register = None;
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyStatus {
    Draft,
    Active,
}

/// A buyer-authored rule set evaluated against every passport.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Declarative rules document (YAML or JSON text).
    pub rules: String,
    pub status: PolicyStatus,
    /// Number of passports the policy applied to at the last evaluation.
    #[serde(rename = "modelsApplied", default)]
    pub models_applied: u32,
}

/// Operator action recorded in the audit log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AuditLogEntry {
    pub id: String,
    pub timestamp: String,
    pub user: String,
    pub action: String,
    pub details: String,
}
