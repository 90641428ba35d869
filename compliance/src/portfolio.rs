//! Portfolio and policy services over the persistence port.
//!
//! `PortfolioService` owns the store, the passport collection, the policy
//! collection (through `PolicyService`) and the audit trail. Every mutation and
//! audit entry is persisted before it returns, and every status change re-evaluates the
//! active policies so per-passport compliance never goes stale.

use chrono::{DateTime, Months, Utc};
use serde::de::DeserializeOwned;
use spectral_common::{
    format_timestamp, slugify, slugify_each, CreationStep, ModelInfo, MonitoringStatus,
    PassportStatus, Policy, PolicyStatus, SpectralConfig, Subject, TrustPassport,
};
use tracing::{info, warn};

use crate::audit::AuditLog;
use crate::error::{ComplianceError, ComplianceResult};
use crate::policy::apply_policies_to_portfolio;
use crate::seed::{initial_policies, initial_portfolio};
use crate::store::{
    load_collection, save_collection, Store, AUDIT_KEY, POLICIES_KEY, PORTFOLIO_KEY,
};
use crate::synthesis::VerificationSynthesizer;

pub const PORTFOLIO_LOAD_ERROR: &str = "Failed to load data from local storage.";
pub const POLICIES_LOAD_ERROR: &str = "Failed to load policy data.";
pub const AUDIT_LOAD_ERROR: &str = "Failed to load audit log.";
pub const APPROVAL_NOTE: &str = "Approved by CISO via manual review.";
/// Version stamped on passports created through onboarding.
pub const NEW_PASSPORT_VERSION: &str = "0.1";

/// Onboarding input for a new product.
#[derive(Debug, Clone)]
pub struct NewPassport {
    pub org: String,
    pub product: String,
    pub use_case: String,
    pub environment: String,
    pub model: ModelInfo,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct PassportUpdate {
    pub status: Option<PassportStatus>,
    pub monitoring_status: Option<MonitoringStatus>,
    pub review_notes: Option<String>,
}

/// Input for a new policy.
#[derive(Debug, Clone)]
pub struct NewPolicy {
    pub name: String,
    pub description: String,
    pub rules: String,
    pub status: PolicyStatus,
}

/// The policy collection.
#[derive(Debug, Clone, Default)]
pub struct PolicyService {
    policies: Vec<Policy>,
}

impl PolicyService {
    pub fn new(policies: Vec<Policy>) -> Self {
        Self { policies }
    }

    pub fn list(&self) -> &[Policy] {
        &self.policies
    }

    pub fn get(&self, id: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.id == id)
    }

    fn insert_front(&mut self, policy: Policy) {
        self.policies.insert(0, policy);
    }

    /// Evaluate the active policies against `passports` and refresh `models_applied`.
    pub fn apply(&mut self, passports: &mut [TrustPassport]) {
        self.policies = apply_policies_to_portfolio(&self.policies, passports);
    }
}

enum Loaded<T> {
    Found(Vec<T>),
    Missing,
    Failed,
}

fn load_or_fail<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Loaded<T> {
    match load_collection(store, key) {
        Ok(Some(items)) => Loaded::Found(items),
        Ok(None) => Loaded::Missing,
        Err(e) => {
            warn!(event = "collection_load_failed", key, error = %e, "starting with an empty collection");
            Loaded::Failed
        }
    }
}

/// Passport portfolio with its policies, audit trail and backing store.
pub struct PortfolioService<S: Store> {
    store: S,
    passports: Vec<TrustPassport>,
    policies: PolicyService,
    audit: AuditLog,
    synthesizer: VerificationSynthesizer,
    load_errors: Vec<String>,
    clock: fn() -> DateTime<Utc>,
}

impl<S: Store> PortfolioService<S> {
    /// Load the passport, policy and audit collections from `store`.
    ///
    /// A missing collection is seeded with the demo data when
    /// `config.seed_demo_data` is set, otherwise left empty. A collection that
    /// cannot be read or decoded is replaced by an empty one and reported
    /// through [`load_errors`](Self::load_errors); nothing is written back in
    /// that case so the damaged data stays on disk for inspection.
    pub fn open(store: S, config: &SpectralConfig) -> ComplianceResult<Self> {
        Self::open_with_clock(store, config, Utc::now)
    }

    pub fn open_with_clock(
        store: S,
        config: &SpectralConfig,
        clock: fn() -> DateTime<Utc>,
    ) -> ComplianceResult<Self> {
        let mut load_errors = Vec::new();
        let mut seeded = false;

        let passports = match load_or_fail(&store, PORTFOLIO_KEY) {
            Loaded::Found(items) => items,
            Loaded::Missing if config.seed_demo_data => {
                seeded = true;
                initial_portfolio()
            }
            Loaded::Missing => Vec::new(),
            Loaded::Failed => {
                load_errors.push(PORTFOLIO_LOAD_ERROR.to_string());
                Vec::new()
            }
        };
        let policies = match load_or_fail(&store, POLICIES_KEY) {
            Loaded::Found(items) => items,
            Loaded::Missing if config.seed_demo_data => {
                seeded = true;
                initial_policies()
            }
            Loaded::Missing => Vec::new(),
            Loaded::Failed => {
                load_errors.push(POLICIES_LOAD_ERROR.to_string());
                Vec::new()
            }
        };

        let audit_entries = match load_or_fail(&store, AUDIT_KEY) {
            Loaded::Found(items) => items,
            Loaded::Missing => Vec::new(),
            Loaded::Failed => {
                load_errors.push(AUDIT_LOAD_ERROR.to_string());
                Vec::new()
            }
        };

        let mut service = Self {
            store,
            passports,
            policies: PolicyService::new(policies),
            audit: AuditLog::with_entries(config.operator.clone(), audit_entries),
            synthesizer: VerificationSynthesizer::default(),
            load_errors,
            clock,
        };

        if seeded {
            info!(
                event = "demo_data_seeded",
                passports = service.passports.len(),
                policies = service.policies.list().len(),
            );
        }
        if service.load_errors.is_empty() {
            service.apply_and_save()?;
        }
        Ok(service)
    }

    /// Messages for collections that could not be loaded.
    pub fn load_errors(&self) -> &[String] {
        &self.load_errors
    }

    pub fn list(&self) -> &[TrustPassport] {
        &self.passports
    }

    pub fn get(&self, id: &str) -> Option<&TrustPassport> {
        self.passports.iter().find(|p| p.id == id)
    }

    pub fn policies(&self) -> &PolicyService {
        &self.policies
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn index_of(&self, id: &str) -> ComplianceResult<usize> {
        self.passports
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ComplianceError::not_found(format!("passport '{}' not found", id)))
    }

    fn save_portfolio(&mut self) -> ComplianceResult<()> {
        save_collection(&mut self.store, PORTFOLIO_KEY, &self.passports)
    }

    fn save_policies(&mut self) -> ComplianceResult<()> {
        save_collection(&mut self.store, POLICIES_KEY, self.policies.list())
    }

    fn log_action(
        &mut self,
        action: &str,
        details: &str,
        at: DateTime<Utc>,
    ) -> ComplianceResult<()> {
        self.audit.record_at(action, details, at);
        save_collection(&mut self.store, AUDIT_KEY, self.audit.entries())
    }

    fn apply_and_save(&mut self) -> ComplianceResult<()> {
        self.policies.apply(&mut self.passports);
        self.save_portfolio()?;
        self.save_policies()
    }

    /// Create a draft passport at the front of the portfolio.
    pub fn add_passport(&mut self, new: NewPassport) -> ComplianceResult<&TrustPassport> {
        let now = (self.clock)();
        let id = format!("prod_{}_{}", slugify_each(&new.product), now.timestamp_millis());
        let expiration = now.checked_add_months(Months::new(12)).unwrap_or(now);

        let passport = TrustPassport {
            id: id.clone(),
            monitoring_status: MonitoringStatus::Inactive,
            overall_compliance: 0,
            passport_version: NEW_PASSPORT_VERSION.to_string(),
            issued_at: format_timestamp(now),
            spectral_signature: None,
            vendor_attestation: None,
            subject: Subject {
                org: new.org,
                product: new.product,
                model: new.model,
                environment: new.environment,
                use_case: new.use_case,
            },
            verification: None,
            coverage_matrix: None,
            risk_register: None,
            expiration: format_timestamp(expiration),
            status: PassportStatus::Draft,
            creation_step: CreationStep::Complete,
            policies: Some(Vec::new()),
            review_notes: None,
        };

        let details = format!("New product draft created: {}", passport.subject.product);
        self.passports.insert(0, passport);
        self.save_portfolio()?;
        self.log_action("Product Created", &details, now)?;
        info!(event = "passport_created", passport_id = %id);
        Ok(&self.passports[0])
    }

    /// Merge a partial update into a passport.
    ///
    /// Moving to `Verified` synthesizes fresh verification artifacts. Moving to
    /// `Draft` drops them, since drafts carry no verification data.
    pub fn update_passport(
        &mut self,
        id: &str,
        update: PassportUpdate,
    ) -> ComplianceResult<&TrustPassport> {
        let idx = self.index_of(id)?;
        let now = (self.clock)();
        let status_changed = update.status.is_some();

        {
            let passport = &mut self.passports[idx];
            let previous = passport.status;
            if let Some(monitoring) = update.monitoring_status {
                passport.monitoring_status = monitoring;
            }
            if let Some(notes) = update.review_notes {
                passport.review_notes = Some(notes);
            }
            if let Some(status) = update.status {
                passport.status = status;
                match status {
                    PassportStatus::Verified => {
                        self.synthesizer.synthesize(passport, now).apply_to(passport);
                    }
                    PassportStatus::Draft => passport.clear_artifacts(),
                    PassportStatus::UnderReview | PassportStatus::Expired => {}
                }
                info!(
                    event = "passport_status_changed",
                    passport_id = %passport.id,
                    from = previous.as_str(),
                    to = status.as_str(),
                );
            }
        }

        if status_changed {
            self.apply_and_save()?;
        } else {
            self.save_portfolio()?;
        }
        Ok(&self.passports[idx])
    }

    /// Run verification for a passport and mark it verified.
    pub fn verify(&mut self, id: &str) -> ComplianceResult<&TrustPassport> {
        let update = PassportUpdate {
            status: Some(PassportStatus::Verified),
            ..Default::default()
        };
        let product = self.update_passport(id, update)?.subject.product.clone();
        let now = (self.clock)();
        self.log_action("Verification Complete", &format!("Product: {}", product), now)?;
        self.get_required(id)
    }

    /// Approve a passport that is under review.
    pub fn approve(&mut self, id: &str) -> ComplianceResult<&TrustPassport> {
        let idx = self.index_of(id)?;
        let current = self.passports[idx].status;
        if current != PassportStatus::UnderReview {
            return Err(ComplianceError::invalid_transition(format!(
                "passport '{}' is {}, only under-review passports can be approved",
                id,
                current.as_str()
            )));
        }

        let update = PassportUpdate {
            status: Some(PassportStatus::Verified),
            review_notes: Some(APPROVAL_NOTE.to_string()),
            ..Default::default()
        };
        let product = self.update_passport(id, update)?.subject.product.clone();
        let now = (self.clock)();
        self.log_action(
            "Passport Approved",
            &format!("Product: {} moved from Under Review to Verified.", product),
            now,
        )?;
        self.get_required(id)
    }

    /// Flip runtime monitoring on or off.
    pub fn toggle_monitoring(&mut self, id: &str) -> ComplianceResult<&TrustPassport> {
        let idx = self.index_of(id)?;
        let next = self.passports[idx].monitoring_status.toggled();
        let update = PassportUpdate {
            monitoring_status: Some(next),
            ..Default::default()
        };
        let product = self.update_passport(id, update)?.subject.product.clone();
        let action = match next {
            MonitoringStatus::Active => "Sentinel Activated",
            MonitoringStatus::Inactive => "Sentinel Deactivated",
        };
        let now = (self.clock)();
        self.log_action(action, &format!("Product: {}", product), now)?;
        self.get_required(id)
    }

    /// Record an operator action that does not change stored data, such as an export.
    pub fn record(&mut self, action: &str, details: &str) -> ComplianceResult<()> {
        let now = (self.clock)();
        self.log_action(action, details, now)
    }

    fn get_required(&self, id: &str) -> ComplianceResult<&TrustPassport> {
        self.get(id)
            .ok_or_else(|| ComplianceError::not_found(format!("passport '{}' not found", id)))
    }

    /// Add a policy at the front of the list and re-evaluate the portfolio.
    pub fn add_policy(&mut self, new: NewPolicy) -> ComplianceResult<&Policy> {
        let now = (self.clock)();
        let id = format!("pol_{}_{}", slugify(&new.name), now.timestamp_millis());
        let details = format!("New policy draft created: {}", new.name);
        self.policies.insert_front(Policy {
            id: id.clone(),
            name: new.name,
            description: new.description,
            rules: new.rules,
            status: new.status,
            models_applied: 0,
        });
        self.log_action("Policy Created", &details, now)?;
        self.apply_and_save()?;
        self.policies
            .get(&id)
            .ok_or_else(|| ComplianceError::not_found(format!("policy '{}' not found", id)))
    }

    /// Re-evaluate every active policy and persist both collections.
    pub fn apply_policies(&mut self) -> ComplianceResult<&[Policy]> {
        self.apply_and_save()?;
        Ok(self.policies.list())
    }
}
