//! Spectral AI Trust Passport engine.
//!
//! This crate provides:
//! - Deterministic verification synthesis (`synthesis`): profile selection,
//!   seeded metrics, coverage, risks, score and attestation
//! - Control definitions for HIPAA, NIST AI RMF, ISO/IEC 42001 and FDA (`controls`)
//! - Buyer policy evaluation against passports (`policy`)
//! - Persistence, portfolio lifecycle and audit trail (`store`, `portfolio`, `audit`)
//! - Packet and report export (`export`)

pub mod attestation;
pub mod audit;
pub mod controls;
pub mod error;
pub mod export;
pub mod policy;
pub mod portfolio;
pub mod risk;
pub mod scoring;
pub mod seed;
pub mod store;
pub mod synthesis;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ComplianceError, ComplianceResult};
pub use policy::{apply_policies_to_portfolio, PolicyEngine};
pub use portfolio::{NewPassport, NewPolicy, PassportUpdate, PolicyService, PortfolioService};
pub use store::{FileStore, MemoryStore, Store};
pub use synthesis::{
    run_deterministic_verification, run_deterministic_verification_at, VerificationArtifacts,
};
