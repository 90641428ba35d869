//! Operator audit trail.

use chrono::{DateTime, Utc};
use spectral_common::{format_timestamp, generate_id, AuditLogEntry};
use tracing::info;

/// Audit entries, newest first.
#[derive(Debug, Clone)]
pub struct AuditLog {
    operator: String,
    entries: Vec<AuditLogEntry>,
}

impl AuditLog {
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            entries: Vec::new(),
        }
    }

    /// Resume a trail from previously stored entries, newest first.
    pub fn with_entries(operator: impl Into<String>, entries: Vec<AuditLogEntry>) -> Self {
        Self {
            operator: operator.into(),
            entries,
        }
    }

    /// Record an action at the current time.
    pub fn record(&mut self, action: &str, details: &str) -> &AuditLogEntry {
        self.record_at(action, details, Utc::now())
    }

    pub fn record_at(&mut self, action: &str, details: &str, at: DateTime<Utc>) -> &AuditLogEntry {
        let entry = AuditLogEntry {
            id: format!("log-{}", generate_id()),
            timestamp: format_timestamp(at),
            user: self.operator.clone(),
            action: action.to_string(),
            details: details.to_string(),
        };
        info!(
            event = "audit",
            audit_id = %entry.id,
            user = %entry.user,
            action = %entry.action,
            details = %entry.details,
        );
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
