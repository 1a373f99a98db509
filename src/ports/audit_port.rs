//! Audit reporting port trait.
//!
//! Filter and selection stages report what they removed and kept through this
//! port. Reports are informational and never change which rows are chosen.

#[derive(Debug, Clone, PartialEq)]
pub enum AuditEvent {
    RuleApplied {
        rule: String,
        removed: usize,
        remaining: usize,
    },
    /// The rule's required column was absent; the table passed through unchanged.
    RuleSkipped { rule: String, column: String },
    SelectionCompleted {
        policy: String,
        candidates: usize,
        selected: usize,
    },
    /// The policy's required column was absent; the selection is empty.
    SelectionFailed { policy: String, column: String },
}

pub trait AuditPort {
    fn record(&self, event: AuditEvent);
}

/// Discards every event.
pub struct NoopAudit;

impl AuditPort for NoopAudit {
    fn record(&self, _event: AuditEvent) {}
}
