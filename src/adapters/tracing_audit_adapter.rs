//! Audit adapter that forwards events to `tracing`.

use tracing::{error, info, warn};

use crate::ports::audit_port::{AuditEvent, AuditPort};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditAdapter;

impl AuditPort for TracingAuditAdapter {
    fn record(&self, event: AuditEvent) {
        match event {
            AuditEvent::RuleApplied {
                rule,
                removed,
                remaining,
            } => info!(rule = %rule, removed, remaining, "Risk rule applied"),
            AuditEvent::RuleSkipped { rule, column } => warn!(
                rule = %rule,
                column = %column,
                "Required column missing, risk rule skipped"
            ),
            AuditEvent::SelectionCompleted {
                policy,
                candidates,
                selected,
            } => info!(policy = %policy, candidates, selected, "Selection completed"),
            AuditEvent::SelectionFailed { policy, column } => error!(
                policy = %policy,
                column = %column,
                "Required column missing, selection is empty"
            ),
        }
    }
}
