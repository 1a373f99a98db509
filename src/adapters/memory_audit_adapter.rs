//! In-memory audit adapter that keeps every event for later inspection.

use std::sync::Mutex;

use crate::ports::audit_port::{AuditEvent, AuditPort};

#[derive(Debug, Default)]
pub struct MemoryAuditAdapter {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl AuditPort for MemoryAuditAdapter {
    fn record(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
