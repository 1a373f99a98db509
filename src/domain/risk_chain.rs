//! Ordered composition of risk rules.

use crate::domain::risk_rule::RiskRule;
use crate::domain::security::SecurityTable;
use crate::ports::audit_port::AuditPort;

/// Rules run in registration order, each seeing the previous rule's output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskChain {
    rules: Vec<RiskRule>,
}

impl RiskChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: RiskRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: RiskRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[RiskRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, table: &SecurityTable, audit: &dyn AuditPort) -> SecurityTable {
        self.rules
            .iter()
            .fold(table.clone(), |current, rule| rule.apply(&current, audit))
    }
}

impl FromIterator<RiskRule> for RiskChain {
    fn from_iter<I: IntoIterator<Item = RiskRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_audit_adapter::MemoryAuditAdapter;
    use crate::domain::security::{SecurityRow, CLOSE_COLUMN, NAME_COLUMN, TURNOVER_COLUMN};
    use crate::ports::audit_port::{AuditEvent, NoopAudit};

    fn universe() -> SecurityTable {
        SecurityTable::from_rows(vec![
            SecurityRow::new("A")
                .with_text(NAME_COLUMN, "Alpha")
                .with_number(CLOSE_COLUMN, 10.0)
                .with_number(TURNOVER_COLUMN, 3.0),
            SecurityRow::new("B")
                .with_text(NAME_COLUMN, "*ST Beta")
                .with_number(CLOSE_COLUMN, 12.0)
                .with_number(TURNOVER_COLUMN, 4.0),
            SecurityRow::new("C")
                .with_text(NAME_COLUMN, "Gamma")
                .with_number(CLOSE_COLUMN, 2.0)
                .with_number(TURNOVER_COLUMN, 5.0),
            SecurityRow::new("D")
                .with_text(NAME_COLUMN, "Delta")
                .with_number(CLOSE_COLUMN, 50.0)
                .with_number(TURNOVER_COLUMN, 30.0),
        ])
        .unwrap()
    }

    #[test]
    fn empty_chain_is_identity() {
        let t = universe();
        assert_eq!(RiskChain::new().apply(&t, &NoopAudit), t);
    }

    #[test]
    fn rules_compose_in_order() {
        let chain = RiskChain::new()
            .with_rule(RiskRule::price_band())
            .with_rule(RiskRule::turnover_band())
            .with_rule(RiskRule::special_designation());
        let out = chain.apply(&universe(), &NoopAudit);
        assert_eq!(out.symbols(), vec!["A"]);
    }

    #[test]
    fn removal_counts_follow_registration_order() {
        let audit = MemoryAuditAdapter::new();
        let chain = RiskChain::new()
            .with_rule(RiskRule::special_designation())
            .with_rule(RiskRule::price_band());
        chain.apply(&universe(), &audit);
        assert_eq!(
            audit.events(),
            vec![
                AuditEvent::RuleApplied {
                    rule: "special_designation".into(),
                    removed: 1,
                    remaining: 3,
                },
                AuditEvent::RuleApplied {
                    rule: "price".into(),
                    removed: 1,
                    remaining: 2,
                },
            ]
        );
    }

    #[test]
    fn final_size_is_order_independent() {
        let forward: RiskChain = [
            RiskRule::price_band(),
            RiskRule::turnover_band(),
            RiskRule::special_designation(),
        ]
        .into_iter()
        .collect();
        let reverse: RiskChain = forward.rules().iter().rev().cloned().collect();
        let t = universe();
        assert_eq!(
            forward.apply(&t, &NoopAudit).len(),
            reverse.apply(&t, &NoopAudit).len()
        );
    }

    #[test]
    fn skipped_rule_does_not_stop_the_chain() {
        let audit = MemoryAuditAdapter::new();
        let chain = RiskChain::new()
            .with_rule(RiskRule::volatility_ceiling())
            .with_rule(RiskRule::price_band());
        let out = chain.apply(&universe(), &audit);
        assert_eq!(out.symbols(), vec!["A", "B", "D"]);
        assert!(matches!(
            audit.events()[0],
            AuditEvent::RuleSkipped { ref rule, .. } if rule == "volatility"
        ));
    }

    #[test]
    fn push_appends() {
        let mut chain = RiskChain::new();
        assert!(chain.is_empty());
        chain.push(RiskRule::price_band());
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.rules()[0], RiskRule::price_band());
    }
}
