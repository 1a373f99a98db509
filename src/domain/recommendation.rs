//! One recommendation pass: risk chain, then selection, then run stamps.

use chrono::NaiveDate;

use crate::domain::risk_chain::RiskChain;
use crate::domain::security::{Cell, SecurityTable};
use crate::domain::selection::SelectionPolicy;
use crate::ports::audit_port::AuditPort;

pub const RECOMMEND_DATE_COLUMN: &str = "recommend_date";
pub const STRATEGY_NAME_COLUMN: &str = "strategy_name";

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRun {
    pub chain: RiskChain,
    pub policy: SelectionPolicy,
    pub recommend_date: NaiveDate,
}

impl RecommendationRun {
    pub fn new(chain: RiskChain, policy: SelectionPolicy, recommend_date: NaiveDate) -> Self {
        Self {
            chain,
            policy,
            recommend_date,
        }
    }

    /// Filters, selects and stamps. An empty result is a valid outcome and
    /// still carries the stamp columns.
    pub fn recommend(&self, universe: &SecurityTable, audit: &dyn AuditPort) -> SecurityTable {
        let filtered = self.chain.apply(universe, audit);
        let selected = self.policy.select(&filtered, audit);
        selected
            .with_constant_column(
                RECOMMEND_DATE_COLUMN,
                Cell::Text(self.recommend_date.format("%Y-%m-%d").to_string()),
            )
            .with_constant_column(
                STRATEGY_NAME_COLUMN,
                Cell::Text(self.policy.name().to_string()),
            )
    }
}
