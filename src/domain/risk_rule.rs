//! Risk rules: eligibility filters applied before selection.
//!
//! Each rule reads one column. A rule whose column is missing from the table
//! is skipped: the table passes through unchanged and the skip is reported as
//! a warning. Missing risk data never blocks a recommendation run.

use crate::domain::security::{
    SecurityRow, SecurityTable, CLOSE_COLUMN, NAME_COLUMN, TURNOVER_COLUMN, VOLATILITY_COLUMN,
};
use crate::ports::audit_port::{AuditEvent, AuditPort};

pub const DEFAULT_MIN_PRICE: f64 = 5.0;
pub const DEFAULT_MAX_PRICE: f64 = 100.0;
pub const DEFAULT_MIN_TURNOVER: f64 = 1.0;
pub const DEFAULT_MAX_TURNOVER: f64 = 15.0;
pub const DEFAULT_MAX_VOLATILITY: f64 = 0.03;
pub const DEFAULT_VOLATILITY_LOOKBACK_DAYS: usize = 20;
/// `"ST"` also matches `"*ST"` names.
pub const DEFAULT_SPECIAL_MARKER: &str = "ST";

#[derive(Debug, Clone, PartialEq)]
pub enum RiskRule {
    /// Keep `min_price <= close <= max_price`.
    PriceBand { min_price: f64, max_price: f64 },
    /// Keep `min_turnover <= turnover <= max_turnover`, in percent.
    TurnoverBand { min_turnover: f64, max_turnover: f64 },
    /// Keep `volatility <= max_volatility`. `lookback_days` describes the
    /// window the upstream volatility figure was computed over; the filter
    /// itself only applies the ceiling.
    VolatilityCeiling {
        max_volatility: f64,
        lookback_days: usize,
    },
    /// Drop rows whose name contains any marker (case-sensitive substring).
    SpecialDesignation { markers: Vec<String> },
}

impl RiskRule {
    pub fn price_band() -> Self {
        RiskRule::PriceBand {
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
        }
    }

    pub fn turnover_band() -> Self {
        RiskRule::TurnoverBand {
            min_turnover: DEFAULT_MIN_TURNOVER,
            max_turnover: DEFAULT_MAX_TURNOVER,
        }
    }

    pub fn volatility_ceiling() -> Self {
        RiskRule::VolatilityCeiling {
            max_volatility: DEFAULT_MAX_VOLATILITY,
            lookback_days: DEFAULT_VOLATILITY_LOOKBACK_DAYS,
        }
    }

    pub fn special_designation() -> Self {
        RiskRule::SpecialDesignation {
            markers: vec![DEFAULT_SPECIAL_MARKER.to_string()],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RiskRule::PriceBand { .. } => "price",
            RiskRule::TurnoverBand { .. } => "turnover",
            RiskRule::VolatilityCeiling { .. } => "volatility",
            RiskRule::SpecialDesignation { .. } => "special_designation",
        }
    }

    pub fn required_column(&self) -> &'static str {
        match self {
            RiskRule::PriceBand { .. } => CLOSE_COLUMN,
            RiskRule::TurnoverBand { .. } => TURNOVER_COLUMN,
            RiskRule::VolatilityCeiling { .. } => VOLATILITY_COLUMN,
            RiskRule::SpecialDesignation { .. } => NAME_COLUMN,
        }
    }

    /// Row-level predicate. A row with no numeric value for a band or ceiling
    /// fails it; a row with no name passes the designation check.
    pub fn passes(&self, row: &SecurityRow) -> bool {
        match self {
            RiskRule::PriceBand {
                min_price,
                max_price,
            } => in_band(row.number(CLOSE_COLUMN), *min_price, *max_price),
            RiskRule::TurnoverBand {
                min_turnover,
                max_turnover,
            } => in_band(row.number(TURNOVER_COLUMN), *min_turnover, *max_turnover),
            RiskRule::VolatilityCeiling { max_volatility, .. } => row
                .number(VOLATILITY_COLUMN)
                .is_some_and(|v| v <= *max_volatility),
            RiskRule::SpecialDesignation { markers } => match row.text(NAME_COLUMN) {
                Some(name) => !markers.iter().any(|m| name.contains(m.as_str())),
                None => true,
            },
        }
    }

    pub fn apply(&self, table: &SecurityTable, audit: &dyn AuditPort) -> SecurityTable {
        let column = self.required_column();
        if !table.has_column(column) {
            audit.record(AuditEvent::RuleSkipped {
                rule: self.name().to_string(),
                column: column.to_string(),
            });
            return table.clone();
        }

        let kept = table.filter(|row| self.passes(row));
        audit.record(AuditEvent::RuleApplied {
            rule: self.name().to_string(),
            removed: table.len() - kept.len(),
            remaining: kept.len(),
        });
        kept
    }
}

fn in_band(value: Option<f64>, lower: f64, upper: f64) -> bool {
    value.is_some_and(|v| lower <= v && v <= upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_audit_adapter::MemoryAuditAdapter;
    use crate::ports::audit_port::NoopAudit;

    fn priced(symbol: &str, close: f64) -> SecurityRow {
        SecurityRow::new(symbol).with_number(CLOSE_COLUMN, close)
    }

    fn table(rows: Vec<SecurityRow>) -> SecurityTable {
        SecurityTable::from_rows(rows).unwrap()
    }

    #[test]
    fn price_band_is_inclusive() {
        let t = table(vec![
            priced("LOW", 4.99),
            priced("MIN", 5.0),
            priced("MID", 42.0),
            priced("MAX", 100.0),
            priced("HIGH", 100.01),
        ]);
        let kept = RiskRule::price_band().apply(&t, &NoopAudit);
        assert_eq!(kept.symbols(), vec!["MIN", "MID", "MAX"]);
    }

    #[test]
    fn turnover_band_defaults() {
        let t = table(vec![
            SecurityRow::new("A").with_number(TURNOVER_COLUMN, 0.5),
            SecurityRow::new("B").with_number(TURNOVER_COLUMN, 1.0),
            SecurityRow::new("C").with_number(TURNOVER_COLUMN, 15.0),
            SecurityRow::new("D").with_number(TURNOVER_COLUMN, 20.0),
        ]);
        let kept = RiskRule::turnover_band().apply(&t, &NoopAudit);
        assert_eq!(kept.symbols(), vec!["B", "C"]);
    }

    #[test]
    fn volatility_ceiling_only_checks_upper_bound() {
        let t = table(vec![
            SecurityRow::new("CALM").with_number(VOLATILITY_COLUMN, 0.0),
            SecurityRow::new("EDGE").with_number(VOLATILITY_COLUMN, 0.03),
            SecurityRow::new("WILD").with_number(VOLATILITY_COLUMN, 0.05),
        ]);
        let kept = RiskRule::volatility_ceiling().apply(&t, &NoopAudit);
        assert_eq!(kept.symbols(), vec!["CALM", "EDGE"]);
    }

    #[test]
    fn lookback_window_does_not_change_the_filter() {
        let t = table(vec![
            SecurityRow::new("A").with_number(VOLATILITY_COLUMN, 0.02),
            SecurityRow::new("B").with_number(VOLATILITY_COLUMN, 0.04),
        ]);
        let short = RiskRule::VolatilityCeiling {
            max_volatility: 0.03,
            lookback_days: 5,
        };
        let long = RiskRule::VolatilityCeiling {
            max_volatility: 0.03,
            lookback_days: 250,
        };
        assert_eq!(short.apply(&t, &NoopAudit), long.apply(&t, &NoopAudit));
    }

    #[test]
    fn special_designation_excludes_st_names() {
        let t = table(vec![
            SecurityRow::new("000001").with_text(NAME_COLUMN, "*ST甲公司"),
            SecurityRow::new("000002").with_text(NAME_COLUMN, "甲公司"),
            SecurityRow::new("000003").with_text(NAME_COLUMN, "ST乙公司"),
            SecurityRow::new("000004").with_text(NAME_COLUMN, "st丙公司"),
        ]);
        let kept = RiskRule::special_designation().apply(&t, &NoopAudit);
        assert_eq!(kept.symbols(), vec!["000002", "000004"]);
    }

    #[test]
    fn row_without_value_fails_numeric_rule() {
        let t = table(vec![priced("A", 10.0), SecurityRow::new("B").with_text("sector", "x")]);
        let kept = RiskRule::price_band().apply(&t, &NoopAudit);
        assert_eq!(kept.symbols(), vec!["A"]);
    }

    #[test]
    fn row_without_name_passes_designation_rule() {
        let t = table(vec![
            SecurityRow::new("A").with_text(NAME_COLUMN, "*ST"),
            SecurityRow::new("B").with_number(CLOSE_COLUMN, 1.0),
        ]);
        let kept = RiskRule::special_designation().apply(&t, &NoopAudit);
        assert_eq!(kept.symbols(), vec!["B"]);
    }

    #[test]
    fn missing_column_passes_table_through_and_warns() {
        let t = table(vec![priced("A", 1.0), priced("B", 1000.0)]);
        let audit = MemoryAuditAdapter::new();
        let out = RiskRule::turnover_band().apply(&t, &audit);
        assert_eq!(out, t);
        assert_eq!(
            audit.events(),
            vec![AuditEvent::RuleSkipped {
                rule: "turnover".into(),
                column: "turnover".into(),
            }]
        );
    }

    #[test]
    fn apply_reports_removed_and_remaining() {
        let t = table(vec![priced("A", 1.0), priced("B", 10.0), priced("C", 20.0)]);
        let audit = MemoryAuditAdapter::new();
        RiskRule::price_band().apply(&t, &audit);
        assert_eq!(
            audit.events(),
            vec![AuditEvent::RuleApplied {
                rule: "price".into(),
                removed: 1,
                remaining: 2,
            }]
        );
    }

    #[test]
    fn apply_twice_equals_apply_once() {
        let t = table(vec![priced("A", 1.0), priced("B", 10.0), priced("C", 200.0)]);
        let rule = RiskRule::price_band();
        let once = rule.apply(&t, &NoopAudit);
        let twice = rule.apply(&once, &NoopAudit);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_table_yields_empty_table() {
        let t = SecurityTable::new([CLOSE_COLUMN]);
        let out = RiskRule::price_band().apply(&t, &NoopAudit);
        assert!(out.is_empty());
        assert_eq!(out.columns(), t.columns());
    }

    #[test]
    fn names_and_columns() {
        assert_eq!(RiskRule::price_band().name(), "price");
        assert_eq!(RiskRule::volatility_ceiling().required_column(), "volatility");
        assert_eq!(RiskRule::special_designation().required_column(), "name");
    }
}
