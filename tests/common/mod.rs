#![allow(dead_code)]

use chrono::NaiveDate;
use samrecommend::domain::error::RecommendError;
use samrecommend::domain::security::{
    SecurityRow, SecurityTable, CLOSE_COLUMN, FINAL_SCORE_COLUMN, NAME_COLUMN, SECTOR_COLUMN,
    TURNOVER_COLUMN, VOLATILITY_COLUMN,
};
use samrecommend::ports::universe_port::UniversePort;

pub struct MockUniversePort {
    pub table: Option<SecurityTable>,
    pub error: Option<String>,
}

impl MockUniversePort {
    pub fn with_table(table: SecurityTable) -> Self {
        Self {
            table: Some(table),
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            table: None,
            error: Some(reason.to_string()),
        }
    }
}

impl UniversePort for MockUniversePort {
    fn load_universe(&self) -> Result<SecurityTable, RecommendError> {
        if let Some(reason) = &self.error {
            return Err(RecommendError::Universe {
                reason: reason.clone(),
            });
        }
        Ok(self.table.clone().unwrap_or_default())
    }
}

/// A fully populated security that passes every default risk rule.
pub fn make_security(symbol: &str, score: f64, sector: &str) -> SecurityRow {
    SecurityRow::new(symbol)
        .with_text(NAME_COLUMN, format!("{symbol} Holdings"))
        .with_number(CLOSE_COLUMN, 20.0)
        .with_number(TURNOVER_COLUMN, 3.0)
        .with_number(VOLATILITY_COLUMN, 0.02)
        .with_text(SECTOR_COLUMN, sector)
        .with_number(FINAL_SCORE_COLUMN, score)
}

pub fn make_table(rows: Vec<SecurityRow>) -> SecurityTable {
    SecurityTable::from_rows(rows).unwrap()
}

/// Twelve securities across four sectors, with a few that fail risk rules.
pub fn sample_universe() -> SecurityTable {
    make_table(vec![
        make_security("600000", 95.0, "Bank"),
        make_security("600036", 93.0, "Bank"),
        make_security("601398", 91.0, "Bank"),
        make_security("300750", 90.0, "Battery").with_number(CLOSE_COLUMN, 180.0),
        make_security("002594", 88.0, "Auto"),
        make_security("000625", 86.0, "Auto"),
        make_security("600519", 85.0, "Liquor").with_number(TURNOVER_COLUMN, 0.4),
        make_security("000858", 84.0, "Liquor"),
        make_security("600887", 82.0, "Food").with_text(NAME_COLUMN, "*ST伊利"),
        make_security("000333", 80.0, "Appliance").with_number(VOLATILITY_COLUMN, 0.06),
        make_security("000651", 78.0, "Appliance"),
        make_security("601318", 70.0, "Insurance"),
    ])
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
