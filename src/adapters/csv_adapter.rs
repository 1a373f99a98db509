//! CSV universe reader and recommendation writer.
//!
//! The universe file has a header row with a `symbol` column. `symbol`,
//! `name` and `sector` are always read as text; other fields become numbers
//! when they parse as `f64` and text otherwise. Empty fields are left absent.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::domain::error::RecommendError;
use crate::domain::security::{
    Cell, SecurityRow, SecurityTable, NAME_COLUMN, SECTOR_COLUMN, SYMBOL_COLUMN,
};
use crate::ports::recommendation_port::RecommendationPort;
use crate::ports::universe_port::UniversePort;

const TEXT_COLUMNS: [&str; 3] = [SYMBOL_COLUMN, NAME_COLUMN, SECTOR_COLUMN];

pub struct CsvUniverseAdapter {
    path: PathBuf,
}

impl CsvUniverseAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn parse(content: &str) -> Result<SecurityTable, RecommendError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| RecommendError::Universe {
                reason: format!("CSV header error: {}", e),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let symbol_index = headers
            .iter()
            .position(|h| h == SYMBOL_COLUMN)
            .ok_or_else(|| RecommendError::Universe {
                reason: "missing symbol column".into(),
            })?;

        let mut table = SecurityTable::new(headers.iter().filter(|h| *h != SYMBOL_COLUMN).cloned());

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| RecommendError::Universe {
                reason: format!("CSV parse error: {}", e),
            })?;

            let symbol = record.get(symbol_index).unwrap_or_default().trim();
            if symbol.is_empty() {
                return Err(RecommendError::Universe {
                    reason: format!("empty symbol on data row {}", line + 1),
                });
            }

            let mut row = SecurityRow::new(symbol);
            for (column, raw) in headers.iter().zip(record.iter()) {
                let value = raw.trim();
                if column == SYMBOL_COLUMN || value.is_empty() {
                    continue;
                }
                row = row.with_cell(column, parse_cell(column, value));
            }
            table.push(row)?;
        }

        Ok(table)
    }
}

fn parse_cell(column: &str, value: &str) -> Cell {
    if TEXT_COLUMNS.contains(&column) {
        return Cell::Text(value.to_string());
    }
    match value.parse::<f64>() {
        Ok(v) => Cell::Number(v),
        Err(_) => Cell::Text(value.to_string()),
    }
}

impl UniversePort for CsvUniverseAdapter {
    fn load_universe(&self) -> Result<SecurityTable, RecommendError> {
        let content = fs::read_to_string(&self.path).map_err(|e| RecommendError::Universe {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        Self::parse(&content)
    }
}

/// Writes the table's columns in order; absent cells are written empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRecommendationWriter;

impl RecommendationPort for CsvRecommendationWriter {
    fn write_to(&self, table: &SecurityTable, out: &mut dyn Write) -> Result<(), RecommendError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(table.columns())
            .map_err(|e| std::io::Error::other(e))?;

        for row in table.rows() {
            let record: Vec<String> = table
                .columns()
                .iter()
                .map(|column| {
                    if column == SYMBOL_COLUMN {
                        row.symbol().to_string()
                    } else {
                        row.get(column).map(Cell::render).unwrap_or_default()
                    }
                })
                .collect();
            wtr.write_record(&record)
                .map_err(|e| std::io::Error::other(e))?;
        }

        wtr.flush()?;
        Ok(())
    }
}
