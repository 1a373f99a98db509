//! Selection policies: pick the final set from the filtered universe.
//!
//! Every policy ranks by a score column. A table without that column cannot
//! be ranked, so [`SelectionPolicy::select`] returns an empty table with the
//! input's columns and reports the failure at error level rather than
//! guessing an order.

use std::collections::HashMap;

use crate::domain::error::SelectionError;
use crate::domain::security::{SecurityTable, FINAL_SCORE_COLUMN, SECTOR_COLUMN};
use crate::ports::audit_port::{AuditEvent, AuditPort};

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_THRESHOLD: f64 = 80.0;
pub const DEFAULT_MAX_COUNT: usize = 20;
pub const DEFAULT_SECTOR_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionPolicy {
    /// The `n` highest scores; ties keep input order.
    TopN { n: usize, score_column: String },
    /// Every score `>= threshold`, cut to the best `max_count` when over the cap.
    Threshold {
        threshold: f64,
        score_column: String,
        max_count: usize,
    },
    /// Greedy pass in descending score order taking at most `sector_limit`
    /// rows per sector and `top_n` rows overall.
    SectorBalanced {
        top_n: usize,
        sector_limit: usize,
        score_column: String,
        sector_column: String,
    },
}

impl SelectionPolicy {
    pub fn top_n(n: usize) -> Self {
        SelectionPolicy::TopN {
            n,
            score_column: FINAL_SCORE_COLUMN.to_string(),
        }
    }

    pub fn threshold(threshold: f64, max_count: usize) -> Self {
        SelectionPolicy::Threshold {
            threshold,
            score_column: FINAL_SCORE_COLUMN.to_string(),
            max_count,
        }
    }

    pub fn sector_balanced(top_n: usize, sector_limit: usize) -> Self {
        SelectionPolicy::SectorBalanced {
            top_n,
            sector_limit,
            score_column: FINAL_SCORE_COLUMN.to_string(),
            sector_column: SECTOR_COLUMN.to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SelectionPolicy::TopN { .. } => "top_n",
            SelectionPolicy::Threshold { .. } => "threshold",
            SelectionPolicy::SectorBalanced { .. } => "sector_balanced",
        }
    }

    pub fn score_column(&self) -> &str {
        match self {
            SelectionPolicy::TopN { score_column, .. }
            | SelectionPolicy::Threshold { score_column, .. }
            | SelectionPolicy::SectorBalanced { score_column, .. } => score_column,
        }
    }

    fn required_columns(&self) -> Vec<&str> {
        match self {
            SelectionPolicy::SectorBalanced {
                score_column,
                sector_column,
                ..
            } => vec![score_column.as_str(), sector_column.as_str()],
            _ => vec![self.score_column()],
        }
    }

    /// Selects rows, or reports which required column is missing.
    pub fn try_select(&self, table: &SecurityTable) -> Result<SecurityTable, SelectionError> {
        if let Some(missing) = self
            .required_columns()
            .into_iter()
            .find(|c| !table.has_column(c))
        {
            return Err(SelectionError::MissingColumn {
                policy: self.name().to_string(),
                column: missing.to_string(),
            });
        }

        let selected = match self {
            SelectionPolicy::TopN { n, score_column } => {
                table.sorted_desc_by(score_column).head(*n)
            }
            SelectionPolicy::Threshold {
                threshold,
                score_column,
                max_count,
            } => {
                let kept = table.filter(|row| {
                    row.number(score_column)
                        .is_some_and(|score| score >= *threshold)
                });
                if kept.len() > *max_count {
                    kept.sorted_desc_by(score_column).head(*max_count)
                } else {
                    kept
                }
            }
            SelectionPolicy::SectorBalanced {
                top_n,
                sector_limit,
                score_column,
                sector_column,
            } => select_sector_balanced(table, *top_n, *sector_limit, score_column, sector_column),
        };
        Ok(selected)
    }

    /// Fail-closed selection: a missing column yields an empty table.
    pub fn select(&self, table: &SecurityTable, audit: &dyn AuditPort) -> SecurityTable {
        match self.try_select(table) {
            Ok(selected) => {
                audit.record(AuditEvent::SelectionCompleted {
                    policy: self.name().to_string(),
                    candidates: table.len(),
                    selected: selected.len(),
                });
                selected
            }
            Err(SelectionError::MissingColumn { policy, column }) => {
                audit.record(AuditEvent::SelectionFailed { policy, column });
                table.empty_like()
            }
        }
    }
}

fn select_sector_balanced(
    table: &SecurityTable,
    top_n: usize,
    sector_limit: usize,
    score_column: &str,
    sector_column: &str,
) -> SecurityTable {
    let sorted = table.sorted_desc_by(score_column);
    // Rows without a sector share the "" bucket.
    let mut per_sector: HashMap<String, usize> = HashMap::new();
    let mut picked = Vec::with_capacity(top_n.min(sorted.len()));

    for (index, row) in sorted.rows().iter().enumerate() {
        if picked.len() >= top_n {
            break;
        }
        let sector = row
            .get(sector_column)
            .map(|cell| cell.render())
            .unwrap_or_default();
        let count = per_sector.entry(sector).or_insert(0);
        if *count < sector_limit {
            *count += 1;
            picked.push(index);
        }
    }

    sorted.take_rows(&picked)
}
