//! Security records and the table that carries them between pipeline stages.
//!
//! A [`SecurityTable`] is an ordered set of rows, one per instrument, with a
//! named column list. Stages never mutate a table in place: every operation
//! here returns a new table and leaves the receiver untouched.

use std::cmp::Ordering;
use std::collections::HashSet;

pub const SYMBOL_COLUMN: &str = "symbol";
pub const NAME_COLUMN: &str = "name";
pub const CLOSE_COLUMN: &str = "close";
pub const TURNOVER_COLUMN: &str = "turnover";
pub const VOLATILITY_COLUMN: &str = "volatility";
pub const SECTOR_COLUMN: &str = "sector";
pub const FINAL_SCORE_COLUMN: &str = "final_score";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }

    /// Renders the cell the way it is written to output files.
    pub fn render(&self) -> String {
        match self {
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecurityRow {
    symbol: String,
    cells: Vec<(String, Cell)>,
}

impl SecurityRow {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            cells: Vec::new(),
        }
    }

    pub fn with_number(mut self, column: &str, value: f64) -> Self {
        self.set(column, Cell::Number(value));
        self
    }

    pub fn with_text(mut self, column: &str, value: impl Into<String>) -> Self {
        self.set(column, Cell::Text(value.into()));
        self
    }

    pub fn with_cell(mut self, column: &str, cell: Cell) -> Self {
        self.set(column, cell);
        self
    }

    fn set(&mut self, column: &str, cell: Cell) {
        if column == SYMBOL_COLUMN {
            self.symbol = cell.render();
        } else if let Some(slot) = self.cells.iter_mut().find(|(c, _)| c == column) {
            slot.1 = cell;
        } else {
            self.cells.push((column.to_string(), cell));
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, cell)| cell)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Cell::as_number)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        if column == SYMBOL_COLUMN {
            return Some(&self.symbol);
        }
        self.get(column).and_then(Cell::as_text)
    }

    /// Column names this row carries a value for, in insertion order, excluding `symbol`.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("empty symbol in row {0}")]
    EmptySymbol(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecurityTable {
    columns: Vec<String>,
    rows: Vec<SecurityRow>,
    symbol_index: HashSet<String>,
}

impl Default for SecurityTable {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl SecurityTable {
    /// Creates an empty table. `symbol` is always the first column.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut table = Self {
            columns: vec![SYMBOL_COLUMN.to_string()],
            rows: Vec::new(),
            symbol_index: HashSet::new(),
        };
        for column in columns {
            table.add_column(column.into());
        }
        table
    }

    /// Builds a table from rows; columns are the union of row columns in
    /// first-seen order.
    pub fn from_rows(rows: Vec<SecurityRow>) -> Result<Self, TableError> {
        let mut table = Self::default();
        for row in rows {
            table.push(row)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, row: SecurityRow) -> Result<(), TableError> {
        if row.symbol.trim().is_empty() {
            return Err(TableError::EmptySymbol(self.rows.len()));
        }
        if self.symbol_index.contains(&row.symbol) {
            return Err(TableError::DuplicateSymbol(row.symbol));
        }
        let new_columns: Vec<String> = row
            .column_names()
            .filter(|c| !self.has_column(c))
            .map(str::to_string)
            .collect();
        for column in new_columns {
            self.add_column(column);
        }
        self.symbol_index.insert(row.symbol.clone());
        self.rows.push(row);
        Ok(())
    }

    fn add_column(&mut self, column: String) {
        if !self.has_column(&column) {
            self.columns.push(column);
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn rows(&self) -> &[SecurityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.symbol.as_str()).collect()
    }

    /// Same columns, zero rows.
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: Vec::new(),
            symbol_index: HashSet::new(),
        }
    }

    /// `rows` must be drawn from this table, so symbols stay unique.
    fn with_rows(&self, rows: Vec<SecurityRow>) -> Self {
        Self {
            columns: self.columns.clone(),
            symbol_index: rows.iter().map(|r| r.symbol.clone()).collect(),
            rows,
        }
    }

    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&SecurityRow) -> bool,
    {
        self.with_rows(self.rows.iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// Stable sort by `column` descending. Rows without a numeric value in
    /// `column`, or with NaN, go to the end, keeping their relative order.
    pub fn sorted_desc_by(&self, column: &str) -> Self {
        let score = |row: &SecurityRow| row.number(column).filter(|v| !v.is_nan());
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| match (score(a), score(b)) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self.with_rows(rows)
    }

    pub fn head(&self, n: usize) -> Self {
        self.with_rows(self.rows.iter().take(n).cloned().collect())
    }

    /// Keeps the rows at `indices`, in the order given.
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        self.with_rows(
            indices
                .iter()
                .filter_map(|&i| self.rows.get(i))
                .cloned()
                .collect(),
        )
    }

    /// Appends `column` with the same value on every row. The column is added
    /// even when the table has no rows.
    pub fn with_constant_column(&self, column: &str, cell: Cell) -> Self {
        let mut table = self.with_rows(
            self.rows
                .iter()
                .map(|r| r.clone().with_cell(column, cell.clone()))
                .collect(),
        );
        table.add_column(column.to_string());
        table
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.symbol_index.contains(symbol)
    }
}

/// Symbols of `table` as an owned set.
pub fn symbol_set(table: &SecurityTable) -> HashSet<String> {
    table.symbols().into_iter().map(str::to_string).collect()
}
