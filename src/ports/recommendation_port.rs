//! Recommendation output port trait.

use crate::domain::error::RecommendError;
use crate::domain::security::SecurityTable;
use std::io::Write;
use std::path::Path;

/// Port for persisting a finished recommendation set.
pub trait RecommendationPort {
    fn write_to(&self, table: &SecurityTable, out: &mut dyn Write) -> Result<(), RecommendError>;

    /// Default implementation: creates the file at `path` and delegates to `write_to`.
    fn write(&self, table: &SecurityTable, path: &Path) -> Result<(), RecommendError> {
        let mut file = std::fs::File::create(path)?;
        self.write_to(table, &mut file)
    }
}
