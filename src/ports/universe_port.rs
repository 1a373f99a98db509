//! Universe access port trait.

use crate::domain::error::RecommendError;
use crate::domain::security::SecurityTable;

/// Source of the scored universe for one evaluation batch.
pub trait UniversePort {
    fn load_universe(&self) -> Result<SecurityTable, RecommendError>;
}
