//! Core domain types and logic.

pub mod security;
pub mod risk_rule;
pub mod risk_chain;
pub mod selection;
pub mod recommendation;
pub mod config_validation;
pub mod error;
