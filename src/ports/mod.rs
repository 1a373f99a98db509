//! Port traits at the edges of the domain.

pub mod audit_port;
pub mod config_port;
pub mod recommendation_port;
pub mod universe_port;
