//! CLI command implementations.

pub mod score;
pub mod serve;
pub mod validate;
