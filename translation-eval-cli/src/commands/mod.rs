//! CLI command implementations

pub mod score;
pub mod stats;
pub mod weights;
