//! CLI command implementations.

pub mod classify;
pub mod output;
pub mod tail;
