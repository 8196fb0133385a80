//! Command implementations

pub mod rewrite;
