//! IO modules - archive access

pub mod extract;
