//! Terminal output
//!
//! Everything the binary prints to the operator goes through here. Log
//! output from `tracing` is separate and goes to stderr.

pub mod reporter;
pub mod theme;

pub use reporter::TerminalReporter;
pub use theme::Theme;
