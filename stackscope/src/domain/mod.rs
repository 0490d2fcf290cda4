//! Domain model for stackscope
//!
//! This module contains the core domain types and errors:
//! - Opaque addresses and symbol records (shared with `stackscope-common`)
//! - Structured error handling for backend-internal failures

pub mod errors;

// Re-export common types for convenience
pub use stackscope_common::{Address, SymbolRecord};

pub use errors::{BacktraceError, NOT_FOUND_CODE};
