//! Structured error types for stackscope
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! None of these reach callers of the analyzer: they are either absorbed by the
//! resolver fallbacks or handed to [`crate::diagnostics::report`].

use std::io;
use std::path::PathBuf;

use stackscope_common::Address;
use thiserror::Error;

/// Error code of the distinguished "no debug info" condition.
pub const NOT_FOUND_CODE: i32 = -1;

#[derive(Error, Debug)]
pub enum BacktraceError {
    #[error("no debug info for address {0}")]
    NoDebugInfo(Address),

    #[error("failed to locate the running executable: {0}")]
    CurrentExe(#[source] io::Error),

    #[error("failed to read {}: {source}", .path.display())]
    ReadBinary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read /proc/self/maps: {0}")]
    MemoryMaps(#[source] io::Error),

    #[error("executable {0} is not mapped into this process")]
    NotMapped(String),

    #[cfg(feature = "debuginfo")]
    #[error("failed to parse object file: {0}")]
    ObjectParse(#[from] object::Error),

    #[cfg(feature = "debuginfo")]
    #[error("malformed DWARF debug info: {0}")]
    Dwarf(#[from] gimli::Error),
}

impl BacktraceError {
    /// errno-style code attached to side-channel reports.
    ///
    /// `-1` marks missing debug info, I/O failures carry the OS error number,
    /// format errors are `0`.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::NoDebugInfo(_) => NOT_FOUND_CODE,
            Self::CurrentExe(err) | Self::ReadBinary { source: err, .. } | Self::MemoryMaps(err) => {
                err.raw_os_error().unwrap_or(0)
            }
            Self::NotMapped(_) => 0,
            #[cfg(feature = "debuginfo")]
            Self::ObjectParse(_) | Self::Dwarf(_) => 0,
        }
    }

    /// True for the "no debug info" condition that triggers the fallback resolvers.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoDebugInfo(_))
    }
}
