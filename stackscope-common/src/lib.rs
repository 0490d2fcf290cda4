//! # Shared Data Structures (capture ↔ resolution)
//!
//! Defines the address and symbol types passed between the capture backends,
//! the resolvers and whoever prints the trace. Kept `no_std` (with `alloc`) so
//! the same definitions can be used from allocation-aware but otherwise
//! minimal environments such as panic or crash handlers.
//!
//! ## Key Types
//!
//! - [`Address`] - One instruction pointer of a captured call stack
//! - [`SymbolRecord`] - Best-effort description of one [`Address`]

#![no_std]

extern crate alloc;

use alloc::string::String;
use core::fmt;

// ============================================================================
// Capture Constants
// ============================================================================

/// Frames skipped at the most-recent end of every capture.
///
/// Drops the `analyze` call itself so the trace starts at its caller.
pub const BASE_SKIP_FRAMES: usize = 1;

/// Frames dropped at the least-recent end by the POSIX unwinder.
///
/// These are libc/runtime entry frames (`_start`, `__libc_start_main`).
pub const SKIP_ENTRY_FRAMES: usize = 1;

/// First buffer size handed to `backtrace(3)`. Doubled until it fits.
pub const INITIAL_BUFFER_FRAMES: usize = 64;

/// Fixed buffer size of the Windows native capture.
pub const NATIVE_MAX_FRAMES: usize = 64;

// ============================================================================
// Address
// ============================================================================

/// One return/instruction pointer of a captured call stack.
///
/// Opaque: only identity and the resolution performed by a backend are
/// meaningful. It is never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Address(pub usize);

impl Address {
    /// Raw machine word of this address.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Address to use for symbol lookups.
    ///
    /// Captured values are return addresses, which point one past the call
    /// instruction and may already belong to the next line or function.
    #[must_use]
    pub const fn lookup_pc(self) -> usize {
        self.0.saturating_sub(1)
    }
}

impl From<usize> for Address {
    fn from(addr: usize) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:#x}")
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

// ============================================================================
// SymbolRecord
// ============================================================================

/// Resolved description of one [`Address`].
///
/// Unknown parts stay empty (`filename`, `function`) or zero (`lineno`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolRecord {
    pub filename: String,
    pub lineno: u32,
    /// Demangled when possible.
    pub function: String,
    pub addr: Address,
}

impl SymbolRecord {
    /// Record carrying only a function name (no file/line information).
    #[must_use]
    pub fn name_only(addr: Address, function: String) -> Self {
        Self { filename: String::new(), lineno: 0, function, addr }
    }

    /// True if neither a function name nor a source location is known.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.function.is_empty() && self.filename.is_empty()
    }
}

/// Single trace line: ` -> function [file:line]`.
impl fmt::Display for SymbolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(" -> ")?;
        if self.function.is_empty() {
            write!(f, "? ({})", self.addr)?;
        } else {
            f.write_str(&self.function)?;
        }

        if !self.filename.is_empty() {
            write!(f, " [{}", self.filename)?;
            if self.lineno != 0 {
                write!(f, ":{}", self.lineno)?;
            }
            f.write_str("]")?;
        }

        Ok(())
    }
}
