//! Capture/resolve backends
//!
//! Three mutually exclusive platform facilities, one interface:
//! - `debuginfo`: `backtrace::trace` + DWARF resolution (cargo feature, default)
//! - `execinfo`: glibc/Apple `backtrace(3)` + `dladdr` names
//! - `native`: Windows `RtlCaptureStackBackTrace` + name lookup
//!
//! [`DefaultBackend`] is picked at build time, mirroring that only one
//! facility is linked into a given build.

use stackscope_common::{Address, SymbolRecord};

use crate::symbolization::{symbol_name, NameLookup};

#[cfg(feature = "debuginfo")]
pub mod debuginfo;
#[cfg(any(all(target_os = "linux", target_env = "gnu"), target_vendor = "apple"))]
pub mod execinfo;
#[cfg(windows)]
pub mod native;

#[cfg(feature = "debuginfo")]
pub use debuginfo::DebugInfoBackend;
#[cfg(any(all(target_os = "linux", target_env = "gnu"), target_vendor = "apple"))]
pub use execinfo::ExecinfoBackend;
#[cfg(windows)]
pub use native::NativeBackend;

#[cfg(feature = "debuginfo")]
pub type DefaultBackend = DebugInfoBackend;

#[cfg(all(not(feature = "debuginfo"), windows))]
pub type DefaultBackend = NativeBackend;

#[cfg(all(
    not(feature = "debuginfo"),
    any(all(target_os = "linux", target_env = "gnu"), target_vendor = "apple")
))]
pub type DefaultBackend = ExecinfoBackend;

#[cfg(all(
    not(feature = "debuginfo"),
    not(any(windows, all(target_os = "linux", target_env = "gnu"), target_vendor = "apple"))
))]
compile_error!("no native unwinder on this target; enable the `debuginfo` feature");

/// A stack capture facility plus the resolver that understands its addresses.
pub trait Backend {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Addresses of the caller's stack, most recent call first.
    ///
    /// The backend drops its own frames, then `skip` more at the most-recent
    /// end. Best-effort: an unavailable facility gives a short or empty stack.
    fn capture(&self, skip: usize) -> Vec<Address>;

    /// Best-effort records for one address, innermost inlined frame first.
    ///
    /// Usually exactly one record. May be several (inlining) or none (the
    /// address was abandoned after an internal error, see [`crate::diagnostics`]).
    fn resolve(&self, addr: Address) -> Vec<SymbolRecord>;
}

/// Resolution of the platform-unwinder backends: no file/line, name only.
#[must_use]
pub fn resolve_name_only(addr: Address) -> Vec<SymbolRecord> {
    vec![SymbolRecord::name_only(addr, symbol_name(addr, NameLookup::FRAME))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only_resolution_has_no_location() {
        let records = resolve_name_only(Address(0x10));
        assert_eq!(records.len(), 1);
        assert!(records[0].filename.is_empty());
        assert_eq!(records[0].lineno, 0);
        assert_eq!(records[0].addr, Address(0x10));
    }
}
