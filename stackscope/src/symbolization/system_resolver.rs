//! Resolution through the `backtrace` crate's own symbolizer.
//!
//! Serves the debug-info backend where the running executable is not an ELF
//! file listed in `/proc/self/maps` (macOS, Windows): `backtrace` reads the
//! platform's debug info itself (Mach-O/dSYM, PDB).

use std::ffi::c_void;

use super::symbol_name::{symbol_name, NameLookup};
use crate::diagnostics;
use crate::domain::{Address, BacktraceError, SymbolRecord};

/// Query `backtrace` for one address, innermost inlined frame first.
///
/// # Errors
/// [`BacktraceError::NoDebugInfo`] if no symbol covers the address.
pub fn find_frames(addr: Address) -> Result<Vec<SymbolRecord>, BacktraceError> {
    let mut records = Vec::new();

    // resolve() adjusts return addresses to the call instruction itself
    backtrace::resolve(addr.as_usize() as *mut c_void, |symbol| {
        let function = symbol
            .name()
            .map(|name| format!("{name:#}"))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| symbol_name(addr, NameLookup::FRAME));
        let filename = symbol
            .filename()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_default();

        records.push(SymbolRecord { filename, lineno: symbol.lineno().unwrap_or(0), function, addr });
    });

    if records.is_empty() {
        return Err(BacktraceError::NoDebugInfo(addr));
    }
    Ok(records)
}

/// Resolve one runtime address of this process, falling back to `dladdr`.
pub fn resolve(addr: Address) -> Vec<SymbolRecord> {
    find_frames(addr).unwrap_or_else(|err| {
        diagnostics::report(&err);
        vec![SymbolRecord::name_only(addr, symbol_name(addr, NameLookup::FRAME))]
    })
}
