//! Generic address-to-symbol-name lookup.
//!
//! Last resort of every backend: asks the dynamic loader (`dladdr`) which
//! exported symbol contains an address. Only names are available this way, and
//! only for symbols present in a dynamic symbol table, so executables linked
//! without `-rdynamic` mostly resolve to nothing.

#![allow(unsafe_code)] // dladdr() requires unsafe

use rustc_demangle::demangle;
use stackscope_common::Address;

/// Options for [`symbol_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NameLookup {
    /// Only accept the address if it is exactly the start of a symbol.
    pub require_exact_addr: bool,
    /// Return an empty string instead of the formatted address on failure.
    pub no_pure_addrs: bool,
}

impl NameLookup {
    /// Lookup used when resolving captured frames.
    pub const FRAME: Self = Self { require_exact_addr: false, no_pure_addrs: true };
}

/// Demangle a Rust symbol name, dropping the trailing hash.
///
/// Names that are not Rust-mangled come back unchanged.
#[must_use]
pub fn demangle_symbol(symbol: &str) -> String {
    format!("{:#}", demangle(symbol))
}

/// Name of the symbol containing `addr`.
///
/// Hits inside a symbol are rendered as `name+0xOFFSET` unless
/// `require_exact_addr` rejects them. Misses render the bare address, or an
/// empty string with `no_pure_addrs`.
#[must_use]
pub fn symbol_name(addr: Address, lookup: NameLookup) -> String {
    let miss = || if lookup.no_pure_addrs { String::new() } else { addr.to_string() };

    let Some((name, symbol_addr)) = nearest_symbol(addr) else {
        return miss();
    };

    let offset = addr.as_usize().wrapping_sub(symbol_addr);
    if offset == 0 {
        demangle_symbol(&name)
    } else if lookup.require_exact_addr {
        miss()
    } else {
        format!("{}+{offset:#x}", demangle_symbol(&name))
    }
}

#[cfg(unix)]
fn nearest_symbol(addr: Address) -> Option<(String, usize)> {
    use std::ffi::CStr;

    let mut info: libc::Dl_info = unsafe { std::mem::zeroed() };
    let r = unsafe { libc::dladdr(addr.as_usize() as *const libc::c_void, &mut info) };
    if r == 0 || info.dli_sname.is_null() {
        return None;
    }

    let name = unsafe { CStr::from_ptr(info.dli_sname) };
    Some((name.to_string_lossy().into_owned(), info.dli_saddr as usize))
}

#[cfg(windows)]
fn nearest_symbol(addr: Address) -> Option<(String, usize)> {
    let mut found = None;
    backtrace::resolve(addr.as_usize() as *mut std::ffi::c_void, |symbol| {
        if found.is_none() {
            if let (Some(name), Some(symbol_addr)) = (symbol.name(), symbol.addr()) {
                let raw = name.as_str().map_or_else(
                    || String::from_utf8_lossy(name.as_bytes()).into_owned(),
                    str::to_owned,
                );
                found = Some((raw, symbol_addr as usize));
            }
        }
    });
    found
}

#[cfg(not(any(unix, windows)))]
fn nearest_symbol(_addr: Address) -> Option<(String, usize)> {
    None
}
