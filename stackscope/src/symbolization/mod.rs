//! # Symbol Resolution and Address Translation
//!
//! This module converts raw instruction pointers captured from this process's
//! own stack into human-readable function names, file paths and line numbers.
//!
//! ## The Resolver Cascade
//!
//! Every address goes through up to three resolvers, stopping at the first
//! that knows something:
//!
//! ```text
//! 1. DWARF line info (addr2line)      -> function, file, line (maybe several inlined frames)
//!        │ no debug info for this address
//!        ▼
//! 2. ELF symbol tables (.symtab/.dynsym) -> function name only
//!        │ no covering symbol
//!        ▼
//! 3. Dynamic loader (dladdr)          -> exported symbol name, or empty
//! ```
//!
//! Internal failures (unreadable executable, malformed DWARF) never abort a
//! trace: they are reported through [`crate::diagnostics`] and the affected
//! address is skipped.
//!
//! Only step 3 is available without the `debuginfo` feature.
//!
//! Steps 1 and 2 read the ELF executable directly and need `/proc/self/maps`,
//! so they are Linux only. Other targets resolve through the `backtrace`
//! crate's symbolizer (Mach-O/dSYM, PDB) before falling back to step 3.
//!
//! ## PIE and ASLR
//!
//! DWARF and symbol tables use file addresses, the stack holds runtime
//! addresses. The executable's mappings in `/proc/self/maps` give the load
//! base, and:
//!
//! ```text
//! bias         = load base - lowest segment address
//! file address = runtime address - bias
//! ```
//!
//! Addresses outside the executable (shared libraries) skip straight to the
//! dynamic loader.
//!
//! ## Module Structure
//!
//! - **`symbolizer`**: DWARF + symbol table lookups, process-wide handle
//! - **`symbol_table`**: owned, sorted function symbols
//! - **`memory_maps`**: `/proc/self/maps` parsing for the load base
//! - **`system_resolver`**: `backtrace::resolve` for non-ELF targets
//! - **`symbol_name`**: `dladdr` lookup and demangling

#[cfg(all(feature = "debuginfo", target_os = "linux"))]
pub mod memory_maps;
pub mod symbol_name;
#[cfg(all(feature = "debuginfo", target_os = "linux"))]
pub mod symbol_table;
#[cfg(all(feature = "debuginfo", target_os = "linux"))]
pub mod symbolizer;
#[cfg(feature = "debuginfo")]
pub mod system_resolver;

#[cfg(all(feature = "debuginfo", target_os = "linux"))]
pub use memory_maps::{parse_memory_maps, MemoryRange};
pub use symbol_name::{demangle_symbol, symbol_name, NameLookup};
#[cfg(all(feature = "debuginfo", target_os = "linux"))]
pub use symbolizer::{current_exe_symbolizer, resolve_address, Symbolizer};
#[cfg(all(feature = "debuginfo", not(target_os = "linux")))]
pub use system_resolver::resolve as resolve_address;
