//! # stackscope - In-process Stack Capture and Symbolization
//!
//! Captures the calling thread's own call stack as raw addresses, resolves
//! each address into function/file/line records, and trims a captured stack
//! against a fresh capture so only the frames below a common caller remain.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    StackAnalyzer<B: Backend>                 │
//! │   analyze()  ──▶  stack_addrs  ──▶  get_symbols / symbols    │
//! │                        ▲                                     │
//! │   trim_to_current_stack_frame() (fresh capture, common tail) │
//! └──────────────┬───────────────────────────────┬───────────────┘
//!                │ capture(skip)                 │ resolve(addr)
//!                ▼                               ▼
//! ┌──────────────────────────────┐ ┌─────────────────────────────┐
//! │ debuginfo  backtrace::trace  │ │ DWARF (addr2line)           │
//! │ execinfo   backtrace(3)      │ │  └▶ ELF symbol table        │
//! │ native     RtlCapture...     │ │      └▶ dladdr  name+0xOFF  │
//! └──────────────────────────────┘ └─────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`analyzer`]: [`StackAnalyzer`] and the [`Backtrace`] trait
//! - [`backend`]: the build-time selected capture/resolve facility
//! - [`symbolization`]: DWARF, symbol table and dynamic-linker lookups
//! - [`diagnostics`]: error side channel (logged once, counted always)
//! - [`traceback`]: "most recent call last" rendering
//! - [`domain`]: shared types and [`BacktraceError`](domain::BacktraceError)
//! - [`cli`]: arguments of the `stackscope` demo binary
//!
//! ## Typical Usage
//!
//! ```no_run
//! use stackscope::StackAnalyzer;
//!
//! let mut analyzer = StackAnalyzer::new();
//! analyzer.analyze();
//! analyzer.get_symbols(|record| println!("{record}"), false);
//! ```
//!
//! ## Key Concepts
//!
//! - **Most recent first**: index 0 of a capture is the caller of `analyze`
//! - **Best effort**: resolution never fails; unknown fields stay empty
//! - **PIE/ASLR**: runtime addresses are rebased before the DWARF lookup

pub mod analyzer;
pub mod backend;
pub mod cli;
pub mod diagnostics;
pub mod domain;
pub mod symbolization;
pub mod traceback;

pub use analyzer::{Backtrace, StackAnalyzer};
pub use backend::{Backend, DefaultBackend};
pub use domain::{Address, SymbolRecord};
pub use traceback::Traceback;

/// Loads the debug info of the running executable up front.
///
/// Resolution does this lazily on first use; calling `init` early moves the
/// cost (and any load warning) out of the first trace. No-op for backends
/// that do not read the executable themselves (everything but debug-info
/// resolution on Linux).
pub fn init() {
    #[cfg(all(feature = "debuginfo", target_os = "linux"))]
    {
        let _ = symbolization::current_exe_symbolizer();
    }
}
