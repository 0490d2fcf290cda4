use addr2line::Context;
use gimli::{EndianArcSlice, RunTimeEndian};
use log::debug;
use object::{Object, ObjectSection, ObjectSegment};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use super::memory_maps::{self_memory_range, MemoryRange};
use super::symbol_name::{demangle_symbol, symbol_name, NameLookup};
use super::symbol_table::SymbolTable;
use crate::diagnostics;
use crate::domain::{Address, BacktraceError, SymbolRecord};

type DwarfReader = EndianArcSlice<RunTimeEndian>;

/// Debug information of one binary, ready to resolve its addresses.
///
/// Holds the DWARF context and symbol table of the binary, plus where it is
/// mapped into this process so that runtime addresses can be translated.
pub struct Symbolizer {
    path: PathBuf,
    // addr2line fills its lazy caches on lookup, so queries take the lock
    ctx: Mutex<Context<DwarfReader>>,
    symbols: SymbolTable,
    /// Runtime range of the binary; `None` means addresses are already file-relative
    range: Option<MemoryRange>,
    /// Runtime address minus file address
    bias: u64,
}

impl Symbolizer {
    /// Load the binary at `binary_path`, treating addresses as file-relative.
    ///
    /// # Errors
    /// Returns an error if the binary cannot be read or parsed, or if its DWARF is malformed
    pub fn new<P: AsRef<Path>>(binary_path: P) -> Result<Self, BacktraceError> {
        Self::load(binary_path.as_ref(), None)
    }

    /// Load the running executable and locate it in `/proc/self/maps`.
    ///
    /// # Errors
    /// Returns an error if the executable cannot be found, read, parsed or located in memory
    pub fn for_current_exe() -> Result<Self, BacktraceError> {
        let exe = std::env::current_exe().map_err(BacktraceError::CurrentExe)?;
        let range = self_memory_range(&exe)?;
        Self::load(&exe, Some(range))
    }

    fn load(path: &Path, range: Option<MemoryRange>) -> Result<Self, BacktraceError> {
        let binary_data = fs::read(path)
            .map_err(|source| BacktraceError::ReadBinary { path: path.to_owned(), source })?;

        let obj_file = object::File::parse(&*binary_data)?;

        let endian =
            if obj_file.is_little_endian() { RunTimeEndian::Little } else { RunTimeEndian::Big };

        let load_section = |id: gimli::SectionId| -> Result<DwarfReader, gimli::Error> {
            let data = obj_file
                .section_by_name(id.name())
                .and_then(|section| section.uncompressed_data().ok())
                .unwrap_or(std::borrow::Cow::Borrowed(&[][..]));
            Ok(EndianArcSlice::new(Arc::from(&*data), endian))
        };

        let dwarf = gimli::Dwarf::load(&load_section)?;
        let ctx = Context::from_dwarf(dwarf)?;
        let symbols = SymbolTable::from_object(&obj_file);

        // The lowest loadable segment lands on the mapping at file offset 0
        let image_base = obj_file.segments().map(|segment| segment.address()).min().unwrap_or(0);
        let bias = range.map_or(0, |r| r.base.wrapping_sub(image_base));

        debug!(
            "Loaded debug info for {} ({} symbols, bias 0x{bias:x})",
            path.display(),
            symbols.len()
        );

        Ok(Self { path: path.to_owned(), ctx: Mutex::new(ctx), symbols, range, bias })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Translate a runtime address into this binary's file addresses.
    ///
    /// Returns `None` for addresses outside the binary (shared libraries).
    fn file_address(&self, addr: Address) -> Option<u64> {
        let pc = addr.lookup_pc() as u64;
        match self.range {
            Some(range) if range.contains(pc) => Some(pc.wrapping_sub(self.bias)),
            Some(_) => None,
            None => Some(pc),
        }
    }

    /// Query line-level debug info for one address.
    ///
    /// Yields one record per frame, innermost inlined frame first. Frames
    /// without a function name fall back to [`symbol_name`].
    ///
    /// # Errors
    /// [`BacktraceError::NoDebugInfo`] if DWARF does not cover the address;
    /// any other variant is an internal failure while reading the DWARF.
    pub fn find_frames(&self, addr: Address) -> Result<Vec<SymbolRecord>, BacktraceError> {
        let file_addr = self.file_address(addr).ok_or(BacktraceError::NoDebugInfo(addr))?;

        let ctx = self.ctx.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut frame_iter = ctx.find_frames(file_addr).skip_all_loads()?;

        let mut result = Vec::new();
        while let Some(frame) = frame_iter.next()? {
            let function = frame.function.and_then(|f| f.demangle().ok().map(|s| s.to_string()));

            let record = match function {
                Some(function) => {
                    let (filename, lineno) = frame.location.map_or((String::new(), 0), |loc| {
                        (loc.file.map(str::to_owned).unwrap_or_default(), loc.line.unwrap_or(0))
                    });
                    SymbolRecord { filename, lineno, function, addr }
                }
                None => SymbolRecord::name_only(addr, symbol_name(addr, NameLookup::FRAME)),
            };
            result.push(record);
        }

        if result.is_empty() {
            return Err(BacktraceError::NoDebugInfo(addr));
        }
        Ok(result)
    }

    /// Look the address up in the symbol tables (name only).
    #[must_use]
    pub fn find_symbol(&self, addr: Address) -> Option<String> {
        let file_addr = self.file_address(addr)?;
        self.symbols.lookup(file_addr).map(|entry| demangle_symbol(&entry.name))
    }

    /// Resolve an address through the whole cascade.
    ///
    /// DWARF first; if the address has no debug info, the symbol table, then
    /// the dynamic loader. Internal errors are reported to the side channel and
    /// yield no records.
    pub fn resolve(&self, addr: Address) -> Vec<SymbolRecord> {
        match self.find_frames(addr) {
            Ok(records) => records,
            Err(err) if err.is_not_found() => {
                diagnostics::report(&err);
                vec![self.resolve_without_debug_info(addr)]
            }
            Err(err) => {
                diagnostics::report(&err);
                Vec::new()
            }
        }
    }

    fn resolve_without_debug_info(&self, addr: Address) -> SymbolRecord {
        let function = self
            .find_symbol(addr)
            .unwrap_or_else(|| symbol_name(addr, NameLookup::FRAME));
        SymbolRecord::name_only(addr, function)
    }
}

/// Process-wide symbolizer for the running executable.
///
/// Created once, on first use, by whichever thread gets there first. Load
/// failures are reported once; afterwards every address goes through the
/// dynamic loader fallback.
static CURRENT_EXE: OnceLock<Option<Symbolizer>> = OnceLock::new();

/// Get (loading on first call) the symbolizer of the running executable.
pub fn current_exe_symbolizer() -> Option<&'static Symbolizer> {
    CURRENT_EXE
        .get_or_init(|| match Symbolizer::for_current_exe() {
            Ok(symbolizer) => Some(symbolizer),
            Err(err) => {
                diagnostics::report(&err);
                None
            }
        })
        .as_ref()
}

/// Resolve one runtime address of this process.
pub fn resolve_address(addr: Address) -> Vec<SymbolRecord> {
    match current_exe_symbolizer() {
        Some(symbolizer) => symbolizer.resolve(addr),
        None => {
            diagnostics::report(&BacktraceError::NoDebugInfo(addr));
            vec![SymbolRecord::name_only(addr, symbol_name(addr, NameLookup::FRAME))]
        }
    }
}
