//! Owned symbol table of the executable.
//!
//! Second step of the resolver cascade: when an address has no DWARF
//! coverage, the ELF symbol tables (`.symtab`, and `.dynsym` for stripped
//! binaries) still name the enclosing function.

use object::{Object, ObjectSymbol, SymbolKind};

/// One function symbol, in file-relative addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub address: u64,
    /// 0 when the object file does not record a size
    pub size: u64,
    pub name: String,
}

impl SymbolEntry {
    fn covers(&self, addr: u64) -> bool {
        addr >= self.address && (self.size == 0 || addr - self.address < self.size)
    }
}

/// Function symbols sorted by address.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    /// Collect text symbols from both the static and the dynamic symbol table.
    pub fn from_object<'data>(obj: &impl Object<'data>) -> Self {
        let entries = obj
            .symbols()
            .chain(obj.dynamic_symbols())
            .filter(|sym| sym.kind() == SymbolKind::Text && sym.address() != 0)
            .filter_map(|sym| {
                let name = sym.name().ok().filter(|name| !name.is_empty())?;
                Some(SymbolEntry { address: sym.address(), size: sym.size(), name: name.to_owned() })
            })
            .collect();

        Self::from_entries(entries)
    }

    #[must_use]
    pub fn from_entries(mut entries: Vec<SymbolEntry>) -> Self {
        entries.sort_by_key(|entry| entry.address);
        // .symtab and .dynsym overlap for exported functions
        entries.dedup_by(|a, b| a.address == b.address && a.name == b.name);
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Symbol whose extent covers the file-relative address `addr`.
    #[must_use]
    pub fn lookup(&self, addr: u64) -> Option<&SymbolEntry> {
        let idx = self.entries.partition_point(|entry| entry.address <= addr);
        // Several aliases may share an address; prefer one with a known size
        self.entries[..idx]
            .iter()
            .rev()
            .take_while(|entry| entry.address == self.entries[idx - 1].address)
            .find(|entry| entry.covers(addr))
    }
}
