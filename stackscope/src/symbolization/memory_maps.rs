//! Memory mapping utilities for the running process
//!
//! This module parses `/proc/self/maps` to find where the running executable
//! is mapped, which is essential for translating captured runtime addresses of
//! a position-independent executable (PIE) back into file-relative addresses.

use log::debug;
use std::fs;
use std::path::Path;

use crate::domain::BacktraceError;

/// Memory range of a loaded binary in this process's address space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRange {
    pub start: u64,
    pub end: u64,
    /// Start of the mapping that covers file offset 0 (the load base)
    pub base: u64,
}

impl MemoryRange {
    /// Check if an address falls within this memory range
    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }
}

/// Read `/proc/self/maps` and find the memory range of `binary_path`.
///
/// # Errors
/// Returns an error if the maps file cannot be read or the binary is not mapped
pub fn self_memory_range(binary_path: &Path) -> Result<MemoryRange, BacktraceError> {
    let maps = fs::read_to_string("/proc/self/maps").map_err(BacktraceError::MemoryMaps)?;
    let path = binary_path.to_string_lossy();
    let range = parse_memory_maps(&maps, &path)
        .ok_or_else(|| BacktraceError::NotMapped(path.clone().into_owned()))?;

    debug!(
        "Executable memory range: 0x{:x} - 0x{:x} (base 0x{:x}, size: {} KB)",
        range.start,
        range.end,
        range.base,
        (range.end - range.start) / 1024
    );
    Ok(range)
}

/// Find all mappings of `binary_path` in maps-formatted text.
///
/// Returns the range from the minimum start to the maximum end address, with
/// `base` taken from the mapping at file offset 0 (the lowest start if none is).
#[must_use]
pub fn parse_memory_maps(maps: &str, binary_path: &str) -> Option<MemoryRange> {
    let mut start_addr: Option<u64> = None;
    let mut end_addr: Option<u64> = None;
    let mut base_addr: Option<u64> = None;

    for line in maps.lines() {
        // "start-end perms offset dev inode pathname"
        let mut parts = line.split_whitespace();
        let (Some(range), Some(_perms), Some(offset), Some(_dev), Some(_inode)) =
            (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        // Pathnames may contain spaces; a replaced binary gets " (deleted)" appended
        let pathname = parts.collect::<Vec<_>>().join(" ");
        if pathname.trim_end_matches(" (deleted)") != binary_path {
            continue;
        }

        let Some((start, end)) = range.split_once('-') else {
            continue;
        };
        let (Ok(start), Ok(end), Ok(offset)) = (
            u64::from_str_radix(start, 16),
            u64::from_str_radix(end, 16),
            u64::from_str_radix(offset, 16),
        ) else {
            continue;
        };

        start_addr = Some(start_addr.map_or(start, |s| s.min(start)));
        end_addr = Some(end_addr.map_or(end, |e| e.max(end)));
        if offset == 0 {
            base_addr = Some(base_addr.map_or(start, |b| b.min(start)));
        }
    }

    match (start_addr, end_addr) {
        (Some(start), Some(end)) => Some(MemoryRange { start, end, base: base_addr.unwrap_or(start) }),
        _ => None,
    }
}
