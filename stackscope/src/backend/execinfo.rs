//! POSIX unwinder backend (`backtrace(3)` from `<execinfo.h>`).
//!
//! No debug info is read: addresses resolve to dynamic symbol names only.

#![allow(unsafe_code)] // backtrace() requires unsafe

use libc::{c_int, c_void};
use stackscope_common::{Address, SymbolRecord, INITIAL_BUFFER_FRAMES, SKIP_ENTRY_FRAMES};

use super::{resolve_name_only, Backend};

extern "C" {
    fn backtrace(buffer: *mut *mut c_void, size: c_int) -> c_int;
}

/// `capture` itself is the first entry `backtrace(3)` reports.
const OWN_FRAMES: usize = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecinfoBackend;

impl Backend for ExecinfoBackend {
    fn name(&self) -> &'static str {
        "execinfo"
    }

    #[inline(never)]
    fn capture(&self, skip: usize) -> Vec<Address> {
        // backtrace() silently truncates; a completely full buffer is the only
        // hint that there might be more, so retry with twice the room.
        let mut buffer: Vec<*mut c_void> = vec![std::ptr::null_mut(); INITIAL_BUFFER_FRAMES];
        loop {
            let capacity = c_int::try_from(buffer.len()).unwrap_or(c_int::MAX);
            let elements = unsafe { backtrace(buffer.as_mut_ptr(), capacity) };
            let elements = usize::try_from(elements).unwrap_or(0);

            if elements < buffer.len() || capacity == c_int::MAX {
                buffer.truncate(elements);
                break;
            }
            buffer.resize(buffer.len() * 2, std::ptr::null_mut());
        }

        let front = OWN_FRAMES.saturating_add(skip);
        let mut frames: Vec<Address> =
            buffer.iter().skip(front).map(|&ip| Address(ip as usize)).collect();

        // libc entry frames at the least-recent end
        frames.truncate(frames.len().saturating_sub(SKIP_ENTRY_FRAMES));
        frames
    }

    fn resolve(&self, addr: Address) -> Vec<SymbolRecord> {
        resolve_name_only(addr)
    }
}
