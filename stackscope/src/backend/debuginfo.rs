//! Debug-info library backend.
//!
//! Frames are walked with `backtrace::trace`; addresses resolve against the
//! DWARF info of the running executable (the process-wide `Symbolizer` on
//! Linux, `backtrace::resolve` elsewhere).

use stackscope_common::{Address, SymbolRecord};

use super::Backend;
use crate::symbolization::resolve_address;

#[derive(Debug, Clone, Copy, Default)]
pub struct DebugInfoBackend;

impl Backend for DebugInfoBackend {
    fn name(&self) -> &'static str {
        "debuginfo"
    }

    #[inline(never)]
    fn capture(&self, skip: usize) -> Vec<Address> {
        // The trace starts inside the unwinder; everything up to and including
        // this function's own frame is dropped.
        let marker = Self::capture as fn(&Self, usize) -> Vec<Address> as usize;

        let mut frames = Vec::new();
        let mut own_frames = None;
        backtrace::trace(|frame| {
            // Outermost frame reached
            if frame.ip().is_null() {
                return false;
            }
            frames.push(Address(frame.ip() as usize));
            if own_frames.is_none() && frame.symbol_address() as usize == marker {
                own_frames = Some(frames.len());
            }
            true
        });

        let start = own_frames.unwrap_or(0).saturating_add(skip).min(frames.len());
        frames.drain(..start);
        frames
    }

    fn resolve(&self, addr: Address) -> Vec<SymbolRecord> {
        resolve_address(addr)
    }
}
