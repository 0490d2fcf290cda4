//! Windows native backend (`RtlCaptureStackBackTrace`).

#![allow(unsafe_code)] // RtlCaptureStackBackTrace() requires unsafe

use std::ffi::c_void;

use stackscope_common::{Address, SymbolRecord, NATIVE_MAX_FRAMES};
use windows_sys::Win32::System::Diagnostics::Debug::RtlCaptureStackBackTrace;

use super::{resolve_name_only, Backend};

/// `capture` itself is the first frame the walk would report.
const OWN_FRAMES: usize = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl Backend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    #[inline(never)]
    fn capture(&self, skip: usize) -> Vec<Address> {
        let mut buffer = [std::ptr::null_mut::<c_void>(); NATIVE_MAX_FRAMES];
        let frames_to_skip = u32::try_from(OWN_FRAMES.saturating_add(skip)).unwrap_or(u32::MAX);

        #[allow(clippy::cast_possible_truncation)] // NATIVE_MAX_FRAMES is 64
        let count = unsafe {
            RtlCaptureStackBackTrace(
                frames_to_skip,
                NATIVE_MAX_FRAMES as u32,
                buffer.as_mut_ptr(),
                std::ptr::null_mut(),
            )
        };

        let count = usize::from(count).min(NATIVE_MAX_FRAMES);
        buffer[..count].iter().map(|&ip| Address(ip as usize)).collect()
    }

    fn resolve(&self, addr: Address) -> Vec<SymbolRecord> {
        resolve_name_only(addr)
    }
}
