//! Diagnostic side channel for backend-internal failures.
//!
//! Nothing the resolvers hit is ever returned to the caller. Internal errors
//! (unreadable executable, malformed DWARF, ...) are logged here at warn level
//! together with their error code, and counted so tests and operators can tell
//! a degraded trace from a clean one. "No debug info" misses are part of the
//! normal fallback cascade: they are counted but not logged.

use log::warn;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::domain::BacktraceError;

/// Counts side-channel reports for the whole process.
pub struct Diagnostics {
    /// Messages already logged (to avoid one warning per frame for the same cause)
    warned: Mutex<HashSet<String>>,
    /// Internal errors reported
    reported: AtomicU64,
    /// Addresses that fell through to the fallback resolvers
    not_found: AtomicU64,
}

impl Diagnostics {
    /// Create a new diagnostics tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            warned: Mutex::new(HashSet::new()),
            reported: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
        }
    }

    /// Record one error, logging it unless it is the not-found condition.
    pub fn record(&self, err: &BacktraceError) {
        if err.is_not_found() {
            self.not_found.fetch_add(1, Ordering::Relaxed);
            return;
        }

        self.reported.fetch_add(1, Ordering::Relaxed);

        let message = err.to_string();
        if let Ok(mut warned) = self.warned.lock() {
            if !warned.insert(message.clone()) {
                return;
            }
        }
        warn!(target: "stackscope", "{message} (error code: {})", err.code());
    }

    /// Number of internal errors reported so far.
    pub fn reported(&self) -> u64 {
        self.reported.load(Ordering::Relaxed)
    }

    /// Number of addresses resolved through the fallback resolvers.
    pub fn not_found(&self) -> u64 {
        self.not_found.load(Ordering::Relaxed)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

/// Global diagnostics instance, initialized on first access.
static DIAGNOSTICS: OnceLock<Diagnostics> = OnceLock::new();

/// Get the global diagnostics tracker.
pub fn diagnostics() -> &'static Diagnostics {
    DIAGNOSTICS.get_or_init(Diagnostics::new)
}

/// Report an error through the process-wide side channel.
pub fn report(err: &BacktraceError) {
    diagnostics().record(err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackscope_common::Address;

    #[test]
    fn test_not_found_is_counted_separately() {
        let diag = Diagnostics::new();
        diag.record(&BacktraceError::NoDebugInfo(Address(0x10)));
        diag.record(&BacktraceError::NoDebugInfo(Address(0x20)));

        assert_eq!(diag.not_found(), 2);
        assert_eq!(diag.reported(), 0);
    }

    #[test]
    fn test_internal_errors_counted_even_when_deduplicated() {
        let diag = Diagnostics::new();
        let err = BacktraceError::NotMapped("app".to_string());
        diag.record(&err);
        diag.record(&err);

        assert_eq!(diag.reported(), 2);
        assert_eq!(diag.warned.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_global_report_increments() {
        let before = diagnostics().reported();
        report(&BacktraceError::NotMapped("global-test".to_string()));
        assert!(diagnostics().reported() > before);
    }
}
