//! Stack capture, resolution and trimming
//!
//! [`StackAnalyzer`] is the one type callers need: create it where an error is
//! raised, [`analyze`](StackAnalyzer::analyze) once, optionally trim it
//! against the handler's stack, then read it back as [`SymbolRecord`]s.

use log::trace;
use stackscope_common::{Address, SymbolRecord, BASE_SKIP_FRAMES};

use crate::backend::{Backend, DefaultBackend};

/// Something that can be rendered as a trace.
///
/// Error types hold a `Box<dyn Backtrace>` without caring which backend
/// produced it.
pub trait Backtrace {
    /// Push every record to `cb`, most recent call first unless `reversed`.
    fn get_symbols(&self, cb: &mut dyn FnMut(&SymbolRecord), reversed: bool);

    /// Drop the frames shared with the stack of the caller.
    fn trim_to_current_stack_frame(&mut self);
}

/// Call stack of one point in time, as raw addresses.
///
/// Addresses are stored most recent call first. Resolution happens lazily,
/// on every [`symbols`](Self::symbols) / [`get_symbols`](Self::get_symbols)
/// call, and is never cached on the analyzer.
#[derive(Debug, Clone, Default)]
pub struct StackAnalyzer<B = DefaultBackend> {
    stack_addrs: Vec<Address>,
    backend: B,
}

impl StackAnalyzer {
    /// Create an empty analyzer on the build's default backend
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(DefaultBackend::default())
    }
}

impl<B: Backend> StackAnalyzer<B> {
    /// Create an empty analyzer on an explicit backend
    pub fn with_backend(backend: B) -> Self {
        Self { stack_addrs: Vec::new(), backend }
    }

    /// Capture the current call stack, replacing any previous capture.
    ///
    /// The trace starts at the caller of `analyze`.
    #[inline(never)]
    pub fn analyze(&mut self) {
        self.stack_addrs = self.backend.capture(BASE_SKIP_FRAMES);
        trace!("[{}] captured {} frames", self.backend.name(), self.stack_addrs.len());
    }

    /// Captured addresses, most recent call first
    #[must_use]
    pub fn stack_addrs(&self) -> &[Address] {
        &self.stack_addrs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack_addrs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack_addrs.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolve the captured stack lazily.
    ///
    /// Forward order is capture order (most recent call first). `reversed`
    /// yields exactly the reverse of the forward sequence, including the
    /// inlined records of a single address.
    pub fn symbols(&self, reversed: bool) -> impl Iterator<Item = SymbolRecord> + '_ {
        let backend = &self.backend;

        let forward = (!reversed)
            .then(|| self.stack_addrs.iter().flat_map(move |&addr| backend.resolve(addr)));
        let backward = reversed.then(|| {
            self.stack_addrs
                .iter()
                .rev()
                .flat_map(move |&addr| backend.resolve(addr).into_iter().rev())
        });

        forward.into_iter().flatten().chain(backward.into_iter().flatten())
    }

    /// Push form of [`symbols`](Self::symbols).
    pub fn get_symbols<F>(&self, mut cb: F, reversed: bool)
    where
        F: FnMut(&SymbolRecord),
    {
        for record in self.symbols(reversed) {
            cb(&record);
        }
    }

    /// Pop the shared least-recent frames of this stack and `other`.
    ///
    /// Returns the number of frames removed from this stack.
    pub fn trim_common_suffix(&mut self, other: &[Address]) -> usize {
        let common = self
            .stack_addrs
            .iter()
            .rev()
            .zip(other.iter().rev())
            .take_while(|(ours, theirs)| ours == theirs)
            .count();

        self.stack_addrs.truncate(self.stack_addrs.len() - common);
        common
    }

    /// Capture the stack of the caller and trim the ancestry both share.
    ///
    /// What remains are the frames unique to where this stack was captured.
    /// May leave the stack empty.
    #[inline(never)]
    pub fn trim_to_current_stack_frame(&mut self)
    where
        B: Clone,
    {
        let mut current = Self::with_backend(self.backend.clone());
        current.analyze();

        let removed = self.trim_common_suffix(&current.stack_addrs);
        trace!("[{}] trimmed {removed} shared frames", self.backend.name());
    }
}

impl<B: Backend + Clone> Backtrace for StackAnalyzer<B> {
    fn get_symbols(&self, cb: &mut dyn FnMut(&SymbolRecord), reversed: bool) {
        StackAnalyzer::get_symbols(self, cb, reversed);
    }

    fn trim_to_current_stack_frame(&mut self) {
        StackAnalyzer::trim_to_current_stack_frame(self);
    }
}
