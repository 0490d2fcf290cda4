//! Deterministic backend for analyzer tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use stackscope::{Address, Backend, SymbolRecord};

/// Replays pre-recorded captures and resolves from a fixed table.
///
/// Clones share the capture queue, so the fresh capture taken by
/// `trim_to_current_stack_frame` is the next scripted one.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    captures: Arc<Mutex<VecDeque<Vec<Address>>>>,
    records: Arc<HashMap<Address, Vec<SymbolRecord>>>,
}

impl ScriptedBackend {
    pub fn new<I>(captures: I) -> Self
    where
        I: IntoIterator<Item = Vec<usize>>,
    {
        let captures = captures
            .into_iter()
            .map(|raw| raw.into_iter().map(Address).collect())
            .collect();
        Self { captures: Arc::new(Mutex::new(captures)), records: Arc::default() }
    }

    /// Resolve `addr` to `functions` (innermost inlined frame first).
    pub fn with_records(mut self, addr: usize, functions: &[&str]) -> Self {
        let records = functions
            .iter()
            .map(|function| SymbolRecord::name_only(Address(addr), (*function).to_string()))
            .collect();
        Arc::make_mut(&mut self.records).insert(Address(addr), records);
        self
    }

    pub fn remaining_captures(&self) -> usize {
        self.captures.lock().unwrap().len()
    }
}

impl Backend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capture(&self, _skip: usize) -> Vec<Address> {
        self.captures.lock().unwrap().pop_front().unwrap_or_default()
    }

    fn resolve(&self, addr: Address) -> Vec<SymbolRecord> {
        self.records.get(&addr).cloned().unwrap_or_else(|| {
            vec![SymbolRecord::name_only(addr, format!("fn_{addr:x}"))]
        })
    }
}

pub fn functions(records: &[SymbolRecord]) -> Vec<&str> {
    records.iter().map(|r| r.function.as_str()).collect()
}
