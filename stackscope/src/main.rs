//! # stackscope - Demo Entry Point
//!
//! Captures its own stack from the bottom of a chain of `--depth` nested
//! calls, optionally trims it against `main`'s stack, and prints the resolved
//! records as text, as a traceback (`--reversed`) or as JSON (`--json`).

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use serde::Serialize;
use std::hint::black_box;
use std::io::Write;

use stackscope::cli::Args;
use stackscope::diagnostics::diagnostics;
use stackscope::{Backend, StackAnalyzer, SymbolRecord, Traceback};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    std::process::exit(match run(&args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_ERROR
        }
    });
}

/// JSON document written by `--json`.
#[derive(Serialize)]
struct TraceReport<'a> {
    backend: &'a str,
    reversed: bool,
    trimmed: bool,
    frames: usize,
    records: Vec<SymbolRecord>,
}

fn run(args: &Args) -> Result<()> {
    stackscope::init();

    let mut analyzer = nested(usize::from(args.depth));
    info!("[{}] captured {} frames", analyzer.backend().name(), analyzer.len());

    if args.trim {
        let before = analyzer.len();
        analyzer.trim_to_current_stack_frame();
        debug!("trimmed {} shared frames", before - analyzer.len());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let report = TraceReport {
            backend: analyzer.backend().name(),
            reversed: args.reversed,
            trimmed: args.trim,
            frames: analyzer.len(),
            records: analyzer.symbols(args.reversed).collect(),
        };
        serde_json::to_writer_pretty(&mut out, &report).context("failed to write JSON")?;
        writeln!(out)?;
    } else if args.reversed && !args.quiet {
        write!(out, "{}", Traceback(&analyzer)).context("failed to write traceback")?;
    } else {
        for record in analyzer.symbols(args.reversed) {
            writeln!(out, "{record}").context("failed to write record")?;
        }
    }

    if !args.quiet {
        let unresolved = analyzer.symbols(false).filter(SymbolRecord::is_unresolved).count();
        let diag = diagnostics();
        eprintln!(
            "{} frames, {unresolved} unresolved, {} resolved without debug info, {} resolver errors",
            analyzer.len(),
            diag.not_found(),
            diag.reported()
        );
    }

    Ok(())
}

/// Recurse `depth` times, then capture at the bottom.
#[inline(never)]
fn nested(depth: usize) -> StackAnalyzer {
    if depth == 0 {
        let mut analyzer = StackAnalyzer::new();
        analyzer.analyze();
        return black_box(analyzer);
    }
    black_box(nested(black_box(depth - 1)))
}
