mod common;

use common::{functions, ScriptedBackend};
use stackscope::{Address, Backtrace, StackAnalyzer, SymbolRecord, Traceback};

fn collect(analyzer: &StackAnalyzer<ScriptedBackend>, reversed: bool) -> Vec<SymbolRecord> {
    let mut out = Vec::new();
    analyzer.get_symbols(|record| out.push(record.clone()), reversed);
    out
}

#[test]
fn test_fresh_analyzer_yields_nothing() {
    let analyzer = StackAnalyzer::with_backend(ScriptedBackend::default());
    assert!(analyzer.is_empty());
    assert!(collect(&analyzer, false).is_empty());
    assert!(collect(&analyzer, true).is_empty());
}

#[test]
fn test_reversed_is_exact_reverse_with_inlining() {
    let backend = ScriptedBackend::new([vec![0x10, 0x20, 0x30]])
        .with_records(0x20, &["inlined_inner", "inlined_outer"])
        .with_records(0x30, &[]);
    let mut analyzer = StackAnalyzer::with_backend(backend);
    analyzer.analyze();

    let forward = collect(&analyzer, false);
    let mut backward = collect(&analyzer, true);
    assert_eq!(functions(&forward), ["fn_10", "inlined_inner", "inlined_outer"]);

    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn test_iterator_matches_callback() {
    let mut analyzer = StackAnalyzer::with_backend(ScriptedBackend::new([vec![1, 2, 3, 4]]));
    analyzer.analyze();

    for reversed in [false, true] {
        let pulled: Vec<_> = analyzer.symbols(reversed).collect();
        assert_eq!(pulled, collect(&analyzer, reversed));
    }
}

#[test]
fn test_get_symbols_is_idempotent() {
    let mut analyzer = StackAnalyzer::with_backend(ScriptedBackend::new([vec![7, 8, 9]]));
    analyzer.analyze();

    assert_eq!(collect(&analyzer, false), collect(&analyzer, false));
    assert_eq!(collect(&analyzer, true), collect(&analyzer, true));
    assert_eq!(analyzer.stack_addrs(), [Address(7), Address(8), Address(9)]);
}

#[test]
fn test_analyze_replaces_previous_capture() {
    let backend = ScriptedBackend::new([vec![1, 2, 3], vec![4, 5]]);
    let mut analyzer = StackAnalyzer::with_backend(backend);

    analyzer.analyze();
    analyzer.analyze();
    assert_eq!(analyzer.stack_addrs(), [Address(4), Address(5)]);
}

#[test]
fn test_trim_removes_shared_frames() {
    // A B C D E captured deep, X D E is the handler's stack
    let backend = ScriptedBackend::new([vec![0xA, 0xB, 0xC, 0xD, 0xE], vec![0xF, 0xD, 0xE]]);
    let mut analyzer = StackAnalyzer::with_backend(backend.clone());
    analyzer.analyze();

    analyzer.trim_to_current_stack_frame();
    assert_eq!(analyzer.stack_addrs(), [Address(0xA), Address(0xB), Address(0xC)]);
    assert_eq!(backend.remaining_captures(), 0);
}

#[test]
fn test_trim_exactly_three_frames() {
    let backend = ScriptedBackend::new([vec![1, 2, 3, 4, 5, 6], vec![9, 4, 5, 6]]);
    let mut analyzer = StackAnalyzer::with_backend(backend);
    analyzer.analyze();

    assert_eq!(analyzer.trim_common_suffix(&[Address(9), Address(4), Address(5), Address(6)]), 3);
    assert_eq!(analyzer.len(), 3);
}

#[test]
fn test_trim_with_nothing_in_common_keeps_stack() {
    let backend = ScriptedBackend::new([vec![1, 2, 3], vec![4, 5, 6]]);
    let mut analyzer = StackAnalyzer::with_backend(backend);
    analyzer.analyze();

    analyzer.trim_to_current_stack_frame();
    assert_eq!(analyzer.len(), 3);
}

#[test]
fn test_trim_before_analyze_is_noop() {
    let mut analyzer = StackAnalyzer::with_backend(ScriptedBackend::new([vec![1, 2]]));
    analyzer.trim_to_current_stack_frame();
    assert!(analyzer.is_empty());
}

#[test]
fn test_trim_can_empty_the_stack() {
    let backend = ScriptedBackend::new([vec![2, 3], vec![1, 2, 3]]);
    let mut analyzer = StackAnalyzer::with_backend(backend);
    analyzer.analyze();

    analyzer.trim_to_current_stack_frame();
    assert!(analyzer.is_empty());
    assert!(collect(&analyzer, false).is_empty());
}

#[test]
fn test_boxed_backtrace_and_traceback() {
    let backend = ScriptedBackend::new([vec![0x1, 0x2, 0x3], vec![0x9, 0x3]])
        .with_records(0x1, &["raise_error"])
        .with_records(0x2, &["load_config"])
        .with_records(0x3, &["main"]);
    let mut analyzer = StackAnalyzer::with_backend(backend);
    analyzer.analyze();

    let mut trace: Box<dyn Backtrace> = Box::new(analyzer);
    trace.trim_to_current_stack_frame();

    assert_eq!(
        Traceback(trace.as_ref()).to_string(),
        "Traceback (most recent call last):\n -> load_config\n -> raise_error\n"
    );
}

#[inline(never)]
fn f() -> StackAnalyzer {
    let mut analyzer = StackAnalyzer::new();
    analyzer.analyze();
    std::hint::black_box(analyzer)
}

#[inline(never)]
fn driver() -> StackAnalyzer {
    std::hint::black_box(f())
}

#[test]
fn test_real_capture_starts_at_caller() {
    let analyzer = driver();
    assert!(!analyzer.is_empty());

    let first = analyzer.symbols(false).next().expect("at least one record");
    assert!(
        !first.function.ends_with("::analyze") && !first.function.contains("StackAnalyzer"),
        "first record: {first}"
    );

    #[cfg(feature = "debuginfo")]
    assert!(first.function.ends_with("::f"), "first record: {first}");
}

#[cfg(feature = "debuginfo")]
#[test]
fn test_real_capture_has_source_location() {
    let analyzer = driver();

    let first = analyzer.symbols(false).next().expect("at least one record");
    assert!(first.filename.ends_with("test_stack_analyzer.rs"), "first record: {first}");
    assert_ne!(first.lineno, 0, "first record: {first}");
}

#[cfg(feature = "debuginfo")]
#[test]
fn test_real_capture_driver_follows_callee() {
    let records: Vec<_> = driver().symbols(false).collect();
    let position = |suffix: &str| records.iter().position(|r| r.function.ends_with(suffix));

    let callee = position("::f").expect("f is resolved");
    let caller = position("::driver").expect("driver is resolved");
    assert!(caller > callee, "{records:#?}");
    assert!(position("test_real_capture_driver_follows_callee").is_some_and(|test| test > caller));
}

#[test]
fn test_real_records_carry_their_address() {
    let analyzer = driver();
    let addrs = analyzer.stack_addrs();

    for record in analyzer.symbols(false) {
        assert!(addrs.contains(&record.addr), "{record:?} not from this capture");
    }
}

#[test]
fn test_real_trim_keeps_frames_below_driver() {
    let mut analyzer = driver();
    let before = analyzer.len();

    analyzer.trim_to_current_stack_frame();
    assert!(analyzer.len() < before);
    assert!(!analyzer.is_empty());
}
