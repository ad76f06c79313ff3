//! End-to-end behaviour of the console surface.

use std::sync::Arc;
use std::time::Duration;

use hostconsole::{
    BufferSink, Console, ConsoleConfig, ConsoleError, ConsoleOptions, ManualClock, Value, args,
    shared,
};

fn console() -> (Console, BufferSink, BufferSink) {
    let out = BufferSink::new(256);
    let err = BufferSink::new(256);
    let console = Console::from_sink(shared(out.clone()), Some(shared(err.clone())));
    (console, out, err)
}

#[test]
fn count_reports_number_of_calls() {
    for label in ["default", "requests", "with space", ""] {
        let (mut console, out, _) = console();
        for _ in 0..5 {
            console.count(label).unwrap();
        }
        let lines = out.lines();
        assert_eq!(lines.first().map(String::as_str), Some(format!("{label}: 1").as_str()));
        assert_eq!(lines.last().map(String::as_str), Some(format!("{label}: 5").as_str()));
    }
}

#[test]
fn count_reset_lifecycle() {
    let (mut console, out, _) = console();

    let err = console.count_reset("jobs").unwrap_err();
    assert!(matches!(err, ConsoleError::CounterNotFound(_)));
    assert_eq!(err.to_string(), "Counter \"jobs\" doesn’t exist.");
    assert!(out.is_empty());

    console.count("jobs").unwrap();
    console.count("jobs").unwrap();
    console.count_reset("jobs").unwrap();
    console.count("jobs").unwrap();
    assert_eq!(out.lines().last().map(String::as_str), Some("jobs: 1"));
}

#[test]
fn matched_group_restores_indentation() {
    let (mut console, out, _) = console();
    console.log(&args!["before"]).unwrap();
    console.group(&[]).unwrap();
    console.group_end();
    console.log(&args!["after"]).unwrap();

    assert_eq!(out.lines(), vec!["before", "after"]);
    assert_eq!(console.indentation(), 0);
}

#[test]
fn nested_groups_indent_every_physical_line() {
    let unit = 3;
    let out = BufferSink::new(64);
    let mut console = Console::from_options(
        ConsoleOptions::new()
            .with_stdout(shared(out.clone()))
            .with_config(ConsoleConfig::default().with_group_indentation(unit)),
    )
    .unwrap();

    for depth in 1..=3 {
        console.group(&[]).unwrap();
        console.log(&args!["first\nsecond"]).unwrap();
        let pad = " ".repeat(depth * unit);
        let lines = out.lines();
        assert_eq!(lines[lines.len() - 2], format!("{pad}first"));
        assert_eq!(lines[lines.len() - 1], format!("{pad}second"));
    }
}

#[test]
fn printf_and_join_paths() {
    let (mut console, out, _) = console();
    console.log(&args!["%s=%d", "x", 5]).unwrap();
    console
        .log(&["a".into(), Value::object([("b", 1.into())])])
        .unwrap();
    console.log(&[]).unwrap();

    assert_eq!(out.contents(), "x=5\na { b: 1 }\n\n");
}

#[test]
fn time_end_twice_logs_unset_timer_second() {
    let clock = Arc::new(ManualClock::new());
    let out = BufferSink::new(16);
    let mut console = Console::from_options(
        ConsoleOptions::new()
            .with_stdout(shared(out.clone()))
            .with_clock(clock.clone()),
    )
    .unwrap();

    console.time("build");
    clock.advance(Duration::from_millis(42));
    console.time_end("build").unwrap();
    console.time_end("build").unwrap();

    assert_eq!(out.lines(), vec!["build: 0.042s", "build: NaNs"]);
}

#[test]
fn assert_polarity() {
    let (mut console, out, err) = console();
    console.assert(false, &args!["oops"]).unwrap();
    console.assert(true, &args!["oops"]).unwrap();

    assert_eq!(err.contents(), "oops\n");
    assert!(out.is_empty());
}

#[test]
fn instances_do_not_share_state() {
    let (mut first, first_out, _) = console();
    let (mut second, second_out, _) = console();

    first.count("x").unwrap();
    first.group(&[]).unwrap();
    second.count("x").unwrap();
    second.log(&args!["flat"]).unwrap();

    assert_eq!(first_out.lines(), vec!["x: 1"]);
    assert_eq!(second_out.lines(), vec!["x: 1", "flat"]);
}
