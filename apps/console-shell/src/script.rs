//! JSON-lines console scripts.
//!
//! One call per line: `{"method": "log", "args": ["%s=%d", "x", 5]}`. Blank
//! lines and lines starting with `//` are skipped.

use std::io::BufRead;

use hostconsole::{Console, Value};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Call {
    method: String,
    #[serde(default)]
    args: Vec<serde_json::Value>,
}

/// Outcome of a script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Calls dispatched to the console.
    pub calls: usize,
    /// Malformed lines and calls that returned an error.
    pub failures: usize,
}

/// Replays every call in `source` against `console`.
///
/// Failures are logged with their line number and do not stop the run; only
/// read errors on `source` abort it.
pub fn run<R: BufRead>(console: &mut Console, source: R) -> std::io::Result<Summary> {
    let mut summary = Summary::default();

    for (idx, line) in source.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let call: Call = match serde_json::from_str(trimmed) {
            Ok(call) => call,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping malformed call");
                summary.failures += 1;
                continue;
            }
        };

        let args: Vec<Value> = call.args.into_iter().map(Value::from).collect();
        summary.calls += 1;
        if let Err(e) = console.call_by_name(&call.method, &args) {
            tracing::warn!(line = line_no, method = %call.method, error = %e, "console call failed");
            summary.failures += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use hostconsole::{BufferSink, shared};

    use super::*;

    fn run_script(script: &str) -> (Summary, BufferSink, BufferSink) {
        let out = BufferSink::new(64);
        let err = BufferSink::new(64);
        let mut console = Console::from_sink(shared(out.clone()), Some(shared(err.clone())));
        let summary = run(&mut console, script.as_bytes()).unwrap();
        (summary, out, err)
    }

    #[test]
    fn replays_calls_in_order() {
        let (summary, out, err) = run_script(
            r#"
// greeting
{"method": "log", "args": ["%s=%d", "x", 5]}
{"method": "group", "args": ["section"]}
{"method": "info", "args": [{"b": 1}, [1, 2]]}
{"method": "groupEnd"}
{"method": "count"}
{"method": "warn", "args": ["careful"]}
{"method": "error", "args": ["broken"]}
"#,
        );

        assert_eq!(summary, Summary { calls: 7, failures: 0 });
        assert_eq!(
            out.lines(),
            vec!["x=5", "section", "  { b: 1 } [ 1, 2 ]", "default: 1", "careful"]
        );
        assert_eq!(err.lines(), vec!["broken"]);
    }

    #[test]
    fn failures_do_not_stop_the_run() {
        let (summary, out, _) = run_script(
            r#"{"method": "countReset", "args": ["never"]}
not json
{"method": "shout"}
{"method": "log", "args": ["still here"]}
"#,
        );

        assert_eq!(summary, Summary { calls: 3, failures: 3 });
        assert_eq!(out.lines(), vec!["still here"]);
    }
}
