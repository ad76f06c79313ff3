//! A developer console that writes to caller-supplied sinks.
//!
//! [`Console`] exposes the familiar console surface (`log`, `error`, `warn`,
//! `group`, `count`, `time`, `dir`, `assert`, ...) but routes every formatted
//! line to one of two [`Sink`]s instead of a terminal, which makes it usable
//! inside hosts that have no terminal of their own.
//!
//! # Layers
//!
//! - **Sinks** ([`sink`]): byte or text destinations, plus default adapters
//!   that forward to the host's own console.
//! - **Session state** ([`state`]): counters, timer start-marks and group
//!   indentation, private to each console.
//! - **Method table** ([`methods`]): maps the many console method names onto a
//!   handful of primitives, resolved once per console.
//! - **Formatter** ([`format`]): printf-style templates, space-joined
//!   inspection, per-line indentation.
//!
//! ```
//! use hostconsole::{BufferSink, Console, args, shared};
//!
//! let out = BufferSink::new(16);
//! let mut console = Console::from_sink(shared(out.clone()), None);
//! console.group(&args!["request"]).unwrap();
//! console.log(&args!["%s=%d", "status", 200]).unwrap();
//! console.group_end();
//!
//! assert_eq!(out.contents(), "request\n  status=200\n");
//! ```

pub mod buffer;
pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod format;
pub mod global;
pub mod methods;
pub mod sink;
pub mod state;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::ConsoleConfig;
pub use console::{Console, ConsoleOptions, DEFAULT_LABEL};
pub use error::ConsoleError;
pub use methods::{Method, MethodTable, Primitive};
pub use sink::{
    BufferSink, Encoding, HostConsole, HostSink, HostStream, HostTrim, SharedSink, Sink,
    StdioHost, TracingHost, WriteSink, shared,
};
pub use state::Session;

pub use hostconsole_inspect::{
    DefaultInspector, Depth, ErrorValue, InspectOptions, Inspector, Value, inspect,
};

/// Builds an array of [`Value`]s for console calls.
///
/// ```
/// let args = hostconsole::args!["total", 3, true];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Value::from($arg)),*]
    };
}
