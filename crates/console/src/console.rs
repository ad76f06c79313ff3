//! The console: method dispatch, session bookkeeping and sink routing.

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use hostconsole_inspect::{DefaultInspector, ErrorValue, InspectOptions, Inspector, Value};

use crate::clock::{Clock, MonotonicClock};
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::format;
use crate::methods::{Handler, Method, MethodTable, Primitive};
use crate::sink::{HostConsole, HostSink, HostStream, SharedSink, StdioHost, shared};
use crate::state::Session;

/// Label used when a counter or timer method gets none.
pub const DEFAULT_LABEL: &str = "default";

/// Construction options for [`Console::from_options`].
///
/// Missing sinks are replaced by [`HostSink`]s on `host` (standard streams by
/// default). A missing `stderr` falls back to `stdout` when that was given.
#[derive(Default)]
pub struct ConsoleOptions {
    pub stdout: Option<SharedSink>,
    pub stderr: Option<SharedSink>,
    pub inspector: Option<Arc<dyn Inspector>>,
    pub clock: Option<Arc<dyn Clock>>,
    pub host: Option<Arc<dyn HostConsole>>,
    pub config: ConsoleConfig,
}

impl ConsoleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stdout(mut self, sink: SharedSink) -> Self {
        self.stdout = Some(sink);
        self
    }

    pub fn with_stderr(mut self, sink: SharedSink) -> Self {
        self.stderr = Some(sink);
        self
    }

    pub fn with_inspector(mut self, inspector: Arc<dyn Inspector>) -> Self {
        self.inspector = Some(inspector);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_host(mut self, host: Arc<dyn HostConsole>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_config(mut self, config: ConsoleConfig) -> Self {
        self.config = config;
        self
    }
}

/// A developer console writing to caller-supplied sinks.
///
/// Every method takes `&mut self`: session state is private to the instance
/// and callers serialise access themselves (see [`crate::global`] for a
/// shared instance).
pub struct Console {
    stdout: SharedSink,
    stderr: SharedSink,
    inspector: Arc<dyn Inspector>,
    clock: Arc<dyn Clock>,
    config: ConsoleConfig,
    methods: MethodTable,
    session: Session,
}

impl Console {
    /// Console writing to `stdout`, and to `stderr` if given or `stdout`
    /// otherwise, with default configuration.
    pub fn from_sink(stdout: SharedSink, stderr: Option<SharedSink>) -> Self {
        let stderr = stderr.unwrap_or_else(|| Arc::clone(&stdout));
        Self::assemble(
            stdout,
            stderr,
            Arc::new(DefaultInspector),
            Arc::new(MonotonicClock::new()),
            ConsoleConfig::default(),
            MethodTable::default(),
        )
    }

    /// Console on the process's standard streams with default configuration.
    pub fn stdio() -> Self {
        Self::from_sink(shared(HostSink::stdout()), Some(shared(HostSink::stderr())))
    }

    /// Console built from options. Fails on invalid configuration.
    pub fn from_options(options: ConsoleOptions) -> Result<Self, ConsoleError> {
        let ConsoleOptions {
            stdout,
            stderr,
            inspector,
            clock,
            host,
            config,
        } = options;

        config.validate()?;
        let methods = MethodTable::build(
            config
                .aliases
                .iter()
                .map(|(name, primitive)| (name.as_str(), *primitive)),
        )?;

        let host = host.unwrap_or_else(|| Arc::new(StdioHost));
        let stderr = match (stderr, &stdout) {
            (Some(sink), _) => sink,
            (None, Some(out)) => Arc::clone(out),
            (None, None) => shared(HostSink::new(
                Arc::clone(&host),
                HostStream::Err,
                config.host_trim,
            )),
        };
        let stdout = stdout.unwrap_or_else(|| {
            shared(HostSink::new(host, HostStream::Out, config.host_trim))
        });

        Ok(Self::assemble(
            stdout,
            stderr,
            inspector.unwrap_or_else(|| Arc::new(DefaultInspector)),
            clock.unwrap_or_else(|| Arc::new(MonotonicClock::new())),
            config,
            methods,
        ))
    }

    fn assemble(
        stdout: SharedSink,
        stderr: SharedSink,
        inspector: Arc<dyn Inspector>,
        clock: Arc<dyn Clock>,
        config: ConsoleConfig,
        methods: MethodTable,
    ) -> Self {
        tracing::debug!(
            group_indentation = config.group_indentation,
            ignore_errors = config.ignore_errors,
            shared_sink = Arc::ptr_eq(&stdout, &stderr),
            "console created"
        );
        Self {
            session: Session::new(config.group_indentation),
            stdout,
            stderr,
            inspector,
            clock,
            config,
            methods,
        }
    }

    /// Invokes a method with host argument conventions: labels are the first
    /// argument coerced to a string, `assert` tests the first argument's
    /// truthiness, `dir` inspects the first argument with the second as
    /// options.
    pub fn call(&mut self, method: Method, args: &[Value]) -> Result<(), ConsoleError> {
        let rest = args.get(1..).unwrap_or_default();
        match self.methods.resolve(method) {
            Handler::Primitive(Primitive::Log) => self.write_line(HostStream::Out, args),
            Handler::Primitive(Primitive::Error) => self.write_line(HostStream::Err, args),
            Handler::Primitive(Primitive::Group) => self.open_group(args),
            Handler::Primitive(Primitive::Empty) => Ok(()),
            Handler::Trace => self.trace(args),
            Handler::Dir => {
                let value = args.first().unwrap_or(&Value::Undefined);
                let options = args.get(1).and_then(dir_options);
                self.dir(value, options.as_ref())
            }
            Handler::Assert => {
                let condition = args.first().is_some_and(Value::is_truthy);
                self.assert(condition, rest)
            }
            Handler::Clear => self.clear(),
            Handler::Count => self.count(&label(args)),
            Handler::CountReset => self.count_reset(&label(args)),
            Handler::Time => {
                self.time(&label(args));
                Ok(())
            }
            Handler::TimeLog => self.time_log(&label(args), rest),
            Handler::TimeEnd => self.time_end(&label(args)),
            Handler::GroupEnd => {
                self.group_end();
                Ok(())
            }
        }
    }

    /// [`Console::call`] with a host method name such as `"groupEnd"`.
    pub fn call_by_name(&mut self, name: &str, args: &[Value]) -> Result<(), ConsoleError> {
        let method: Method = name.parse()?;
        self.call(method, args)
    }

    /// Formats `args` and writes them to `stdout`.
    pub fn log(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.write_line(HostStream::Out, args)
    }

    /// Formats `args` and writes them to `stderr`.
    pub fn error(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.write_line(HostStream::Err, args)
    }

    pub fn info(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::Info, args)
    }

    pub fn warn(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::Warn, args)
    }

    pub fn debug(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::Debug, args)
    }

    pub fn dirxml(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::Dirxml, args)
    }

    pub fn table(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::Table, args)
    }

    /// Writes `Trace: <message>` to `stderr`.
    pub fn trace(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        let message = format::format_args(args, self.inspector.as_ref(), &self.config.inspect_options);
        let trace = ErrorValue::new("Trace", message);
        self.write_line(HostStream::Err, &[Value::Error(trace)])
    }

    /// Writes `message` to `stderr` when `condition` is false; with no
    /// message, writes `Assertion failed`.
    pub fn assert(&mut self, condition: bool, message: &[Value]) -> Result<(), ConsoleError> {
        if condition {
            return Ok(());
        }
        if message.is_empty() {
            return self.write_line(HostStream::Err, &[Value::from("Assertion failed")]);
        }
        self.write_line(HostStream::Err, message)
    }

    /// Inspects `value` with `options` merged over the instance defaults and
    /// logs the result.
    pub fn dir(&mut self, value: &Value, options: Option<&InspectOptions>) -> Result<(), ConsoleError> {
        let options = match options {
            Some(call) => self.config.inspect_options.merged(call),
            None => self.config.inspect_options.clone(),
        };
        let text = self.inspector.inspect(value, &options);
        self.write_line(HostStream::Out, &[Value::String(text)])
    }

    /// Clears `stdout` if the sink supports it.
    pub fn clear(&mut self) -> Result<(), ConsoleError> {
        let result = self
            .stdout
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.settle(result)
    }

    /// Increments `label` and logs `<label>: <count>`.
    pub fn count(&mut self, label: &str) -> Result<(), ConsoleError> {
        let count = self.session.count(label);
        self.write_line(HostStream::Out, &[Value::String(format!("{label}: {count}"))])
    }

    /// Resets an existing counter and logs `<label>: 0`.
    pub fn count_reset(&mut self, label: &str) -> Result<(), ConsoleError> {
        self.session.count_reset(label).inspect_err(|e| {
            tracing::debug!(label, error = %e, "countReset on unknown counter");
        })?;
        self.write_line(HostStream::Out, &[Value::String(format!("{label}: 0"))])
    }

    /// Starts (or restarts) the timer `label`.
    pub fn time(&mut self, label: &str) {
        if self.session.start_timer(label, self.clock.now()) {
            tracing::debug!(label, "timer restarted");
        }
    }

    /// Logs `<label>: <seconds>s` followed by `data`.
    ///
    /// A timer that is not running logs `<label>: NaNs` and warns.
    pub fn time_log(&mut self, label: &str, data: &[Value]) -> Result<(), ConsoleError> {
        let elapsed = match self.session.elapsed(label, self.clock.now()) {
            Some(elapsed) => fixed_seconds(elapsed),
            None => {
                tracing::warn!(label, "timer read before it was started");
                "NaNs".to_owned()
            }
        };

        let mut args = Vec::with_capacity(data.len() + 3);
        args.push(Value::from("%s: %s"));
        args.push(Value::from(label));
        args.push(Value::String(elapsed));
        args.extend_from_slice(data);
        self.write_line(HostStream::Out, &args)
    }

    /// Logs the timer like [`Console::time_log`], then stops it.
    pub fn time_end(&mut self, label: &str) -> Result<(), ConsoleError> {
        let result = self.time_log(label, &[]);
        self.session.end_timer(label);
        result
    }

    /// Logs `args`, if any, then indents subsequent output by one level.
    pub fn group(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.open_group(args)
    }

    pub fn group_collapsed(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::GroupCollapsed, args)
    }

    /// Removes one level of indentation.
    pub fn group_end(&mut self) {
        self.session.exit_group();
    }

    pub fn profile(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::Profile, args)
    }

    pub fn profile_end(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::ProfileEnd, args)
    }

    pub fn time_stamp(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::TimeStamp, args)
    }

    pub fn create_task(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        self.call(Method::CreateTask, args)
    }

    /// Current left padding in spaces.
    pub fn indentation(&self) -> usize {
        self.session.padding()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn inspect_options(&self) -> &InspectOptions {
        &self.config.inspect_options
    }

    fn open_group(&mut self, args: &[Value]) -> Result<(), ConsoleError> {
        let result = if args.is_empty() {
            Ok(())
        } else {
            self.write_line(HostStream::Out, args)
        };
        self.session.enter_group();
        result
    }

    fn write_line(&mut self, stream: HostStream, args: &[Value]) -> Result<(), ConsoleError> {
        let text = format::format_args(args, self.inspector.as_ref(), &self.config.inspect_options);
        let line = format::indent_lines(&text, self.session.padding());

        let sink = match stream {
            HostStream::Out => &self.stdout,
            HostStream::Err => &self.stderr,
        };
        let result = sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write(&line, self.config.encoding);
        self.settle(result)
    }

    fn settle(&self, result: std::io::Result<()>) -> Result<(), ConsoleError> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if self.config.ignore_errors => {
                tracing::warn!(error = %e, "console sink error ignored");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn label(args: &[Value]) -> String {
    match args.first() {
        None | Some(Value::Undefined) => DEFAULT_LABEL.to_owned(),
        Some(value) => value.to_display_string(),
    }
}

/// Per-call `dir` overrides. Anything but an object carries none, and an
/// object that does not describe valid options is ignored with a warning.
fn dir_options(value: &Value) -> Option<InspectOptions> {
    if !matches!(value, Value::Object(_)) {
        return None;
    }
    let json = value.to_json()?;
    serde_json::from_value(json)
        .inspect_err(|e| tracing::warn!(error = %e, "ignoring invalid dir options"))
        .ok()
}

/// Seconds with three decimals, rounding half-millisecond ties up.
fn fixed_seconds(elapsed: Duration) -> String {
    let millis = (elapsed.as_nanos() + 500_000) / 1_000_000;
    format!("{}.{:03}s", millis / 1000, millis % 1000)
}
