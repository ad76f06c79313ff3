//! Per-console session state: counters, timer start-marks and group
//! indentation.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConsoleError;

/// Mutable state owned by one console.
///
/// `indent_depth` is signed: an unmatched `group_end` takes it below zero,
/// and only [`Session::padding`] clamps it for rendering. A later `group`
/// therefore has to climb back out before lines are indented again.
#[derive(Debug, Clone)]
pub struct Session {
    counters: HashMap<String, u64>,
    timers: HashMap<String, Duration>,
    indent_depth: i64,
    indent_unit: usize,
}

impl Session {
    /// Creates an empty session that indents by `indent_unit` spaces per group.
    pub fn new(indent_unit: usize) -> Self {
        Self {
            counters: HashMap::new(),
            timers: HashMap::new(),
            indent_depth: 0,
            indent_unit,
        }
    }

    /// Increments `label`, creating it at 1, and returns the new value.
    pub fn count(&mut self, label: &str) -> u64 {
        let counter = self.counters.entry(label.to_owned()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Resets an existing counter to 0.
    pub fn count_reset(&mut self, label: &str) -> Result<(), ConsoleError> {
        match self.counters.get_mut(label) {
            Some(counter) => {
                *counter = 0;
                Ok(())
            }
            None => Err(ConsoleError::CounterNotFound(label.to_owned())),
        }
    }

    pub fn counter(&self, label: &str) -> Option<u64> {
        self.counters.get(label).copied()
    }

    /// Records a start-mark, replacing any previous one. Returns `true` if a
    /// timer was already running under `label`.
    pub fn start_timer(&mut self, label: &str, now: Duration) -> bool {
        self.timers.insert(label.to_owned(), now).is_some()
    }

    /// Time since `label` was started, or `None` if it is not running.
    pub fn elapsed(&self, label: &str, now: Duration) -> Option<Duration> {
        self.timers
            .get(label)
            .map(|start| now.saturating_sub(*start))
    }

    /// Removes the start-mark. Returns `true` if one existed.
    pub fn end_timer(&mut self, label: &str) -> bool {
        self.timers.remove(label).is_some()
    }

    pub fn is_timing(&self, label: &str) -> bool {
        self.timers.contains_key(label)
    }

    pub fn enter_group(&mut self) {
        self.indent_depth = self.indent_depth.saturating_add(self.unit());
    }

    /// Leaves a group. Unmatched calls go negative; depth saturates at the
    /// `i64` bounds.
    pub fn exit_group(&mut self) {
        self.indent_depth = self.indent_depth.saturating_sub(self.unit());
        if self.indent_depth < 0 {
            tracing::debug!(depth = self.indent_depth, "groupEnd without matching group");
        }
    }

    pub fn indent_depth(&self) -> i64 {
        self.indent_depth
    }

    pub fn indent_unit(&self) -> usize {
        self.indent_unit
    }

    /// Spaces to put in front of each line.
    pub fn padding(&self) -> usize {
        usize::try_from(self.indent_depth).unwrap_or(0)
    }

    fn unit(&self) -> i64 {
        i64::try_from(self.indent_unit).unwrap_or(i64::MAX)
    }
}
