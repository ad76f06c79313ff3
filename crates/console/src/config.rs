//! Console configuration.
//!
//! [`ConsoleConfig`] is plain serde data so hosts can load it from whatever
//! file format they already use. Keys are camelCase, matching the option
//! names of the familiar console constructor (`inspectOptions`,
//! `groupIndentation`, `ignoreErrors`).

use std::collections::BTreeMap;

use hostconsole_inspect::InspectOptions;
use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;
use crate::methods::Primitive;
use crate::sink::{Encoding, HostTrim};

/// Spaces added per `group` level by default.
pub const DEFAULT_GROUP_INDENTATION: usize = 2;

/// Largest accepted `groupIndentation`.
pub const MAX_GROUP_INDENTATION: usize = 1000;

/// Behaviour of a console instance, independent of its sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleConfig {
    /// Instance defaults for inspection; `dir` merges per-call options over them.
    pub inspect_options: InspectOptions,

    /// Spaces per group level.
    pub group_indentation: usize,

    /// Report sink write failures through `tracing` instead of returning them.
    pub ignore_errors: bool,

    /// How default host sinks strip formatted chunks.
    pub host_trim: HostTrim,

    /// Encoding handed to sinks with every chunk.
    pub encoding: Encoding,

    /// Alias overrides, e.g. `warn = "error"`.
    pub aliases: BTreeMap<String, Primitive>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            inspect_options: InspectOptions::default(),
            group_indentation: DEFAULT_GROUP_INDENTATION,
            ignore_errors: true,
            host_trim: HostTrim::default(),
            encoding: Encoding::default(),
            aliases: BTreeMap::new(),
        }
    }
}

impl ConsoleConfig {
    /// Checks value ranges. Alias names are checked when the method table is
    /// built.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        if !(1..=MAX_GROUP_INDENTATION).contains(&self.group_indentation) {
            return Err(ConsoleError::InvalidConfig(format!(
                "groupIndentation must be between 1 and {MAX_GROUP_INDENTATION}, got {}",
                self.group_indentation
            )));
        }
        Ok(())
    }

    pub fn with_group_indentation(mut self, spaces: usize) -> Self {
        self.group_indentation = spaces;
        self
    }

    pub fn with_inspect_options(mut self, options: InspectOptions) -> Self {
        self.inspect_options = options;
        self
    }

    pub fn with_ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    pub fn with_host_trim(mut self, trim: HostTrim) -> Self {
        self.host_trim = trim;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_alias(mut self, method: impl Into<String>, primitive: Primitive) -> Self {
        self.aliases.insert(method.into(), primitive);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostconsole_inspect::Depth;

    #[test]
    fn default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.group_indentation, 2);
        assert!(config.ignore_errors);
        assert_eq!(config.host_trim, HostTrim::StripNewline);
        assert_eq!(config.encoding, Encoding::Utf8);
        assert!(config.aliases.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn deserialize_partial() {
        let config: ConsoleConfig = serde_json::from_str(
            r#"{
                "groupIndentation": 4,
                "inspectOptions": { "depth": 0 },
                "hostTrim": "trim",
                "aliases": { "warn": "error" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.group_indentation, 4);
        assert_eq!(config.inspect_options.depth(), Depth::Limited(0));
        assert_eq!(config.host_trim, HostTrim::Trim);
        assert_eq!(config.aliases.get("warn"), Some(&Primitive::Error));
        assert!(config.ignore_errors);
    }

    #[test]
    fn group_indentation_range() {
        assert!(ConsoleConfig::default().with_group_indentation(0).validate().is_err());
        assert!(
            ConsoleConfig::default()
                .with_group_indentation(MAX_GROUP_INDENTATION + 1)
                .validate()
                .is_err()
        );
        ConsoleConfig::default()
            .with_group_indentation(MAX_GROUP_INDENTATION)
            .validate()
            .unwrap();
    }

    #[test]
    fn instance_null_depth_is_unlimited() {
        let config: ConsoleConfig =
            serde_json::from_str(r#"{"inspectOptions":{"depth":null}}"#).unwrap();
        assert_eq!(config.inspect_options.depth(), Depth::Infinite);
    }
}
