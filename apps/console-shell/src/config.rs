//! Shell configuration.
//!
//! Stored as TOML. Console options live under a `[console]` table using the
//! console's own camelCase keys:
//!
//! ```toml
//! host = "tracing"
//!
//! [console]
//! groupIndentation = 4
//!
//! [console.aliases]
//! warn = "error"
//! ```

use std::path::Path;
use std::sync::Arc;

use hostconsole::{
    Console, ConsoleConfig, ConsoleError, ConsoleOptions, HostConsole, StdioHost, TracingHost,
};
use serde::{Deserialize, Serialize};

/// Where default sinks send their output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    /// Process stdout/stderr.
    #[default]
    Stdio,
    /// `tracing` events on the `console` target.
    Tracing,
}

/// Shell configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub host: HostKind,
    pub console: ConsoleConfig,
}

impl ShellConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ShellConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), host = ?config.host, "configuration loaded");
        Ok(config)
    }

    /// Builds the console described by this configuration.
    pub fn build_console(&self) -> Result<Console, ConsoleError> {
        let host: Arc<dyn HostConsole> = match self.host {
            HostKind::Stdio => Arc::new(StdioHost),
            HostKind::Tracing => Arc::new(TracingHost),
        };
        Console::from_options(
            ConsoleOptions::new()
                .with_host(host)
                .with_config(self.console.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use hostconsole::{Depth, HostTrim, Primitive};

    use super::*;

    #[test]
    fn default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.host, HostKind::Stdio);
        assert_eq!(config.console, ConsoleConfig::default());
        config.build_console().unwrap();
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
host = "tracing"

[console]
groupIndentation = 4
hostTrim = "trim"

[console.inspectOptions]
depth = "infinite"

[console.aliases]
warn = "error"
"#
        )
        .unwrap();

        let config = ShellConfig::load(file.path()).unwrap();
        assert_eq!(config.host, HostKind::Tracing);
        assert_eq!(config.console.group_indentation, 4);
        assert_eq!(config.console.host_trim, HostTrim::Trim);
        assert_eq!(config.console.inspect_options.depth(), Depth::Infinite);
        assert_eq!(config.console.aliases.get("warn"), Some(&Primitive::Error));
        config.build_console().unwrap();
    }

    #[test]
    fn invalid_console_section_fails_to_build() {
        let config: ShellConfig = toml::from_str("[console]\ngroupIndentation = 0\n").unwrap();
        assert!(config.build_console().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ShellConfig::load(&dir.path().join("absent.toml")).is_err());
    }
}
