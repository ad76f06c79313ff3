//! Console method names and the per-instance dispatch table.
//!
//! Most console methods are aliases of one of four primitives: write to
//! `stdout`, write to `stderr`, open a group, or do nothing. The rest have
//! dedicated handlers. [`MethodTable::build`] resolves every [`Method`] to a
//! [`Handler`] once, when a console is constructed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;

/// Every public console method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Log,
    Error,
    Info,
    Warn,
    Debug,
    Trace,
    Dir,
    Dirxml,
    Table,
    Group,
    GroupEnd,
    GroupCollapsed,
    Assert,
    Clear,
    Count,
    CountReset,
    Time,
    TimeLog,
    TimeEnd,
    Profile,
    ProfileEnd,
    TimeStamp,
    CreateTask,
}

const METHOD_COUNT: usize = Method::ALL.len();

impl Method {
    pub const ALL: [Method; 23] = [
        Method::Log,
        Method::Error,
        Method::Info,
        Method::Warn,
        Method::Debug,
        Method::Trace,
        Method::Dir,
        Method::Dirxml,
        Method::Table,
        Method::Group,
        Method::GroupEnd,
        Method::GroupCollapsed,
        Method::Assert,
        Method::Clear,
        Method::Count,
        Method::CountReset,
        Method::Time,
        Method::TimeLog,
        Method::TimeEnd,
        Method::Profile,
        Method::ProfileEnd,
        Method::TimeStamp,
        Method::CreateTask,
    ];

    /// The host-facing method name.
    pub fn name(self) -> &'static str {
        match self {
            Method::Log => "log",
            Method::Error => "error",
            Method::Info => "info",
            Method::Warn => "warn",
            Method::Debug => "debug",
            Method::Trace => "trace",
            Method::Dir => "dir",
            Method::Dirxml => "dirxml",
            Method::Table => "table",
            Method::Group => "group",
            Method::GroupEnd => "groupEnd",
            Method::GroupCollapsed => "groupCollapsed",
            Method::Assert => "assert",
            Method::Clear => "clear",
            Method::Count => "count",
            Method::CountReset => "countReset",
            Method::Time => "time",
            Method::TimeLog => "timeLog",
            Method::TimeEnd => "timeEnd",
            Method::Profile => "profile",
            Method::ProfileEnd => "profileEnd",
            Method::TimeStamp => "timeStamp",
            Method::CreateTask => "createTask",
        }
    }

    /// Whether the method is an alias whose primitive comes from the alias
    /// list (and may be overridden by configuration).
    pub fn is_alias(self) -> bool {
        self.canonical().is_none()
    }

    /// Fixed handler of non-alias methods.
    fn canonical(self) -> Option<Handler> {
        match self {
            Method::Log => Some(Handler::Primitive(Primitive::Log)),
            Method::Error => Some(Handler::Primitive(Primitive::Error)),
            Method::Group => Some(Handler::Primitive(Primitive::Group)),
            Method::GroupEnd => Some(Handler::GroupEnd),
            Method::Trace => Some(Handler::Trace),
            Method::Dir => Some(Handler::Dir),
            Method::Assert => Some(Handler::Assert),
            Method::Clear => Some(Handler::Clear),
            Method::Count => Some(Handler::Count),
            Method::CountReset => Some(Handler::CountReset),
            Method::Time => Some(Handler::Time),
            Method::TimeLog => Some(Handler::TimeLog),
            Method::TimeEnd => Some(Handler::TimeEnd),
            Method::Info
            | Method::Warn
            | Method::Debug
            | Method::Dirxml
            | Method::Table
            | Method::GroupCollapsed
            | Method::Profile
            | Method::ProfileEnd
            | Method::TimeStamp
            | Method::CreateTask => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Method {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| ConsoleError::UnknownMethod(s.to_owned()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The behaviours an alias can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    /// Format and write to `stdout`.
    Log,
    /// Format and write to `stderr`.
    Error,
    /// Log the arguments, if any, then indent.
    Group,
    /// Accept and ignore the call (profiling hooks and the like).
    Empty,
}

/// Built-in alias list.
pub const DEFAULT_ALIASES: &[(Method, Primitive)] = &[
    (Method::Info, Primitive::Log),
    (Method::Warn, Primitive::Log),
    (Method::Table, Primitive::Log),
    (Method::Dirxml, Primitive::Log),
    (Method::Debug, Primitive::Log),
    (Method::GroupCollapsed, Primitive::Group),
    (Method::CreateTask, Primitive::Empty),
    (Method::Profile, Primitive::Empty),
    (Method::ProfileEnd, Primitive::Empty),
    (Method::TimeStamp, Primitive::Empty),
];

/// What a console does when a method is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Primitive(Primitive),
    Trace,
    Dir,
    Assert,
    Clear,
    Count,
    CountReset,
    Time,
    TimeLog,
    TimeEnd,
    GroupEnd,
}

/// Method → handler lookup, resolved once per console.
#[derive(Debug, Clone)]
pub struct MethodTable {
    handlers: [Handler; METHOD_COUNT],
}

impl MethodTable {
    /// Builds the table from the built-in aliases plus `overrides`, given as
    /// `(method name, primitive)` pairs. Only alias methods can be
    /// overridden.
    pub fn build<'a, I>(overrides: I) -> Result<Self, ConsoleError>
    where
        I: IntoIterator<Item = (&'a str, Primitive)>,
    {
        let mut table = Self::default();
        for (name, primitive) in overrides {
            let method: Method = name.parse()?;
            if !method.is_alias() {
                return Err(ConsoleError::InvalidConfig(format!(
                    "`{name}` is not an aliasable console method"
                )));
            }
            table.handlers[method.index()] = Handler::Primitive(primitive);
            tracing::debug!(method = name, ?primitive, "console alias overridden");
        }
        Ok(table)
    }

    pub fn resolve(&self, method: Method) -> Handler {
        self.handlers[method.index()]
    }
}

impl Default for MethodTable {
    fn default() -> Self {
        let mut handlers = [Handler::Primitive(Primitive::Empty); METHOD_COUNT];
        for method in Method::ALL {
            if let Some(handler) = method.canonical() {
                handlers[method.index()] = handler;
            }
        }
        for &(method, primitive) in DEFAULT_ALIASES {
            handlers[method.index()] = Handler::Primitive(primitive);
        }
        Self { handlers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.name().parse::<Method>().unwrap(), method);
        }
        assert!(matches!(
            "groupend".parse::<Method>(),
            Err(ConsoleError::UnknownMethod(name)) if name == "groupend"
        ));
    }

    #[test]
    fn all_is_in_declaration_order() {
        for (i, method) in Method::ALL.into_iter().enumerate() {
            assert_eq!(method.index(), i);
        }
    }

    #[test]
    fn every_alias_has_a_default_primitive() {
        for method in Method::ALL.into_iter().filter(|m| m.is_alias()) {
            assert!(
                DEFAULT_ALIASES.iter().any(|(alias, _)| *alias == method),
                "{method} has no default alias"
            );
        }
        for (alias, _) in DEFAULT_ALIASES {
            assert!(alias.is_alias());
        }
    }

    #[test]
    fn default_table() {
        let table = MethodTable::default();
        assert_eq!(table.resolve(Method::Log), Handler::Primitive(Primitive::Log));
        assert_eq!(table.resolve(Method::Info), Handler::Primitive(Primitive::Log));
        assert_eq!(table.resolve(Method::Warn), Handler::Primitive(Primitive::Log));
        assert_eq!(table.resolve(Method::Error), Handler::Primitive(Primitive::Error));
        assert_eq!(
            table.resolve(Method::GroupCollapsed),
            Handler::Primitive(Primitive::Group)
        );
        assert_eq!(table.resolve(Method::Profile), Handler::Primitive(Primitive::Empty));
        assert_eq!(table.resolve(Method::TimeEnd), Handler::TimeEnd);
        assert_eq!(table.resolve(Method::GroupEnd), Handler::GroupEnd);
    }

    #[test]
    fn overrides_apply_to_aliases_only() {
        let table = MethodTable::build([("warn", Primitive::Error)]).unwrap();
        assert_eq!(table.resolve(Method::Warn), Handler::Primitive(Primitive::Error));
        assert_eq!(table.resolve(Method::Info), Handler::Primitive(Primitive::Log));

        assert!(matches!(
            MethodTable::build([("count", Primitive::Empty)]),
            Err(ConsoleError::InvalidConfig(_))
        ));
        assert!(matches!(
            MethodTable::build([("shout", Primitive::Log)]),
            Err(ConsoleError::UnknownMethod(_))
        ));
    }

    #[test]
    fn primitive_names() {
        let p: Primitive = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(p, Primitive::Error);
        assert_eq!(serde_json::to_string(&Primitive::Empty).unwrap(), "\"empty\"");
    }
}
