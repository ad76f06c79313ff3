//! Human-readable rendering of console values.
//!
//! The output follows the familiar developer-console layout: quoted strings,
//! `{ key: value }` objects, `[ a, b ]` arrays, `[Object]` placeholders past
//! the depth limit, and one-entry-per-line layout once a container no longer
//! fits in `breakLength` columns.

use serde::{Deserialize, Deserializer, Serialize};

use crate::value::{Value, format_number};

/// Default nesting depth shown before containers collapse to placeholders.
pub const DEFAULT_DEPTH: usize = 2;

/// Default column budget for single-line containers.
pub const DEFAULT_BREAK_LENGTH: usize = 80;

/// Default number of array elements shown before summarising the rest.
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 100;

/// How deep nested containers are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DepthRepr", into = "DepthRepr")]
pub enum Depth {
    Limited(usize),
    Infinite,
}

/// Wire form of [`Depth`]: a level count or the keyword `"infinite"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DepthRepr {
    Levels(usize),
    Keyword(String),
}

impl TryFrom<DepthRepr> for Depth {
    type Error = String;

    fn try_from(repr: DepthRepr) -> Result<Self, Self::Error> {
        match repr {
            DepthRepr::Levels(n) => Ok(Depth::Limited(n)),
            DepthRepr::Keyword(k) => match k.as_str() {
                "infinite" | "Infinity" | "infinity" => Ok(Depth::Infinite),
                other => Err(format!(
                    "invalid depth `{other}`, expected a number or \"infinite\""
                )),
            },
        }
    }
}

impl From<Depth> for DepthRepr {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Limited(n) => DepthRepr::Levels(n),
            Depth::Infinite => DepthRepr::Keyword("infinite".into()),
        }
    }
}

/// Inspection options.
///
/// Every field is optional so a per-call set can be layered over instance
/// defaults with [`InspectOptions::merged`]; unset fields fall back to the
/// `DEFAULT_*` constants. An explicit `"depth": null` means no depth limit,
/// which is distinct from leaving `depth` out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectOptions {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "depth_or_unlimited"
    )]
    pub depth: Option<Depth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_array_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_string_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted: Option<bool>,
}

impl InspectOptions {
    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_break_length(mut self, columns: usize) -> Self {
        self.break_length = Some(columns);
        self
    }

    pub fn with_max_array_length(mut self, len: usize) -> Self {
        self.max_array_length = Some(len);
        self
    }

    pub fn with_max_string_length(mut self, len: usize) -> Self {
        self.max_string_length = Some(len);
        self
    }

    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = Some(sorted);
        self
    }

    /// Field-wise merge: every field set in `overrides` wins.
    pub fn merged(&self, overrides: &InspectOptions) -> InspectOptions {
        InspectOptions {
            depth: overrides.depth.or(self.depth),
            break_length: overrides.break_length.or(self.break_length),
            max_array_length: overrides.max_array_length.or(self.max_array_length),
            max_string_length: overrides.max_string_length.or(self.max_string_length),
            sorted: overrides.sorted.or(self.sorted),
        }
    }

    pub fn depth(&self) -> Depth {
        self.depth.unwrap_or(Depth::Limited(DEFAULT_DEPTH))
    }

    pub fn break_length(&self) -> usize {
        self.break_length.unwrap_or(DEFAULT_BREAK_LENGTH)
    }

    pub fn max_array_length(&self) -> usize {
        self.max_array_length.unwrap_or(DEFAULT_MAX_ARRAY_LENGTH)
    }

    pub fn sorted(&self) -> bool {
        self.sorted.unwrap_or(false)
    }
}

/// Only called for a present `depth` field; `null` lifts the limit.
fn depth_or_unlimited<'de, D>(deserializer: D) -> Result<Option<Depth>, D::Error>
where
    D: Deserializer<'de>,
{
    let depth = Option::<Depth>::deserialize(deserializer)?;
    Ok(Some(depth.unwrap_or(Depth::Infinite)))
}

/// The value-inspection capability consumed by the console.
pub trait Inspector: Send + Sync {
    /// Renders `value` for display.
    fn inspect(&self, value: &Value, options: &InspectOptions) -> String;
}

/// [`Inspector`] backed by [`inspect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInspector;

impl Inspector for DefaultInspector {
    fn inspect(&self, value: &Value, options: &InspectOptions) -> String {
        inspect(value, options)
    }
}

/// Renders `value` with the given options.
pub fn inspect(value: &Value, options: &InspectOptions) -> String {
    Renderer::new(options).value(value, 0, 0)
}

/// Number rendering for inspection: like `String(n)` but keeps the sign of zero.
pub fn number_repr(n: f64) -> String {
    if n == 0.0 && n.is_sign_negative() {
        "-0".into()
    } else {
        format_number(n)
    }
}

struct Renderer {
    depth: Depth,
    break_length: usize,
    max_array_length: usize,
    max_string_length: Option<usize>,
    sorted: bool,
}

impl Renderer {
    fn new(options: &InspectOptions) -> Self {
        Self {
            depth: options.depth(),
            break_length: options.break_length(),
            max_array_length: options.max_array_length(),
            max_string_length: options.max_string_length,
            sorted: options.sorted(),
        }
    }

    /// `level` is the nesting level of `value`, `indent` the column its
    /// container starts at.
    fn value(&self, value: &Value, level: usize, indent: usize) -> String {
        match value {
            Value::Undefined => "undefined".into(),
            Value::Null => "null".into(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_repr(*n),
            Value::String(s) => self.string(s),
            Value::Function(Some(name)) => format!("[Function: {name}]"),
            Value::Function(None) => "[Function (anonymous)]".into(),
            Value::Error(e) => match &e.stack {
                Some(stack) => stack.clone(),
                None if level == 0 => e.header(),
                None => format!("[{}]", e.header()),
            },
            Value::Array(items) => {
                if items.is_empty() {
                    return "[]".into();
                }
                if self.too_deep(level) {
                    return "[Array]".into();
                }

                let shown = items.len().min(self.max_array_length);
                let mut entries: Vec<String> = items[..shown]
                    .iter()
                    .map(|item| self.value(item, level + 1, indent + 2))
                    .collect();
                let hidden = items.len() - shown;
                if hidden > 0 {
                    entries.push(format!(
                        "... {hidden} more item{}",
                        if hidden == 1 { "" } else { "s" }
                    ));
                }
                self.reduce(entries, "[", "]", indent)
            }
            Value::Object(props) => {
                if props.is_empty() {
                    return "{}".into();
                }
                if self.too_deep(level) {
                    return "[Object]".into();
                }

                let mut props: Vec<&(String, Value)> = props.iter().collect();
                if self.sorted {
                    props.sort_by(|a, b| a.0.cmp(&b.0));
                }
                let entries = props
                    .into_iter()
                    .map(|(key, v)| {
                        format!("{}: {}", object_key(key), self.value(v, level + 1, indent + 2))
                    })
                    .collect();
                self.reduce(entries, "{", "}", indent)
            }
        }
    }

    fn too_deep(&self, level: usize) -> bool {
        match self.depth {
            Depth::Limited(max) => level > max,
            Depth::Infinite => false,
        }
    }

    fn string(&self, s: &str) -> String {
        let Some(max) = self.max_string_length else {
            return quote(s);
        };
        let len = s.chars().count();
        if len <= max {
            return quote(s);
        }

        let kept: String = s.chars().take(max).collect();
        let hidden = len - max;
        format!(
            "{}... {hidden} more character{}",
            quote(&kept),
            if hidden == 1 { "" } else { "s" }
        )
    }

    /// Joins container entries on one line when they fit, else one per line.
    fn reduce(&self, entries: Vec<String>, open: &str, close: &str, indent: usize) -> String {
        let content: usize = entries.iter().map(|e| e.chars().count()).sum();
        let start = entries.len() + indent + open.len() + 10;
        let fits = start + entries.len() + content <= self.break_length;

        if fits && !entries.iter().any(|e| e.contains('\n')) {
            return format!("{open} {} {close}", entries.join(", "));
        }

        let pad = " ".repeat(indent + 2);
        format!(
            "{open}\n{pad}{}\n{}{close}",
            entries.join(&format!(",\n{pad}")),
            " ".repeat(indent)
        )
    }
}

fn object_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_identifier {
        key.to_owned()
    } else {
        escape(key, '\'')
    }
}

/// Quotes a string, preferring `'`, then `"`, then a backtick.
fn quote(s: &str) -> String {
    let delimiter = if !s.contains('\'') {
        '\''
    } else if !s.contains('"') {
        '"'
    } else if !s.contains('`') && !s.contains("${") {
        '`'
    } else {
        '\''
    };
    escape(s, delimiter)
}

fn escape(s: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ErrorValue;

    fn render(value: &Value) -> String {
        inspect(value, &InspectOptions::default())
    }

    #[test]
    fn primitives() {
        assert_eq!(render(&Value::Undefined), "undefined");
        assert_eq!(render(&Value::Null), "null");
        assert_eq!(render(&Value::Bool(false)), "false");
        assert_eq!(render(&Value::Number(42.0)), "42");
        assert_eq!(render(&Value::Number(-0.0)), "-0");
        assert_eq!(render(&Value::Number(f64::NAN)), "NaN");
    }

    #[test]
    fn strings_are_quoted() {
        assert_eq!(render(&"hello".into()), "'hello'");
        assert_eq!(render(&"it's".into()), "\"it's\"");
        assert_eq!(render(&"it's \"x\"".into()), "`it's \"x\"`");
        assert_eq!(render(&"a\nb".into()), "'a\\nb'");
        assert_eq!(render(&"\u{1b}".into()), "'\\x1B'");
    }

    #[test]
    fn long_strings_are_truncated() {
        let opts = InspectOptions::default().with_max_string_length(3);
        assert_eq!(inspect(&"abcdef".into(), &opts), "'abc'... 3 more characters");
        assert_eq!(inspect(&"abcd".into(), &opts), "'abc'... 1 more character");
        assert_eq!(inspect(&"abc".into(), &opts), "'abc'");
    }

    #[test]
    fn objects_and_arrays() {
        assert_eq!(render(&Value::object([("b", 1.into())])), "{ b: 1 }");
        assert_eq!(render(&Value::Object(vec![])), "{}");
        assert_eq!(render(&Value::Array(vec![])), "[]");
        assert_eq!(
            render(&Value::array([1.into(), "x".into(), Value::Null])),
            "[ 1, 'x', null ]"
        );
        assert_eq!(
            render(&Value::object([("a-b", 1.into()), ("_ok", 2.into())])),
            "{ 'a-b': 1, _ok: 2 }"
        );
    }

    #[test]
    fn depth_limit_collapses_containers() {
        let nested = Value::object([(
            "a",
            Value::object([(
                "b",
                Value::object([("c", Value::object([("d", 1.into())]))]),
            )]),
        )]);
        assert_eq!(render(&nested), "{ a: { b: { c: [Object] } } }");

        let shallow = InspectOptions::default().with_depth(Depth::Limited(0));
        assert_eq!(inspect(&nested, &shallow), "{ a: [Object] }");
        assert_eq!(
            inspect(&Value::array([Value::array([1.into()])]), &shallow),
            "[ [Array] ]"
        );

        let unlimited = InspectOptions::default().with_depth(Depth::Infinite);
        assert_eq!(inspect(&nested, &unlimited), "{ a: { b: { c: { d: 1 } } } }");
    }

    #[test]
    fn long_arrays_are_summarised() {
        let opts = InspectOptions::default().with_max_array_length(2);
        let items = Value::array((1..=5).map(Value::from));
        assert_eq!(inspect(&items, &opts), "[ 1, 2, ... 3 more items ]");
    }

    #[test]
    fn wide_containers_break_per_entry() {
        let opts = InspectOptions::default().with_break_length(20);
        let value = Value::object([
            ("alpha", 1.into()),
            ("beta", Value::object([("gamma", 2.into())])),
        ]);
        assert_eq!(
            inspect(&value, &opts),
            "{\n  alpha: 1,\n  beta: {\n    gamma: 2\n  }\n}"
        );
    }

    #[test]
    fn sorted_keys() {
        let opts = InspectOptions::default().with_sorted(true);
        let value = Value::object([("b", 1.into()), ("a", 2.into())]);
        assert_eq!(inspect(&value, &opts), "{ a: 2, b: 1 }");
    }

    #[test]
    fn functions_and_errors() {
        assert_eq!(render(&Value::Function(Some("run".into()))), "[Function: run]");
        assert_eq!(render(&Value::Function(None)), "[Function (anonymous)]");

        let err = ErrorValue::new("TypeError", "bad input");
        assert_eq!(render(&err.clone().into()), "TypeError: bad input");
        assert_eq!(
            render(&Value::array([err.clone().into()])),
            "[ [TypeError: bad input] ]"
        );
        let with_stack = err.with_stack("TypeError: bad input\n    at main");
        assert_eq!(render(&with_stack.into()), "TypeError: bad input\n    at main");
    }

    #[test]
    fn merge_prefers_overrides() {
        let defaults = InspectOptions::default()
            .with_depth(Depth::Limited(5))
            .with_sorted(true);
        let call = InspectOptions::default().with_depth(Depth::Limited(1));

        let merged = defaults.merged(&call);
        assert_eq!(merged.depth(), Depth::Limited(1));
        assert!(merged.sorted());
        assert_eq!(merged.break_length(), DEFAULT_BREAK_LENGTH);
    }

    #[test]
    fn options_deserialize() {
        let opts: InspectOptions =
            serde_json::from_str(r#"{"depth":"infinite","breakLength":40}"#).unwrap();
        assert_eq!(opts.depth(), Depth::Infinite);
        assert_eq!(opts.break_length(), 40);
        assert_eq!(opts.max_array_length(), DEFAULT_MAX_ARRAY_LENGTH);

        let opts: InspectOptions = serde_json::from_str(r#"{"depth":3}"#).unwrap();
        assert_eq!(opts.depth(), Depth::Limited(3));

        assert!(serde_json::from_str::<InspectOptions>(r#"{"depth":"deep"}"#).is_err());
    }

    #[test]
    fn null_depth_is_unlimited() {
        let opts: InspectOptions = serde_json::from_str(r#"{"depth":null}"#).unwrap();
        assert_eq!(opts.depth, Some(Depth::Infinite));

        let opts: InspectOptions = serde_json::from_str(r#"{"sorted":true}"#).unwrap();
        assert_eq!(opts.depth, None);
        assert_eq!(opts.depth(), Depth::Limited(DEFAULT_DEPTH));

        let defaults = InspectOptions::default().with_depth(Depth::Limited(1));
        let call: InspectOptions = serde_json::from_str(r#"{"depth":null}"#).unwrap();
        let nested = Value::object([(
            "a",
            Value::object([("b", Value::object([("c", Value::object([("d", 1.into())]))]))]),
        )]);
        assert_eq!(
            inspect(&nested, &defaults.merged(&call)),
            "{ a: { b: { c: { d: 1 } } } }"
        );
    }
}
