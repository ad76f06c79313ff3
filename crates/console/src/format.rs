//! Turns console arguments into text.
//!
//! A leading string argument is a printf-style template; otherwise every
//! argument is inspected and the results are space-joined. Indentation and
//! the line terminator are applied separately by [`indent_lines`].

use hostconsole_inspect::{Depth, InspectOptions, Inspector, Value, number_repr};

/// Depth used by `%o`.
const EXPANDED_DEPTH: usize = 4;

/// Formats `args` into unterminated, unindented text.
pub fn format_args(args: &[Value], inspector: &dyn Inspector, options: &InspectOptions) -> String {
    match args {
        [] => String::new(),
        // A lone template is not scanned, so `%%` survives.
        [Value::String(only)] => only.clone(),
        [Value::String(template), rest @ ..] => format_template(template, rest, inspector, options),
        _ => args
            .iter()
            .map(|arg| plain(arg, inspector, options))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Left-pads every line by `padding` spaces and terminates the text with one
/// line break.
pub fn indent_lines(text: &str, padding: usize) -> String {
    let pad = " ".repeat(padding);
    let mut out = String::with_capacity(text.len() + padding + 1);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&pad);
        out.push_str(line);
    }
    out.push('\n');
    out
}

fn format_template(
    template: &str,
    args: &[Value],
    inspector: &dyn Inspector,
    options: &InspectOptions,
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&directive) = chars.peek() else {
            out.push('%');
            break;
        };
        if directive == '%' {
            chars.next();
            out.push('%');
            continue;
        }
        if !matches!(directive, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O' | 'c') {
            out.push('%');
            continue;
        }

        chars.next();
        let Some(arg) = args.next() else {
            out.push('%');
            out.push(directive);
            continue;
        };
        match directive {
            's' => out.push_str(&as_string(arg, inspector, options)),
            'd' => out.push_str(&number_repr(arg.to_number())),
            'i' => out.push_str(&number_repr(arg.parse_int_prefix())),
            'f' => out.push_str(&number_repr(arg.parse_float_prefix())),
            'j' => out.push_str(&arg.to_json_string()),
            'o' => {
                let expanded = options.merged(
                    &InspectOptions::default().with_depth(Depth::Limited(EXPANDED_DEPTH)),
                );
                out.push_str(&inspector.inspect(arg, &expanded));
            }
            'O' => out.push_str(&inspector.inspect(arg, options)),
            // `%c` carries CSS, which has no meaning here.
            _ => {}
        }
    }

    for arg in args {
        out.push(' ');
        out.push_str(&plain(arg, inspector, options));
    }
    out
}

/// `%s` rendering: primitives coerce, containers inspect one level deep.
fn as_string(arg: &Value, inspector: &dyn Inspector, options: &InspectOptions) -> String {
    match arg {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_repr(*n),
        Value::Undefined | Value::Null | Value::Bool(_) => arg.to_display_string(),
        Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Error(_) => {
            let shallow = options.merged(&InspectOptions::default().with_depth(Depth::Limited(0)));
            inspector.inspect(arg, &shallow)
        }
    }
}

/// Strings verbatim, everything else inspected.
fn plain(arg: &Value, inspector: &dyn Inspector, options: &InspectOptions) -> String {
    match arg {
        Value::String(s) => s.clone(),
        other => inspector.inspect(other, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostconsole_inspect::{DefaultInspector, ErrorValue};

    fn fmt(args: &[Value]) -> String {
        format_args(args, &DefaultInspector, &InspectOptions::default())
    }

    #[test]
    fn no_arguments() {
        assert_eq!(fmt(&[]), "");
        assert_eq!(indent_lines("", 0), "\n");
    }

    #[test]
    fn printf_substitution() {
        assert_eq!(fmt(&["%s=%d".into(), "x".into(), 5.into()]), "x=5");
        assert_eq!(fmt(&["%i|%f".into(), "42.9px".into(), "1.5e1".into()]), "42|15");
        assert_eq!(fmt(&["%d".into(), "abc".into()]), "NaN");
        assert_eq!(fmt(&["%d".into(), Value::Number(-0.0)]), "-0");
        assert_eq!(
            fmt(&["%j".into(), Value::object([("a", Value::array([1.into()]))])]),
            r#"{"a":[1]}"#
        );
    }

    #[test]
    fn lone_template_is_verbatim() {
        assert_eq!(fmt(&["100%% %s".into()]), "100%% %s");
    }

    #[test]
    fn percent_escapes_and_leftovers() {
        assert_eq!(fmt(&["100%% %s".into(), "done".into()]), "100% done");
        assert_eq!(fmt(&["%s and %s".into(), "one".into()]), "one and %s");
        assert_eq!(fmt(&["%x %s".into(), "y".into()]), "%x y");
        assert_eq!(fmt(&["50%".into(), 1.into()]), "50% 1");
    }

    #[test]
    fn css_directive_is_consumed() {
        assert_eq!(fmt(&["%cbold".into(), "font-weight: bold".into()]), "bold");
    }

    #[test]
    fn excess_arguments_are_appended() {
        assert_eq!(
            fmt(&["a".into(), Value::object([("b", 1.into())])]),
            "a { b: 1 }"
        );
        assert_eq!(fmt(&["%s".into(), "x".into(), "y".into(), 2.into()]), "x y 2");
    }

    #[test]
    fn string_directive_on_containers_is_shallow() {
        let nested = Value::object([("a", Value::object([("b", 1.into())]))]);
        assert_eq!(fmt(&["%s".into(), nested.clone()]), "{ a: [Object] }");
        assert_eq!(fmt(&["%o".into(), nested.clone()]), "{ a: { b: 1 } }");
        assert_eq!(fmt(&["%O".into(), nested]), "{ a: { b: 1 } }");
    }

    #[test]
    fn non_string_first_argument_joins_inspected_values() {
        assert_eq!(
            fmt(&[1.into(), "two".into(), Value::array([3.into()])]),
            "1 two [ 3 ]"
        );
        assert_eq!(
            fmt(&[ErrorValue::new("Error", "boom").into()]),
            "Error: boom"
        );
        assert_eq!(fmt(&[Value::Null, Value::Undefined]), "null undefined");
    }

    #[test]
    fn indentation_applies_to_every_line() {
        assert_eq!(indent_lines("a\nb", 2), "  a\n  b\n");
        assert_eq!(indent_lines("a\n\nb", 1), " a\n \n b\n");
        assert_eq!(indent_lines("x", 0), "x\n");
    }
}
