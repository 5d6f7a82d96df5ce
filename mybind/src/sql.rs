//! Sql literal construction for the non-prepared query path.
use crate::{encode::EncodeError, value::Value};

/// Append `src` to `dst` with MySQL backslash escaping applied.
///
/// Neutralizes NUL, newline, carriage return, backslash, both quote
/// characters and Ctrl-Z. Multi-byte connection charsets where `'` can
/// appear as a trailing byte, and the `NO_BACKSLASH_ESCAPES` sql mode, are
/// out of scope.
pub fn escape_into(src: &[u8], dst: &mut Vec<u8>) {
    for &b in src {
        match b {
            0 => dst.extend_from_slice(b"\\0"),
            b'\n' => dst.extend_from_slice(b"\\n"),
            b'\r' => dst.extend_from_slice(b"\\r"),
            0x1A => dst.extend_from_slice(b"\\Z"),
            b'\'' => dst.extend_from_slice(b"\\'"),
            b'"' => dst.extend_from_slice(b"\\\""),
            b'\\' => dst.extend_from_slice(b"\\\\"),
            b => dst.push(b),
        }
    }
}

/// Replace every `?` placeholder in `template` with the corresponding value
/// formatted as a SQL literal.
///
/// Substitution is purely positional and textual: the template is scanned
/// left to right with no SQL parsing, so a literal `?` inside a quoted
/// string or comment in the template is substituted like any other. Callers
/// must keep marker characters out of template text outside parameter
/// positions.
///
/// A placeholder/argument count mismatch returns
/// [`EncodeError::Arity`] and performs no substitution.
pub fn interpolate(template: &str, values: &[Value]) -> Result<String, EncodeError> {
    let markers = template.bytes().filter(|b| *b == b'?').count();
    if markers != values.len() {
        return Err(EncodeError::Arity { expected: markers, got: values.len() });
    }

    let mut out = Vec::with_capacity(template.len() + 16 * values.len());
    let mut values = values.iter();
    for b in template.bytes() {
        match b {
            b'?' => {
                let value = values.next().expect("placeholder count is pre-checked");
                push_literal(value, &mut out)?;
            },
            b => out.push(b),
        }
    }

    // SAFETY: template is a str, payloads are utf8-checked in `push_literal`
    // and every inserted escape or formatted number is ascii
    Ok(unsafe { String::from_utf8_unchecked(out) })
}

/// Format one value as a SQL literal.
fn push_literal(value: &Value, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match value {
        Value::Null => out.extend_from_slice(b"NULL"),

        Value::Bool(v) => out.push(match v {
            true => b'1',
            false => b'0',
        }),

        Value::Bytes(v) => {
            std::str::from_utf8(v).map_err(EncodeError::Utf8)?;
            out.push(b'\'');
            escape_into(v, out);
            out.push(b'\'');
        },

        // whole numbers within i32 range print as integers, everything else
        // falls back to the general float format and may round
        Value::Number(d) => {
            let whole = d.fract() == 0.0
                && *d <= i32::MAX as f64
                && *d >= i32::MIN as f64;
            match whole {
                true => out.extend_from_slice(itoa::Buffer::new().format(*d as i32).as_bytes()),
                false => out.extend_from_slice(format!("{d}").as_bytes()),
            }
        },

        // exact decimal, the path that avoids f64 rounding for large integers
        Value::Int(v) => out.extend_from_slice(itoa::Buffer::new().format(*v).as_bytes()),
        Value::UInt(v) => out.extend_from_slice(itoa::Buffer::new().format(*v).as_bytes()),

        v => return Err(EncodeError::Unsupported(v.shape())),
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::DateValue;
    use bytes::Bytes;

    fn bytes(s: &'static str) -> Value {
        Value::Bytes(Bytes::from_static(s.as_bytes()))
    }

    /// Strip quotes and undo `escape_into`, as a SQL parser would.
    fn reparse(literal: &str) -> String {
        let inner = literal.strip_prefix('\'').unwrap().strip_suffix('\'').unwrap();
        let mut out = String::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next().unwrap() {
                    '0' => out.push('\0'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    'Z' => out.push('\x1a'),
                    c => out.push(c),
                },
                c => out.push(c),
            }
        }
        out
    }

    #[test]
    fn quote_is_neutralized() {
        let sql = interpolate("SELECT ?", &[bytes("O'Brien")]).unwrap();
        assert_eq!(sql, "SELECT 'O\\'Brien'");
        assert_eq!(reparse(&sql[7..]), "O'Brien");
    }

    #[test]
    fn backslash_and_control_bytes() {
        let sql = interpolate("?", &[bytes("a\\b\n'\0\x1a")]).unwrap();
        assert_eq!(sql, "'a\\\\b\\n\\'\\0\\Z'");
        assert_eq!(reparse(&sql), "a\\b\n'\0\x1a");
    }

    #[test]
    fn null_and_bool() {
        assert_eq!(
            interpolate("VALUES(?, ?, ?)", &[Value::Null, Value::Bool(true), Value::Bool(false)])
                .unwrap(),
            "VALUES(NULL, 1, 0)",
        );
    }

    #[test]
    fn whole_numbers_print_as_integers() {
        assert_eq!(interpolate("?", &[Value::Number(3.0)]).unwrap(), "3");
        assert_eq!(interpolate("?", &[Value::Number(-40.0)]).unwrap(), "-40");
        assert_eq!(interpolate("?", &[Value::Number(1.5)]).unwrap(), "1.5");
        // out of i32 range, general format
        assert_eq!(
            interpolate("?", &[Value::Number(3e10)]).unwrap(),
            "30000000000",
        );
    }

    #[test]
    fn distinguished_integers_are_exact() {
        assert_eq!(
            interpolate("?", &[Value::UInt(18446744073709551615)]).unwrap(),
            "18446744073709551615",
        );
        assert_eq!(
            interpolate("?", &[Value::Int(i64::MIN)]).unwrap(),
            "-9223372036854775808",
        );
        // the generic numeric path rounds the same magnitude
        let rounded = interpolate("?", &[Value::Number(18446744073709551615u64 as f64)]).unwrap();
        assert_ne!(rounded, "18446744073709551615");
    }

    #[test]
    fn arity_mismatch_substitutes_nothing() {
        let err = interpolate("? ? ?", &[Value::Null, Value::Null]);
        assert!(matches!(err, Err(EncodeError::Arity { expected: 3, got: 2 })));
    }

    #[test]
    fn substitution_is_positional() {
        assert_eq!(
            interpolate(
                "UPDATE t SET a = ?, b = ? WHERE id = ?",
                &[Value::Number(1.0), bytes("x"), Value::Int(9)],
            )
            .unwrap(),
            "UPDATE t SET a = 1, b = 'x' WHERE id = 9",
        );
    }

    #[test]
    fn marker_inside_template_literal_is_not_special() {
        // documented sharp edge: the scan does not lex template literals
        let sql = interpolate("SELECT 'is it?', ?", &[Value::Bool(true), Value::Null]).unwrap();
        assert_eq!(sql, "SELECT 'is it1', NULL");
    }

    #[test]
    fn temporal_values_are_rejected() {
        let date = Value::Date(DateValue { year: 2024, month: 1, day: 1 });
        assert!(matches!(
            interpolate("?", &[date]),
            Err(EncodeError::Unsupported("date")),
        ));
    }

    #[test]
    fn non_utf8_payload_is_rejected() {
        let blob = Value::Bytes(Bytes::from_static(&[0xFF, 0xFE]));
        assert!(matches!(interpolate("?", &[blob]), Err(EncodeError::Utf8(_))));
    }

    #[test]
    fn multibyte_text_passes_through() {
        let sql = interpolate("?", &[bytes("héllo wörld")]).unwrap();
        assert_eq!(sql, "'héllo wörld'");
    }
}
