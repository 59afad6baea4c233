//! Scalar rendering for BCL output.

use std::borrow::Cow;

use bcl_tree::{Sigil, ValueContent};

/// Escape a string for quoted output.
///
/// Returns the escaped content (without surrounding quotes).
pub fn escape_quoted(s: &str) -> Cow<'_, str> {
    if !s
        .chars()
        .any(|c| matches!(c, '"' | '\\') || c.is_control())
    {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => result.push_str("\\0"),
            c if c.is_control() => {
                let code = c as u32;
                result.push_str(&format!("\\u{{{code:04x}}}"));
            }
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Smallest number of `#` needed to delimit `s` as a raw string.
pub fn raw_hashes(s: &str) -> usize {
    let mut needed = 0;
    let mut run: Option<usize> = None;
    for c in s.chars() {
        match (c, run) {
            ('"', _) => {
                run = Some(0);
                needed = needed.max(1);
            }
            ('#', Some(n)) => {
                run = Some(n + 1);
                needed = needed.max(n + 2);
            }
            _ => run = None,
        }
    }
    needed
}

/// Render a value as BCL source.
pub fn format_value(content: &ValueContent) -> String {
    match content {
        ValueContent::Null => "null".to_string(),
        ValueContent::Bool(b) => b.to_string(),
        ValueContent::Symbol(text) => text.clone(),
        ValueContent::String {
            text,
            sigil: Sigil::Quoted,
        } => format!("\"{}\"", escape_quoted(text)),
        ValueContent::String {
            text,
            sigil: Sigil::Raw,
        } => {
            let hashes = "#".repeat(raw_hashes(text));
            format!("r{hashes}\"{text}\"{hashes}")
        }
        ValueContent::Integer(i) => i.to_string(),
        // Debug output always has a fraction or an exponent
        ValueContent::Float(x) => format!("{x:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quoted() {
        assert!(matches!(escape_quoted("plain text"), Cow::Borrowed(_)));
        assert_eq!(escape_quoted("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_quoted("a\\b"), "a\\\\b");
        assert_eq!(escape_quoted("l1\nl2\tx"), "l1\\nl2\\tx");
        assert_eq!(escape_quoted("bell\u{7}"), "bell\\u{0007}");
        assert_eq!(escape_quoted("é"), "é");
    }

    #[test]
    fn test_raw_hashes() {
        assert_eq!(raw_hashes("C:\\path"), 0);
        assert_eq!(raw_hashes("say \"hi\""), 1);
        assert_eq!(raw_hashes("a \"# b"), 2);
        assert_eq!(raw_hashes("\"## \"#"), 3);
        assert_eq!(raw_hashes("# not after a quote"), 0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&ValueContent::Null), "null");
        assert_eq!(format_value(&ValueContent::Bool(false)), "false");
        assert_eq!(format_value(&ValueContent::symbol("fast")), "fast");
        assert_eq!(format_value(&ValueContent::string("a\"b")), "\"a\\\"b\"");
        assert_eq!(format_value(&ValueContent::raw_string("a\"b")), "r#\"a\"b\"#");
        assert_eq!(format_value(&ValueContent::raw_string("C:\\")), "r\"C:\\\"");
        assert_eq!(format_value(&ValueContent::Integer(-42)), "-42");
        assert_eq!(format_value(&ValueContent::Float(2.0)), "2.0");
        assert_eq!(format_value(&ValueContent::Float(0.25)), "0.25");
        assert_eq!(format_value(&ValueContent::Float(1e300)), "1e300");
    }
}
