//! `{name}` placeholder substitution for interpreter-side expressions.

use std::fmt::Write;

/// Replaces every `{name}` in `template` with its value, in a single pass so
/// substituted text is never rescanned. Unknown placeholders are kept as-is.
pub fn render(template: &str, bindings: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let bound = after.find('}').and_then(|close| {
            let name = &after[..close];
            bindings
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match bound {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Quotes text as a double-quoted string literal with backslash escapes.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Numeric escape; `\&` keeps a following digit out of the number.
            c if c.is_control() => {
                let _ = write!(out, "\\{}\\&", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_named_placeholders() {
        assert_eq!(
            render("eq {actual} {expected}", &[("actual", "\"a\""), ("expected", "\"b\"")]),
            "eq \"a\" \"b\""
        );
    }

    #[test]
    fn does_not_rescan_substituted_text() {
        assert_eq!(
            render("f {actual} {expected}", &[("actual", "{expected}"), ("expected", "x")]),
            "f {expected} x"
        );
    }

    #[test]
    fn keeps_unknown_and_unbalanced_braces() {
        assert_eq!(render("{other} {", &[("x", "1")]), "{other} {");
        assert_eq!(render("Map.fromList [] {x}", &[("x", "1")]), "Map.fromList [] 1");
    }

    #[test]
    fn control_characters_become_numeric_escapes() {
        assert_eq!(quote("\u{1b}[31mred\u{1b}[0m"), "\"\\27\\&[31mred\\27\\&[0m\"");
        assert_eq!(quote("\u{7}1"), "\"\\7\\&1\"");
    }

    #[test]
    fn quotes_special_characters() {
        assert_eq!(quote("a \"b\"\nc\\"), "\"a \\\"b\\\"\\nc\\\\\"");
    }
}
