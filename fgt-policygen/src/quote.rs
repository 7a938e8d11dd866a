//! Double-quoted string values for FortiOS CLI.

/// Wrap `value` in double quotes, escaping `\` and `"` with a backslash.
pub fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::quoted;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(quoted("WebSrv"), "\"WebSrv\"");
        assert_eq!(quoted("Allow \"x\""), r#""Allow \"x\"""#);
        assert_eq!(quoted(r"corp\web"), r#""corp\\web""#);
        assert_eq!(quoted(""), "\"\"");
    }
}
