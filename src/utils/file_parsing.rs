/// Removes one pair of matching single or double quotes around `s`.
#[inline]
pub fn strip_surrounding_quotes(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 {
        let (first, last) = (b[0], b[b.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Splits a comma separated row, keeping commas inside quotes. Fields are
/// trimmed and keep their quotes.
pub fn split_csv_preserving_quotes(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut open_quote: Option<char> = None;

    for ch in line.chars() {
        match open_quote {
            Some(q) if ch == q => {
                open_quote = None;
                current.push(ch);
            }
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                open_quote = Some(ch);
                current.push(ch);
            }
            None if ch == ',' => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            None => current.push(ch),
        }
    }
    if !current.trim().is_empty() || !fields.is_empty() {
        fields.push(current.trim().to_string());
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_quotes_only_when_matching() {
        assert_eq!(strip_surrounding_quotes("'a,b'"), "a,b");
        assert_eq!(strip_surrounding_quotes(r#""x""#), "x");
        assert_eq!(strip_surrounding_quotes("'x\""), "'x\"");
        assert_eq!(strip_surrounding_quotes("nq"), "nq");
    }

    #[test]
    fn split_keeps_quoted_commas() {
        let p = split_csv_preserving_quotes(r#"'sun, ny',85,"85",FALSE,no"#);
        assert_eq!(p, vec!["'sun, ny'", "85", "\"85\"", "FALSE", "no"]);
    }

    #[test]
    fn split_keeps_trailing_empty_field() {
        assert_eq!(split_csv_preserving_quotes("1,"), vec!["1", ""]);
        assert!(split_csv_preserving_quotes("   ").is_empty());
    }
}
