/// Parses `string` as a slide ordinal: one or more ASCII digits, nothing else.
///
/// Signs, whitespace, and trailing text are rejected, as are values that do
/// not fit in a `usize`.
///
/// ```
/// use foil::util::parse_ordinal;
///
/// assert_eq!(parse_ordinal("12"), Some(12));
/// assert_eq!(parse_ordinal("007"), Some(7));
/// assert_eq!(parse_ordinal("-1"), None);
/// assert_eq!(parse_ordinal("+1"), None);
/// assert_eq!(parse_ordinal("3rd"), None);
/// assert_eq!(parse_ordinal(""), None);
/// ```
pub fn parse_ordinal(string: &str) -> Option<usize> {
    if string.is_empty() || !string.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    string.parse().ok()
}

/// Convert spaces to hyphens. Remove characters that aren't alphanumerics,
/// underscores, or hyphens. Convert to lowercase. Also strip leading and
/// trailing whitespace.
pub fn slugify(string: &str) -> String {
    let mut output = String::with_capacity(string.len());

    let mut need_dash = false;
    for ch in string.chars() {
        for b in deunicode::deunicode_char(ch).unwrap_or("-").bytes() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => {
                    if need_dash {
                        output.push('-');
                        need_dash = false;
                    }

                    output.push(b.to_ascii_lowercase() as char);
                }
                _ => need_dash = !output.is_empty(),
            }
        }
    }

    output
}
