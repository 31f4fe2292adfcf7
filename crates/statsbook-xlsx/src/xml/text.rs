//! Text escaping for XML output and Excel's own string escapes

/// Escape character data
pub(crate) fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for use inside double quotes
///
/// Whitespace control characters are written as character references so
/// that attribute-value normalization does not turn them into spaces.
pub(crate) fn escape_attr(s: &str) -> String {
    escape_text(s)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

/// Replace `_xHHHH_` sequences with the character they name
///
/// Excel writes control characters in string items this way (`_x000a_` for
/// a line feed) and protects a literal `_x` by escaping its underscore as
/// `_x005f_`. Anything that is not a complete sequence is left alone.
pub fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }
        if chars.peek() != Some(&'x') {
            result.push('_');
            continue;
        }
        chars.next(); // 'x'

        let mut hex = String::with_capacity(4);
        while hex.len() < 4 {
            match chars.peek() {
                Some(&ch) if ch.is_ascii_hexdigit() => {
                    hex.push(ch);
                    chars.next();
                }
                _ => break,
            }
        }

        let decoded = if hex.len() == 4 && chars.peek() == Some(&'_') {
            u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
        } else {
            None
        };
        match decoded {
            Some(ch) => {
                chars.next(); // closing '_'
                result.push(ch);
            }
            None => {
                // not an escape; emit what was consumed
                result.push_str("_x");
                result.push_str(&hex);
            }
        }
    }

    result
}
