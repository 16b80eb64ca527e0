//! Balanced-brace scanning
//!
//! Regex alone cannot delimit a dictionary body that may contain nested
//! braces - a greedy or non-greedy capture silently matches too much or too
//! little. Any region whose extent depends on nesting is therefore bounded
//! by an explicit depth-counted scan starting at its opening brace.
//!
//! Braces inside quoted strings are not interpreted; descriptor values the
//! editor targets do not contain them.

/// Errors from balanced scanning
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan origin is not an opening brace
    #[error("no opening brace at offset {at}")]
    NotAnOpenBrace { at: usize },

    /// The opening brace has no matching close
    #[error("unbalanced braces: no close for opening brace at offset {open}")]
    Unbalanced { open: usize },
}

/// Byte offset of the `}` matching the `{` at `open`
///
/// # Errors
/// Returns error if `open` does not sit on a `{`, or the document ends
/// before the depth counter returns to zero
pub fn balanced_span(text: &str, open: usize) -> Result<usize, ScanError> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return Err(ScanError::NotAnOpenBrace { at: open });
    }
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(ScanError::Unbalanced { open })
}

/// Offset of the first `{` at or after `from`
#[must_use]
pub fn next_open_brace(text: &str, from: usize) -> Option<usize> {
    text.as_bytes()
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, &b)| b == b'{')
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_body() {
        let text = "a = { b = 1; };";
        assert_eq!(balanced_span(text, 4).unwrap(), 13);
    }

    #[test]
    fn nested_bodies_resolve_to_outer_close() {
        let text = "A = { B = { C = { enabled = 1; }; }; };";
        let close = balanced_span(text, 4).unwrap();
        assert_eq!(&text[close..], "};");
        // Inner body closes earlier
        let inner = text.find("{ C").unwrap();
        assert!(balanced_span(text, inner).unwrap() < close);
    }

    #[test]
    fn not_an_open_brace() {
        let result = balanced_span("abc", 1);
        assert!(matches!(result, Err(ScanError::NotAnOpenBrace { at: 1 })));
    }

    #[test]
    fn unbalanced_reported() {
        let result = balanced_span("x = { y = {", 4);
        assert!(matches!(result, Err(ScanError::Unbalanced { open: 4 })));
    }

    #[test]
    fn next_open_brace_skips_from() {
        let text = "a{b{c";
        assert_eq!(next_open_brace(text, 0), Some(1));
        assert_eq!(next_open_brace(text, 2), Some(3));
        assert_eq!(next_open_brace(text, 4), None);
    }
}
