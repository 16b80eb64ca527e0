//! The in-memory project document
//!
//! Provides [`ProjectDocument`], the full descriptor text treated as an
//! ordered sequence of bytes. All edits are insert-only splices: bytes
//! outside the spliced region are never altered.

use std::fmt::{self, Display, Formatter};

/// The textual project descriptor being edited
///
/// Read once at session start, mutated in memory through splice operations,
/// written back exactly once at session end. Brace balance is an invariant
/// every splice must preserve; [`is_brace_balanced`](Self::is_brace_balanced)
/// and [`open_braces`](Self::open_braces) exist so callers can assert it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDocument {
    text: String,
}

impl ProjectDocument {
    /// Wrap descriptor text
    #[inline]
    #[must_use]
    pub fn new(text: String) -> Self {
        Self { text }
    }

    /// The document text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume into the underlying text
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the document is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Substring presence check
    #[inline]
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    /// Offset of the first occurrence of `needle`
    #[inline]
    #[must_use]
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.text.find(needle)
    }

    /// Insert `insert` at byte offset `at`, shifting the tail right
    ///
    /// Insert-only: every byte outside the spliced region keeps its value
    /// and relative order.
    ///
    /// # Errors
    /// Returns error if `at` is past the end or not a char boundary
    pub fn splice(&mut self, at: usize, insert: &str) -> Result<(), DocumentError> {
        if at > self.text.len() || !self.text.is_char_boundary(at) {
            return Err(DocumentError::OutOfBounds {
                at,
                len: self.text.len(),
            });
        }
        self.text.insert_str(at, insert);
        Ok(())
    }

    /// Count of `{` bytes
    #[inline]
    #[must_use]
    pub fn open_braces(&self) -> usize {
        self.text.bytes().filter(|&b| b == b'{').count()
    }

    /// Count of `}` bytes
    #[inline]
    #[must_use]
    pub fn close_braces(&self) -> usize {
        self.text.bytes().filter(|&b| b == b'}').count()
    }

    /// Whether `{` and `}` counts agree
    #[inline]
    #[must_use]
    pub fn is_brace_balanced(&self) -> bool {
        self.open_braces() == self.close_braces()
    }
}

impl From<String> for ProjectDocument {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl Display for ProjectDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Errors that can occur when manipulating a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Splice offset outside the document or off a char boundary
    #[error("splice offset {at} invalid for document of length {len}")]
    OutOfBounds { at: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_inserts_without_touching_neighbors() {
        let mut doc = ProjectDocument::new("abcdef".to_string());
        doc.splice(3, "XYZ").unwrap();
        assert_eq!(doc.as_str(), "abcXYZdef");
    }

    #[test]
    fn splice_at_end_appends() {
        let mut doc = ProjectDocument::new("abc".to_string());
        doc.splice(3, "d").unwrap();
        assert_eq!(doc.as_str(), "abcd");
    }

    #[test]
    fn splice_past_end_fails() {
        let mut doc = ProjectDocument::new("abc".to_string());
        let result = doc.splice(4, "x");
        assert!(matches!(result, Err(DocumentError::OutOfBounds { at: 4, len: 3 })));
    }

    #[test]
    fn brace_counts() {
        let doc = ProjectDocument::new("{ a = { b = 1; }; }".to_string());
        assert_eq!(doc.open_braces(), 2);
        assert_eq!(doc.close_braces(), 2);
        assert!(doc.is_brace_balanced());
    }

    #[test]
    fn unbalanced_detected() {
        let doc = ProjectDocument::new("{ a = { ; }".to_string());
        assert!(!doc.is_brace_balanced());
    }

    #[test]
    fn balanced_splice_preserves_balance() {
        let mut doc = ProjectDocument::new("{\n}\n".to_string());
        let before = doc.open_braces();
        doc.splice(1, "\n\tA = { enabled = 1; };").unwrap();
        assert!(doc.is_brace_balanced());
        assert_eq!(doc.open_braces(), before + 1);
    }
}
