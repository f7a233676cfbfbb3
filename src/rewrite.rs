//! Localized source rewrites recorded by detectors.
//!
//! A detector that can fix its pattern records an [`Edit`] against the byte
//! span of the node it matched. All edits from one detector pass are folded
//! back onto the source in a single bottom-up pass, so node spans used for
//! matching stay valid for the whole pass.

use thiserror::Error;

/// A byte-span replacement against the current snippet source.
///
/// `start == end` is an insertion. Spans come from tree-sitter nodes, so
/// they always fall on UTF-8 boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    /// Replace the given byte range with new text.
    pub fn replace(range: std::ops::Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            replacement: replacement.into(),
        }
    }

    /// Insert text at the given byte offset.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            replacement: text.into(),
        }
    }
}

/// Errors from folding edits back onto the source.
///
/// Both variants are detector bugs, not runtime conditions: a single
/// detector pass must never produce overlapping spans, and spans always
/// come from nodes of the tree that was scanned.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("overlapping rewrites: {0}..{1} and {2}..{3}")]
    Overlap(usize, usize, usize, usize),
    #[error("edit span {0}..{1} is outside the source (len {2})")]
    OutOfBounds(usize, usize, usize),
}

/// Apply all edits from one detector pass to `source` in a single pass.
///
/// Edits are applied back-to-front so earlier spans stay valid. Overlapping
/// edits are rejected.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<String, RewriteError> {
    edits.sort_by_key(|e| (e.start, e.end));

    for pair in edits.windows(2) {
        if pair[0].end > pair[1].start {
            return Err(RewriteError::Overlap(
                pair[0].start,
                pair[0].end,
                pair[1].start,
                pair[1].end,
            ));
        }
    }

    let mut out = source.to_string();
    for edit in edits.iter().rev() {
        if edit.start > edit.end || edit.end > out.len() {
            return Err(RewriteError::OutOfBounds(edit.start, edit.end, out.len()));
        }
        out.replace_range(edit.start..edit.end, &edit.replacement);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_replacement() {
        let out = apply_edits("bot.event()", vec![Edit::replace(0..11, "bot.event")]).unwrap();
        assert_eq!(out, "bot.event");
    }

    #[test]
    fn test_multiple_disjoint_edits() {
        let src = "def f(self, ctx): pass";
        let edits = vec![
            Edit::replace(6..12, ""),      // drop "self, "
            Edit::insert(22, "  # fixed"), // append marker at end of source
        ];
        let out = apply_edits(src, edits).unwrap();
        assert_eq!(out, "def f(ctx): pass  # fixed");
    }

    #[test]
    fn test_insertion_keeps_surroundings() {
        let out = apply_edits("f()", vec![Edit::insert(1, "x")]).unwrap();
        assert_eq!(out, "fx()");
    }

    #[test]
    fn test_edits_applied_regardless_of_recorded_order() {
        let src = "abcdef";
        let edits = vec![Edit::replace(4..5, "E"), Edit::replace(0..1, "A")];
        let out = apply_edits(src, edits).unwrap();
        assert_eq!(out, "AbcdEf");
    }

    #[test]
    fn test_overlap_is_an_error() {
        let err = apply_edits(
            "abcdef",
            vec![Edit::replace(0..3, "x"), Edit::replace(2..4, "y")],
        )
        .unwrap_err();
        assert!(matches!(err, RewriteError::Overlap(..)));
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let err = apply_edits("ab", vec![Edit::replace(1..9, "x")]).unwrap_err();
        assert!(matches!(err, RewriteError::OutOfBounds(..)));
    }
}
