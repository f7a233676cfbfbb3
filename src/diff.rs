//! Hunk-aligned comparison of original and fixed source.
//!
//! Line-based LCS diff where consecutive changed lines, plus one line of
//! context on each side, fold into a single before/after hunk. A one-line
//! parameter insertion therefore renders as one old/new pair instead of a
//! scatter of single-line hunks.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// One aligned before/after span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffHunk {
    pub old: String,
    pub new: String,
}

/// Compute hunks between the original and fixed source. Empty when the
/// sources are identical.
pub fn diff_hunks(original: &str, fixed: &str) -> Vec<DiffHunk> {
    if original == fixed {
        return Vec::new();
    }

    let diff = TextDiff::from_lines(original, fixed);
    let mut hunks = Vec::new();

    for group in diff.grouped_ops(1) {
        let mut old = String::new();
        let mut new = String::new();

        for op in &group {
            for change in diff.iter_changes(op) {
                match change.tag() {
                    ChangeTag::Equal => {
                        old.push_str(change.value());
                        new.push_str(change.value());
                    }
                    ChangeTag::Delete => old.push_str(change.value()),
                    ChangeTag::Insert => new.push_str(change.value()),
                }
            }
        }

        hunks.push(DiffHunk { old, new });
    }

    hunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sources_yield_no_hunks() {
        assert!(diff_hunks("a\nb\n", "a\nb\n").is_empty());
    }

    #[test]
    fn test_single_line_change_is_one_hunk() {
        let original = "@bot.event()\nasync def on_ready():\n    pass\n";
        let fixed = "@bot.event\nasync def on_ready():\n    pass\n";
        let hunks = diff_hunks(original, fixed);
        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].old.contains("@bot.event()"));
        assert!(hunks[0].new.contains("@bot.event\n"));
        // One context line kept on each side.
        assert!(hunks[0].old.contains("async def on_ready():"));
        assert!(hunks[0].new.contains("async def on_ready():"));
    }

    #[test]
    fn test_adjacent_changes_fold_into_one_hunk() {
        let original = "a\nb\nc\nd\n";
        let fixed = "a\nB\nC\nd\n";
        let hunks = diff_hunks(original, fixed);
        assert_eq!(hunks.len(), 1);
    }

    #[test]
    fn test_distant_changes_stay_separate_hunks() {
        let original = "a\nb\nc\nd\ne\nf\ng\nh\n";
        let fixed = "A\nb\nc\nd\ne\nf\ng\nH\n";
        let hunks = diff_hunks(original, fixed);
        assert_eq!(hunks.len(), 2);
    }

    #[test]
    fn test_appended_line() {
        let original = "async def on_message(message):\n    print(message)\n";
        let fixed =
            "async def on_message(message):\n    print(message)\n    await bot.process_commands(message)\n";
        let hunks = diff_hunks(original, fixed);
        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].new.contains("process_commands"));
        assert!(!hunks[0].old.contains("process_commands"));
    }
}
