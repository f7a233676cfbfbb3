//! Structural parsing of snippet candidates.
//!
//! Snippets are parsed with tree-sitter-python into a full-fidelity tree.
//! The original source text is kept alongside the tree: serializing a
//! snippet is just returning that text, which makes the round-trip property
//! hold by construction, and keeps diffs minimal after localized rewrites.
//!
//! tree-sitter never throws on invalid input; it produces a tree containing
//! ERROR/MISSING nodes instead. A snippet "fails to parse" when its root
//! contains any of those, which is a value-level [`SyntaxFailure`], never an
//! engine error.

use thiserror::Error;
use tree_sitter::{Node, Parser as TsParser, Tree};

/// A candidate that failed to parse as Python. Means "try the next
/// candidate", not "abort the analysis".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("snippet does not parse as Python: {reason}")]
pub struct SyntaxFailure {
    pub reason: String,
}

/// Either a parsed snippet or a typed parse failure.
pub type ParseOutcome = Result<ParsedSnippet, SyntaxFailure>;

/// A parsed snippet: the tree-sitter tree plus the owned source it was
/// parsed from.
pub struct ParsedSnippet {
    tree: Tree,
    source: String,
}

impl ParsedSnippet {
    /// Root node of the concrete syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The retained source text. This is also the serialized form of the
    /// tree when no rewrite has been applied.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text for a node of this snippet's tree.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// Parse a source string, rejecting input with syntax errors.
pub fn parse(source: &str) -> ParseOutcome {
    let mut parser = TsParser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| SyntaxFailure {
            reason: format!("grammar unavailable: {e}"),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| SyntaxFailure {
        reason: "parser produced no tree".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(SyntaxFailure {
            reason: error_reason(root),
        });
    }

    Ok(ParsedSnippet {
        tree,
        source: source.to_string(),
    })
}

/// Describe the first error location in a tree that failed to parse.
fn error_reason(root: Node<'_>) -> String {
    let mut reason = "invalid syntax".to_string();
    walk(root, &mut |node| {
        if node.is_error() || node.is_missing() {
            reason = format!("invalid syntax near line {}", node.start_position().row + 1);
            return Walk::Stop;
        }
        Walk::Descend
    });
    reason
}

/// Flow control for [`walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Visit this node's children.
    Descend,
    /// Continue with siblings, skipping this node's subtree.
    SkipChildren,
    /// Abort the traversal entirely.
    Stop,
}

/// Preorder traversal with per-node flow control.
///
/// Detectors use `SkipChildren` to stay out of class bodies when checking
/// top-level patterns, and `Stop` for their first-match-only policy.
pub fn walk<'t>(root: Node<'t>, visit: &mut dyn FnMut(Node<'t>) -> Walk) {
    let mut cursor = root.walk();

    'next: loop {
        match visit(cursor.node()) {
            Walk::Stop => return,
            Walk::Descend => {
                if cursor.goto_first_child() {
                    continue 'next;
                }
            }
            Walk::SkipChildren => {}
        }

        loop {
            if cursor.goto_next_sibling() {
                continue 'next;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}
