//! Handler parameter annotated with the other command style's type.
//!
//! Prefix commands receive a `Context`; interaction (slash/user/message)
//! commands receive an `Interaction`. Mixing them up does not raise, it
//! just hands the author an object with none of the methods they expect.
//! Advisory only: re-importing and renaming types is not a safe mechanical
//! fix.

use tree_sitter::Node;

use super::{py, Detection, Detector, FindingKind};
use crate::parse::{walk, ParsedSnippet, Walk};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandStyle {
    Prefix,
    Interaction,
}

/// Style implied by the first command-registration decorator, if any.
fn command_style(snippet: &ParsedSnippet, function: Node<'_>) -> Option<CommandStyle> {
    for dec in py::decorators(function) {
        let Some(expr) = py::decorator_expr(dec) else {
            continue;
        };
        if expr.kind() != "call" {
            continue;
        }
        let Some(name) = py::callee_name(snippet, expr) else {
            continue;
        };
        if py::COMMAND_DECORATORS.contains(&name) {
            return Some(if py::PREFIX_COMMAND_DECORATORS.contains(&name) {
                CommandStyle::Prefix
            } else {
                CommandStyle::Interaction
            });
        }
    }
    None
}

/// Annotation text of the handler's primary (first non-`self`) parameter.
fn primary_annotation<'s>(snippet: &'s ParsedSnippet, function: Node<'_>) -> Option<&'s str> {
    let param = py::params(function)
        .into_iter()
        .find(|p| py::param_name(snippet, *p) != Some("self"))?;
    py::param_annotation(param).map(|ty| snippet.node_text(ty))
}

/// The mismatch kind for a handler, if its annotation belongs to the other
/// command style.
fn annotation_mismatch(snippet: &ParsedSnippet, function: Node<'_>) -> Option<FindingKind> {
    let style = command_style(snippet, function)?;
    let annotation = primary_annotation(snippet, function)?;
    match style {
        CommandStyle::Prefix if annotation.contains("Interaction") => {
            Some(FindingKind::WrongContextTypeAnnotation)
        }
        CommandStyle::Interaction if annotation.contains("Context") => {
            Some(FindingKind::WrongInteractionTypeAnnotation)
        }
        _ => None,
    }
}

fn scan_for(kind: FindingKind, snippet: &ParsedSnippet) -> Vec<Detection> {
    let mut detections = Vec::new();
    walk(snippet.root(), &mut |node| {
        if node.kind() != "function_definition" {
            return Walk::Descend;
        }
        if annotation_mismatch(snippet, node) == Some(kind) {
            detections.push(Detection::advisory(kind));
            return Walk::Stop;
        }
        Walk::Descend
    });
    detections
}

/// Prefix command whose primary parameter is annotated as an interaction.
pub struct WrongContextAnnotation;

impl Detector for WrongContextAnnotation {
    fn kind(&self) -> FindingKind {
        FindingKind::WrongContextTypeAnnotation
    }

    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection> {
        scan_for(self.kind(), snippet)
    }
}

/// Interaction command whose primary parameter is annotated as a context.
pub struct WrongInteractionAnnotation;

impl Detector for WrongInteractionAnnotation {
    fn kind(&self) -> FindingKind {
        FindingKind::WrongInteractionTypeAnnotation
    }

    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection> {
        scan_for(self.kind(), snippet)
    }
}
