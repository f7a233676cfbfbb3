//! Detection of catalogued framework-misuse patterns.
//!
//! Each detector is a single-purpose tree visitor: it recognizes exactly one
//! mistake and, where a safe mechanical fix exists, records a byte-span
//! rewrite for it. Detectors are independent of each other but run in a
//! fixed registration order against a shared snippet; each detector's
//! accepted rewrites are folded back into the source before the next
//! detector runs, so later detectors observe a partially-corrected tree.
//! That order is a committed contract (pinned by test), not an accident:
//! re-ordering changes how fixes compose.

mod annotations;
mod client_name;
mod decorators;
mod dispatch;
mod legacy;
mod self_param;

pub use annotations::{WrongContextAnnotation, WrongInteractionAnnotation};
pub use client_name::ClientNamedIncorrectly;
pub use decorators::{EventDecoratorCalled, ListenerDecoratorNotCalled};
pub use dispatch::MissingDispatchCall;
pub use legacy::DeprecatedLegacyFeature;
pub use self_param::{SelfMissingOnMethodCommand, SelfOnFreeFunctionCommand};

use serde::{Deserialize, Serialize};

use crate::parse::ParsedSnippet;
use crate::rewrite::Edit;

/// The closed catalogue of detectable mistakes.
///
/// Closed on purpose: explanations are generated through an exhaustive
/// match, so adding a variant forces an explanation for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    EventDecoratorCalled,
    ListenerDecoratorNotCalled,
    SelfParamOnFreeFunctionCommand,
    SelfParamMissingOnMethodCommand,
    ClientVariableNamedIncorrectly,
    MessageHookMissingDispatchCall,
    WrongContextTypeAnnotation,
    WrongInteractionTypeAnnotation,
    DeprecatedLegacyFeatureUsed,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::EventDecoratorCalled => "event_decorator_called",
            FindingKind::ListenerDecoratorNotCalled => "listener_decorator_not_called",
            FindingKind::SelfParamOnFreeFunctionCommand => "self_param_on_free_function_command",
            FindingKind::SelfParamMissingOnMethodCommand => "self_param_missing_on_method_command",
            FindingKind::ClientVariableNamedIncorrectly => "client_variable_named_incorrectly",
            FindingKind::MessageHookMissingDispatchCall => "message_hook_missing_dispatch_call",
            FindingKind::WrongContextTypeAnnotation => "wrong_context_type_annotation",
            FindingKind::WrongInteractionTypeAnnotation => "wrong_interaction_type_annotation",
            FindingKind::DeprecatedLegacyFeatureUsed => "deprecated_legacy_feature_used",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One detector match: the kind that fired plus an optional rewrite for the
/// matched node. Rewrites must be idempotent against their own output; a
/// detector must never match its own fix.
#[derive(Debug, Clone)]
pub struct Detection {
    pub kind: FindingKind,
    pub edit: Option<Edit>,
}

impl Detection {
    pub fn advisory(kind: FindingKind) -> Self {
        Self { kind, edit: None }
    }

    pub fn with_fix(kind: FindingKind, edit: Edit) -> Self {
        Self {
            kind,
            edit: Some(edit),
        }
    }
}

/// A single-pattern tree visitor.
pub trait Detector: Send + Sync {
    /// The kind this detector reports.
    fn kind(&self) -> FindingKind;

    /// Whether every occurrence is collected. When false (the default),
    /// traversal stops at the first match to keep output focused.
    fn find_all(&self) -> bool {
        false
    }

    /// Traverse the snippet and record matches, honoring the detector's
    /// early-exit policy.
    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection>;
}

/// The detector pipeline in registration order.
///
/// This order determines which fixes compose before which and is pinned by
/// `pipeline_order_is_stable`; treat any change as a breaking one.
pub fn pipeline() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(EventDecoratorCalled),
        Box::new(ListenerDecoratorNotCalled),
        Box::new(ClientNamedIncorrectly),
        Box::new(MissingDispatchCall),
        Box::new(SelfOnFreeFunctionCommand),
        Box::new(SelfMissingOnMethodCommand),
        Box::new(WrongContextAnnotation),
        Box::new(WrongInteractionAnnotation),
        Box::new(DeprecatedLegacyFeature),
    ]
}

/// Shared helpers for picking apart Python CST shapes.
pub(crate) mod py {
    use tree_sitter::Node;

    use crate::parse::ParsedSnippet;

    /// Decorator attribute names that register a command handler.
    pub const COMMAND_DECORATORS: &[&str] = &[
        "command",
        "slash_command",
        "user_command",
        "message_command",
        "group",
    ];

    /// The subset of command decorators belonging to the prefix style.
    pub const PREFIX_COMMAND_DECORATORS: &[&str] = &["command", "group"];

    /// Namespace roots whose command decorators are class-bound (methods
    /// that legitimately take `self`), as opposed to a bot instance.
    pub const FRAMEWORK_ROOTS: &[&str] = &["commands", "nextcord", "disnake"];

    /// Bot-client classes whose instances should not be bound to `client`.
    pub const BOT_CLASSES: &[&str] = &["Bot", "InteractionBot"];

    /// Identifiers belonging to the long-removed 0.x compatibility surface.
    pub const LEGACY_FEATURES: &[&str] = &["pass_context", "fetch_offline_members"];

    /// The expression a decorator applies (what follows the `@`).
    pub fn decorator_expr(decorator: Node<'_>) -> Option<Node<'_>> {
        decorator.named_child(0)
    }

    /// Decorators attached to a definition via its `decorated_definition`
    /// parent, in source order.
    pub fn decorators(definition: Node<'_>) -> Vec<Node<'_>> {
        let Some(parent) = definition.parent() else {
            return Vec::new();
        };
        if parent.kind() != "decorated_definition" {
            return Vec::new();
        }
        let mut cursor = parent.walk();
        parent
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .collect()
    }

    /// Trailing attribute name of a dotted reference (`bot.event` -> `event`).
    pub fn attribute_name<'s>(snippet: &'s ParsedSnippet, node: Node<'_>) -> Option<&'s str> {
        if node.kind() != "attribute" {
            return None;
        }
        node.child_by_field_name("attribute")
            .map(|n| snippet.node_text(n))
    }

    /// The name a call's callee resolves to: trailing attribute for dotted
    /// callees, the identifier itself for bare ones.
    pub fn callee_name<'s>(snippet: &'s ParsedSnippet, call: Node<'_>) -> Option<&'s str> {
        let func = call.child_by_field_name("function")?;
        match func.kind() {
            "identifier" => Some(snippet.node_text(func)),
            "attribute" => attribute_name(snippet, func),
            _ => None,
        }
    }

    /// Leftmost identifier of a dotted/called chain
    /// (`commands.Cog.listener` -> `commands`).
    pub fn dotted_root<'s>(snippet: &'s ParsedSnippet, node: Node<'_>) -> Option<&'s str> {
        let mut current = node;
        loop {
            match current.kind() {
                "identifier" => return Some(snippet.node_text(current)),
                "attribute" => current = current.child_by_field_name("object")?,
                "call" => current = current.child_by_field_name("function")?,
                _ => return None,
            }
        }
    }

    /// Whether a node sits inside a class body.
    pub fn in_class(node: Node<'_>) -> bool {
        let mut current = node.parent();
        while let Some(ancestor) = current {
            if ancestor.kind() == "class_definition" {
                return true;
            }
            current = ancestor.parent();
        }
        false
    }

    /// Parameter nodes of a function definition, in declaration order.
    pub fn params(function: Node<'_>) -> Vec<Node<'_>> {
        let Some(list) = function.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut cursor = list.walk();
        list.named_children(&mut cursor)
            .filter(|child| {
                matches!(
                    child.kind(),
                    "identifier"
                        | "typed_parameter"
                        | "default_parameter"
                        | "typed_default_parameter"
                        | "list_splat_pattern"
                        | "dictionary_splat_pattern"
                )
            })
            .collect()
    }

    /// Declared name of a parameter node.
    pub fn param_name<'s>(snippet: &'s ParsedSnippet, param: Node<'_>) -> Option<&'s str> {
        match param.kind() {
            "identifier" => Some(snippet.node_text(param)),
            "typed_parameter" => param
                .named_child(0)
                .filter(|n| n.kind() == "identifier")
                .map(|n| snippet.node_text(n)),
            "default_parameter" | "typed_default_parameter" => param
                .child_by_field_name("name")
                .map(|n| snippet.node_text(n)),
            _ => None,
        }
    }

    /// Type annotation node of a parameter, if any.
    pub fn param_annotation(param: Node<'_>) -> Option<Node<'_>> {
        match param.kind() {
            "typed_parameter" | "typed_default_parameter" => param.child_by_field_name("type"),
            _ => None,
        }
    }
}
