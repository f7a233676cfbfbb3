//! Bot-client instances bound to the misleading name `client`.
//!
//! Advisory only: a safe rename needs a whole-scope identifier rewrite,
//! which the engine does not attempt.

use super::{py, Detection, Detector, FindingKind};
use crate::parse::{walk, ParsedSnippet, Walk};

/// `client = commands.Bot(...)` and friends.
pub struct ClientNamedIncorrectly;

impl Detector for ClientNamedIncorrectly {
    fn kind(&self) -> FindingKind {
        FindingKind::ClientVariableNamedIncorrectly
    }

    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection> {
        let mut detections = Vec::new();
        walk(snippet.root(), &mut |node| {
            if node.kind() != "assignment" {
                return Walk::Descend;
            }

            let target_is_client = node
                .child_by_field_name("left")
                .filter(|left| left.kind() == "identifier")
                .is_some_and(|left| snippet.node_text(left).eq_ignore_ascii_case("client"));
            if !target_is_client {
                return Walk::Descend;
            }

            let value_is_bot = node
                .child_by_field_name("right")
                .filter(|right| right.kind() == "call")
                .and_then(|call| py::callee_name(snippet, call))
                .is_some_and(|name| py::BOT_CLASSES.contains(&name));
            if !value_is_bot {
                return Walk::Descend;
            }

            detections.push(Detection::advisory(self.kind()));
            Walk::Stop
        });
        detections
    }
}
