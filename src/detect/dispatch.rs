//! Overridden `on_message` hooks that never forward to command dispatch.
//!
//! Overriding the message event without calling `process_commands` silently
//! disables every prefix command. The fix appends the forwarding call as
//! the final statement of the handler, reusing the receiver and parameter
//! names already in scope. A handler whose suite sits on the definition
//! line has nowhere to append to and is reported without a fix.

use tree_sitter::Node;

use super::{py, Detection, Detector, FindingKind};
use crate::parse::{walk, ParsedSnippet, Walk};
use crate::rewrite::Edit;

/// `@bot.event async def on_message(...)` with no `process_commands` call.
pub struct MissingDispatchCall;

impl Detector for MissingDispatchCall {
    fn kind(&self) -> FindingKind {
        FindingKind::MessageHookMissingDispatchCall
    }

    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection> {
        let mut detections = Vec::new();
        walk(snippet.root(), &mut |node| {
            if node.kind() != "function_definition" {
                return Walk::Descend;
            }
            let is_hook = node
                .child_by_field_name("name")
                .is_some_and(|name| snippet.node_text(name) == "on_message");
            if !is_hook {
                return Walk::Descend;
            }

            let params = py::params(node);
            if params.is_empty() {
                // No parameter to forward; a different mistake entirely.
                return Walk::Descend;
            }

            let Some(receiver) = event_receiver(snippet, node) else {
                return Walk::Descend;
            };
            let Some(body) = node.child_by_field_name("body") else {
                return Walk::Descend;
            };
            if calls_process_commands(snippet, body) {
                return Walk::Descend;
            }

            // A suite on the definition line has no indented block to
            // append a statement to; report without a rewrite.
            if body.start_position().row == node.start_position().row {
                detections.push(Detection::advisory(self.kind()));
                return Walk::Stop;
            }

            let arg = params
                .iter()
                .filter_map(|p| py::param_name(snippet, *p))
                .find(|name| *name != "self")
                .unwrap_or("message");
            let indent = " ".repeat(body.start_position().column);
            let stmt = format!("\n{indent}await {receiver}.process_commands({arg})");
            detections.push(Detection::with_fix(
                self.kind(),
                Edit::insert(body.end_byte(), stmt),
            ));
            Walk::Stop
        });
        detections
    }
}

/// Receiver of the bare `.event` decorator (`bot` in `@bot.event`), if the
/// hook is registered as a raw event at all.
fn event_receiver<'s>(snippet: &'s ParsedSnippet, function: Node<'_>) -> Option<&'s str> {
    for dec in py::decorators(function) {
        let expr = py::decorator_expr(dec)?;
        if py::attribute_name(snippet, expr) == Some("event") {
            let object = expr.child_by_field_name("object")?;
            return Some(snippet.node_text(object));
        }
    }
    None
}

/// Whether the handler body already awaits a `.process_commands(...)` call.
fn calls_process_commands(snippet: &ParsedSnippet, body: Node<'_>) -> bool {
    let mut found = false;
    walk(body, &mut |node| {
        if node.kind() != "call" {
            return Walk::Descend;
        }
        if let Some(func) = node.child_by_field_name("function") {
            if py::attribute_name(snippet, func) == Some("process_commands") {
                found = true;
                return Walk::Stop;
            }
        }
        Walk::Descend
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use crate::rewrite::apply_edits;

    fn run(source: &str) -> (Vec<Detection>, String) {
        let snippet = parse(source).unwrap();
        let detections = MissingDispatchCall.scan(&snippet);
        let edits = detections.iter().filter_map(|d| d.edit.clone()).collect();
        let fixed = apply_edits(source, edits).unwrap();
        (detections, fixed)
    }

    #[test]
    fn test_missing_dispatch_is_appended() {
        let src = "@bot.event\nasync def on_message(message):\n    print(message.content)\n";
        let (detections, fixed) = run(src);
        assert_eq!(detections.len(), 1);
        assert_eq!(
            fixed,
            "@bot.event\nasync def on_message(message):\n    print(message.content)\n    await bot.process_commands(message)\n"
        );
    }

    #[test]
    fn test_receiver_and_param_names_are_reused() {
        let src = "@my_client.event\nasync def on_message(msg):\n    print(msg)\n";
        let (_, fixed) = run(src);
        assert!(fixed.contains("await my_client.process_commands(msg)"));
    }

    #[test]
    fn test_existing_dispatch_is_clean() {
        let src = "@bot.event\nasync def on_message(message):\n    await bot.process_commands(message)\n";
        let (detections, _) = run(src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_fix_does_not_retrigger() {
        let src = "@bot.event\nasync def on_message(message):\n    print(message)\n";
        let (_, fixed) = run(src);
        let (again, _) = run(&fixed);
        assert!(again.is_empty());
    }

    #[test]
    fn test_other_events_are_ignored() {
        let src = "@bot.event\nasync def on_ready():\n    print('up')\n";
        let (detections, _) = run(src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_undecorated_on_message_is_ignored() {
        let src = "async def on_message(message):\n    print(message)\n";
        let (detections, _) = run(src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_one_line_body_is_reported_without_a_fix() {
        // No indented block to append to; the rewrite would produce
        // invalid Python.
        let src = "@bot.event\nasync def on_message(message): print(message)\n";
        let (detections, fixed) = run(src);
        assert_eq!(detections.len(), 1);
        assert!(detections[0].edit.is_none());
        assert_eq!(fixed, src);
    }

    #[test]
    fn test_listener_style_on_message_is_ignored() {
        // @bot.listen handlers do not block dispatch; only the raw event does.
        let src = "@bot.listen()\nasync def on_message(message):\n    print(message)\n";
        let (detections, _) = run(src);
        assert!(detections.is_empty());
    }
}
