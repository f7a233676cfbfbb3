//! Event/listener decorator call-shape mistakes.
//!
//! `@bot.event` registers by function name and must not be invoked;
//! `@bot.listen(...)` registers a named listener and must be. Both mistakes
//! are mirror images with a mechanical fix: drop or add the call
//! parentheses.

use super::{py, Detection, Detector, FindingKind};
use crate::parse::{walk, ParsedSnippet, Walk};
use crate::rewrite::Edit;

/// `@bot.event()` — the raw-event decorator invoked with `()`.
pub struct EventDecoratorCalled;

impl Detector for EventDecoratorCalled {
    fn kind(&self) -> FindingKind {
        FindingKind::EventDecoratorCalled
    }

    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection> {
        let mut detections = Vec::new();
        walk(snippet.root(), &mut |node| {
            // Raw events hang off the bot instance, never a cog body.
            if node.kind() == "class_definition" {
                return Walk::SkipChildren;
            }
            if node.kind() != "decorator" {
                return Walk::Descend;
            }

            if let Some(expr) = py::decorator_expr(node) {
                if expr.kind() == "call" {
                    if let Some(func) = expr.child_by_field_name("function") {
                        if py::attribute_name(snippet, func) == Some("event") {
                            let edit =
                                Edit::replace(expr.byte_range(), snippet.node_text(func));
                            detections.push(Detection::with_fix(self.kind(), edit));
                            return Walk::Stop;
                        }
                    }
                }
            }
            Walk::SkipChildren
        });
        detections
    }
}

/// `@bot.listen` — the named-listener decorator used bare.
pub struct ListenerDecoratorNotCalled;

impl Detector for ListenerDecoratorNotCalled {
    fn kind(&self) -> FindingKind {
        FindingKind::ListenerDecoratorNotCalled
    }

    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection> {
        let mut detections = Vec::new();
        walk(snippet.root(), &mut |node| {
            if node.kind() == "class_definition" {
                return Walk::SkipChildren;
            }
            if node.kind() != "decorator" {
                return Walk::Descend;
            }

            if let Some(expr) = py::decorator_expr(node) {
                if py::attribute_name(snippet, expr) == Some("listen") {
                    let edit = Edit::insert(expr.end_byte(), "()");
                    detections.push(Detection::with_fix(self.kind(), edit));
                    return Walk::Stop;
                }
            }
            Walk::SkipChildren
        });
        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use crate::rewrite::apply_edits;

    fn run(detector: &dyn Detector, source: &str) -> (Vec<Detection>, String) {
        let snippet = parse(source).unwrap();
        let detections = detector.scan(&snippet);
        let edits = detections.iter().filter_map(|d| d.edit.clone()).collect();
        let fixed = apply_edits(source, edits).unwrap();
        (detections, fixed)
    }

    #[test]
    fn test_event_called_is_fixed() {
        let src = "@bot.event()\nasync def on_ready():\n    pass\n";
        let (detections, fixed) = run(&EventDecoratorCalled, src);
        assert_eq!(detections.len(), 1);
        assert_eq!(fixed, "@bot.event\nasync def on_ready():\n    pass\n");
    }

    #[test]
    fn test_bare_event_is_clean() {
        let src = "@bot.event\nasync def on_ready():\n    pass\n";
        let (detections, _) = run(&EventDecoratorCalled, src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_event_fix_does_not_retrigger() {
        let src = "@bot.event()\nasync def on_ready():\n    pass\n";
        let (_, fixed) = run(&EventDecoratorCalled, src);
        let (again, _) = run(&EventDecoratorCalled, &fixed);
        assert!(again.is_empty());
    }

    #[test]
    fn test_first_match_only() {
        let src = "@bot.event()\nasync def on_ready():\n    pass\n\n@bot.event()\nasync def on_resume():\n    pass\n";
        let (detections, fixed) = run(&EventDecoratorCalled, src);
        assert_eq!(detections.len(), 1);
        // Only the first occurrence is rewritten.
        assert!(fixed.contains("@bot.event\nasync def on_ready"));
        assert!(fixed.contains("@bot.event()\nasync def on_resume"));
    }

    #[test]
    fn test_event_inside_class_is_ignored() {
        let src = "class MyCog:\n    @bot.event()\n    async def on_ready(self):\n        pass\n";
        let (detections, _) = run(&EventDecoratorCalled, src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_bare_listen_is_fixed() {
        let src = "@bot.listen\nasync def on_message(message):\n    pass\n";
        let (detections, fixed) = run(&ListenerDecoratorNotCalled, src);
        assert_eq!(detections.len(), 1);
        assert_eq!(fixed, "@bot.listen()\nasync def on_message(message):\n    pass\n");
    }

    #[test]
    fn test_called_listen_is_clean() {
        let src = "@bot.listen()\nasync def on_message(message):\n    pass\n";
        let (detections, _) = run(&ListenerDecoratorNotCalled, src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_listen_with_name_argument_is_clean() {
        let src = "@bot.listen(\"on_message\")\nasync def anything(message):\n    pass\n";
        let (detections, _) = run(&ListenerDecoratorNotCalled, src);
        assert!(detections.is_empty());
    }
}
