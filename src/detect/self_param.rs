//! Leading-`self` mistakes on command and listener callbacks.
//!
//! The two patterns are mirror images and the main source of false
//! positives when done naively: a command registered on a bot instance
//! (`@bot.command()`) is a free function and must not take `self`, while a
//! class-bound registration (`@commands.command()`, `@commands.Cog.listener()`)
//! is a method and must. The free-function check therefore never descends
//! into class bodies, and the method check never fires outside one.

use super::{py, Detection, Detector, FindingKind};
use crate::parse::{walk, ParsedSnippet, Walk};
use crate::rewrite::Edit;

/// Top-level command callback declaring a leading `self`.
pub struct SelfOnFreeFunctionCommand;

impl Detector for SelfOnFreeFunctionCommand {
    fn kind(&self) -> FindingKind {
        FindingKind::SelfParamOnFreeFunctionCommand
    }

    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection> {
        let mut detections = Vec::new();
        walk(snippet.root(), &mut |node| {
            if node.kind() == "class_definition" {
                return Walk::SkipChildren;
            }
            if node.kind() != "function_definition" {
                return Walk::Descend;
            }

            let params = py::params(node);
            let Some(first) = params.first().copied() else {
                return Walk::Descend;
            };
            if py::param_name(snippet, first) != Some("self") {
                return Walk::Descend;
            }

            if !has_instance_command_decorator(snippet, node) {
                return Walk::Descend;
            }

            // Drop the first parameter, eating the separator up to the next
            // one when there is one.
            let edit = match params.get(1) {
                Some(second) => Edit::replace(first.start_byte()..second.start_byte(), ""),
                None => Edit::replace(first.byte_range(), ""),
            };
            detections.push(Detection::with_fix(self.kind(), edit));
            Walk::Stop
        });
        detections
    }
}

/// A decorator like `@bot.command()` or `@tree.slash_command()`: a called,
/// dotted command registration whose root is a bot instance rather than one
/// of the framework namespaces (those are class-bound and expect `self`).
fn has_instance_command_decorator(snippet: &ParsedSnippet, function: tree_sitter::Node) -> bool {
    py::decorators(function).iter().any(|dec| {
        let Some(expr) = py::decorator_expr(*dec) else {
            return false;
        };
        if expr.kind() != "call" {
            return false;
        }
        let Some(func) = expr.child_by_field_name("function") else {
            return false;
        };
        if func.kind() != "attribute" {
            return false;
        }
        let Some(name) = py::attribute_name(snippet, func) else {
            return false;
        };
        if !py::COMMAND_DECORATORS.contains(&name) {
            return false;
        }
        match py::dotted_root(snippet, func) {
            Some(root) => !py::FRAMEWORK_ROOTS.contains(&root),
            None => false,
        }
    })
}

/// Cog method command/listener missing its leading `self`.
pub struct SelfMissingOnMethodCommand;

impl Detector for SelfMissingOnMethodCommand {
    fn kind(&self) -> FindingKind {
        FindingKind::SelfParamMissingOnMethodCommand
    }

    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection> {
        let mut detections = Vec::new();
        walk(snippet.root(), &mut |node| {
            if node.kind() != "function_definition" {
                return Walk::Descend;
            }
            // Method-only pattern: never fire on free functions.
            if !py::in_class(node) {
                return Walk::Descend;
            }

            if !has_method_registration_decorator(snippet, node) {
                return Walk::Descend;
            }

            let params = py::params(node);
            if let Some(first) = params.first() {
                if py::param_name(snippet, *first) == Some("self") {
                    return Walk::Descend;
                }
            }

            let Some(list) = node.child_by_field_name("parameters") else {
                return Walk::Descend;
            };
            let text = if params.is_empty() { "self" } else { "self, " };
            let edit = Edit::insert(list.start_byte() + 1, text);
            detections.push(Detection::with_fix(self.kind(), edit));
            Walk::Stop
        });
        detections
    }
}

/// A called decorator that marks a class-bound registration: a cog listener
/// (`@commands.Cog.listener()`) or a command decorator rooted in one of the
/// framework namespaces (or used bare, `@slash_command()`).
fn has_method_registration_decorator(snippet: &ParsedSnippet, function: tree_sitter::Node) -> bool {
    py::decorators(function).iter().any(|dec| {
        let Some(expr) = py::decorator_expr(*dec) else {
            return false;
        };
        if expr.kind() != "call" {
            return false;
        }
        match py::callee_name(snippet, expr) {
            Some("listener") => true,
            Some(name) if py::COMMAND_DECORATORS.contains(&name) => {
                let Some(func) = expr.child_by_field_name("function") else {
                    return false;
                };
                match func.kind() {
                    "identifier" => true,
                    _ => py::dotted_root(snippet, func)
                        .is_some_and(|root| py::FRAMEWORK_ROOTS.contains(&root)),
                }
            }
            _ => false,
        }
    })
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
    fn test_self_on_bot_command_is_dropped() {
        let src = "@bot.command()\nasync def ping(self, ctx):\n    pass\n";
        let (detections, fixed) = run(&SelfOnFreeFunctionCommand, src);
        assert_eq!(detections.len(), 1);
        assert_eq!(fixed, "@bot.command()\nasync def ping(ctx):\n    pass\n");
    }

    #[test]
    fn test_self_as_only_param_is_dropped() {
        let src = "@bot.slash_command()\nasync def ping(self):\n    pass\n";
        let (_, fixed) = run(&SelfOnFreeFunctionCommand, src);
        assert_eq!(fixed, "@bot.slash_command()\nasync def ping():\n    pass\n");
    }

    #[test]
    fn test_commands_namespace_legitimately_takes_self() {
        // @commands.command() is class-bound; self belongs there.
        let src = "@commands.command()\nasync def ping(self, ctx):\n    pass\n";
        let (detections, _) = run(&SelfOnFreeFunctionCommand, src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_method_self_is_not_touched() {
        let src = "class MyCog(commands.Cog):\n    @bot.command()\n    async def ping(self, ctx):\n        pass\n";
        let (detections, _) = run(&SelfOnFreeFunctionCommand, src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_undecorated_function_with_self_is_fine() {
        let src = "async def helper(self, ctx):\n    pass\n";
        let (detections, _) = run(&SelfOnFreeFunctionCommand, src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_cog_listener_missing_self_is_inserted() {
        let src = "class MyCog(commands.Cog):\n    @commands.Cog.listener()\n    async def on_message(message):\n        pass\n";
        let (detections, fixed) = run(&SelfMissingOnMethodCommand, src);
        assert_eq!(detections.len(), 1);
        assert!(fixed.contains("async def on_message(self, message):"));
    }

    #[test]
    fn test_cog_command_with_no_params_gains_self() {
        let src = "class MyCog(commands.Cog):\n    @commands.command()\n    async def ping():\n        pass\n";
        let (_, fixed) = run(&SelfMissingOnMethodCommand, src);
        assert!(fixed.contains("async def ping(self):"));
    }

    #[test]
    fn test_method_with_self_is_clean() {
        let src = "class MyCog(commands.Cog):\n    @commands.command()\n    async def ping(self, ctx):\n        pass\n";
        let (detections, _) = run(&SelfMissingOnMethodCommand, src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_free_function_never_gains_self() {
        // Top-level @commands.command() without self: wrong for other
        // reasons, but not this detector's pattern.
        let src = "@commands.command()\nasync def ping(ctx):\n    pass\n";
        let (detections, _) = run(&SelfMissingOnMethodCommand, src);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_insertion_does_not_retrigger() {
        let src = "class MyCog(commands.Cog):\n    @commands.Cog.listener()\n    async def on_message(message):\n        pass\n";
        let (_, fixed) = run(&SelfMissingOnMethodCommand, src);
        let (again, _) = run(&SelfMissingOnMethodCommand, &fixed);
        assert!(again.is_empty());
    }
}
