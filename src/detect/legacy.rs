//! Use of identifiers from the long-removed 0.x compatibility surface.
//!
//! Code carrying `pass_context` and friends was written against a library
//! version from years before the current 2.x forks; no mechanical fix
//! exists, the author needs the migration guide. Every occurrence is
//! independently worth pointing at, so this is the one `find_all` detector.

use super::{py, Detection, Detector, FindingKind};
use crate::parse::{walk, ParsedSnippet, Walk};

/// Identifier occurrences from the legacy feature set.
pub struct DeprecatedLegacyFeature;

impl Detector for DeprecatedLegacyFeature {
    fn kind(&self) -> FindingKind {
        FindingKind::DeprecatedLegacyFeatureUsed
    }

    fn find_all(&self) -> bool {
        true
    }

    fn scan(&self, snippet: &ParsedSnippet) -> Vec<Detection> {
        let mut detections = Vec::new();
        walk(snippet.root(), &mut |node| {
            if node.kind() == "identifier"
                && py::LEGACY_FEATURES.contains(&snippet.node_text(node))
            {
                detections.push(Detection::advisory(self.kind()));
            }
            Walk::Descend
        });
        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn scan(source: &str) -> Vec<Detection> {
        DeprecatedLegacyFeature.scan(&parse(source).unwrap())
    }

    #[test]
    fn test_pass_context_keyword() {
        let src = "@bot.command(pass_context=True)\nasync def ping(ctx):\n    pass\n";
        assert_eq!(scan(src).len(), 1);
    }

    #[test]
    fn test_every_occurrence_is_collected() {
        let src = "@bot.command(pass_context=True)\nasync def a(ctx):\n    pass\n\n@bot.command(pass_context=True)\nasync def b(ctx):\n    pass\n";
        assert_eq!(scan(src).len(), 2);
    }

    #[test]
    fn test_fetch_offline_members_attribute() {
        let src = "bot = commands.Bot(command_prefix='!', fetch_offline_members=True)\n";
        assert_eq!(scan(src).len(), 1);
    }

    #[test]
    fn test_no_rewrite_is_recorded() {
        let src = "@bot.command(pass_context=True)\nasync def ping(ctx):\n    pass\n";
        assert!(scan(src).iter().all(|d| d.edit.is_none()));
    }

    #[test]
    fn test_modern_code_is_clean() {
        let src = "@bot.command()\nasync def ping(ctx):\n    pass\n";
        assert!(scan(src).is_empty());
    }
}
