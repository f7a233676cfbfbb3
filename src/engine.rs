//! The analysis engine: extraction, detection, rewriting and composition.
//!
//! One `AutoHelp` instance serves a whole deployment. `analyze` is the only
//! entry point; everything below it is deterministic for a given message
//! body, so the caller can re-run it freely.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use crate::cache::SessionCache;
use crate::config::HelpConfig;
use crate::detect::{pipeline, Detector, FindingKind};
use crate::diff::{diff_hunks, DiffHunk};
use crate::explain::explain;
use crate::extract::{CodeCandidate, Extractor, PasteFetcher};
use crate::parse::parse;
use crate::rewrite::apply_edits;

/// A chat message handed to the engine for analysis.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub content: String,
    pub author_id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
}

impl InboundMessage {
    pub fn new(content: impl Into<String>, author_id: u64, channel_id: u64) -> Self {
        Self {
            content: content.into(),
            author_id,
            channel_id,
            guild_id: None,
        }
    }

    pub fn in_guild(mut self, guild_id: u64) -> Self {
        self.guild_id = Some(guild_id);
        self
    }
}

/// One diagnosed mistake, ready to show to the author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub title: String,
    pub explanation: String,
    /// Whether a mechanical rewrite was applied for this finding.
    pub has_fix: bool,
}

/// Everything the notifier needs: findings in detection order, the source
/// as analyzed, the source with all fixes folded in, and a line diff
/// between the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub original_source: String,
    pub fixed_source: String,
    pub findings: Vec<Finding>,
    pub diff_hunks: Vec<DiffHunk>,
}

/// The engine. Cheap to share behind an `Arc`; `analyze` takes `&self`.
pub struct AutoHelp {
    config: HelpConfig,
    cache: SessionCache,
    extractor: Extractor,
    detectors: Vec<Box<dyn Detector>>,
}

impl AutoHelp {
    /// Engine without paste resolution.
    pub fn new(config: HelpConfig) -> Self {
        let cache = SessionCache::new(config.cooldown());
        Self {
            config,
            cache,
            extractor: Extractor::new(),
            detectors: pipeline(),
        }
    }

    /// Engine that resolves paste links through the given fetcher.
    pub fn with_fetcher(config: HelpConfig, fetcher: Arc<dyn PasteFetcher>) -> Self {
        let cache = SessionCache::new(config.cooldown());
        Self {
            config,
            cache,
            extractor: Extractor::with_fetcher(fetcher),
            detectors: pipeline(),
        }
    }

    /// Analyze one message. `None` means nothing to say: the author is in
    /// cool-down, no candidate parsed, or no detector fired. The cool-down
    /// is only started when a result is actually produced.
    pub async fn analyze(&self, message: &InboundMessage) -> Option<AnalysisResult> {
        if !self.cache.should_process(message.author_id, message.channel_id) {
            debug!(
                author = message.author_id,
                channel = message.channel_id,
                "author in cool-down, skipping"
            );
            return None;
        }

        let candidates = self.extractor.extract(&message.content).await;
        let source = select_source(&candidates)?;

        let (fixed, fired) = match self.run_pipeline(&source) {
            Ok(out) => out,
            Err(err) => {
                error!(error = %err, "pipeline aborted");
                return None;
            }
        };
        if fired.is_empty() {
            debug!("snippet parsed cleanly with no findings");
            return None;
        }

        let links = self.config.links_for(message.guild_id);
        let findings = fired
            .into_iter()
            .map(|(kind, has_fix)| {
                let (title, explanation) = explain(kind, links);
                Finding {
                    kind,
                    title,
                    explanation,
                    has_fix,
                }
            })
            .collect();
        let diff_hunks = diff_hunks(&source, &fixed);

        // Mark last, and atomically: a concurrent analysis for the same
        // author/channel pair must not also notify.
        if !self.cache.try_mark(message.author_id, message.channel_id) {
            debug!("lost cool-down race, discarding result");
            return None;
        }

        Some(AnalysisResult {
            original_source: source,
            fixed_source: fixed,
            findings,
            diff_hunks,
        })
    }

    /// Run every detector in registration order, folding each detector's
    /// rewrites into the source before the next one runs. Detectors
    /// therefore always see a snippet with all earlier fixes applied.
    fn run_pipeline(&self, source: &str) -> anyhow::Result<(String, Vec<(FindingKind, bool)>)> {
        let mut current = source.to_string();
        let mut fired = Vec::new();

        for detector in &self.detectors {
            let snippet = parse(&current)
                .map_err(|err| anyhow::anyhow!("rewritten source stopped parsing: {err}"))?;

            let mut edits = Vec::new();
            for detection in detector.scan(&snippet) {
                fired.push((detection.kind, detection.edit.is_some()));
                if let Some(edit) = detection.edit {
                    edits.push(edit);
                }
            }
            if !edits.is_empty() {
                current = apply_edits(&current, edits)?;
            }
        }

        Ok((current, fired))
    }
}

/// Pick the source to analyze. The concatenation of all candidates is
/// tried first (authors often split one program across several blocks);
/// if that does not parse, the first individually parsing candidate wins.
fn select_source(candidates: &[CodeCandidate]) -> Option<String> {
    if candidates.is_empty() {
        return None;
    }
    if candidates.len() > 1 {
        let joined = candidates
            .iter()
            .map(|c| c.source.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if parse(&joined).is_ok() {
            return Some(joined);
        }
    }
    candidates
        .iter()
        .find(|c| parse(&c.source).is_ok())
        .map(|c| c.source.clone())
}
