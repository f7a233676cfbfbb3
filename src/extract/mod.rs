//! Candidate extraction from raw message text.
//!
//! A message can carry code in fenced blocks, inline backtick spans, or via
//! a link to a recognized paste service. The most specific markup wins:
//! fenced blocks are preferred, inline spans are only considered when no
//! fence exists, and a message with no markup at all becomes one
//! low-confidence whole-body candidate. Paste bodies are kept as separate
//! candidates so a near-identical inline snippet does not double up
//! findings.

mod paste;

pub use paste::{FetchError, HttpPasteFetcher, PasteFetcher, DEFAULT_FETCH_TIMEOUT};

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Where a candidate came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// Triple-backtick block, optionally tagged with a language.
    FencedBlock { lang: Option<String> },
    /// Single-backtick inline span.
    InlineBlock,
    /// Body fetched from a recognized paste service.
    ExternalPaste { url: String },
    /// No markup found; the entire message body, low confidence.
    WholeMessage,
}

/// One plausible source-code string pulled out of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCandidate {
    pub source: String,
    pub origin: CandidateOrigin,
}

/// Fenced code block: ```lang\n ... ``` with the language tag optional.
static FENCED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:(?P<lang>[a-zA-Z0-9_+-]+)\r?\n)?(?P<code>.*?)```")
        .expect("fenced block regex")
});

/// Inline code span: `...` on a single line.
static INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`(?P<code>[^`\n]+)`").expect("inline span regex"));

/// Recognized paste-service links (the vco cloudflare-worker paste family).
static PASTE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"https://(?P<host>paste\.(?:nextcord\.dev|disnake\.dev|vcokltfre\.dev|vcokltf\.re))/?\?(?:language=python&)?id=(?P<id>[0-9]+)",
    )
    .expect("paste url regex")
});

/// Pulls code candidates out of raw message text.
pub struct Extractor {
    fetcher: Option<Arc<dyn PasteFetcher>>,
}

impl Extractor {
    /// Extractor without paste resolution; paste links are ignored.
    pub fn new() -> Self {
        Self { fetcher: None }
    }

    /// Extractor that resolves paste links through the given collaborator.
    pub fn with_fetcher(fetcher: Arc<dyn PasteFetcher>) -> Self {
        Self {
            fetcher: Some(fetcher),
        }
    }

    /// Produce zero or more candidates for a message body.
    pub async fn extract(&self, text: &str) -> Vec<CodeCandidate> {
        let mut candidates = Vec::new();

        for caps in FENCED.captures_iter(text) {
            let code = tidy(&caps["code"]);
            if code.is_empty() {
                continue;
            }
            let lang = caps.name("lang").map(|m| m.as_str().to_string());
            candidates.push(CodeCandidate {
                source: code,
                origin: CandidateOrigin::FencedBlock { lang },
            });
        }

        if candidates.is_empty() {
            for caps in INLINE.captures_iter(text) {
                let code = caps["code"].trim().to_string();
                if code.is_empty() {
                    continue;
                }
                candidates.push(CodeCandidate {
                    source: code,
                    origin: CandidateOrigin::InlineBlock,
                });
            }
        }

        if candidates.is_empty() {
            let body = text.trim();
            if !body.is_empty() {
                candidates.push(CodeCandidate {
                    source: body.to_string(),
                    origin: CandidateOrigin::WholeMessage,
                });
            }
        }

        if let Some(paste) = self.resolve_paste(text).await {
            candidates.push(paste);
        }

        debug!(count = candidates.len(), "extracted candidates");
        candidates
    }

    /// Resolve the first recognized paste link, if any. Failure drops the
    /// candidate, never the analysis.
    async fn resolve_paste(&self, text: &str) -> Option<CodeCandidate> {
        let fetcher = self.fetcher.as_ref()?;
        let caps = PASTE_URL.captures(text)?;
        let url = format!("https://{}/api/item?key={}", &caps["host"], &caps["id"]);
        let body = fetcher.fetch(&url).await?;
        let code = tidy(&body);
        if code.is_empty() {
            return None;
        }
        Some(CodeCandidate {
            source: code,
            origin: CandidateOrigin::ExternalPaste { url },
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip leading blank lines and trailing whitespace, keeping the
/// indentation of the first real line intact.
fn tidy(code: &str) -> String {
    let mut start = 0;
    for line in code.split_inclusive('\n') {
        if line.trim().is_empty() {
            start += line.len();
        } else {
            break;
        }
    }
    code[start..].trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubFetcher(Option<String>);

    #[async_trait]
    impl PasteFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Option<String> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_fenced_block_with_lang() {
        let candidates = Extractor::new()
            .extract("look:\n```py\nx = 1\n```\nthanks")
            .await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, "x = 1");
        assert_eq!(
            candidates[0].origin,
            CandidateOrigin::FencedBlock {
                lang: Some("py".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_fenced_block_without_lang() {
        let candidates = Extractor::new().extract("```\nx = 1\n```").await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, "x = 1");
        assert_eq!(
            candidates[0].origin,
            CandidateOrigin::FencedBlock { lang: None }
        );
    }

    #[tokio::test]
    async fn test_multiple_fenced_blocks() {
        let text = "```py\nx = 1\n```\nand the error:\n```\nTraceback\n```";
        let candidates = Extractor::new().extract(text).await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].source, "Traceback");
    }

    #[tokio::test]
    async fn test_inline_only_when_no_fence() {
        let candidates = Extractor::new().extract("is `x = Bot()` right?").await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, "x = Bot()");
        assert_eq!(candidates[0].origin, CandidateOrigin::InlineBlock);
    }

    #[tokio::test]
    async fn test_fence_shadows_inline() {
        let text = "`inline` and\n```py\nblock = 1\n```";
        let candidates = Extractor::new().extract(text).await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, "block = 1");
    }

    #[tokio::test]
    async fn test_whole_message_fallback() {
        let candidates = Extractor::new().extract("x = 1\n").await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].origin, CandidateOrigin::WholeMessage);
        assert_eq!(candidates[0].source, "x = 1");
    }

    #[tokio::test]
    async fn test_blank_message_yields_nothing() {
        assert!(Extractor::new().extract("   \n ").await.is_empty());
    }

    #[tokio::test]
    async fn test_paste_link_becomes_separate_candidate() {
        let fetcher = Arc::new(StubFetcher(Some("y = 2\n".to_string())));
        let text = "```py\nx = 1\n```\nhttps://paste.nextcord.dev/?id=1234";
        let candidates = Extractor::with_fetcher(fetcher).extract(text).await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].source, "y = 2");
        assert_eq!(
            candidates[1].origin,
            CandidateOrigin::ExternalPaste {
                url: "https://paste.nextcord.dev/api/item?key=1234".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_failed_paste_fetch_is_dropped() {
        let fetcher = Arc::new(StubFetcher(None));
        let text = "https://paste.disnake.dev/?language=python&id=77";
        let candidates = Extractor::with_fetcher(fetcher).extract(text).await;
        // The link itself still counts as the whole-message fallback text.
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].origin, CandidateOrigin::WholeMessage);
    }

    #[tokio::test]
    async fn test_paste_link_ignored_without_fetcher() {
        let text = "```py\nx = 1\n```\nhttps://paste.nextcord.dev/?id=1";
        let candidates = Extractor::new().extract(text).await;
        assert_eq!(candidates.len(), 1);
    }
}
