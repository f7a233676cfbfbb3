//! Autohelp - snippet analysis and auto-fix for chat support channels.
//!
//! Autohelp watches chat messages for Python snippets that misuse a
//! Discord bot framework, diagnoses a fixed catalogue of common mistakes,
//! applies mechanical rewrites where one is safe, and hands back findings
//! plus an aligned diff for the author.
//!
//! # Architecture
//!
//! Analysis is tree-sitter based, over source text rather than a mutable
//! AST: rewrites are byte-span edits folded back into the source, which is
//! re-parsed before the next detector runs.
//!
//! - `extract`: code-candidate extraction from raw message text
//! - `parse`: Python parsing and tree traversal helpers
//! - `detect`: the detector pipeline, one module per mistake family
//! - `rewrite`: byte-span edits and their application
//! - `diff`: aligned before/after hunks for presentation
//! - `explain`: human-readable finding text
//! - `engine`: the orchestrating `AutoHelp` entry point
//! - `cache`: per-author/channel cool-down
//! - `config`: cool-down and per-guild doc links
//! - `report`: output formatting (pretty, JSON)
//!
//! # Adding a New Detector
//!
//! See `src/detect/` for examples. Implement the `Detector` trait and
//! register it in `detect::pipeline`; order there is load-bearing, later
//! detectors see earlier detectors' fixes already applied.

pub mod cache;
pub mod cli;
pub mod config;
pub mod detect;
pub mod diff;
pub mod engine;
pub mod explain;
pub mod extract;
pub mod parse;
pub mod report;
pub mod rewrite;

pub use cache::SessionCache;
pub use config::{DocLinks, HelpConfig};
pub use detect::{pipeline, Detection, Detector, FindingKind};
pub use diff::{diff_hunks, DiffHunk};
pub use engine::{AnalysisResult, AutoHelp, Finding, InboundMessage};
pub use extract::{CandidateOrigin, CodeCandidate, Extractor, HttpPasteFetcher, PasteFetcher};
pub use parse::{parse, ParseOutcome, ParsedSnippet, SyntaxFailure};
pub use rewrite::{apply_edits, Edit, RewriteError};
