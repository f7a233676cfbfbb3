//! Output formatting for analysis results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the `AnalysisResult` serialized as-is for programmatic use

use colored::*;

use crate::engine::AnalysisResult;

/// Write a result as pretty-printed JSON.
pub fn write_json(result: &AnalysisResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{}", json);
    Ok(())
}

/// Write a result in pretty (human-readable) format.
pub fn write_pretty(result: &AnalysisResult) {
    println!();
    print!("  ");
    print!("{}", "autohelp".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    write_findings(result);

    if !result.diff_hunks.is_empty() {
        write_diff(result);
    }
}

fn write_findings(result: &AnalysisResult) {
    println!("  {} ({}):", "Findings".bold(), result.findings.len());
    println!();

    for finding in &result.findings {
        if finding.has_fix {
            print!("    {} ", "FIX  ".green());
        } else {
            print!("    {} ", "NOTE ".yellow());
        }
        print!("{:<32}", finding.kind.as_str().dimmed());
        println!("{}", finding.title.bold());
        println!("          {}", finding.explanation);
        println!();
    }
}

fn write_diff(result: &AnalysisResult) {
    println!("  {}", "Suggested fix:".bold());
    println!();

    for hunk in &result.diff_hunks {
        for line in hunk.old.lines() {
            println!("    {}", format!("- {}", line).red());
        }
        for line in hunk.new.lines() {
            println!("    {}", format!("+ {}", line).green());
        }
        println!();
    }
}
