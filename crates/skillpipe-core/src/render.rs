//! Markdown and JSON rendering of extracted output
//!
//! Rendering is pure: identical inputs produce identical text.

use std::fmt::Write;

use serde::Serialize;

use crate::error::Result;
use crate::types::{Answer, Extraction, Record};

/// Body written when a list skill found nothing
pub const NO_RESULTS: &str = "_No results found._";

/// Render whichever shape an extraction produced
pub fn render(title: &str, extraction: &Extraction) -> String {
    match extraction {
        Extraction::Records(records) => render_records(title, records),
        Extraction::Answer(answer) => render_answer(title, answer),
    }
}

/// Heading plus one bullet per record
///
/// ```
/// use skillpipe_core::{render::render_records, Record};
/// let md = render_records("Search results for \"rust\"", &[Record::new("Rust", "https://rust-lang.org")]);
/// assert_eq!(md, "# Search results for \"rust\"\n\n- [Rust](https://rust-lang.org)\n\n");
/// ```
pub fn render_records(title: &str, records: &[Record]) -> String {
    let mut md = heading(title);

    if records.is_empty() {
        md.push_str(NO_RESULTS);
        md.push('\n');
        return md;
    }

    for record in records {
        let _ = write!(md, "- [{}]({})", record.title, record.url);
        if let Some(stars) = record.stars {
            let _ = write!(md, " ⭐ {}", stars);
        }
        md.push_str("\n\n");

        if !record.description.is_empty() {
            let _ = write!(md, "  {}\n\n", record.description);
        }
    }

    md
}

/// Heading, the answer verbatim, then numbered citations if any
pub fn render_answer(title: &str, answer: &Answer) -> String {
    let mut md = heading(title);
    md.push_str(&answer.text);
    md.push_str("\n\n");

    if !answer.citations.is_empty() {
        md.push_str("---\n\n");
        let lines: Vec<String> = answer
            .citations
            .iter()
            .enumerate()
            .map(|(i, citation)| format!("  [{}]: {} ({})", i + 1, citation.url, citation.title))
            .collect();
        md.push_str(&lines.join("\n"));
        md.push('\n');
    }

    md
}

/// Pretty-printed JSON artifact
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn heading(title: &str) -> String {
    format!("# {}\n\n", title)
}
