//! Citation extraction from backend answers
//!
//! The inference API returns the answer as free text, optionally followed by
//! a citation block introduced by a fixed marker line. This module splits
//! such an answer into the displayable text and a structured list of
//! citations. Parsing never fails: answers without the marker pass through
//! unchanged, and malformed citation lines degrade to a title-only record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The marker line and everything after it, through end of input.
static SOURCES_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)📚 المصادر:\n(.*)$").expect("valid regex"));

/// One well-formed citation line: bullet, pdf filename, separator, page word,
/// page number.
static CITATION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"• (.+\.pdf) \| صفحة (\d+)").expect("valid regex"));

/// One reference extracted from an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Document filename, without any leading "./"
    pub title: String,
    /// Page number as returned by the backend; empty for degraded entries
    pub page: String,
}

/// Result of splitting a raw answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnswer {
    /// Answer text with the citation block removed
    pub clean_answer: String,
    /// Citations in the order they appeared
    pub sources: Vec<Citation>,
}

/// Split a raw answer into clean display text and its citations.
///
/// Deterministic and side-effect free; calling it twice on the same input
/// yields the same result.
pub fn parse_answer(answer: &str) -> ParsedAnswer {
    let caps = match SOURCES_BLOCK.captures(answer) {
        Some(caps) => caps,
        None => {
            return ParsedAnswer {
                clean_answer: answer.to_string(),
                sources: Vec::new(),
            }
        }
    };

    let marker_start = caps.get(0).map(|m| m.start()).unwrap_or(answer.len());
    let block = caps.get(1).map(|m| m.as_str()).unwrap_or("");

    let clean_answer = answer[..marker_start].trim().to_string();
    let sources = block
        .lines()
        .filter(|line| line.trim().starts_with('•'))
        .map(parse_citation_line)
        .collect();

    ParsedAnswer {
        clean_answer,
        sources,
    }
}

fn parse_citation_line(line: &str) -> Citation {
    if let Some(caps) = CITATION_LINE.captures(line) {
        let file = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let page = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        return Citation {
            title: file.strip_prefix("./").unwrap_or(file).to_string(),
            page: page.to_string(),
        };
    }

    // Malformed bullet line: keep it as a title-only citation.
    let trimmed = line.trim();
    let title = trimmed.strip_prefix('•').map(str::trim).unwrap_or(trimmed);
    Citation {
        title: title.to_string(),
        page: String::new(),
    }
}
