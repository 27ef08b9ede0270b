//! Decoder for the engine's line protocol.
//!
//! Each non-blank line of engine stdout is one record, fields separated by
//! `|` with surrounding whitespace trimmed:
//!
//! ```text
//! kernel.md | 0.92 | ...manages pages... | memory
//! ```
//!
//! Four fields is the current shape; three fields is the legacy shape without
//! the trailing keyword column. Anything else is dropped with a diagnostic so
//! one bad line never sinks the batch.

use crate::models::Hit;
use tracing::warn;

const LEGACY_KEYWORD: &str = "unknown";

pub fn parse(raw: &str) -> Vec<Hit> {
    let mut hits = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        match parts.as_slice() {
            [file, score, snippet, keyword] => hits.push(Hit {
                file: (*file).to_string(),
                score: (*score).to_string(),
                snippet: (*snippet).to_string(),
                keyword: (*keyword).to_string(),
            }),
            [file, score, snippet] => hits.push(Hit {
                file: (*file).to_string(),
                score: (*score).to_string(),
                snippet: (*snippet).to_string(),
                keyword: LEGACY_KEYWORD.to_string(),
            }),
            _ => {
                warn!(line, fields = parts.len(), "skipping malformed engine output line");
            }
        }
    }
    hits
}
