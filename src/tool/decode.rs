//! Decoder for `go-find-references` stdout.
//!
//! The tool prints one pair of lines per match: a primary line in the form
//! `path:line:column`, followed by a companion line whose contents are not
//! interpreted here. Pairs are decoded positionally.

use crate::error::{ReferencesError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// A location reported by the tool, before it is mapped to editor ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMatch {
    /// File as printed by the tool (may be relative).
    pub file: String,
    /// Line number as printed.
    pub line: u32,
    /// Column number as printed.
    pub column: u32,
}

/// How strictly companion lines are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Reject output whose pairs are out of step.
    #[default]
    Strict,
    /// Ignore companion lines entirely.
    Lenient,
}

/// Decode the tool's stdout into matches.
///
/// Primary lines that are not locations are skipped along with their
/// companion. In [`DecodeMode::Strict`], a location without a companion is
/// malformed, and so is a companion that is a bare location while the next
/// primary line is not one (the pairs have slipped by a line).
pub fn decode_output(stdout: &str, mode: DecodeMode) -> Result<Vec<ToolMatch>> {
    let lines: Vec<&str> = stdout
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut matches = Vec::new();

    for (pair_idx, pair) in lines.chunks(2).enumerate() {
        let primary = pair[0];
        let primary_number = pair_idx * 2 + 1;

        let Some(found) = parse_location(primary) else {
            if !primary.trim().is_empty() {
                log::debug!(
                    "Skipping unrecognised output line {}: {:?}",
                    primary_number,
                    primary
                );
            }
            continue;
        };

        if mode == DecodeMode::Strict {
            let Some(companion) = pair.get(1) else {
                return Err(ReferencesError::MalformedOutput {
                    line_number: primary_number,
                    line: primary.to_string(),
                    reason: "location has no companion line".to_string(),
                });
            };

            let next_primary = lines.get(primary_number + 1).copied().unwrap_or("");
            if is_bare_location(companion) && parse_location(next_primary).is_none() {
                return Err(ReferencesError::MalformedOutput {
                    line_number: primary_number + 1,
                    line: companion.to_string(),
                    reason: "companion line is a bare location; output pairs are out of step"
                        .to_string(),
                });
            }
        }

        matches.push(found);
    }

    Ok(matches)
}

fn location_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+):(\d+):(\d+)").expect("valid location pattern"))
}

fn bare_location_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+:\d+:\d+$").expect("valid location pattern"))
}

/// Whether `line` is nothing but a `path:line:column` location.
fn is_bare_location(line: &str) -> bool {
    bare_location_regex().is_match(line)
}

/// Parse a `path:line:column` prefix of a line.
///
/// The path is matched greedily, so the last `:<line>:<column>` pair wins and
/// drive-letter paths such as `C:/src/a.go:3:5` keep their first colon.
/// Anything after the column (`foo.go:3:5: found`) is ignored.
pub fn parse_location(line: &str) -> Option<ToolMatch> {
    let caps = location_regex().captures(line)?;
    let line_num = caps[2].parse::<u32>().ok()?;
    let column = caps[3].parse::<u32>().ok()?;

    Some(ToolMatch {
        file: caps[1].to_string(),
        line: line_num,
        column,
    })
}
