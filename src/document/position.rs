//! Editor coordinates and their conversion to file offsets.

use ropey::{Rope, RopeSlice};
use serde::Serialize;

/// Location of a cursor in editor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Line number (0-based).
    pub line: u32,
    /// Column number (0-based, in characters).
    pub column: u32,
}

impl Position {
    /// Create a new position.
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Span between two positions on the same or different lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a new range.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range on a single line covering `width` columns from `start`.
    pub fn on_line(start: Position, width: u32) -> Self {
        Self {
            start,
            end: Position::new(start.line, start.column.saturating_add(width)),
        }
    }

    /// Width in columns (end column minus start column).
    pub fn width(&self) -> u32 {
        self.end.column.saturating_sub(self.start.column)
    }
}

/// Unit in which a cursor offset is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetEncoding {
    /// Count characters (Unicode scalar values).
    #[default]
    Chars,
    /// Count UTF-8 bytes.
    Bytes,
}

/// Offset of `position` from the start of `text`.
///
/// Line breaks count like any other character, so `\r\n` contributes two.
/// A column past the end of its line is clamped to the line's content.
/// Returns `None` when the line does not exist.
pub fn offset_at(text: &Rope, position: Position, encoding: OffsetEncoding) -> Option<usize> {
    let line_idx = position.line as usize;
    if line_idx >= text.len_lines() {
        return None;
    }

    let line = text.line(line_idx);
    let column = (position.column as usize).min(content_len(line));
    let char_idx = text.line_to_char(line_idx) + column;

    Some(match encoding {
        OffsetEncoding::Chars => char_idx,
        OffsetEncoding::Bytes => text.char_to_byte(char_idx),
    })
}

/// Range of the identifier touching `position`, if any.
///
/// The cursor may sit inside the word or directly after its last character.
pub fn word_range_at(text: &Rope, position: Position) -> Option<Range> {
    let line_idx = position.line as usize;
    if line_idx >= text.len_lines() {
        return None;
    }

    let line = text.line(line_idx);
    let len = content_len(line);
    let column = (position.column as usize).min(len);

    let mut start = column;
    while start > 0 && is_word_char(line.char(start - 1)) {
        start -= 1;
    }
    let mut end = column;
    while end < len && is_word_char(line.char(end)) {
        end += 1;
    }

    if start == end {
        return None;
    }

    Some(Range::new(
        Position::new(position.line, start as u32),
        Position::new(position.line, end as u32),
    ))
}

/// Go identifier characters.
fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Length of a line in characters, excluding its line break.
fn content_len(line: RopeSlice<'_>) -> usize {
    let mut len = line.len_chars();
    while len > 0 && is_line_break(line.char(len - 1)) {
        len -= 1;
    }
    len
}
