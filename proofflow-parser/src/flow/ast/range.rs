//! Position and range tracking inside serialized documents
//!
//! This module defines the data structures for representing positions and ranges in the
//! serialized text of a document, as well as utilities for converting byte offsets to
//! line/character positions.
//!
//! ## Types
//!
//! - [`Position`] - A line:character position
//! - [`Range`] - A range with start/end positions and the byte span it covers
//! - [`SourceLocation`] - Utility for converting between byte offsets and positions
//!
//! ## Conventions
//!
//! Positions follow the language server protocol: lines and characters are zero-based and
//! characters count UTF-16 code units. Byte spans are kept alongside so callers can slice the
//! serialized string without re-deriving offsets. A range's end is exclusive in the span, but
//! [`Range::contains`] accepts the end position so a cursor placed right after the last
//! character still belongs to the area.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range as ByteRange;

/// A line:character position in serialized text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// The region an area's content occupies in the serialized document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub span: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { span, start, end }
    }

    /// Check if a position is contained within this range (both ends inclusive)
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Check if a position is contained within this range, end excluded
    pub fn contains_half_open(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if another range overlaps with this range
    pub fn overlaps(&self, other: &Range) -> bool {
        self.contains(other.start)
            || self.contains(other.end)
            || other.contains(self.start)
            || other.contains(self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.span.start == self.span.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Number of UTF-16 code units needed to encode `text`
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte offset inside `line` reached after `character` UTF-16 code units.
///
/// Columns past the end of the line clamp to the line length; a column landing in the middle
/// of a surrogate pair resolves to the start of that character.
pub fn byte_offset_for_character(line: &str, character: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in line.char_indices() {
        let width = ch.len_utf16();
        if units + width > character {
            return idx;
        }
        units += width;
    }
    line.len()
}

/// Provides conversion between byte offsets and line/character positions
#[derive(Debug, Clone)]
pub struct SourceLocation<'a> {
    source: &'a str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl<'a> SourceLocation<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a line/character position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let byte_offset = byte_offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);
        let line_start = self.line_starts[line];
        let character = utf16_len(&self.source[line_start..byte_offset]);
        Position::new(line, character)
    }

    /// Convert a position back to a byte offset, `None` when the line does not exist
    pub fn position_to_byte(&self, position: Position) -> Option<usize> {
        let start = self.line_start(position.line)?;
        let end = self
            .line_start(position.line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        let line = &self.source[start..end];
        Some(start + byte_offset_for_character(line, position.character))
    }

    /// Convert a byte range to a [`Range`]
    pub fn byte_range_to_range(&self, range: &ByteRange<usize>) -> Range {
        Range::new(
            range.clone(),
            self.byte_to_position(range.start),
            self.byte_to_position(range.end),
        )
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the byte offset for the start of a line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }
}
