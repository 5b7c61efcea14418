//! Conversions between area-tree positions and `lsp-types`
//!
//!     Both sides count lines from zero and columns in UTF-16 code units, and ranges are end
//!     exclusive on both sides, so positions convert field by field.

use lsp_types::{Position, Range};
use proofflow_parser::flow::ast::{Position as AstPosition, Range as AstRange};

pub fn to_lsp_position(position: AstPosition) -> Position {
    Position::new(position.line as u32, position.character as u32)
}

pub fn to_lsp_range(range: &AstRange) -> Range {
    Range {
        start: to_lsp_position(range.start),
        end: to_lsp_position(range.end),
    }
}

pub fn from_lsp_position(position: Position) -> AstPosition {
    AstPosition::new(position.line as usize, position.character as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_convert_field_by_field() {
        let position = AstPosition::new(3, 5);
        assert_eq!(to_lsp_position(position), Position::new(3, 5));
        assert_eq!(from_lsp_position(Position::new(3, 5)), position);
    }

    #[test]
    fn test_range_conversion() {
        let range = AstRange::new(4..9, AstPosition::new(0, 4), AstPosition::new(1, 2));
        let lsp = to_lsp_range(&range);
        assert_eq!(lsp.start, Position::new(0, 4));
        assert_eq!(lsp.end, Position::new(1, 2));
    }
}
