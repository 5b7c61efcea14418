//! Lean block parser
//!
//!     Lean documents are line oriented. A block opens with a `:::kind` line and closes with a
//!     line holding only `:::`:
//!
//!         :::text             :::collapsible        :::input
//!         Some prose          # Optional title      :::code
//!         :::                 :::code               sorry
//!                             simp                  :::
//!                             :::                   :::
//!                             :::
//!
//!     Leaf content is the lines between opener and closer, joined with `\n`. Containers hold
//!     leaf blocks up to their own closer. The closers are identical, so containers are scanned
//!     block by block rather than by searching for a marker.
//!
//!     Like the region engine this never fails: blank lines between blocks are skipped, stray
//!     lines become Text, an unterminated block absorbs the rest of the input, and a container
//!     opened inside a container is demoted to a Text leaf holding its raw lines.

use crate::flow::ast::area::{Area, CollapsibleArea, InputArea, LeafArea, LeafKind};
use crate::flow::ast::ids::IdCounter;
use tracing::trace;

const CLOSER: &str = ":::";
const TITLE_MARKER: &str = "# ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    Leaf(LeafKind),
    Collapsible,
    Input,
}

fn opener(line: &str) -> Option<Opener> {
    match line.trim_end() {
        ":::text" => Some(Opener::Leaf(LeafKind::Text)),
        ":::code" => Some(Opener::Leaf(LeafKind::Code)),
        ":::math" => Some(Opener::Leaf(LeafKind::Math)),
        ":::collapsible" => Some(Opener::Collapsible),
        ":::input" => Some(Opener::Input),
        _ => None,
    }
}

fn is_closer(line: &str) -> bool {
    line.trim_end() == CLOSER
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

struct LeanParser<'s, 'i> {
    lines: Vec<&'s str>,
    pos: usize,
    ids: &'i mut IdCounter,
}

impl<'s> LeanParser<'s, '_> {
    fn peek(&self) -> Option<&'s str> {
        self.lines.get(self.pos).copied()
    }

    fn document(&mut self) -> Vec<Area> {
        let mut areas = Vec::new();
        while let Some(line) = self.peek() {
            match opener(line) {
                Some(Opener::Leaf(kind)) => areas.push(self.leaf(kind).into()),
                Some(container) => areas.push(self.container(container)),
                None if is_blank(line) => self.pos += 1,
                None => areas.push(self.stray_text().into()),
            }
        }
        areas
    }

    /// Body lines of a leaf block up to its closer; the opener has not been consumed
    fn leaf(&mut self, kind: LeafKind) -> LeafArea {
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|line| !is_closer(line)) {
            self.pos += 1;
        }
        let content = self.lines[start..self.pos].join("\n");
        if self.peek().is_some() {
            self.pos += 1;
        } else {
            trace!(kind = ?kind, "unterminated lean block absorbs the remainder");
        }
        LeafArea::new(self.ids.next_id(), kind, content)
    }

    fn container(&mut self, kind: Opener) -> Area {
        let id = self.ids.next_id();
        self.pos += 1;
        let mut title = String::new();
        if kind == Opener::Collapsible {
            if let Some(rest) = self.peek().and_then(|line| line.strip_prefix(TITLE_MARKER)) {
                title = rest.trim_end().to_string();
                self.pos += 1;
            }
        }

        let mut children = Vec::new();
        while let Some(line) = self.peek() {
            if is_closer(line) {
                self.pos += 1;
                break;
            }
            match opener(line) {
                Some(Opener::Leaf(kind)) => children.push(self.leaf(kind)),
                Some(_) => children.push(self.demoted_container()),
                None if is_blank(line) => self.pos += 1,
                None => children.push(self.stray_text()),
            }
        }

        match kind {
            Opener::Collapsible => CollapsibleArea::new(id, title)
                .with_children(children)
                .into(),
            _ => InputArea::new(id).with_children(children).into(),
        }
    }

    /// A container inside a container, kept as its raw lines
    fn demoted_container(&mut self) -> LeafArea {
        let start = self.pos;
        self.pos += 1;
        while let Some(line) = self.peek() {
            self.pos += 1;
            if is_closer(line) {
                break;
            }
            if let Some(Opener::Leaf(_)) = opener(line) {
                while self.peek().is_some_and(|line| !is_closer(line)) {
                    self.pos += 1;
                }
                if self.peek().is_some() {
                    self.pos += 1;
                }
            }
        }
        trace!(line = start, "nested lean container demoted to text");
        let raw = self.lines[start..self.pos].join("\n");
        LeafArea::new(self.ids.next_id(), LeafKind::Text, raw)
    }

    /// Consecutive lines outside any block; always consumes at least one line
    fn stray_text(&mut self) -> LeafArea {
        let start = self.pos;
        self.pos += 1;
        while self
            .peek()
            .is_some_and(|line| !is_blank(line) && !is_closer(line) && opener(line).is_none())
        {
            self.pos += 1;
        }
        let content = self.lines[start..self.pos].join("\n");
        LeafArea::new(self.ids.next_id(), LeafKind::Text, content)
    }
}

/// Parse Lean block syntax, allocating ids from `ids` in document order
pub fn parse_lean(source: &str, ids: &mut IdCounter) -> Vec<Area> {
    LeanParser {
        lines: source.lines().collect(),
        pos: 0,
        ids,
    }
    .document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::ast::area::AreaType;

    fn parse(source: &str) -> Vec<Area> {
        parse_lean(source, &mut IdCounter::new())
    }

    #[test]
    fn test_leaf_blocks() {
        let areas = parse(":::text\nIntro\n:::\n\n:::code\ntheorem t : True := by\n  trivial\n:::\n");
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].area_type(), AreaType::Text);
        assert_eq!(areas[0].content(), "Intro");
        assert_eq!(areas[1].content(), "theorem t : True := by\n  trivial");
    }

    #[test]
    fn test_collapsible_with_title() {
        let source = ":::collapsible\n# Hint\n:::text\nUse simp.\n:::\n:::code\nsimp\n:::\n:::\n";
        let areas = parse(source);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].area_type(), AreaType::Collapsible);
        assert_eq!(areas[0].content(), "Hint");
        let children: Vec<&str> = areas[0].children().iter().map(|c| c.content()).collect();
        assert_eq!(children, vec!["Use simp.", "simp"]);
    }

    #[test]
    fn test_input_and_untitled_collapsible() {
        let source = ":::input\n:::code\nsorry\n:::\n:::\n:::collapsible\n:::math\nx\n:::\n:::\n";
        let areas = parse(source);
        assert_eq!(areas[0].area_type(), AreaType::Input);
        assert_eq!(areas[0].children()[0].content(), "sorry");
        assert_eq!(areas[1].content(), "");
        assert_eq!(areas[1].children()[0].kind(), LeafKind::Math);
    }

    #[test]
    fn test_nested_container_is_demoted() {
        let source = ":::input\n:::collapsible\n# Inner\n:::code\nrfl\n:::\n:::\n:::code\nsimp\n:::\n:::\n";
        let areas = parse(source);
        assert_eq!(areas.len(), 1);
        let children = areas[0].children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].kind(), LeafKind::Text);
        assert_eq!(
            children[0].content(),
            ":::collapsible\n# Inner\n:::code\nrfl\n:::\n:::"
        );
        assert_eq!(children[1].content(), "simp");
    }

    #[test]
    fn test_unterminated_block_absorbs_rest() {
        let areas = parse(":::code\nexample : 1 = 1 := rfl\n\n-- trailing");
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].content(), "example : 1 = 1 := rfl\n\n-- trailing");
    }

    #[test]
    fn test_stray_lines_become_text() {
        let areas = parse("loose line\nmore\n\n:::\n:::math\ny\n:::");
        let summary: Vec<(AreaType, &str)> = areas
            .iter()
            .map(|area| (area.area_type(), area.content()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (AreaType::Text, "loose line\nmore"),
                (AreaType::Text, ":::"),
                (AreaType::Math, "y"),
            ]
        );
    }

    #[test]
    fn test_crlf_and_empty_content() {
        let areas = parse(":::code\r\n\r\n:::\r\n:::text\r\na\r\nb\r\n:::\r\n");
        assert_eq!(areas[0].content(), "");
        assert_eq!(areas[1].content(), "a\nb");
    }
}
