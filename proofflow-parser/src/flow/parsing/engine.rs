//! Earliest-match region engine
//!
//!     Parses any [Grammar] by repeatedly locating the earliest region start in the remaining
//!     text:
//!
//!         1. Everything before the start becomes an area of the grammar's default kind.
//!         2. A leaf region runs to the first end match; its content is the text in between.
//!         3. A container region runs to its matching end (same-type starts in between nest),
//!            and its content is parsed again, one level down.
//!         4. Without any further start, the rest becomes a default area.
//!
//!     Parsing never fails. A region whose end marker is missing absorbs the rest of its input.
//!     A container found one level down cannot be represented and is demoted to a Text leaf
//!     holding its raw source, markers included.
//!
//!     Empty default regions are dropped; whitespace between regions is kept as it is, so
//!     canonical serializations come back byte for byte.

use super::grammar::{Grammar, RegionRule};
use crate::flow::ast::area::{Area, AreaType, CollapsibleArea, InputArea, LeafArea, LeafKind};
use crate::flow::ast::ids::IdCounter;
use regex::Match;
use tracing::trace;

struct RegionStart<'g> {
    rule: &'g RegionRule,
    start: usize,
    end: usize,
    title: Option<String>,
}

fn earliest_start<'g>(grammar: &'g Grammar, text: &str, from: usize) -> Option<RegionStart<'g>> {
    grammar
        .rules
        .iter()
        .filter_map(|rule| {
            let caps = rule.start.captures_at(text, from)?;
            let whole = caps.get(0)?;
            Some(RegionStart {
                rule,
                start: whole.start(),
                end: whole.end(),
                title: caps.name("title").map(|title| title.as_str().to_string()),
            })
        })
        .filter(|region| region.end > region.start)
        .min_by_key(|region| region.start)
}

/// End of the region opened by `rule`, scanning from `from`
fn find_end<'t>(rule: &RegionRule, text: &'t str, from: usize) -> Option<Match<'t>> {
    if !rule.area_type.is_container() {
        return rule.end.find_at(text, from);
    }
    let mut depth = 0usize;
    let mut cursor = from;
    loop {
        let end = rule.end.find_at(text, cursor)?;
        match rule.start.find_at(text, cursor) {
            Some(start) if start.start() < end.start() => {
                depth += 1;
                cursor = start.end();
            }
            _ if depth == 0 => return Some(end),
            _ => {
                depth -= 1;
                cursor = end.end();
            }
        }
    }
}

struct Engine<'g, 'i> {
    grammar: &'g Grammar,
    ids: &'i mut IdCounter,
}

impl Engine<'_, '_> {
    fn push_default(&mut self, areas: &mut Vec<Area>, text: &str) {
        if !text.is_empty() {
            let leaf = LeafArea::new(self.ids.next_id(), self.grammar.default_kind, text);
            areas.push(leaf.into());
        }
    }

    fn children(&mut self, content: &str) -> Vec<LeafArea> {
        self.parse_level(content, true)
            .into_iter()
            .filter_map(|area| LeafArea::try_from(area).ok())
            .collect()
    }

    fn parse_level(&mut self, text: &str, nested: bool) -> Vec<Area> {
        let mut areas = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let Some(region) = earliest_start(self.grammar, text, pos) else {
                self.push_default(&mut areas, &text[pos..]);
                break;
            };
            self.push_default(&mut areas, &text[pos..region.start]);

            let (content, next) = match find_end(region.rule, text, region.end) {
                Some(end) => (&text[region.end..end.start()], end.end()),
                None => {
                    trace!(
                        grammar = self.grammar.name,
                        area_type = %region.rule.area_type,
                        offset = region.start,
                        "unterminated region absorbs the remainder"
                    );
                    (&text[region.end..], text.len())
                }
            };

            let area = match LeafKind::try_from(region.rule.area_type) {
                Ok(kind) => LeafArea::new(self.ids.next_id(), kind, content).into(),
                Err(_) if nested => {
                    trace!(
                        grammar = self.grammar.name,
                        offset = region.start,
                        "nested container demoted to text"
                    );
                    Area::text(self.ids.next_id(), &text[region.start..next])
                }
                Err(_) => {
                    let id = self.ids.next_id();
                    let children = self.children(content);
                    match region.rule.area_type {
                        AreaType::Collapsible => {
                            CollapsibleArea::new(id, region.title.unwrap_or_default())
                                .with_children(children)
                                .into()
                        }
                        _ => InputArea::new(id).with_children(children).into(),
                    }
                }
            };
            areas.push(area);
            pos = next;
        }
        areas
    }
}

/// Parse `source` with a region grammar, allocating ids from `ids` in document order
pub fn parse_with(grammar: &Grammar, source: &str, ids: &mut IdCounter) -> Vec<Area> {
    Engine { grammar, ids }.parse_level(source, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::parsing::grammar::{COQ, COQMD, PURE_LEAN};

    fn parse(grammar: &Grammar, source: &str) -> Vec<Area> {
        parse_with(grammar, source, &mut IdCounter::new())
    }

    fn summary(areas: &[Area]) -> Vec<(AreaType, String)> {
        areas
            .iter()
            .map(|area| (area.area_type(), area.content().to_string()))
            .collect()
    }

    #[test]
    fn test_coq_comments_and_code() {
        let areas = parse(&COQ, "(** Intro *)Lemma l : True.(** $$x$$ *)");
        assert_eq!(
            summary(&areas),
            vec![
                (AreaType::Text, "Intro".to_string()),
                (AreaType::Code, "Lemma l : True.".to_string()),
                (AreaType::Math, "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_math_wins_tie_with_text() {
        let areas = parse(&COQ, "(** $$a + b$$ *)");
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].area_type(), AreaType::Math);
        assert_eq!(areas[0].content(), "a + b");
    }

    #[test]
    fn test_titled_collapsible() {
        let areas = parse(
            &COQ,
            "(* begin details : Hint *)(** Try this *)auto.(* end details *)",
        );
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].area_type(), AreaType::Collapsible);
        assert_eq!(areas[0].content(), "Hint");
        let children: Vec<&str> = areas[0].children().iter().map(|c| c.content()).collect();
        assert_eq!(children, vec!["Try this", "auto."]);
    }

    #[test]
    fn test_ids_follow_document_order() {
        let mut ids = IdCounter::starting_at(5);
        let areas = parse_with(
            &COQMD,
            "intro<input-area>$$x$$</input-area>outro",
            &mut ids,
        );
        assert_eq!(areas[0].id().get(), 5);
        assert_eq!(areas[1].id().get(), 6);
        assert_eq!(areas[1].children()[0].id().get(), 7);
        assert_eq!(areas[2].id().get(), 8);
        assert_eq!(ids.peek().get(), 9);
    }

    #[test]
    fn test_unterminated_region_absorbs_rest() {
        let areas = parse(&COQ, "Qed.(** dangling text");
        assert_eq!(
            summary(&areas),
            vec![
                (AreaType::Code, "Qed.".to_string()),
                (AreaType::Text, "dangling text".to_string()),
            ]
        );

        let areas = parse(&COQMD, "<hint title=\"H\">$$x$$ and more");
        assert_eq!(areas.len(), 1);
        let children: Vec<&str> = areas[0].children().iter().map(|c| c.content()).collect();
        assert_eq!(children, vec!["x", " and more"]);
    }

    #[test]
    fn test_nested_container_is_demoted() {
        let source = "<input-area>a<hint>b</hint>c</input-area>";
        let areas = parse(&COQMD, source);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].area_type(), AreaType::Input);
        let children: Vec<(LeafKind, &str)> = areas[0]
            .children()
            .iter()
            .map(|c| (c.kind(), c.content()))
            .collect();
        assert_eq!(
            children,
            vec![
                (LeafKind::Text, "a"),
                (LeafKind::Text, "<hint>b</hint>"),
                (LeafKind::Text, "c"),
            ]
        );
    }

    #[test]
    fn test_same_type_nesting_matches_outer_end() {
        let source = "<hint>x<hint>y</hint>z</hint>tail";
        let areas = parse(&COQMD, source);
        assert_eq!(areas.len(), 2);
        let children: Vec<&str> = areas[0].children().iter().map(|c| c.content()).collect();
        assert_eq!(children, vec!["x", "<hint>y</hint>", "z"]);
        assert_eq!(areas[1].content(), "tail");
    }

    #[test]
    fn test_whitespace_regions_are_kept() {
        let areas = parse(&PURE_LEAN, "/-! a -/\n/-! b -/");
        assert_eq!(
            summary(&areas),
            vec![
                (AreaType::Text, "a".to_string()),
                (AreaType::Code, "\n".to_string()),
                (AreaType::Text, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse(&COQ, "").is_empty());
        assert!(parse(&COQMD, "").is_empty());
    }
}
