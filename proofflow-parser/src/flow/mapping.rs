//! Position mapping between serialized text and areas
//!
//!     The language server only ever sees the flat serialization of a document. This module
//!     assigns every area the range its content occupies in that serialization, and converts
//!     positions inside a range to offsets into the area's own content and back.
//!
//! Computing Bounds
//!
//!     [compute_bounds] serializes the areas once, then folds over them with a byte cursor. For
//!     each area it searches the area's own serialization from the cursor onwards, so identical
//!     content in two areas resolves by document order:
//!
//!         match      = full[cursor..].find(serialize(area))
//!         range      = match + len(prefix) .. match + len(serialized) - len(suffix)
//!         children   = the same fold over the leaves, starting at range.start
//!         cursor'    = match + len(serialized)
//!
//!     Titled collapsibles use the title-substituted prefix. A failed search is reported as
//!     [MappingError::AreaNotFound]; it cannot happen for a tree serialized with the same grammar
//!     but the fold does not assume it.
//!
//! Local Offsets
//!
//!     Positions use zero-based lines and UTF-16 columns. Local offsets are byte offsets into the
//!     area's content and always fall on a char boundary. Only the area's own content and range
//!     are consulted, never sibling areas. Containers have no content of their own (a
//!     collapsible's content is its title, which does not sit inside its range), so offsets are
//!     only defined for leaves.

use super::ast::area::{Area, AreaType, LeafArea};
use super::ast::document::{AreaRef, ProofFlowDocument};
use super::ast::ids::AreaId;
use super::ast::range::{byte_offset_for_character, utf16_len, Position, Range, SourceLocation};
use super::output::OutputConfig;
use super::serializer::{serialize_area, serialize_leaf};
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("{area_type} area {id} not found in serialized text after byte {cursor}")]
    AreaNotFound {
        id: AreaId,
        area_type: AreaType,
        cursor: usize,
    },
}

/// Range of one top-level area and of its children, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaBounds {
    pub id: AreaId,
    pub range: Range,
    pub children: Vec<(AreaId, Range)>,
}

/// Ranges for a whole area list, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundsTable {
    areas: Vec<AreaBounds>,
}

impl BoundsTable {
    pub fn areas(&self) -> &[AreaBounds] {
        &self.areas
    }

    /// Every range, containers before their children
    pub fn iter(&self) -> impl Iterator<Item = (AreaId, &Range)> {
        self.areas.iter().flat_map(|bounds| {
            std::iter::once((bounds.id, &bounds.range)).chain(
                bounds
                    .children
                    .iter()
                    .map(|(id, range)| (*id, range)),
            )
        })
    }

    pub fn get(&self, id: AreaId) -> Option<&Range> {
        self.iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, range)| range)
    }

    pub fn len(&self) -> usize {
        self.areas
            .iter()
            .map(|bounds| 1 + bounds.children.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

struct Located {
    range: Range,
    next_cursor: usize,
}

fn locate(
    serialized: &str,
    prefix_len: usize,
    suffix_len: usize,
    full: &str,
    location: &SourceLocation<'_>,
    cursor: usize,
) -> Option<Located> {
    let found = full.get(cursor..)?.find(serialized)? + cursor;
    let span = found + prefix_len..found + serialized.len() - suffix_len;
    Some(Located {
        range: location.byte_range_to_range(&span),
        next_cursor: found + serialized.len(),
    })
}

fn locate_leaves(
    leaves: &[LeafArea],
    config: &OutputConfig,
    full: &str,
    location: &SourceLocation<'_>,
    start: usize,
) -> Result<Vec<(AreaId, Range)>, MappingError> {
    let (children, _) = leaves.iter().try_fold(
        (Vec::with_capacity(leaves.len()), start),
        |(mut children, cursor), leaf| {
            let delimiters = config.delimiters(leaf.kind().into());
            let located = locate(
                &serialize_leaf(leaf, config),
                delimiters.prefix.len(),
                delimiters.suffix.len(),
                full,
                location,
                cursor,
            )
            .ok_or(MappingError::AreaNotFound {
                id: leaf.id(),
                area_type: leaf.kind().into(),
                cursor,
            })?;
            children.push((leaf.id(), located.range));
            Ok::<_, MappingError>((children, located.next_cursor))
        },
    )?;
    Ok(children)
}

fn locate_area(
    area: &Area,
    config: &OutputConfig,
    full: &str,
    location: &SourceLocation<'_>,
    cursor: usize,
) -> Result<(AreaBounds, usize), MappingError> {
    let (prefix_len, suffix_len) = match area {
        Area::Leaf(leaf) => {
            let delimiters = config.delimiters(leaf.kind().into());
            (delimiters.prefix.len(), delimiters.suffix.len())
        }
        Area::Collapsible(collapsible) => (
            config.collapsible_prefix(collapsible.title()).len(),
            config.collapsible_suffix(collapsible.title()).len(),
        ),
        Area::Input(_) => (config.input.prefix.len(), config.input.suffix.len()),
    };
    let located = locate(
        &serialize_area(area, config),
        prefix_len,
        suffix_len,
        full,
        location,
        cursor,
    )
    .ok_or(MappingError::AreaNotFound {
        id: area.id(),
        area_type: area.area_type(),
        cursor,
    })?;
    let children = locate_leaves(
        area.children(),
        config,
        full,
        location,
        located.range.span.start,
    )?;
    let bounds = AreaBounds {
        id: area.id(),
        range: located.range,
        children,
    };
    Ok((bounds, located.next_cursor))
}

/// Ranges of `areas` inside their concatenated serialization under `config`
pub fn compute_bounds(areas: &[Area], config: &OutputConfig) -> Result<BoundsTable, MappingError> {
    let full: String = areas
        .iter()
        .map(|area| serialize_area(area, config))
        .collect();
    let location = SourceLocation::new(&full);
    let (bounds, _) = areas.iter().try_fold(
        (Vec::with_capacity(areas.len()), 0),
        |(mut bounds, cursor), area| {
            let (area_bounds, next_cursor) = locate_area(area, config, &full, &location, cursor)?;
            trace!(id = %area_bounds.id, range = %area_bounds.range, "located area");
            bounds.push(area_bounds);
            Ok::<_, MappingError>((bounds, next_cursor))
        },
    )?;
    Ok(BoundsTable { areas: bounds })
}

/// Byte offset into `content` for a document position inside `range`
pub fn offset_in_content(content: &str, range: &Range, pos: Position) -> Option<usize> {
    if !range.contains(pos) {
        return None;
    }
    let local_line = pos.line - range.start.line;
    let column = if local_line == 0 {
        pos.character.checked_sub(range.start.character)?
    } else {
        pos.character
    };
    let mut offset = 0;
    for (index, line) in content.split('\n').enumerate() {
        if index == local_line {
            return Some(offset + byte_offset_for_character(line, column));
        }
        offset += line.len() + 1;
    }
    None
}

/// Document position of byte `offset` into `content`, given the content's `range`
pub fn position_in_content(content: &str, range: &Range, offset: usize) -> Option<Position> {
    let before = content.get(..offset)?;
    let local_line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
    let column = utf16_len(&before[line_start..]);
    let character = if local_line == 0 {
        range.start.character + column
    } else {
        column
    };
    Some(Position::new(range.start.line + local_line, character))
}

impl ProofFlowDocument {
    /// Recompute the range of every area and sub-area for the current grammar
    pub fn update_bounds(&mut self) -> Result<(), MappingError> {
        let table = match compute_bounds(self.areas(), self.output_config()) {
            Ok(table) => table,
            Err(err) => {
                warn!(uri = %self.uri(), error = %err, "bounds computation failed");
                self.invalidate_bounds();
                return Err(err);
            }
        };
        for (area, bounds) in self.areas_for_bounds().iter_mut().zip(table.areas) {
            area.set_range(Some(bounds.range));
            for (child, (_, range)) in area.children_mut().iter_mut().zip(bounds.children) {
                child.set_range(Some(range));
            }
        }
        self.mark_bounds_valid();
        debug!(uri = %self.uri(), areas = self.areas().len(), "bounds updated");
        Ok(())
    }

    /// Switch the output grammar and recompute every range
    pub fn set_output_config(&mut self, output_config: OutputConfig) -> Result<(), MappingError> {
        self.replace_output_config(output_config);
        self.update_bounds()
    }

    /// Innermost area whose range contains `pos`; the first in document order on ties
    pub fn area_at(&self, pos: Position) -> Option<AreaRef<'_>> {
        self.locate(pos, Range::contains)
    }

    /// Innermost area holding the character at `pos`
    ///
    /// Unlike [`area_at`](Self::area_at), a position on the boundary between two adjacent
    /// areas belongs to the area that starts there. Only a position no range holds half-open
    /// (the end of the document, an empty area) falls back to inclusive ends.
    pub fn area_starting_at(&self, pos: Position) -> Option<AreaRef<'_>> {
        self.locate(pos, Range::contains_half_open)
            .or_else(|| self.area_at(pos))
    }

    fn locate(
        &self,
        pos: Position,
        contains: fn(&Range, Position) -> bool,
    ) -> Option<AreaRef<'_>> {
        let holds = |range: Option<&Range>, test: fn(&Range, Position) -> bool| {
            range.is_some_and(|range| test(range, pos))
        };
        let area = self
            .areas()
            .iter()
            .find(|area| holds(area.range(), contains))?;
        let child = area
            .children()
            .iter()
            .find(|leaf| holds(leaf.range(), contains))
            .or_else(|| {
                area.children()
                    .iter()
                    .find(|leaf| holds(leaf.range(), Range::contains))
            });
        Some(match child {
            Some(leaf) => AreaRef::Child { parent: area, leaf },
            None => AreaRef::Top(area),
        })
    }

    /// Local content offset of `pos` inside the leaf `id`
    pub fn get_offset(&self, id: AreaId, pos: Position) -> Option<usize> {
        self.find(id)?.offset_of(pos)
    }

    /// Document position of the local content offset `offset` inside the leaf `id`
    pub fn get_position(&self, id: AreaId, offset: usize) -> Option<Position> {
        self.find(id)?.position_of(offset)
    }
}

impl<'a> AreaRef<'a> {
    pub fn offset_of(&self, pos: Position) -> Option<usize> {
        if self.area_type().is_container() {
            return None;
        }
        offset_in_content(self.content(), self.range()?, pos)
    }

    pub fn position_of(&self, offset: usize) -> Option<Position> {
        if self.area_type().is_container() {
            return None;
        }
        position_in_content(self.content(), self.range()?, offset)
    }
}
