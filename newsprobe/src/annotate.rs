//! Entity-span segmentation: turns a text plus its ordered entity mentions
//! into a sequence of plain and annotated segments for rendering.

use serde::Serialize;
use thiserror::Error;

use crate::inference::EntityMention;
use crate::labels::{EntityType, UnknownEntityType};

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error(transparent)]
    UnknownEntityType(#[from] UnknownEntityType),
    #[error("entity span {start}..{end} is out of bounds for a text of {len} chars")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("entity span {start}..{end} overlaps the previous span ending at {cursor}")]
    Unordered { start: usize, end: usize, cursor: usize },
}

/// One rendering segment: either a bare text run or an annotated entity
/// span with its type and highlight color.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Plain { text: String },
    Entity {
        text: String,
        entity_type: EntityType,
        color: &'static str,
    },
}

/// Walk the ordered mention sequence and segment `text`.
///
/// Offsets are character offsets, end-exclusive. Concatenating the emitted
/// segment texts in order reproduces `text` exactly. An entity group
/// outside the fixed 4-class set, an out-of-bounds span, or a span that
/// regresses behind the cursor is a hard error; none of these are
/// recoverable rendering states.
pub fn annotate(text: &str, mentions: &[EntityMention]) -> Result<Vec<Segment>, AnnotateError> {
    let char_len = text.chars().count();
    let mut segments = Vec::with_capacity(mentions.len() * 2 + 1);
    let mut cursor = 0usize;

    for mention in mentions {
        if mention.start < cursor {
            return Err(AnnotateError::Unordered {
                start: mention.start,
                end: mention.end,
                cursor,
            });
        }
        if mention.end < mention.start || mention.end > char_len {
            return Err(AnnotateError::OutOfBounds {
                start: mention.start,
                end: mention.end,
                len: char_len,
            });
        }

        let entity_type = EntityType::from_group(&mention.entity_group)?;

        let plain = slice_chars(text, cursor, mention.start);
        if !plain.is_empty() {
            segments.push(Segment::Plain { text: plain.to_string() });
        }
        // The annotated text is the exact substring of the input, not the
        // model's (possibly re-tokenized) surface form.
        segments.push(Segment::Entity {
            text: slice_chars(text, mention.start, mention.end).to_string(),
            entity_type,
            color: entity_type.color(),
        });
        cursor = mention.end;
    }

    let tail = slice_chars(text, cursor, char_len);
    if !tail.is_empty() {
        segments.push(Segment::Plain { text: tail.to_string() });
    }
    Ok(segments)
}

/// Slice by char offsets. Bounds are validated by the caller.
fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let byte_start = byte_at(text, start);
    let byte_end = byte_at(text, end);
    &text[byte_start..byte_end]
}

fn byte_at(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
        .unwrap_or(text.len())
}
