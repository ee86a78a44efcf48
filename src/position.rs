//! Conversion between server comment anchors and editor coordinates.
//!
//! Azure DevOps anchors threads with 1-based `(line, offset)` positions;
//! editors index from 0 on both axes. The conversion is the same for the
//! left and right side of a diff.

use serde::{Deserialize, Serialize};

/// A server-side anchor position, 1-based on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPosition {
    pub line: u32,
    pub offset: u32,
}

/// A 0-based editor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EditorPosition {
    pub line: u32,
    pub character: u32,
}

/// A 0-based editor range, start inclusive, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorRange {
    pub start: EditorPosition,
    pub end: EditorPosition,
}

impl EditorRange {
    pub fn new(start: EditorPosition, end: EditorPosition) -> Self {
        Self { start, end }
    }
}

/// Convert a pair of server anchors into an editor range.
///
/// Both anchors must be present for the range to exist; a side missing
/// either end is not decorable and yields `None`.
pub fn to_editor_range(
    start: Option<CommentPosition>,
    end: Option<CommentPosition>,
) -> Option<EditorRange> {
    let (start, end) = (start?, end?);
    Some(EditorRange {
        start: to_editor_position(start),
        end: to_editor_position(end),
    })
}

pub fn to_editor_position(position: CommentPosition) -> EditorPosition {
    EditorPosition {
        line: position.line.saturating_sub(1),
        character: position.offset.saturating_sub(1),
    }
}

/// Inverse mapping, applied when submitting a new thread.
pub fn to_server_positions(range: EditorRange) -> (CommentPosition, CommentPosition) {
    (
        to_server_position(range.start),
        to_server_position(range.end),
    )
}

pub fn to_server_position(position: EditorPosition) -> CommentPosition {
    CommentPosition {
        line: position.line + 1,
        offset: position.character + 1,
    }
}
