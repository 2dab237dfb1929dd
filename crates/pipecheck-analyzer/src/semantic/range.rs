use pipecheck_common::{Position, Range};

use crate::ast::NodeKind;

/// Map a range relative to a scalar node's text onto document coordinates.
///
/// Lines always shift by the node's start line. Characters shift by the
/// node's start column for inline scalars only: block scalar text keeps the
/// indentation of its continuation lines, so its relative characters are
/// already absolute.
pub fn compose_range(kind: NodeKind, node_start: Position, relative: Range) -> Range {
    let column_shift = match kind {
        NodeKind::BlockScalar => 0,
        _ => node_start.character,
    };
    let shift = |pos: Position| Position {
        line: pos.line.saturating_add(node_start.line),
        character: pos.character.saturating_add(column_shift),
    };
    Range::new(shift(relative.start), shift(relative.end))
}
