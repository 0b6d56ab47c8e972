//! Offset to line/column mapping.

use crate::token::Span;

/// Start offsets of every line in a source buffer.
///
/// Positions are always computed from an offset, so tokens that are
/// emitted out of source order (here-document bodies) still get a line
/// and column consistent with their offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(memchr::memchr_iter(b'\n', source.as_bytes()).map(|i| i + 1));
        Self { starts }
    }

    #[must_use]
    pub fn span(&self, offset: usize) -> Span {
        // starts[0] == 0, so at least one start is <= offset
        let line = self.starts.partition_point(|&start| start <= offset);
        let column = offset - self.starts[line - 1];
        Span {
            offset,
            line,
            column,
        }
    }
}
