//! Start-of-line offset table for location lookups

use crate::types::Location;

/// Precomputed start-of-line offsets for a source buffer
///
/// Stores the byte offset at which each line begins. `line_starts[i]` is
/// the first byte of line `i + 1` (lines are 1-indexed); the first entry is
/// always 0. Built with a single linear scan, after which offset-to-location
/// lookups run in O(log n) via binary search.
///
/// All three line-ending conventions are recognized: LF, CRLF, and bare CR
/// each terminate a line, and CRLF counts as a single terminator. A buffer
/// that is identical except for its line-ending style therefore yields the
/// same (line, column) for every position of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first byte of each line, strictly increasing.
    line_starts: Vec<usize>,

    /// Number of bytes scanned (stops early at an embedded NUL).
    len: usize,
}

impl LineIndex {
    /// Build a line index by scanning a source buffer once.
    ///
    /// An embedded NUL byte ends the scan: sources handed over as
    /// C-style strings are only meaningful up to their terminator.
    ///
    /// # Example
    ///
    /// ```
    /// use cantus_source_map::LineIndex;
    ///
    /// let index = LineIndex::new(b"line 1\nline 2\nline 3");
    /// assert_eq!(index.line_count(), 3);
    /// ```
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        let mut pos = 0;

        while pos < source.len() {
            match source[pos] {
                0 => break,
                b'\n' => {
                    pos += 1;
                    line_starts.push(pos);
                }
                b'\r' => {
                    // CRLF is one terminator; the next line starts after the LF
                    pos += if source.get(pos + 1) == Some(&b'\n') { 2 } else { 1 };
                    line_starts.push(pos);
                }
                _ => pos += 1,
            }
        }

        LineIndex {
            line_starts,
            len: pos,
        }
    }

    /// Convert a byte offset to a 1-indexed line/column pair.
    ///
    /// Uses binary search to find the line containing the offset.
    /// Runs in O(log n) time where n is the number of lines.
    ///
    /// # Example
    ///
    /// ```
    /// use cantus_source_map::LineIndex;
    ///
    /// let index = LineIndex::new(b"hello\nworld");
    /// let loc = index.location(6);
    /// assert_eq!(loc.line, 2);
    /// assert_eq!(loc.column, 1);
    /// ```
    pub fn location(&self, offset: usize) -> Location {
        // Greatest i with line_starts[i] <= offset. The table always holds
        // at least one entry (0), so the subtraction cannot underflow.
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;

        Location {
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }

    /// Number of bytes covered by the index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the scanned source was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The start-of-line offset table, for inspection.
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }
}
