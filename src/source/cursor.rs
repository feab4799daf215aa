//! Read position within one source generation.

use std::path::{Path, PathBuf};

/// How far into a source file has been consumed.
///
/// The offset only moves forward while the cursor is valid. A cursor at
/// offset 0 still has the header record ahead of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCursor {
    path: PathBuf,
    offset: u64,
    header_pending: bool,
}

impl SourceCursor {
    /// Cursor at the beginning of `path`; the header is still unread.
    pub fn at_start(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            header_pending: true,
        }
    }

    /// Cursor past `baseline` bytes of existing content.
    pub fn at_offset(path: impl Into<PathBuf>, baseline: u64) -> Self {
        Self {
            path: path.into(),
            offset: baseline,
            header_pending: baseline == 0,
        }
    }

    /// Source this cursor belongs to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes already consumed.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns true if the next record read is the header.
    pub fn header_pending(&self) -> bool {
        self.header_pending
    }

    /// Record that `consumed` more bytes were read, including the header
    /// when `header_read` is set.
    pub fn advance(&mut self, consumed: u64, header_read: bool) {
        self.offset += consumed;
        if header_read {
            self.header_pending = false;
        }
    }

    /// Rebase after the file shrank underneath the cursor.
    pub fn reset_to(&mut self, len: u64) {
        self.offset = len;
        self.header_pending = len == 0;
    }
}
