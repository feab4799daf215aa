//! Chat log sources.
//!
//! A source is an append-only CSV file in a watched directory. The newest
//! matching file is the current source generation; the [`SourceTailer`]
//! follows it and switches when a newer one appears.

mod cursor;
mod record;
mod tailer;

pub use cursor::SourceCursor;
pub use record::{ParsedChunk, RecordBoundary, TEXT_COLUMN, complete_prefix_len, parse_chunk};
pub use tailer::{SourceTailer, TailerConfig};
