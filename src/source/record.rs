//! Chat log record parsing.
//!
//! Sources are CSV files with rows `time,nickname,user_id,text`. Only the
//! fourth column is displayed; extra columns are tolerated.

use csv::{ByteRecord, ReaderBuilder};
use log::debug;

use crate::error::Result;

/// Column holding the displayable text.
pub const TEXT_COLUMN: usize = 3;

/// Messages decoded from one chunk of a source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedChunk {
    /// Displayable texts in file order
    pub texts: Vec<String>,
    /// Bytes of complete records consumed from the chunk
    pub consumed: u64,
    /// Whether a header record was consumed
    pub header_read: bool,
    /// Records skipped as malformed or blank
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    FieldStart,
    Unquoted,
    Quoted,
    /// Saw a quote inside a quoted field: either the closing quote or the
    /// first half of an escaped `""`.
    QuoteInQuoted,
}

/// Finds record boundaries in CSV data fed in arbitrary pieces.
///
/// A quote opens a quoted field only at the start of a field; elsewhere it
/// is a literal character. Inside a quoted field `""` is an escaped quote.
#[derive(Debug, Clone)]
pub struct RecordBoundary {
    state: ScanState,
    scanned: u64,
    boundary: u64,
}

impl Default for RecordBoundary {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBoundary {
    pub fn new() -> Self {
        Self {
            state: ScanState::FieldStart,
            scanned: 0,
            boundary: 0,
        }
    }

    /// Scan the next piece of data.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.scanned += 1;
            self.state = match (self.state, b) {
                (ScanState::Quoted, b'"') => ScanState::QuoteInQuoted,
                (ScanState::Quoted, _) => ScanState::Quoted,
                (ScanState::QuoteInQuoted, b'"') => ScanState::Quoted,
                (ScanState::FieldStart, b'"') => ScanState::Quoted,
                (_, b',') => ScanState::FieldStart,
                (_, b'\n') => {
                    self.boundary = self.scanned;
                    ScanState::FieldStart
                }
                _ => ScanState::Unquoted,
            };
        }
    }

    /// Bytes up to and including the last record-ending newline.
    pub fn boundary(&self) -> u64 {
        self.boundary
    }
}

/// Length of the prefix of `bytes` that ends on a record boundary.
/// Anything after it is still being written.
pub fn complete_prefix_len(bytes: &[u8]) -> usize {
    let mut scanner = RecordBoundary::new();
    scanner.feed(bytes);
    scanner.boundary() as usize
}

/// Parse the complete records in `bytes`, skipping the first one when
/// `skip_header` is set.
pub fn parse_chunk(bytes: &[u8], skip_header: bool) -> Result<ParsedChunk> {
    let complete = complete_prefix_len(bytes);
    let mut chunk = ParsedChunk {
        consumed: complete as u64,
        ..ParsedChunk::default()
    };
    if complete == 0 {
        return Ok(chunk);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(&bytes[..complete]);

    let mut record = ByteRecord::new();
    let mut first = true;
    while reader.read_byte_record(&mut record)? {
        if first && skip_header {
            first = false;
            chunk.header_read = true;
            continue;
        }
        first = false;

        match display_text(&record) {
            Some(text) => chunk.texts.push(text),
            None => {
                debug!("Skipping record with {} fields at byte {}", record.len(), record_offset(&record));
                chunk.skipped += 1;
            }
        }
    }

    Ok(chunk)
}

/// Text column of a record, if present and not blank.
fn display_text(record: &ByteRecord) -> Option<String> {
    let field = record.get(TEXT_COLUMN)?;
    let text = String::from_utf8_lossy(field);
    if text.trim().is_empty() { None } else { Some(text.into_owned()) }
}

fn record_offset(record: &ByteRecord) -> u64 {
    record.position().map(|p| p.byte()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "time,nickname,user_id,text\n";

    #[test]
    fn test_complete_prefix_len() {
        assert_eq!(complete_prefix_len(b""), 0);
        assert_eq!(complete_prefix_len(b"a,b"), 0);
        assert_eq!(complete_prefix_len(b"a,b\n"), 4);
        assert_eq!(complete_prefix_len(b"a,b\nc,d"), 4);
        // Newline inside quotes is not a boundary
        assert_eq!(complete_prefix_len(b"a,\"b\nc"), 0);
        assert_eq!(complete_prefix_len(b"a,\"b\nc\"\n"), 8);
        // Escaped quotes keep the field open
        assert_eq!(complete_prefix_len(b"a,\"x\"\"\ny\"\n"), 10);
    }

    #[test]
    fn test_stray_quote_inside_unquoted_field() {
        let data = b"t,n,u,he said \"hi\nt,n,u,next\nt,n,u,third\n";
        let chunk = parse_chunk(data, false).unwrap();
        assert_eq!(chunk.consumed, data.len() as u64);
        assert_eq!(chunk.texts, vec!["he said \"hi", "next", "third"]);
    }

    #[test]
    fn test_boundary_across_pieces() {
        let data = b"t,n,u,\"one\"\"\ntwo\"\nt,n,u,plain\nt,n,u,part";
        let mut scanner = RecordBoundary::new();
        for piece in data.chunks(3) {
            scanner.feed(piece);
        }
        assert_eq!(scanner.boundary() as usize, complete_prefix_len(data));
        assert_eq!(scanner.boundary(), 30);
    }

    #[test]
    fn test_parse_skips_header() {
        let data = format!("{}12:00,alice,1,hello\n12:01,bob,2,world\n", HEADER);
        let chunk = parse_chunk(data.as_bytes(), true).unwrap();
        assert_eq!(chunk.texts, vec!["hello", "world"]);
        assert!(chunk.header_read);
        assert_eq!(chunk.consumed, data.len() as u64);
    }

    #[test]
    fn test_parse_without_header() {
        let chunk = parse_chunk(b"12:00,alice,1,hello\n", false).unwrap();
        assert_eq!(chunk.texts, vec!["hello"]);
        assert!(!chunk.header_read);
    }

    #[test]
    fn test_short_and_blank_records_skipped() {
        let data = b"12:00,alice,1\n12:01,bob,2,   \n12:02,carol,3,ok\n";
        let chunk = parse_chunk(data, false).unwrap();
        assert_eq!(chunk.texts, vec!["ok"]);
        assert_eq!(chunk.skipped, 2);
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let chunk = parse_chunk(b"t,n,u,  padded \n", false).unwrap();
        assert_eq!(chunk.texts, vec!["  padded "]);
    }

    #[test]
    fn test_quoted_text_with_commas_and_newlines() {
        let data = "t,n,u,\"hi, there\"\nt,n,u,\"two\nlines\"\n";
        let chunk = parse_chunk(data.as_bytes(), false).unwrap();
        assert_eq!(chunk.texts, vec!["hi, there", "two\nlines"]);
    }

    #[test]
    fn test_extra_columns_tolerated() {
        let chunk = parse_chunk(b"t,n,u,text,extra,more\n", false).unwrap();
        assert_eq!(chunk.texts, vec!["text"]);
    }

    #[test]
    fn test_partial_record_left_unconsumed() {
        let data = b"t,n,u,done\nt,n,u,half";
        let chunk = parse_chunk(data, false).unwrap();
        assert_eq!(chunk.texts, vec!["done"]);
        assert_eq!(chunk.consumed, 11);
    }

    #[test]
    fn test_header_only_chunk() {
        let chunk = parse_chunk(HEADER.as_bytes(), true).unwrap();
        assert!(chunk.texts.is_empty());
        assert!(chunk.header_read);
    }

    #[test]
    fn test_unicode_text() {
        let chunk = parse_chunk("t,n,u,最初のメッセージ\n".as_bytes(), false).unwrap();
        assert_eq!(chunk.texts, vec!["最初のメッセージ"]);
    }
}
