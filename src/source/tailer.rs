//! Source tailer: follows the newest chat log and feeds the intake queue.
//!
//! Every poll:
//! 1. Pick the newest file matching the pattern; switch if it changed
//! 2. Read from the cursor to the end of complete records
//! 3. Push each displayable text to the intake queue
//! 4. Persist the new offset
//!
//! A freshly selected source is baselined at its current end so existing
//! records are not replayed. I/O errors are logged and retried next poll.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::{debug, error, info, warn};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::cursor::SourceCursor;
use super::record::{RecordBoundary, parse_chunk};
use crate::admission::preview;
use crate::error::Result;
use crate::intake::IntakeQueue;

const LOG_PREVIEW_CHARS: usize = 50;
const SCAN_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for a source tailer
#[derive(Debug, Clone)]
pub struct TailerConfig {
    /// Directory holding the chat logs
    pub dir: PathBuf,
    /// File name pattern within `dir`
    pub pattern: String,
    /// Interval between polls
    pub poll_interval: Duration,
    /// Replay records already present in the first source found at startup
    pub replay_existing: bool,
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("chat_logs"),
            pattern: "*_log.csv".to_string(),
            poll_interval: Duration::from_millis(500),
            replay_existing: false,
        }
    }
}

impl TailerConfig {
    /// Create a config watching `dir` with default pattern and interval
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Set the file name pattern
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Set the poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Replay the first source's existing records at startup
    pub fn with_replay_existing(mut self, replay: bool) -> Self {
        self.replay_existing = replay;
        self
    }
}

/// Follows the newest matching source and pushes new records into an
/// [`IntakeQueue`].
#[derive(Debug)]
pub struct SourceTailer {
    config: TailerConfig,
    intake: IntakeQueue,
    cursor: Option<SourceCursor>,
    selected_once: bool,
}

impl SourceTailer {
    /// Create a tailer feeding `intake`.
    pub fn new(config: TailerConfig, intake: IntakeQueue) -> Self {
        Self {
            config,
            intake,
            cursor: None,
            selected_once: false,
        }
    }

    /// Source currently being tailed.
    pub fn current_source(&self) -> Option<&Path> {
        self.cursor.as_ref().map(|c| c.path())
    }

    /// Cursor of the current source.
    pub fn cursor(&self) -> Option<&SourceCursor> {
        self.cursor.as_ref()
    }

    /// Newest file matching the pattern, by modification time.
    pub fn latest_source(&self) -> Result<Option<PathBuf>> {
        let dir = glob::Pattern::escape(&self.config.dir.to_string_lossy());
        let pattern = Path::new(&dir).join(&self.config.pattern);

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in glob::glob(&pattern.to_string_lossy())? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    debug!("Skipping unreadable candidate: {}", e);
                    continue;
                }
            };
            let Ok(modified) = fs::metadata(&path).and_then(|m| m.modified()) else {
                continue;
            };
            let is_newer = match &newest {
                Some((best, best_path)) => (modified, &path) > (*best, best_path),
                None => true,
            };
            if is_newer {
                newest = Some((modified, path));
            }
        }

        Ok(newest.map(|(_, path)| path))
    }

    /// Run one poll. Returns how many texts were pushed.
    pub fn poll_once(&mut self) -> Result<usize> {
        if let Some(latest) = self.latest_source()?
            && self.current_source() != Some(latest.as_path())
        {
            self.switch_to(latest)?;
        }

        match self.cursor.as_mut() {
            Some(cursor) => read_new(cursor, &self.intake),
            None => Ok(0),
        }
    }

    fn switch_to(&mut self, path: PathBuf) -> Result<()> {
        let replay = !self.selected_once && self.config.replay_existing;
        let cursor = if replay {
            SourceCursor::at_start(&path)
        } else {
            SourceCursor::at_offset(&path, baseline_offset(&path)?)
        };

        info!(
            "Watching: {} (from byte {}{})",
            path.display(),
            cursor.offset(),
            if replay { ", replaying existing" } else { "" }
        );
        if let Some(previous) = &self.cursor {
            debug!("Dropping cursor for {} at byte {}", previous.path().display(), previous.offset());
        }

        self.cursor = Some(cursor);
        self.selected_once = true;
        Ok(())
    }

    /// Poll until `shutdown` turns true or its sender is dropped.
    ///
    /// Each poll runs on the blocking pool; the tailer moves into the poll
    /// and comes back with its result.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("Starting file monitor on {}", self.config.dir.display());
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tailer = self;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if *shutdown.borrow() {
                        break;
                    }
                    let polled = tokio::task::spawn_blocking(move || {
                        let result = tailer.poll_once();
                        (tailer, result)
                    })
                    .await;
                    match polled {
                        Ok((returned, result)) => {
                            tailer = returned;
                            if let Err(e) = result {
                                warn!("Source poll failed, retrying next poll: {}", e);
                            }
                        }
                        Err(e) => {
                            error!("Source poll task failed, stopping file monitor: {}", e);
                            return;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("File monitor stopped");
    }
}

/// End of the last complete record in `path`, scanned in fixed-size pieces.
fn baseline_offset(path: &Path) -> Result<u64> {
    let mut file = File::open(path)?;
    let mut scanner = RecordBoundary::new();
    let mut buf = vec![0u8; SCAN_BUFFER_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        scanner.feed(&buf[..n]);
    }
    Ok(scanner.boundary())
}

/// Read complete records past `cursor` and push their texts.
fn read_new(cursor: &mut SourceCursor, intake: &IntakeQueue) -> Result<usize> {
    let mut file = File::open(cursor.path())?;
    let len = file.metadata()?.len();

    if len < cursor.offset() {
        warn!(
            "{} shrank from {} to {} bytes, resuming at its end",
            cursor.path().display(),
            cursor.offset(),
            len
        );
        cursor.reset_to(len);
        return Ok(0);
    }
    if len == cursor.offset() {
        return Ok(0);
    }

    file.seek(SeekFrom::Start(cursor.offset()))?;
    let mut buf = Vec::with_capacity((len - cursor.offset()) as usize);
    file.read_to_end(&mut buf)?;

    let chunk = parse_chunk(&buf, cursor.header_pending())?;
    if chunk.skipped > 0 {
        debug!("Skipped {} malformed records in {}", chunk.skipped, cursor.path().display());
    }

    let pushed = chunk.texts.len();
    for text in chunk.texts {
        debug!("Queued: {}", preview(&text, LOG_PREVIEW_CHARS));
        intake.push(text);
    }
    cursor.advance(chunk.consumed, chunk.header_read);
    Ok(pushed)
}
