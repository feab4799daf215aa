//! End-to-end flow integration tests
//!
//! Drives a source tailer and the admission scheduler together against an
//! in-memory stage, polling and ticking by hand.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use lanescroll::admission::{AdmissionScheduler, LaneId, MessageState, TickConfig};
use lanescroll::error::Result;
use lanescroll::intake::IntakeQueue;
use lanescroll::render::StageRenderer;
use lanescroll::source::{SourceTailer, TailerConfig};
use tempfile::TempDir;

const HEADER: &str = "time,nickname,user_id,text\n";

fn touch(path: &Path, age_secs: u64) {
    let file = OpenOptions::new().append(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(age_secs)).unwrap();
}

fn new_log(dir: &Path, name: &str, texts: &[&str], age_secs: u64) -> PathBuf {
    let path = dir.join(name);
    let mut content = HEADER.to_string();
    for text in texts {
        content.push_str(&format!("2025-01-01 12:00:00,viewer,42,{}\n", text));
    }
    fs::write(&path, content).unwrap();
    touch(&path, age_secs);
    path
}

fn append_messages(path: &Path, texts: &[&str], age_secs: u64) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    for text in texts {
        writeln!(file, "2025-01-01 12:00:01,viewer,42,{}", text).unwrap();
    }
    drop(file);
    touch(path, age_secs);
}

/// Tick until nothing is queued or on stage, returning the texts in the
/// order they were admitted. Records already on stage count too.
fn run_to_idle(scheduler: &mut AdmissionScheduler, stage: &mut StageRenderer) -> Vec<String> {
    let mut admitted = Vec::new();
    let mut seen = Vec::new();
    let mut note_active = |scheduler: &AdmissionScheduler| {
        for record in scheduler.active() {
            if !seen.contains(&record.seq) {
                seen.push(record.seq);
                admitted.push(record.text.clone());
            }
        }
    };

    note_active(&*scheduler);
    for _ in 0..10_000 {
        scheduler.tick(stage);
        note_active(&*scheduler);
        if scheduler.is_idle() {
            return admitted;
        }
    }
    panic!("scheduler never went idle");
}

/// Integration test: only records appended after startup are displayed
#[test]
fn test_tail_to_display_skips_existing_records() -> Result<()> {
    let dir = TempDir::new()?;
    let log = new_log(dir.path(), "stream_log.csv", &["old 1", "old 2"], 60);

    let intake = IntakeQueue::new();
    let mut tailer = SourceTailer::new(TailerConfig::new(dir.path()), intake.clone());
    let mut scheduler = AdmissionScheduler::new(5, intake, TickConfig::new(Duration::ZERO, 4.0));
    let mut stage = StageRenderer::new(40);

    assert_eq!(tailer.poll_once()?, 0);
    append_messages(&log, &["new message"], 30);
    assert_eq!(tailer.poll_once()?, 1);

    let shown = run_to_idle(&mut scheduler, &mut stage);
    assert_eq!(shown, vec!["new message"]);
    assert!(stage.is_empty());
    Ok(())
}

/// Integration test: a burst larger than the lane count is shown in order
#[test]
fn test_burst_exceeding_lanes_is_fifo() -> Result<()> {
    let dir = TempDir::new()?;
    let log = new_log(dir.path(), "stream_log.csv", &[], 60);

    let intake = IntakeQueue::new();
    let mut tailer = SourceTailer::new(TailerConfig::new(dir.path()), intake.clone());
    let mut scheduler = AdmissionScheduler::new(2, intake, TickConfig::new(Duration::ZERO, 3.0));
    let mut stage = StageRenderer::new(30);
    tailer.poll_once()?;

    let burst: Vec<String> = (0..9).map(|i| format!("burst {}", i)).collect();
    let burst_refs: Vec<&str> = burst.iter().map(String::as_str).collect();
    append_messages(&log, &burst_refs, 30);
    assert_eq!(tailer.poll_once()?, 9);

    scheduler.tick(&mut stage);
    assert_eq!(scheduler.active().len(), 2);
    assert_eq!(scheduler.waiting().count(), 7);

    // The first two are still on stage, so they lead the admission order
    let shown = run_to_idle(&mut scheduler, &mut stage);
    assert_eq!(shown, burst);
    assert_eq!(scheduler.state().total_retired, 9);
    Ok(())
}

/// Integration test: rotation never re-delivers and never replays the new log
#[test]
fn test_rotation_mid_run() -> Result<()> {
    let dir = TempDir::new()?;
    let first = new_log(dir.path(), "day1_log.csv", &["seen before start"], 300);

    let intake = IntakeQueue::new();
    let mut tailer = SourceTailer::new(TailerConfig::new(dir.path()), intake.clone());
    let mut scheduler = AdmissionScheduler::new(3, intake, TickConfig::new(Duration::ZERO, 5.0));
    let mut stage = StageRenderer::new(50);

    tailer.poll_once()?;
    append_messages(&first, &["day1 live"], 200);
    tailer.poll_once()?;
    scheduler.tick(&mut stage);

    let second = new_log(dir.path(), "day2_log.csv", &["day2 before switch"], 100);
    tailer.poll_once()?;
    assert_eq!(tailer.current_source(), Some(second.as_path()));

    append_messages(&second, &["day2 live"], 50);
    tailer.poll_once()?;
    tailer.poll_once()?;

    let shown = run_to_idle(&mut scheduler, &mut stage);
    assert_eq!(shown, vec!["day1 live", "day2 live"]);
    Ok(())
}

/// Integration test: two lanes, three messages
#[test]
fn test_two_lane_scenario() {
    let intake = IntakeQueue::new();
    let mut scheduler = AdmissionScheduler::new(2, intake.clone(), TickConfig::new(Duration::ZERO, 1.0));
    let mut stage = StageRenderer::new(4);

    intake.push("A");
    intake.push("BBBBBB");
    intake.push("C");
    scheduler.tick(&mut stage);

    let lanes: Vec<(String, Option<LaneId>)> = scheduler
        .active()
        .iter()
        .map(|r| (r.text.clone(), r.lane))
        .collect();
    assert_eq!(
        lanes,
        vec![("A".to_string(), Some(LaneId(0))), ("BBBBBB".to_string(), Some(LaneId(1)))]
    );
    let waiting: Vec<_> = scheduler.waiting().collect();
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].text, "C");
    assert_eq!(waiting[0].state, MessageState::Queued);

    while scheduler.active().iter().any(|r| r.text == "A") {
        scheduler.tick(&mut stage);
    }
    let c = scheduler.active().iter().find(|r| r.text == "C").expect("C admitted");
    assert_eq!(c.lane, Some(LaneId(0)));
    assert_eq!(c.state, MessageState::Active);
}
