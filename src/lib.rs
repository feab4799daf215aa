//! Lanescroll - scrolls chat log messages across a fixed set of lanes
//!
//! A source tailer follows the newest chat log and hands new messages to an
//! intake queue. The admission scheduler ticks at a fixed rate, moving each
//! message across its lane and admitting waiting messages, in arrival order,
//! as lanes free up.

pub mod admission;
pub mod config;
pub mod demo;
pub mod error;
pub mod intake;
pub mod render;
pub mod source;
pub mod tui;

pub use error::{LanescrollError, Result};
