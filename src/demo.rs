//! Built-in demo messages.
//!
//! Eight messages, more than the default five lanes, so the demo shows
//! messages waiting for a lane to free up.

use crate::intake::IntakeQueue;

pub const DEMO_MESSAGES: &[&str] = &[
    "First message  最初のメッセージ",
    "Second message  二番目のメッセージ",
    "Third message  三番目のメッセージ",
    "Fourth message  四番目のメッセージ",
    "Fifth message  五番目のメッセージ",
    "Sixth message (waits for lane)  六番目のメッセージ",
    "Seventh message  七番目のメッセージ",
    "Final message  最後のメッセージ",
];

/// Push every demo message onto `intake`. Returns how many were loaded.
pub fn load(intake: &IntakeQueue) -> usize {
    for text in DEMO_MESSAGES {
        intake.push(*text);
    }
    log::info!("Loaded {} messages into queue", DEMO_MESSAGES.len());
    DEMO_MESSAGES.len()
}
