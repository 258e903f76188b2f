//! Decoding recorded hardware events against the trigger code space.

use ablink_core::triggers::{self, Condition};

/// One event off the recording's trigger channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedEvent {
    pub sample: usize,
    pub code: u8,
}

/// A T2 onset event with its decoded condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct T2Event {
    pub sample: usize,
    pub code: u8,
    pub condition: Condition,
}

/// Keep only T2 onsets (training and test ranges) so that events align
/// one-to-one with trials, and decode their conditions.
pub fn select_t2_events(events: &[RecordedEvent]) -> Vec<T2Event> {
    events
        .iter()
        .filter(|e| triggers::is_t2_code(e.code))
        .filter_map(|e| {
            triggers::decode(e.code).map(|condition| T2Event {
                sample: e.sample,
                code: e.code,
                condition,
            })
        })
        .collect()
}
