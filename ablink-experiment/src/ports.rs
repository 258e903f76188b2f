//! Access to the trigger channel of the EEG amplifier.
//!
//! Real ports (serial, parallel, photodiode bulb, labjack) live outside
//! this crate; presentation code only relies on the fire-and-forget
//! `trigger` capability, synchronized to the flip by the engine.

pub trait TriggerPort {
    fn trigger(&mut self, code: u8);
}

/// Records the pulse sequence instead of sending it anywhere.
#[derive(Debug, Default)]
pub struct FakeTriggerPort {
    pub sent: Vec<u8>,
}

impl FakeTriggerPort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TriggerPort for FakeTriggerPort {
    fn trigger(&mut self, code: u8) {
        log::debug!("trigger {code}");
        self.sent.push(code);
    }
}
