//! The presentation device contract.
//!
//! The stimulus-drawing/window/trigger layer is an external collaborator;
//! trials only depend on this capability trait. Display operations block
//! for the requested number of flips and return the observed onset of
//! their first flip in seconds, the ground truth for verifying intended
//! against actual timing. Prompts block until the participant confirms a
//! valid selection; a dummy no-op choice is never accepted by the device.

use anyhow::Result;

use crate::ports::{FakeTriggerPort, TriggerPort};

/// A confirmed prompt response with its presentation onset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prompted<T> {
    pub value: T,
    pub onset: f64,
    pub rt_ms: f64,
}

pub trait Engine {
    fn display_fix_cross(&mut self, frames: u32) -> Result<()>;
    /// Show T1 and pulse its trigger on the onset flip
    fn display_t1(&mut self, text: &str, trigger: u8, frames: u32) -> Result<f64>;
    /// Show T2 (four placeholder squares, plus the number word when present)
    fn display_t2(&mut self, text: &str, trigger: u8, frames: u32) -> Result<f64>;
    fn display_mask(&mut self, text: &str, frames: u32) -> Result<()>;
    fn display_empty_screen(&mut self, frames: u32) -> Result<f64>;
    fn prompt_identity(
        &mut self,
        prompt: &str,
        options: (&str, &str),
        trigger: u8,
    ) -> Result<Prompted<usize>>;
    fn prompt_visibility(
        &mut self,
        prompt: &str,
        labels: (&str, &str),
        scale_length: u32,
        init: u32,
        trigger: u8,
    ) -> Result<Prompted<u32>>;
    /// Instruction text between blocks; waits for confirmation if asked to
    fn show_message(&mut self, text: &str, confirm: bool) -> Result<()>;
    /// Cooperative cancellation, polled between steps and trials
    fn exit_requested(&self) -> bool;
}

/// Drop-in engine for development and tests, no display attached.
///
/// Keeps a simulated clock in flips and seconds so that recorded onsets
/// are monotone and plausible, and routes triggers through a recording
/// port for inspection.
#[derive(Debug)]
pub struct FakeEngine {
    pub port: FakeTriggerPort,
    flip_rate: f64,
    flips: u64,
    secs: f64,
    prompt_rt_ms: f64,
    exit: bool,
}

impl FakeEngine {
    pub fn new(flip_rate: f64) -> Self {
        Self {
            port: FakeTriggerPort::new(),
            flip_rate,
            flips: 0,
            secs: 0.0,
            prompt_rt_ms: 1250.0,
            exit: false,
        }
    }

    /// Simulated session clock in seconds
    pub fn now(&self) -> f64 {
        self.flips as f64 / self.flip_rate + self.secs
    }

    fn advance(&mut self, frames: u32) -> f64 {
        let onset = self.now();
        self.flips += frames as u64;
        onset
    }

    pub fn request_exit(&mut self) {
        self.exit = true;
    }

    /// Simulated duration of everything shown so far, in seconds
    pub fn estimate_duration(&self) -> f64 {
        self.now()
    }
}

impl Engine for FakeEngine {
    fn display_fix_cross(&mut self, frames: u32) -> Result<()> {
        log::debug!("fixation ({frames} x flip)");
        self.advance(frames);
        Ok(())
    }

    fn display_t1(&mut self, text: &str, trigger: u8, frames: u32) -> Result<f64> {
        log::debug!("target 1 {text:?} ({frames} x flip)");
        self.port.trigger(trigger);
        Ok(self.advance(frames))
    }

    fn display_t2(&mut self, text: &str, trigger: u8, frames: u32) -> Result<f64> {
        log::debug!("target 2 {text:?} ({frames} x flip)");
        self.port.trigger(trigger);
        Ok(self.advance(frames))
    }

    fn display_mask(&mut self, text: &str, frames: u32) -> Result<()> {
        log::debug!("mask {text:?} ({frames} x flip)");
        self.advance(frames);
        Ok(())
    }

    fn display_empty_screen(&mut self, frames: u32) -> Result<f64> {
        log::debug!("empty screen ({frames} x flip)");
        Ok(self.advance(frames))
    }

    fn prompt_identity(
        &mut self,
        _prompt: &str,
        _options: (&str, &str),
        trigger: u8,
    ) -> Result<Prompted<usize>> {
        log::debug!("identity prompt");
        self.port.trigger(trigger);
        let onset = self.now();
        self.secs += self.prompt_rt_ms / 1000.0;
        Ok(Prompted {
            value: 0,
            onset,
            rt_ms: self.prompt_rt_ms,
        })
    }

    fn prompt_visibility(
        &mut self,
        _prompt: &str,
        _labels: (&str, &str),
        _scale_length: u32,
        init: u32,
        trigger: u8,
    ) -> Result<Prompted<u32>> {
        log::debug!("visibility prompt");
        self.port.trigger(trigger);
        let onset = self.now();
        self.secs += self.prompt_rt_ms / 1000.0;
        Ok(Prompted {
            value: init,
            onset,
            rt_ms: self.prompt_rt_ms,
        })
    }

    fn show_message(&mut self, text: &str, confirm: bool) -> Result<()> {
        log::info!("message{}: {text}", if confirm { " (wait)" } else { "" });
        self.secs += if confirm { 20.0 } else { 1.5 };
        Ok(())
    }

    fn exit_requested(&self) -> bool {
        self.exit
    }
}
