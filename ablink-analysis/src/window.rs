//! Epoch and baseline window arithmetic.

use ablink_timing::{Timer, TimingError};

/// Duration of the pre-stimulus baseline in seconds
pub const BASELINE_DUR: f64 = 0.250;
/// Post-stimulus window length in seconds
pub const TMAX: f64 = 0.715;
/// Measured constant lag between intended and recorded trigger
pub const TRIGGER_LATENCY: f64 = 0.016;

/// Epoch boundaries relative to a T2 trigger, in seconds.
///
/// The baseline is anchored before T1 rather than relative to the T2
/// onset itself, so the same absolute readiness-phase window is sampled
/// whichever SOA condition is epoched; a T2-relative baseline would
/// confound baseline content with condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochWindow {
    pub tmin: f64,
    pub tmax: f64,
}

impl EpochWindow {
    /// Window around a T2 trigger for the given SOA and target duration.
    pub fn around_t2(soa_secs: f64, target_dur_secs: f64, latency: f64) -> Self {
        Self {
            tmin: -(soa_secs + BASELINE_DUR + target_dur_secs) + latency,
            tmax: TMAX + latency,
        }
    }

    /// Window for short-SOA T2 epochs, with the SOA and target duration
    /// taken from the session's frame timing.
    pub fn from_timer(timer: &Timer, latency: f64) -> Result<Self, TimingError> {
        let soa = timer.flips_to_secs(timer.short_soa)?;
        let buffer = timer.flips_to_secs(timer.target_dur)?;
        Ok(Self::around_t2(soa, buffer, latency))
    }

    /// The pre-stimulus baseline interval
    pub fn baseline(&self) -> (f64, f64) {
        (self.tmin, self.tmin + BASELINE_DUR)
    }

    pub fn len_secs(&self) -> f64 {
        self.tmax - self.tmin
    }

    pub fn len_samples(&self, sfreq: f64) -> usize {
        (self.len_secs() * sfreq).round() as usize
    }

    /// Span of the matching bad-region annotation
    pub fn annotation_duration(&self) -> f64 {
        -self.tmin + TMAX
    }
}
