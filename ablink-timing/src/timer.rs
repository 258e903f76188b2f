use ablink_core::Constants;
use thiserror::Error;

/// Refresh rate the design-time frame counts refer to
pub const ORIG_FLIP_RATE: f64 = 70.0;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimingError {
    #[error("timer not configured, call optimize_flips with the measured refresh rate first")]
    Unconfigured,
}

/// Refresh-rate-adjusted frame counts for every named duration.
///
/// Constructed once per session after the actual display refresh rate
/// has been measured; read-only afterwards. Every adjusted value equals
/// `round(constant * rate / ORIG_FLIP_RATE)`.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    flip_rate: f64,
    pub short_t1_delay: u32,
    pub long_t1_delay: u32,
    pub short_soa: u32,
    pub long_soa: u32,
    pub target_dur: u32,
    pub task_delay: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescale all duration constants to the measured refresh rate.
    ///
    /// Idempotent: always derives from the `Constants` values, so
    /// repeated calls overwrite rather than accumulate.
    pub fn optimize_flips(&mut self, flip_rate: f64, consts: &Constants) {
        let factor = flip_rate / ORIG_FLIP_RATE;
        let adjust = |frames: u32| (frames as f64 * factor).round() as u32;
        self.flip_rate = flip_rate;
        self.short_t1_delay = adjust(consts.short_t1_delay);
        self.long_t1_delay = adjust(consts.long_t1_delay);
        self.short_soa = adjust(consts.short_soa);
        self.long_soa = adjust(consts.long_soa);
        self.target_dur = adjust(consts.target_dur);
        self.task_delay = adjust(consts.task_delay);
    }

    pub fn is_configured(&self) -> bool {
        self.flip_rate > 0.0
    }

    pub fn flip_rate(&self) -> f64 {
        self.flip_rate
    }

    pub fn secs_to_flips(&self, secs: f64) -> Result<u32, TimingError> {
        if !self.is_configured() {
            return Err(TimingError::Unconfigured);
        }
        Ok((secs * self.flip_rate).round() as u32)
    }

    pub fn flips_to_secs(&self, flips: u32) -> Result<f64, TimingError> {
        if !self.is_configured() {
            return Err(TimingError::Unconfigured);
        }
        Ok(flips as f64 / self.flip_rate)
    }

    /// Fixation delay before T1 for the given balanced variant (0 quick, 1 slow)
    pub fn t1_delay_frames(&self, delay_index: u32) -> u32 {
        if delay_index == 0 {
            self.short_t1_delay
        } else {
            self.long_t1_delay
        }
    }

    pub fn soa_frames(&self, long: bool) -> u32 {
        if long { self.long_soa } else { self.short_soa }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_at_70hz() {
        let consts = Constants::default();
        let mut timer = Timer::new();
        timer.optimize_flips(70.0, &consts);
        assert_eq!(timer.short_t1_delay, consts.short_t1_delay);
        assert_eq!(timer.long_t1_delay, consts.long_t1_delay);
        assert_eq!(timer.short_soa, consts.short_soa);
        assert_eq!(timer.long_soa, consts.long_soa);
        assert_eq!(timer.target_dur, consts.target_dur);
        assert_eq!(timer.task_delay, consts.task_delay);
    }

    #[test]
    fn adjusted_at_123hz() {
        let mut timer = Timer::new();
        timer.optimize_flips(123.45, &Constants::default());
        assert_eq!(timer.short_t1_delay, 63);
        assert_eq!(timer.long_t1_delay, 106);
        assert_eq!(timer.short_soa, 26);
        assert_eq!(timer.long_soa, 72);
        assert_eq!(timer.target_dur, 5);
        assert_eq!(timer.task_delay, 65);
    }

    #[test]
    fn repeated_calls_overwrite() {
        let consts = Constants::default();
        let mut timer = Timer::new();
        timer.optimize_flips(123.45, &consts);
        timer.optimize_flips(123.45, &consts);
        timer.optimize_flips(70.0, &consts);
        assert_eq!(timer.short_soa, consts.short_soa);
    }

    #[test]
    fn conversions() {
        let mut timer = Timer::new();
        timer.optimize_flips(123.45, &Constants::default());
        assert_eq!(timer.secs_to_flips(3.5), Ok(432));
        let secs = timer.flips_to_secs(26).unwrap();
        assert!((secs - 26.0 / 123.45).abs() < 1e-12);
    }

    #[test]
    fn unconfigured_fails_fast() {
        let timer = Timer::new();
        assert_eq!(timer.secs_to_flips(1.0), Err(TimingError::Unconfigured));
        assert_eq!(timer.flips_to_secs(10), Err(TimingError::Unconfigured));
    }
}
