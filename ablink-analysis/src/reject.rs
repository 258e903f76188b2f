//! Threshold-based artifact rejection over extracted epochs.
//!
//! Epochs failing any of three physiological criteria are flagged with
//! the first reason that fires, in a fixed priority: transient jumps,
//! absolute peaks, ocular deviation. Voltages are in microvolts.

use ndarray::{Array3, ArrayView2, Axis, s};

use crate::error::AnalysisError;

/// Largest tolerated sample-to-sample step on any EEG channel
pub const THRESH_TRANS: f64 = 100.0;
/// Largest tolerated mean-removed EEG amplitude
pub const THRESH_PEAK: f64 = 200.0;
/// Largest tolerated mean-removed EOG difference-signal amplitude
pub const THRESH_EOG: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub transient_uv: f64,
    pub peak_uv: f64,
    pub eog_uv: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            transient_uv: THRESH_TRANS,
            peak_uv: THRESH_PEAK,
            eog_uv: THRESH_EOG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Transient,
    Peak,
    Blink,
}

impl RejectReason {
    /// Annotation label for this reason
    pub fn label(self) -> &'static str {
        match self {
            RejectReason::Transient => "bad transient",
            RejectReason::Peak => "bad peak",
            RejectReason::Blink => "bad blink",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectCounts {
    pub transient: usize,
    pub peak: usize,
    pub blink: usize,
}

/// Outcome of a rejection scan. `bad` is in ascending epoch order.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub bad: Vec<(usize, RejectReason)>,
    pub counts: RejectCounts,
    pub n_epochs: usize,
}

impl Rejection {
    pub fn indices(&self) -> Vec<usize> {
        self.bad.iter().map(|&(i, _)| i).collect()
    }

    /// Boolean vector aligned with the scanned epochs, true = rejected
    pub fn mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.n_epochs];
        for &(i, _) in &self.bad {
            mask[i] = true;
        }
        mask
    }

    pub fn n_rejected(&self) -> usize {
        self.bad.len()
    }
}

/// Reduce the 4 ocular channels to 2 difference signals by paired
/// subtraction (channel 0 - 1 and 2 - 3).
pub fn eog_difference(eog: &Array3<f64>) -> Result<Array3<f64>, AnalysisError> {
    let (n_epochs, n_ch, n_samples) = eog.dim();
    if n_ch != 4 {
        return Err(AnalysisError::EogChannels {
            expected: 4,
            got: n_ch,
        });
    }
    let mut out = Array3::zeros((n_epochs, 2, n_samples));
    out.slice_mut(s![.., 0, ..])
        .assign(&(&eog.slice(s![.., 0, ..]) - &eog.slice(s![.., 1, ..])));
    out.slice_mut(s![.., 1, ..])
        .assign(&(&eog.slice(s![.., 2, ..]) - &eog.slice(s![.., 3, ..])));
    Ok(out)
}

/// Scan uniform-length epochs against the thresholds.
///
/// `eeg` and `eog_diff` are epochs x channels x samples with matching
/// first axes; shorter-than-window epochs are an upstream extraction
/// error, not handled here.
pub fn scan_epochs(
    eeg: &Array3<f64>,
    eog_diff: &Array3<f64>,
    thresholds: &Thresholds,
) -> Result<Rejection, AnalysisError> {
    let n_epochs = eeg.shape()[0];
    if eog_diff.shape()[0] != n_epochs {
        return Err(AnalysisError::EpochCountMismatch {
            eeg: n_epochs,
            eog: eog_diff.shape()[0],
        });
    }

    let mut bad = Vec::new();
    let mut counts = RejectCounts::default();
    for e in 0..n_epochs {
        let eeg_epoch = eeg.index_axis(Axis(0), e);
        if max_abs_step(&eeg_epoch) > thresholds.transient_uv {
            bad.push((e, RejectReason::Transient));
            counts.transient += 1;
            continue;
        }
        if max_demeaned_abs(&eeg_epoch) > thresholds.peak_uv {
            bad.push((e, RejectReason::Peak));
            counts.peak += 1;
            continue;
        }
        let eog_epoch = eog_diff.index_axis(Axis(0), e);
        if max_demeaned_abs(&eog_epoch) > thresholds.eog_uv {
            bad.push((e, RejectReason::Blink));
            counts.blink += 1;
        }
    }

    log::info!(
        "rejected {}/{} epochs ({} transient, {} peak, {} blink)",
        bad.len(),
        n_epochs,
        counts.transient,
        counts.peak,
        counts.blink,
    );
    Ok(Rejection {
        bad,
        counts,
        n_epochs,
    })
}

/// Largest absolute sample-to-sample difference across channels
fn max_abs_step(epoch: &ArrayView2<f64>) -> f64 {
    let mut max = 0.0f64;
    for channel in epoch.outer_iter() {
        for (a, b) in channel.iter().zip(channel.iter().skip(1)) {
            max = max.max((b - a).abs());
        }
    }
    max
}

/// Largest absolute amplitude after removing each channel's own mean
fn max_demeaned_abs(epoch: &ArrayView2<f64>) -> f64 {
    let mut max = 0.0f64;
    for channel in epoch.outer_iter() {
        let mean = channel.mean().unwrap_or(0.0);
        for &v in channel {
            max = max.max((v - mean).abs());
        }
    }
    max
}
