//! Event-locked epoch extraction and evoked averaging.

use ndarray::{Array2, Array3, Axis, s};

use ablink_core::triggers::Condition;

use crate::error::AnalysisError;
use crate::events::T2Event;
use crate::window::{BASELINE_DUR, EpochWindow};

/// Trial-aligned slices of the continuous recording.
///
/// `data` is epochs x channels x samples; `events` holds the trigger
/// events the epochs were cut around, index-aligned with the first axis.
#[derive(Debug, Clone)]
pub struct Epochs {
    pub data: Array3<f64>,
    pub events: Vec<T2Event>,
    pub window: EpochWindow,
    pub sfreq: f64,
}

/// Cut one epoch per event out of the continuous recording
/// (channels x samples). Events whose window would leave the recording
/// are dropped with a warning, keeping the returned events aligned with
/// the epochs actually cut.
pub fn extract_epochs(
    raw: &Array2<f64>,
    events: &[T2Event],
    window: EpochWindow,
    sfreq: f64,
) -> Result<Epochs, AnalysisError> {
    let n_window = window.len_samples(sfreq);
    let n_total = raw.ncols();
    if n_window > n_total {
        return Err(AnalysisError::WindowTooLong {
            needed: n_window,
            available: n_total,
        });
    }
    let offset = (window.tmin * sfreq).round() as i64;

    let mut kept = Vec::with_capacity(events.len());
    for &event in events {
        let start = event.sample as i64 + offset;
        if start < 0 || start + n_window as i64 > n_total as i64 {
            log::warn!(
                "event at sample {} leaves the recording, dropped",
                event.sample
            );
            continue;
        }
        kept.push((event, start as usize));
    }

    let mut data = Array3::zeros((kept.len(), raw.nrows(), n_window));
    for (i, &(_, start)) in kept.iter().enumerate() {
        data.slice_mut(s![i, .., ..])
            .assign(&raw.slice(s![.., start..start + n_window]));
    }

    Ok(Epochs {
        data,
        events: kept.into_iter().map(|(event, _)| event).collect(),
        window,
        sfreq,
    })
}

impl Epochs {
    pub fn len(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subtract each channel's mean over the baseline interval.
    pub fn apply_baseline(&mut self) {
        let n_window = self.data.shape()[2];
        let n_base = ((BASELINE_DUR * self.sfreq).round() as usize).clamp(1, n_window);
        for mut epoch in self.data.outer_iter_mut() {
            for mut channel in epoch.outer_iter_mut() {
                let mean = channel.slice(s![..n_base]).mean().unwrap_or(0.0);
                channel -= mean;
            }
        }
    }

    /// Average across epochs, the evoked response
    pub fn evoked(&self) -> Option<Array2<f64>> {
        self.data.mean_axis(Axis(0))
    }

    /// Evoked response over the epochs whose condition matches,
    /// for contrasts such as T2-present against T2-absent
    pub fn evoked_where<F>(&self, predicate: F) -> Option<Array2<f64>>
    where
        F: Fn(&Condition) -> bool,
    {
        let indices: Vec<usize> = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| predicate(&e.condition))
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            return None;
        }
        self.data.select(Axis(0), &indices).mean_axis(Axis(0))
    }
}
