//! Bad-epoch regions as time annotations on the recording.
//!
//! Anchoring rejections to absolute time lets any later epoching pass
//! over the same raw recording exclude the same intervals without
//! recomputing per-epoch statistics.

use std::io::Write;

use serde::Serialize;

use crate::events::T2Event;
use crate::reject::Rejection;
use crate::window::EpochWindow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub onset: f64,
    pub duration: f64,
    pub description: String,
}

/// One annotation per rejected epoch, spanning its full epoch window,
/// anchored at the trigger sample on the recording's clock.
pub fn bad_epoch_annotations(
    rejection: &Rejection,
    events: &[T2Event],
    window: &EpochWindow,
    sfreq: f64,
) -> Vec<Annotation> {
    rejection
        .bad
        .iter()
        .map(|&(index, reason)| {
            let event_onset = events[index].sample as f64 / sfreq;
            Annotation {
                onset: event_onset + window.tmin,
                duration: window.annotation_duration(),
                description: reason.label().to_string(),
            }
        })
        .collect()
}

/// Write annotations as `(onset, duration, description)` CSV rows,
/// onsets and durations with 4-decimal precision.
pub fn write_annotations<W: Write>(writer: W, annotations: &[Annotation]) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["onset", "duration", "description"])?;
    for annotation in annotations {
        out.write_record([
            format!("{:.4}", annotation.onset),
            format!("{:.4}", annotation.duration),
            annotation.description.clone(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{RecordedEvent, select_t2_events};
    use crate::reject::{RejectCounts, RejectReason};

    fn rejection(bad: Vec<(usize, RejectReason)>, n_epochs: usize) -> Rejection {
        Rejection {
            bad,
            counts: RejectCounts::default(),
            n_epochs,
        }
    }

    #[test]
    fn annotations_span_the_epoch_window() {
        let events = select_t2_events(&[
            RecordedEvent { sample: 512, code: 30 },
            RecordedEvent { sample: 1536, code: 26 },
        ]);
        let window = EpochWindow { tmin: -0.534, tmax: 0.731 };
        let rejection = rejection(vec![(1, RejectReason::Blink)], 2);
        let annotations = bad_epoch_annotations(&rejection, &events, &window, 512.0);
        assert_eq!(annotations.len(), 1);
        let annotation = &annotations[0];
        // event at 3.0 s, shifted left by tmin
        assert!((annotation.onset - (3.0 - 0.534)).abs() < 1e-9);
        assert!((annotation.duration - (0.534 + 0.715)).abs() < 1e-9);
        assert_eq!(annotation.description, "bad blink");
    }

    #[test]
    fn csv_export_has_fixed_precision() {
        let annotations = vec![
            Annotation {
                onset: 2.466,
                duration: 1.249,
                description: "bad transient".into(),
            },
            Annotation {
                onset: 10.5,
                duration: 1.249,
                description: "bad peak".into(),
            },
        ];
        let mut buffer = Vec::new();
        write_annotations(&mut buffer, &annotations).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("onset,duration,description"));
        assert_eq!(lines.next(), Some("2.4660,1.2490,bad transient"));
        assert_eq!(lines.next(), Some("10.5000,1.2490,bad peak"));
    }
}
