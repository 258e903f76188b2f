//! Flattens completed trials into BIDS-style event rows.

use ablink_core::{Constants, Phase};
use serde::Serialize;

use crate::trial::TrialRecord;

/// One row of the events table. Stimulus rows carry the full condition;
/// prompt rows only what applies to them. A missing onset means the
/// event never happened (identity prompt of a single-task trial).
#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    pub onset: Option<f64>,
    pub trial_index: usize,
    pub trial_type: &'static str,
    /// The trigger code that was (or would have been) pulsed
    pub value: u8,
    pub phase: Phase,
    pub dual_task: bool,
    pub t2presence: Option<bool>,
    pub soa_long: Option<bool>,
    pub stimulus: Option<&'static str>,
    pub response_time: Option<f64>,
    pub vis_rating: Option<u32>,
    pub vis_init: Option<u32>,
    pub correct: Option<bool>,
}

/// Event rows for every run trial, ordered T1, T2, identity prompt,
/// visibility prompt within each trial. Trials that were never run
/// produce no rows.
pub fn format_events(records: &[TrialRecord], consts: &Constants) -> Vec<EventRow> {
    let mut rows = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let Some(responses) = &record.responses else {
            continue;
        };
        let trial = &record.trial;
        let dual = trial.task.is_dual();
        let stimulus_row = |trial_type, onset, value, stimulus| EventRow {
            onset: Some(onset),
            trial_index: index,
            trial_type,
            value,
            phase: trial.phase,
            dual_task: dual,
            t2presence: Some(trial.t2presence),
            soa_long: Some(trial.soa_long),
            stimulus: Some(stimulus),
            response_time: None,
            vis_rating: Some(responses.vis_rating),
            vis_init: Some(trial.vis_init),
            correct: record.identity_correct(consts),
        };
        rows.push(stimulus_row(
            "t1",
            responses.t1_onset,
            trial.t1_trigger,
            trial.target1,
        ));
        rows.push(stimulus_row(
            "t2",
            responses.t2_onset,
            trial.t2_trigger,
            trial.target2,
        ));
        rows.push(EventRow {
            onset: responses.id_onset,
            trial_index: index,
            trial_type: "prompt_t1",
            value: trial.id_trigger,
            phase: trial.phase,
            dual_task: dual,
            t2presence: None,
            soa_long: None,
            stimulus: None,
            response_time: responses.id_rt,
            vis_rating: None,
            vis_init: None,
            correct: None,
        });
        rows.push(EventRow {
            onset: Some(responses.vis_onset),
            trial_index: index,
            trial_type: "prompt_t2",
            value: trial.vis_trigger,
            phase: trial.phase,
            dual_task: dual,
            t2presence: None,
            soa_long: None,
            stimulus: None,
            response_time: Some(responses.vis_rt),
            vis_rating: Some(responses.vis_rating),
            vis_init: None,
            correct: None,
        });
    }
    rows
}
