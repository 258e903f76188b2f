use ablink_core::Constants;
use ablink_timing::Timer;
use anyhow::Result;
use serde::Serialize;

use crate::engine::Engine;

/// One fully-specified trial, fixed at generation time.
///
/// Everything randomized is resolved before the session starts; running
/// a trial only observes. Responses live in [`TrialResponses`] so that a
/// planned trial can never be mistaken for a completed one.
#[derive(Debug, Clone, Serialize)]
pub struct Trial {
    pub phase: ablink_core::Phase,
    pub task: ablink_core::Task,
    pub t2presence: bool,
    pub soa_long: bool,
    /// 0 for the quick pre-T1 fixation, 1 for the slow one
    pub delay_index: u32,
    pub t1_index: u32,
    pub t2_index: u32,
    pub target1: &'static str,
    pub target2: &'static str,
    pub masks: [String; 3],
    /// Starting cursor position on the visibility scale
    pub vis_init: u32,
    pub iti_frames: u32,
    pub t1_trigger: u8,
    pub t2_trigger: u8,
    pub id_trigger: u8,
    pub vis_trigger: u8,
}

/// Observations from one run of a trial.
///
/// Onsets are device flip timestamps in seconds; offsets are the onsets
/// of the blank following each target. Identity fields stay `None` for
/// single-task trials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResponses {
    pub t1_onset: f64,
    pub t1_offset: f64,
    pub t2_onset: f64,
    pub t2_offset: f64,
    pub id_choice: Option<usize>,
    pub id_onset: Option<f64>,
    pub id_rt: Option<f64>,
    pub vis_rating: u32,
    pub vis_onset: f64,
    pub vis_rt: f64,
}

/// A trial together with its outcome, if it has been run.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    #[serde(flatten)]
    pub trial: Trial,
    pub responses: Option<TrialResponses>,
}

impl TrialRecord {
    pub fn planned(trial: Trial) -> Self {
        Self {
            trial,
            responses: None,
        }
    }

    /// Whether the identity choice named the letter pair hidden in T1
    pub fn identity_correct(&self, consts: &Constants) -> Option<bool> {
        let responses = self.responses.as_ref()?;
        let choice = responses.id_choice?;
        let chosen = if choice == 0 {
            consts.task_identity_options.0
        } else {
            consts.task_identity_options.1
        };
        Some(self.trial.target1.contains(chosen))
    }
}

impl Trial {
    /// Present this trial and collect responses.
    ///
    /// Strictly sequential; device errors propagate without retry, since
    /// a timing-sensitive presentation cannot be replayed after a glitch.
    /// Returns `None` if the device already reported an exit request, so
    /// the caller can unwind without a partly-observed trial.
    pub fn run<E: Engine>(
        &self,
        engine: &mut E,
        timer: &Timer,
        consts: &Constants,
    ) -> Result<Option<TrialResponses>> {
        if engine.exit_requested() {
            return Ok(None);
        }

        let dur = timer.target_dur;

        engine.display_empty_screen(self.iti_frames)?;
        engine.display_fix_cross(timer.t1_delay_frames(self.delay_index))?;

        let t1_onset = engine.display_t1(self.target1, self.t1_trigger, dur)?;
        let t1_offset = engine.display_empty_screen(dur)?;
        engine.display_mask(&self.masks[0], dur)?;

        // T1, its blank and its mask already consumed 3 stimulus slots
        // of the T1-to-T2 asynchrony
        let gap = timer.soa_frames(self.soa_long).saturating_sub(3 * dur);
        engine.display_fix_cross(gap)?;

        let t2_text = if self.t2presence { self.target2 } else { "" };
        let t2_onset = engine.display_t2(t2_text, self.t2_trigger, dur)?;
        let t2_offset = engine.display_empty_screen(dur)?;
        engine.display_mask(&self.masks[1], dur)?;
        engine.display_empty_screen(dur)?;
        engine.display_mask(&self.masks[2], dur)?;

        engine.display_empty_screen(timer.task_delay)?;

        let vis = engine.prompt_visibility(
            consts.task_vis_text,
            consts.task_vis_labels,
            consts.vis_scale_length,
            self.vis_init,
            self.vis_trigger,
        )?;

        let id = if self.task.is_dual() {
            Some(engine.prompt_identity(
                consts.task_identity_text,
                consts.task_identity_options,
                self.id_trigger,
            )?)
        } else {
            None
        };

        Ok(Some(TrialResponses {
            t1_onset,
            t1_offset,
            t2_onset,
            t2_offset,
            id_choice: id.map(|p| p.value),
            id_onset: id.map(|p| p.onset),
            id_rt: id.map(|p| p.rt_ms),
            vis_rating: vis.value,
            vis_onset: vis.onset,
            vis_rt: vis.rt_ms,
        }))
    }
}
