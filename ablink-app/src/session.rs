//! One experiment session: counterbalanced blocks, the trial loop, and
//! end-of-session persistence.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use rand::Rng;
use serde_json::json;

use ablink_core::{Constants, Phase, Task};
use ablink_experiment::{Engine, TrialGenerator, TrialRecord};
use ablink_timing::Timer;

use crate::labs::SiteConfig;

#[derive(Debug)]
pub struct SessionReport {
    pub subject: String,
    pub trials_fpath: PathBuf,
    pub log_fpath: PathBuf,
    pub n_planned: usize,
    pub n_completed: usize,
    pub exited_early: bool,
}

/// Run a full session against the given presentation engine.
///
/// The trial table is written once at the very end from the accumulated
/// in-memory records; an exit request mid-session persists everything
/// completed so far and leaves the remaining trials blank.
pub fn run_session<E: Engine, R: Rng>(
    engine: &mut E,
    site: &SiteConfig,
    participant_index: u32,
    consts: &Constants,
    rng: R,
    data_dir: &Path,
) -> Result<SessionReport> {
    // subject ID combines the lab code with the participant index
    let subject = format!("{}{:03}", site.abbreviation, participant_index);
    let out_dir = data_dir.join(format!("sub-{subject}"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating data directory {}", out_dir.display()))?;
    let run_stamp = Local::now().format("%Y%m%d%H%M%S");
    let trials_fpath = out_dir.join(format!("sub-{subject}_run-{run_stamp}_trials.csv"));
    let log_fpath = out_dir.join(format!("sub-{subject}_run-{run_stamp}_log.json"));

    let mut timer = Timer::new();
    timer.optimize_flips(site.refresh_rate, consts);
    let mut generator = TrialGenerator::new(timer.clone(), consts.clone(), rng);

    // task order counterbalanced on the participant index parity
    let blocks = if participant_index.is_multiple_of(2) {
        [Task::Dual, Task::Single]
    } else {
        [Task::Single, Task::Dual]
    };
    info!("subject {subject}, block order {blocks:?}");

    engine.show_message(consts.welcome_message, true)?;
    engine.show_message(consts.training_instructions, true)?;

    let mut records: Vec<TrialRecord> = Vec::new();
    for (phase, task) in [Phase::Train, Phase::Test].into_iter().zip(blocks) {
        let block_trials = generator.generate(phase, task)?;
        engine.show_message(
            match task {
                Task::Dual => consts.dual_block_start,
                Task::Single => consts.single_block_start,
            },
            true,
        )?;

        let mut pending = block_trials.into_iter();
        for trial in pending.by_ref() {
            let responses = trial.run(engine, &timer, consts)?;
            records.push(TrialRecord { trial, responses });
            if engine.exit_requested() {
                break;
            }
        }
        // never run, but part of the session plan
        records.extend(pending.map(TrialRecord::planned));

        if engine.exit_requested() {
            break;
        }
        if phase == Phase::Train {
            engine.show_message(consts.finished_training, true)?;
        }
    }

    let exited_early = engine.exit_requested();
    let n_completed = records.iter().filter(|r| r.responses.is_some()).count();

    let table = fs::File::create(&trials_fpath)
        .with_context(|| format!("creating {}", trials_fpath.display()))?;
    write_trial_table(table, &records)?;
    write_session_log(&log_fpath, &subject, site, &records, exited_early)?;
    info!(
        "stored {} trials ({n_completed} completed) at {}",
        records.len(),
        trials_fpath.display(),
    );

    if !exited_early {
        engine.show_message(consts.thank_you, false)?;
    }

    Ok(SessionReport {
        subject,
        trials_fpath,
        log_fpath,
        n_planned: records.len(),
        n_completed,
        exited_early,
    })
}

/// One row per trial, timestamps with 4-decimal precision, blank cells
/// for responses that were never collected.
pub fn write_trial_table<W: Write>(writer: W, records: &[TrialRecord]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "", "phase", "task", "t2presence", "soa_long", "delay_index", "t1_index", "t2_index",
        "target1", "target2", "mask1", "mask2", "mask3", "vis_init", "iti_frames", "t1_trigger",
        "t2_trigger", "id_trigger", "vis_trigger", "t1_onset", "t1_offset", "t2_onset",
        "t2_offset", "id_choice", "id_onset", "id_rt", "vis_rating", "vis_onset", "vis_rt",
    ])?;

    let secs = |v: Option<f64>| v.map(|x| format!("{x:.4}")).unwrap_or_default();
    for (index, record) in records.iter().enumerate() {
        let trial = &record.trial;
        let responses = record.responses.as_ref();
        out.write_record([
            index.to_string(),
            trial.phase.as_str().to_string(),
            trial.task.as_str().to_string(),
            trial.t2presence.to_string(),
            trial.soa_long.to_string(),
            trial.delay_index.to_string(),
            trial.t1_index.to_string(),
            trial.t2_index.to_string(),
            trial.target1.to_string(),
            trial.target2.to_string(),
            trial.masks[0].clone(),
            trial.masks[1].clone(),
            trial.masks[2].clone(),
            trial.vis_init.to_string(),
            trial.iti_frames.to_string(),
            trial.t1_trigger.to_string(),
            trial.t2_trigger.to_string(),
            trial.id_trigger.to_string(),
            trial.vis_trigger.to_string(),
            secs(responses.map(|r| r.t1_onset)),
            secs(responses.map(|r| r.t1_offset)),
            secs(responses.map(|r| r.t2_onset)),
            secs(responses.map(|r| r.t2_offset)),
            responses
                .and_then(|r| r.id_choice)
                .map(|c| c.to_string())
                .unwrap_or_default(),
            secs(responses.and_then(|r| r.id_onset)),
            secs(responses.and_then(|r| r.id_rt)),
            responses
                .map(|r| r.vis_rating.to_string())
                .unwrap_or_default(),
            secs(responses.map(|r| r.vis_onset)),
            secs(responses.map(|r| r.vis_rt)),
        ])?;
    }
    out.flush()?;
    Ok(())
}

fn write_session_log(
    path: &Path,
    subject: &str,
    site: &SiteConfig,
    records: &[TrialRecord],
    exited_early: bool,
) -> Result<()> {
    let log = json!({
        "subject": subject,
        "platform": {
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        },
        "site": site,
        "n_trials_planned": records.len(),
        "n_trials_completed": records.iter().filter(|r| r.responses.is_some()).count(),
        "exited_early": exited_early,
    });
    fs::write(path, serde_json::to_string_pretty(&log)?)
        .with_context(|| format!("writing session log {}", path.display()))?;
    Ok(())
}
