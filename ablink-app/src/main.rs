mod labs;
mod session;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use ablink_core::Constants;
use ablink_experiment::FakeEngine;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!(
            "usage: {} <participant-index> [sites.json site-name] [data-dir]",
            args[0]
        );
    }
    let participant_index: u32 = args[1]
        .parse()
        .context("participant index must be a number")?;
    let site = if args.len() >= 4 {
        labs::load_site_config(PathBuf::from(&args[2]).as_path(), &args[3])?
    } else {
        labs::example_site()
    };
    let data_dir = args
        .get(4)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let consts = Constants::default();

    // The windowed presentation engine is wired in at the lab bench;
    // this binary drives the simulated one for dry runs and piloting.
    let mut engine = FakeEngine::new(site.refresh_rate);

    let report = session::run_session(
        &mut engine,
        &site,
        participant_index,
        &consts,
        rand::rng(),
        &data_dir,
    )?;

    println!(
        "subject {}: {}/{} trials completed{}",
        report.subject,
        report.n_completed,
        report.n_planned,
        if report.exited_early {
            " (exited early)"
        } else {
            ""
        },
    );
    println!("trials: {}", report.trials_fpath.display());
    println!("log:    {}", report.log_fpath.display());
    println!(
        "simulated duration: {:.0} s",
        engine.estimate_duration()
    );
    Ok(())
}
