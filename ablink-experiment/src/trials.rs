//! Trial generation: crossed-condition enumeration and balanced
//! sampling of the secondary factors.

use ablink_core::{Constants, Phase, Task, triggers};
use ablink_timing::{Timer, TimingError};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::trial::Trial;

/// One crossed condition cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialRecipe {
    pub phase: Phase,
    pub task: Task,
    pub t2presence: bool,
    pub soa_long: bool,
}

impl TrialRecipe {
    /// Trials this cell needs. The T2-present/short-SOA cell of the dual
    /// task is the attentional-blink critical condition and gets double
    /// weight; training runs every cell at a fraction of the test size.
    pub fn n_trials(&self, consts: &Constants) -> usize {
        let div = match self.phase {
            Phase::Train => consts.n_training_trial_divisor,
            Phase::Test => 1,
        };
        let n = match self.task {
            Task::Single => consts.n_trials_single,
            Task::Dual if self.t2presence && !self.soa_long => consts.n_trials_dual_critical,
            Task::Dual => consts.n_trials_dual_easy,
        };
        n / div
    }
}

/// Compiles balanced, shuffled trial lists per phase and task and keeps
/// everything it produced for end-of-session serialization.
pub struct TrialGenerator<R: Rng> {
    timer: Timer,
    consts: Constants,
    rng: R,
    pub all: Vec<Trial>,
}

impl<R: Rng> TrialGenerator<R> {
    pub fn new(timer: Timer, consts: Constants, rng: R) -> Self {
        Self {
            timer,
            consts,
            rng,
            all: Vec::new(),
        }
    }

    /// Compile the trial list for one phase of one task block.
    pub fn generate(&mut self, phase: Phase, task: Task) -> Result<Vec<Trial>, TimingError> {
        let mut trials = Vec::new();
        for t2presence in [false, true] {
            for soa_long in [false, true] {
                let recipe = TrialRecipe {
                    phase,
                    task,
                    t2presence,
                    soa_long,
                };
                let n = recipe.n_trials(&self.consts);
                trials.extend(self.trials_for(recipe, n)?);
            }
        }
        log::info!(
            "generated {} {} {}-task trials",
            trials.len(),
            phase.as_str(),
            task.as_str(),
        );
        self.all.extend(trials.iter().cloned());
        Ok(trials)
    }

    /// Balance the remaining variables within one condition cell.
    fn trials_for(&mut self, recipe: TrialRecipe, n: usize) -> Result<Vec<Trial>, TimingError> {
        let delays = self.shuffled_repeated(&[0, 1], n);
        let t1s = self.shuffled_repeated(&[0, 1], n);
        let t2s = self.shuffled_repeated(&[0, 1, 2, 3], n);
        let vis_range: Vec<u32> = (0..self.consts.vis_scale_length).collect();
        let vis_inits = self.shuffled_repeated(&vis_range, n);
        (0..n)
            .map(|t| self.create_trial(recipe, delays[t], t1s[t], t2s[t], vis_inits[t]))
            .collect()
    }

    /// Repeat the value set until it covers `length`, then shuffle.
    ///
    /// Guarantees an exact split across the set (±1 when `length` is not
    /// a multiple) with no systematic ordering. Returns the whole
    /// repeated list; callers index the first `length` entries.
    fn shuffled_repeated(&mut self, vals: &[u32], length: usize) -> Vec<u32> {
        let reps = length.div_ceil(vals.len());
        let mut out: Vec<u32> = vals.iter().copied().cycle().take(reps * vals.len()).collect();
        out.shuffle(&mut self.rng);
        out
    }

    /// Initialize the unbalanced random variables and resolve triggers.
    fn create_trial(
        &mut self,
        recipe: TrialRecipe,
        delay_index: u32,
        t1_index: u32,
        t2_index: u32,
        vis_init: u32,
    ) -> Result<Trial, TimingError> {
        let masks = [self.draw_mask(), self.draw_mask(), self.draw_mask()];
        let iti_secs = self
            .rng
            .random_range(self.consts.iti_min_sec..self.consts.iti_max_sec);
        let iti_frames = self.timer.secs_to_flips(iti_secs)?;
        let training = recipe.phase.is_training();
        let dual = recipe.task.is_dual();
        Ok(Trial {
            phase: recipe.phase,
            task: recipe.task,
            t2presence: recipe.t2presence,
            soa_long: recipe.soa_long,
            delay_index,
            t1_index,
            t2_index,
            target1: self.consts.target1_strings[t1_index as usize],
            target2: self.consts.target2_strings[t2_index as usize],
            masks,
            vis_init,
            iti_frames,
            t1_trigger: triggers::code(training, false, recipe.t2presence, dual, recipe.soa_long),
            t2_trigger: triggers::code(training, true, recipe.t2presence, dual, recipe.soa_long),
            id_trigger: triggers::identity_code(training),
            vis_trigger: triggers::visibility_code(training),
        })
    }

    /// 4 letters drawn without replacement from the consonant pool
    fn draw_mask(&mut self) -> String {
        self.consts
            .possible_consonants
            .choose_multiple(&mut self.rng, 4)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn generator() -> TrialGenerator<StdRng> {
        let consts = Constants::default();
        let mut timer = Timer::new();
        timer.optimize_flips(60.0, &consts);
        TrialGenerator::new(timer, consts, StdRng::from_os_rng())
    }

    /// Trials of the dual-task critical cell (T2 present, short SOA), n = 96
    fn sample_cell() -> Vec<Trial> {
        generator()
            .generate(Phase::Test, Task::Dual)
            .unwrap()
            .into_iter()
            .filter(|t| t.t2presence && !t.soa_long)
            .collect()
    }

    /// Trials of the dual-task T2-present/long-SOA cell, n = 48
    fn sample_easy_cell() -> Vec<Trial> {
        generator()
            .generate(Phase::Test, Task::Dual)
            .unwrap()
            .into_iter()
            .filter(|t| t.t2presence && t.soa_long)
            .collect()
    }

    fn mean(vals: &[u32]) -> f64 {
        vals.iter().map(|&v| v as f64).sum::<f64>() / vals.len() as f64
    }

    fn max_consecutive_reps(vals: &[u32]) -> usize {
        let mut longest = 1;
        let mut run = 1;
        for pair in vals.windows(2) {
            run = if pair[0] == pair[1] { run + 1 } else { 1 };
            longest = longest.max(run);
        }
        longest
    }

    #[test]
    fn training_counts() {
        let mut generator = generator();
        assert_eq!(
            generator.generate(Phase::Train, Task::Single).unwrap().len(),
            16
        );
        assert_eq!(
            generator.generate(Phase::Train, Task::Dual).unwrap().len(),
            30
        );
    }

    #[test]
    fn count_by_conditions_dual_task() {
        let consts = Constants::default();
        let trials = generator().generate(Phase::Test, Task::Dual).unwrap();
        assert_eq!(trials.len(), 240);
        let count = |presence: bool, soa: bool| {
            trials
                .iter()
                .filter(|t| t.t2presence == presence && t.soa_long == soa)
                .count()
        };
        assert_eq!(count(true, false), consts.n_trials_dual_critical);
        assert_eq!(count(true, true), consts.n_trials_dual_easy);
        assert_eq!(count(false, false), consts.n_trials_dual_easy);
        assert_eq!(count(false, true), consts.n_trials_dual_easy);
    }

    #[test]
    fn count_by_conditions_single_task() {
        let consts = Constants::default();
        let trials = generator().generate(Phase::Test, Task::Single).unwrap();
        assert_eq!(trials.len(), 128);
        for presence in [false, true] {
            for soa in [false, true] {
                let n = trials
                    .iter()
                    .filter(|t| t.t2presence == presence && t.soa_long == soa)
                    .count();
                assert_eq!(n, consts.n_trials_single);
            }
        }
    }

    #[test]
    fn zero_trial_cells_are_valid() {
        let consts = Constants {
            n_trials_single: 0,
            ..Constants::default()
        };
        let mut timer = Timer::new();
        timer.optimize_flips(60.0, &consts);
        let mut generator = TrialGenerator::new(timer, consts, StdRng::seed_from_u64(1));
        assert!(generator.generate(Phase::Test, Task::Single).unwrap().is_empty());
    }

    #[test]
    fn delay_sampling_is_balanced_and_fresh() {
        let sample1: Vec<u32> = sample_cell().iter().map(|t| t.delay_index).collect();
        let sample2: Vec<u32> = sample_cell().iter().map(|t| t.delay_index).collect();
        assert_eq!(mean(&sample1), 0.5);
        assert!(max_consecutive_reps(&sample1) <= 16);
        assert_ne!(sample1, sample2);
    }

    #[test]
    fn t1_sampling_is_balanced_and_fresh() {
        let sample1: Vec<u32> = sample_cell().iter().map(|t| t.t1_index).collect();
        let sample2: Vec<u32> = sample_cell().iter().map(|t| t.t1_index).collect();
        assert_eq!(mean(&sample1), 0.5);
        assert!(max_consecutive_reps(&sample1) <= 16);
        assert_ne!(sample1, sample2);
    }

    #[test]
    fn t2_sampling_is_near_uniform() {
        let sample1: Vec<u32> = sample_cell().iter().map(|t| t.t2_index).collect();
        let sample2: Vec<u32> = sample_cell().iter().map(|t| t.t2_index).collect();
        assert_eq!(mean(&sample1), 1.5);
        assert!(max_consecutive_reps(&sample1) <= 8);
        assert_ne!(sample1, sample2);
    }

    #[test]
    fn vis_init_spreads_over_the_scale() {
        let consts = Constants::default();
        let sample1: Vec<u32> = sample_cell().iter().map(|t| t.vis_init).collect();
        let sample2: Vec<u32> = sample_cell().iter().map(|t| t.vis_init).collect();
        let expected = consts.vis_scale_length as f64 / 2.0;
        assert!((mean(&sample1) - expected).abs() <= 1.0);
        assert!(max_consecutive_reps(&sample1) <= 4);
        assert_ne!(sample1, sample2);
    }

    #[test]
    fn masks_have_distinct_letters_and_rarely_repeat() {
        let cell = sample_easy_cell();
        let mut all_masks = Vec::new();
        for trial in &cell {
            assert_eq!(trial.masks.len(), 3);
            for mask in &trial.masks {
                assert_eq!(mask.chars().count(), 4);
                let letters: HashSet<char> = mask.chars().collect();
                assert_eq!(letters.len(), 4, "mask letters must be distinct: {mask}");
                all_masks.push(mask.clone());
            }
        }
        let unique: HashSet<&String> = all_masks.iter().collect();
        assert!(all_masks.len() - unique.len() <= 2);
    }

    #[test]
    fn iti_stays_in_range_and_varies() {
        let consts = Constants::default();
        let mut timer = Timer::new();
        timer.optimize_flips(60.0, &consts);
        let lo = timer.secs_to_flips(consts.iti_min_sec).unwrap();
        let hi = timer.secs_to_flips(consts.iti_max_sec).unwrap();
        let itis: Vec<u32> = sample_cell().iter().map(|t| t.iti_frames).collect();
        assert!(itis.iter().all(|&f| (lo..=hi).contains(&f)));
        let distinct: HashSet<u32> = itis.iter().copied().collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn triggers_preset_for_test_phase() {
        let trials = generator().generate(Phase::Test, Task::Dual).unwrap();
        let trial = trials
            .iter()
            .find(|t| t.t2presence && !t.soa_long)
            .unwrap();
        assert_eq!(trial.t1_trigger, 22);
        assert_eq!(trial.t2_trigger, 30);
        assert_eq!(trial.id_trigger, triggers::TASK_IDENTITY);
        assert_eq!(trial.vis_trigger, triggers::TASK_VISIBILITY);
    }

    #[test]
    fn triggers_preset_for_training_phase() {
        let trials = generator().generate(Phase::Train, Task::Single).unwrap();
        let trial = trials
            .iter()
            .find(|t| !t.t2presence && t.soa_long)
            .unwrap();
        assert_eq!(trial.t2_trigger, 41);
        assert_eq!(trial.id_trigger, triggers::TASK_IDENTITY_TRAINING);
        assert_eq!(trial.vis_trigger, triggers::TASK_VISIBILITY_TRAINING);
    }

    #[test]
    fn generator_accumulates_everything() {
        let mut generator = generator();
        generator.generate(Phase::Train, Task::Dual).unwrap();
        generator.generate(Phase::Test, Task::Dual).unwrap();
        assert_eq!(generator.all.len(), 30 + 240);
    }

    #[test]
    fn unconfigured_timer_is_an_error() {
        let mut generator = TrialGenerator::new(
            Timer::new(),
            Constants::default(),
            StdRng::seed_from_u64(2),
        );
        assert!(generator.generate(Phase::Test, Task::Single).is_err());
    }
}
