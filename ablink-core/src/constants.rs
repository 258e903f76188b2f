/// Design-time parameters of the experiment.
///
/// Frame counts are given at 70 Hz, the refresh rate of the original
/// study, and get rescaled to the measured rate by the timing crate.
#[derive(Debug, Clone)]
pub struct Constants {
    /// Fixation before T1, quick variant (516 ms at 70 Hz)
    pub short_t1_delay: u32,
    /// Fixation before T1, slow variant (860 ms)
    pub long_t1_delay: u32,
    /// T1-to-T2 onset asynchrony, blink-inducing (258 ms)
    pub short_soa: u32,
    /// T1-to-T2 onset asynchrony, easy (688 ms)
    pub long_soa: u32,
    /// Duration of each target, blank and mask (43 ms)
    pub target_dur: u32,
    /// Gap between the last mask and the response prompts (500 ms)
    pub task_delay: u32,

    /// Inter-trial interval range in seconds
    pub iti_min_sec: f64,
    pub iti_max_sec: f64,

    /// Trials per cell when only the visibility rating is performed
    pub n_trials_single: usize,
    /// Trials in the T2-present/short-SOA cell of the dual task
    pub n_trials_dual_critical: usize,
    /// Trials in each remaining dual-task cell
    pub n_trials_dual_easy: usize,
    /// Training blocks run each cell at 1/divisor size
    pub n_training_trial_divisor: usize,

    /// Number of positions on the visibility rating scale
    pub vis_scale_length: u32,

    pub target1_strings: [&'static str; 2],
    pub target2_strings: [&'static str; 4],
    /// Pool the 4-letter masks are drawn from, without replacement
    pub possible_consonants: [char; 16],

    pub task_identity_options: (&'static str, &'static str),
    pub task_vis_labels: (&'static str, &'static str),

    pub welcome_message: &'static str,
    pub training_instructions: &'static str,
    pub finished_training: &'static str,
    pub dual_block_start: &'static str,
    pub single_block_start: &'static str,
    pub thank_you: &'static str,
    pub task_vis_text: &'static str,
    pub task_identity_text: &'static str,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            short_t1_delay: 36,
            long_t1_delay: 60,
            short_soa: 15,
            long_soa: 41,
            target_dur: 3,
            task_delay: 37,
            iti_min_sec: 3.0,
            iti_max_sec: 4.0,
            n_trials_single: 32,
            n_trials_dual_critical: 96,
            n_trials_dual_easy: 48,
            n_training_trial_divisor: 8,
            vis_scale_length: 21,
            target1_strings: ["XOOX", "OXXO"],
            target2_strings: ["ZERO", "FOUR", "FIVE", "NINE"],
            possible_consonants: [
                'W', 'R', 'Z', 'P', 'S', 'D', 'F', 'G', 'H', 'J', 'K', 'C', 'B', 'Y', 'N', 'M',
            ],
            task_identity_options: ("OO", "XX"),
            task_vis_labels: ("didn't see", "maximum visibility"),
            welcome_message: "Welcome to the experiment. \n\n Please press 'space' if you are ready to start.",
            training_instructions: "The training phase starts now",
            finished_training: "Great! You have completed the training phase. \n\nPress 'space' if you are ready to continue with the test phase.",
            dual_block_start: "In the following trials you will have to perform TWO tasks! \n\n Please press 'space' if you are ready to start.",
            single_block_start: "In the following trials you will have to perform only ONE task! \n\n Please press 'space' if you are ready to start.",
            thank_you: "Great! You completed all trials. Thank you for your participation.",
            task_vis_text: "Please indicate the visibility of the number word.\nPress 'space' to confirm.\n\n",
            task_identity_text: "Please indicate what the two letters \n in the center of target 1 were. \nPress 'space' to confirm.\n\n",
        }
    }
}
