use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The epoch window asks for more samples than the recording holds
    #[error("epoch window spans {needed} samples but the recording has {available}")]
    WindowTooLong { needed: usize, available: usize },

    #[error("expected {expected} EOG channels, got {got}")]
    EogChannels { expected: usize, got: usize },

    #[error("epoch counts differ: {eeg} EEG epochs vs {eog} EOG epochs")]
    EpochCountMismatch { eeg: usize, eog: usize },
}
