use serde::{Deserialize, Serialize};

/// Training or test half of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Train,
    Test,
}

impl Phase {
    pub fn is_training(self) -> bool {
        matches!(self, Phase::Train)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Train => "train",
            Phase::Test => "test",
        }
    }
}

/// Whether the participant reports both targets or only rates T2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Single,
    Dual,
}

impl Task {
    pub fn is_dual(self) -> bool {
        matches!(self, Task::Dual)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Task::Single => "single",
            Task::Dual => "dual",
        }
    }
}
