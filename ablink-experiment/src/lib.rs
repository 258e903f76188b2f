pub mod engine;
pub mod events;
pub mod ports;
pub mod trial;
pub mod trials;

pub use engine::{Engine, FakeEngine, Prompted};
pub use ports::{FakeTriggerPort, TriggerPort};
pub use trial::{Trial, TrialRecord, TrialResponses};
pub use trials::{TrialGenerator, TrialRecipe};
