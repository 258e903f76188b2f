pub mod constants;
pub mod phase;
pub mod triggers;

pub use constants::Constants;
pub use phase::{Phase, Task};
pub use triggers::Condition;
