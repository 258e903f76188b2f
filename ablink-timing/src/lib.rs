pub mod timer;

pub use timer::{Timer, TimingError, ORIG_FLIP_RATE};
