pub mod annotations;
pub mod channels;
pub mod error;
pub mod epochs;
pub mod events;
pub mod reject;
pub mod window;

pub use annotations::Annotation;
pub use epochs::Epochs;
pub use error::AnalysisError;
pub use events::{RecordedEvent, T2Event};
pub use reject::{RejectReason, Rejection, Thresholds};
pub use window::EpochWindow;
