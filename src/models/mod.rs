//! Motion and sensor models
//!
//! The process model describes how the tracked object moves between
//! readings; the sensor models describe how each modality observes it.

mod transition;
mod observation;

pub use transition::*;
pub use observation::*;
