pub mod controller;
pub mod events;
pub mod run_state;

pub use controller::StreamController;
pub use events::{StreamEvent, StreamStatus};
pub use run_state::{RunState, StopReason};
