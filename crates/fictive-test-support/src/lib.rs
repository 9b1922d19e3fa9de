//! Shared test mocks and utilities for the Fictive collaborative fiction
//! engine.

mod clock;
mod repository;

pub use clock::{FixedClock, ManualClock};
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
