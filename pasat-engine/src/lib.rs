//! Timer-driven engine for the paced serial-addition task: configuration,
//! answer evaluation, adaptive pacing, and the [`PacedTask`] scheduler that
//! ties them to a ledger and an observer.

pub mod config;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod task;

pub use config::TaskConfig;
pub use controller::{IsiChange, IsiController};
pub use error::TaskError;
pub use evaluator::{Evaluation, evaluate};
pub use task::PacedTask;
