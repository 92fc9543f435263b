//! Task configuration.

use std::time::Duration;

use pasat_core::event::duration_ms;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Knobs for one task instance. Durations serialize as integer
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Values stimuli are drawn from, uniformly at random.
    pub alphabet: Vec<u32>,

    /// How many of the most recent scored trials the pacer inspects when
    /// deciding whether to adjust the ISI.
    pub adjust_window: usize,

    /// Amount the ISI moves per adaptive adjustment.
    #[serde(with = "duration_ms")]
    pub isi_step: Duration,

    /// Lower bound the pacer will never push the ISI below.
    #[serde(with = "duration_ms")]
    pub min_isi: Duration,

    /// Delay between `start` and the first stimulus, used when the caller
    /// does not pass one explicitly.
    #[serde(with = "duration_ms")]
    pub initial_delay: Duration,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            alphabet: (1..=9).collect(),
            adjust_window: 4,
            isi_step: Duration::from_millis(100),
            min_isi: Duration::from_millis(100),
            initial_delay: Duration::from_millis(500),
        }
    }
}

impl TaskConfig {
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.alphabet.is_empty() {
            return Err(TaskError::InvalidConfig(
                "stimulus alphabet is empty".to_owned(),
            ));
        }
        if self.adjust_window == 0 {
            return Err(TaskError::InvalidConfig(
                "adjustment window must hold at least one trial".to_owned(),
            ));
        }
        if self.isi_step.is_zero() {
            return Err(TaskError::InvalidConfig(
                "ISI step must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }
}
