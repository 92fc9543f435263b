//! Event vocabulary of the task ledger.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a single scored trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The submitted answer equals the trial sum.
    Right,
    /// An answer was submitted but does not equal the trial sum.
    Wrong,
    /// The trial expired with no answer.
    Miss,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Right)
    }

    pub fn is_failure(self) -> bool {
        !self.is_success()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Right => "right",
            Outcome::Wrong => "wrong",
            Outcome::Miss => "miss",
        };
        f.write_str(name)
    }
}

/// Everything the ledger can record: session boundaries, scored trials,
/// and adaptive pace adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Start,
    Stop,
    Right,
    Wrong,
    Miss,
    /// The ISI was lowered after a full window of successes.
    Faster,
    /// The ISI was raised after a full window of failures.
    Slower,
}

impl EventKind {
    /// The trial outcome this event records, if it records one.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            EventKind::Right => Some(Outcome::Right),
            EventKind::Wrong => Some(Outcome::Wrong),
            EventKind::Miss => Some(Outcome::Miss),
            _ => None,
        }
    }

    /// Whether this event marks a scored trial.
    pub fn is_scored(self) -> bool {
        self.outcome().is_some()
    }

    /// Whether this event marks an adaptive ISI change.
    pub fn is_adjustment(self) -> bool {
        matches!(self, EventKind::Faster | EventKind::Slower)
    }
}

impl From<Outcome> for EventKind {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Right => EventKind::Right,
            Outcome::Wrong => EventKind::Wrong,
            Outcome::Miss => EventKind::Miss,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Start => "start",
            EventKind::Stop => "stop",
            EventKind::Right => "right",
            EventKind::Wrong => "wrong",
            EventKind::Miss => "miss",
            EventKind::Faster => "faster",
            EventKind::Slower => "slower",
        };
        f.write_str(name)
    }
}

/// One immutable ledger entry. `isi` is the inter-stimulus interval in
/// effect when the event was recorded; adjustment events carry the interval
/// they changed it to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(with = "duration_ms")]
    pub isi: Duration,
    pub kind: EventKind,
}

/// Serde adapter for `Duration` as integer milliseconds, patterned after
/// `chrono::serde::ts_milliseconds`. Millisecond resolution is the task's
/// native unit; finer precision is never recorded.
pub mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn outcome_success_split() {
        assert!(Outcome::Right.is_success());
        assert!(!Outcome::Right.is_failure());
        assert!(Outcome::Wrong.is_failure());
        assert!(Outcome::Miss.is_failure());
    }

    #[test]
    fn scored_kinds_map_back_to_outcomes() {
        assert_eq!(EventKind::Right.outcome(), Some(Outcome::Right));
        assert_eq!(EventKind::Wrong.outcome(), Some(Outcome::Wrong));
        assert_eq!(EventKind::Miss.outcome(), Some(Outcome::Miss));
        assert_eq!(EventKind::Start.outcome(), None);
        assert_eq!(EventKind::Faster.outcome(), None);
    }

    #[test]
    fn adjustment_kinds() {
        assert!(EventKind::Faster.is_adjustment());
        assert!(EventKind::Slower.is_adjustment());
        assert!(!EventKind::Miss.is_adjustment());
        assert!(!EventKind::Stop.is_adjustment());
    }

    #[test]
    fn display_names_are_lowercase() {
        assert_eq!(EventKind::Start.to_string(), "start");
        assert_eq!(EventKind::Slower.to_string(), "slower");
        assert_eq!(Outcome::Miss.to_string(), "miss");
    }

    #[test]
    fn event_serializes_isi_as_millis() {
        let event = TaskEvent {
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            isi: Duration::from_millis(3000),
            kind: EventKind::Start,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["isi"], 3000);
        assert_eq!(json["kind"], "start");

        let back: TaskEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
