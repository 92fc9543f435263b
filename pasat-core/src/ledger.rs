//! Append-only event ledger and per-session aggregation.
//!
//! The ledger is the single source of truth for everything that happened
//! across task sessions. Events are only ever appended; stopping a session
//! does not clear them, so one ledger can hold any number of consecutive
//! sessions delimited by `start`/`stop` pairs.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::event::{EventKind, Outcome, TaskEvent, duration_ms};

/// Ledger scan failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A `stop` event closed a span whose first event is not `start`.
    #[error("session ending at event {index} opens with `{found}`, expected `start`")]
    MalformedSession { index: usize, found: EventKind },
}

/// Append-only record of task events.
#[derive(Debug, Default, Clone)]
pub struct EventLedger {
    events: Vec<TaskEvent>,
}

impl EventLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event stamped with the current wall-clock time.
    pub fn record(&mut self, kind: EventKind, isi: Duration) {
        self.events.push(TaskEvent {
            timestamp: Utc::now(),
            isi,
            kind,
        });
    }

    pub fn events(&self) -> &[TaskEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Aggregates every complete `start`..`stop` span into a report.
    ///
    /// A trailing span with no `stop` yet (a session still in progress)
    /// is not reported. A span that closes without opening on `start`
    /// means the ledger was corrupted and aggregation refuses to guess.
    pub fn aggregate_sessions(&self) -> Result<Vec<SessionReport>, LedgerError> {
        let mut reports = Vec::new();
        let mut span_start = 0;

        for (index, event) in self.events.iter().enumerate() {
            if event.kind != EventKind::Stop {
                continue;
            }
            let span = &self.events[span_start..=index];
            if span[0].kind != EventKind::Start {
                return Err(LedgerError::MalformedSession {
                    index,
                    found: span[0].kind,
                });
            }
            reports.push(SessionReport::from_span(span));
            span_start = index + 1;
        }

        Ok(reports)
    }
}

/// Aggregate statistics over one complete session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub right: u32,
    pub wrong: u32,
    pub miss: u32,
    /// Fraction of scored trials answered correctly, `None` when the
    /// session scored no trials at all.
    pub accuracy: Option<f64>,
    /// The ISI the session was started with.
    #[serde(with = "duration_ms")]
    pub starting_isi: Duration,
    #[serde(with = "duration_ms")]
    pub max_isi: Duration,
    #[serde(with = "duration_ms")]
    pub min_isi: Duration,
    /// How many trials were scored while the ISI sat at its session minimum.
    pub trials_at_min_isi: u32,
}

impl SessionReport {
    /// `span` runs from a `start` event through its `stop` event inclusive.
    fn from_span(span: &[TaskEvent]) -> Self {
        let mut right = 0;
        let mut wrong = 0;
        let mut miss = 0;
        let mut max_isi = span[0].isi;
        let mut min_isi = span[0].isi;

        for event in span {
            match event.kind.outcome() {
                Some(Outcome::Right) => right += 1,
                Some(Outcome::Wrong) => wrong += 1,
                Some(Outcome::Miss) => miss += 1,
                None => {}
            }
            max_isi = max_isi.max(event.isi);
            min_isi = min_isi.min(event.isi);
        }

        let scored = right + wrong + miss;
        let accuracy = (scored > 0).then(|| f64::from(right) / f64::from(scored));

        let trials_at_min_isi = span
            .iter()
            .filter(|e| e.kind.is_scored() && e.isi == min_isi)
            .count() as u32;

        Self {
            started_at: span[0].timestamp,
            ended_at: span[span.len() - 1].timestamp,
            right,
            wrong,
            miss,
            accuracy,
            starting_isi: span[0].isi,
            max_isi,
            min_isi,
            trials_at_min_isi,
        }
    }
}
