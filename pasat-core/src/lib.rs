//! Core data model for the paced serial-addition task: trial arithmetic,
//! the append-only event ledger, per-session aggregation, and the observer
//! seam front ends implement to receive stimuli and scores.

pub mod event;
pub mod ledger;
pub mod observer;
pub mod report;
pub mod trial;

pub use event::{EventKind, Outcome, TaskEvent};
pub use ledger::{EventLedger, LedgerError, SessionReport};
pub use observer::{NullObserver, TaskObserver};
pub use trial::{Trial, answer_domain};
