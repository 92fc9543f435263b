//! Presentation-ready tables over the ledger, header row included.
//!
//! Callers supply the timestamp formatter so the same tables serve CSV
//! export, terminal display, or tests with fixed clocks.

use chrono::{DateTime, Utc};

use crate::event::TaskEvent;
use crate::ledger::SessionReport;

/// One row per ledger event, preceded by a header row.
pub fn events_table<F>(events: &[TaskEvent], format_timestamp: F) -> Vec<Vec<String>>
where
    F: Fn(&DateTime<Utc>) -> String,
{
    let mut rows = Vec::with_capacity(events.len() + 1);
    rows.push(vec![
        "Timestamp".to_owned(),
        "ISI (ms)".to_owned(),
        "Event".to_owned(),
    ]);
    for event in events {
        rows.push(vec![
            format_timestamp(&event.timestamp),
            (event.isi.as_millis() as u64).to_string(),
            event.kind.to_string(),
        ]);
    }
    rows
}

/// One row per session report, preceded by a header row. Sessions that
/// scored no trials render their accuracy as `n/a`.
pub fn aggregate_table<F>(reports: &[SessionReport], format_timestamp: F) -> Vec<Vec<String>>
where
    F: Fn(&DateTime<Utc>) -> String,
{
    let mut rows = Vec::with_capacity(reports.len() + 1);
    rows.push(
        [
            "Session start",
            "Session end",
            "Right",
            "Wrong",
            "Miss",
            "Accuracy (normalized)",
            "Starting ISI",
            "Max ISI",
            "Min ISI",
            "Trials at minimum ISI",
        ]
        .map(str::to_owned)
        .to_vec(),
    );
    for report in reports {
        rows.push(vec![
            format_timestamp(&report.started_at),
            format_timestamp(&report.ended_at),
            report.right.to_string(),
            report.wrong.to_string(),
            report.miss.to_string(),
            report
                .accuracy
                .map_or_else(|| "n/a".to_owned(), |a| a.to_string()),
            (report.starting_isi.as_millis() as u64).to_string(),
            (report.max_isi.as_millis() as u64).to_string(),
            (report.min_isi.as_millis() as u64).to_string(),
            report.trials_at_min_isi.to_string(),
        ]);
    }
    rows
}
