//! The paced task scheduler.
//!
//! One tokio task per session drives the stimulus cadence. Every tick
//! scores an expired unanswered trial as a miss, shifts the stimulus
//! window, draws the next value, and reschedules itself at whatever ISI
//! is current at that moment, so adaptive adjustments take effect from
//! the next interval and never retroactively. Answers and stop requests
//! arrive synchronously from any thread; the session state sits behind a
//! mutex and observer callbacks always fire after it is released, which
//! lets an observer stop the task or submit an answer from inside a
//! callback.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pasat_core::report;
use pasat_core::{
    EventKind, EventLedger, LedgerError, Outcome, SessionReport, TaskEvent, TaskObserver, Trial,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::config::TaskConfig;
use crate::controller::{IsiChange, IsiController};
use crate::error::TaskError;
use crate::evaluator::{self, Evaluation};

enum RunState {
    Idle,
    Running(Session),
}

/// Live state of the session in progress.
struct Session {
    /// Distinguishes this session from every earlier one, so a tick that
    /// raced a stop/start pair cannot act on the wrong session.
    run_id: u64,
    isi: Duration,
    previous: Option<u32>,
    current: Option<u32>,
    answered: bool,
}

impl Session {
    /// The trial currently awaiting an answer. Open only once two stimuli
    /// have been presented.
    fn open_trial(&self) -> Option<Trial> {
        match (self.previous, self.current) {
            (Some(previous), Some(current)) => Some(Trial::new(previous, current)),
            _ => None,
        }
    }
}

struct Inner<R> {
    config: TaskConfig,
    state: RunState,
    controller: IsiController,
    ledger: EventLedger,
    rng: R,
    tick_handle: Option<JoinHandle<()>>,
    next_run_id: u64,
}

/// A paced serial-addition task.
///
/// Stimuli are drawn from the configured alphabet and handed to the
/// observer on a timer. Each pair of consecutive stimuli forms a trial
/// whose expected answer is their sum; one answer is accepted per trial
/// and a trial that outlives its interval scores a miss. Scored outcomes
/// feed the adaptive pacer, and everything that happens lands in an
/// append-only event ledger that survives across sessions.
///
/// The task is cheap to clone; clones share the same session, ledger,
/// and observer. `start` must be called from within a tokio runtime.
pub struct PacedTask<O, R = StdRng> {
    inner: Arc<Mutex<Inner<R>>>,
    observer: Arc<O>,
}

impl<O, R> Clone for PacedTask<O, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<O> PacedTask<O, StdRng>
where
    O: TaskObserver + 'static,
{
    pub fn new(config: TaskConfig, observer: O) -> Self {
        Self::with_rng(config, observer, StdRng::from_os_rng())
    }
}

impl<O, R> PacedTask<O, R>
where
    O: TaskObserver + 'static,
    R: Rng + Send + 'static,
{
    /// Builds a task with an explicit stimulus source. Tests and replayable
    /// sessions pass a seeded rng here.
    pub fn with_rng(config: TaskConfig, observer: O, rng: R) -> Self {
        let controller = IsiController::new(config.adjust_window, config.isi_step, config.min_isi);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                config,
                state: RunState::Idle,
                controller,
                ledger: EventLedger::new(),
                rng,
                tick_handle: None,
                next_run_id: 0,
            })),
            observer: Arc::new(observer),
        }
    }

    /// Opens a session: records `start` and schedules the first stimulus
    /// after `initial_delay` (the configured delay when `None`).
    ///
    /// Fails with [`TaskError::AlreadyRunning`] while a session is open,
    /// leaving the running session untouched.
    pub fn start(
        &self,
        starting_isi: Duration,
        initial_delay: Option<Duration>,
    ) -> Result<(), TaskError> {
        let mut inner = self.inner.lock();
        if matches!(inner.state, RunState::Running(_)) {
            return Err(TaskError::AlreadyRunning);
        }
        inner.config.validate()?;

        inner.next_run_id += 1;
        let run_id = inner.next_run_id;
        let delay = initial_delay.unwrap_or(inner.config.initial_delay);
        inner.state = RunState::Running(Session {
            run_id,
            isi: starting_isi,
            previous: None,
            current: None,
            answered: false,
        });
        inner.controller.reset();
        inner.ledger.record(EventKind::Start, starting_isi);
        info!(
            run_id,
            isi_ms = starting_isi.as_millis() as u64,
            "session started"
        );

        let first_at = Instant::now() + delay;
        let handle = tokio::spawn(tick_loop(
            Arc::downgrade(&self.inner),
            Arc::clone(&self.observer),
            run_id,
            first_at,
        ));
        inner.tick_handle = Some(handle);
        Ok(())
    }

    /// Closes the session: records `stop` and cancels the pending tick.
    /// Stopping an idle task does nothing.
    pub fn stop(&self) {
        let handle = {
            let mut inner = self.inner.lock();
            let (run_id, isi) = match inner.state {
                RunState::Running(ref session) => (session.run_id, session.isi),
                RunState::Idle => return,
            };
            inner.state = RunState::Idle;
            inner.ledger.record(EventKind::Stop, isi);
            info!(run_id, "session stopped");
            inner.tick_handle.take()
        };
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Submits an answer for the open trial. Scores `right` or `wrong`,
    /// accepting at most one answer per trial; answers with no open trial,
    /// or while the task is idle, are ignored without a trace.
    pub fn submit_answer(&self, answer: u32) {
        let (outcome, isi) = {
            let mut inner = self.inner.lock();
            let Inner {
                state,
                controller,
                ledger,
                ..
            } = &mut *inner;
            let RunState::Running(session) = state else {
                return;
            };
            match evaluator::evaluate(session.open_trial(), session.answered, answer) {
                Evaluation::Ignored => return,
                Evaluation::Right => {
                    session.answered = true;
                    score_trial(session, controller, ledger, Outcome::Right)
                }
                Evaluation::Wrong => {
                    session.answered = true;
                    score_trial(session, controller, ledger, Outcome::Wrong)
                }
            }
        };
        self.observer.trial_scored(outcome, isi);
    }

    pub fn is_running(&self) -> bool {
        matches!(self.inner.lock().state, RunState::Running(_))
    }

    /// The ISI currently pacing the session, `None` while idle.
    pub fn current_isi(&self) -> Option<Duration> {
        match self.inner.lock().state {
            RunState::Running(ref session) => Some(session.isi),
            RunState::Idle => None,
        }
    }

    /// Snapshot of the full event ledger, all sessions included.
    pub fn events(&self) -> Vec<TaskEvent> {
        self.inner.lock().ledger.events().to_vec()
    }

    /// Aggregates every completed session in the ledger.
    pub fn aggregate_sessions(&self) -> Result<Vec<SessionReport>, LedgerError> {
        self.inner.lock().ledger.aggregate_sessions()
    }

    /// The raw event table, header row included.
    pub fn events_table<F>(&self, format_timestamp: F) -> Vec<Vec<String>>
    where
        F: Fn(&DateTime<Utc>) -> String,
    {
        report::events_table(self.inner.lock().ledger.events(), format_timestamp)
    }

    /// The per-session aggregate table, header row included.
    pub fn aggregate_table<F>(&self, format_timestamp: F) -> Result<Vec<Vec<String>>, LedgerError>
    where
        F: Fn(&DateTime<Utc>) -> String,
    {
        let reports = self.aggregate_sessions()?;
        Ok(report::aggregate_table(&reports, format_timestamp))
    }
}

/// Appends the scored event, lets the pacer react, and applies any ISI
/// change. Returns the outcome with the post-adjustment interval, which is
/// what observers are told.
fn score_trial(
    session: &mut Session,
    controller: &mut IsiController,
    ledger: &mut EventLedger,
    outcome: Outcome,
) -> (Outcome, Duration) {
    ledger.record(outcome.into(), session.isi);
    if let Some(change) = controller.record(outcome, session.isi) {
        session.isi = change.isi();
        let kind = match change {
            IsiChange::Faster(_) => EventKind::Faster,
            IsiChange::Slower(_) => EventKind::Slower,
        };
        ledger.record(kind, session.isi);
        debug!(
            %outcome,
            isi_ms = session.isi.as_millis() as u64,
            "trial scored, pace adjusted"
        );
    } else {
        debug!(%outcome, "trial scored");
    }
    (outcome, session.isi)
}

/// One scheduler wake-up. Returns the interval to wait before the next
/// tick, or `None` once this tick's session is no longer the active one.
fn run_tick<O, R>(inner: &Mutex<Inner<R>>, observer: &O, run_id: u64) -> Option<Duration>
where
    O: TaskObserver,
    R: Rng,
{
    let (missed, value, next_isi) = {
        let mut inner = inner.lock();
        let Inner {
            state,
            controller,
            ledger,
            config,
            rng,
            ..
        } = &mut *inner;
        let RunState::Running(session) = state else {
            return None;
        };
        if session.run_id != run_id {
            return None;
        }

        let missed = if !session.answered && session.open_trial().is_some() {
            Some(score_trial(session, controller, ledger, Outcome::Miss))
        } else {
            None
        };

        session.answered = false;
        session.previous = session.current;
        let value = config.alphabet[rng.random_range(0..config.alphabet.len())];
        session.current = Some(value);
        trace!(run_id, value, "stimulus drawn");

        (missed, value, session.isi)
    };

    if let Some((outcome, isi)) = missed {
        observer.trial_scored(outcome, isi);
    }
    observer.present_stimulus(value);
    Some(next_isi)
}

/// Session cadence, anchored to deadlines rather than sleep durations so
/// callback latency never accumulates into drift. Holds the task state
/// weakly: if every task handle is dropped mid-session the loop ends at
/// its next wake-up.
async fn tick_loop<O, R>(
    task: Weak<Mutex<Inner<R>>>,
    observer: Arc<O>,
    run_id: u64,
    first_at: Instant,
) where
    O: TaskObserver,
    R: Rng,
{
    let mut next_at = first_at;
    loop {
        tokio::time::sleep_until(next_at).await;
        let Some(inner) = task.upgrade() else {
            break;
        };
        match run_tick(&inner, &*observer, run_id) {
            Some(isi) => next_at += isi,
            None => break,
        }
    }
}
