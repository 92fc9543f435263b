//! Adaptive pacing over a rolling window of scored outcomes.
//!
//! The pacer inspects the last `window_size` scored trials each time one
//! is recorded. A window of nothing but failures slows the task down by
//! one step; a window of nothing but successes speeds it up by one step,
//! floored at `floor`. Only scored trials enter the window, so session
//! boundaries and earlier adjustments never dilute a streak.

use std::collections::VecDeque;
use std::time::Duration;

use pasat_core::Outcome;

/// An ISI change the controller decided on, carrying the new interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsiChange {
    Slower(Duration),
    Faster(Duration),
}

impl IsiChange {
    /// The interval after the change.
    pub fn isi(self) -> Duration {
        match self {
            IsiChange::Slower(isi) | IsiChange::Faster(isi) => isi,
        }
    }
}

/// Rolling-window pace controller.
#[derive(Debug, Clone)]
pub struct IsiController {
    window: VecDeque<Outcome>,
    window_size: usize,
    step: Duration,
    floor: Duration,
}

impl IsiController {
    pub fn new(window_size: usize, step: Duration, floor: Duration) -> Self {
        Self {
            window: VecDeque::with_capacity(window_size),
            window_size,
            step,
            floor,
        }
    }

    /// Clears the window. Called at session start so one session's streak
    /// never carries into the next.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Records a scored outcome and decides whether the ISI changes.
    /// Returns `None` until the window is full, when the window is mixed,
    /// or when the floor leaves a speed-up with nothing to change.
    pub fn record(&mut self, outcome: Outcome, current_isi: Duration) -> Option<IsiChange> {
        self.window.push_back(outcome);
        while self.window.len() > self.window_size {
            self.window.pop_front();
        }
        if self.window.len() < self.window_size {
            return None;
        }

        if self.window.iter().all(|o| o.is_failure()) {
            return Some(IsiChange::Slower(current_isi + self.step));
        }

        if self.window.iter().all(|o| o.is_success()) {
            let lowered = current_isi.saturating_sub(self.step).max(self.floor);
            if lowered >= current_isi {
                return None;
            }
            return Some(IsiChange::Faster(lowered));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn controller() -> IsiController {
        IsiController::new(4, ms(100), ms(100))
    }

    #[test]
    fn no_adjustment_until_window_is_full() {
        let mut pacer = controller();
        assert_eq!(pacer.record(Outcome::Miss, ms(3000)), None);
        assert_eq!(pacer.record(Outcome::Miss, ms(3000)), None);
        assert_eq!(pacer.record(Outcome::Miss, ms(3000)), None);
        assert_eq!(
            pacer.record(Outcome::Miss, ms(3000)),
            Some(IsiChange::Slower(ms(3100)))
        );
    }

    #[test]
    fn wrong_and_miss_both_count_as_failures() {
        let mut pacer = controller();
        pacer.record(Outcome::Wrong, ms(3000));
        pacer.record(Outcome::Miss, ms(3000));
        pacer.record(Outcome::Wrong, ms(3000));
        assert_eq!(
            pacer.record(Outcome::Miss, ms(3000)),
            Some(IsiChange::Slower(ms(3100)))
        );
    }

    #[test]
    fn full_window_of_successes_speeds_up() {
        let mut pacer = controller();
        pacer.record(Outcome::Right, ms(3000));
        pacer.record(Outcome::Right, ms(3000));
        pacer.record(Outcome::Right, ms(3000));
        assert_eq!(
            pacer.record(Outcome::Right, ms(3000)),
            Some(IsiChange::Faster(ms(2900)))
        );
    }

    #[test]
    fn mixed_window_leaves_isi_alone() {
        let mut pacer = controller();
        pacer.record(Outcome::Right, ms(3000));
        pacer.record(Outcome::Miss, ms(3000));
        pacer.record(Outcome::Right, ms(3000));
        assert_eq!(pacer.record(Outcome::Right, ms(3000)), None);
    }

    #[test]
    fn saturated_window_keeps_adjusting_per_trial() {
        let mut pacer = controller();
        for _ in 0..4 {
            pacer.record(Outcome::Miss, ms(3000));
        }
        // Window stays all-failure as older entries roll off.
        assert_eq!(
            pacer.record(Outcome::Wrong, ms(3100)),
            Some(IsiChange::Slower(ms(3200)))
        );
        assert_eq!(
            pacer.record(Outcome::Miss, ms(3200)),
            Some(IsiChange::Slower(ms(3300)))
        );
    }

    #[test]
    fn one_success_breaks_a_failure_streak() {
        let mut pacer = controller();
        for _ in 0..4 {
            pacer.record(Outcome::Miss, ms(3000));
        }
        assert_eq!(pacer.record(Outcome::Right, ms(3100)), None);
        assert_eq!(pacer.record(Outcome::Miss, ms(3100)), None);
    }

    #[test]
    fn speed_up_clamps_to_floor() {
        let mut pacer = IsiController::new(2, ms(100), ms(100));
        pacer.record(Outcome::Right, ms(250));
        assert_eq!(
            pacer.record(Outcome::Right, ms(250)),
            Some(IsiChange::Faster(ms(150)))
        );
        pacer.record(Outcome::Right, ms(150));
        assert_eq!(
            pacer.record(Outcome::Right, ms(150)),
            Some(IsiChange::Faster(ms(100)))
        );
    }

    #[test]
    fn at_the_floor_no_change_is_reported() {
        let mut pacer = IsiController::new(2, ms(100), ms(100));
        pacer.record(Outcome::Right, ms(100));
        assert_eq!(pacer.record(Outcome::Right, ms(100)), None);
    }

    #[test]
    fn below_floor_intervals_are_never_raised_by_a_speed_up() {
        // A session started below the floor stays where the caller put it.
        let mut pacer = IsiController::new(2, ms(100), ms(100));
        pacer.record(Outcome::Right, ms(50));
        assert_eq!(pacer.record(Outcome::Right, ms(50)), None);
    }

    #[test]
    fn reset_discards_the_streak() {
        let mut pacer = IsiController::new(2, ms(100), ms(100));
        pacer.record(Outcome::Miss, ms(3000));
        pacer.reset();
        assert_eq!(pacer.record(Outcome::Miss, ms(3000)), None);
        assert_eq!(
            pacer.record(Outcome::Miss, ms(3000)),
            Some(IsiChange::Slower(ms(3100)))
        );
    }

    #[test]
    fn window_size_is_configurable() {
        let mut pacer = IsiController::new(5, ms(100), ms(100));
        for _ in 0..4 {
            assert_eq!(pacer.record(Outcome::Miss, ms(3000)), None);
        }
        assert_eq!(
            pacer.record(Outcome::Miss, ms(3000)),
            Some(IsiChange::Slower(ms(3100)))
        );
    }
}
