//! Sunrise progress and its delayed reset.
//!
//! Time is passed in explicitly as a [`Duration`] since the start of the
//! session, so the controller never reads a clock of its own.

use std::time::Duration;

use log::{debug, info};

/// Progress added per frame while the gesture is held.
pub const SUNRISE_STEP: f64 = 0.01;

/// How long a completed sunrise stays up before it resets.
pub const RESET_DELAY: Duration = Duration::from_secs(10);

// ════════════════════════════════════════════════════════════════════════════
// SunriseState
// ════════════════════════════════════════════════════════════════════════════

/// Progress of one session. `0.0 <= level <= 1.0` always holds.
///
/// Only [`advance`](SunriseState::advance) and [`reset`](SunriseState::reset)
/// change it:
///
/// ```compile_fail
/// let mut s = sunrise_scene::SunriseState::new();
/// s.level = 5.0;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunriseState {
    level:     f64,
    /// Set when `level` reaches 1.0; cleared only by the reset.
    completed: bool,
}

/// What one call to [`SunriseState::advance`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Gesture not held; nothing changed. Progress does not decay.
    Idle,
    /// Gesture held; `level` went up by one step.
    Rising,
    /// Gesture held and `level` hit 1.0 on this call.
    Completed,
    /// Gesture held but the sunrise is already complete.
    Suppressed,
}

impl SunriseState {
    pub const fn new() -> Self {
        SunriseState { level: 0.0, completed: false }
    }

    /// Apply one frame's gesture signal.
    pub fn advance(&mut self, gesture_active: bool) -> Transition {
        match (gesture_active, self.completed) {
            (false, _)    => Transition::Idle,
            (true, true)  => Transition::Suppressed,
            (true, false) => {
                self.level = (self.level + SUNRISE_STEP).min(1.0);
                if self.level >= 1.0 {
                    self.completed = true;
                    Transition::Completed
                } else {
                    Transition::Rising
                }
            }
        }
    }

    pub fn reset(&mut self) {
        *self = SunriseState::new();
    }

    pub fn level(&self)        -> f64  { self.level }
    pub fn is_completed(&self) -> bool { self.completed }
}

impl Default for SunriseState {
    fn default() -> Self { SunriseState::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// ResetTimer — one-shot, not cancellable
// ════════════════════════════════════════════════════════════════════════════

/// A single pending deadline.
///
/// There is deliberately no `cancel`: once scheduled, the timer fires on the
/// first [`poll`](ResetTimer::poll) at or after its due time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetTimer {
    due: Option<Duration>,
}

impl ResetTimer {
    /// Arm the timer for `now + delay`. Returns false (and leaves the
    /// existing deadline alone) if it is already pending.
    pub fn schedule(&mut self, now: Duration, delay: Duration) -> bool {
        if self.due.is_some() { return false; }
        self.due = Some(now + delay);
        true
    }

    pub fn is_pending(&self) -> bool { self.due.is_some() }

    pub fn due_at(&self) -> Option<Duration> { self.due }

    /// Time left until the deadline, zero if already overdue.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.due.map(|d| d.saturating_sub(now))
    }

    /// True exactly once: on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SunriseController
// ════════════════════════════════════════════════════════════════════════════

/// Emitted when the delayed reset runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetFired {
    /// The poll time at which it fired (never earlier than the deadline).
    pub at: Duration,
}

/// Owns the [`SunriseState`] and the reset that follows completion.
///
/// The caller drives it from a single thread: [`advance`](Self::advance)
/// once per detector frame, [`poll_reset`](Self::poll_reset) as often as it
/// likes (typically once per loop iteration, frames or not).
#[derive(Debug, Default)]
pub struct SunriseController {
    state: SunriseState,
    reset: ResetTimer,
}

impl SunriseController {
    pub fn new() -> Self {
        SunriseController::default()
    }

    /// Feed one frame's gesture signal at session time `now`.
    pub fn advance(&mut self, gesture_active: bool, now: Duration) -> Transition {
        let transition = self.state.advance(gesture_active);
        match transition {
            Transition::Completed => {
                // `completed` was false a moment ago, so nothing is pending.
                if self.reset.schedule(now, RESET_DELAY) {
                    info!("sunrise complete; resetting in {}s", RESET_DELAY.as_secs());
                }
            }
            Transition::Rising if self.state.level() <= SUNRISE_STEP + f64::EPSILON => {
                debug!("sunrise started");
            }
            _ => {}
        }
        transition
    }

    /// Run the reset if it is due. Returns `Some` exactly once per
    /// completion.
    pub fn poll_reset(&mut self, now: Duration) -> Option<ResetFired> {
        if !self.reset.poll(now) { return None; }
        self.state.reset();
        info!("sunrise reset");
        Some(ResetFired { at: now })
    }

    pub fn state(&self)         -> SunriseState { self.state }
    pub fn level(&self)         -> f64          { self.state.level() }
    pub fn is_completed(&self)  -> bool         { self.state.is_completed() }
    pub fn reset_pending(&self) -> bool         { self.reset.is_pending() }
    pub fn reset_due_at(&self)  -> Option<Duration> { self.reset.due_at() }

    /// Time until the pending reset, if any.
    pub fn reset_remaining(&self, now: Duration) -> Option<Duration> {
        self.reset.remaining(now)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME: Duration = Duration::from_millis(33);

    fn at(frame: u32) -> Duration { FRAME * frame }

    /// Hold the gesture until completion; returns the frame index it
    /// completed on.
    fn run_to_completion(ctl: &mut SunriseController) -> u32 {
        for f in 0..1000 {
            if ctl.advance(true, at(f)) == Transition::Completed {
                return f;
            }
        }
        panic!("never completed");
    }

    fn assert_level(level: f64, expected: f64) {
        assert!((level - expected).abs() < 1e-9, "level {} != {}", level, expected);
    }

    // ── SunriseState ─────────────────────────────────────────────────────
    #[test]
    fn starts_dark_and_incomplete() {
        let s = SunriseState::new();
        assert_eq!(s.level, 0.0);
        assert!(!s.completed);
    }

    #[test]
    fn each_active_tick_adds_one_step() {
        let mut s = SunriseState::new();
        for n in 1..=42 {
            assert_eq!(s.advance(true), Transition::Rising);
            assert_level(s.level, n as f64 * SUNRISE_STEP);
        }
    }

    #[test]
    fn inactive_ticks_do_not_decay() {
        let mut s = SunriseState::new();
        for _ in 0..30 { s.advance(true); }
        let held = s.level;
        for _ in 0..500 {
            assert_eq!(s.advance(false), Transition::Idle);
        }
        assert_eq!(s.level, held);
    }

    #[test]
    fn clamps_and_completes_on_hundredth_tick() {
        let mut s = SunriseState::new();
        for _ in 0..99 { assert_eq!(s.advance(true), Transition::Rising); }
        assert!(s.level < 1.0);
        assert_eq!(s.advance(true), Transition::Completed);
        assert_eq!(s.level(), 1.0);
        assert!(s.is_completed());
    }

    #[test]
    fn accessors_track_advance_and_reset() {
        let mut s = SunriseState::new();
        for _ in 0..250 { s.advance(true); }
        assert_eq!(s.level(), 1.0);
        assert!(s.is_completed());
        s.reset();
        assert_eq!(s.level(), 0.0);
        assert!(!s.is_completed());
    }

    #[test]
    fn completed_state_ignores_gestures() {
        let mut s = SunriseState { level: 1.0, completed: true };
        assert_eq!(s.advance(true), Transition::Suppressed);
        assert_eq!(s.advance(false), Transition::Idle);
        assert_eq!(s, SunriseState { level: 1.0, completed: true });
    }

    // ── ResetTimer ───────────────────────────────────────────────────────
    #[test]
    fn timer_fires_once_at_deadline() {
        let mut t = ResetTimer::default();
        assert!(t.schedule(Duration::from_secs(1), Duration::from_secs(10)));
        assert!(!t.poll(Duration::from_millis(10_999)));
        assert!(t.poll(Duration::from_secs(11)));
        assert!(!t.poll(Duration::from_secs(12)));
        assert!(!t.is_pending());
    }

    #[test]
    fn timer_cannot_be_rearmed_while_pending() {
        let mut t = ResetTimer::default();
        assert!(t.schedule(Duration::ZERO, Duration::from_secs(10)));
        assert!(!t.schedule(Duration::from_secs(5), Duration::from_secs(10)));
        assert_eq!(t.due_at(), Some(Duration::from_secs(10)));
        assert_eq!(t.remaining(Duration::from_secs(4)), Some(Duration::from_secs(6)));
        assert_eq!(t.remaining(Duration::from_secs(40)), Some(Duration::ZERO));
    }

    // ── SunriseController ────────────────────────────────────────────────
    #[test]
    fn completion_schedules_reset() {
        let mut ctl = SunriseController::new();
        assert!(!ctl.reset_pending());
        let f = run_to_completion(&mut ctl);
        assert_eq!(f, 99);
        assert!(ctl.is_completed());
        assert!(ctl.reset_pending());
        assert_eq!(ctl.reset_due_at(), Some(at(f) + RESET_DELAY));
    }

    #[test]
    fn gestures_ignored_until_reset() {
        let mut ctl = SunriseController::new();
        let f = run_to_completion(&mut ctl);
        let due = ctl.reset_due_at();
        for g in 1..200 {
            assert_eq!(ctl.advance(true, at(f + g)), Transition::Suppressed);
        }
        assert_eq!(ctl.level(), 1.0);
        assert_eq!(ctl.reset_due_at(), due);
    }

    #[test]
    fn reset_restores_initial_state_after_delay() {
        let mut ctl = SunriseController::new();
        let f = run_to_completion(&mut ctl);
        let done_at = at(f);

        assert!(ctl.poll_reset(done_at + RESET_DELAY - Duration::from_millis(1)).is_none());
        assert!(ctl.is_completed());

        let fired = ctl.poll_reset(done_at + RESET_DELAY).expect("reset due");
        assert_eq!(fired.at, done_at + RESET_DELAY);
        assert_eq!(ctl.state(), SunriseState::new());
        assert!(!ctl.reset_pending());

        // Only once.
        assert!(ctl.poll_reset(done_at + RESET_DELAY * 2).is_none());
    }

    #[test]
    fn can_rise_again_after_reset() {
        let mut ctl = SunriseController::new();
        let f = run_to_completion(&mut ctl);
        let later = at(f) + RESET_DELAY;
        ctl.poll_reset(later);
        assert_eq!(ctl.advance(true, later), Transition::Rising);
        assert_level(ctl.level(), SUNRISE_STEP);
    }

    #[test]
    fn idle_session_never_schedules() {
        let mut ctl = SunriseController::new();
        for f in 0..1000 { ctl.advance(false, at(f)); }
        assert!(!ctl.reset_pending());
        assert!(ctl.poll_reset(at(100_000)).is_none());
    }

    proptest! {
        #[test]
        fn level_tracks_active_frames(signals in proptest::collection::vec(any::<bool>(), 0..300)) {
            let mut ctl = SunriseController::new();
            let mut active = 0u32;
            let mut last = 0.0;
            for (f, &g) in signals.iter().enumerate() {
                ctl.advance(g, at(f as u32));
                let level = ctl.level();
                prop_assert!((0.0..=1.0).contains(&level));
                prop_assert!(level >= last);
                last = level;
                if g && active < 100 { active += 1; }
                if active < 100 {
                    prop_assert!((level - active as f64 * SUNRISE_STEP).abs() < 1e-9);
                    prop_assert!(!ctl.is_completed());
                } else {
                    prop_assert_eq!(level, 1.0);
                    prop_assert!(ctl.is_completed());
                }
            }
        }
    }
}
