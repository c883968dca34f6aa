// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Monotonic microsecond timestamps for coarse performance measurement.
//!
//! [`monotonic_now`] reads the best clock available and never returns a value
//! smaller than one it already handed out, even if it has to fall back to a
//! coarser source halfway through a run. Timestamps only make sense as
//! differences between two readings.

use std::ops::Sub;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, Instant, SystemTime};

/// Microseconds since an unspecified, process-local epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Wraps a raw microsecond count.
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Returns the raw microsecond count.
    #[inline]
    pub const fn as_micros(self) -> i64 {
        self.0
    }

    /// Returns the time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    pub fn duration_since(self, earlier: Timestamp) -> Duration {
        let delta = self.0.saturating_sub(earlier.0).max(0);
        Duration::from_micros(delta as u64)
    }
}

impl Sub for Timestamp {
    type Output = i64;

    /// Signed difference in microseconds.
    fn sub(self, rhs: Timestamp) -> i64 {
        self.0.saturating_sub(rhs.0)
    }
}

/// A source of microsecond readings relative to a fixed point.
///
/// A source returns `None` when it cannot produce a reading right now.
pub trait ClockSource: Send + Sync {
    /// Reads the clock, in microseconds.
    fn now_micros(&self) -> Option<i64>;

    /// A short name used in diagnostics.
    fn name(&self) -> &'static str;
}

struct ClockAnchor {
    instant: Instant,
    system: SystemTime,
}

fn anchor() -> &'static ClockAnchor {
    static ANCHOR: OnceLock<ClockAnchor> = OnceLock::new();
    ANCHOR.get_or_init(|| ClockAnchor {
        instant: Instant::now(),
        system: SystemTime::now(),
    })
}

/// The OS high-resolution monotonic counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighResClock;

impl ClockSource for HighResClock {
    fn now_micros(&self) -> Option<i64> {
        let start = anchor().instant;
        let elapsed = Instant::now().checked_duration_since(start)?;
        i64::try_from(elapsed.as_micros()).ok()
    }

    fn name(&self) -> &'static str {
        "high-resolution"
    }
}

/// System time truncated to whole milliseconds, relative to the same anchor.
///
/// Only used when the high-resolution counter fails. The timer only consumes
/// the advance between two readings, so a wall-clock step shows up neither as
/// time going backwards nor as a jump.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoarseClock;

impl ClockSource for CoarseClock {
    fn now_micros(&self) -> Option<i64> {
        let start = anchor().system;
        let elapsed = SystemTime::now().duration_since(start).ok()?;
        let millis = i64::try_from(elapsed.as_millis()).ok()?;
        millis.checked_mul(1000)
    }

    fn name(&self) -> &'static str {
        "coarse"
    }
}

/// Per-timer bookkeeping, guarded by the timer's lock.
#[derive(Debug)]
struct TimerState {
    /// The last value handed out.
    last: i64,
    /// Previous primary reading. `None` after the fallback was used, so the
    /// primary resynchronizes without a jump when it recovers.
    primary_prev: Option<i64>,
    /// Previous fallback reading of the current outage.
    fallback_prev: Option<i64>,
}

/// A non-decreasing clock built from a preferred and a fallback source.
///
/// Readings advance by the difference between two consecutive readings of the
/// same source, never by a source's absolute value. A fallback that starts far
/// ahead of (or behind) the primary therefore neither jumps nor freezes the
/// output.
pub struct MonotonicTimer {
    primary: Box<dyn ClockSource>,
    fallback: Box<dyn ClockSource>,
    state: Mutex<TimerState>,
    degraded: AtomicBool,
}

impl MonotonicTimer {
    /// Creates a timer reading `primary`, falling back to `fallback` whenever it fails.
    pub fn new(primary: Box<dyn ClockSource>, fallback: Box<dyn ClockSource>) -> Self {
        Self {
            primary,
            fallback,
            state: Mutex::new(TimerState {
                last: 0,
                primary_prev: Some(0),
                fallback_prev: None,
            }),
            degraded: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads the clock.
    ///
    /// The result is never smaller than any earlier result of this timer. If
    /// both sources fail the previous reading is returned again.
    pub fn now(&self) -> Timestamp {
        let mut state = self.lock();
        let step = match self.primary.now_micros() {
            Some(raw) => {
                state.fallback_prev = None;
                let step = state.primary_prev.map_or(0, |prev| raw.saturating_sub(prev));
                state.primary_prev = Some(raw);
                step
            }
            None => {
                if !self.degraded.swap(true, Ordering::Relaxed) {
                    log::warn!(
                        "{} clock unavailable, falling back to {} clock",
                        self.primary.name(),
                        self.fallback.name()
                    );
                }
                state.primary_prev = None;
                match self.fallback.now_micros() {
                    Some(raw) => {
                        let step = state
                            .fallback_prev
                            .map_or(0, |prev| raw.saturating_sub(prev));
                        state.fallback_prev = Some(raw);
                        step
                    }
                    None => 0,
                }
            }
        };

        state.last = state.last.saturating_add(step.max(0));
        Timestamp(state.last)
    }

    /// Returns `true` once the fallback source has been used at least once.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }
}

impl Default for MonotonicTimer {
    fn default() -> Self {
        Self::new(Box::new(HighResClock), Box::new(CoarseClock))
    }
}

impl std::fmt::Debug for MonotonicTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonotonicTimer")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .field("last", &self.lock().last)
            .field("degraded", &self.is_degraded())
            .finish()
    }
}

/// Returns the current monotonic time in microseconds.
///
/// Safe to call from any thread. Never fails: a degraded-resolution reading is
/// returned instead.
pub fn monotonic_now() -> Timestamp {
    static TIMER: OnceLock<MonotonicTimer> = OnceLock::new();
    TIMER.get_or_init(MonotonicTimer::default).now()
}

/// Measures elapsed time from a starting [`Timestamp`].
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Timestamp,
}

impl Stopwatch {
    /// Creates a new Stopwatch and starts it immediately.
    #[inline]
    pub fn new() -> Self {
        Self {
            start: monotonic_now(),
        }
    }

    /// The reading taken when the stopwatch was (re)started.
    #[inline]
    pub fn started_at(&self) -> Timestamp {
        self.start
    }

    /// Restarts the stopwatch and returns the time elapsed before the restart.
    pub fn restart(&mut self) -> Duration {
        let now = monotonic_now();
        let elapsed = now.duration_since(self.start);
        self.start = now;
        elapsed
    }

    /// Returns the elapsed time since the stopwatch was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        monotonic_now().duration_since(self.start)
    }

    /// Returns the elapsed time since the stopwatch was started in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Returns the elapsed time since the stopwatch was started in microseconds.
    #[inline]
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed().as_micros() as u64
    }

    /// Returns the elapsed time since the stopwatch was started in seconds as f64.
    #[inline]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    const SLEEP_DURATION_MS: u64 = 50;
    const SLEEP_MARGIN_MS: u64 = 500;

    /// A clock that counts up by a fixed step and stops answering after `healthy_reads` calls.
    struct FailingClock {
        reads: AtomicUsize,
        healthy_reads: usize,
        step: i64,
    }

    impl ClockSource for FailingClock {
        fn now_micros(&self) -> Option<i64> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            (n < self.healthy_reads).then(|| n as i64 * self.step)
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    /// A coarse clock starting far behind the primary one.
    struct SlowClock {
        reads: AtomicUsize,
    }

    impl ClockSource for SlowClock {
        fn now_micros(&self) -> Option<i64> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst) as i64;
            Some((n / 10) * 1000)
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    struct DeadClock;

    impl ClockSource for DeadClock {
        fn now_micros(&self) -> Option<i64> {
            None
        }

        fn name(&self) -> &'static str {
            "dead"
        }
    }

    #[test]
    fn monotonic_now_never_goes_backwards() {
        let mut previous = monotonic_now();
        for _ in 0..10_000 {
            let current = monotonic_now();
            assert!(current >= previous, "{current:?} < {previous:?}");
            previous = current;
        }
    }

    #[test]
    fn monotonic_now_is_monotonic_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                thread::spawn(|| {
                    let mut previous = monotonic_now();
                    for _ in 0..2_000 {
                        let current = monotonic_now();
                        assert!(current >= previous);
                        previous = current;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("reader thread panicked");
        }
    }

    #[test]
    fn fallback_keeps_readings_monotonic() {
        let timer = MonotonicTimer::new(
            Box::new(FailingClock {
                reads: AtomicUsize::new(0),
                healthy_reads: 500,
                step: 37,
            }),
            Box::new(SlowClock {
                reads: AtomicUsize::new(0),
            }),
        );

        let mut previous = timer.now();
        for _ in 0..5_000 {
            let current = timer.now();
            assert!(current >= previous, "{current:?} < {previous:?}");
            previous = current;
        }
        assert!(timer.is_degraded());
        // The slow clock eventually overtakes the last primary reading.
        assert!(previous.as_micros() > 499 * 37);
    }

    #[test]
    fn dead_sources_repeat_the_last_reading() {
        let timer = MonotonicTimer::new(
            Box::new(FailingClock {
                reads: AtomicUsize::new(0),
                healthy_reads: 3,
                step: 100,
            }),
            Box::new(DeadClock),
        );
        let readings: Vec<_> = (0..6).map(|_| timer.now().as_micros()).collect();
        assert_eq!(readings, vec![0, 100, 200, 200, 200, 200]);
    }

    /// A clock replaying a fixed script of readings, then failing.
    struct ScriptedClock {
        reads: AtomicUsize,
        script: Vec<Option<i64>>,
    }

    impl ScriptedClock {
        fn new(script: Vec<Option<i64>>) -> Self {
            Self {
                reads: AtomicUsize::new(0),
                script,
            }
        }
    }

    impl ClockSource for ScriptedClock {
        fn now_micros(&self) -> Option<i64> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            self.script.get(n).copied().flatten()
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    /// A wall clock sitting an hour ahead of the primary clock.
    struct AheadClock {
        reads: AtomicUsize,
    }

    impl ClockSource for AheadClock {
        fn now_micros(&self) -> Option<i64> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst) as i64;
            Some(3_600_000_000 + n * 1_000)
        }

        fn name(&self) -> &'static str {
            "ahead"
        }
    }

    #[test]
    fn fallback_ahead_of_primary_neither_jumps_nor_freezes() {
        let timer = MonotonicTimer::new(
            Box::new(ScriptedClock::new(vec![
                Some(0),
                Some(10),
                None,
                None,
                Some(40),
                Some(50),
                Some(60),
            ])),
            Box::new(AheadClock {
                reads: AtomicUsize::new(0),
            }),
        );

        let readings: Vec<_> = (0..7).map(|_| timer.now().as_micros()).collect();
        // The outage advances by the fallback's own step; the primary then
        // resumes from where the output stands.
        assert_eq!(readings, vec![0, 10, 10, 1_010, 1_010, 1_020, 1_030]);
        assert!(timer.is_degraded());
    }

    #[test]
    fn high_res_clock_answers_on_its_first_read() {
        // Another test may already have created the anchor; either way the
        // very first read of this clock must succeed.
        assert!(HighResClock.now_micros().is_some());
        assert!(CoarseClock.now_micros().is_some());
    }

    #[test]
    fn healthy_primary_is_not_degraded() {
        let timer = MonotonicTimer::default();
        let a = timer.now();
        let b = timer.now();
        assert!(b >= a);
        assert!(!timer.is_degraded());
    }

    #[test]
    fn shared_timer_is_monotonic_under_contention() {
        let timer = Arc::new(MonotonicTimer::new(
            Box::new(FailingClock {
                reads: AtomicUsize::new(0),
                healthy_reads: 1_000,
                step: 5,
            }),
            Box::new(CoarseClock),
        ));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let timer = Arc::clone(&timer);
                thread::spawn(move || {
                    let mut previous = timer.now();
                    for _ in 0..1_000 {
                        let current = timer.now();
                        assert!(current >= previous);
                        previous = current;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("reader thread panicked");
        }
    }

    #[test]
    fn timestamp_arithmetic() {
        let a = Timestamp::from_micros(1_500);
        let b = Timestamp::from_micros(4_000);
        assert_eq!(b - a, 2_500);
        assert_eq!(a - b, -2_500);
        assert_eq!(b.duration_since(a), Duration::from_micros(2_500));
        assert_eq!(a.duration_since(b), Duration::ZERO);
    }

    #[test]
    fn high_res_clock_reports_microseconds() {
        let clock = HighResClock;
        let first = clock.now_micros().expect("high resolution clock available");
        thread::sleep(Duration::from_millis(2));
        let second = clock.now_micros().expect("high resolution clock available");
        assert!(second - first >= 2_000);
    }

    #[test]
    fn stopwatch_elapsed_time_after_delay() {
        let watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));

        let elapsed_ms = watch.elapsed_ms();
        assert!(
            elapsed_ms >= SLEEP_DURATION_MS,
            "Elapsed ms ({elapsed_ms}) should be >= sleep duration ms ({SLEEP_DURATION_MS})"
        );
        assert!(
            elapsed_ms < SLEEP_DURATION_MS + SLEEP_MARGIN_MS,
            "Elapsed ms ({elapsed_ms}) should be < sleep duration ms + margin"
        );

        let elapsed_us = watch.elapsed_us();
        assert!(elapsed_us >= SLEEP_DURATION_MS * 1000);

        let elapsed_secs = watch.elapsed_secs_f64();
        assert!(elapsed_secs >= SLEEP_DURATION_MS as f64 / 1000.0);
    }

    #[test]
    fn stopwatch_restart_resets_the_start() {
        let mut watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(10));
        let before = watch.started_at();
        let lap = watch.restart();
        assert!(lap >= Duration::from_millis(10));
        assert!(watch.started_at() > before);
        assert!(watch.elapsed() < lap + Duration::from_millis(SLEEP_MARGIN_MS));
    }
}
