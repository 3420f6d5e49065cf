//! Cache and memory latency measurement via pointer chasing.
//!
//! One trial walks the chain for a fixed number of dependent loads and times the whole loop.
//! Repeated trials of the same chain keep the fastest one, which approximates the noise floor
//! better than a mean since scheduling and interrupts only ever add time.
use crate::chain::{Chain, HEAD};
use log::warn;
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Outcome of one timed walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trial {
    /// Wall-clock time of the whole loop
    pub elapsed: Duration,
    /// Slot the cursor ended on
    pub cursor: usize,
}

/// Follow `iterations` links from `start`, returning where the cursor ended and how long it took
#[inline(never)]
pub fn chase(slots: &[usize], start: usize, iterations: usize) -> Trial {
    let mut cursor = black_box(start);

    let begin = Instant::now();

    // Unroll 8x to reduce loop overhead relative to memory latency
    for _ in 0..iterations / 8 {
        cursor = slots[cursor];
        cursor = slots[cursor];
        cursor = slots[cursor];
        cursor = slots[cursor];
        cursor = slots[cursor];
        cursor = slots[cursor];
        cursor = slots[cursor];
        cursor = slots[cursor];
    }
    for _ in 0..iterations % 8 {
        cursor = slots[cursor];
    }

    let elapsed = begin.elapsed();

    Trial {
        elapsed,
        cursor: black_box(cursor),
    }
}

/// Untimed lap over the whole cycle to populate TLB and caches
pub fn warm_up(chain: &Chain) {
    black_box(chase(chain.slots(), HEAD, chain.lap_len()).cursor);
}

/// Time one walk over `chain` and check the end cursor against a slot index that cannot exist
pub fn timed_trial(chain: &Chain, iterations: usize) -> Trial {
    let trial = chase(chain.slots(), HEAD, iterations);
    if trial.cursor == chain.len() {
        warn!(
            "Pointer chase over {} slots ended outside the chain (slot {})",
            chain.len(),
            trial.cursor
        );
    }
    trial
}

/// Run `trials` measurements and keep the shortest.
///
/// # Panics
/// If `trials` is zero.
pub fn best_of<F>(trials: usize, mut measure: F) -> Duration
where
    F: FnMut() -> Duration,
{
    assert!(trials > 0, "at least one trial is required");
    (0..trials)
        .map(|_| measure())
        .min()
        .unwrap_or(Duration::MAX)
}

/// Best trial time for `chain`, in seconds
pub fn best_trial_secs(chain: &Chain, trials: usize, iterations: usize) -> f64 {
    best_of(trials, || timed_trial(chain, iterations).elapsed).as_secs_f64()
}
