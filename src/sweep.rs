//! # Sweep
//!
//! Working-set sizes double from the minimum up to the maximum. Cache boundaries are sharp, so
//! each doubling step from `size / 2` to `size` is sampled at its 1/4, 1/2 and 3/4 marks as well
//! as at `size` itself, keeping the sweep logarithmic overall while sampling densely enough to
//! see where the latency jumps.
use crate::chain::Chain;
use crate::config::SweepConfig;
use crate::emit::CsvEmitter;
use crate::error::ProbeResult;
use crate::format_size_fixed_int;
use crate::timer::{best_trial_secs, warm_up};
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

/// One doubling step, from `previous` (exclusive) to `size` (inclusive) slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub previous: usize,
    pub size: usize,
}

impl Step {
    /// The quartile points of the step, in increasing order, ending at `size`
    pub fn points(&self) -> [usize; 4] {
        let quarter = (self.size - self.previous) / 4;
        [
            self.previous + quarter,
            self.previous + 2 * quarter,
            self.previous + 3 * quarter,
            self.size,
        ]
    }
}

/// Doubling steps whose upper size lies in `min..=max`
#[derive(Debug, Clone)]
pub struct SizeSweep {
    next: Option<usize>,
    max: usize,
}

impl SizeSweep {
    pub fn new(min: usize, max: usize) -> Self {
        SizeSweep {
            next: Some(min),
            max,
        }
    }

    /// Every point of every step, in sweep order
    pub fn points(self) -> impl Iterator<Item = usize> {
        self.flat_map(|step| step.points())
    }
}

impl Iterator for SizeSweep {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let size = self.next.filter(|&size| size <= self.max)?;
        self.next = size.checked_mul(2);
        Some(Step {
            previous: size / 2,
            size,
        })
    }
}

/// Shuffle generator, seeded from `seed` when given for reproducible traversal orders
pub fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

/// Build the chain for one point and return its best trial time in seconds
pub fn measure_point<R>(config: &SweepConfig, slots: usize, rng: &mut R) -> ProbeResult<f64>
where
    R: Rng,
{
    let chain = if config.shuffle {
        Chain::shuffled(slots, config.stride, rng)?
    } else {
        Chain::sequential(slots, config.stride)?
    };

    if config.warmup {
        warm_up(&chain);
    }

    Ok(best_trial_secs(&chain, config.trials, config.iterations))
}

/// Run the whole sweep, writing the CSV header and one record per point.
///
/// Returns the number of points measured.
pub fn run_sweep<W, R>(
    config: &SweepConfig,
    emitter: &mut CsvEmitter<W>,
    rng: &mut R,
) -> ProbeResult<usize>
where
    W: Write,
    R: Rng,
{
    config.validate()?;
    emitter.header()?;

    let mut measured = 0;
    for step in SizeSweep::new(config.min_slots, config.max_slots) {
        info!(
            "Step {} -> {} slots ({} -> {})",
            step.previous,
            step.size,
            format_size_fixed_int(bytes_of(step.previous)),
            format_size_fixed_int(bytes_of(step.size))
        );

        for slots in step.points() {
            let best = measure_point(config, slots, rng)?;
            debug!(
                "{} slots: best {:.8} s, {:.2} ns/access",
                slots,
                best,
                best * 1e9 / config.iterations as f64
            );
            emitter.record(slots, best)?;
            measured += 1;
        }
    }

    Ok(measured)
}

/// Run the sweep described by `config` into `out`
pub fn run<W: Write>(config: &SweepConfig, out: W) -> ProbeResult<usize> {
    let mut rng = make_rng(config.seed);
    let mut emitter = CsvEmitter::new(out);
    run_sweep(config, &mut emitter, &mut rng)
}

fn bytes_of(slots: usize) -> u64 {
    (slots as u64).saturating_mul(std::mem::size_of::<usize>() as u64)
}
