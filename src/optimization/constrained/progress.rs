//! Caller-owned progress tracking for likelihood optimization.
//!
//! Purpose
//! -------
//! Replace process-wide callback counters with an explicit, caller-owned
//! progress object. The objective evaluator records every function
//! evaluation together with the latest objective value; the solver-side
//! observer records iterations and emits periodic progress lines through the
//! `log` facade. The bookkeeping is diagnostic only and never affects
//! numerical results.
//!
//! Concurrency
//! -----------
//! A [`FitProgress`] is a cheap clonable handle over shared atomic counters.
//! Fits are single-threaded, but the atomics keep the handle trivially
//! `Send + Sync`, which the solver's observer registration requires.

use crate::optimization::constrained::types::Params;
use argmin::core::observers::Observe;
use argmin::core::{Error, IterState, State, KV};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct ProgressInner {
    evaluations: AtomicU64,
    iterations: AtomicU64,
    /// Bit pattern of the latest objective value (`f64::to_bits`).
    last_value: AtomicU64,
}

/// Shared handle tracking evaluations, iterations, and the latest objective.
///
/// One handle is owned by the model driving a fit; clones are held by the
/// likelihood evaluator and the solver observer. Counters must be reset at
/// the start of every fit so repeated fits never leak state into each other.
#[derive(Debug, Clone)]
pub struct FitProgress {
    inner: Arc<ProgressInner>,
}

impl FitProgress {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ProgressInner {
                evaluations: AtomicU64::new(0),
                iterations: AtomicU64::new(0),
                last_value: AtomicU64::new(f64::NAN.to_bits()),
            }),
        }
    }

    /// Zero all counters and clear the latest objective value.
    pub fn reset(&self) {
        self.inner.evaluations.store(0, Ordering::Relaxed);
        self.inner.iterations.store(0, Ordering::Relaxed);
        self.inner.last_value.store(f64::NAN.to_bits(), Ordering::Relaxed);
    }

    /// Record one objective evaluation and its value.
    pub fn record_eval(&self, value: f64) {
        self.inner.evaluations.fetch_add(1, Ordering::Relaxed);
        self.inner.last_value.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Record the solver's current iteration count.
    pub fn record_iterations(&self, iterations: u64) {
        self.inner.iterations.store(iterations, Ordering::Relaxed);
    }

    /// Number of objective evaluations since the last reset.
    pub fn evaluations(&self) -> u64 {
        self.inner.evaluations.load(Ordering::Relaxed)
    }

    /// Number of solver iterations since the last reset.
    pub fn iterations(&self) -> u64 {
        self.inner.iterations.load(Ordering::Relaxed)
    }

    /// Latest recorded objective value (`NaN` before the first evaluation).
    pub fn last_value(&self) -> f64 {
        f64::from_bits(self.inner.last_value.load(Ordering::Relaxed))
    }
}

impl Default for FitProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Solver observer that mirrors iteration counts into a [`FitProgress`] and
/// emits periodic progress lines.
///
/// The line format follows the classic estimation-callback display:
/// iteration, cumulative function count, and the latest negative
/// log-likelihood.
pub struct ProgressObserver {
    progress: FitProgress,
    update_freq: u64,
}

impl ProgressObserver {
    /// `update_freq == 0` disables iteration lines; counters are still kept.
    pub fn new(progress: FitProgress, update_freq: u64) -> Self {
        Self { progress, update_freq }
    }
}

impl Observe<IterState<Params, (), (), (), (), f64>> for ProgressObserver {
    fn observe_iter(
        &mut self, state: &IterState<Params, (), (), (), (), f64>, _kv: &KV,
    ) -> Result<(), Error> {
        let iteration = state.get_iter() + 1;
        self.progress.record_iterations(iteration);
        if self.update_freq > 0 && iteration % self.update_freq == 0 {
            log::info!(
                "Iteration: {:>6},   Func. Count: {:>6},   Neg. LLF: {}",
                iteration,
                self.progress.evaluations(),
                self.progress.last_value()
            );
        }
        Ok(())
    }
}
