#![forbid(unsafe_code)]

//! The step queue: bounded, observable stepping of a recursive process.
//!
//! Instead of a function calling itself, each pending invocation sits on a
//! double-ended queue as an opaque call. One [`StepQueue::step`] pops a call
//! from a configured end, hands it to the injected [`Expansion`] strategy,
//! and appends whatever the strategy returns to a configured end. Bounded
//! runs ([`StepQueue::step_until`]) advance the process a few operations per
//! host tick; [`StepQueue::step_all`] drains it in one go.
//!
//! # Key Invariants
//!
//! 1. Queue length always equals seeded calls + `adds` − `pops`.
//! 2. `pops` and `adds` are non-decreasing between
//!    [`StepQueue::reset_counts`] calls; a failed step changes neither the
//!    counters nor the queue.
//! 3. An `Either` mode is re-resolved with a fresh coin flip at every use;
//!    the pop-side and add-side flips within one step are independent draws.
//! 4. `pop_max` is a hard bound checked before each step; `add_check` is a
//!    soft bound the final step's expansion batch may overshoot.
//!
//! The queue does not inspect calls, does not detect non-terminating
//! expansions, and is not thread-safe.

use std::collections::VecDeque;
use std::fmt;

use crate::end_mode::{End, EndMode};
use crate::rng::StepRng;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from single-step operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepError {
    /// A single step was requested while no calls were pending.
    EmptyQueue,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::EmptyQueue => write!(f, "step on an empty queue"),
        }
    }
}

impl std::error::Error for StepError {}

// ---------------------------------------------------------------------------
// Expansion strategy
// ---------------------------------------------------------------------------

/// Caller-supplied strategy mapping one call to zero or more follow-up calls.
///
/// This is the queue's sole extension point. The strategy receives the call
/// by reference and cannot reach back into the queue; side effects (drawing,
/// accumulation) are allowed, but it should return promptly. Batch order is
/// preserved when the queue appends the result.
///
/// Any `FnMut(&E) -> Vec<E>` closure is an expansion:
///
/// ```
/// use stepq_core::StepQueue;
///
/// let mut queue: StepQueue<u32> = StepQueue::new()
///     .with_calls([8u32])
///     .with_expansion(|n: &u32| if *n > 1 { vec![n / 2, n / 2] } else { vec![] });
/// let delta = queue.step_all();
/// assert!(queue.is_empty());
/// assert_eq!(delta.pops, 15);
/// ```
pub trait Expansion<E> {
    /// Expand one call into its follow-up calls, in append order.
    fn expand(&mut self, call: &E) -> Vec<E>;
}

impl<E, F> Expansion<E> for F
where
    F: FnMut(&E) -> Vec<E>,
{
    fn expand(&mut self, call: &E) -> Vec<E> {
        self(call)
    }
}

/// Default strategy: every call expands to nothing, so stepping only drains
/// the queue. This is also the base case that lets `step_all` terminate.
struct NoExpansion;

impl<E> Expansion<E> for NoExpansion {
    fn expand(&mut self, _call: &E) -> Vec<E> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Step deltas
// ---------------------------------------------------------------------------

/// Pops and adds performed by one bounded run, relative to its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepDelta {
    /// Calls removed during the run.
    pub pops: u64,
    /// Calls appended during the run.
    pub adds: u64,
}

// ---------------------------------------------------------------------------
// StepQueue
// ---------------------------------------------------------------------------

/// A double-ended queue of pending calls with bounded stepping and running
/// counters.
///
/// Seed it with initial calls, then drive it with [`Self::step`] or
/// [`Self::step_until`] from a host loop. The pop and add ends are chosen by
/// [`EndMode`] policies; `Either` flips a fresh coin per operation using the
/// queue's own [`StepRng`], which can be replaced with a seeded one for
/// deterministic runs.
pub struct StepQueue<E> {
    calls: VecDeque<E>,
    expansion: Box<dyn Expansion<E>>,
    rng: StepRng,
    /// End that stepping pops from.
    pub pop_mode: EndMode,
    /// End that stepping appends to.
    pub add_mode: EndMode,
    pops: u64,
    adds: u64,
    pops_baseline: u64,
    adds_baseline: u64,
}

impl<E> StepQueue<E> {
    /// Create an empty queue popping from the front and adding to the back.
    #[must_use]
    pub fn new() -> Self {
        Self::with_modes(EndMode::First, EndMode::Last)
    }

    /// Create an empty queue with explicit pop and add modes.
    #[must_use]
    pub fn with_modes(pop_mode: EndMode, add_mode: EndMode) -> Self {
        Self {
            calls: VecDeque::new(),
            expansion: Box::new(NoExpansion),
            rng: StepRng::from_entropy(),
            pop_mode,
            add_mode,
            pops: 0,
            adds: 0,
            pops_baseline: 0,
            adds_baseline: 0,
        }
    }

    /// Replace the random source, e.g. with a fixed seed for reproducible
    /// `Either` resolution and shuffling.
    #[must_use]
    pub fn with_rng(mut self, rng: StepRng) -> Self {
        self.rng = rng;
        self
    }

    /// Set the expansion strategy.
    #[must_use]
    pub fn with_expansion(mut self, expansion: impl Expansion<E> + 'static) -> Self {
        self.expansion = Box::new(expansion);
        self
    }

    /// Seed the queue with initial calls, appended at the back.
    ///
    /// Seeding does not count toward `adds`.
    #[must_use]
    pub fn with_calls(mut self, calls: impl IntoIterator<Item = E>) -> Self {
        self.calls.extend(calls);
        self
    }

    /// Replace the expansion strategy after construction.
    pub fn set_expansion(&mut self, expansion: impl Expansion<E> + 'static) {
        self.expansion = Box::new(expansion);
    }

    // -- queue surface ------------------------------------------------------

    /// Number of pending calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether no calls are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Insert a call at the front.
    pub fn push_front(&mut self, call: E) {
        self.calls.push_front(call);
    }

    /// Insert a call at the back.
    pub fn push_back(&mut self, call: E) {
        self.calls.push_back(call);
    }

    /// Append calls at the back.
    pub fn extend(&mut self, calls: impl IntoIterator<Item = E>) {
        self.calls.extend(calls);
    }

    /// Drop all pending calls.
    ///
    /// Counters are unaffected; use [`Self::reset_counts`] for those.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Iterate the pending calls from front to back.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.calls.iter()
    }

    /// Randomly permute the pending calls in place.
    ///
    /// Membership is unchanged and counters are untouched; only order
    /// changes. Shuffling once per bounded run spreads growth across a
    /// large call tree instead of following one branch.
    pub fn shuffle(&mut self) {
        let calls = self.calls.make_contiguous();
        // Fisher-Yates
        for i in (1..calls.len()).rev() {
            let j = self.rng.next_below(i + 1);
            calls.swap(i, j);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(len = self.calls.len(), "shuffled queue");
    }

    // -- counters -----------------------------------------------------------

    /// Total calls popped since construction or the last counter reset.
    #[must_use]
    pub fn pops(&self) -> u64 {
        self.pops
    }

    /// Total calls appended by expansions since construction or the last
    /// counter reset. Seeded calls are not counted.
    #[must_use]
    pub fn adds(&self) -> u64 {
        self.adds
    }

    /// Pops since the start of the most recent bounded run.
    #[must_use]
    pub fn pops_delta(&self) -> u64 {
        self.pops - self.pops_baseline
    }

    /// Adds since the start of the most recent bounded run.
    #[must_use]
    pub fn adds_delta(&self) -> u64 {
        self.adds - self.adds_baseline
    }

    /// Zero all counters and baselines. Pending calls are untouched; use
    /// [`Self::clear`] to drop them.
    pub fn reset_counts(&mut self) {
        self.pops = 0;
        self.adds = 0;
        self.pops_baseline = 0;
        self.adds_baseline = 0;
    }

    /// One-line snapshot of modes, counters, and queue length.
    #[must_use]
    pub fn status(&self) -> String {
        format!(
            "pop/add[ {},{} ]  total[ {},{} ]  delta[ {},{} ]  len[ {} ]",
            self.pop_mode,
            self.add_mode,
            self.pops,
            self.adds,
            self.pops_delta(),
            self.adds_delta(),
            self.calls.len(),
        )
    }

    // -- stepping -----------------------------------------------------------

    /// Pop one call, expand it, and append the new calls, using the
    /// configured modes.
    ///
    /// Returns the popped call so callers can post-process it outside the
    /// expansion. Fails with [`StepError::EmptyQueue`] when nothing is
    /// pending; check [`Self::is_empty`] first when driving steps directly.
    pub fn step(&mut self) -> Result<E, StepError> {
        self.step_with(self.pop_mode, self.add_mode)
    }

    /// Pop one call, expand it, and append the new calls, with explicit
    /// modes for this step only.
    ///
    /// `Either` modes are resolved independently for the pop and the add.
    /// The batch is appended one call at a time in the order the expansion
    /// returned it, so a front append places each successive call ahead of
    /// the previously appended one.
    pub fn step_with(&mut self, pop_mode: EndMode, add_mode: EndMode) -> Result<E, StepError> {
        let pop_end = pop_mode.resolve(&mut self.rng);
        let call = match pop_end {
            End::Front => self.calls.pop_front(),
            End::Back => self.calls.pop_back(),
        }
        .ok_or(StepError::EmptyQueue)?;
        self.pops += 1;

        let batch = self.expansion.expand(&call);
        let add_end = add_mode.resolve(&mut self.rng);
        self.adds += batch.len() as u64;
        match add_end {
            End::Front => {
                for new_call in batch {
                    self.calls.push_front(new_call);
                }
            }
            End::Back => {
                for new_call in batch {
                    self.calls.push_back(new_call);
                }
            }
        }
        Ok(call)
    }

    /// Step repeatedly with the configured modes until a bound is hit or
    /// the queue empties. See [`Self::step_until_with`].
    pub fn step_until(&mut self, pop_max: u64, add_check: u64) -> StepDelta {
        self.step_until_with(pop_max, add_check, self.pop_mode, self.add_mode)
    }

    /// Step repeatedly until `pop_max` pops, `add_check` adds, or an empty
    /// queue ends the run. `0` means unbounded on that axis.
    ///
    /// `pop_max` is a hard bound: the run never pops more than `pop_max`
    /// calls. `add_check` is a check, not a hard limit: it is tested before
    /// each step against the adds so far, so the final step's batch may
    /// carry the count past it. A run at `add_check - 1` whose next
    /// expansion returns ten calls ends at `add_check + 9`.
    ///
    /// Returns the pops and adds performed by this run; the same values
    /// remain readable via [`Self::pops_delta`] / [`Self::adds_delta`]
    /// until the next bounded run.
    pub fn step_until_with(
        &mut self,
        pop_max: u64,
        add_check: u64,
        pop_mode: EndMode,
        add_mode: EndMode,
    ) -> StepDelta {
        self.pops_baseline = self.pops;
        self.adds_baseline = self.adds;
        let pops_stop = self.pops_baseline + pop_max;
        let adds_stop = self.adds_baseline + add_check;

        while (pop_max == 0 || self.pops < pops_stop)
            && (add_check == 0 || self.adds < adds_stop)
            && !self.calls.is_empty()
        {
            // emptiness is checked by the loop guard
            if self.step_with(pop_mode, add_mode).is_err() {
                break;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            pops = self.pops_delta(),
            adds = self.adds_delta(),
            remaining = self.calls.len(),
            "bounded run finished"
        );

        StepDelta {
            pops: self.pops_delta(),
            adds: self.adds_delta(),
        }
    }

    /// Step until the queue is empty.
    ///
    /// The expansion must eventually return empty batches for every
    /// reachable call, or this never returns. Inside a tick-bounded host
    /// loop, prefer [`Self::step_until`].
    pub fn step_all(&mut self) -> StepDelta {
        self.step_until_with(0, 0, self.pop_mode, self.add_mode)
    }
}

impl<E> Default for StepQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for StepQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepQueue")
            .field("len", &self.calls.len())
            .field("pop_mode", &self.pop_mode)
            .field("add_mode", &self.add_mode)
            .field("pops", &self.pops)
            .field("adds", &self.adds)
            .finish_non_exhaustive()
    }
}

impl<E> fmt::Display for StepQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
