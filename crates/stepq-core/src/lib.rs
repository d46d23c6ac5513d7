#![forbid(unsafe_code)]

//! Core: end-selection policy, seeded randomness, and the step queue.
//!
//! A recursive computation is modeled as opaque *calls* on a double-ended
//! queue instead of frames on the call stack. Each step pops one call,
//! expands it through a caller-supplied strategy, and pushes the resulting
//! calls back. Bounded stepping lets the process advance a little per host
//! tick, which is what makes progressive output (one animation frame at a
//! time) possible without threads.
//!
//! # Key Components
//!
//! - [`EndMode`] / [`End`] - which end of the queue an operation acts on,
//!   with `Either` resolved by a fresh coin flip per operation
//! - [`StepRng`] - seedable random source behind all `Either` resolution
//!   and shuffling
//! - [`StepQueue`] - the queue itself: stepping, bounded runs, counters
//! - [`Expansion`] - the sole extension point, mapping one call to zero or
//!   more follow-up calls

pub mod end_mode;
pub mod queue;
pub mod rng;

pub use end_mode::{End, EndMode};
pub use queue::{Expansion, StepDelta, StepError, StepQueue};
pub use rng::StepRng;
