#![forbid(unsafe_code)]

//! End-selection policy for double-ended queue operations.

use std::fmt;

use crate::rng::StepRng;

/// Which end of the queue an operation acts on.
///
/// `First` and `Last` name the two concrete ends; `Either` defers the choice
/// to a coin flip at each use site. A configured `Either` never collapses
/// into a stored `First` or `Last`: resolution happens fresh per operation
/// via [`EndMode::resolve`], so two resolutions within one step are
/// independent draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndMode {
    /// Act on the front of the queue.
    First,
    /// Act on the back of the queue.
    Last,
    /// Pick the front or the back at random, per operation.
    Either,
}

/// A concrete queue end, after any `Either` has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    /// The front of the queue.
    Front,
    /// The back of the queue.
    Back,
}

impl EndMode {
    /// Pick `First` or `Last` with equal probability.
    #[must_use]
    pub fn either(rng: &mut StepRng) -> EndMode {
        if rng.coin() {
            EndMode::First
        } else {
            EndMode::Last
        }
    }

    /// Pick any of the three modes with equal probability.
    ///
    /// For choosing a configuration, not for per-step resolution; a picked
    /// `Either` still re-resolves on every operation.
    #[must_use]
    pub fn random(rng: &mut StepRng) -> EndMode {
        match rng.next_below(3) {
            0 => EndMode::First,
            1 => EndMode::Last,
            _ => EndMode::Either,
        }
    }

    /// Resolve this mode to a concrete end, flipping a fresh coin for
    /// `Either`.
    #[must_use]
    pub fn resolve(self, rng: &mut StepRng) -> End {
        match self {
            EndMode::First => End::Front,
            EndMode::Last => End::Back,
            EndMode::Either => {
                if rng.coin() {
                    End::Front
                } else {
                    End::Back
                }
            }
        }
    }

    /// Lowercase name, as used in status lines and capture file stems.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EndMode::First => "first",
            EndMode::Last => "last",
            EndMode::Either => "either",
        }
    }
}

impl fmt::Display for EndMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl End {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            End::Front => "front",
            End::Back => "back",
        }
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
