//! Property-based invariant tests for the step queue.
//!
//! These hold for any seed, any mode pair, and any bounded-run limits:
//!
//! 1. Queue length equals seeded calls + adds − pops after every run.
//! 2. A bounded run never pops more than `pop_max` calls.
//! 3. A run stops once adds reach `add_check`, overshooting by less than
//!    one maximum batch.
//! 4. Shuffling preserves the multiset of pending calls.
//! 5. Counter resets zero the observable counters without touching calls.

use proptest::prelude::*;
use stepq_core::{EndMode, StepQueue, StepRng};

fn mode_strategy() -> impl Strategy<Value = EndMode> {
    prop_oneof![
        Just(EndMode::First),
        Just(EndMode::Last),
        Just(EndMode::Either),
    ]
}

/// Expansion used throughout: values above zero shrink into `width` copies
/// of their decrement, so every run terminates.
fn shrinking(width: usize) -> impl FnMut(&u32) -> Vec<u32> {
    move |n: &u32| {
        if *n > 0 {
            vec![n - 1; width]
        } else {
            Vec::new()
        }
    }
}

proptest! {
    #[test]
    fn length_invariant_holds_across_bounded_runs(
        seed in any::<u64>(),
        depths in prop::collection::vec(0u32..4, 0..8),
        pop_mode in mode_strategy(),
        add_mode in mode_strategy(),
        width in 1usize..4,
        pop_max in 0u64..20,
    ) {
        let seeded = depths.len() as u64;
        let mut queue = StepQueue::with_modes(pop_mode, add_mode)
            .with_rng(StepRng::new(seed))
            .with_calls(depths)
            .with_expansion(shrinking(width));

        for _ in 0..4 {
            queue.step_until(pop_max, 0);
            prop_assert_eq!(
                queue.len() as u64,
                seeded + queue.adds() - queue.pops()
            );
        }
    }

    #[test]
    fn pop_max_never_exceeded(
        seed in any::<u64>(),
        pop_max in 1u64..30,
        width in 1usize..4,
    ) {
        let mut queue = StepQueue::new()
            .with_rng(StepRng::new(seed))
            .with_calls([6u32])
            .with_expansion(shrinking(width));

        let delta = queue.step_until(pop_max, 0);
        prop_assert!(delta.pops <= pop_max);
        prop_assert_eq!(delta.pops, queue.pops_delta());
    }

    #[test]
    fn add_check_overshoot_is_bounded_by_one_batch(
        seed in any::<u64>(),
        add_check in 1u64..20,
        width in 1usize..6,
    ) {
        let mut queue = StepQueue::new()
            .with_rng(StepRng::new(seed))
            .with_calls([32u32])
            .with_expansion(shrinking(width));

        let delta = queue.step_until(0, add_check);
        if delta.adds >= add_check {
            // the final step's batch is the only permitted overshoot
            prop_assert!(delta.adds - add_check < width as u64);
        } else {
            prop_assert!(queue.is_empty());
        }
    }

    #[test]
    fn shuffle_preserves_multiset(
        seed in any::<u64>(),
        mut calls in prop::collection::vec(any::<u16>(), 0..64),
    ) {
        let mut queue = StepQueue::new()
            .with_rng(StepRng::new(seed))
            .with_calls(calls.iter().copied());

        queue.shuffle();
        let mut shuffled: Vec<u16> = queue.iter().copied().collect();
        shuffled.sort_unstable();
        calls.sort_unstable();
        prop_assert_eq!(shuffled, calls);
    }

    #[test]
    fn reset_counts_clears_observables(
        seed in any::<u64>(),
        steps in 1u64..10,
    ) {
        let mut queue = StepQueue::new()
            .with_rng(StepRng::new(seed))
            .with_calls([4u32])
            .with_expansion(shrinking(2));

        queue.step_until(steps, 0);
        let len_before = queue.len();
        queue.reset_counts();
        prop_assert_eq!(queue.pops(), 0);
        prop_assert_eq!(queue.adds(), 0);
        prop_assert_eq!(queue.pops_delta(), 0);
        prop_assert_eq!(queue.adds_delta(), 0);
        prop_assert_eq!(queue.len(), len_before);
    }
}
