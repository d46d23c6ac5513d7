//! Integration tests for the step queue's bounded runs and mode policies.

use std::cell::RefCell;
use std::rc::Rc;

use stepq_core::{EndMode, StepError, StepQueue, StepRng};

fn seeded<E>(seed: u64, calls: impl IntoIterator<Item = E>) -> StepQueue<E> {
    StepQueue::new()
        .with_rng(StepRng::new(seed))
        .with_calls(calls)
}

// ---- consumptive stepping (no expansion) ----

#[test]
fn consumptive_step_then_drain() {
    let mut queue = seeded(1, ["a", "b", "c"]);

    assert_eq!(queue.step(), Ok("a"));
    assert_eq!(queue.iter().copied().collect::<Vec<_>>(), ["b", "c"]);
    assert_eq!(queue.pops(), 1);
    assert_eq!(queue.adds(), 0);

    let delta = queue.step_all();
    assert_eq!((delta.pops, delta.adds), (2, 0));
    assert!(queue.is_empty());
}

#[test]
fn step_all_on_empty_queue_is_a_no_op() {
    let mut queue: StepQueue<u8> = seeded(1, []);
    let delta = queue.step_all();
    assert_eq!((delta.pops, delta.adds), (0, 0));
    assert_eq!(queue.step(), Err(StepError::EmptyQueue));
}

// ---- binary-tree expansion: depth d < 3 yields two calls of depth d + 1 ----

fn binary_to_depth_3(depth: &u32) -> Vec<u32> {
    if *depth < 3 {
        vec![depth + 1, depth + 1]
    } else {
        Vec::new()
    }
}

#[test]
fn pop_max_is_a_hard_bound() {
    let mut queue = seeded(2, [0u32]).with_expansion(binary_to_depth_3);

    let delta = queue.step_until(5, 0);
    assert_eq!(delta.pops, 5);
    assert_eq!(queue.pops_delta(), 5);
    // breadth-first from one root: depths 0,1,1,2,2 popped, each expanding
    assert_eq!(delta.adds, 10);
    assert_eq!(queue.len() as u64, 1 + queue.adds() - queue.pops());
}

#[test]
fn pop_max_may_underrun_when_queue_empties() {
    let mut queue = seeded(3, [2u32]).with_expansion(binary_to_depth_3);

    // tree below depth 2 has 1 + 2 + 4 = 7 nodes
    let delta = queue.step_until(100, 0);
    assert_eq!(delta.pops, 7);
    assert!(queue.is_empty());
}

#[test]
fn full_binary_tree_drains_to_empty() {
    let mut queue = seeded(4, [0u32]).with_expansion(binary_to_depth_3);

    let delta = queue.step_all();
    // 1 + 2 + 4 + 8 nodes popped; all but the root were added
    assert_eq!(delta.pops, 15);
    assert_eq!(delta.adds, 14);
    assert!(queue.is_empty());
}

#[test]
fn adds_delta_matches_observed_batch_sizes() {
    let batch_log = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&batch_log);
    let mut queue = seeded(5, [0u32]).with_expansion(move |depth: &u32| {
        let batch = binary_to_depth_3(depth);
        log.borrow_mut().push(batch.len() as u64);
        batch
    });

    let delta = queue.step_until(9, 0);
    assert_eq!(delta.pops, 9);
    assert_eq!(delta.adds, batch_log.borrow().iter().sum::<u64>());
}

// ---- soft add bound ----

#[test]
fn add_check_overshoots_by_at_most_one_batch() {
    let mut queue = seeded(6, [0u32]).with_expansion(|_: &u32| vec![0u32; 4]);

    // before the first step adds = 0 < 3, so exactly one step runs
    let delta = queue.step_until(0, 3);
    assert_eq!(delta.pops, 1);
    assert_eq!(delta.adds, 4);
    assert_eq!(queue.adds(), 4);
}

#[test]
fn add_check_stops_once_reached() {
    let mut queue = seeded(7, [0u32]).with_expansion(|_: &u32| vec![0u32; 4]);

    let delta = queue.step_until(0, 8);
    // 0 < 8 after one step (4 adds), 4 < 8 after two, 8 stops the third
    assert_eq!(delta.pops, 2);
    assert_eq!(delta.adds, 8);
}

#[test]
fn bounded_runs_rebaseline_each_time() {
    let mut queue = seeded(8, [0u32]).with_expansion(|_: &u32| vec![0u32; 2]);

    let first = queue.step_until(3, 0);
    let second = queue.step_until(3, 0);
    assert_eq!(first.pops, 3);
    assert_eq!(second.pops, 3);
    assert_eq!(queue.pops(), 6);
    assert_eq!(queue.pops_delta(), 3);
}

// ---- randomized end selection ----

#[test]
fn either_pop_is_roughly_even() {
    let mut queue: StepQueue<char> = StepQueue::new().with_rng(StepRng::new(21));
    let mut fronts = 0u32;
    for _ in 0..2_000 {
        queue.clear();
        queue.extend(['f', 'b']);
        if queue.step_with(EndMode::Either, EndMode::Last) == Ok('f') {
            fronts += 1;
        }
    }
    assert!(
        (880..=1_120).contains(&fronts),
        "expected ~1000 front pops, got {fronts}"
    );
}

#[test]
fn pop_and_add_flips_are_independent() {
    let mut queue: StepQueue<char> = StepQueue::new().with_rng(StepRng::new(34));
    // tally the four (pop end, add end) combinations; independent fair
    // coins put each near a quarter
    let mut combos = [0u32; 4];
    for _ in 0..4_000 {
        queue.clear();
        queue.extend(['f', 'b']);
        queue.set_expansion(|_: &char| vec!['x']);
        let popped_front = queue.step_with(EndMode::Either, EndMode::Either) == Ok('f');
        let added_front = queue.iter().next() == Some(&'x');
        let combo = (popped_front as usize) * 2 + added_front as usize;
        combos[combo] += 1;
    }
    for (i, count) in combos.iter().enumerate() {
        assert!(
            (700..=1_300).contains(count),
            "combo {i} hit {count} times of 4000: {combos:?}"
        );
    }
}

#[test]
fn either_add_places_batch_at_one_end_only() {
    let mut queue = seeded(55, [0i32]).with_expansion(|n: &i32| {
        if *n == 0 {
            vec![1, 2]
        } else {
            Vec::new()
        }
    });
    queue.push_back(-1);
    queue.step_with(EndMode::First, EndMode::Either).unwrap();

    let contents: Vec<_> = queue.iter().copied().collect();
    // remaining seed call -1 plus the batch at the front or the back
    assert!(
        contents == [2, 1, -1] || contents == [-1, 1, 2],
        "batch split across ends: {contents:?}"
    );
}

// ---- shuffled growth ----

#[test]
fn shuffled_run_keeps_length_invariant() {
    let mut queue = seeded(90, [0u32]).with_expansion(binary_to_depth_3);

    let mut total_pops = 0;
    while !queue.is_empty() {
        let delta = queue.step_until(4, 0);
        total_pops += delta.pops;
        queue.shuffle();
        assert_eq!(queue.len() as u64, 1 + queue.adds() - queue.pops());
    }
    assert_eq!(total_pops, 15);
}
