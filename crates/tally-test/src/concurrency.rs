//! Concurrent increments racing snapshots, equality and merges

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::thread;

use tally_core::{CounterEnum, TaskCounter};
use tally_group::{Counter, FrameworkCounterGroup};

const THREADS: usize = 4;
const PER_THREAD: i64 = 10_000;

#[test]
fn test_concurrent_increments_sum() {
    let group = Arc::new(FrameworkCounterGroup::<TaskCounter>::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let group = Arc::clone(&group);
            thread::spawn(move || {
                let key = TaskCounter::VALUES[i % 2];
                for _ in 0..PER_THREAD {
                    group.increment(key, 1);
                }
            })
        })
        .collect();

    // Snapshots taken mid-flight only ever see whole increments.
    for _ in 0..100 {
        for (_, value) in group.snapshot() {
            assert!((0..=PER_THREAD * THREADS as i64).contains(&value));
        }
    }

    for h in handles {
        h.join().unwrap();
    }

    let expected = PER_THREAD * (THREADS as i64 / 2);
    assert_eq!(
        group.snapshot(),
        vec![
            (TaskCounter::MapInputRecords, expected),
            (TaskCounter::MapOutputRecords, expected),
        ]
    );
}

#[test]
fn test_lazy_slot_created_once_under_contention() {
    let group = Arc::new(FrameworkCounterGroup::<TaskCounter>::new());

    let addresses: Vec<usize> = (0..THREADS)
        .map(|_| {
            let group = Arc::clone(&group);
            thread::spawn(move || {
                let counter = group.find_counter("SPILLED_RECORDS").unwrap();
                counter.increment(1);
                counter as *const _ as usize
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(group.value(TaskCounter::SpilledRecords), Some(THREADS as i64));
    assert_eq!(group.populated(), 1);
}

const MERGES: i64 = 20_000;

fn hash_of(group: &FrameworkCounterGroup<TaskCounter>) -> u64 {
    let mut hasher = DefaultHasher::new();
    group.hash(&mut hasher);
    hasher.finish()
}

/// Task group with two populated slots, each holding 1
fn balanced_task() -> FrameworkCounterGroup<TaskCounter> {
    let task = FrameworkCounterGroup::<TaskCounter>::new();
    task.increment(TaskCounter::MapInputRecords, 1);
    task.increment(TaskCounter::CommittedHeapBytes, 1);
    task
}

fn spawn_merger(total: &Arc<FrameworkCounterGroup<TaskCounter>>) -> thread::JoinHandle<()> {
    let total = Arc::clone(total);
    thread::spawn(move || {
        let task = balanced_task();
        for _ in 0..MERGES {
            total.incr_all_counters(Some(&task)).unwrap();
        }
    })
}

fn assert_balanced(seen: &[(TaskCounter, i64)]) {
    let value = |key: TaskCounter| {
        seen.iter()
            .find(|(k, _)| *k == key)
            .map_or(0, |(_, v)| *v)
    };
    assert_eq!(
        value(TaskCounter::MapInputRecords),
        value(TaskCounter::CommittedHeapBytes),
        "merge observed half applied: {:?}",
        seen
    );
}

#[test]
fn test_snapshot_never_sees_half_merge() {
    let total = Arc::new(FrameworkCounterGroup::<TaskCounter>::new());
    let merger = spawn_merger(&total);

    while !merger.is_finished() {
        assert_balanced(&total.snapshot());
    }
    merger.join().unwrap();

    assert_eq!(
        total.snapshot(),
        vec![
            (TaskCounter::MapInputRecords, MERGES),
            (TaskCounter::CommittedHeapBytes, MERGES),
        ]
    );
}

#[test]
fn test_encoding_never_sees_half_merge() {
    let total = Arc::new(FrameworkCounterGroup::<TaskCounter>::new());
    let merger = spawn_merger(&total);

    while !merger.is_finished() {
        let mut bytes = Vec::new();
        total.write_fields(&mut bytes).unwrap();

        let mut decoded = FrameworkCounterGroup::<TaskCounter>::new();
        decoded.read_fields(&mut bytes.as_slice()).unwrap();
        assert_balanced(&decoded.snapshot());
    }
    merger.join().unwrap();
}

#[test]
fn test_equality_and_hash_while_merging() {
    let total = Arc::new(FrameworkCounterGroup::<TaskCounter>::new());
    let merger = spawn_merger(&total);

    let untouched = FrameworkCounterGroup::<TaskCounter>::new();
    let untouched_hash = hash_of(&untouched);
    while !merger.is_finished() {
        // Counters only grow; once populated the total never equals empty.
        if !total.is_empty() {
            assert!(*total != untouched);
            assert_ne!(hash_of(&total), untouched_hash);
        }
    }
    merger.join().unwrap();

    let expected = FrameworkCounterGroup::<TaskCounter>::new();
    expected.increment(TaskCounter::MapInputRecords, MERGES);
    expected.increment(TaskCounter::CommittedHeapBytes, MERGES);
    assert_eq!(*total, expected);
    assert_eq!(hash_of(&total), hash_of(&expected));
    assert_ne!(hash_of(&total), untouched_hash);
}

#[test]
fn test_parallel_merges_into_job_total() {
    let total = Arc::new(FrameworkCounterGroup::<TaskCounter>::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let total = Arc::clone(&total);
            thread::spawn(move || {
                let task = FrameworkCounterGroup::<TaskCounter>::new();
                task.increment(TaskCounter::ReduceInputRecords, i as i64 + 1);
                total.incr_all_counters(Some(&task)).unwrap();
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let expected: i64 = (1..=THREADS as i64).sum();
    assert_eq!(total.value(TaskCounter::ReduceInputRecords), Some(expected));
}
