//! Property tests for group encoding and merge

use std::collections::BTreeMap;

use proptest::prelude::*;
use tally_core::{CounterEnum, TaskCounter};
use tally_group::FrameworkCounterGroup;

fn populated() -> impl Strategy<Value = BTreeMap<usize, i64>> {
    prop::collection::btree_map(0..TaskCounter::cardinality(), any::<i64>(), 0..12)
}

fn group_from(entries: &BTreeMap<usize, i64>) -> FrameworkCounterGroup<TaskCounter> {
    let group = FrameworkCounterGroup::new();
    for (&ordinal, &value) in entries {
        group.increment(TaskCounter::VALUES[ordinal], value);
    }
    group
}

fn as_ordinals(group: &FrameworkCounterGroup<TaskCounter>) -> Vec<(usize, i64)> {
    group
        .snapshot()
        .into_iter()
        .map(|(key, value)| (key.ordinal(), value))
        .collect()
}

proptest! {
    #[test]
    fn prop_roundtrip_preserves_populated_set(entries in populated()) {
        let group = group_from(&entries);
        let mut bytes = Vec::new();
        group.write_fields(&mut bytes).unwrap();

        let mut decoded = FrameworkCounterGroup::<TaskCounter>::new();
        decoded.read_fields(&mut bytes.as_slice()).unwrap();

        let expected: Vec<(usize, i64)> = entries.into_iter().collect();
        prop_assert_eq!(as_ordinals(&decoded), expected);
        prop_assert_eq!(decoded, group);
    }

    #[test]
    fn prop_merge_adds_slotwise(a in populated(), b in populated()) {
        let left = group_from(&a);
        let right = group_from(&b);
        left.incr_all_counters(Some(&right)).unwrap();

        let mut expected = a.clone();
        for (ordinal, value) in b {
            let slot = expected.entry(ordinal).or_insert(0);
            *slot = slot.wrapping_add(value);
        }
        prop_assert_eq!(as_ordinals(&left), expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_self_merge_doubles(entries in populated()) {
        let group = group_from(&entries);
        group.incr_all_counters(Some(&group)).unwrap();

        let expected: Vec<(usize, i64)> = entries
            .into_iter()
            .map(|(k, v)| (k, v.wrapping_mul(2)))
            .collect();
        prop_assert_eq!(as_ordinals(&group), expected);
    }

    #[test]
    fn prop_decoding_garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut group = FrameworkCounterGroup::<TaskCounter>::new();
        group.increment(TaskCounter::MapInputRecords, 1);
        let before = as_ordinals(&group);

        if group.read_fields(&mut bytes.as_slice()).is_err() {
            prop_assert_eq!(as_ordinals(&group), before);
        }
    }
}
