//! Group Fuzzer - Seeded model checking for framework counter groups
//!
//! Each simulated task drives its own group with random increments,
//! overwrites and encode/decode round trips while a `BTreeMap` model tracks
//! what the group should hold. At the end every task group is merged into a
//! job total, which must equal the sum of the task models.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tally_core::{CounterEnum, TaskCounter};
use tally_group::FrameworkCounterGroup;
use tally_wire::vlong_size;
use tracing::debug;

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Number of simulated tasks
    pub task_count: usize,
    /// Operations applied to each task's group
    pub ops_per_task: usize,
    /// Probability an operation is an encode/decode round trip
    pub roundtrip_prob: f64,
    /// Probability an operation overwrites instead of increments
    pub overwrite_prob: f64,
    /// Largest absolute increment or overwrite value
    pub max_delta: i64,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            task_count: 8,
            ops_per_task: 200,
            roundtrip_prob: 0.05,
            overwrite_prob: 0.1,
            max_delta: 1_000,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            task_count: 2,
            ops_per_task: 20,
            ..Default::default()
        }
    }

    /// Heavy fuzzing with wide values, exercising multi-byte encodings
    pub fn heavy() -> Self {
        FuzzerConfig {
            task_count: 32,
            ops_per_task: 2_000,
            roundtrip_prob: 0.1,
            overwrite_prob: 0.2,
            max_delta: 1 << 48,
            seed: 42,
        }
    }
}

/// Outcome of a fuzzing run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FuzzResult {
    pub operations: u64,
    pub roundtrips: u64,
    pub encoded_bytes: usize,
    pub mismatches: Vec<String>,
}

impl FuzzResult {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

type Model = BTreeMap<usize, i64>;

/// Counter group fuzzer
pub struct GroupFuzzer {
    config: FuzzerConfig,
    rng: StdRng,
}

impl GroupFuzzer {
    pub fn new(config: FuzzerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        GroupFuzzer { config, rng }
    }

    /// Run the fuzzer
    pub fn run(&mut self) -> FuzzResult {
        let mut result = FuzzResult::default();
        let total = FrameworkCounterGroup::<TaskCounter>::new();
        let mut total_model = Model::new();

        for task in 0..self.config.task_count {
            let (group, model) = self.run_task(task, &mut result);

            if let Err(e) = total.incr_all_counters(Some(&group)) {
                result.mismatches.push(format!("task {}: merge failed: {}", task, e));
            }
            for (ordinal, value) in model {
                let slot = total_model.entry(ordinal).or_insert(0);
                *slot = slot.wrapping_add(value);
            }
        }

        check_matches("job total", &total, &total_model, &mut result);
        debug!(
            operations = result.operations,
            roundtrips = result.roundtrips,
            mismatches = result.mismatches.len(),
            "fuzz run finished"
        );
        result
    }

    fn run_task(
        &mut self,
        task: usize,
        result: &mut FuzzResult,
    ) -> (FrameworkCounterGroup<TaskCounter>, Model) {
        let mut group = FrameworkCounterGroup::<TaskCounter>::new();
        let mut model = Model::new();
        let label = format!("task {}", task);

        for _ in 0..self.config.ops_per_task {
            let key = TaskCounter::VALUES[self.rng.gen_range(0..TaskCounter::cardinality())];
            let value = self.rng.gen_range(-self.config.max_delta..=self.config.max_delta);
            let roll: f64 = self.rng.gen();

            if roll < self.config.roundtrip_prob {
                if let Some(decoded) = roundtrip(&label, &group, &model, result) {
                    group = decoded;
                }
                result.roundtrips += 1;
            } else if roll < self.config.roundtrip_prob + self.config.overwrite_prob {
                match group.add_counter_value(key.name(), "", value) {
                    Ok(_) => {
                        model.insert(key.ordinal(), value);
                    }
                    Err(e) => result.mismatches.push(format!("{}: add failed: {}", label, e)),
                }
            } else {
                group.increment(key, value);
                let slot = model.entry(key.ordinal()).or_insert(0);
                *slot = slot.wrapping_add(value);
            }
            result.operations += 1;
        }

        check_matches(&label, &group, &model, result);
        (group, model)
    }
}

/// Encode and decode `group`, checking the encoded size against the model
fn roundtrip(
    label: &str,
    group: &FrameworkCounterGroup<TaskCounter>,
    model: &Model,
    result: &mut FuzzResult,
) -> Option<FrameworkCounterGroup<TaskCounter>> {
    let mut bytes = Vec::new();
    if let Err(e) = group.write_fields(&mut bytes) {
        result.mismatches.push(format!("{}: encode failed: {}", label, e));
        return None;
    }

    let expected_len = vlong_size(model.len() as i64)
        + model
            .iter()
            .map(|(&ordinal, &value)| vlong_size(ordinal as i64) + vlong_size(value))
            .sum::<usize>();
    if bytes.len() != expected_len {
        result.mismatches.push(format!(
            "{}: encoded {} bytes, expected {}",
            label,
            bytes.len(),
            expected_len
        ));
    }
    result.encoded_bytes += bytes.len();

    let mut decoded = FrameworkCounterGroup::<TaskCounter>::new();
    match decoded.read_fields(&mut bytes.as_slice()) {
        Ok(()) => Some(decoded),
        Err(e) => {
            result.mismatches.push(format!("{}: decode failed: {}", label, e));
            None
        }
    }
}

fn check_matches(
    label: &str,
    group: &FrameworkCounterGroup<TaskCounter>,
    model: &Model,
    result: &mut FuzzResult,
) {
    let actual: Vec<(usize, i64)> = group
        .snapshot()
        .into_iter()
        .map(|(key, value)| (key.ordinal(), value))
        .collect();
    let expected: Vec<(usize, i64)> = model.iter().map(|(&k, &v)| (k, v)).collect();

    if actual != expected {
        result.mismatches.push(format!(
            "{}: group {:?} differs from model {:?}",
            label, actual, expected
        ));
    }
}
