//! Test doubles
//!
//! `MapCounterGroup` is a counter group of the `Generic` family: counters are
//! keyed by free-form names fixed at construction. It exists so tests can
//! drive merges and comparisons across storage families.

use std::sync::atomic::{AtomicI64, Ordering};

use tally_core::{TallyError, TallyResult};
use tally_group::{Counter, CounterGroupBase, GroupKind};
use tally_wire::{DataInput, DataOutput};

/// Counter keyed by an arbitrary name
#[derive(Debug)]
pub struct MapCounter {
    name: String,
    value: AtomicI64,
}

impl MapCounter {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        MapCounter {
            name: name.into(),
            value: AtomicI64::new(value),
        }
    }
}

impl Counter for MapCounter {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    fn set_value(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    fn increment(&self, delta: i64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }
}

/// Generic-family group over a fixed set of named counters
#[derive(Debug)]
pub struct MapCounterGroup {
    name: String,
    display_name: String,
    counters: Vec<MapCounter>,
}

impl MapCounterGroup {
    pub fn new<'a>(name: impl Into<String>, entries: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        let name = name.into();
        MapCounterGroup {
            display_name: name.clone(),
            name,
            counters: entries
                .into_iter()
                .map(|(n, v)| MapCounter::new(n, v))
                .collect(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&MapCounter> {
        self.counters.iter().find(|c| c.name == name)
    }

    fn unknown(&self, name: &str) -> TallyError {
        TallyError::InvalidArgument(format!("no counter {} in group {}", name, self.name))
    }
}

impl CounterGroupBase for MapCounterGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn set_display_name(&mut self, name: String) {
        self.display_name = name;
    }

    fn kind(&self) -> GroupKind {
        GroupKind::Generic
    }

    fn size(&self) -> usize {
        self.counters.len()
    }

    fn counters(&self) -> Box<dyn Iterator<Item = &dyn Counter> + '_> {
        Box::new(self.counters.iter().map(|c| c as &dyn Counter))
    }

    fn find_counter(&self, name: &str) -> TallyResult<&dyn Counter> {
        self.lookup(name)
            .map(|c| c as &dyn Counter)
            .ok_or_else(|| self.unknown(name))
    }

    fn find_counter_opt(&self, name: &str, create: bool) -> TallyResult<Option<&dyn Counter>> {
        match self.lookup(name) {
            Some(c) => Ok(Some(c as &dyn Counter)),
            None if create => Err(self.unknown(name)),
            None => Ok(None),
        }
    }

    fn add_counter(&self, counter: &dyn Counter) -> TallyResult<()> {
        self.find_counter(counter.name())?.set_value(counter.value());
        Ok(())
    }

    fn add_counter_value(
        &self,
        name: &str,
        _display_name: &str,
        value: i64,
    ) -> TallyResult<&dyn Counter> {
        let counter = self.find_counter(name)?;
        counter.set_value(value);
        Ok(counter)
    }

    // Slow path: match by name, any family.
    fn incr_all_counters(&self, other: Option<&dyn CounterGroupBase>) -> TallyResult<()> {
        let other = other.ok_or(TallyError::MissingGroup("other counter group"))?;
        for source in other.counters() {
            self.find_counter(source.name())?.increment(source.value());
        }
        Ok(())
    }

    fn write_fields(&self, out: &mut dyn DataOutput) -> TallyResult<()> {
        out.write_vint(wire_len(self.counters.len())?)?;
        for c in &self.counters {
            out.write_vint(wire_len(c.name.len())?)?;
            out.write_bytes(c.name.as_bytes())?;
            out.write_vlong(c.value())?;
        }
        Ok(())
    }

    fn read_fields(&mut self, input: &mut dyn DataInput) -> TallyResult<()> {
        let count = read_len(input, "counter count")?;
        let mut counters = Vec::new();
        for _ in 0..count {
            let len = read_len(input, "name length")?;
            let mut name = Vec::with_capacity(len.min(256));
            for _ in 0..len {
                name.push(input.read_u8()?);
            }
            let name = String::from_utf8(name)
                .map_err(|e| TallyError::InvalidWireFormat(e.to_string()))?;
            counters.push(MapCounter::new(name, input.read_vlong()?));
        }
        self.counters = counters;
        Ok(())
    }
}

fn wire_len(n: usize) -> TallyResult<i32> {
    i32::try_from(n).map_err(|_| TallyError::InvalidArgument(format!("{} exceeds vint range", n)))
}

fn read_len(input: &mut dyn DataInput, what: &str) -> TallyResult<usize> {
    let raw = input.read_vint()?;
    usize::try_from(raw)
        .map_err(|_| TallyError::InvalidWireFormat(format!("negative {} {}", what, raw)))
}
