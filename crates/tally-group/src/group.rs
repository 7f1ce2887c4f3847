//! Framework counter group
//!
//! A group is bound to one [`CounterEnum`]. It reserves one slot per
//! enumeration value and creates a counter only when its slot is first
//! addressed, so an untouched slot is absent rather than zero.
//!
//! Slots are `OnceLock`s: allocation happens at most once per ordinal and
//! can be triggered through `&self`. Counter values are atomics. The `gate`
//! is shared by group-level mutators and held exclusively while a snapshot
//! is taken, which is what equality, hashing and encoding traverse.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tally_core::{CounterEnum, TallyError, TallyResult};
use tally_wire::{DataInput, DataOutput};
use tracing::{debug, trace, warn};

use crate::{Counter, CounterGroupBase, FrameworkCounter, GroupKind, NameResolver, RawNames};

pub(crate) type Slots<E> = Box<[OnceLock<FrameworkCounter<E>>]>;

pub(crate) fn empty_slots<E: CounterEnum>() -> Slots<E> {
    (0..E::cardinality()).map(|_| OnceLock::new()).collect()
}

/// Sparse, enumeration-indexed counter group
pub struct FrameworkCounterGroup<E: CounterEnum> {
    pub(crate) slots: Slots<E>,
    display_name: OnceLock<String>,
    pub(crate) names: Arc<dyn NameResolver>,
    gate: RwLock<()>,
}

impl<E: CounterEnum> FrameworkCounterGroup<E> {
    /// Create an empty group that displays canonical names
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(RawNames))
    }

    /// Create an empty group resolving display names through `names`
    pub fn with_resolver(names: Arc<dyn NameResolver>) -> Self {
        FrameworkCounterGroup {
            slots: empty_slots(),
            display_name: OnceLock::new(),
            names,
            gate: RwLock::new(()),
        }
    }

    /// Group identity
    #[inline]
    pub fn name(&self) -> &'static str {
        E::GROUP_NAME
    }

    /// Display name; resolved on first use, then cached
    pub fn display_name(&self) -> &str {
        self.display_name
            .get_or_init(|| self.names.group_name(E::GROUP_NAME, E::GROUP_NAME))
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = OnceLock::from(name.into());
    }

    /// Slot capacity, i.e. the enumeration's cardinality.
    ///
    /// This is not the number of populated counters; see [`populated`](Self::populated).
    #[inline]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Number of populated slots
    pub fn populated(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Counter for `key`, created on first access
    pub fn counter(&self, key: E) -> &FrameworkCounter<E> {
        self.slots[key.ordinal()].get_or_init(|| {
            trace!(group = E::GROUP_NAME, counter = key.name(), "allocating counter slot");
            FrameworkCounter::new(key, Arc::clone(&self.names))
        })
    }

    /// Counter named `name`, created on first access
    pub fn find_counter(&self, name: &str) -> TallyResult<&FrameworkCounter<E>> {
        match E::from_name(name) {
            Some(key) => Ok(self.counter(key)),
            None => Err(TallyError::UnknownCounter {
                group: E::GROUP_NAME,
                name: name.to_string(),
            }),
        }
    }

    /// Like [`find_counter`](Self::find_counter), but an unknown name is
    /// `Ok(None)` when `create` is false and `InvalidArgument` when it is true
    pub fn find_counter_opt(
        &self,
        name: &str,
        create: bool,
    ) -> TallyResult<Option<&FrameworkCounter<E>>> {
        match E::from_name(name) {
            Some(key) => Ok(Some(self.counter(key))),
            None if create => Err(TallyError::InvalidArgument(format!(
                "no counter {} in group {}",
                name,
                E::GROUP_NAME
            ))),
            None => Ok(None),
        }
    }

    /// Display names come from the resolver; `_display_name` is ignored.
    pub fn find_counter_named(
        &self,
        name: &str,
        _display_name: &str,
    ) -> TallyResult<&FrameworkCounter<E>> {
        self.find_counter(name)
    }

    /// Overwrite our counter of the same name with `counter`'s value
    pub fn add_counter(&self, counter: &dyn Counter) -> TallyResult<()> {
        let _gate = self.gate.read();
        self.find_counter(counter.name())?.set_value(counter.value());
        Ok(())
    }

    /// Find or create `name` and overwrite its value
    pub fn add_counter_value(
        &self,
        name: &str,
        _display_name: &str,
        value: i64,
    ) -> TallyResult<&FrameworkCounter<E>> {
        let _gate = self.gate.read();
        let counter = self.find_counter(name)?;
        counter.set_value(value);
        Ok(counter)
    }

    /// Add `delta` to the counter for `key`
    pub fn increment(&self, key: E, delta: i64) {
        let _gate = self.gate.read();
        self.counter(key).increment(delta);
    }

    /// Current value for `key`, `None` if the slot was never touched
    pub fn value(&self, key: E) -> Option<i64> {
        self.slots[key.ordinal()].get().map(|c| c.value())
    }

    /// Sum every populated counter of `other` into this group.
    ///
    /// `None` is a precondition failure. A group of another storage family
    /// is skipped without error. Counters are matched by ordinal, so
    /// merging a group into itself doubles every populated slot.
    pub fn incr_all_counters(&self, other: Option<&dyn CounterGroupBase>) -> TallyResult<()> {
        let other = other.ok_or(TallyError::MissingGroup("other counter group"))?;

        if other.kind() != GroupKind::Framework {
            debug!(
                group = E::GROUP_NAME,
                other = other.name(),
                "skipping merge from group of another family"
            );
            return Ok(());
        }

        let _gate = self.gate.read();
        for source in other.counters() {
            match source.ordinal().and_then(E::from_ordinal) {
                Some(key) => self.counter(key).increment(source.value()),
                None => warn!(
                    group = E::GROUP_NAME,
                    counter = source.name(),
                    "source counter has no slot in this group"
                ),
            }
        }
        Ok(())
    }

    /// Populated counters in ascending ordinal order.
    ///
    /// Each call starts a fresh pass.
    pub fn iter(&self) -> Iter<'_, E> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    /// Consistent copy of every populated `(key, value)`
    pub fn snapshot(&self) -> Vec<(E, i64)> {
        let _gate = self.gate.write();
        self.iter().map(|c| (c.key(), c.value())).collect()
    }

    fn named_snapshot(&self) -> Vec<(&'static str, i64)> {
        let _gate = self.gate.write();
        self.iter().map(|c| (c.key().name(), c.value())).collect()
    }

    /// Drop every counter; the slot array keeps its length
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.take();
        }
    }
}

impl<E: CounterEnum> Default for FrameworkCounterGroup<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the populated slots of a group
pub struct Iter<'a, E: CounterEnum> {
    slots: std::slice::Iter<'a, OnceLock<FrameworkCounter<E>>>,
}

impl<'a, E: CounterEnum> Iterator for Iter<'a, E> {
    type Item = &'a FrameworkCounter<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().find_map(OnceLock::get)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl<'a, E: CounterEnum> IntoIterator for &'a FrameworkCounterGroup<E> {
    type Item = &'a FrameworkCounter<E>;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Groups bound to different enumerations compare equal when their visible
// (name, value) sequences match.
impl<E: CounterEnum, F: CounterEnum> PartialEq<FrameworkCounterGroup<F>> for FrameworkCounterGroup<E> {
    fn eq(&self, other: &FrameworkCounterGroup<F>) -> bool {
        self.named_snapshot() == other.named_snapshot()
    }
}

impl<E: CounterEnum> Eq for FrameworkCounterGroup<E> {}

// Same inputs as equality, so equal groups hash equally.
impl<E: CounterEnum> Hash for FrameworkCounterGroup<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.named_snapshot().hash(state);
    }
}

impl<E: CounterEnum> fmt::Debug for FrameworkCounterGroup<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkCounterGroup")
            .field("name", &E::GROUP_NAME)
            .field("size", &self.slots.len())
            .field("counters", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<E: CounterEnum> CounterGroupBase for FrameworkCounterGroup<E> {
    fn name(&self) -> &str {
        E::GROUP_NAME
    }

    fn display_name(&self) -> &str {
        FrameworkCounterGroup::display_name(self)
    }

    fn set_display_name(&mut self, name: String) {
        FrameworkCounterGroup::set_display_name(self, name);
    }

    fn kind(&self) -> GroupKind {
        GroupKind::Framework
    }

    fn size(&self) -> usize {
        self.slots.len()
    }

    fn counters(&self) -> Box<dyn Iterator<Item = &dyn Counter> + '_> {
        Box::new(self.iter().map(|c| c as &dyn Counter))
    }

    fn entries(&self) -> Vec<(String, i64)> {
        self.named_snapshot()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    fn find_counter(&self, name: &str) -> TallyResult<&dyn Counter> {
        FrameworkCounterGroup::find_counter(self, name).map(|c| c as &dyn Counter)
    }

    fn find_counter_opt(&self, name: &str, create: bool) -> TallyResult<Option<&dyn Counter>> {
        FrameworkCounterGroup::find_counter_opt(self, name, create)
            .map(|c| c.map(|c| c as &dyn Counter))
    }

    fn add_counter(&self, counter: &dyn Counter) -> TallyResult<()> {
        FrameworkCounterGroup::add_counter(self, counter)
    }

    fn add_counter_value(
        &self,
        name: &str,
        display_name: &str,
        value: i64,
    ) -> TallyResult<&dyn Counter> {
        FrameworkCounterGroup::add_counter_value(self, name, display_name, value)
            .map(|c| c as &dyn Counter)
    }

    fn incr_all_counters(&self, other: Option<&dyn CounterGroupBase>) -> TallyResult<()> {
        FrameworkCounterGroup::incr_all_counters(self, other)
    }

    fn write_fields(&self, out: &mut dyn DataOutput) -> TallyResult<()> {
        FrameworkCounterGroup::write_fields(self, out)
    }

    fn read_fields(&mut self, input: &mut dyn DataInput) -> TallyResult<()> {
        FrameworkCounterGroup::read_fields(self, input)
    }
}
