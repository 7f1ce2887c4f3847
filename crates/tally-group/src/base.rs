//! Contract between a counter group and the container aggregating groups

use tally_core::TallyResult;
use tally_wire::{DataInput, DataOutput};

use crate::Counter;

/// Storage family of a counter group
///
/// Only groups of the same family take part in the fast-path merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Sparse slot array indexed by enumeration ordinal
    Framework,
    /// Any other representation (for example, keyed by arbitrary names)
    Generic,
}

/// A named collection of counters, as seen by an aggregating container
pub trait CounterGroupBase: Send + Sync {
    /// Stable group identity
    fn name(&self) -> &str;

    fn display_name(&self) -> &str;

    fn set_display_name(&mut self, name: String);

    fn kind(&self) -> GroupKind;

    /// Capacity hint for sizing output structures
    fn size(&self) -> usize;

    /// Populated counters, in the group's iteration order
    fn counters(&self) -> Box<dyn Iterator<Item = &dyn Counter> + '_>;

    /// `(name, value)` of every populated counter, in iteration order.
    ///
    /// The default walks [`counters`](Self::counters) with no locking, so
    /// concurrent updates may be observed partway. Implementations that can
    /// read all counters atomically override it.
    fn entries(&self) -> Vec<(String, i64)> {
        self.counters()
            .map(|c| (c.name().to_string(), c.value()))
            .collect()
    }

    /// Find or create a counter; unknown names are an error
    fn find_counter(&self, name: &str) -> TallyResult<&dyn Counter>;

    /// Find a counter; unknown names yield `Ok(None)` unless `create` is set
    fn find_counter_opt(&self, name: &str, create: bool) -> TallyResult<Option<&dyn Counter>>;

    /// Find or create the counter named like `counter` and overwrite its value
    fn add_counter(&self, counter: &dyn Counter) -> TallyResult<()>;

    /// Find or create `name` and overwrite its value
    fn add_counter_value(
        &self,
        name: &str,
        display_name: &str,
        value: i64,
    ) -> TallyResult<&dyn Counter>;

    /// Add every counter of `other` into this group
    fn incr_all_counters(&self, other: Option<&dyn CounterGroupBase>) -> TallyResult<()>;

    fn write_fields(&self, out: &mut dyn DataOutput) -> TallyResult<()>;

    fn read_fields(&mut self, input: &mut dyn DataInput) -> TallyResult<()>;
}

/// Structural group equality: populated `(name, value)` sequences match
/// element-wise. Group identity and display names are not compared.
pub fn groups_equal(a: &dyn CounterGroupBase, b: &dyn CounterGroupBase) -> bool {
    a.entries() == b.entries()
}
