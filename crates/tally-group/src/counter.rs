//! Counters
//!
//! `Counter` is the abstraction outer containers see; `FrameworkCounter` is
//! the slot type of an enumeration-bound group.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tally_core::CounterEnum;

use crate::NameResolver;

/// A named, signed 64-bit counter
pub trait Counter: Send + Sync {
    /// Canonical name, used for lookup
    fn name(&self) -> &str;

    /// Human-readable name
    fn display_name(&self) -> String;

    fn value(&self) -> i64;

    /// Overwrite the current value
    fn set_value(&self, value: i64);

    /// Add `delta` to the current value (wrapping)
    fn increment(&self, delta: i64);

    /// Slot index, for counters bound to an enumeration
    fn ordinal(&self) -> Option<usize> {
        None
    }
}

/// Counter equality: same canonical name and same value
pub fn counters_equal(a: &dyn Counter, b: &dyn Counter) -> bool {
    a.name() == b.name() && a.value() == b.value()
}

/// Counter bound to one value of a counter enumeration
pub struct FrameworkCounter<E: CounterEnum> {
    key: E,
    value: AtomicI64,
    names: Arc<dyn NameResolver>,
}

impl<E: CounterEnum> FrameworkCounter<E> {
    pub(crate) fn new(key: E, names: Arc<dyn NameResolver>) -> Self {
        FrameworkCounter {
            key,
            value: AtomicI64::new(0),
            names,
        }
    }

    pub(crate) fn with_value(key: E, value: i64, names: Arc<dyn NameResolver>) -> Self {
        FrameworkCounter {
            key,
            value: AtomicI64::new(value),
            names,
        }
    }

    /// Enumeration value this counter represents
    #[inline]
    pub fn key(&self) -> E {
        self.key
    }
}

impl<E: CounterEnum> Counter for FrameworkCounter<E> {
    fn name(&self) -> &str {
        self.key.name()
    }

    // Resolved on every call; resolvers may cache.
    fn display_name(&self) -> String {
        let name = self.key.name();
        self.names.counter_name(E::GROUP_NAME, name, name)
    }

    #[inline]
    fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    fn set_value(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    #[inline]
    fn increment(&self, delta: i64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    fn ordinal(&self) -> Option<usize> {
        Some(self.key.ordinal())
    }
}

impl<E: CounterEnum> PartialEq for FrameworkCounter<E> {
    fn eq(&self, other: &Self) -> bool {
        counters_equal(self, other)
    }
}

impl<E: CounterEnum> fmt::Debug for FrameworkCounter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key.name(), self.value())
    }
}
