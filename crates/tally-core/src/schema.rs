//! Enumeration-as-schema
//!
//! A counter group is bound to one closed, ordered enumeration. The
//! enumeration supplies both the schema (ordinal to canonical name) and the
//! storage index (ordinal to slot). Values are known at compile time and
//! never change at runtime.

use std::fmt::Debug;

/// A fixed, ordered registry of named counter slots.
///
/// Implement with [`counter_enum!`](crate::counter_enum) rather than by hand,
/// so that `VALUES[v.ordinal()] == v` holds for every value.
pub trait CounterEnum: Copy + Eq + Debug + Send + Sync + 'static {
    /// Fully qualified group identity, the group's key in outer containers
    const GROUP_NAME: &'static str;

    /// All values in ordinal order
    const VALUES: &'static [Self];

    /// Slot index of this value
    fn ordinal(self) -> usize;

    /// Canonical (symbolic) name, used for lookup and display fallback
    fn name(self) -> &'static str;

    /// Reverse lookup by canonical name
    fn from_name(name: &str) -> Option<Self>;

    /// Lookup by slot index
    #[inline]
    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::VALUES.get(ordinal).copied()
    }

    /// Number of slots a group bound to this enumeration reserves
    #[inline]
    fn cardinality() -> usize {
        Self::VALUES.len()
    }
}

/// Declare a counter enumeration and its [`CounterEnum`] impl.
///
/// An empty body declares an enumeration with no counters.
///
/// ```
/// use tally_core::{counter_enum, CounterEnum};
///
/// counter_enum! {
///     /// Shuffle counters
///     pub enum Shuffle in "demo.Shuffle" {
///         BytesFetched = "BYTES_FETCHED",
///         FetchFailures = "FETCH_FAILURES",
///     }
/// }
///
/// assert_eq!(Shuffle::FetchFailures.ordinal(), 1);
/// assert_eq!(Shuffle::from_name("BYTES_FETCHED"), Some(Shuffle::BytesFetched));
/// assert_eq!(Shuffle::GROUP_NAME, "demo.Shuffle");
/// ```
#[macro_export]
macro_rules! counter_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $group:literal {}
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {}

        impl $crate::CounterEnum for $name {
            const GROUP_NAME: &'static str = $group;
            const VALUES: &'static [Self] = &[];

            fn ordinal(self) -> usize {
                match self {}
            }

            fn name(self) -> &'static str {
                match self {}
            }

            fn from_name(_name: &str) -> Option<Self> {
                None
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $group:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $canonical:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(usize)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $crate::CounterEnum for $name {
            const GROUP_NAME: &'static str = $group;
            const VALUES: &'static [Self] = &[ $( $name::$variant, )+ ];

            #[inline]
            fn ordinal(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $canonical, )+
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $canonical => Some($name::$variant), )+
                    _ => None,
                }
            }
        }
    };
}
