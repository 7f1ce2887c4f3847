//! Display-name resolution
//!
//! Groups and counters are addressed by canonical names; what a user sees
//! comes from a `NameResolver`. Resolution never fails: every lookup carries
//! a fallback, normally the canonical name itself.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;

/// Properties key holding a group's display name
pub const GROUP_NAME_KEY: &str = "CounterGroupName";

/// Suffix of properties keys holding a counter's display name
pub const COUNTER_NAME_SUFFIX: &str = ".name";

/// Resolves group and counter identifiers to display strings
pub trait NameResolver: Send + Sync {
    /// Display name for `group`, or `fallback` when none is known
    fn group_name(&self, group: &str, fallback: &str) -> String;

    /// Display name for `counter` within `group`, or `fallback`
    fn counter_name(&self, group: &str, counter: &str, fallback: &str) -> String;
}

/// Resolver without any localisation; always answers with the fallback
#[derive(Clone, Copy, Debug, Default)]
pub struct RawNames;

impl NameResolver for RawNames {
    fn group_name(&self, _group: &str, fallback: &str) -> String {
        fallback.to_string()
    }

    fn counter_name(&self, _group: &str, _counter: &str, fallback: &str) -> String {
        fallback.to_string()
    }
}

/// Display names for one group
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bundle {
    group_name: Option<String>,
    counters: HashMap<String, String>,
}

impl Bundle {
    pub fn new() -> Self {
        Bundle::default()
    }

    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }

    pub fn with_counter(mut self, counter: impl Into<String>, name: impl Into<String>) -> Self {
        self.counters.insert(counter.into(), name.into());
        self
    }

    /// Parse a properties-style bundle:
    ///
    /// ```text
    /// # comment
    /// CounterGroupName=Map-Reduce Framework
    /// MAP_INPUT_RECORDS.name=Map input records
    /// ```
    ///
    /// Keys other than the group name and `*.name` entries are ignored.
    pub fn parse_properties(text: &str) -> Self {
        let mut bundle = Bundle::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some(split) = line.find(|c: char| c == '=' || c == ':') else {
                continue;
            };
            let key = line[..split].trim();
            let value = line[split + 1..].trim();

            if key == GROUP_NAME_KEY {
                bundle.group_name = Some(value.to_string());
            } else if let Some(counter) = key.strip_suffix(COUNTER_NAME_SUFFIX) {
                bundle.counters.insert(counter.to_string(), value.to_string());
            }
        }

        bundle
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group_name.as_deref()
    }

    pub fn counter_name(&self, counter: &str) -> Option<&str> {
        self.counters.get(counter).map(String::as_str)
    }
}

/// In-memory resolver keyed by group identity
#[derive(Debug, Default)]
pub struct BundleResolver {
    bundles: RwLock<HashMap<String, Bundle>>,
}

impl BundleResolver {
    pub fn new() -> Self {
        BundleResolver::default()
    }

    /// Register (or replace) the bundle for `group`
    pub fn insert(&self, group: impl Into<String>, bundle: Bundle) {
        self.bundles.write().insert(group.into(), bundle);
    }

    /// Parse and register a properties-style bundle for `group`
    pub fn load_properties(&self, group: impl Into<String>, text: &str) {
        self.insert(group, Bundle::parse_properties(text));
    }

    pub fn contains(&self, group: &str) -> bool {
        self.bundles.read().contains_key(group)
    }
}

impl NameResolver for BundleResolver {
    fn group_name(&self, group: &str, fallback: &str) -> String {
        match self.bundles.read().get(group).and_then(Bundle::group_name) {
            Some(name) => name.to_string(),
            None => {
                trace!(group, "no localized group name");
                fallback.to_string()
            }
        }
    }

    fn counter_name(&self, group: &str, counter: &str, fallback: &str) -> String {
        let bundles = self.bundles.read();
        match bundles.get(group).and_then(|b| b.counter_name(counter)) {
            Some(name) => name.to_string(),
            None => {
                trace!(group, counter, "no localized counter name");
                fallback.to_string()
            }
        }
    }
}
