//! Selection store.
//!
//! Ordered, duplicate-free set of selected identifiers. The mode is fixed
//! at construction from the shape of the seed value: a scalar seed makes a
//! single-select store, a list seed a multi-select one.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::Identifier;

/// Selection cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Zero or one id.
    Single,
    /// Any number of ids.
    Multi,
}

/// Where `add` inserts in multi mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertPolicy {
    /// New ids go last.
    #[default]
    Append,
    /// New ids go first.
    Prepend,
}

impl InsertPolicy {
    /// Parses `append`/`prepend`, defaulting to append.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "prepend" | "first" => Self::Prepend,
            _ => Self::Append,
        }
    }
}

/// Selection as reported to the embedding application.
///
/// Also used as the seed: `Single(None)` / `Single(Some(id))` for a scalar
/// prop, `Multi(ids)` for an array prop. Serializes to `null`, `5`, or
/// `[1,2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    Single(Option<Identifier>),
    Multi(Vec<Identifier>),
}

impl SelectionValue {
    /// Mode implied by the value's shape.
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multi(_) => SelectionMode::Multi,
        }
    }

    /// Flattens the value into an id list.
    #[must_use]
    pub fn into_ids(self) -> Vec<Identifier> {
        match self {
            Self::Single(id) => id.into_iter().collect(),
            Self::Multi(ids) => ids,
        }
    }
}

impl Default for SelectionValue {
    fn default() -> Self {
        Self::Single(None)
    }
}

/// Change callback; receives the new selection after every mutation.
pub type ChangeCallback = Box<dyn Fn(&SelectionValue) + Send + Sync>;

/// In-memory selection set.
pub struct SelectionStore {
    mode: SelectionMode,
    policy: InsertPolicy,
    ids: Vec<Identifier>,
    on_change: Option<ChangeCallback>,
}

impl SelectionStore {
    /// Creates a store from a seed value.
    #[must_use]
    pub fn new(seed: SelectionValue) -> Self {
        let mode = seed.mode();
        let mut store = Self {
            mode,
            policy: InsertPolicy::default(),
            ids: Vec::new(),
            on_change: None,
        };
        store.ids = store.normalize(seed.into_ids());
        store
    }

    /// Sets the multi-mode insert policy.
    #[must_use]
    pub fn with_policy(mut self, policy: InsertPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the change callback.
    #[must_use]
    pub fn with_on_change(mut self, callback: ChangeCallback) -> Self {
        self.on_change = Some(callback);
        self
    }

    /// Replaces the change callback.
    pub fn set_on_change(&mut self, callback: Option<ChangeCallback>) {
        self.on_change = callback;
    }

    /// Adds an id. Returns whether the set changed.
    ///
    /// Multi mode ignores ids already present; single mode replaces the
    /// whole set.
    pub fn add(&mut self, id: Identifier) -> bool {
        match self.mode {
            SelectionMode::Single => {
                self.ids = vec![id];
            }
            SelectionMode::Multi => {
                if self.ids.contains(&id) {
                    return false;
                }
                match self.policy {
                    InsertPolicy::Append => self.ids.push(id),
                    InsertPolicy::Prepend => self.ids.insert(0, id),
                }
            }
        }
        self.notify();
        true
    }

    /// Removes an id; single mode clears regardless of the argument.
    ///
    /// Always reports the resulting selection.
    pub fn remove(&mut self, id: &Identifier) {
        match self.mode {
            SelectionMode::Single => self.ids.clear(),
            SelectionMode::Multi => self.ids.retain(|existing| existing != id),
        }
        self.notify();
    }

    /// Replaces the whole set (external prop change).
    pub fn replace(&mut self, ids: Vec<Identifier>) {
        self.ids = self.normalize(ids);
        self.notify();
    }

    /// Returns the selection in its reported shape.
    #[must_use]
    pub fn value(&self) -> SelectionValue {
        match self.mode {
            SelectionMode::Single => SelectionValue::Single(self.ids.first().cloned()),
            SelectionMode::Multi => SelectionValue::Multi(self.ids.clone()),
        }
    }

    /// Returns the ids in selection order.
    #[must_use]
    pub fn ids(&self) -> &[Identifier] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: &Identifier) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Drops duplicates (first wins) and truncates for single mode.
    fn normalize(&self, ids: Vec<Identifier>) -> Vec<Identifier> {
        let mut unique: Vec<Identifier> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if self.mode == SelectionMode::Single {
            unique.truncate(1);
        }
        unique
    }

    fn notify(&self) {
        let value = self.value();
        debug!("[SELECTION] Changed: {:?}", value);
        if let Some(callback) = &self.on_change {
            callback(&value);
        }
    }
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionStore")
            .field("mode", &self.mode)
            .field("policy", &self.policy)
            .field("ids", &self.ids)
            .field("has_on_change", &self.on_change.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (ChangeCallback, Arc<Mutex<Vec<SelectionValue>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let callback: ChangeCallback = Box::new(move |value| sink.lock().unwrap().push(value.clone()));
        (callback, calls)
    }

    fn ids(values: &[u64]) -> Vec<Identifier> {
        values.iter().copied().map(Identifier::Int).collect()
    }

    #[test]
    fn test_seed_determines_mode() {
        assert_eq!(SelectionStore::new(SelectionValue::Single(None)).mode(), SelectionMode::Single);
        assert_eq!(SelectionStore::new(SelectionValue::Multi(vec![])).mode(), SelectionMode::Multi);
    }

    #[test]
    fn test_seed_is_deduplicated() {
        let store = SelectionStore::new(SelectionValue::Multi(ids(&[1, 2, 1])));
        assert_eq!(store.ids(), ids(&[1, 2]).as_slice());
    }

    #[test]
    fn test_multi_add_appends_and_notifies() {
        let (callback, calls) = recorder();
        let mut store = SelectionStore::new(SelectionValue::Multi(ids(&[1]))).with_on_change(callback);

        assert!(store.add(Identifier::Int(5)));

        assert_eq!(store.ids(), ids(&[1, 5]).as_slice());
        assert_eq!(calls.lock().unwrap().as_slice(), [SelectionValue::Multi(ids(&[1, 5]))]);
    }

    #[test]
    fn test_multi_add_prepend_policy() {
        let mut store = SelectionStore::new(SelectionValue::Multi(ids(&[1, 2])))
            .with_policy(InsertPolicy::Prepend);

        store.add(Identifier::Int(5));
        assert_eq!(store.value(), SelectionValue::Multi(ids(&[5, 1, 2])));
    }

    #[test]
    fn test_multi_add_duplicate_is_silent_noop() {
        let (callback, calls) = recorder();
        let mut store = SelectionStore::new(SelectionValue::Multi(ids(&[1]))).with_on_change(callback);

        assert!(!store.add(Identifier::Int(1)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_single_add_replaces() {
        let (callback, calls) = recorder();
        let mut store =
            SelectionStore::new(SelectionValue::Single(Some(Identifier::Int(3)))).with_on_change(callback);

        store.add(Identifier::Int(9));

        assert_eq!(store.value(), SelectionValue::Single(Some(Identifier::Int(9))));
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            [SelectionValue::Single(Some(Identifier::Int(9)))]
        );
    }

    #[test]
    fn test_single_remove_clears_regardless_of_id() {
        let mut store = SelectionStore::new(SelectionValue::Single(Some(Identifier::Int(3))));
        store.remove(&Identifier::Int(42));
        assert_eq!(store.value(), SelectionValue::Single(None));
    }

    #[test]
    fn test_multi_remove_missing_id_keeps_set() {
        let mut store = SelectionStore::new(SelectionValue::Multi(ids(&[1, 2])));
        store.remove(&Identifier::Int(42));
        assert_eq!(store.ids(), ids(&[1, 2]).as_slice());
    }

    #[test]
    fn test_replace_notifies_once() {
        let (callback, calls) = recorder();
        let mut store = SelectionStore::new(SelectionValue::Multi(ids(&[1, 2]))).with_on_change(callback);

        store.replace(ids(&[3]));

        assert_eq!(store.ids(), ids(&[3]).as_slice());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_replace_in_single_mode_keeps_first() {
        let mut store = SelectionStore::new(SelectionValue::Single(None));
        store.replace(ids(&[4, 5]));
        assert_eq!(store.value(), SelectionValue::Single(Some(Identifier::Int(4))));
    }

    #[test]
    fn test_missing_callback_is_ignored() {
        let mut store = SelectionStore::new(SelectionValue::Multi(vec![]));
        store.add(Identifier::Int(1));
        store.remove(&Identifier::Int(1));
        assert!(store.is_empty());
    }

    #[test]
    fn test_value_serialization() {
        assert_eq!(serde_json::to_string(&SelectionValue::Single(None)).unwrap(), "null");
        assert_eq!(
            serde_json::to_string(&SelectionValue::Single(Some(Identifier::Int(5)))).unwrap(),
            "5"
        );
        assert_eq!(serde_json::to_string(&SelectionValue::Multi(ids(&[1, 2]))).unwrap(), "[1,2]");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u64),
        Remove(u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![(0u64..8).prop_map(Op::Add), (0u64..8).prop_map(Op::Remove)]
    }

    proptest! {
        #[test]
        fn prop_multi_never_duplicates(ops in prop::collection::vec(op_strategy(), 0..64)) {
            let mut store = SelectionStore::new(SelectionValue::Multi(vec![]));
            for op in ops {
                match op {
                    Op::Add(n) => { store.add(Identifier::Int(n)); }
                    Op::Remove(n) => store.remove(&Identifier::Int(n)),
                }
                let mut seen = store.ids().to_vec();
                seen.sort();
                seen.dedup();
                prop_assert_eq!(seen.len(), store.len());
            }
        }

        #[test]
        fn prop_single_add_yields_exactly_that_id(
            ops in prop::collection::vec(op_strategy(), 0..32),
            last in 0u64..8,
        ) {
            let mut store = SelectionStore::new(SelectionValue::Single(None));
            for op in ops {
                match op {
                    Op::Add(n) => { store.add(Identifier::Int(n)); }
                    Op::Remove(n) => store.remove(&Identifier::Int(n)),
                }
                prop_assert!(store.len() <= 1);
            }
            store.add(Identifier::Int(last));
            prop_assert_eq!(store.ids(), &[Identifier::Int(last)][..]);
        }
    }
}
