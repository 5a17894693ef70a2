//! Reducers over shared JSON state.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::lookup::{lookup, path_key};
use crate::dispatch::Action;

/// Reducer transforms state based on actions.
///
/// It must be a pure function: (State, Action) -> State. Returning the
/// input `Arc` signals "unchanged", which lets downstream memoization
/// short-circuit on pointer identity.
pub trait Reducer: Send + Sync {
    fn reduce(&self, state: &Arc<Value>, action: &Action) -> Arc<Value>;
}

impl<F> Reducer for F
where
    F: Fn(&Arc<Value>, &Action) -> Arc<Value> + Send + Sync,
{
    fn reduce(&self, state: &Arc<Value>, action: &Action) -> Arc<Value> {
        self(state, action)
    }
}

/// Derives one path segment from an action. `null` means the action does
/// not concern this reducer.
pub type ActionKey = Arc<dyn Fn(&Action) -> Value + Send + Sync>;

/// A reducer that applies a leaf reducer to the slice at a key path.
pub struct KeyBy<R> {
    key_selectors: Vec<ActionKey>,
    leaf: R,
}

/// Scope `leaf` to the slice named by `key_selectors`.
///
/// A missing key leaves the state untouched. A missing slice reaches the
/// leaf as `null`.
pub fn key_by<R: Reducer>(key_selectors: Vec<ActionKey>, leaf: R) -> KeyBy<R> {
    KeyBy {
        key_selectors,
        leaf,
    }
}

impl<R: Reducer> Reducer for KeyBy<R> {
    fn reduce(&self, state: &Arc<Value>, action: &Action) -> Arc<Value> {
        let keys: Option<Vec<String>> = self
            .key_selectors
            .iter()
            .map(|selector| path_key(&selector(action)))
            .collect();
        let Some(keys) = keys else {
            return Arc::clone(state);
        };

        let old_leaf = Arc::new(lookup(state, &keys).cloned().unwrap_or(Value::Null));
        let new_leaf = self.leaf.reduce(&old_leaf, action);
        if Arc::ptr_eq(&old_leaf, &new_leaf) || old_leaf == new_leaf {
            return Arc::clone(state);
        }

        tracing::trace!(path = ?keys, "keyed slice changed");
        Arc::new(replace_at(Some(&**state), &keys, (*new_leaf).clone()))
    }
}

impl<R> fmt::Debug for KeyBy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBy")
            .field("keys", &self.key_selectors.len())
            .finish_non_exhaustive()
    }
}

/// Copy the objects along `keys` and put `leaf` at the end of the path.
/// Non-object intermediates are replaced by empty objects.
fn replace_at(node: Option<&Value>, keys: &[String], leaf: Value) -> Value {
    let Some((key, rest)) = keys.split_first() else {
        return leaf;
    };
    let mut map: Map<String, Value> = node.and_then(Value::as_object).cloned().unwrap_or_default();
    let child = replace_at(map.get(key), rest, leaf);
    map.insert(key.clone(), child);
    Value::Object(map)
}
