//! Packet descriptors as callers hand them over.
//!
//! The input side is deliberately loose: a descriptor slot may hold a
//! callable of the wrong kind or plain data, and a packet map entry may not
//! be a descriptor at all. `validate` turns these into the compiled form the
//! packet factory works with.

use serde_json::{Map, Value};

use super::selector::{ActionsFn, Selector};
use crate::dispatch::{ActionCreators, Dispatch};
use crate::props::Props;

/// Content of a `selector` or `actions` field.
pub enum Slot<S> {
    Selector(Selector<S>),
    Actions(ActionsFn),
    Creators(ActionCreators),
    Data(Value),
}

/// One packet declaration.
pub struct Descriptor<S> {
    pub selector: Option<Slot<S>>,
    pub actions: Option<Slot<S>>,
    pub minimum_selectors_expected: Option<usize>,
}

impl<S> Default for Descriptor<S> {
    fn default() -> Self {
        Self {
            selector: None,
            actions: None,
            minimum_selectors_expected: None,
        }
    }
}

impl<S: 'static> Descriptor<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `selector: (state, ...context) -> props`.
    pub fn selector<F>(mut self, f: F) -> Self
    where
        F: Fn(&S, &[Value]) -> Props + Send + Sync + 'static,
    {
        self.selector = Some(Slot::Selector(Selector::new(f)));
        self
    }

    /// `selector: (state, ...context) -> mapper`, one mapper per component.
    pub fn selector_factory<F, M>(mut self, f: F) -> Self
    where
        F: Fn(&S, &[Value]) -> M + Send + Sync + 'static,
        M: Fn(&S, &[Value]) -> Props + Send + Sync + 'static,
    {
        self.selector = Some(Slot::Selector(Selector::factory(f)));
        self
    }

    /// `actions: (dispatch, ...context) -> props`.
    pub fn actions<F>(mut self, f: F) -> Self
    where
        F: Fn(&Dispatch, &[Value]) -> Props + Send + Sync + 'static,
    {
        self.actions = Some(Slot::Actions(ActionsFn::new(f)));
        self
    }

    /// `actions: { name: creator, ... }`.
    pub fn action_creators(mut self, creators: ActionCreators) -> Self {
        self.actions = Some(Slot::Creators(creators));
        self
    }

    pub fn minimum_selectors_expected(mut self, count: usize) -> Self {
        self.minimum_selectors_expected = Some(count);
        self
    }

    /// Set the raw `selector` slot.
    pub fn with_selector_slot(mut self, slot: Slot<S>) -> Self {
        self.selector = Some(slot);
        self
    }

    /// Set the raw `actions` slot.
    pub fn with_actions_slot(mut self, slot: Slot<S>) -> Self {
        self.actions = Some(slot);
        self
    }
}

impl<S> Descriptor<S> {
    /// Read a JSON object as a descriptor. Its fields can only hold data.
    pub(crate) fn from_json(object: Map<String, Value>) -> Self {
        let slot = |value: Option<&Value>| match value {
            None | Some(Value::Null) => None,
            Some(value) => Some(Slot::Data(value.clone())),
        };
        Self {
            selector: slot(object.get("selector")),
            actions: slot(object.get("actions")),
            minimum_selectors_expected: object
                .get("minimumSelectorsExpected")
                .and_then(minimum_selectors),
        }
    }
}

/// Selector counts are whole, so a fractional minimum rounds up.
/// Zero, negative and non-numeric minimums never reject anything.
fn minimum_selectors(value: &Value) -> Option<usize> {
    let minimum = value.as_f64()?.ceil();
    if minimum < 1.0 {
        return None;
    }
    // `as` saturates, so huge minimums still reject every input.
    Some(usize::try_from(minimum as u64).unwrap_or(usize::MAX))
}

/// One value passed to `pack`, or one property of a packet map.
pub enum Entry<S> {
    Descriptor(Descriptor<S>),
    Data(Value),
}

impl<S> From<Descriptor<S>> for Entry<S> {
    fn from(descriptor: Descriptor<S>) -> Self {
        Entry::Descriptor(descriptor)
    }
}

impl<S> From<Value> for Entry<S> {
    fn from(value: Value) -> Self {
        Entry::Data(value)
    }
}

/// The argument of `pack_all`: named entries in insertion order.
pub enum PacketMap<S> {
    Entries(Vec<(String, Entry<S>)>),
    Data(Value),
}

impl<S, K, E> From<Vec<(K, E)>> for PacketMap<S>
where
    K: Into<String>,
    E: Into<Entry<S>>,
{
    fn from(entries: Vec<(K, E)>) -> Self {
        PacketMap::Entries(
            entries
                .into_iter()
                .map(|(name, entry)| (name.into(), entry.into()))
                .collect(),
        )
    }
}

impl<S> From<Value> for PacketMap<S> {
    fn from(value: Value) -> Self {
        PacketMap::Data(value)
    }
}
