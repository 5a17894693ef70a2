//! Descriptor and packet-map validation.
//!
//! Shape checks happen once here; everything downstream works with
//! [`Compiled`] and never inspects a slot again.

use serde_json::Value;

use super::descriptor::{Descriptor, Entry, PacketMap, Slot};
use super::selector::{ActionsFn, Selector};
use crate::dispatch::ActionCreators;
use crate::error::PacketError;

/// How a packet maps dispatch to props.
#[derive(Clone)]
pub(crate) enum Actions {
    Function(ActionsFn),
    Creators(ActionCreators),
}

/// A descriptor that passed validation.
pub(crate) struct Compiled<S> {
    pub(crate) selector: Option<Selector<S>>,
    pub(crate) actions: Option<Actions>,
    pub(crate) minimum_selectors_expected: Option<usize>,
}

impl<S> Compiled<S> {
    pub(crate) fn has_mapping(&self) -> bool {
        self.selector.is_some() || self.actions.is_some()
    }
}

/// Check the shape of one descriptor and compile it.
///
/// `name` is how the descriptor is referred to in messages, `caller` the
/// entry point being validated and `article` the phrase preceding
/// "an object" in the not-an-object message.
pub(crate) fn validate_descriptor<S>(
    entry: Entry<S>,
    name: &str,
    caller: &'static str,
    article: &'static str,
) -> Result<Compiled<S>, PacketError> {
    let descriptor = match entry {
        Entry::Descriptor(descriptor) => descriptor,
        Entry::Data(Value::Object(object)) => Descriptor::from_json(object),
        Entry::Data(_) => {
            return Err(PacketError::NotAnObject {
                caller,
                article,
                name: name.to_string(),
            })
        }
    };

    let selector = match descriptor.selector {
        None => None,
        Some(Slot::Selector(selector)) => Some(selector),
        Some(_) => {
            return Err(PacketError::SelectorNotCallable {
                caller,
                name: name.to_string(),
            })
        }
    };

    let actions = match descriptor.actions {
        None => None,
        Some(Slot::Actions(f)) => Some(Actions::Function(f)),
        Some(Slot::Creators(creators)) => Some(Actions::Creators(creators)),
        // A plain object holds no callables, so it binds to nothing.
        Some(Slot::Data(Value::Object(_))) => Some(Actions::Creators(ActionCreators::new())),
        Some(_) => {
            return Err(PacketError::ActionsNotCallable {
                caller,
                name: name.to_string(),
            })
        }
    };

    Ok(Compiled {
        selector,
        actions,
        minimum_selectors_expected: descriptor.minimum_selectors_expected,
    })
}

/// Reject descriptors with neither `selector` nor `actions`.
pub(crate) fn require_mapping<S>(
    compiled: &Compiled<S>,
    name: &str,
    caller: &'static str,
) -> Result<(), PacketError> {
    if compiled.has_mapping() {
        return Ok(());
    }
    Err(PacketError::NoMapping {
        caller,
        name: name.to_string(),
    })
}

/// Check a packet map and return its entries in insertion order.
///
/// A name given twice keeps its first position and its last entry.
pub fn validate_map_and_get_names<S>(
    map: PacketMap<S>,
) -> Result<Vec<(String, Entry<S>)>, PacketError> {
    let entries: Vec<(String, Entry<S>)> = match map {
        PacketMap::Entries(entries) => entries,
        PacketMap::Data(Value::Object(object)) => object
            .into_iter()
            .map(|(name, value)| (name, Entry::Data(value)))
            .collect(),
        PacketMap::Data(Value::Array(_)) => return Err(PacketError::MapIsArray),
        PacketMap::Data(_) => return Err(PacketError::MapNotAnObject),
    };

    let mut unique: Vec<(String, Entry<S>)> = Vec::with_capacity(entries.len());
    for (name, entry) in entries {
        match unique.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = entry,
            None => unique.push((name, entry)),
        }
    }

    if unique.is_empty() {
        return Err(PacketError::MapEmpty);
    }
    Ok(unique)
}
