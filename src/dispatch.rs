//! Dispatch plumbing shared with the external state container.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::props::{Callback, Props};

/// Actions are plain data, e.g. `{"type": "LOAD_USERS", "group": 2}`.
pub type Action = Value;

/// The container's dispatch function: accepts an action and returns it.
#[derive(Clone)]
pub struct Dispatch(Arc<dyn Fn(Action) -> Action + Send + Sync>);

impl Dispatch {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Action) -> Action + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn dispatch(&self, action: Action) -> Action {
        (self.0)(action)
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch(..)")
    }
}

/// Builds an action from call arguments.
#[derive(Clone)]
pub struct ActionCreator(Arc<dyn Fn(&[Value]) -> Action + Send + Sync>);

impl ActionCreator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Action + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn create(&self, args: &[Value]) -> Action {
        (self.0)(args)
    }
}

/// Ordered mapping of prop name to action creator.
#[derive(Clone, Default)]
pub struct ActionCreators {
    creators: Vec<(String, ActionCreator)>,
}

impl ActionCreators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated name replaces the earlier creator.
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Action + Send + Sync + 'static,
    {
        let name = name.into();
        let creator = ActionCreator::new(f);
        match self.creators.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = creator,
            None => self.creators.push((name, creator)),
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.creators.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

impl fmt::Debug for ActionCreators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Wrap every creator so that calling it dispatches the created action.
///
/// Each bound callback returns whatever `dispatch` returns.
pub fn bind_action_creators(creators: &ActionCreators, dispatch: &Dispatch) -> Props {
    creators
        .creators
        .iter()
        .map(|(name, creator)| {
            let creator = creator.clone();
            let dispatch = dispatch.clone();
            let bound = Callback::new(move |args| dispatch.dispatch(creator.create(args)));
            (name.clone(), bound)
        })
        .collect()
}
