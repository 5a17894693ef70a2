//! The two mapping halves of a packet, in the shapes a binding library
//! consumes them.

use std::fmt;
use std::sync::Arc;

use crate::dispatch::{bind_action_creators, ActionCreators, Dispatch};
use crate::props::Props;

/// A per-component state mapper.
///
/// Mappers may keep memoization state between calls; the binding library
/// calls a given mapper serially, never re-entrantly.
pub trait MapState<S>: Send {
    fn map_state(&mut self, state: &Arc<S>, props: &Arc<Props>) -> Props;
}

impl<S, F> MapState<S> for F
where
    F: FnMut(&Arc<S>, &Arc<Props>) -> Props + Send,
{
    fn map_state(&mut self, state: &Arc<S>, props: &Arc<Props>) -> Props {
        self(state, props)
    }
}

pub type StateMapper<S> = Box<dyn MapState<S>>;

/// Factory form of a state mapping: called once with the first state and
/// props a component sees, it returns the mapper used from then on.
pub struct MapStateFactory<S> {
    init: Arc<dyn Fn(&Arc<S>, &Arc<Props>) -> StateMapper<S> + Send + Sync>,
    depends_on_props: bool,
}

impl<S> MapStateFactory<S> {
    /// `depends_on_props` tells the binding library whether the mapper must
    /// be re-run when own props change, not only when state changes.
    pub fn new<F>(depends_on_props: bool, init: F) -> Self
    where
        F: Fn(&Arc<S>, &Arc<Props>) -> StateMapper<S> + Send + Sync + 'static,
    {
        Self {
            init: Arc::new(init),
            depends_on_props,
        }
    }

    pub fn init(&self, state: &Arc<S>, props: &Arc<Props>) -> StateMapper<S> {
        (self.init)(state, props)
    }

    pub fn depends_on_props(&self) -> bool {
        self.depends_on_props
    }

    /// Whether both handles share the same factory function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.init, &other.init)
    }
}

impl<S> Clone for MapStateFactory<S> {
    fn clone(&self) -> Self {
        Self {
            init: self.init.clone(),
            depends_on_props: self.depends_on_props,
        }
    }
}

impl<S> fmt::Debug for MapStateFactory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapStateFactory")
            .field("depends_on_props", &self.depends_on_props)
            .finish_non_exhaustive()
    }
}

/// `(dispatch, props) -> props`.
#[derive(Clone)]
pub struct DispatchMapper {
    map: Arc<dyn Fn(&Dispatch, &Arc<Props>) -> Props + Send + Sync>,
    depends_on_props: bool,
}

impl DispatchMapper {
    pub fn new<F>(depends_on_props: bool, map: F) -> Self
    where
        F: Fn(&Dispatch, &Arc<Props>) -> Props + Send + Sync + 'static,
    {
        Self {
            map: Arc::new(map),
            depends_on_props,
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }
}

/// Dispatch half of a packet: a mapping function or a plain mapping of
/// action creators the binding library binds itself.
#[derive(Clone)]
pub enum MapDispatch {
    Function(DispatchMapper),
    Creators(ActionCreators),
}

impl MapDispatch {
    pub fn map_dispatch(&self, dispatch: &Dispatch, props: &Arc<Props>) -> Props {
        match self {
            MapDispatch::Function(mapper) => (mapper.map)(dispatch, props),
            MapDispatch::Creators(creators) => bind_action_creators(creators, dispatch),
        }
    }

    pub fn depends_on_props(&self) -> bool {
        match self {
            MapDispatch::Function(mapper) => mapper.depends_on_props,
            MapDispatch::Creators(_) => false,
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MapDispatch::Function(a), MapDispatch::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for MapDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapDispatch::Function(mapper) => f
                .debug_struct("Function")
                .field("depends_on_props", &mapper.depends_on_props)
                .finish_non_exhaustive(),
            MapDispatch::Creators(creators) => f.debug_tuple("Creators").field(creators).finish(),
        }
    }
}

/// One instantiation of a packet maker.
pub struct Packet<S> {
    pub map_state_to_props: Option<MapStateFactory<S>>,
    pub map_dispatch_to_props: Option<MapDispatch>,
}

impl<S> Packet<S> {
    pub fn has_mapping(&self) -> bool {
        self.map_state_to_props.is_some() || self.map_dispatch_to_props.is_some()
    }
}

impl<S> Clone for Packet<S> {
    fn clone(&self) -> Self {
        Self {
            map_state_to_props: self.map_state_to_props.clone(),
            map_dispatch_to_props: self.map_dispatch_to_props.clone(),
        }
    }
}

impl<S> fmt::Debug for Packet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("map_state_to_props", &self.map_state_to_props)
            .field("map_dispatch_to_props", &self.map_dispatch_to_props)
            .finish()
    }
}
