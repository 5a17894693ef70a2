//! The contract with the external binding library.

use std::fmt;
use std::sync::Arc;

use crate::config::ConnectOptions;
use crate::error::PacketError;
use crate::packet::{MapDispatch, MapStateFactory};
use crate::props::Props;

/// Combines the merged props of every packet, in packet order, into one bag.
pub type MapPacketsToProps = Arc<dyn Fn(&[Props]) -> Props + Send + Sync>;

/// Final merge of packet props with the component's own props.
pub type MergeFn = Arc<dyn Fn(Props, &Props) -> Props + Send + Sync>;

/// `(state props, dispatch props, own props) -> props`, as the binding
/// library calls it.
pub type MergeProps = Arc<dyn Fn(Props, Props, &Props) -> Result<Props, PacketError> + Send + Sync>;

/// An external binding library's `connect`.
///
/// `None` arguments mean "no mapping"; the library applies its own defaults.
pub trait Connect<S> {
    /// What the library hands back, typically a component wrapper.
    type Output;

    fn connect(
        &self,
        map_state_to_props: Option<MapStateFactory<S>>,
        map_dispatch_to_props: Option<MapDispatch>,
        merge_props: Option<MergeProps>,
        options: Option<ConnectOptions>,
    ) -> Self::Output;
}

/// The callbacks `consume` prepared for one component.
pub struct Binding<S> {
    pub map_state_to_props: Option<MapStateFactory<S>>,
    pub map_dispatch_to_props: Option<MapDispatch>,
    pub merge_props: Option<MergeProps>,
    pub options: Option<ConnectOptions>,
}

impl<S> Binding<S> {
    /// Hand the callbacks to the binding library.
    pub fn connect<C: Connect<S>>(self, connector: &C) -> C::Output {
        connector.connect(
            self.map_state_to_props,
            self.map_dispatch_to_props,
            self.merge_props,
            self.options,
        )
    }
}

impl<S> fmt::Debug for Binding<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("map_state_to_props", &self.map_state_to_props)
            .field("map_dispatch_to_props", &self.map_dispatch_to_props)
            .field("merge_props", &self.merge_props.is_some())
            .field("options", &self.options)
            .finish()
    }
}
