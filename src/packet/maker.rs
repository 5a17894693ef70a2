//! Packet makers: compiled descriptors that produce packets per context.

use std::fmt;
use std::sync::Arc;

use super::context::{ContextExecutor, ContextSelector};
use super::descriptor::{Entry, PacketMap};
use super::mapper::{DispatchMapper, MapDispatch, MapStateFactory, Packet, StateMapper};
use super::memo::FirstCallMemo;
use super::selector::{MapStateFn, Selected, Selector};
use super::validate::{
    require_mapping, validate_descriptor, validate_map_and_get_names, Actions, Compiled,
};
use crate::dispatch::bind_action_creators;
use crate::error::PacketError;
use crate::props::Props;

/// A reusable packet declaration. Instantiate it once per context, typically
/// once per mounted component.
pub struct PacketMaker<S> {
    compiled: Arc<Compiled<S>>,
    name: Option<String>,
}

impl<S: Send + Sync + 'static> PacketMaker<S> {
    fn new(compiled: Compiled<S>, name: Option<String>) -> Self {
        Self {
            compiled: Arc::new(compiled),
            name,
        }
    }

    /// Name the maker for diagnostics.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `PacketMaker(<name>)` for named makers, `PacketMaker` otherwise.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("PacketMaker({name})"),
            None => "PacketMaker".to_string(),
        }
    }

    /// Instantiate a packet for the given context selectors.
    ///
    /// # Errors
    /// Returns [`PacketError::TooFewSelectors`] when the descriptor demands
    /// more context selectors than were supplied.
    pub fn make<I>(&self, context: I) -> Result<Packet<S>, PacketError>
    where
        I: IntoIterator,
        I::Item: Into<ContextSelector>,
    {
        let selectors: Vec<ContextSelector> = context.into_iter().map(Into::into).collect();
        if let Some(expected) = self.compiled.minimum_selectors_expected {
            if selectors.len() < expected {
                return Err(PacketError::TooFewSelectors {
                    packet: self.name.clone().unwrap_or_else(|| "(anonymous)".to_string()),
                    expected,
                });
            }
        }

        let context = ContextExecutor::new(selectors);
        Ok(Packet {
            map_state_to_props: self
                .compiled
                .selector
                .clone()
                .map(|selector| state_factory(selector, context.clone())),
            map_dispatch_to_props: self
                .compiled
                .actions
                .clone()
                .map(|actions| dispatch_mapper(actions, context.clone())),
        })
    }

    /// Instantiate a packet that needs no context.
    pub fn without_context(&self) -> Result<Packet<S>, PacketError> {
        self.make(Vec::<ContextSelector>::new())
    }
}

impl<S> Clone for PacketMaker<S> {
    fn clone(&self) -> Self {
        Self {
            compiled: self.compiled.clone(),
            name: self.name.clone(),
        }
    }
}

impl<S> fmt::Debug for PacketMaker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketMaker")
            .field("name", &self.name)
            .field("selector", &self.compiled.selector.is_some())
            .field("actions", &self.compiled.actions.is_some())
            .field(
                "minimum_selectors_expected",
                &self.compiled.minimum_selectors_expected,
            )
            .finish()
    }
}

fn state_factory<S: Send + Sync + 'static>(
    selector: Selector<S>,
    context: Option<ContextExecutor>,
) -> MapStateFactory<S> {
    let depends_on_props = context.is_some();
    MapStateFactory::new(depends_on_props, move |first_state, first_props| {
        let first_context = context
            .as_ref()
            .map(|c| c.execute(first_props))
            .unwrap_or_default();

        let probe = selector.select(first_state, &first_context);
        tracing::trace!(
            factory = matches!(probe, Selected::Factory(_)),
            "probed packet selector"
        );

        let mapper: StateMapper<S> = match probe {
            Selected::Props(first_value) => {
                let selector = selector.clone();
                // A selector that later hands back a mapper has it applied in place.
                let select: MapStateFn<S> =
                    Arc::new(move |state: &S, context: &[serde_json::Value]| {
                        match selector.select(state, context) {
                            Selected::Props(props) => props,
                            Selected::Factory(mapper) => mapper(state, context),
                        }
                    });
                Box::new(FirstCallMemo::new(
                    select,
                    context.clone(),
                    Some((first_state.clone(), first_value)),
                    first_props.clone(),
                    first_context,
                ))
            }
            Selected::Factory(mapper) if context.is_some() => Box::new(FirstCallMemo::new(
                mapper,
                context.clone(),
                None,
                first_props.clone(),
                first_context,
            )),
            Selected::Factory(mapper) => {
                Box::new(move |state: &Arc<S>, _props: &Arc<Props>| mapper(&**state, &[]))
            }
        };
        mapper
    })
}

fn dispatch_mapper(actions: Actions, context: Option<ContextExecutor>) -> MapDispatch {
    let mapper = match (actions, context) {
        (Actions::Function(actions), Some(context)) => {
            DispatchMapper::new(true, move |dispatch, props| {
                actions.call(dispatch, &context.execute(props))
            })
        }
        (Actions::Function(actions), None) => {
            DispatchMapper::new(false, move |dispatch, _props| actions.call(dispatch, &[]))
        }
        (Actions::Creators(creators), _) => DispatchMapper::new(false, move |dispatch, _props| {
            bind_action_creators(&creators, dispatch)
        }),
    };
    MapDispatch::Function(mapper)
}

/// Compile a single descriptor into an anonymous packet maker. Use
/// [`pack_named`] (or [`PacketMaker::with_name`]) to have diagnostics name it.
///
/// # Errors
/// Fails when the descriptor is not an object, when `selector` or `actions`
/// has the wrong shape, or when neither is present.
pub fn pack<S: Send + Sync + 'static>(
    descriptor: impl Into<Entry<S>>,
) -> Result<PacketMaker<S>, PacketError> {
    const CALLER: &str = "pack(packet_descriptor)";
    const NAME: &str = "packet_descriptor";

    let compiled = validate_descriptor(descriptor.into(), NAME, CALLER, "")?;
    require_mapping(&compiled, NAME, CALLER)?;
    tracing::debug!(
        selector = compiled.selector.is_some(),
        actions = compiled.actions.is_some(),
        "packed descriptor"
    );
    Ok(PacketMaker::new(compiled, None))
}

/// Compile a single descriptor into a packet maker called `name`.
///
/// # Errors
/// Fails exactly when [`pack`] does.
pub fn pack_named<S: Send + Sync + 'static>(
    descriptor: impl Into<Entry<S>>,
    name: impl Into<String>,
) -> Result<PacketMaker<S>, PacketError> {
    Ok(pack(descriptor)?.with_name(name))
}

/// Named packet makers in the order their descriptors were given.
pub struct PacketMakers<S> {
    makers: Vec<(String, PacketMaker<S>)>,
}

impl<S> PacketMakers<S> {
    pub fn get(&self, name: &str) -> Option<&PacketMaker<S>> {
        self.makers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, maker)| maker)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.makers.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PacketMaker<S>)> {
        self.makers.iter().map(|(name, maker)| (name.as_str(), maker))
    }

    pub fn len(&self) -> usize {
        self.makers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.makers.is_empty()
    }
}

impl<S> fmt::Debug for PacketMakers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.makers.iter().map(|(name, maker)| (name, maker)))
            .finish()
    }
}

/// Compile every entry of a packet map into a named packet maker.
///
/// Unlike [`pack`], an entry with neither `selector` nor `actions` is
/// accepted; it is logged at warn level.
///
/// # Errors
/// Fails when the map is not a non-empty object, or when any entry fails
/// descriptor validation.
pub fn pack_all<S: Send + Sync + 'static>(
    map: impl Into<PacketMap<S>>,
) -> Result<PacketMakers<S>, PacketError> {
    const CALLER: &str = "pack_all(packet_map)";

    let entries = validate_map_and_get_names(map.into())?;
    let mut makers = Vec::with_capacity(entries.len());
    for (name, entry) in entries {
        let display = format!("packet_map['{name}']");
        let compiled = validate_descriptor(entry, &display, CALLER, "each property to be ")?;
        if !compiled.has_mapping() {
            tracing::warn!(packet = %name, "descriptor has neither selector nor actions");
        }
        makers.push((name.clone(), PacketMaker::new(compiled, Some(name))));
    }
    tracing::debug!(count = makers.len(), "packed packet map");
    Ok(PacketMakers { makers })
}
