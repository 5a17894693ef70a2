//! Multi-packet path.
//!
//! Each half of the mapping collects per-packet results positionally under
//! [`PACKETS_KEY`]; the merge step pairs them up again by index.

use std::sync::Arc;

use super::binding::{MapPacketsToProps, MergeFn, MergeProps};
use crate::error::PacketError;
use crate::packet::{DispatchMapper, MapDispatch, MapStateFactory, Packet, StateMapper};
use crate::props::{Prop, Props};

/// Key of the positional aggregate produced by combined mappers.
pub const PACKETS_KEY: &str = "packets";

/// Combine the packets' state halves. `None` when no packet maps state.
pub fn make_map_state_to_props<S: Send + Sync + 'static>(
    packets: &[Packet<S>],
) -> Option<MapStateFactory<S>> {
    let factories: Vec<Option<MapStateFactory<S>>> = packets
        .iter()
        .map(|packet| packet.map_state_to_props.clone())
        .collect();
    if factories.iter().all(Option::is_none) {
        return None;
    }
    let depends_on_props = factories.iter().flatten().any(|f| f.depends_on_props());

    Some(MapStateFactory::new(depends_on_props, move |first_state, first_props| {
        let mut mappers: Vec<Option<StateMapper<S>>> = factories
            .iter()
            .map(|factory| factory.as_ref().map(|f| f.init(first_state, first_props)))
            .collect();
        let combined: StateMapper<S> = Box::new(move |state: &Arc<S>, props: &Arc<Props>| {
            let slices = mappers
                .iter_mut()
                .map(|mapper| mapper.as_mut().map(|m| m.map_state(state, props)))
                .collect();
            Props::new().with(PACKETS_KEY, Prop::Packets(slices))
        });
        combined
    }))
}

/// Combine the packets' dispatch halves. `None` when no packet maps dispatch.
pub fn make_map_dispatch_to_props<S>(packets: &[Packet<S>]) -> Option<MapDispatch> {
    let mappers: Vec<Option<MapDispatch>> = packets
        .iter()
        .map(|packet| packet.map_dispatch_to_props.clone())
        .collect();
    if mappers.iter().all(Option::is_none) {
        return None;
    }
    let depends_on_props = mappers.iter().flatten().any(MapDispatch::depends_on_props);

    Some(MapDispatch::Function(DispatchMapper::new(
        depends_on_props,
        move |dispatch, props| {
            let slices = mappers
                .iter()
                .map(|mapper| mapper.as_ref().map(|m| m.map_dispatch(dispatch, props)))
                .collect();
            Props::new().with(PACKETS_KEY, Prop::Packets(slices))
        },
    )))
}

/// Build the merge callback for `packet_count` packets.
///
/// Per packet, dispatch props win over state props. Without a custom
/// `map_packets_to_props` every prop name must be unique across packets.
/// Without a custom `merge_props` own props win over packet props.
pub fn make_merge_props(
    packet_count: usize,
    map_packets_to_props: Option<MapPacketsToProps>,
    merge_props: Option<MergeFn>,
) -> MergeProps {
    Arc::new(
        move |mut state_props: Props,
              mut dispatch_props: Props,
              own_props: &Props|
              -> Result<Props, PacketError> {
            let states = take_packets(&mut state_props, packet_count);
            let dispatches = take_packets(&mut dispatch_props, packet_count);
            let per_packet: Vec<Props> = states
                .into_iter()
                .zip(dispatches)
                .map(|(state, dispatch)| {
                    state
                        .unwrap_or_default()
                        .merged(dispatch.unwrap_or_default())
                })
                .collect();

            let packet_props = match &map_packets_to_props {
                Some(map) => map(&per_packet),
                None => spread_unique(per_packet)?,
            };
            Ok(match &merge_props {
                Some(merge) => merge(packet_props, own_props),
                None => packet_props.merged(own_props.clone()),
            })
        },
    )
}

/// Missing aggregates (no packet mapped that half) read as all-absent.
fn take_packets(props: &mut Props, count: usize) -> Vec<Option<Props>> {
    let mut slices = match props.remove(PACKETS_KEY) {
        Some(Prop::Packets(slices)) => slices,
        _ => Vec::new(),
    };
    slices.resize(count, None);
    slices
}

/// Merge every bag into one, failing if any prop name occurs more than once.
///
/// The error lists each repeated occurrence except the last, in order.
pub fn spread_unique(values: Vec<Props>) -> Result<Props, PacketError> {
    let keys: Vec<&str> = values.iter().flat_map(Props::keys).collect();
    let duplicates: Vec<String> = keys
        .iter()
        .enumerate()
        .filter(|(i, key)| keys.iter().rposition(|other| other == *key) != Some(*i))
        .map(|(_, key)| key.to_string())
        .collect();
    if !duplicates.is_empty() {
        return Err(PacketError::DuplicateProps { names: duplicates });
    }
    Ok(values.into_iter().fold(Props::new(), Props::merged))
}
