//! Single-packet path: the packet's own mappers go straight to the binding
//! library, only the merge step is composed.

use std::sync::Arc;

use super::binding::{MapPacketsToProps, MergeFn, MergeProps};
use crate::error::PacketError;
use crate::props::Props;

/// Build the merge callback for a lone packet.
///
/// Returns `None` when neither function is given, leaving the binding
/// library's default merge in place. Own props win over packet props.
pub fn make_merge_props_one_packet(
    map_packets_to_props: Option<MapPacketsToProps>,
    merge_props: Option<MergeFn>,
) -> Option<MergeProps> {
    let merge: MergeProps = match (map_packets_to_props, merge_props) {
        (None, None) => return None,
        (None, Some(merge)) => Arc::new(
            move |state: Props, dispatch: Props, own: &Props| -> Result<Props, PacketError> {
                Ok(merge(state.merged(dispatch), own))
            },
        ),
        (Some(map), None) => Arc::new(
            move |state: Props, dispatch: Props, own: &Props| -> Result<Props, PacketError> {
                Ok(map(&[state.merged(dispatch)]).merged(own.clone()))
            },
        ),
        (Some(map), Some(merge)) => Arc::new(
            move |state: Props, dispatch: Props, own: &Props| -> Result<Props, PacketError> {
                Ok(merge(map(&[state.merged(dispatch)]), own))
            },
        ),
    };
    Some(merge)
}
