//! Consumption: compose packets into the callbacks a binding library needs.
//!
//! ```text
//! [Packet, Packet, ...] ──consume──→ Binding { map_state, map_dispatch, merge, options }
//!                                        │
//!                                        └──connect──→ binding library
//! ```
//!
//! A single packet passes its mappers through untouched. Several packets are
//! combined positionally and merged, with duplicate prop names rejected
//! unless a custom `map_packets_to_props` resolves them.

mod binding;
mod multi;
mod single;

use std::sync::Arc;

pub use binding::{Binding, Connect, MapPacketsToProps, MergeFn, MergeProps};
pub use multi::{
    make_map_dispatch_to_props, make_map_state_to_props, make_merge_props, spread_unique,
    PACKETS_KEY,
};
pub use single::make_merge_props_one_packet;

use crate::config::ConnectOptions;
use crate::error::PacketError;
use crate::packet::Packet;
use crate::props::Props;

/// A lone packet or an ordered sequence of packets.
pub enum Packets<S> {
    One(Packet<S>),
    Many(Vec<Packet<S>>),
}

impl<S> From<Packet<S>> for Packets<S> {
    fn from(packet: Packet<S>) -> Self {
        Packets::One(packet)
    }
}

impl<S> From<Vec<Packet<S>>> for Packets<S> {
    fn from(packets: Vec<Packet<S>>) -> Self {
        Packets::Many(packets)
    }
}

impl<S, const N: usize> From<[Packet<S>; N]> for Packets<S> {
    fn from(packets: [Packet<S>; N]) -> Self {
        Packets::Many(packets.into())
    }
}

/// Builder for a [`Binding`].
pub struct Consume<S> {
    packets: Packets<S>,
    map_packets_to_props: Option<MapPacketsToProps>,
    merge_props: Option<MergeFn>,
    options: Option<ConnectOptions>,
}

impl<S: Send + Sync + 'static> Consume<S> {
    pub fn new(packets: impl Into<Packets<S>>) -> Self {
        Self {
            packets: packets.into(),
            map_packets_to_props: None,
            merge_props: None,
            options: None,
        }
    }

    /// Replace the default combination of per-packet props. A custom
    /// function is responsible for resolving duplicate names itself.
    pub fn with_map_packets_to_props<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Props]) -> Props + Send + Sync + 'static,
    {
        self.map_packets_to_props = Some(Arc::new(f));
        self
    }

    /// Replace the default `{...packet_props, ...own_props}` merge.
    pub fn with_merge_props<F>(mut self, f: F) -> Self
    where
        F: Fn(Props, &Props) -> Props + Send + Sync + 'static,
    {
        self.merge_props = Some(Arc::new(f));
        self
    }

    /// Options passed through to the binding library untouched.
    pub fn with_options(mut self, options: ConnectOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Compose the binding callbacks.
    ///
    /// # Errors
    /// Returns [`PacketError::NoPackets`] when the sequence is empty, or when
    /// a lone packet has neither mapping half.
    pub fn build(self) -> Result<Binding<S>, PacketError> {
        let mut packets = match self.packets {
            Packets::One(packet) if packet.has_mapping() => vec![packet],
            Packets::One(_) => return Err(PacketError::NoPackets),
            Packets::Many(packets) => packets,
        };

        match packets.len() {
            0 => Err(PacketError::NoPackets),
            1 => {
                let packet = packets.remove(0);
                tracing::debug!(
                    state = packet.map_state_to_props.is_some(),
                    dispatch = packet.map_dispatch_to_props.is_some(),
                    "consuming single packet"
                );
                Ok(Binding {
                    map_state_to_props: packet.map_state_to_props,
                    map_dispatch_to_props: packet.map_dispatch_to_props,
                    merge_props: make_merge_props_one_packet(
                        self.map_packets_to_props,
                        self.merge_props,
                    ),
                    options: self.options,
                })
            }
            count => {
                tracing::debug!(
                    packets = count,
                    custom_map = self.map_packets_to_props.is_some(),
                    "consuming multiple packets"
                );
                Ok(Binding {
                    map_state_to_props: make_map_state_to_props(&packets),
                    map_dispatch_to_props: make_map_dispatch_to_props(&packets),
                    merge_props: Some(make_merge_props(
                        count,
                        self.map_packets_to_props,
                        self.merge_props,
                    )),
                    options: self.options,
                })
            }
        }
    }
}

/// Compose packets with the default combination and merge.
pub fn consume<S: Send + Sync + 'static>(
    packets: impl Into<Packets<S>>,
) -> Result<Binding<S>, PacketError> {
    Consume::new(packets).build()
}
