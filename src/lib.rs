//! Reusable state/dispatch bindings for components.
//!
//! A *packet* pairs a state selector with an action set. Describe it once
//! with [`pack`] (or several at a time with [`pack_all`]), instantiate it per
//! component with context selectors, and hand any number of packets to
//! [`consume`] to get the callbacks a binding library's `connect` expects.
//!
//! ```text
//! Descriptor ──pack──→ PacketMaker ──make(context)──→ Packet ─┐
//! Descriptor ──pack──→ PacketMaker ──make(context)──→ Packet ─┼─consume──→ Binding ──connect──→ ...
//!                                                             ┘
//! ```

pub mod config;
pub mod consume;
pub mod dispatch;
pub mod error;
pub mod keyed;
pub mod packet;
pub mod props;

pub use config::{ConnectOptions, OptionsError};
pub use consume::{consume, Binding, Connect, Consume, Packets};
pub use dispatch::{bind_action_creators, Action, ActionCreators, Dispatch};
pub use error::{ErrorKind, PacketError};
pub use packet::{
    pack, pack_all, pack_named, ContextSelector, Descriptor, Packet, PacketMaker, PacketMakers,
    Selector,
};
pub use props::{Callback, Prop, Props};
