//! Packet construction.
//!
//! ```text
//! Descriptor ──validate──→ PacketMaker ──make(context)──→ Packet
//!                                                          │
//!                          map_state_to_props (factory) ←──┤
//!                          map_dispatch_to_props        ←──┘
//! ```
//!
//! - **Descriptor**: declares a state selector and/or an action set
//! - **PacketMaker**: a validated descriptor, reusable across components
//! - **Packet**: the mapping pair for one context, ready for `consume`

mod context;
mod descriptor;
mod maker;
mod mapper;
mod memo;
mod selector;
mod validate;

pub use context::ContextSelector;
pub use descriptor::{Descriptor, Entry, PacketMap, Slot};
pub use maker::{pack, pack_all, pack_named, PacketMaker, PacketMakers};
pub use mapper::{DispatchMapper, MapDispatch, MapState, MapStateFactory, Packet, StateMapper};
pub use selector::{ActionsFn, MapStateFn, Selected, Selector};
pub use validate::validate_map_and_get_names;
