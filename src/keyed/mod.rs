//! State slices keyed by context.
//!
//! A keyed reducer files each action's effect under a path derived from the
//! action (`{ "LOAD_USERS": { "group-1": leaf } }`); a keyed selector walks
//! the same path using keys derived from a component's own props. Packets
//! whose context resolves to the same path then share one slice.

mod lookup;
mod reducer;

pub use lookup::{keyed_by, lookup, path_key};
pub use reducer::{key_by, ActionKey, KeyBy, Reducer};
