//! Error types for packet construction and composition.
//!
//! Every failure is a programmer error surfaced synchronously, either while
//! packets are configured or while their props are merged.

use thiserror::Error;

/// Broad classification of a [`PacketError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value had the wrong shape for the contract it was passed to.
    Type,
    /// A packet maker was instantiated with too few context selectors.
    Configuration,
    /// Props could not be merged without losing a property.
    Merge,
}

/// Errors raised by `pack`, `pack_all`, packet makers and `consume`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    /// The descriptor is not an object.
    #[error("{caller} expects {article}an object, but {name} was not.")]
    NotAnObject {
        caller: &'static str,
        article: &'static str,
        name: String,
    },

    /// `selector` is present but not a function.
    #[error("{caller} expects selector to be a function, but {name}.selector was not.")]
    SelectorNotCallable { caller: &'static str, name: String },

    /// `actions` is present but neither a function nor a plain object.
    #[error("{caller} expects actions to be a function or object, but {name}.actions was not.")]
    ActionsNotCallable { caller: &'static str, name: String },

    /// Neither `selector` nor `actions` is present.
    #[error("{caller} expects either selector or actions to be present, but {name} had neither.")]
    NoMapping { caller: &'static str, name: String },

    /// The packet map is not an object.
    #[error("pack_all(packet_map) expects packet_map to be an object.")]
    MapNotAnObject,

    /// The packet map is an array.
    #[error("pack_all(packet_map) expects packet_map to be an object, not an Array.")]
    MapIsArray,

    /// The packet map has no entries.
    #[error("pack_all(packet_map) expected to receive an object with properties, but found no properties.")]
    MapEmpty,

    /// A packet maker received fewer context selectors than its descriptor demands.
    #[error("The packet {packet} expects at least {expected} selectors to be provided.")]
    TooFewSelectors { packet: String, expected: usize },

    /// Two or more packets contributed the same prop name.
    #[error(
        "Props are not unique. Pass in map_packets_to_props to deduplicate them. Duplicate names: {}",
        .names.join(",")
    )]
    DuplicateProps { names: Vec<String> },

    /// `consume` received nothing it could treat as a packet.
    #[error("At least one packet must be passed to consume()")]
    NoPackets,
}

impl PacketError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PacketError::TooFewSelectors { .. } => ErrorKind::Configuration,
            PacketError::DuplicateProps { .. } => ErrorKind::Merge,
            _ => ErrorKind::Type,
        }
    }

    /// Stable identifier for this error, suitable for matching in logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            PacketError::NotAnObject { .. } => "not_an_object",
            PacketError::SelectorNotCallable { .. } => "selector_not_callable",
            PacketError::ActionsNotCallable { .. } => "actions_not_callable",
            PacketError::NoMapping { .. } => "no_mapping",
            PacketError::MapNotAnObject => "map_not_an_object",
            PacketError::MapIsArray => "map_is_array",
            PacketError::MapEmpty => "map_empty",
            PacketError::TooFewSelectors { .. } => "too_few_selectors",
            PacketError::DuplicateProps { .. } => "duplicate_props",
            PacketError::NoPackets => "no_packets",
        }
    }
}
