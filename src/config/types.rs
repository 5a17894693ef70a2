use serde::{Deserialize, Serialize};

/// Binding-library options carried by a [`Binding`](crate::consume::Binding).
///
/// `consume` never interprets these; they reach `Connect::connect` as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    /// Skip recomputation when state and own props are unchanged (default: true).
    pub pure: bool,
    /// Forward refs to the wrapped component (default: false).
    pub forward_ref: bool,
    /// Read the store from a non-default context key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_key: Option<String>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            pure: true,
            forward_ref: false,
            store_key: None,
        }
    }
}
