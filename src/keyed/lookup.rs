use serde_json::Value;

use crate::packet::ContextSelector;
use crate::props::Props;

/// Render a key value as an object key. `null` means "no key".
///
/// Strings are used as-is; numbers and booleans use their JSON text.
/// Arrays and objects cannot name a slice.
pub fn path_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Walk `keys` down nested objects.
///
/// `None` as soon as a key is missing or an intermediate is not an object.
pub fn lookup<'a, K: AsRef<str>>(
    state: &'a Value,
    keys: impl IntoIterator<Item = K>,
) -> Option<&'a Value> {
    keys.into_iter()
        .try_fold(state, |node, key| node.as_object()?.get(key.as_ref()))
}

/// Wrap `leaf_selector` so it receives the slice under the key path
/// derived from own props.
///
/// The leaf sees `None` when any key is null or the path does not exist.
pub fn keyed_by<R, F>(
    key_selectors: Vec<ContextSelector>,
    leaf_selector: F,
) -> impl Fn(&Value, &Props) -> R + Send + Sync
where
    F: Fn(Option<&Value>, &Props) -> R + Send + Sync,
{
    move |state: &Value, props: &Props| -> R {
        let keys: Option<Vec<String>> = key_selectors
            .iter()
            .map(|selector| path_key(&selector.evaluate(props)))
            .collect();
        let slice = keys.and_then(|keys| lookup(state, keys));
        leaf_selector(slice, props)
    }
}
