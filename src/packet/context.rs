//! Context selectors: derive contextual keys (group id, project id, ...)
//! from a component's own props.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::props::Props;

/// Derives one context value from own props.
#[derive(Clone)]
pub enum ContextSelector {
    /// Computed from own props on every evaluation.
    Select(Arc<dyn Fn(&Props) -> Value + Send + Sync>),
    /// A literal treated as a selector that always returns it.
    Constant(Value),
}

impl ContextSelector {
    pub fn select<F>(f: F) -> Self
    where
        F: Fn(&Props) -> Value + Send + Sync + 'static,
    {
        ContextSelector::Select(Arc::new(f))
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        ContextSelector::Constant(value.into())
    }

    /// Read the own prop `name`, or `null` when it is absent or not data.
    pub fn prop(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::select(move |props| props.value(&name).cloned().unwrap_or(Value::Null))
    }

    pub fn evaluate(&self, props: &Props) -> Value {
        match self {
            ContextSelector::Select(f) => f(props),
            ContextSelector::Constant(value) => value.clone(),
        }
    }
}

impl From<Value> for ContextSelector {
    fn from(value: Value) -> Self {
        ContextSelector::Constant(value)
    }
}

impl fmt::Debug for ContextSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextSelector::Select(_) => f.write_str("Select(..)"),
            ContextSelector::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
        }
    }
}

/// Evaluates an instantiation's context selectors in order.
#[derive(Clone)]
pub(crate) struct ContextExecutor {
    selectors: Arc<[ContextSelector]>,
}

impl ContextExecutor {
    /// `None` when no selectors were supplied: the packet has no context.
    pub(crate) fn new(selectors: Vec<ContextSelector>) -> Option<Self> {
        if selectors.is_empty() {
            return None;
        }
        Some(Self {
            selectors: selectors.into(),
        })
    }

    /// The context vector for `props`.
    pub(crate) fn execute(&self, props: &Props) -> Vec<Value> {
        self.selectors.iter().map(|s| s.evaluate(props)).collect()
    }
}
