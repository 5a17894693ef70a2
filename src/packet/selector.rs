//! Callables a descriptor is built from.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::dispatch::Dispatch;
use crate::props::Props;

/// A state projection: `(state, ...context) -> props`.
pub type MapStateFn<S> = Arc<dyn Fn(&S, &[Value]) -> Props + Send + Sync>;

/// What a selector yields on its probe call.
pub enum Selected<S> {
    /// Mapped props; the selector is used directly.
    Props(Props),
    /// A per-component mapper; the selector is a factory and this is the
    /// function that maps state from then on.
    Factory(MapStateFn<S>),
}

impl<S> From<Props> for Selected<S> {
    fn from(props: Props) -> Self {
        Selected::Props(props)
    }
}

/// `(state, ...context) -> props | mapper`.
pub struct Selector<S>(Arc<dyn Fn(&S, &[Value]) -> Selected<S> + Send + Sync>);

impl<S: 'static> Selector<S> {
    /// A selector returning props (or anything convertible to [`Selected`]).
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&S, &[Value]) -> R + Send + Sync + 'static,
        R: Into<Selected<S>>,
    {
        Self(Arc::new(move |state: &S, context: &[Value]| -> Selected<S> {
            f(state, context).into()
        }))
    }

    /// A selector that builds one mapper per component instance.
    pub fn factory<F, M>(f: F) -> Self
    where
        F: Fn(&S, &[Value]) -> M + Send + Sync + 'static,
        M: Fn(&S, &[Value]) -> Props + Send + Sync + 'static,
    {
        Self(Arc::new(move |state: &S, context: &[Value]| -> Selected<S> {
            Selected::Factory(Arc::new(f(state, context)))
        }))
    }
}

impl<S> Selector<S> {
    pub fn select(&self, state: &S, context: &[Value]) -> Selected<S> {
        (self.0)(state, context)
    }
}

impl<S> Clone for Selector<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S> fmt::Debug for Selector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector(..)")
    }
}

/// `(dispatch, ...context) -> props`.
#[derive(Clone)]
pub struct ActionsFn(Arc<dyn Fn(&Dispatch, &[Value]) -> Props + Send + Sync>);

impl ActionsFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Dispatch, &[Value]) -> Props + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, dispatch: &Dispatch, context: &[Value]) -> Props {
        (self.0)(dispatch, context)
    }
}

impl fmt::Debug for ActionsFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionsFn(..)")
    }
}
