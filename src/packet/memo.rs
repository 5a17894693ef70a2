//! First-call memoization for state mappers.
//!
//! A binding library typically calls a freshly initialised mapper with the
//! same state and props it just probed with. The memo answers that call from
//! the probe result and otherwise calls through, keeping no more than the
//! first result and the first context vector.

use std::sync::Arc;

use serde_json::Value;

use super::context::ContextExecutor;
use super::mapper::MapState;
use super::selector::MapStateFn;
use crate::props::Props;

enum Phase<S> {
    /// Nothing mapped yet. `first` is the probed state and its result, absent
    /// when the probe produced a factory instead of props.
    Cold {
        first: Option<(Arc<S>, Props)>,
        first_props: Arc<Props>,
        first_context: Vec<Value>,
    },
    /// Props have matched so far; the first context vector is still valid.
    WarmedOnce {
        first_props: Arc<Props>,
        first_context: Vec<Value>,
    },
    /// Plain call-through.
    PassThrough,
}

pub(crate) struct FirstCallMemo<S> {
    select: MapStateFn<S>,
    context: Option<ContextExecutor>,
    phase: Phase<S>,
}

impl<S> FirstCallMemo<S> {
    pub(crate) fn new(
        select: MapStateFn<S>,
        context: Option<ContextExecutor>,
        first: Option<(Arc<S>, Props)>,
        first_props: Arc<Props>,
        first_context: Vec<Value>,
    ) -> Self {
        Self {
            select,
            context,
            phase: Phase::Cold {
                first,
                first_props,
                first_context,
            },
        }
    }

    fn select_direct(&self, state: &S, props: &Props) -> Props {
        match &self.context {
            Some(context) => (self.select)(state, &context.execute(props)),
            None => (self.select)(state, &[]),
        }
    }
}

impl<S: Send + Sync> MapState<S> for FirstCallMemo<S> {
    fn map_state(&mut self, state: &Arc<S>, props: &Arc<Props>) -> Props {
        match std::mem::replace(&mut self.phase, Phase::PassThrough) {
            Phase::Cold {
                first,
                first_props,
                first_context,
            } => {
                let first_value = first
                    .filter(|(first_state, _)| Arc::ptr_eq(first_state, state))
                    .map(|(_, value)| value);

                if self.context.is_none() {
                    tracing::trace!(
                        reused = first_value.is_some(),
                        "state memo: context-free first call"
                    );
                    return first_value.unwrap_or_else(|| (self.select)(&**state, &[]));
                }
                if !Arc::ptr_eq(&first_props, props) {
                    tracing::trace!("state memo: props changed on first call, passing through");
                    return self.select_direct(state, props);
                }

                let value = match first_value {
                    Some(value) => value,
                    None => (self.select)(&**state, &first_context),
                };
                self.phase = Phase::WarmedOnce {
                    first_props,
                    first_context,
                };
                value
            }
            Phase::WarmedOnce {
                first_props,
                first_context,
            } => {
                if !Arc::ptr_eq(&first_props, props) {
                    tracing::trace!("state memo: props changed, passing through");
                    return self.select_direct(state, props);
                }
                let value = (self.select)(&**state, &first_context);
                self.phase = Phase::WarmedOnce {
                    first_props,
                    first_context,
                };
                value
            }
            Phase::PassThrough => self.select_direct(state, props),
        }
    }
}
