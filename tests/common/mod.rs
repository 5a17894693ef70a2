//! Shared test utilities: a stand-in binding library and a tiny store.

#![allow(dead_code, unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use redux_packet::consume::{Connect, MergeProps};
use redux_packet::keyed::Reducer;
use redux_packet::packet::{MapDispatch, MapStateFactory, StateMapper};
use redux_packet::{Action, ConnectOptions, Dispatch, PacketError, Props};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once. `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Shared call counter for selectors and creators.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A dispatch that records every action and returns it unchanged.
pub fn recording_dispatch() -> (Dispatch, Arc<Mutex<Vec<Action>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let dispatch = Dispatch::new(move |action| {
        sink.lock().unwrap().push(action.clone());
        action
    });
    (dispatch, log)
}

/// What a `connect` call received.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectRecord {
    pub has_map_state: bool,
    pub has_map_dispatch: bool,
    pub has_merge: bool,
    pub map_state_depends_on_props: Option<bool>,
    pub map_dispatch_depends_on_props: Option<bool>,
    pub options: Option<ConnectOptions>,
}

/// Records `connect` calls and hands back a [`Connected`] driver.
pub struct RecordingConnect {
    pub calls: Mutex<Vec<ConnectRecord>>,
    dispatch: Dispatch,
}

impl RecordingConnect {
    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            dispatch,
        }
    }

    pub fn last_call(&self) -> ConnectRecord {
        self.calls.lock().unwrap().last().cloned().expect("connect was never called")
    }
}

impl<S> Connect<S> for RecordingConnect {
    type Output = Connected<S>;

    fn connect(
        &self,
        map_state_to_props: Option<MapStateFactory<S>>,
        map_dispatch_to_props: Option<MapDispatch>,
        merge_props: Option<MergeProps>,
        options: Option<ConnectOptions>,
    ) -> Connected<S> {
        self.calls.lock().unwrap().push(ConnectRecord {
            has_map_state: map_state_to_props.is_some(),
            has_map_dispatch: map_dispatch_to_props.is_some(),
            has_merge: merge_props.is_some(),
            map_state_depends_on_props: map_state_to_props
                .as_ref()
                .map(MapStateFactory::depends_on_props),
            map_dispatch_depends_on_props: map_dispatch_to_props
                .as_ref()
                .map(MapDispatch::depends_on_props),
            options,
        });
        Connected {
            map_state_to_props,
            map_dispatch_to_props,
            merge_props,
            mapper: None,
            last: None,
            dispatch: self.dispatch.clone(),
        }
    }
}

/// Minimal reference binding driver for one mounted component.
///
/// Initializes the state factory on first render, recomputes every half on
/// every render and applies the library default merge
/// `{...own, ...state, ...dispatch}` when no merge is given. [`update`]
/// skips the merge when state props and own props are unchanged, like a
/// pure binding does.
///
/// [`update`]: Connected::update
pub struct Connected<S> {
    map_state_to_props: Option<MapStateFactory<S>>,
    map_dispatch_to_props: Option<MapDispatch>,
    merge_props: Option<MergeProps>,
    mapper: Option<StateMapper<S>>,
    last: Option<(Props, Arc<Props>)>,
    dispatch: Dispatch,
}

impl<S> Connected<S> {
    pub fn state_props(&mut self, state: &Arc<S>, own: &Arc<Props>) -> Props {
        match &self.map_state_to_props {
            Some(factory) => self
                .mapper
                .get_or_insert_with(|| factory.init(state, own))
                .map_state(state, own),
            None => Props::new(),
        }
    }

    pub fn dispatch_props(&self, own: &Arc<Props>) -> Props {
        match &self.map_dispatch_to_props {
            Some(mapper) => mapper.map_dispatch(&self.dispatch, own),
            None => Props::new(),
        }
    }

    /// Recompute and merge unconditionally.
    pub fn render(&mut self, state: &Arc<S>, own: &Arc<Props>) -> Result<Props, PacketError> {
        let state_props = self.state_props(state, own);
        self.merge(state_props, own)
    }

    /// Recompute state props; merge only when they or own props changed.
    pub fn update(
        &mut self,
        state: &Arc<S>,
        own: &Arc<Props>,
    ) -> Result<Option<Props>, PacketError> {
        let state_props = self.state_props(state, own);
        if let Some((last_state, last_own)) = &self.last {
            if *last_state == state_props && Arc::ptr_eq(last_own, own) {
                return Ok(None);
            }
        }
        self.last = Some((state_props.clone(), own.clone()));
        self.merge(state_props, own).map(Some)
    }

    fn merge(&self, state_props: Props, own: &Arc<Props>) -> Result<Props, PacketError> {
        let dispatch_props = self.dispatch_props(own);
        match &self.merge_props {
            Some(merge) => merge(state_props, dispatch_props, &**own),
            None => Ok(state_props.merged(dispatch_props).merged((**own).clone())),
        }
    }
}

/// A single-reducer store holding JSON state.
pub struct TestStore {
    state: Arc<Mutex<Arc<Value>>>,
    reducer: Arc<dyn Reducer>,
}

impl TestStore {
    pub fn new(reducer: impl Reducer + 'static, initial: Value) -> Self {
        Self {
            state: Arc::new(Mutex::new(Arc::new(initial))),
            reducer: Arc::new(reducer),
        }
    }

    pub fn state(&self) -> Arc<Value> {
        self.state.lock().unwrap().clone()
    }

    /// A dispatch that runs actions through the reducer.
    pub fn dispatcher(&self) -> Dispatch {
        let state = self.state.clone();
        let reducer = self.reducer.clone();
        Dispatch::new(move |action| {
            let mut current = state.lock().unwrap();
            *current = reducer.reduce(&current, &action);
            action
        })
    }
}
