mod common;

use std::sync::Arc;

use common::{init_tracing, CallCounter, Connected, RecordingConnect, TestStore};
use redux_packet::keyed::{key_by, keyed_by, lookup, path_key, ActionKey};
use redux_packet::{
    consume, pack_all, Action, Callback, Consume, ContextSelector, Descriptor, Dispatch,
    Packet, PacketError, PacketMakers, Props,
};
use serde_json::{json, Value};

type State = Value;

/// Replace the value at a dotted path, copying the objects along it.
fn immutable_set(node: Option<&Value>, path: &[&str], value: Value) -> Value {
    let Some((key, rest)) = path.split_first() else {
        return value;
    };
    let mut map = node.and_then(Value::as_object).cloned().unwrap_or_default();
    let child = immutable_set(map.get(*key), rest, value);
    map.insert(key.to_string(), child);
    Value::Object(map)
}

/// `{type: "a.b.c", payload}` writes `payload` at `a.b.c`.
fn path_reducer(state: &Arc<Value>, action: &Action) -> Arc<Value> {
    let Some(path) = action["type"].as_str() else {
        return Arc::clone(state);
    };
    let path: Vec<&str> = path.split('.').collect();
    Arc::new(immutable_set(Some(&**state), &path, action["payload"].clone()))
}

fn set(path: impl Into<String>, payload: Value) -> Action {
    json!({"type": path.into(), "payload": payload})
}

fn context_path(prefix: &str, context: &[Value]) -> String {
    let mut path = prefix.to_string();
    for value in context {
        path.push('.');
        path.push_str(&path_key(value).unwrap_or_default());
    }
    path
}

fn in_context(state: &State, path: &str) -> Props {
    let context = lookup(state, path.split('.'));
    let field = |name: &str| {
        context
            .and_then(|c| c.get(name))
            .cloned()
            .unwrap_or(Value::Null)
    };
    Props::new()
        .with("users", field("users"))
        .with("usersLoading", field("usersLoading"))
        .with("usersLoadingErrors", field("usersLoadingErrors"))
        .with("usersLoaded", field("usersLoaded"))
}

fn load_for_context(dispatch: &Dispatch, path: String) -> Callback {
    let dispatch = dispatch.clone();
    Callback::new(move |_args| dispatch.dispatch(set(format!("{path}.usersLoading"), json!(true))))
}

fn finish_loading(store: &TestStore, path: &str) {
    store.dispatcher().dispatch(set(
        path,
        json!({
            "users": ["Alice", "Bob", "Eve"],
            "usersLoading": false,
            "usersLoadingErrors": [],
            "usersLoaded": true,
        }),
    ));
}

fn users() -> PacketMakers<State> {
    pack_all::<State>(vec![
        (
            "forGroup",
            Descriptor::new()
                .selector(|state: &State, context: &[Value]| {
                    in_context(state, &context_path("groups", context))
                })
                .actions(|dispatch: &Dispatch, context: &[Value]| {
                    Props::new().with(
                        "loadUsersForGroup",
                        load_for_context(dispatch, context_path("groups", context)),
                    )
                }),
        ),
        (
            "forProject",
            Descriptor::new()
                .selector(|state: &State, context: &[Value]| {
                    in_context(state, &context_path("projects", context))
                })
                .actions(|dispatch: &Dispatch, context: &[Value]| {
                    Props::new().with(
                        "loadUsersForProject",
                        load_for_context(dispatch, context_path("projects", context)),
                    )
                }),
        ),
        (
            "forProjectInGroup",
            Descriptor::new()
                .selector(|state: &State, context: &[Value]| {
                    in_context(state, &projects_in_group(context))
                })
                .actions(|dispatch: &Dispatch, context: &[Value]| {
                    Props::new().with("loadUsers", load_for_context(dispatch, projects_in_group(context)))
                })
                .minimum_selectors_expected(2),
        ),
    ])
    .expect("users packets are valid")
}

fn projects_in_group(context: &[Value]) -> String {
    format!(
        "groups.{}.projects.{}",
        path_key(&context[0]).unwrap_or_default(),
        path_key(&context[1]).unwrap_or_default()
    )
}

fn packet(
    makers: &PacketMakers<State>,
    name: &str,
    context: Vec<ContextSelector>,
) -> Packet<State> {
    makers
        .get(name)
        .expect("packet exists")
        .make(context)
        .expect("enough context selectors")
}

/// Drive a users list: idle, click load, loading, finish, loaded.
fn exercise_users_list(
    mut component: Connected<State>,
    store: &TestStore,
    own: Props,
    path: &str,
) {
    let own = Arc::new(own);

    let idle = component.render(&store.state(), &own).unwrap();
    assert_eq!(idle.value("usersLoading"), Some(&Value::Null));
    assert_eq!(idle.value("usersLoaded"), Some(&Value::Null));
    let load = idle.callback("loadUsers").expect("loadUsers is bound").clone();

    load.call(&[]);
    let loading = component.render(&store.state(), &own).unwrap();
    assert_eq!(loading.value("usersLoading"), Some(&json!(true)));

    finish_loading(store, path);
    let loaded = component.render(&store.state(), &own).unwrap();
    assert_eq!(loaded.value("users"), Some(&json!(["Alice", "Bob", "Eve"])));
    assert_eq!(loaded.value("usersLoaded"), Some(&json!(true)));
}

fn rename_load(from: &'static str) -> impl Fn(&[Props]) -> Props + Send + Sync {
    move |packets: &[Props]| {
        let mut props = packets[0].clone();
        if let Some(load) = props.remove(from) {
            props.insert("loadUsers", load);
        }
        props
    }
}

#[test]
fn handles_users_in_a_group() {
    init_tracing();
    let store = TestStore::new(path_reducer, json!({}));
    let connector = RecordingConnect::new(store.dispatcher());

    let component = Consume::new(vec![packet(
        &users(),
        "forGroup",
        vec![ContextSelector::prop("groupId")],
    )])
    .with_map_packets_to_props(rename_load("loadUsersForGroup"))
    .build()
    .unwrap()
    .connect(&connector);

    exercise_users_list(component, &store, Props::new().with("groupId", json!(2)), "groups.2");
}

#[test]
fn handles_users_in_a_project() {
    let store = TestStore::new(path_reducer, json!({}));
    let connector = RecordingConnect::new(store.dispatcher());

    let component = Consume::new(vec![packet(
        &users(),
        "forProject",
        vec![ContextSelector::prop("projectId")],
    )])
    .with_map_packets_to_props(rename_load("loadUsersForProject"))
    .build()
    .unwrap()
    .connect(&connector);

    exercise_users_list(component, &store, Props::new().with("projectId", json!(2)), "projects.2");
}

#[test]
fn handles_users_in_a_project_in_a_group() {
    let store = TestStore::new(path_reducer, json!({}));
    let connector = RecordingConnect::new(store.dispatcher());

    let component = consume(vec![packet(
        &users(),
        "forProjectInGroup",
        vec![ContextSelector::prop("groupId"), ContextSelector::prop("projectId")],
    )])
    .unwrap()
    .connect(&connector);

    exercise_users_list(
        component,
        &store,
        Props::new().with("groupId", json!(3)).with("projectId", json!(2)),
        "groups.3.projects.2",
    );
}

#[test]
fn handles_multiple_packets() {
    let store = TestStore::new(path_reducer, json!({}));
    let connector = RecordingConnect::new(store.dispatcher());
    let makers = users();

    let component = Consume::new(vec![
        packet(&makers, "forProject", vec![ContextSelector::prop("projectId")]),
        packet(
            &makers,
            "forProjectInGroup",
            vec![ContextSelector::prop("groupId"), ContextSelector::prop("projectId")],
        ),
    ])
    .with_map_packets_to_props(|packets: &[Props]| packets[1].clone())
    .build()
    .unwrap()
    .connect(&connector);

    exercise_users_list(
        component,
        &store,
        Props::new().with("groupId", json!(3)).with("projectId", json!(2)),
        "groups.3.projects.2",
    );
}

#[test]
fn fails_on_duplicate_props() {
    let store = TestStore::new(path_reducer, json!({}));
    let connector = RecordingConnect::new(store.dispatcher());
    let makers = users();

    let mut component = consume(vec![
        packet(&makers, "forProject", vec![ContextSelector::prop("projectId")]),
        packet(
            &makers,
            "forProjectInGroup",
            vec![ContextSelector::prop("groupId"), ContextSelector::prop("projectId")],
        ),
    ])
    .unwrap()
    .connect(&connector);

    let err = component
        .render(&store.state(), &Arc::new(Props::new()))
        .unwrap_err();
    assert_eq!(
        err,
        PacketError::DuplicateProps {
            names: vec![
                "users".to_string(),
                "usersLoading".to_string(),
                "usersLoadingErrors".to_string(),
                "usersLoaded".to_string(),
            ]
        }
    );
}

#[test]
fn does_not_rerender_if_relevant_state_has_not_changed() {
    let store = TestStore::new(path_reducer, json!({}));
    let connector = RecordingConnect::new(store.dispatcher());
    let makers = users();
    let map_calls = CallCounter::default();

    let counter = map_calls.clone();
    let mut component = Consume::new(vec![
        packet(&makers, "forGroup", vec![json!(2).into()]),
        packet(&makers, "forProject", vec![json!(2).into()]),
    ])
    .with_map_packets_to_props(move |packets: &[Props]| {
        counter.hit();
        packets[0].clone()
    })
    .build()
    .unwrap()
    .connect(&connector);
    let own = Arc::new(Props::new());
    let dispatch = store.dispatcher();

    assert!(component.update(&store.state(), &own).unwrap().is_some());
    assert_eq!(map_calls.get(), 1);

    dispatch.dispatch(set("unrelated.path", json!(42)));
    assert!(component.update(&store.state(), &own).unwrap().is_none());
    assert_eq!(map_calls.get(), 1);

    dispatch.dispatch(set("groups.2.usersLoading", json!(true)));
    let rendered = component.update(&store.state(), &own).unwrap().unwrap();
    assert_eq!(rendered.value("usersLoading"), Some(&json!(true)));
    assert_eq!(map_calls.get(), 2);
}

#[test]
fn keyed_reducer_and_selector_share_a_slice() {
    let by_type: ActionKey = Arc::new(|action: &Action| action["type"].clone());
    let by_group: ActionKey = Arc::new(|action: &Action| action["group"].clone());
    let loading = |state: &Arc<Value>, action: &Action| -> Arc<Value> {
        match action["status"].as_str() {
            Some("pending") => Arc::new(json!({"loading": true})),
            Some("succeeded") => Arc::new(json!({"loading": false, "users": action["users"]})),
            _ => Arc::clone(state),
        }
    };
    let store = TestStore::new(key_by(vec![by_type, by_group], loading), json!({}));
    let connector = RecordingConnect::new(store.dispatcher());

    let leaf = keyed_by(
        vec![ContextSelector::constant("LOAD_USERS"), ContextSelector::prop("group")],
        |slice: Option<&Value>, _props: &Props| {
            Props::new().with(
                "loading",
                slice.map(|s| s["loading"].clone()).unwrap_or(json!(false)),
            )
        },
    );
    let makers = pack_all::<State>(vec![(
        "users",
        Descriptor::new()
            .selector(move |state: &State, context: &[Value]| {
                let own = Props::new().with("group", context[0].clone());
                leaf(state, &own)
            })
            .actions(|dispatch: &Dispatch, context: &[Value]| {
                let dispatch = dispatch.clone();
                let group = context[0].clone();
                Props::new().with(
                    "load",
                    Callback::new(move |_args| {
                        dispatch.dispatch(json!({"type": "LOAD_USERS", "group": group, "status": "pending"}))
                    }),
                )
            }),
    )])
    .unwrap();

    let mut component = consume(packet(&makers, "users", vec![ContextSelector::prop("group")]))
        .unwrap()
        .connect(&connector);
    let own = Arc::new(Props::new().with("group", json!("g1")));

    let idle = component.update(&store.state(), &own).unwrap().unwrap();
    assert_eq!(idle.value("loading"), Some(&json!(false)));

    // Another group's slice changes; this component's props stay put.
    store.dispatcher().dispatch(json!({"type": "LOAD_USERS", "group": "g2", "status": "pending"}));
    assert!(component.update(&store.state(), &own).unwrap().is_none());

    idle.callback("load").unwrap().call(&[]);
    let loading = component.update(&store.state(), &own).unwrap().unwrap();
    assert_eq!(loading.value("loading"), Some(&json!(true)));
    assert_eq!(
        *store.state(),
        json!({"LOAD_USERS": {"g1": {"loading": true}, "g2": {"loading": true}}})
    );
}
