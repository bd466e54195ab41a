mod common;

use common::{MockSd, key_down_on};
use serde_json::json;
use streamdeck_playground::actions::ids;
use streamdeck_playground::host::incoming::Event;
use streamdeck_playground::plugin;

#[test]
fn wire_event_reaches_the_action() {
    let raw = format!(
        r#"{{
            "event": "willAppear",
            "action": "{}",
            "context": "key-9",
            "device": "dev-1",
            "payload": {{ "settings": {{ "count": 12 }}, "controller": "Keypad" }}
        }}"#,
        ids::INCREMENT
    );

    let (sd, cx) = MockSd::harness();
    let mut plugin = plugin();
    plugin.dispatch(&cx, &Event::from_json(&raw).unwrap());

    assert_eq!(sd.titles_for("key-9"), [Some("12".to_string())]);
}

#[test]
fn settings_reply_envelope_reaches_the_action() {
    let raw = format!(
        r#"{{
            "event": "didReceiveSettings",
            "action": "{}",
            "context": "key-9",
            "device": "dev-1",
            "payload": {{ "settings": {{ "count": 23 }}, "isInMultiAction": false }}
        }}"#,
        ids::INCREMENT
    );

    let (sd, cx) = MockSd::harness();
    let mut plugin = plugin();
    plugin.dispatch(&cx, &Event::from_json(&raw).unwrap());

    assert_eq!(sd.titles_for("key-9"), [Some("23".to_string())]);
}

#[test]
fn contexts_are_routed_independently() {
    let (sd, cx) = MockSd::harness();
    let mut plugin = plugin();

    plugin.dispatch(&cx, &key_down_on(ids::INCREMENT, "key-a", json!({ "count": 1 })));
    plugin.dispatch(&cx, &key_down_on(ids::INCREMENT, "key-b", json!({ "count": 8 })));

    assert_eq!(sd.settings_writes_for("key-a")[0].get("count"), Some(&json!(2)));
    assert_eq!(sd.settings_writes_for("key-b")[0].get("count"), Some(&json!(9)));
}

#[test]
fn unregistered_action_is_ignored() {
    let (sd, cx) = MockSd::harness();
    let mut plugin = plugin();

    plugin.dispatch(&cx, &key_down_on("com.other.vendor.thing", "key-1", json!({})));

    assert!(sd.commands().is_empty());
}

#[test]
fn unknown_event_kind_is_ignored() {
    let (sd, cx) = MockSd::harness();
    let mut plugin = plugin();

    let ev = Event::from_json(r#"{ "event": "systemDidWakeUp" }"#).unwrap();
    plugin.dispatch(&cx, &ev);

    assert!(sd.commands().is_empty());
}

#[test]
fn teardown_is_safe_with_and_without_instances() {
    let (sd, cx) = MockSd::harness();
    let mut plugin = plugin();

    plugin.teardown(&cx);

    plugin.dispatch(&cx, &key_down_on(ids::INCREMENT, "key-1", json!({ "count": 1 })));
    plugin.teardown(&cx);

    // Teardown itself issues no host commands.
    let count = sd.commands().len();
    plugin.teardown(&cx);
    assert_eq!(sd.commands().len(), count);
}
