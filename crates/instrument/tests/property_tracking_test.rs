mod common;

use common::{unique_key, RecordingListener};
use envtrace_instrument::{discard_listener, props, tracked, AccessEvent, PropValue, PropertyMap};
use serial_test::serial;

const CONSUMER: &str = "build-script-a";

#[test]
#[serial]
fn queried_value_is_the_value_actually_observed() {
    let key = unique_key("prop.read");
    props::store().set(&key, PropValue::from("observed"));
    let listener = RecordingListener::install();

    let value = tracked::property(&key, Some("fallback"), CONSUMER);

    assert_eq!(value, Some("observed".to_string()));
    assert_eq!(
        listener.events(),
        vec![AccessEvent::PropertyQueried {
            key: key.clone(),
            value: Some("observed".to_string()),
            consumer: CONSUMER.to_string(),
        }]
    );
    discard_listener();
}

#[test]
#[serial]
fn default_applies_only_to_the_returned_value() {
    let key = unique_key("prop.missing");
    let listener = RecordingListener::install();

    let value = tracked::property(&key, Some("fallback"), CONSUMER);

    // The notification reports the absent read; the default is the
    // caller's business.
    assert_eq!(value, Some("fallback".to_string()));
    assert_eq!(
        listener.events(),
        vec![AccessEvent::PropertyQueried {
            key: key.clone(),
            value: None,
            consumer: CONSUMER.to_string(),
        }]
    );
    discard_listener();
}

#[test]
#[serial]
fn write_reports_prior_value_then_change_and_returns_old() {
    let key = unique_key("prop.write");
    props::store().set(&key, PropValue::from("before"));
    let listener = RecordingListener::install();

    let old = tracked::set_property(&key, "after", CONSUMER);

    assert_eq!(old, Some("before".to_string()));
    assert_eq!(props::store().get_str(&key), Some("after".to_string()));
    assert_eq!(
        listener.events(),
        vec![
            AccessEvent::PropertyQueried {
                key: key.clone(),
                value: Some("before".to_string()),
                consumer: CONSUMER.to_string(),
            },
            AccessEvent::PropertyChanged {
                key: key.clone(),
                value: PropValue::from("after"),
                consumer: CONSUMER.to_string(),
            },
        ]
    );
    discard_listener();
}

#[test]
#[serial]
fn remove_reports_prior_value_then_removal() {
    let key = unique_key("prop.remove");
    props::store().set(&key, PropValue::from("doomed"));
    let listener = RecordingListener::install();

    let old = tracked::remove_property(&key, CONSUMER);

    assert_eq!(old, Some("doomed".to_string()));
    assert!(!props::store().contains(&key));
    assert_eq!(
        listener.events(),
        vec![
            AccessEvent::PropertyQueried {
                key: key.clone(),
                value: Some("doomed".to_string()),
                consumer: CONSUMER.to_string(),
            },
            AccessEvent::PropertyRemoved {
                key: key.clone(),
                consumer: CONSUMER.to_string(),
            },
        ]
    );
    discard_listener();
}

#[test]
#[serial]
fn typed_reads_report_raw_value_and_fall_back_to_defaults() {
    let int_key = unique_key("prop.int");
    let junk_key = unique_key("prop.junk");
    props::store().set(&int_key, PropValue::from("42"));
    props::store().set(&junk_key, PropValue::from("not-a-number"));
    let listener = RecordingListener::install();

    assert_eq!(tracked::int_property(&int_key, None, CONSUMER), Some(42));
    assert_eq!(tracked::int_property(&junk_key, Some(7), CONSUMER), Some(7));
    assert!(!tracked::bool_property(&junk_key, CONSUMER));

    let events = listener.events();
    assert_eq!(events.len(), 3);
    // Parsing failures still report what the read observed.
    assert_eq!(
        events[1],
        AccessEvent::PropertyQueried {
            key: junk_key.clone(),
            value: Some("not-a-number".to_string()),
            consumer: CONSUMER.to_string(),
        }
    );
    discard_listener();
}

#[test]
#[serial]
fn bool_property_is_true_only_for_the_string_true() {
    let key = unique_key("prop.flag");
    props::store().set(&key, PropValue::from("TRUE"));
    let listener = RecordingListener::install();

    assert!(tracked::bool_property(&key, CONSUMER));
    props::store().set(&key, PropValue::from("yes"));
    assert!(!tracked::bool_property(&key, CONSUMER));

    assert_eq!(listener.events().len(), 2);
    discard_listener();
}

#[test]
#[serial]
fn bulk_replace_reports_cleared_then_each_entry_in_order() {
    let listener = RecordingListener::install();

    let mut replacement = PropertyMap::new();
    replacement.insert("x".to_string(), PropValue::from("1"));
    replacement.insert("y".to_string(), PropValue::from("2"));
    tracked::replace_properties(replacement, CONSUMER);

    assert_eq!(
        listener.events(),
        vec![
            AccessEvent::PropertiesCleared {
                consumer: CONSUMER.to_string(),
            },
            AccessEvent::PropertyChanged {
                key: "x".to_string(),
                value: PropValue::from("1"),
                consumer: CONSUMER.to_string(),
            },
            AccessEvent::PropertyChanged {
                key: "y".to_string(),
                value: PropValue::from("2"),
                consumer: CONSUMER.to_string(),
            },
        ]
    );
    assert_eq!(props::store().get_str("x"), Some("1".to_string()));
    assert_eq!(props::store().get_str("y"), Some("2".to_string()));
    discard_listener();
}

#[test]
#[serial]
fn snapshot_defers_notifications_until_entries_are_accessed() {
    let key = unique_key("prop.lazy");
    props::store().set(&key, PropValue::from("v"));
    let listener = RecordingListener::install();

    let view = tracked::properties(CONSUMER);
    assert!(listener.is_empty());

    // Two accesses to the same entry report twice.
    assert_eq!(view.get_str(&key), Some("v".to_string()));
    assert_eq!(view.get_str(&key), Some("v".to_string()));
    assert_eq!(listener.events().len(), 2);
    discard_listener();
}

#[test]
#[serial]
fn snapshot_passes_non_string_values_through_untracked() {
    let key = unique_key("prop.nonstring");
    props::store().set(&key, PropValue::from(9000));
    let listener = RecordingListener::install();

    let view = tracked::properties(CONSUMER);
    assert_eq!(view.get(&key), Some(PropValue::Int(9000)));
    assert!(listener.is_empty());

    // An absent entry is still a tracked read.
    assert_eq!(view.get(&unique_key("prop.absent")), None);
    assert_eq!(listener.events().len(), 1);
    discard_listener();
}

#[test]
#[serial]
fn snapshot_writes_forward_through_notification() {
    let key = unique_key("prop.viewwrite");
    let listener = RecordingListener::install();

    let view = tracked::properties(CONSUMER);
    assert_eq!(view.set(&key, PropValue::from("w")), None);
    assert_eq!(props::store().get_str(&key), Some("w".to_string()));

    let events = listener.take();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], AccessEvent::PropertyChanged { .. }));

    view.remove(&key);
    assert!(!props::store().contains(&key));
    let events = listener.events();
    assert!(matches!(events.last(), Some(AccessEvent::PropertyRemoved { .. })));
    discard_listener();
}

#[test]
#[serial]
fn snapshot_enumeration_reports_string_entries_only() {
    let str_key = unique_key("prop.iter.str");
    let int_key = unique_key("prop.iter.int");
    props::store().set(&str_key, PropValue::from("s"));
    props::store().set(&int_key, PropValue::from(5));
    let listener = RecordingListener::install();

    let view = tracked::properties(CONSUMER);
    assert!(view.contains(&str_key));
    listener.take();

    let entries = view.entries();
    assert!(entries.iter().any(|(k, _)| k == &str_key));
    assert!(entries.iter().any(|(k, _)| k == &int_key));
    let non_string = entries.iter().filter(|(_, v)| v.as_str().is_none()).count();
    let queried = listener
        .events()
        .iter()
        .filter(|e| matches!(e, AccessEvent::PropertyQueried { .. }))
        .count();
    assert_eq!(queried, entries.len() - non_string);
    discard_listener();
}

#[test]
#[serial]
fn clearing_through_the_snapshot_reports_once_and_empties_the_store() {
    let key = unique_key("prop.viewclear");
    props::store().set(&key, PropValue::from("x"));
    let listener = RecordingListener::install();

    let view = tracked::properties(CONSUMER);
    assert!(!view.is_empty());
    view.clear();

    assert_eq!(view.len(), 0);
    assert_eq!(
        listener.events(),
        vec![AccessEvent::PropertiesCleared {
            consumer: CONSUMER.to_string(),
        }]
    );
    discard_listener();
}

#[test]
#[serial]
fn recorded_events_serialize_for_downstream_consumers() {
    let event = AccessEvent::PropertyQueried {
        key: "build.parallel".to_string(),
        value: Some("4".to_string()),
        consumer: "settings".to_string(),
    };
    let json = serde_json::to_value(&event).expect("serialize");
    assert_eq!(json["PropertyQueried"]["key"], "build.parallel");
    let back: AccessEvent = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, event);
}

#[test]
#[serial]
fn interception_is_observationally_transparent_for_reads() {
    let key = unique_key("prop.transparent");
    props::store().set(&key, PropValue::from("same"));
    let listener = RecordingListener::install();

    let direct = props::store().get_str(&key);
    let intercepted = tracked::property(&key, None, CONSUMER);

    assert_eq!(direct, intercepted);
    assert_eq!(listener.events().len(), 1);
    discard_listener();
}
