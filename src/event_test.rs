use super::*;
use chrono::{TimeZone, Utc};

#[test]
fn test_level_ordering() {
    assert!(Level::Verbose < Level::Debug);
    assert!(Level::Debug < Level::Information);
    assert!(Level::Information < Level::Warning);
    assert!(Level::Warning < Level::Error);
    assert!(Level::Error < Level::Fatal);
}

#[test]
fn test_level_names_are_pascal_cased() {
    assert_eq!(Level::Verbose.as_str(), "Verbose");
    assert_eq!(Level::Debug.as_str(), "Debug");
    assert_eq!(Level::Information.as_str(), "Information");
    assert_eq!(Level::Warning.as_str(), "Warning");
    assert_eq!(Level::Error.as_str(), "Error");
    assert_eq!(Level::Fatal.as_str(), "Fatal");
}

#[test]
fn test_level_display_matches_as_str() {
    assert_eq!(format!("{}", Level::Warning), "Warning");
}

#[test]
fn test_event_defaults() {
    let ts = Utc
        .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
        .unwrap()
        .fixed_offset();
    let event = LogEvent::new(ts, Level::Information, "hello {name}");

    assert_eq!(event.timestamp(), ts);
    assert_eq!(event.level(), Level::Information);
    assert_eq!(event.message_template(), "hello {name}");
    assert_eq!(event.exception_text(), "");
    assert!(event.properties().is_empty());
}

#[test]
fn test_rendered_message_falls_back_to_template() {
    let event = LogEvent::now(Level::Debug, "user {id} seen");
    assert_eq!(event.rendered_message(), "user {id} seen");

    let event = event.with_rendered("user 42 seen");
    assert_eq!(event.rendered_message(), "user 42 seen");
    assert_eq!(event.message_template(), "user {id} seen");
}

#[test]
fn test_exception_text() {
    let event = LogEvent::now(Level::Error, "boom").with_exception("io error: broken pipe");
    assert_eq!(event.exception_text(), "io error: broken pipe");
}

#[test]
fn test_properties_keep_insertion_order() {
    let event = LogEvent::now(Level::Information, "x")
        .with_property("zulu", 1)
        .with_property("alpha", 2);

    let names: Vec<&str> = event.properties().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["zulu", "alpha"]);
}

#[test]
fn test_empty_property_names_are_ignored() {
    let event = LogEvent::now(Level::Information, "x").with_property("", 1);
    assert!(event.properties().is_empty());
}
