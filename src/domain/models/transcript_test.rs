use super::sort_newest_first;
use super::Message;
use super::Transcript;

fn transcript(id: &str, timestamp: Option<&str>) -> Transcript {
    return Transcript {
        id: id.to_string(),
        timestamp: timestamp.map(|e| return e.to_string()),
        messages: vec![Message::user("Hello")],
    };
}

#[test]
fn it_formats_summary_label() {
    let summary = transcript("a", Some("2024-03-05T09:07:45.123456+01:00"))
        .summary()
        .unwrap();

    assert_eq!(summary.id, "a");
    assert_eq!(summary.label(), "2024-03-05 09:07");
}

#[test]
fn it_skips_summary_without_timestamp() {
    assert!(transcript("a", None).summary().is_none());
}

#[test]
fn it_skips_summary_with_unparseable_timestamp() {
    assert!(transcript("a", Some("yesterday")).summary().is_none());
}

#[test]
fn it_sorts_newest_first() {
    let mut summaries = vec![
        transcript("old", Some("2024-01-01T10:00:00+00:00")),
        transcript("new", Some("2024-01-03T10:00:00+00:00")),
        transcript("mid", Some("2024-01-02T10:00:00+00:00")),
    ]
    .iter()
    .filter_map(|e| return e.summary())
    .collect::<Vec<_>>();

    sort_newest_first(&mut summaries);

    let ids = summaries
        .iter()
        .map(|e| return e.id.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[test]
fn it_compares_timestamps_across_offsets() {
    let mut summaries = vec![
        transcript("utc", Some("2024-01-01T10:00:00+00:00")),
        transcript("later", Some("2024-01-01T12:30:00+02:00")),
    ]
    .iter()
    .filter_map(|e| return e.summary())
    .collect::<Vec<_>>();

    sort_newest_first(&mut summaries);
    assert_eq!(summaries[0].id, "later");
}

#[test]
fn it_deserializes_without_timestamp() {
    let payload = "id: abc\nmessages:\n- role: assistant\n  content: Hi\n";
    let transcript: Transcript = serde_yaml::from_str(payload).unwrap();

    assert_eq!(transcript.timestamp, None);
    assert_eq!(transcript.messages, vec![Message::assistant("Hi")]);
}
