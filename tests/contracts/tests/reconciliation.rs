use huddle_client::Variant;
use huddle_contracts::{event, Fixture};
use huddle_messaging::{Message, Timestamp, UserId};
use serde_json::json;

#[test]
fn distinct_timestamps_each_get_one_history_entry() {
    let mut fixture = Fixture::new("C1", Variant::PublicChannel);
    for ts in ["1", "2", "3", "4", "5"] {
        fixture.conversation.add_message(Message::at(ts));
    }
    assert_eq!(fixture.conversation.history().len(), 5);
}

#[test]
fn unread_grows_by_one_per_message_once_latest_is_known() {
    let mut info = huddle_messaging::ConversationInfo::new("C1");
    info.latest = Some(Message::at("1000"));
    let (transport, _outbox) = huddle_client::ChannelTransport::new();
    let mut conversation = huddle_client::Conversation::from_info(
        info,
        Variant::PublicChannel,
        std::sync::Arc::new(transport),
        std::sync::Arc::new(huddle_client::ClientConfig::default()),
    );

    for (i, ts) in ["1001", "1002", "1003"].into_iter().enumerate() {
        conversation.add_message(Message::at(ts));
        assert_eq!(conversation.unread_count(), i as u64 + 1);
    }
    assert_eq!(
        conversation.latest().and_then(|m| m.ts.clone()),
        Some(Timestamp::from("1003"))
    );
}

#[test]
fn deleting_unknown_timestamp_leaves_history_untouched() {
    let mut fixture = Fixture::new("C1", Variant::PublicChannel);
    fixture.conversation.add_message(Message::at("1").with_text("a"));
    fixture.conversation.add_message(Message::at("2").with_text("b"));
    let before = fixture.conversation.history().clone();

    fixture.conversation.add_message(event(json!({
        "type": "message",
        "subtype": "message_deleted",
        "hidden": true,
        "ts": "3",
        "deleted_ts": "99"
    })));

    assert_eq!(fixture.conversation.history(), &before);
}

#[test]
fn edit_lands_under_inner_timestamp() {
    let mut fixture = Fixture::new("C1", Variant::PublicChannel);
    fixture.conversation.add_message(event(json!({
        "type": "message",
        "subtype": "message_changed",
        "hidden": true,
        "ts": "1358878755.000001",
        "message": {
            "type": "message",
            "user": "U1",
            "text": "Hello, world!",
            "ts": "1355517523.000005"
        }
    })));

    let history = fixture.conversation.history();
    assert_eq!(history.len(), 1);
    let entry = &history[&Timestamp::from("1355517523.000005")];
    assert_eq!(entry.text.as_deref(), Some("Hello, world!"));
}

#[test]
fn join_then_leave_removes_a_single_occurrence() {
    let mut fixture = Fixture::new("C1", Variant::PublicChannel);
    for ts in ["1", "2"] {
        fixture
            .conversation
            .add_message(Message::at(ts).with_subtype("channel_join").with_user("U1"));
    }
    fixture
        .conversation
        .add_message(Message::at("3").with_subtype("channel_leave").with_user("U1"));

    assert_eq!(fixture.conversation.members(), [UserId::from("U1")]);
}

#[test]
fn first_topic_event_does_not_set_latest() {
    let mut fixture = Fixture::new("C1", Variant::PublicChannel);
    fixture.conversation.add_message(event(json!({
        "ts": "100", "subtype": "channel_topic", "topic": "t1", "user": "U1"
    })));
    fixture.conversation.add_message(event(json!({ "ts": "101" })));

    assert!(fixture.conversation.latest().is_none());
    assert_eq!(fixture.conversation.topic().value, "t1");
    assert_eq!(fixture.conversation.unread_count(), 0);
}

#[test]
fn unknown_subtypes_are_persisted() {
    let mut fixture = Fixture::new("G1", Variant::PrivateGroup);
    fixture.conversation.add_message(event(json!({
        "ts": "5", "subtype": "file_share", "user": "U1", "file": { "id": "F1" }
    })));

    let stored = &fixture.conversation.history()[&Timestamp::from("5")];
    assert_eq!(stored.extra["file"], json!({ "id": "F1" }));
}
