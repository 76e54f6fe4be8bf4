use huddle_client::{ClientConfig, Variant};
use huddle_contracts::Fixture;
use huddle_messaging::Message;
use serde_json::json;

#[test]
fn rename_resolves_per_variant() {
    let mut channel = Fixture::new("C1", Variant::PublicChannel);
    channel.conversation.rename("new-name");
    assert_eq!(
        channel.api_calls(),
        vec![("channels.rename", json!({ "channel": "C1", "name": "new-name" }))]
    );

    let mut group = Fixture::new("G1", Variant::PrivateGroup);
    group.conversation.rename("new-name");
    assert_eq!(
        group.api_calls(),
        vec![("groups.rename", json!({ "channel": "G1", "name": "new-name" }))]
    );
}

#[test]
fn direct_message_skips_unsupported_operations() {
    let mut dm = Fixture::new("D1", Variant::DirectMessage);
    assert!(dm.conversation.leave().is_none());
    assert!(dm.conversation.set_topic("topic").is_none());
    assert!(dm.conversation.set_purpose("purpose").is_none());
    assert!(dm.conversation.rename("name").is_none());
    assert!(dm.conversation.invite("U1".into()).is_none());
    assert!(dm.api_calls().is_empty());
}

#[test]
fn command_parameter_shapes() {
    let mut channel = Fixture::new("C1", Variant::PublicChannel);
    channel.conversation.fetch_history(Some("20".into()), Some("10".into()));
    channel.conversation.mark("15".into());
    channel.conversation.set_topic("release day");
    channel.conversation.set_purpose("ship it");
    channel.conversation.invite("U2".into());
    channel.conversation.leave();

    assert_eq!(
        channel.api_calls(),
        vec![
            ("channels.history", json!({ "channel": "C1", "latest": "20", "oldest": "10" })),
            ("channels.mark", json!({ "channel": "C1", "ts": "15" })),
            ("channels.setTopic", json!({ "channel": "C1", "topic": "release day" })),
            ("channels.setPurpose", json!({ "channel": "C1", "purpose": "ship it" })),
            ("channels.invite", json!({ "channel": "C1", "user": "U2" })),
            ("channels.leave", json!({ "channel": "C1" })),
        ]
    );
}

#[test]
fn auto_mark_follows_every_reconciled_event() {
    let config = ClientConfig::default().with_auto_mark(true);
    let mut dm = Fixture::with_config("D1", Variant::DirectMessage, config);
    dm.conversation.add_message(Message::at("1"));
    dm.conversation.add_message(Message::at("2").with_subtype("bot_message"));

    assert_eq!(
        dm.api_calls(),
        vec![
            ("im.mark", json!({ "channel": "D1", "ts": "1" })),
            ("im.mark", json!({ "channel": "D1", "ts": "2" })),
        ]
    );
}
