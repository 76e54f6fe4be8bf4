use huddle_client::{ChannelTransport, ClientConfig, Conversation, ConversationRuntime, Variant};
use huddle_messaging::UserId;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::advance;

fn spawn_channel() -> huddle_client::ConversationHandle {
    let (transport, _outbox) = ChannelTransport::new();
    let conversation = Conversation::new(
        "C1",
        Variant::PublicChannel,
        Arc::new(transport),
        Arc::new(ClientConfig::default()),
    );
    ConversationRuntime::spawn(conversation)
}

#[tokio::test(start_paused = true)]
async fn typing_user_disappears_after_quiet_period() {
    let handle = spawn_channel();
    let user = UserId::from("U1");
    handle.started_typing(user.clone()).await.unwrap();
    assert!(handle.typing().await.unwrap().contains(&user));

    advance(Duration::from_secs(5) + Duration::from_millis(1)).await;
    assert!(!handle.typing().await.unwrap().contains(&user));
}

#[tokio::test(start_paused = true)]
async fn renewed_signal_keeps_user_past_original_deadline() {
    let handle = spawn_channel();
    let user = UserId::from("U1");
    handle.started_typing(user.clone()).await.unwrap();
    handle.typing().await.unwrap();

    advance(Duration::from_secs(4)).await;
    handle.started_typing(user.clone()).await.unwrap();
    handle.typing().await.unwrap();

    advance(Duration::from_secs(2)).await;
    assert!(handle.typing().await.unwrap().contains(&user));

    advance(Duration::from_secs(4)).await;
    assert!(handle.typing().await.unwrap().is_empty());
}
