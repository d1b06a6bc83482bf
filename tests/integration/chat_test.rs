//! Integration tests for the chat log operations.

mod helpers;

use sharehub_core::error::ErrorKind;
use sharehub_realtime::SendMessageRequest;

#[tokio::test]
async fn test_fresh_room_has_welcome_notice() {
    let app = helpers::TestApp::new();
    let messages = app.chat().list_messages().await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].kind.is_system());
}

#[tokio::test]
async fn test_messages_are_listed_in_order() {
    let app = helpers::TestApp::without_welcome();
    let alice = app.user("alice");
    let bob = app.user("bob");

    app.say(&alice, "hi bob").await;
    app.say(&bob, "hi alice").await;
    app.say(&alice, "dinner at 7?").await;

    let messages = app.chat().list_messages().await;
    let bodies: Vec<_> = messages.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, ["hi bob", "hi alice", "dinner at 7?"]);
    assert!(messages.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let app = helpers::TestApp::new();
    let err = app
        .chat()
        .send_chat_message(
            &app.user("alice"),
            SendMessageRequest {
                body: "\n\t ".to_string(),
                attachment: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.chat().list_messages().await.len(), 1);
}

#[tokio::test]
async fn test_clear_retaining_system_messages() {
    let app = helpers::TestApp::without_welcome();
    let alice = app.user("alice");

    let s1 = app.engine.log.append_system("Grandma joined").await;
    app.say(&alice, "one").await;
    app.say(&alice, "two").await;
    let s2 = app.engine.log.append_system("Grandpa joined").await;
    app.say(&alice, "three").await;

    let outcome = app.chat().clear_messages(&alice, true).await.unwrap();
    assert_eq!((outcome.removed, outcome.retained), (3, 2));

    let remaining = app.chat().list_messages().await;
    assert_eq!(remaining, vec![s1.clone(), s2.clone()]);

    let next = app.say(&alice, "four").await;
    assert!(remaining.iter().all(|m| m.id != next.id));
}

#[tokio::test]
async fn test_full_clear_restarts_with_notice() {
    let app = helpers::TestApp::new();
    let alice = app.user("alice");
    app.say(&alice, "one").await;

    let outcome = app.chat().clear_messages(&alice, false).await.unwrap();
    let notice = outcome.notice.unwrap();
    assert_eq!(notice.id, 1);
    assert_eq!(notice.body, app.config.chat.clear_notice);

    assert_eq!(app.say(&alice, "fresh start").await.id, 2);
}
