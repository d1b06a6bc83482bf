//! Integration tests for subscriber fan-out through the hub.

mod helpers;

use sharehub_core::config::AppConfig;
use sharehub_realtime::{HubEvent, SubscriberState};

fn chat_bodies(events: &[HubEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| e.as_chat().map(|m| m.body.clone()))
        .collect()
}

#[tokio::test]
async fn test_late_subscriber_gets_history_first() {
    let app = helpers::TestApp::without_welcome();
    let alice = app.user("alice");
    for i in 1..=5 {
        app.say(&alice, &format!("m{i}")).await;
    }

    let mut sub = app.chat().subscribe().await.unwrap();
    assert_eq!(sub.replayed(), 5);
    app.say(&alice, "m6").await;

    assert_eq!(
        chat_bodies(&sub.drain()),
        ["m1", "m2", "m3", "m4", "m5", "m6"]
    );
}

#[tokio::test]
async fn test_slow_subscriber_is_dropped() {
    let mut config = AppConfig::default();
    config.chat.welcome_message = None;
    config.realtime.subscriber_queue_capacity = 2;
    let app = helpers::TestApp::with_config(config);
    let alice = app.user("alice");

    let mut fast_a = app.chat().subscribe().await.unwrap();
    let mut fast_b = app.chat().subscribe().await.unwrap();
    let slow = app.chat().subscribe().await.unwrap();

    for i in 1..=3 {
        app.say(&alice, &format!("m{i}")).await;
        fast_a.drain();
        fast_b.drain();
    }

    assert_eq!(slow.state(), SubscriberState::Closed);
    assert_eq!(app.engine.hub.subscriber_count().await.unwrap(), 2);
    assert_eq!(app.engine.metrics.snapshot().dropped_overflow, 1);

    app.say(&alice, "m4").await;
    assert_eq!(chat_bodies(&fast_a.drain()), ["m4"]);
    assert_eq!(chat_bodies(&fast_b.drain()), ["m4"]);
}

#[tokio::test]
async fn test_clear_reaches_subscribers() {
    let app = helpers::TestApp::without_welcome();
    let alice = app.user("alice");
    app.say(&alice, "before").await;

    let mut sub = app.chat().subscribe().await.unwrap();
    sub.drain();

    app.chat().clear_messages(&alice, false).await.unwrap();
    let events = sub.drain();
    assert!(matches!(events[0], HubEvent::Cleared { removed: 1, .. }));
    assert_eq!(chat_bodies(&events[1..]), [app.config.chat.clear_notice.clone()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_all_subscribers_see_same_order() {
    let app = helpers::TestApp::without_welcome();
    let mut subs = Vec::new();
    for _ in 0..3 {
        subs.push(app.chat().subscribe().await.unwrap());
    }

    let senders: Vec<_> = (0..4)
        .map(|n| {
            let engine = std::sync::Arc::clone(&app.engine);
            let ctx = app.user(&format!("user{n}"));
            tokio::spawn(async move {
                for i in 0..10 {
                    engine
                        .chat
                        .send_chat_message(
                            &ctx,
                            sharehub_realtime::SendMessageRequest {
                                body: format!("{n}-{i}"),
                                attachment: None,
                            },
                        )
                        .await
                        .unwrap();
                }
            })
        })
        .collect();
    for result in futures::future::join_all(senders).await {
        result.unwrap();
    }

    let seen: Vec<Vec<String>> = subs.iter_mut().map(|s| chat_bodies(&s.drain())).collect();
    assert_eq!(seen[0].len(), 40);
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[1], seen[2]);
}

#[tokio::test]
async fn test_unsubscribe_and_shutdown() {
    let app = helpers::TestApp::new();
    let mut sub = app.chat().subscribe().await.unwrap();
    let other = app.chat().subscribe().await.unwrap();

    app.chat().unsubscribe(sub.id());
    app.chat().unsubscribe(sub.id());
    assert_eq!(app.engine.hub.subscriber_count().await.unwrap(), 1);

    // History queued before the disconnect is drained, then the stream ends.
    while sub.recv().await.is_some() {}
    assert_eq!(sub.state(), SubscriberState::Closed);

    app.engine.shutdown().await.unwrap();
    assert_eq!(other.state(), SubscriberState::Closed);
}
