/// Simulated delivery pipeline tests
///
/// Time is paused, so the fixed delays elapse instantly and assertions about
/// ordering stay exact: Sending -> Delivered -> typing -> exactly one reply.
use ripple_core::backend::mock::{fixture_conversations, MockBackend};
use ripple_core::engine::ChatEngine;
use ripple_core::thread::MessageThread;
use ripple_core::types::{ChatEvent, Conversation, DeliveryStatus, MessageDirection};
use ripple_core::Config;
use std::time::Duration;

fn jane() -> Conversation {
    fixture_conversations()
        .into_iter()
        .find(|c| c.id == "jane-smith")
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn send_delivers_then_replies_exactly_once() {
    let engine = ChatEngine::new(&Config::default());
    let mut rx = engine.subscribe();
    let backend = MockBackend::instant();
    let conversation = jane();

    let mut thread = MessageThread::new();
    thread.load(conversation.id.clone(), Vec::new());

    let message = engine
        .send(&conversation, "hello there", None, &backend)
        .unwrap();
    assert_eq!(message.status, DeliveryStatus::Sending);
    assert_eq!(message.direction, MessageDirection::Sent);
    thread.append(message.clone());

    let ev = rx.recv().await.unwrap();
    match &ev {
        ChatEvent::DeliveryUpdated {
            message_id, status, ..
        } => {
            assert_eq!(message_id, &message.id);
            assert_eq!(*status, DeliveryStatus::Delivered);
        }
        other => panic!("expected delivery update, got {:?}", other),
    }
    assert!(thread.apply(&ev));
    assert_eq!(thread.messages()[0].status, DeliveryStatus::Delivered);

    let ev = rx.recv().await.unwrap();
    assert!(matches!(ev, ChatEvent::TypingStarted { .. }));
    thread.apply(&ev);
    assert!(thread.is_typing());

    let ev = rx.recv().await.unwrap();
    match &ev {
        ChatEvent::MessageAppended { message, .. } => {
            assert_eq!(message.direction, MessageDirection::Received);
            assert_eq!(message.sender, "Jane Smith");
            assert_eq!(
                message.body,
                "Thanks for your message! This is a simulated response from Jane Smith."
            );
        }
        other => panic!("expected reply, got {:?}", other),
    }
    thread.apply(&ev);

    let ev = rx.recv().await.unwrap();
    assert!(matches!(ev, ChatEvent::TypingStopped { .. }));
    thread.apply(&ev);
    assert!(!thread.is_typing());

    // One sent message plus exactly one synthetic reply
    assert_eq!(thread.messages().len(), 2);

    // And nothing else arrives
    let extra = tokio::time::timeout(Duration::from_secs(30), rx.recv()).await;
    assert!(extra.is_err());
}

#[tokio::test(start_paused = true)]
async fn whitespace_only_drafts_are_rejected() {
    let engine = ChatEngine::new(&Config::default());
    let mut rx = engine.subscribe();
    let backend = MockBackend::instant();
    let conversation = jane();

    assert!(engine.send(&conversation, "", None, &backend).is_none());
    assert!(engine.send(&conversation, "   \t ", None, &backend).is_none());

    let extra = tokio::time::timeout(Duration::from_secs(30), rx.recv()).await;
    assert!(extra.is_err());
}

#[tokio::test(start_paused = true)]
async fn no_reply_mode_stops_after_delivery() {
    let config = Config {
        no_reply: true,
        ..Config::default()
    };
    let engine = ChatEngine::new(&config);
    let mut rx = engine.subscribe();
    let backend = MockBackend::instant();
    let conversation = jane();

    engine
        .send(&conversation, "hello", None, &backend)
        .unwrap();

    let ev = rx.recv().await.unwrap();
    assert!(matches!(
        ev,
        ChatEvent::DeliveryUpdated {
            status: DeliveryStatus::Delivered,
            ..
        }
    ));

    let extra = tokio::time::timeout(Duration::from_secs(30), rx.recv()).await;
    assert!(extra.is_err());
}

#[tokio::test(start_paused = true)]
async fn reply_for_a_left_conversation_is_dropped_by_the_thread() {
    let engine = ChatEngine::new(&Config::default());
    let mut rx = engine.subscribe();
    let backend = MockBackend::instant();
    let conversation = jane();

    let mut thread = MessageThread::new();
    thread.load(conversation.id.clone(), Vec::new());
    let sent = engine
        .send(&conversation, "hello", None, &backend)
        .unwrap();
    thread.append(sent);

    // Switch away before the pipeline finishes
    thread.load("team-project", Vec::new());

    let mut applied = 0;
    for _ in 0..4 {
        let ev = rx.recv().await.unwrap();
        if thread.apply(&ev) {
            applied += 1;
        }
    }
    assert_eq!(applied, 0);
    assert!(thread.messages().is_empty());
}
