//! End-to-end scenarios for unlock progress and chat session persistence.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tourguide_core::{
    ChatSession, ChatSessionStore, Message, ProgressContext, UnlockTracker,
};
use tourguide_storage::{KeyValueStore, MemoryKeyValueStore};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, hour, minute, 0)
        .single()
        .expect("timestamp")
}

fn stores() -> (Arc<UnlockTracker>, Arc<ChatSessionStore>) {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
    (
        Arc::new(UnlockTracker::new(kv.clone())),
        Arc::new(ChatSessionStore::new(kv)),
    )
}

/// Unlocking the same building twice leaves one entry.
#[tokio::test]
async fn unlocking_twice_keeps_a_single_entry() {
    let (tracker, chats) = stores();
    let context = ProgressContext::load(tracker.clone(), chats).await;

    assert!(context.unlock_building("Tepper").await);
    assert!(!context.unlock_building("Tepper").await);

    assert_eq!(context.unlocked_buildings(), vec!["Tepper".to_string()]);
    assert_eq!(tracker.get_unlocked().await, vec!["Tepper".to_string()]);
}

/// The recognition sentinel never changes progress.
#[tokio::test]
async fn unrecognized_scan_unlocks_nothing() {
    let (tracker, chats) = stores();
    let context = ProgressContext::load(tracker.clone(), chats).await;

    for _ in 0..3 {
        assert!(!context.unlock_building("Error").await);
        tracker.unlock("Error").await.expect("unlock");
    }

    assert!(context.unlocked_buildings().is_empty());
    assert!(tracker.get_unlocked().await.is_empty());
    assert!(!context.is_unlocked("Error"));
}

/// Re-saving a session with an appended message keeps one index entry.
#[tokio::test]
async fn resaving_a_growing_session_keeps_one_index_entry() {
    let (_tracker, chats) = stores();
    let mut session = ChatSession::from_messages(
        "c1",
        vec![
            Message::new("Welcome!", false, at(10, 0)),
            Message::new("What is this?", true, at(10, 1)),
        ],
        None,
    );
    chats.save_session(&session).await.expect("save");
    session.push(Message::new("This is the Cut.", false, at(10, 2)));
    chats.save_session(&session).await.expect("save again");

    let loaded = chats.get_session("c1").await.expect("get").expect("session");
    let times: Vec<_> = loaded.messages.iter().map(|m| m.timestamp).collect();
    assert_eq!(times, vec![at(10, 0), at(10, 1), at(10, 2)]);
    assert_eq!(chats.session_ids().await.expect("ids"), vec!["c1".to_string()]);
    assert_eq!(chats.get_all_sessions().await.expect("all").len(), 1);
}

/// Listing orders by last update, not by index insertion order.
#[tokio::test]
async fn listing_orders_by_last_update() {
    let (_tracker, chats) = stores();
    let b = ChatSession::from_messages("b", vec![Message::new("b", true, at(10, 5))], None);
    let a = ChatSession::from_messages("a", vec![Message::new("a", true, at(10, 0))], None);
    chats.save_session(&b).await.expect("save b");
    chats.save_session(&a).await.expect("save a");

    assert_eq!(
        chats.session_ids().await.expect("ids"),
        vec!["a".to_string(), "b".to_string()]
    );
    let ids: Vec<_> = chats
        .get_all_sessions()
        .await
        .expect("all")
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);
}

/// Clearing all sessions leaves nothing to list.
#[tokio::test]
async fn clearing_all_sessions_empties_the_listing() {
    let (tracker, chats) = stores();
    let context = ProgressContext::load(tracker, chats).await;
    for (id, minute) in [("x", 1), ("y", 2), ("z", 3)] {
        let session =
            ChatSession::from_messages(id, vec![Message::new(id, true, at(11, minute))], None);
        context.save_chat_session(&session).await.expect("save");
    }

    context.clear_all_chat_sessions().await.expect("clear");
    assert!(context.get_all_chat_sessions().await.expect("all").is_empty());
    assert_eq!(context.get_chat_session("x").await.expect("get"), None);
}

/// Timestamps survive a save/load round trip to the millisecond.
#[tokio::test]
async fn timestamps_round_trip_to_the_millisecond() {
    let (_tracker, chats) = stores();
    let base = Utc
        .timestamp_millis_opt(1_714_557_600_123)
        .single()
        .expect("base");
    let messages: Vec<_> = (0..5)
        .map(|idx| Message::new(format!("m{idx}"), idx % 2 == 0, base + Duration::milliseconds(idx * 997)))
        .collect();
    let session = ChatSession::from_messages("rt", messages, Some("file:///photo.jpg".to_string()));
    chats.save_session(&session).await.expect("save");

    let loaded = chats.get_session("rt").await.expect("get").expect("session");
    assert_eq!(loaded, session);
}

/// Sub-millisecond precision is dropped, not rounded into a different instant.
#[tokio::test]
async fn sub_millisecond_precision_is_truncated() {
    let (_tracker, chats) = stores();
    let precise = Utc
        .timestamp_opt(1_714_557_600, 123_456_789)
        .single()
        .expect("precise");
    let session = ChatSession::from_messages("p", vec![Message::new("hi", true, precise)], None);
    chats.save_session(&session).await.expect("save");

    let loaded = chats.get_session("p").await.expect("get").expect("session");
    assert_eq!(
        loaded.messages[0].timestamp.timestamp_millis(),
        precise.timestamp_millis()
    );
}

/// Every id left in the index after a mix of operations resolves or is skipped.
#[tokio::test]
async fn index_stays_consistent_across_mixed_operations() {
    let (_tracker, chats) = stores();
    for (idx, id) in ["a", "b", "c", "d"].into_iter().enumerate() {
        let session = ChatSession::from_messages(
            id,
            vec![Message::new(id, true, at(12, idx as u32))],
            None,
        );
        chats.save_session(&session).await.expect("save");
    }
    chats.delete_session("b").await.expect("delete");
    chats.clear_all().await.expect("clear");
    let e = ChatSession::from_messages("e", vec![Message::new("e", true, at(13, 0))], None);
    chats.save_session(&e).await.expect("save e");
    chats.delete_session("a").await.expect("delete stale");

    let ids = chats.session_ids().await.expect("ids");
    assert_eq!(ids, vec!["e".to_string()]);
    for id in ids {
        assert!(chats.get_session(&id).await.expect("get").is_some());
    }
}

/// Reset empties both the mirror and durable state.
#[tokio::test]
async fn reset_clears_progress() {
    let (tracker, chats) = stores();
    let context = ProgressContext::load(tracker.clone(), chats).await;
    context.unlock_building("Gates").await;
    context.unlock_building("Hunt").await;

    context.clear_storage().await.expect("clear");
    assert!(context.unlocked_buildings().is_empty());
    assert!(!context.is_unlocked("Gates"));
    assert!(!context.is_loading());
    assert!(tracker.get_unlocked().await.is_empty());
}
