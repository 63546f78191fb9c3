//! Contract tests for conversation persistence

use flychat::{
    ChatMessage, Conversation, ConversationStore, InMemoryConversationStore, InMemoryKeyValue,
    KeyValueStore, KvConversationStore, DEFAULT_TITLE,
};
use std::time::Duration;

#[tokio::test]
async fn roundtrip_preserves_order_and_content() {
    let store = InMemoryConversationStore::in_memory();
    let mut conversation = Conversation::new();
    conversation.push(ChatMessage::bot("Welcome!"));
    conversation.push(ChatMessage::user("find flights from Delhi to Mumbai"));
    conversation.push(ChatMessage::bot("I found 7 flights from Delhi to Mumbai."));
    conversation.push(ChatMessage::user("book it, my name is Asha"));

    store.save(&conversation).await.unwrap();
    let loaded = store.load(&conversation.id).await.unwrap().unwrap();

    let texts: Vec<&str> = loaded.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Welcome!",
            "find flights from Delhi to Mumbai",
            "I found 7 flights from Delhi to Mumbai.",
            "book it, my name is Asha",
        ]
    );
    assert_eq!(loaded.messages, conversation.messages);
}

#[tokio::test]
async fn titles_derive_from_first_user_message() {
    let store = InMemoryConversationStore::in_memory();

    let mut untitled = Conversation::new();
    untitled.push(ChatMessage::bot("Welcome!"));
    store.save(&untitled).await.unwrap();

    let mut titled = Conversation::new();
    titled.push(ChatMessage::bot("Welcome!"));
    titled.push(ChatMessage::user(
        "find flights from Delhi to Mumbai tomorrow please",
    ));
    store.save(&titled).await.unwrap();

    let summaries = store.list_summaries().await.unwrap();
    let find = |id| {
        summaries
            .iter()
            .find(|s| &s.id == id)
            .map(|s| s.title.clone())
            .unwrap()
    };

    assert_eq!(find(&untitled.id), DEFAULT_TITLE);
    let title = find(&titled.id);
    assert_eq!(title, "find flights from Delhi to Mu");
    assert_eq!(title.chars().count(), 30);
}

#[tokio::test]
async fn summaries_are_newest_first_and_track_updates() {
    let store = InMemoryConversationStore::in_memory();

    let mut first = Conversation::new();
    first.push(ChatMessage::user("first"));
    store.save(&first).await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    let mut second = Conversation::new();
    second.push(ChatMessage::user("second"));
    store.save(&second).await.unwrap();

    let summaries = store.list_summaries().await.unwrap();
    assert_eq!(summaries[0].id, second.id);

    // touching the first conversation moves it to the top
    tokio::time::sleep(Duration::from_millis(5)).await;
    first.push(ChatMessage::bot("reply"));
    store.save(&first).await.unwrap();

    let summaries = store.list_summaries().await.unwrap();
    assert_eq!(summaries[0].id, first.id);
    assert_eq!(summaries.len(), 2);
}

#[tokio::test]
async fn delete_is_complete_and_idempotent() {
    let store = InMemoryConversationStore::in_memory();
    let mut conversation = Conversation::new();
    conversation.push(ChatMessage::user("hello"));
    store.save(&conversation).await.unwrap();

    store.delete(&conversation.id).await.unwrap();
    store.delete(&conversation.id).await.unwrap();

    assert!(store.load(&conversation.id).await.unwrap().is_none());
    assert!(store.list_summaries().await.unwrap().is_empty());
}

#[tokio::test]
async fn custom_prefix_scopes_keys() {
    let kv = InMemoryKeyValue::new();
    let store = KvConversationStore::with_prefix(kv.clone(), "myapp");

    let mut conversation = Conversation::new();
    conversation.push(ChatMessage::user("hello"));
    store.save(&conversation).await.unwrap();

    let key = format!("myapp_{}", conversation.id);
    assert!(kv.get(&key).await.unwrap().is_some());
    assert!(kv.get("myapp_conversations").await.unwrap().is_some());
}

#[tokio::test]
async fn stores_sharing_a_backend_see_each_other() {
    let kv = InMemoryKeyValue::new();
    let writer = KvConversationStore::new(kv.clone());
    let reader = KvConversationStore::new(kv);

    let mut conversation = Conversation::new();
    conversation.push(ChatMessage::user("shared"));
    writer.save(&conversation).await.unwrap();

    let loaded = reader.load(&conversation.id).await.unwrap().unwrap();
    assert_eq!(loaded.messages.len(), 1);
}
