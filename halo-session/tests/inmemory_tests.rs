use halo_core::{Redaction, TurnKind};
use halo_session::*;
use serde_json::json;
use std::sync::Arc;

fn meta() -> UserProfile {
    UserProfile::from([("name".to_string(), json!("Sari"))])
}

#[tokio::test]
async fn get_or_create_returns_same_conversation() {
    let repo = InMemoryConversationRepository::new();
    let first = repo.get_or_create("telegram:123", "telegram", meta()).await.unwrap();
    let second = repo.get_or_create("telegram:123", "telegram", UserProfile::new()).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.user_profile["name"], json!("Sari"));
    assert_eq!(second.channel, "telegram");
    assert!(second.locale.is_none());
}

#[tokio::test]
async fn concurrent_first_messages_create_one_conversation() {
    let repo = Arc::new(InMemoryConversationRepository::new());
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.get_or_create("web:race", "web", UserProfile::new()).await.unwrap().id
            })
        })
        .collect();

    let ids: Vec<String> =
        futures::future::join_all(handles).await.into_iter().map(|r| r.unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(repo.conversation_count().await, 1);
}

#[tokio::test]
async fn history_and_transcript_are_oldest_first() {
    let repo = InMemoryConversationRepository::new();
    let conv = repo.get_or_create("web:1", "web", UserProfile::new()).await.unwrap();

    let redactions = vec![Redaction::new("email", "sari@example.com")];
    let stored = repo
        .append_message(&conv.id, Role::User, "email saya <email_redacted>", redactions.clone())
        .await
        .unwrap();
    assert_eq!(stored.pii_redactions, redactions);
    repo.append_message(&conv.id, Role::Assistant, "Terima kasih", vec![]).await.unwrap();

    let turns = repo.history_as_turns(&conv.id).await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].kind, TurnKind::Human);
    assert_eq!(turns[1].kind, TurnKind::Ai);

    let transcript = repo.transcript(&conv.id).await.unwrap();
    assert_eq!(transcript, "User: email saya <email_redacted>\nAssistant: Terima kasih");
}

#[tokio::test]
async fn append_to_unknown_conversation_fails() {
    let repo = InMemoryConversationRepository::new();
    let err = repo.append_message("missing", Role::User, "hi", vec![]).await.unwrap_err();
    assert!(matches!(err, halo_core::HaloError::Session(_)));
}

#[tokio::test]
async fn update_profile_merges_and_sets_locale() {
    let repo = InMemoryConversationRepository::new();
    let conv = repo.get_or_create("whatsapp:62811", "whatsapp", meta()).await.unwrap();

    let updated = repo
        .update_profile(
            &conv.id,
            UserProfile::from([("tier".to_string(), json!("gold"))]),
            Some("en".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(updated.user_profile.len(), 2);
    assert_eq!(updated.locale.as_deref(), Some("en"));

    let reread = repo.find_by_session("whatsapp:62811").await.unwrap().unwrap();
    assert_eq!(reread, updated);
}
