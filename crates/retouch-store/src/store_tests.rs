use super::*;
use tempfile::TempDir;

const ORIGIN: &str = "https://example.com";

#[tokio::test]
async fn test_memory_store_mode_round_trip() {
    let store = MemoryEditStore::new();
    assert!(!store.selection_mode(ORIGIN).await.unwrap());
    store.set_selection_mode(ORIGIN, true).await.unwrap();
    assert!(store.selection_mode(ORIGIN).await.unwrap());
    assert!(!store.selection_mode("https://other.test").await.unwrap());
}

#[tokio::test]
async fn test_memory_store_credential() {
    let store = MemoryEditStore::new();
    assert!(store.credential().await.unwrap().is_none());
    store.set_credential("key-123").await.unwrap();
    assert_eq!(store.credential().await.unwrap().as_deref(), Some("key-123"));
}

#[tokio::test]
async fn test_upsert_overwrites_same_selector() {
    let store = MemoryEditStore::new();
    store
        .upsert_mutation(ORIGIN, PersistedMutation::new("#title", "<h1>a</h1>"))
        .await
        .unwrap();
    store
        .upsert_mutation(ORIGIN, PersistedMutation::new("#title", "<h1>b</h1>"))
        .await
        .unwrap();

    let mutations = store.mutations(ORIGIN).await.unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].markup, "<h1>b</h1>");
}

#[tokio::test]
async fn test_cap_evicts_oldest() {
    let store = MemoryEditStore::new();
    for i in 0..=MAX_MUTATIONS_PER_ORIGIN {
        store
            .upsert_mutation(
                ORIGIN,
                PersistedMutation::new(format!("#node-{i}"), "<p>x</p>"),
            )
            .await
            .unwrap();
    }

    let mutations = store.mutations(ORIGIN).await.unwrap();
    assert_eq!(mutations.len(), MAX_MUTATIONS_PER_ORIGIN);
    // The first-inserted selector is the one that was evicted.
    assert!(!mutations.iter().any(|m| m.selector == "#node-0"));
    assert!(mutations.iter().any(|m| m.selector == "#node-1"));
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileEditStore::new(temp_dir.path()).await.unwrap();

    store.set_selection_mode(ORIGIN, true).await.unwrap();
    store
        .upsert_mutation(ORIGIN, PersistedMutation::new("#title", "<h1>t</h1>"))
        .await
        .unwrap();
    store.set_credential("secret").await.unwrap();

    // A second store over the same directory sees everything.
    let reopened = FileEditStore::new(temp_dir.path()).await.unwrap();
    assert!(reopened.selection_mode(ORIGIN).await.unwrap());
    assert_eq!(
        reopened.credential().await.unwrap().as_deref(),
        Some("secret")
    );
    let mutations = reopened.mutations(ORIGIN).await.unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].selector, "#title");
}

#[tokio::test]
async fn test_file_store_origins_are_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileEditStore::new(temp_dir.path()).await.unwrap();

    store
        .upsert_mutation(ORIGIN, PersistedMutation::new("#a", "<p>a</p>"))
        .await
        .unwrap();
    store
        .upsert_mutation("https://other.test", PersistedMutation::new("#b", "<p>b</p>"))
        .await
        .unwrap();

    assert_eq!(store.mutations(ORIGIN).await.unwrap().len(), 1);
    assert_eq!(store.mutations("https://other.test").await.unwrap().len(), 1);

    store.clear_origin(ORIGIN).await.unwrap();
    assert!(store.mutations(ORIGIN).await.unwrap().is_empty());
    assert_eq!(store.mutations("https://other.test").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_store_survives_corrupt_origin_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileEditStore::new(temp_dir.path()).await.unwrap();
    store.set_selection_mode(ORIGIN, true).await.unwrap();

    let path = temp_dir
        .path()
        .join("origins")
        .join(format!("{}.json", FileEditStore::sanitize_origin(ORIGIN)));
    std::fs::write(&path, "not json").unwrap();

    // Corrupt state reads as defaults rather than failing.
    assert!(!store.selection_mode(ORIGIN).await.unwrap());
    assert!(store.mutations(ORIGIN).await.unwrap().is_empty());
}

#[test]
fn test_sanitize_origin() {
    assert_eq!(
        FileEditStore::sanitize_origin("https://example.com:8080"),
        "https___example.com_8080"
    );
    assert_eq!(FileEditStore::sanitize_origin("localhost"), "localhost");
}

#[tokio::test]
async fn test_mutations_ordered_oldest_first() {
    let store = MemoryEditStore::new();
    let mut first = PersistedMutation::new("#a", "<p>a</p>");
    let mut second = PersistedMutation::new("#b", "<p>b</p>");
    first.updated_at = chrono::Utc::now() - chrono::Duration::seconds(10);
    second.updated_at = chrono::Utc::now();
    store.upsert_mutation(ORIGIN, second).await.unwrap();
    store.upsert_mutation(ORIGIN, first).await.unwrap();

    let mutations = store.mutations(ORIGIN).await.unwrap();
    assert_eq!(mutations[0].selector, "#a");
    assert_eq!(mutations[1].selector, "#b");
}
