//! In-memory document store
//!
//! Keeps notes in process, ordered the same way the remote store orders
//! them. Failures can be injected per operation to exercise degraded paths.

use super::{DocumentStore, NoteQuery, StoreError, StoreResult};
use crate::note::{NewNote, Note};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Store operation, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Create,
    Query,
    Increment,
}

/// In-process store implementing [`DocumentStore`]
pub struct MemoryStore {
    notes: RwLock<Vec<Note>>,
    failures: RwLock<HashMap<StoreOp, fn() -> StoreError>>,
    increments: AtomicUsize,
    queries: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(Vec::new()),
            failures: RwLock::new(HashMap::new()),
            increments: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    /// Create a store pre-populated with `notes`
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: RwLock::new(notes),
            ..Self::new()
        }
    }

    /// Make every call to `op` fail with the error built by `make`
    pub async fn fail(&self, op: StoreOp, make: fn() -> StoreError) {
        self.failures.write().await.insert(op, make);
    }

    /// Clear an injected failure
    pub async fn recover(&self, op: StoreOp) {
        self.failures.write().await.remove(&op);
    }

    /// Look up a stored note by id
    pub async fn get(&self, id: &str) -> Option<Note> {
        self.notes.read().await.iter().find(|n| n.id == id).cloned()
    }

    /// Number of stored notes
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    /// Whether the store holds no notes
    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }

    /// Number of increment calls that reached the store (including failures)
    pub fn increment_calls(&self) -> usize {
        self.increments.load(Ordering::SeqCst)
    }

    /// Number of query calls that reached the store (including failures)
    pub fn query_calls(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    async fn check(&self, op: StoreOp) -> StoreResult<()> {
        match self.failures.read().await.get(&op) {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create_note(&self, note: NewNote) -> StoreResult<Note> {
        self.check(StoreOp::Create).await?;

        let id = uuid::Uuid::new_v4().simple().to_string();
        let note = note.into_note(id, Utc::now());
        self.notes.write().await.push(note.clone());

        tracing::debug!(id = %note.id, "Stored note in memory");
        Ok(note)
    }

    async fn query_notes(&self, query: &NoteQuery) -> StoreResult<Vec<Note>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check(StoreOp::Query).await?;

        let notes = self.notes.read().await;
        let mut page: Vec<Note> = notes
            .iter()
            .filter(|n| query.category.map_or(true, |c| n.category == c))
            .filter(|n| match &query.start_after {
                // Descending order: "after" means strictly older
                Some(cursor) => (n.created_at, &n.id) < (cursor.created_at, &cursor.id),
                None => true,
            })
            .cloned()
            .collect();

        page.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        page.truncate(query.limit);
        Ok(page)
    }

    async fn increment_likes(&self, id: &str) -> StoreResult<()> {
        self.increments.fetch_add(1, Ordering::SeqCst);
        self.check(StoreOp::Increment).await?;

        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("thankyous/{}", id)))?;
        note.likes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Category;
    use chrono::Duration;

    fn note(id: &str, category: Category, minutes_ago: i64) -> Note {
        Note {
            id: id.to_string(),
            message: format!("note {}", id),
            name: "Anonymous".to_string(),
            location: None,
            category,
            likes: 0,
            featured: false,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_query_orders_newest_first_and_limits() {
        let store = MemoryStore::with_notes(vec![
            note("a", Category::Help, 30),
            note("b", Category::Kindness, 10),
            note("c", Category::Help, 20),
        ]);

        let page = store
            .query_notes(&NoteQuery::first_page(None, 2))
            .await
            .unwrap();
        let ids: Vec<_> = page.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_query_filters_and_continues_after_cursor() {
        let store = MemoryStore::with_notes(vec![
            note("a", Category::Help, 30),
            note("b", Category::Kindness, 10),
            note("c", Category::Help, 20),
            note("d", Category::Help, 40),
        ]);

        let first = store
            .query_notes(&NoteQuery::first_page(Some(Category::Help), 1))
            .await
            .unwrap();
        assert_eq!(first[0].id, "c");

        let rest = store
            .query_notes(&NoteQuery::first_page(Some(Category::Help), 10).after(first[0].cursor()))
            .await
            .unwrap();
        let ids: Vec<_> = rest.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_zero_likes() {
        let store = MemoryStore::new();
        let created = store
            .create_note(NewNote {
                message: "Thank you".into(),
                name: "Ana".into(),
                location: Some("Main St".into()),
                category: Category::Kindness,
            })
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.likes, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_increment_and_missing_note() {
        let store = MemoryStore::with_notes(vec![note("a", Category::Help, 1)]);

        store.increment_likes("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().likes, 1);

        let err = store.increment_likes("zzz").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.increment_calls(), 2);
    }

    #[tokio::test]
    async fn test_injected_failure_and_recovery() {
        let store = MemoryStore::with_notes(vec![note("a", Category::Help, 1)]);
        store.fail(StoreOp::Increment, || StoreError::Unavailable).await;

        assert!(matches!(
            store.increment_likes("a").await,
            Err(StoreError::Unavailable)
        ));
        assert_eq!(store.get("a").await.unwrap().likes, 0);

        store.recover(StoreOp::Increment).await;
        store.increment_likes("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().likes, 1);
    }
}
