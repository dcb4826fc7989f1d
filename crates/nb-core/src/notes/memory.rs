use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{NoteId, UserId},
    notes::{checked_offset, enumerate_notes, filter_matching, ListedNote, Note, NoteStore},
    Result,
};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    by_user: HashMap<UserId, Vec<Note>>,
}

/// Non-persistent store: notes live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    inner: Mutex<Inner>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn texts(&self, user_id: UserId) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner
            .by_user
            .get(&user_id)
            .map(|notes| notes.iter().map(|n| n.text.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn add(&self, user_id: UserId, text: &str) -> Result<usize> {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let id = NoteId(inner.next_id);
        let notes = inner.by_user.entry(user_id).or_default();
        notes.push(Note {
            id,
            text: text.to_string(),
        });
        Ok(notes.len())
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<ListedNote>> {
        Ok(enumerate_notes(self.texts(user_id).await))
    }

    async fn delete_at(&self, user_id: UserId, position: i64) -> Result<String> {
        let mut inner = self.inner.lock().await;
        let count = inner.by_user.get(&user_id).map_or(0, Vec::len);
        let offset = checked_offset(position, count)?;
        let notes = inner.by_user.entry(user_id).or_default();
        let removed = notes.remove(offset);
        if notes.is_empty() {
            inner.by_user.remove(&user_id);
        }
        Ok(removed.text)
    }

    async fn clear(&self, user_id: UserId) -> Result<()> {
        self.inner.lock().await.by_user.remove(&user_id);
        Ok(())
    }

    async fn search(&self, user_id: UserId, query: &str) -> Result<Vec<ListedNote>> {
        filter_matching(self.list(user_id).await?, query)
    }

    async fn count(&self, user_id: UserId) -> Result<usize> {
        let inner = self.inner.lock().await;
        Ok(inner.by_user.get(&user_id).map_or(0, Vec::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::conformance;

    #[tokio::test]
    async fn memory_store_conformance() {
        let store = MemoryNoteStore::new();
        conformance::run_all(&store).await;
    }

    #[tokio::test]
    async fn ids_are_unique_across_users() {
        let store = MemoryNoteStore::new();
        store.add(UserId(1), "a").await.unwrap();
        store.add(UserId(2), "b").await.unwrap();
        store.add(UserId(1), "c").await.unwrap();

        let inner = store.inner.lock().await;
        let mut ids: Vec<i64> = inner
            .by_user
            .values()
            .flat_map(|notes| notes.iter().map(|n| n.id.0))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
