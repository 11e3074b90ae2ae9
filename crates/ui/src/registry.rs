//! Read-only broadcast of the active view's entries.
//!
//! [`SharedEntries`] is owned by exactly one view and is the only writer.
//! Cooperating features (the jump-to search) hold an [`EntriesReader`]
//! handed out by that view, so two views never share a registry.

use std::sync::{Arc, PoisonError, RwLock};
use tailview_core::{ConversationId, Entry, EntryKey, EntryPayload, EntrySequence};

#[derive(Debug, Default)]
struct Published {
    conversation: Option<ConversationId>,
    entries: EntrySequence,
    version: u64,
}

/// Writer half, held by the owning view
#[derive(Debug, Default)]
pub struct SharedEntries {
    inner: Arc<RwLock<Published>>,
}

impl SharedEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published sequence.
    pub fn set_entries(&self, conversation: &ConversationId, entries: EntrySequence) {
        let mut published = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        published.conversation = Some(conversation.clone());
        published.entries = entries;
        published.version += 1;
    }

    pub fn reset(&self) {
        let mut published = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        published.conversation = None;
        published.entries = EntrySequence::new();
        published.version += 1;
    }

    pub fn reader(&self) -> EntriesReader {
        EntriesReader { inner: Arc::clone(&self.inner) }
    }
}

impl Drop for SharedEntries {
    fn drop(&mut self) {
        self.reset();
    }
}

/// Reader half; cloning is cheap
#[derive(Debug, Clone)]
pub struct EntriesReader {
    inner: Arc<RwLock<Published>>,
}

impl EntriesReader {
    pub fn snapshot(&self) -> EntrySequence {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).entries.clone()
    }

    /// Bumped on every publish or reset
    pub fn version(&self) -> u64 {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).version
    }

    pub fn conversation(&self) -> Option<ConversationId> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).conversation.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self, key: &EntryKey) -> Option<usize> {
        let published = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        published.entries.iter().position(|entry| entry.key() == key)
    }

    /// Indices of entries whose text contains `needle` (case-insensitive)
    pub fn find(&self, needle: &str) -> Vec<usize> {
        let needle = needle.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let entries = self.snapshot();
        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| searchable_text(entry).to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect()
    }
}

fn searchable_text(entry: &Entry) -> String {
    match entry.payload() {
        EntryPayload::Raw { text, .. } => text.clone(),
        EntryPayload::Event { event, .. } => event.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sequence() -> EntrySequence {
        vec![
            Entry::stdout("a", "compiling tailview"),
            Entry::event("b", json!({"content": "Running Tests"}), "proc-1"),
            Entry::stderr("c", "warning: unused"),
        ]
        .into()
    }

    #[test]
    fn test_set_and_reset() {
        let registry = SharedEntries::new();
        let reader = registry.reader();
        assert!(reader.is_empty());
        assert_eq!(reader.conversation(), None);

        registry.set_entries(&ConversationId::new("att-1"), sequence());
        assert_eq!(reader.len(), 3);
        assert_eq!(reader.conversation(), Some(ConversationId::new("att-1")));
        assert_eq!(reader.version(), 1);

        registry.reset();
        assert!(reader.is_empty());
        assert_eq!(reader.conversation(), None);
        assert_eq!(reader.version(), 2);
    }

    #[test]
    fn test_snapshot_shares_entries() {
        let registry = SharedEntries::new();
        let entries = sequence();
        registry.set_entries(&ConversationId::new("att-1"), entries.clone());

        let snapshot = registry.reader().snapshot();
        assert_eq!(entries.shared_prefix_len(&snapshot), 3);
    }

    #[test]
    fn test_find_and_position() {
        let registry = SharedEntries::new();
        registry.set_entries(&ConversationId::new("att-1"), sequence());
        let reader = registry.reader();

        assert_eq!(reader.find("running"), vec![1]);
        assert_eq!(reader.find("N"), vec![0, 1, 2]);
        assert!(reader.find("").is_empty());
        assert_eq!(reader.position(&EntryKey::new("c")), Some(2));
        assert_eq!(reader.position(&EntryKey::new("zzz")), None);
    }

    #[test]
    fn test_drop_clears_readers() {
        let registry = SharedEntries::new();
        registry.set_entries(&ConversationId::new("att-1"), sequence());
        let reader = registry.reader();

        drop(registry);
        assert!(reader.is_empty());
    }
}
