//! Entry model: the keyed, immutable unit displayed by the viewer.
//!
//! Entries are handed around as `Arc<Entry>` inside an [`EntrySequence`]
//! so that every emission from a history source can replace the whole
//! sequence while the already-seen prefix stays pointer-identical.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Stable identity of an entry, unique within one conversation view
    EntryKey
);

string_id!(
    /// Identifier of the conversation (task attempt) whose history is shown
    ConversationId
);

string_id!(
    /// Identifier of the execution process that produced a structured event
    ProcessId
);

/// Which process stream a raw output chunk came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStream::Stdout => "stdout",
            OutputStream::Stderr => "stderr",
        }
    }
}

/// Discriminant of an entry's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    RawOutput(OutputStream),
    NormalizedEvent,
}

/// Payload carried by an entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryPayload {
    /// Opaque text chunk from a process stream
    Raw { stream: OutputStream, text: String },
    /// Opaque structured event plus the process that produced it
    Event { event: Value, process_id: ProcessId },
}

/// One displayable unit in the conversation/log sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    key: EntryKey,
    payload: EntryPayload,
}

impl Entry {
    pub fn new(key: impl Into<EntryKey>, payload: EntryPayload) -> Self {
        Self { key: key.into(), payload }
    }

    pub fn stdout(key: impl Into<EntryKey>, text: impl Into<String>) -> Self {
        Self::new(key, EntryPayload::Raw { stream: OutputStream::Stdout, text: text.into() })
    }

    pub fn stderr(key: impl Into<EntryKey>, text: impl Into<String>) -> Self {
        Self::new(key, EntryPayload::Raw { stream: OutputStream::Stderr, text: text.into() })
    }

    pub fn event(key: impl Into<EntryKey>, event: Value, process_id: impl Into<ProcessId>) -> Self {
        Self::new(key, EntryPayload::Event { event, process_id: process_id.into() })
    }

    pub fn key(&self) -> &EntryKey {
        &self.key
    }

    pub fn payload(&self) -> &EntryPayload {
        &self.payload
    }

    pub fn kind(&self) -> EntryKind {
        match &self.payload {
            EntryPayload::Raw { stream, .. } => EntryKind::RawOutput(*stream),
            EntryPayload::Event { .. } => EntryKind::NormalizedEvent,
        }
    }
}

/// Ordered, immutable snapshot of a conversation's entries
///
/// Cloning is a reference-count bump. Order is arrival order and is never
/// re-sorted downstream.
#[derive(Debug, Clone, Default)]
pub struct EntrySequence(Arc<[Arc<Entry>]>);

impl EntrySequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Entry>> {
        self.0.get(index)
    }

    pub fn last(&self) -> Option<&Arc<Entry>> {
        self.0.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Entry>> {
        self.0.iter()
    }

    /// Number of leading entries that are pointer-identical in both sequences
    pub fn shared_prefix_len(&self, other: &EntrySequence) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| Arc::ptr_eq(a, b))
            .count()
    }
}

impl Deref for EntrySequence {
    type Target = [Arc<Entry>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Arc<Entry>>> for EntrySequence {
    fn from(entries: Vec<Arc<Entry>>) -> Self {
        Self(entries.into())
    }
}

impl From<Vec<Entry>> for EntrySequence {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries.into_iter().map(Arc::new).collect())
    }
}

impl FromIterator<Entry> for EntrySequence {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self(iter.into_iter().map(Arc::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_kind() {
        assert_eq!(Entry::stdout("a", "hi").kind(), EntryKind::RawOutput(OutputStream::Stdout));
        assert_eq!(Entry::stderr("b", "oops").kind(), EntryKind::RawOutput(OutputStream::Stderr));
        assert_eq!(
            Entry::event("c", json!({"type": "tool_use"}), "proc-1").kind(),
            EntryKind::NormalizedEvent
        );
    }

    #[test]
    fn test_entry_key_display() {
        let entry = Entry::stdout("patch-7", "line");
        assert_eq!(entry.key().as_str(), "patch-7");
        assert_eq!(entry.key().to_string(), "patch-7");
    }

    #[test]
    fn test_sequence_from_entries() {
        let seq: EntrySequence = (0..3).map(|i| Entry::stdout(format!("k{}", i), "x")).collect();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.last().map(|e| e.key().as_str()), Some("k2"));
        assert!(!seq.is_empty());
        assert!(EntrySequence::new().is_empty());
    }

    #[test]
    fn test_shared_prefix_len() {
        let a = Arc::new(Entry::stdout("a", "1"));
        let b = Arc::new(Entry::stdout("b", "2"));
        let b2 = Arc::new(Entry::stdout("b", "2 (edited)"));
        let c = Arc::new(Entry::stdout("c", "3"));

        let first = EntrySequence::from(vec![a.clone(), b.clone()]);
        let grown = EntrySequence::from(vec![a.clone(), b, c.clone()]);
        let refreshed = EntrySequence::from(vec![a, b2, c]);

        assert_eq!(first.shared_prefix_len(&grown), 2);
        assert_eq!(first.shared_prefix_len(&refreshed), 1);
    }

    #[test]
    fn test_output_stream_serde() {
        let stream: OutputStream = serde_json::from_str("\"stderr\"").unwrap();
        assert_eq!(stream, OutputStream::Stderr);
        assert_eq!(stream.as_str(), "stderr");
    }
}
