use crate::entry::{ConversationId, Entry, EntryKey, EntryPayload, EntrySequence, OutputStream, ProcessId};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// One line of the JSONL patch stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub conversation: ConversationId,
    pub key: EntryKey,
    #[serde(flatten)]
    pub body: PatchBody,
}

/// Typed body of a patch line, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatchBody {
    Stdout { content: String },
    Stderr { content: String },
    NormalizedEntry { content: Value, execution_process_id: ProcessId },
}

impl PatchRecord {
    pub fn into_entry(self) -> Entry {
        let payload = match self.body {
            PatchBody::Stdout { content } => EntryPayload::Raw { stream: OutputStream::Stdout, text: content },
            PatchBody::Stderr { content } => EntryPayload::Raw { stream: OutputStream::Stderr, text: content },
            PatchBody::NormalizedEntry { content, execution_process_id } => {
                EntryPayload::Event { event: content, process_id: execution_process_id }
            }
        };
        Entry::new(self.key, payload)
    }
}

/// Outcome of applying one entry to an [`EntryLog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// New key, appended at the tail
    Added,
    /// Known key, content replaced at its original position
    Replaced,
    /// Known key with identical content
    Unchanged,
}

/// Ordered, key-deduplicated accumulation of entries
///
/// A repeated key never moves; it replaces the earlier entry in place with a
/// fresh `Arc` so downstream caches see the identity change.
#[derive(Debug, Default)]
pub struct EntryLog {
    entries: Vec<Arc<Entry>>,
    positions: HashMap<EntryKey, usize>,
}

impl EntryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn apply(&mut self, entry: Entry) -> Applied {
        match self.positions.get(entry.key()) {
            Some(&index) if *self.entries[index] == entry => Applied::Unchanged,
            Some(&index) => {
                self.entries[index] = Arc::new(entry);
                Applied::Replaced
            }
            None => {
                self.positions.insert(entry.key().clone(), self.entries.len());
                self.entries.push(Arc::new(entry));
                Applied::Added
            }
        }
    }

    pub fn snapshot(&self) -> EntrySequence {
        EntrySequence::from(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_stdout_record() {
        let line = r#"{"conversation":"att-1","key":"p1","type":"STDOUT","content":"hello"}"#;
        let record: PatchRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.conversation.as_str(), "att-1");
        assert_eq!(record.body, PatchBody::Stdout { content: "hello".to_string() });

        let entry = record.into_entry();
        assert_eq!(entry.key().as_str(), "p1");
        assert_eq!(
            entry.payload(),
            &EntryPayload::Raw { stream: OutputStream::Stdout, text: "hello".to_string() }
        );
    }

    #[test]
    fn test_parse_normalized_record() {
        let line = r#"{"conversation":"att-1","key":"n1","type":"NORMALIZED_ENTRY","content":{"entry_type":{"type":"assistant_message"},"content":"Done"},"execution_process_id":"proc-9"}"#;
        let record: PatchRecord = serde_json::from_str(line).unwrap();
        let entry = record.into_entry();

        match entry.payload() {
            EntryPayload::Event { event, process_id } => {
                assert_eq!(process_id.as_str(), "proc-9");
                assert_eq!(event["content"], json!("Done"));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let line = r#"{"conversation":"att-1","key":"x","type":"DIFF","content":"?"}"#;
        assert!(serde_json::from_str::<PatchRecord>(line).is_err());
    }

    #[test]
    fn test_log_appends_new_keys() {
        let mut log = EntryLog::new();
        assert_eq!(log.apply(Entry::stdout("a", "1")), Applied::Added);
        assert_eq!(log.apply(Entry::stdout("b", "2")), Applied::Added);
        assert_eq!(log.len(), 2);

        let snapshot = log.snapshot();
        let keys: Vec<&str> = snapshot.iter().map(|e| e.key().as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_log_replaces_in_place() {
        let mut log = EntryLog::new();
        log.apply(Entry::stdout("a", "1"));
        log.apply(Entry::stdout("b", "2"));
        let before = log.snapshot();

        assert_eq!(log.apply(Entry::stdout("a", "1 (final)")), Applied::Replaced);
        let after = log.snapshot();

        assert_eq!(after.len(), 2);
        assert_eq!(after[0].key().as_str(), "a");
        assert!(!Arc::ptr_eq(&before[0], &after[0]));
        assert!(Arc::ptr_eq(&before[1], &after[1]));
    }

    #[test]
    fn test_log_ignores_identical_repeat() {
        let mut log = EntryLog::new();
        log.apply(Entry::stdout("a", "1"));
        let before = log.snapshot();

        assert_eq!(log.apply(Entry::stdout("a", "1")), Applied::Unchanged);
        assert_eq!(before.shared_prefix_len(&log.snapshot()), 1);
    }
}
