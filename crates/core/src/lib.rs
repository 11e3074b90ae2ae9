pub mod config;
pub mod editor;
pub mod entry;
pub mod error;
pub mod history;
pub mod logging;
pub mod project;

pub use config::{Config, EditorConfig, FileLoggingConfig, SourceConfig, ViewerConfig};
pub use editor::{EditorEmbed, FRAME_PERMISSIONS, SANDBOX_TOKENS};
pub use entry::{ConversationId, Entry, EntryKey, EntryKind, EntryPayload, EntrySequence, OutputStream, ProcessId};
pub use error::{Error, Result};
pub use history::{HistorySource, HistoryUpdate, JsonlHistory, ManualHistory, Subscription, UpdateKind, UpdateSender};
pub use project::{Project, ProjectId, Route};
