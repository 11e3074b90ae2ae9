use super::{Applied, EntryLog, HistorySource, PatchRecord, Subscription, UpdateKind, UpdateSender};
use crate::config::SourceConfig;
use crate::entry::ConversationId;

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// History source that tails a JSONL patch file
///
/// Each line is a [`PatchRecord`]; lines for other conversations are
/// skipped. The existing backlog is delivered in pages while `loading` is
/// true, then the file is polled for appended lines.
///
/// `subscribe` spawns onto the ambient tokio runtime.
#[derive(Debug, Clone)]
pub struct JsonlHistory {
    path: PathBuf,
    config: SourceConfig,
}

impl JsonlHistory {
    pub fn new(path: impl Into<PathBuf>, config: SourceConfig) -> Self {
        Self { path: path.into(), config }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySource for JsonlHistory {
    fn subscribe(&self, conversation: &ConversationId) -> Subscription {
        let (tx, subscription) = Subscription::channel(conversation.clone());
        let tail = Tail::new(self.path.clone(), self.config.clone(), tx);

        tokio::spawn(async move {
            tail.run().await;
        });

        subscription
    }
}

/// Byte cursor plus partial-line buffer over a growing file
#[derive(Debug, Default)]
struct LineReader {
    offset: u64,
    partial: Vec<u8>,
}

impl LineReader {
    /// Read everything appended since the last call and return complete lines
    async fn read_lines(&mut self, path: &Path) -> std::io::Result<Vec<String>> {
        let mut file = tokio::fs::File::open(path).await?;
        let len = file.metadata().await?.len();

        if len < self.offset {
            tracing::warn!(path = %path.display(), "patch file shrank, re-reading from start");
            self.offset = 0;
            self.partial.clear();
        }

        file.seek(SeekFrom::Start(self.offset)).await?;
        let mut buf = Vec::new();
        let read = file.read_to_end(&mut buf).await?;
        self.offset += read as u64;
        self.partial.extend_from_slice(&buf);

        // Only complete lines are decoded; a character split across reads
        // stays in the buffer until its remaining bytes arrive.
        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.partial.drain(..=pos).collect();
            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping patch line that is not valid UTF-8");
                    continue;
                }
            };
            let line = line.trim_end_matches(['\n', '\r']);
            if !line.trim().is_empty() {
                lines.push(line.to_string());
            }
        }

        Ok(lines)
    }
}

struct Tail {
    path: PathBuf,
    config: SourceConfig,
    tx: UpdateSender,
    log: EntryLog,
    reader: LineReader,
}

impl Tail {
    fn new(path: PathBuf, config: SourceConfig, tx: UpdateSender) -> Self {
        Self { path, config, tx, log: EntryLog::new(), reader: LineReader::default() }
    }

    async fn run(mut self) {
        let conversation = self.tx.conversation().clone();
        tracing::debug!(conversation = %conversation, path = %self.path.display(), "history tail started");

        if !self.load_backlog().await {
            return;
        }

        let interval = Duration::from_millis(self.config.poll_interval_ms);
        loop {
            tokio::select! {
                _ = self.tx.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    if !self.poll().await {
                        break;
                    }
                }
            }
        }

        tracing::debug!(conversation = %conversation, "history tail stopped");
    }

    /// Deliver the existing file contents page by page with `loading = true`,
    /// then a final `loading = false` emission.
    async fn load_backlog(&mut self) -> bool {
        let lines = match self.reader.read_lines(&self.path).await {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "patch file unavailable, waiting for it");
                Vec::new()
            }
        };

        let page_size = self.config.backlog_page_size.max(1);
        let mut kind = UpdateKind::Initial;
        let mut in_page = 0usize;

        for line in lines {
            if self.apply_line(&line) == Some(Applied::Added) {
                in_page += 1;
            }

            if in_page >= page_size {
                if !self.tx.emit(self.log.snapshot(), kind, true) {
                    return false;
                }
                kind = UpdateKind::Append;
                in_page = 0;
            }
        }

        self.tx.emit(self.log.snapshot(), kind, false)
    }

    async fn poll(&mut self) -> bool {
        let lines = match self.reader.read_lines(&self.path).await {
            Ok(lines) => lines,
            Err(e) => {
                tracing::trace!(path = %self.path.display(), error = %e, "patch file not readable");
                return !self.tx.is_cancelled();
            }
        };

        let mut added = false;
        let mut replaced = false;
        for line in lines {
            match self.apply_line(&line) {
                Some(Applied::Added) => added = true,
                Some(Applied::Replaced) => replaced = true,
                _ => {}
            }
        }

        if !(added || replaced) {
            return !self.tx.is_cancelled();
        }

        let kind = if replaced { UpdateKind::Refresh } else { UpdateKind::Append };
        self.tx.emit(self.log.snapshot(), kind, false)
    }

    fn apply_line(&mut self, line: &str) -> Option<Applied> {
        let record: PatchRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed patch line");
                return None;
            }
        };

        if &record.conversation != self.tx.conversation() {
            return None;
        }

        Some(self.log.apply(record.into_entry()))
    }
}
