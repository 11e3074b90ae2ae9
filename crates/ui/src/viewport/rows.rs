use super::wrap::{wrap_literal, wrap_words};
use crate::theme::Theme;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use serde_json::Value;
use std::collections::hash_map::Entry as Slot;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use unicode_width::UnicodeWidthChar;
use tailview_core::{ConversationId, Entry, EntryKey, EntryPayload, OutputStream, ProcessId};

/// What an event renderer gets for one structured entry
#[derive(Debug, Clone, Copy)]
pub struct EventRow<'a> {
    pub index: usize,
    /// Key the collapsed/expanded state is stored under
    pub expansion_key: &'a EntryKey,
    pub event: &'a Value,
    pub conversation: &'a ConversationId,
    pub process_id: Option<&'a ProcessId>,
    pub expanded: bool,
}

/// Renders a structured event into terminal lines
///
/// The list treats the output as opaque; it only counts the lines.
pub trait EventRenderer {
    fn render(&self, row: &EventRow<'_>, width: u16) -> Vec<Line<'static>>;
}

/// Collapsed/expanded state of structured rows, keyed by entry key
#[derive(Debug, Clone, Default)]
pub struct ExpansionStore {
    expanded: HashSet<EntryKey>,
}

impl ExpansionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: &EntryKey) -> bool {
        self.expanded.contains(key)
    }

    /// Returns the new state
    pub fn toggle(&mut self, key: &EntryKey) -> bool {
        if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.clone());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// Everything a row needs besides its entry
#[derive(Clone, Copy)]
pub struct RowContext<'a> {
    pub conversation: &'a ConversationId,
    pub expansion: &'a ExpansionStore,
    pub events: &'a dyn EventRenderer,
}

/// Lines for one row; a pure function of index, entry and context
pub fn render_row(index: usize, entry: &Entry, ctx: &RowContext<'_>, width: u16) -> Vec<Line<'static>> {
    let mut lines = match entry.payload() {
        EntryPayload::Raw { stream, text } => {
            let mut lines = Vec::new();
            wrap_literal(text, Theme::stream(*stream == OutputStream::Stderr), width as usize, &mut lines);
            lines
        }
        EntryPayload::Event { event, process_id } => {
            let row = EventRow {
                index,
                expansion_key: entry.key(),
                event,
                conversation: ctx.conversation,
                process_id: Some(process_id),
                expanded: ctx.expansion.is_expanded(entry.key()),
            };
            ctx.events.render(&row, width)
        }
    };

    if lines.is_empty() {
        lines.push(Line::default());
    }
    lines
}

/// Default renderer: one summary line collapsed, full content expanded
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryEventRenderer;

impl SummaryEventRenderer {
    fn label(event: &Value) -> &str {
        event
            .get("entry_type")
            .and_then(|entry_type| entry_type.get("type").or(Some(entry_type)))
            .and_then(Value::as_str)
            .or_else(|| event.get("type").and_then(Value::as_str))
            .unwrap_or("event")
    }

    fn content(event: &Value) -> String {
        match event.get("content") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => serde_json::to_string_pretty(other).unwrap_or_default(),
            None => serde_json::to_string_pretty(event).unwrap_or_default(),
        }
    }
}

impl EventRenderer for SummaryEventRenderer {
    fn render(&self, row: &EventRow<'_>, width: u16) -> Vec<Line<'static>> {
        let label = Self::label(row.event).to_string();
        let accent = Style::default().fg(Theme::event_color(&label)).add_modifier(Modifier::BOLD);
        let content = Self::content(row.event);

        if !row.expanded {
            let first = content.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
            let more = if content.lines().filter(|line| !line.trim().is_empty()).count() > 1 { " …" } else { "" };
            let summary = Line::from(vec![
                Span::styled(format!("▸ {}", label), accent),
                Span::styled(": ", Theme::muted()),
                Span::styled(format!("{}{}", first.trim(), more), Style::default().fg(Theme::FG)),
            ]);
            return vec![truncate_line(summary, width)];
        }

        let mut header = vec![Span::styled(format!("▾ {}", label), accent)];
        if let Some(process) = row.process_id {
            header.push(Span::styled(format!(" · {}", process), Theme::muted()));
        }

        let mut lines = vec![Line::from(header)];
        wrap_words(&content, Style::default().fg(Theme::FG), width as usize, 2, &mut lines);
        lines
    }
}

/// Cut a single-line summary at `width` columns
fn truncate_line(line: Line<'static>, width: u16) -> Line<'static> {
    let mut budget = width as usize;
    let mut spans = Vec::new();
    for span in line.spans {
        if budget == 0 {
            break;
        }
        let mut text = String::new();
        for ch in span.content.chars() {
            let w = ch.width().unwrap_or(0);
            if w > budget {
                budget = 0;
                break;
            }
            budget -= w;
            text.push(ch);
        }
        spans.push(Span::styled(text, span.style));
    }
    Line::from(spans)
}

#[derive(Debug)]
struct CachedRow {
    entry: Arc<Entry>,
    width: u16,
    expanded: bool,
    lines: Vec<Line<'static>>,
    touched: bool,
}

/// Rendered rows keyed by namespaced row key
///
/// A row is reused while its entry is the same `Arc`, the width matches and
/// its expansion state is unchanged. [`RowCache::recycle`] drops every row
/// that was not touched since the previous recycle.
#[derive(Debug)]
pub struct RowCache {
    prefix: String,
    rows: HashMap<String, CachedRow>,
    renders: u64,
}

impl RowCache {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), rows: HashMap::new(), renders: 0 }
    }

    pub fn row_key(&self, entry: &Entry) -> String {
        format!("{}{}", self.prefix, entry.key())
    }

    pub fn lines(&mut self, index: usize, entry: &Arc<Entry>, ctx: &RowContext<'_>, width: u16) -> &[Line<'static>] {
        let key = self.row_key(entry);
        let expanded = ctx.expansion.is_expanded(entry.key());

        let row = match self.rows.entry(key) {
            Slot::Occupied(slot)
                if Arc::ptr_eq(&slot.get().entry, entry)
                    && slot.get().width == width
                    && slot.get().expanded == expanded =>
            {
                slot.into_mut()
            }
            slot => {
                self.renders += 1;
                let fresh = CachedRow {
                    entry: Arc::clone(entry),
                    width,
                    expanded,
                    lines: render_row(index, entry, ctx, width),
                    touched: false,
                };
                match slot {
                    Slot::Occupied(mut slot) => {
                        slot.insert(fresh);
                        slot.into_mut()
                    }
                    Slot::Vacant(slot) => slot.insert(fresh),
                }
            }
        };

        row.touched = true;
        &row.lines
    }

    pub fn height(&mut self, index: usize, entry: &Arc<Entry>, ctx: &RowContext<'_>, width: u16) -> u16 {
        self.lines(index, entry, ctx, width).len().clamp(1, u16::MAX as usize) as u16
    }

    /// Drop rows not used since the last call and clear the touch marks
    pub fn recycle(&mut self) {
        self.rows.retain(|_, row| std::mem::take(&mut row.touched));
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, row_key: &str) -> bool {
        self.rows.contains_key(row_key)
    }

    /// Total number of row renders performed, for recycling diagnostics
    pub fn renders(&self) -> u64 {
        self.renders
    }
}
