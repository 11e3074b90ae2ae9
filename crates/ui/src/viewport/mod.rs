//! Virtualized list over an [`EntrySequence`].
//!
//! The list is laid out as blocks: a one-row header spacer, one block per
//! entry, and a one-row footer spacer. Only blocks near the viewport are
//! ever measured or rendered; rows outside the overscan window are dropped
//! from the cache after every layout.

mod position;
mod rows;
mod wrap;

pub use position::{BlockHeights, ScrollPosition};
pub use rows::{EventRenderer, EventRow, ExpansionStore, RowCache, RowContext, SummaryEventRenderer, render_row};
pub use wrap::{wrap_literal, wrap_words};

use crate::scroll::{Align, FollowOutput, ScrollHandle, ScrollTarget};

use ratatui::layout::Rect;
use ratatui::text::Line;
use std::collections::VecDeque;
use std::ops::Range;
use tailview_core::{EntrySequence, ViewerConfig};

/// Smooth follow gives up and jumps when the tail is further away than this
/// many viewport heights.
const FOLLOW_JUMP_SCREENS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportConfig {
    pub overscan_top: u16,
    pub overscan_bottom: u16,
    /// Rows per frame while following; 0 closes a third of the gap each frame
    pub follow_step: u16,
    pub row_key_prefix: String,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for ViewportConfig {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            overscan_top: config.overscan_top,
            overscan_bottom: config.overscan_bottom,
            follow_step: config.follow_step,
            row_key_prefix: config.row_key_prefix.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollOp {
    By(i64),
    Jump(ScrollTarget),
    Top,
    Bottom,
}

/// Header, entries, footer as measurable blocks
struct Blocks<'a, 'c> {
    entries: &'a EntrySequence,
    ctx: &'a RowContext<'c>,
    rows: &'a mut RowCache,
    width: u16,
}

impl Blocks<'_, '_> {
    fn item(&self, block: usize) -> Option<usize> {
        (block >= 1 && block <= self.entries.len()).then(|| block - 1)
    }

    fn lines(&mut self, block: usize) -> Vec<Line<'static>> {
        match self.item(block) {
            Some(index) => self.rows.lines(index, &self.entries[index], self.ctx, self.width).to_vec(),
            None => vec![Line::default()],
        }
    }
}

impl BlockHeights for Blocks<'_, '_> {
    fn block_count(&self) -> usize {
        if self.entries.is_empty() { 0 } else { self.entries.len() + 2 }
    }

    fn height(&mut self, block: usize) -> u16 {
        match self.item(block) {
            Some(index) => self.rows.height(index, &self.entries[index], self.ctx, self.width),
            None => 1,
        }
    }
}

/// Viewport state for one conversation's entry list
///
/// Scroll requests are queued and applied on the next [`VirtualList::layout`],
/// after the entries for that frame are known. The list reports changes of
/// its pinned-to-bottom state through [`VirtualList::take_bottom_change`].
#[derive(Debug)]
pub struct VirtualList {
    config: ViewportConfig,
    position: ScrollPosition,
    rows: RowCache,
    len: usize,
    view_height: u16,
    ops: VecDeque<ScrollOp>,
    follow: FollowOutput,
    following: bool,
    at_bottom: bool,
    bottom_change: Option<bool>,
    visible: Range<usize>,
    materialized: Range<usize>,
}

impl VirtualList {
    pub fn new(config: ViewportConfig) -> Self {
        let rows = RowCache::new(config.row_key_prefix.clone());
        Self {
            config,
            position: ScrollPosition::top(),
            rows,
            len: 0,
            view_height: 0,
            ops: VecDeque::new(),
            follow: FollowOutput::Smooth,
            following: false,
            at_bottom: true,
            bottom_change: None,
            visible: 0..0,
            materialized: 0..0,
        }
    }

    /// Forget everything about the previous conversation
    pub fn reset(&mut self) {
        self.position = ScrollPosition::top();
        self.rows.clear();
        self.len = 0;
        self.ops.clear();
        self.follow = FollowOutput::Smooth;
        self.following = false;
        self.at_bottom = true;
        self.bottom_change = None;
        self.visible = 0..0;
        self.materialized = 0..0;
    }

    pub fn scroll_lines(&mut self, delta: i64) {
        if delta != 0 {
            self.ops.push_back(ScrollOp::By(delta));
        }
    }

    pub fn page(&mut self, down: bool) {
        let rows = self.view_height.saturating_sub(1).max(1) as i64;
        self.scroll_lines(if down { rows } else { -rows });
    }

    pub fn scroll_to_top(&mut self) {
        self.ops.push_back(ScrollOp::Top);
    }

    /// Scroll past the last row; this re-pins the list
    pub fn scroll_to_bottom(&mut self) {
        self.ops.push_back(ScrollOp::Bottom);
    }

    pub fn is_at_bottom(&self) -> bool {
        self.at_bottom
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn follow_output(&self) -> FollowOutput {
        self.follow
    }

    /// Pinned-state change observed by the last layout, if any
    pub fn take_bottom_change(&mut self) -> Option<bool> {
        self.bottom_change.take()
    }

    pub fn position(&self) -> ScrollPosition {
        self.position
    }

    /// Entry index the viewport is anchored at
    pub fn anchor_index(&self) -> usize {
        self.position.block.saturating_sub(1).min(self.len.saturating_sub(1))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entry indices with at least one row inside the viewport
    pub fn visible_range(&self) -> Range<usize> {
        self.visible.clone()
    }

    /// Entry indices rendered in the last layout, overscan included
    pub fn materialized(&self) -> Range<usize> {
        self.materialized.clone()
    }

    /// Rendered rows held by the cache
    pub fn cached_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row_renders(&self) -> u64 {
        self.rows.renders()
    }

    pub fn row_key_prefix(&self) -> &str {
        &self.config.row_key_prefix
    }

    /// Apply queued scrolling, advance smooth follow and return the rows
    /// visible in `area`.
    pub fn layout(&mut self, entries: &EntrySequence, ctx: &RowContext<'_>, area: Rect) -> Vec<Line<'static>> {
        let view = area.height;
        self.view_height = view;
        if view == 0 || area.width == 0 {
            return Vec::new();
        }

        let grew = entries.len() > self.len;
        let mut blocks = Blocks { entries, ctx, rows: &mut self.rows, width: area.width };
        let count = blocks.block_count();

        self.position.normalize(&mut blocks);

        if grew && self.follow == FollowOutput::Smooth && self.at_bottom {
            self.following = true;
        }

        let scrolled = !self.ops.is_empty();
        while let Some(op) = self.ops.pop_front() {
            match op {
                ScrollOp::By(delta) if delta < 0 => {
                    self.following = false;
                    self.position.scroll_up(delta.unsigned_abs() as usize, &mut blocks);
                }
                ScrollOp::By(delta) => self.position.scroll_down(delta as usize, &mut blocks),
                ScrollOp::Top => {
                    self.following = false;
                    self.position = ScrollPosition::top();
                }
                ScrollOp::Bottom if count > 0 => {
                    self.following = false;
                    self.position = ScrollPosition::align(count - 1, Align::End, view, &mut blocks);
                }
                ScrollOp::Jump(target) if !entries.is_empty() => {
                    self.following = false;
                    let index = target.index.min(entries.len() - 1);
                    self.position = ScrollPosition::align(index + 1, target.align, view, &mut blocks);
                }
                ScrollOp::Bottom | ScrollOp::Jump(_) => {}
            }
        }

        // A pinned tail that got taller without a new entry is tracked too.
        if !scrolled
            && !self.following
            && self.at_bottom
            && self.follow == FollowOutput::Smooth
            && !entries.is_empty()
            && !self.position.shows_end_of(entries.len(), view, &mut blocks)
        {
            self.following = true;
        }

        if self.following {
            self.following = Self::step_follow(&mut self.position, self.config.follow_step, view, count, &mut blocks);
        }

        self.position.clamp_to_end(view, &mut blocks);

        let at_bottom =
            entries.is_empty() || self.following || self.position.shows_end_of(entries.len(), view, &mut blocks);
        if at_bottom != self.at_bottom {
            tracing::debug!(at_bottom, "viewport pinning changed");
            self.at_bottom = at_bottom;
            self.bottom_change = Some(at_bottom);
        }

        let (lines, visible_end) = Self::collect_visible(self.position, view, count, &mut blocks);
        let first_item = self.position.block.saturating_sub(1);
        self.visible = if entries.is_empty() { 0..0 } else { first_item..visible_end.min(entries.len()) };

        let mut top = self.position;
        top.scroll_up(self.config.overscan_top as usize, &mut blocks);
        let bottom = Self::measure_below(visible_end + 1, self.config.overscan_bottom as usize, count, &mut blocks);
        self.materialized = if entries.is_empty() {
            0..0
        } else {
            top.block.saturating_sub(1)..bottom.min(entries.len())
        };

        self.rows.recycle();
        self.len = entries.len();
        lines
    }

    /// Advance toward the tail; returns whether following continues
    fn step_follow(
        position: &mut ScrollPosition, follow_step: u16, view: u16, count: usize, blocks: &mut Blocks<'_, '_>,
    ) -> bool {
        let view = view as usize;
        let limit = view * (FOLLOW_JUMP_SCREENS + 1) + 1;
        let remaining = position.rows_from(limit, blocks).saturating_sub(view);

        if remaining == 0 {
            return false;
        }

        if remaining > view * FOLLOW_JUMP_SCREENS {
            *position = ScrollPosition::align(count - 1, Align::End, view as u16, blocks);
            return false;
        }

        let step = match follow_step as usize {
            0 => remaining.div_ceil(3),
            step => step.min(remaining),
        };
        position.scroll_down(step, blocks);
        step < remaining
    }

    /// Visible lines plus one past the last entry index touched
    fn collect_visible(
        position: ScrollPosition, view: u16, count: usize, blocks: &mut Blocks<'_, '_>,
    ) -> (Vec<Line<'static>>, usize) {
        let mut lines = Vec::with_capacity(view as usize);
        let mut block = position.block;
        let mut skip = position.offset as usize;

        while lines.len() < view as usize && block < count {
            let block_lines = blocks.lines(block);
            let take = (view as usize - lines.len()).min(block_lines.len().saturating_sub(skip));
            lines.extend(block_lines.into_iter().skip(skip).take(take));
            skip = 0;
            block += 1;
        }

        (lines, block.saturating_sub(1))
    }

    /// Measure blocks from `block` on until `rows` are covered; returns the
    /// first block left unmeasured as an exclusive item bound.
    fn measure_below(block: usize, rows: usize, count: usize, blocks: &mut Blocks<'_, '_>) -> usize {
        let mut block = block;
        let mut covered = 0;
        while covered < rows && block < count {
            covered += blocks.height(block) as usize;
            block += 1;
        }
        block.saturating_sub(1)
    }
}

impl ScrollHandle for VirtualList {
    fn scroll_to_index(&mut self, target: ScrollTarget) {
        self.ops.push_back(ScrollOp::Jump(target));
    }

    fn set_follow_output(&mut self, follow: FollowOutput) {
        if follow == FollowOutput::Disabled && self.following {
            tracing::debug!("continuous follow revoked");
            self.following = false;
        }
        self.follow = follow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tailview_core::{ConversationId, Entry};

    fn entries(n: usize) -> EntrySequence {
        (0..n).map(|i| Entry::stdout(format!("k{}", i), format!("line {}", i))).collect()
    }

    fn grow(base: &EntrySequence, to: usize) -> EntrySequence {
        let mut items: Vec<_> = base.iter().cloned().collect();
        for i in base.len()..to {
            items.push(std::sync::Arc::new(Entry::stdout(format!("k{}", i), format!("line {}", i))));
        }
        EntrySequence::from(items)
    }

    fn layout(list: &mut VirtualList, entries: &EntrySequence, height: u16) -> Vec<String> {
        let conversation = ConversationId::new("att-1");
        let expansion = ExpansionStore::new();
        let ctx = RowContext { conversation: &conversation, expansion: &expansion, events: &SummaryEventRenderer };
        list.layout(entries, &ctx, Rect::new(0, 0, 40, height))
            .iter()
            .map(|line| line.to_string())
            .collect()
    }

    fn list() -> VirtualList {
        VirtualList::new(ViewportConfig { overscan_bottom: 5, ..ViewportConfig::default() })
    }

    #[test]
    fn test_empty_list_is_at_bottom() {
        let mut list = list();
        assert!(layout(&mut list, &EntrySequence::new(), 10).is_empty());
        assert!(list.is_at_bottom());
        assert_eq!(list.take_bottom_change(), None);
    }

    #[test]
    fn test_short_list_renders_spacers() {
        let mut list = list();
        let rows = layout(&mut list, &entries(2), 10);
        assert_eq!(rows, vec!["", "line 0", "line 1", ""]);
        assert!(list.is_at_bottom());
        assert_eq!(list.visible_range(), 0..2);
    }

    #[test]
    fn test_jump_to_last_aligns_end() {
        let mut list = list();
        let seq = entries(50);
        list.scroll_to_top();
        layout(&mut list, &seq, 5);
        assert!(!list.is_at_bottom());
        assert_eq!(list.take_bottom_change(), Some(false));

        list.scroll_to_index(ScrollTarget::tail(50));
        let rows = layout(&mut list, &seq, 5);
        assert_eq!(rows.last().map(String::as_str), Some("line 49"));
        assert!(list.is_at_bottom());
        assert_eq!(list.take_bottom_change(), Some(true));
    }

    #[test]
    fn test_jump_center() {
        let mut list = list();
        let seq = entries(50);
        list.scroll_to_index(ScrollTarget::new(20, Align::Center));
        let rows = layout(&mut list, &seq, 5);
        assert_eq!(rows, vec!["line 18", "line 19", "line 20", "line 21", "line 22"]);
    }

    #[test]
    fn test_growth_keeps_reading_position() {
        let mut list = list();
        let seq = entries(50);
        list.scroll_to_index(ScrollTarget::new(10, Align::Start));
        layout(&mut list, &seq, 5);
        list.set_follow_output(FollowOutput::Disabled);

        let rows = layout(&mut list, &grow(&seq, 80), 5);
        assert_eq!(rows.first().map(String::as_str), Some("line 10"));
    }

    #[test]
    fn test_smooth_follow_reaches_tail() {
        let mut list = list();
        let seq = entries(20);
        list.scroll_to_bottom();
        layout(&mut list, &seq, 5);
        assert!(list.is_at_bottom());

        let grown = grow(&seq, 26);
        layout(&mut list, &grown, 5);
        assert!(list.is_following());
        assert!(list.is_at_bottom());

        for _ in 0..10 {
            layout(&mut list, &grown, 5);
        }
        assert!(!list.is_following());
        assert!(list.is_at_bottom());
        let rows = layout(&mut list, &grown, 5);
        assert_eq!(rows.last().map(String::as_str), Some(""));
        assert_eq!(rows[rows.len() - 2], "line 25");
    }

    #[test]
    fn test_taller_last_entry_stays_pinned() {
        let mut list = list();
        let seq = entries(20);
        list.scroll_to_bottom();
        layout(&mut list, &seq, 5);
        assert!(list.is_at_bottom());
        list.take_bottom_change();

        let mut items: Vec<_> = seq.iter().cloned().collect();
        items[19] = std::sync::Arc::new(Entry::stdout("k19", "line 19\nmore a\nmore b\nmore c"));
        let refreshed = EntrySequence::from(items);

        layout(&mut list, &refreshed, 5);
        assert!(list.is_following());
        assert!(list.is_at_bottom());
        assert_eq!(list.take_bottom_change(), None);

        for _ in 0..5 {
            layout(&mut list, &refreshed, 5);
        }
        let rows = layout(&mut list, &refreshed, 5);
        assert!(!list.is_following());
        assert!(list.is_at_bottom());
        assert_eq!(list.take_bottom_change(), None);
        assert_eq!(rows, vec!["line 19", "more a", "more b", "more c", ""]);
    }

    #[test]
    fn test_taller_last_entry_not_followed_when_paused() {
        let mut list = list();
        let seq = entries(20);
        list.scroll_to_index(ScrollTarget::new(5, Align::Start));
        layout(&mut list, &seq, 5);
        list.set_follow_output(FollowOutput::Disabled);

        let mut items: Vec<_> = seq.iter().cloned().collect();
        items[19] = std::sync::Arc::new(Entry::stdout("k19", "line 19\nmore a"));
        let rows = layout(&mut list, &EntrySequence::from(items), 5);
        assert!(!list.is_following());
        assert_eq!(rows.first().map(String::as_str), Some("line 5"));
    }

    #[test]
    fn test_scroll_up_revokes_follow_immediately() {
        let mut list = list();
        let seq = entries(30);
        list.scroll_to_bottom();
        layout(&mut list, &seq, 5);

        let grown = grow(&seq, 32);
        layout(&mut list, &grown, 5);
        assert!(list.is_following());

        list.scroll_lines(-3);
        layout(&mut list, &grown, 5);
        assert!(!list.is_following());
        assert!(!list.is_at_bottom());
        assert_eq!(list.take_bottom_change(), Some(false));
    }

    #[test]
    fn test_follow_disabled_does_not_track_growth() {
        let mut list = list();
        let seq = entries(30);
        list.scroll_to_bottom();
        layout(&mut list, &seq, 5);
        list.set_follow_output(FollowOutput::Disabled);

        layout(&mut list, &grow(&seq, 32), 5);
        assert!(!list.is_following());
        assert!(!list.is_at_bottom());
    }

    #[test]
    fn test_far_tail_jumps_instead_of_stepping() {
        let mut list = list();
        let seq = entries(3);
        layout(&mut list, &seq, 5);

        let grown = grow(&seq, 500);
        let rows = layout(&mut list, &grown, 5);
        assert!(!list.is_following());
        assert!(list.is_at_bottom());
        assert_eq!(rows[rows.len() - 2], "line 499");
    }

    #[test]
    fn test_overscan_bounds_materialized_rows() {
        let mut list = VirtualList::new(ViewportConfig { overscan_top: 2, overscan_bottom: 6, ..Default::default() });
        let seq = entries(1000);
        list.scroll_to_index(ScrollTarget::new(500, Align::Start));
        layout(&mut list, &seq, 10);

        assert_eq!(list.visible_range(), 500..510);
        assert_eq!(list.materialized(), 498..516);
        assert!(list.cached_rows() <= 10 * (FOLLOW_JUMP_SCREENS + 1) + 20);
    }

    #[test]
    fn test_reset_forgets_position() {
        let mut list = list();
        list.scroll_to_index(ScrollTarget::new(10, Align::Start));
        layout(&mut list, &entries(50), 5);
        list.reset();

        assert_eq!(list.position(), ScrollPosition::top());
        assert!(list.is_at_bottom());
        assert_eq!(list.cached_rows(), 0);
        assert!(list.is_empty());
    }
}
