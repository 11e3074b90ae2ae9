use crate::scroll::Align;

/// Row heights of the blocks stacked in a viewport
///
/// Heights are measured lazily; callers only ask for blocks near the
/// current position, so a long list is never measured end to end.
pub trait BlockHeights {
    fn block_count(&self) -> usize;

    /// Height in rows, at least 1
    fn height(&mut self, block: usize) -> u16;
}

/// First visible row, expressed as a block plus a row offset into it
///
/// Anchoring to a block keeps the reading position stable while blocks are
/// appended below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ScrollPosition {
    pub block: usize,
    pub offset: u16,
}

impl ScrollPosition {
    pub fn new(block: usize, offset: u16) -> Self {
        Self { block, offset }
    }

    pub fn top() -> Self {
        Self::default()
    }

    /// Pull the anchor back inside the current block list
    pub fn normalize(&mut self, heights: &mut impl BlockHeights) {
        let count = heights.block_count();
        if count == 0 {
            *self = Self::top();
            return;
        }

        if self.block >= count {
            self.block = count - 1;
            self.offset = heights.height(self.block).saturating_sub(1);
            return;
        }

        let height = heights.height(self.block);
        if self.offset >= height {
            self.offset = height.saturating_sub(1);
        }
    }

    pub fn scroll_down(&mut self, rows: usize, heights: &mut impl BlockHeights) {
        let count = heights.block_count();
        if count == 0 {
            return;
        }

        let mut rows = rows;
        while rows > 0 {
            let height = heights.height(self.block) as usize;
            let left_in_block = height.saturating_sub(self.offset as usize + 1);

            if rows <= left_in_block {
                self.offset += rows as u16;
                return;
            }

            if self.block + 1 >= count {
                self.offset = height.saturating_sub(1) as u16;
                return;
            }

            rows -= left_in_block + 1;
            self.block += 1;
            self.offset = 0;
        }
    }

    pub fn scroll_up(&mut self, rows: usize, heights: &mut impl BlockHeights) {
        let mut rows = rows;
        if rows <= self.offset as usize {
            self.offset -= rows as u16;
            return;
        }

        rows -= self.offset as usize;
        self.offset = 0;

        while rows > 0 && self.block > 0 {
            self.block -= 1;
            let height = heights.height(self.block) as usize;
            if rows <= height {
                self.offset = (height - rows) as u16;
                return;
            }
            rows -= height;
        }
    }

    /// Position that shows `block` at the given alignment in a viewport of
    /// `view` rows.
    pub fn align(block: usize, align: Align, view: u16, heights: &mut impl BlockHeights) -> Self {
        let height = heights.height(block);
        let above = match align {
            Align::Start => return Self::new(block, 0),
            Align::Center if height >= view => return Self::new(block, (height - view) / 2),
            Align::End if height >= view => return Self::new(block, height - view),
            Align::Center => (view - height) / 2,
            Align::End => view - height,
        };

        let mut position = Self::new(block, 0);
        position.scroll_up(above as usize, heights);
        position
    }

    /// Rows from this position to the end of `last` inclusive, stopping
    /// once `limit` is reached.
    pub fn rows_through(&self, last: usize, limit: usize, heights: &mut impl BlockHeights) -> usize {
        if last < self.block {
            return 0;
        }

        let mut rows = (heights.height(self.block) as usize).saturating_sub(self.offset as usize);
        let mut block = self.block + 1;
        while rows < limit && block <= last {
            rows += heights.height(block) as usize;
            block += 1;
        }
        rows
    }

    /// Rows from this position to the end of the last block, capped at `limit`
    pub fn rows_from(&self, limit: usize, heights: &mut impl BlockHeights) -> usize {
        match heights.block_count() {
            0 => 0,
            count => self.rows_through(count - 1, limit, heights),
        }
    }

    /// Whether the final row of `last` falls inside a viewport of `view` rows
    pub fn shows_end_of(&self, last: usize, view: u16, heights: &mut impl BlockHeights) -> bool {
        last >= self.block && self.rows_through(last, view as usize + 1, heights) <= view as usize
    }

    /// Keep the viewport from running past the end of the content
    pub fn clamp_to_end(&mut self, view: u16, heights: &mut impl BlockHeights) {
        let count = heights.block_count();
        if count == 0 {
            *self = Self::top();
            return;
        }

        if self.rows_from(view as usize, heights) < view as usize {
            let end = Self::align(count - 1, Align::End, view, heights);
            *self = (*self).min(end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<u16>);

    impl BlockHeights for Fixed {
        fn block_count(&self) -> usize {
            self.0.len()
        }

        fn height(&mut self, block: usize) -> u16 {
            self.0[block]
        }
    }

    #[test]
    fn test_scroll_down_crosses_blocks() {
        let mut heights = Fixed(vec![1, 3, 2, 4]);
        let mut position = ScrollPosition::top();

        position.scroll_down(2, &mut heights);
        assert_eq!(position, ScrollPosition::new(1, 1));

        position.scroll_down(3, &mut heights);
        assert_eq!(position, ScrollPosition::new(2, 1));

        position.scroll_down(100, &mut heights);
        assert_eq!(position, ScrollPosition::new(3, 3));
    }

    #[test]
    fn test_scroll_up_crosses_blocks() {
        let mut heights = Fixed(vec![1, 3, 2, 4]);
        let mut position = ScrollPosition::new(3, 1);

        position.scroll_up(2, &mut heights);
        assert_eq!(position, ScrollPosition::new(2, 1));

        position.scroll_up(3, &mut heights);
        assert_eq!(position, ScrollPosition::new(1, 1));

        position.scroll_up(50, &mut heights);
        assert_eq!(position, ScrollPosition::top());
    }

    #[test]
    fn test_align_end_walks_back() {
        let mut heights = Fixed(vec![1, 3, 2, 4]);
        // block 2 ends at row 6; a 5-row viewport starts at row 1
        let position = ScrollPosition::align(2, Align::End, 5, &mut heights);
        assert_eq!(position, ScrollPosition::new(1, 0));
        assert!(position.shows_end_of(2, 5, &mut heights));
    }

    #[test]
    fn test_align_tall_block() {
        let mut heights = Fixed(vec![1, 10, 1]);
        assert_eq!(ScrollPosition::align(1, Align::End, 4, &mut heights), ScrollPosition::new(1, 6));
        assert_eq!(ScrollPosition::align(1, Align::Center, 4, &mut heights), ScrollPosition::new(1, 3));
        assert_eq!(ScrollPosition::align(1, Align::Start, 4, &mut heights), ScrollPosition::new(1, 0));
    }

    #[test]
    fn test_align_center() {
        let mut heights = Fixed(vec![1; 20]);
        assert_eq!(ScrollPosition::align(10, Align::Center, 5, &mut heights), ScrollPosition::new(8, 0));
    }

    #[test]
    fn test_rows_from_is_capped() {
        let mut heights = Fixed(vec![2; 1000]);
        assert_eq!(ScrollPosition::new(0, 1).rows_from(10, &mut heights), 11);
        assert_eq!(ScrollPosition::new(999, 0).rows_from(10, &mut heights), 2);
    }

    #[test]
    fn test_clamp_to_end() {
        let mut heights = Fixed(vec![1; 10]);
        let mut position = ScrollPosition::new(8, 0);
        position.clamp_to_end(4, &mut heights);
        assert_eq!(position, ScrollPosition::new(6, 0));

        let mut short = Fixed(vec![1; 2]);
        let mut position = ScrollPosition::new(1, 0);
        position.clamp_to_end(4, &mut short);
        assert_eq!(position, ScrollPosition::top());
    }

    #[test]
    fn test_normalize_after_shrink() {
        let mut heights = Fixed(vec![1, 2]);
        let mut position = ScrollPosition::new(5, 3);
        position.normalize(&mut heights);
        assert_eq!(position, ScrollPosition::new(1, 1));

        let mut empty = Fixed(Vec::new());
        position.normalize(&mut empty);
        assert_eq!(position, ScrollPosition::top());
    }
}
