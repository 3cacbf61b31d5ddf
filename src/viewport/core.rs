use std::ops::Range;

/// Visible rows on the reference 24-line serial terminal, after the title,
/// info and key-binding chrome are accounted for.
pub const DEFAULT_FRAME_HEIGHT: usize = 19;

/// Fixed-height window over the current node's children.
///
/// Tracks the cursor index and the first visible index (`offset`). The cursor
/// wraps cyclically at both ends; the window follows one row at a time except
/// at the wrap points, where it snaps to the matching extreme because a
/// single-step scroll cannot get there in one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cursor: usize,
    offset: usize,
    height: usize,
    len: usize,
}

impl Frame {
    pub fn new(height: usize) -> Self {
        Self {
            cursor: 0,
            offset: 0,
            height,
            len: 0,
        }
    }

    /// Point the frame at a child list of `len` entries, cursor and offset
    /// back at the top. Re-entering a node never restores its previous cursor
    /// position; that is specified behavior, not an omission.
    pub fn reset(&mut self, len: usize) {
        self.cursor = 0;
        self.offset = 0;
        self.len = len;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices of the children currently on screen.
    pub fn visible(&self) -> Range<usize> {
        let end = usize::min(self.offset + self.height, self.len);
        self.offset..end
    }

    /// Largest offset that still fills the window.
    pub fn max_offset(&self) -> usize {
        self.len.saturating_sub(self.height)
    }

    /// Move the cursor one row down, wrapping to the top past the last entry,
    /// then refit the window. No-op on an empty list.
    pub fn move_down(&mut self) {
        if self.len == 0 {
            return;
        }
        if self.cursor + 1 == self.len {
            self.cursor = 0;
        } else {
            self.cursor += 1;
        }
        self.reframe();
    }

    /// Move the cursor one row up, wrapping to the bottom before the first
    /// entry, then refit the window. No-op on an empty list.
    pub fn move_up(&mut self) {
        if self.len == 0 {
            return;
        }
        if self.cursor == 0 {
            self.cursor = self.len - 1;
        } else {
            self.cursor -= 1;
        }
        self.reframe();
    }

    /// Keep the cursor inside the window. Checked in priority order:
    /// wrap-to-top snaps the window to the top, wrap-to-bottom snaps it to
    /// the bottom, otherwise the window scrolls by a single row when the
    /// cursor walks off either edge.
    fn reframe(&mut self) {
        if self.cursor == 0 {
            self.offset = 0;
        } else if self.cursor + 1 == self.len {
            self.offset = self.max_offset();
        } else if self.cursor >= self.offset + self.height {
            self.offset += 1;
        } else if self.cursor < self.offset {
            self.offset -= 1;
        }
    }
}
