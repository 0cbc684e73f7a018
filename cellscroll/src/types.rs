use core::ops::Range;

/// A scroll position in content coordinates (columns, rows).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub x: u64,
    pub y: u64,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: u64, y: u64) -> Self {
        Self { x, y }
    }

    pub fn get(self, axis: Axis) -> u64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

/// A size in cells. Content sizes may be far larger than any screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u64,
    pub height: u64,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    pub const fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }

    pub fn get(self, axis: Axis) -> u64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Where an item should land when scrolling it into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Scroll the minimum distance; no-op if the item is already fully visible.
    Auto,
}

/// Half-open range of item indexes, `start_index..end_index`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl VisibleRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
    };

    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index: end_index.max(start_index),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    pub fn indexes(&self) -> Range<usize> {
        self.start_index..self.end_index.max(self.start_index)
    }
}

/// Per-axis scrolling policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollPolicy {
    /// No scrolling and no scrollbar on this axis.
    Never,
    /// Scroll and show a scrollbar only when content exceeds the view.
    #[default]
    Auto,
    /// Always show the scrollbar.
    Always,
}

impl ScrollPolicy {
    pub fn allows_scroll(self) -> bool {
        !matches!(self, Self::Never)
    }

    pub fn shows_scrollbar(self, content: u64, view: u64) -> bool {
        match self {
            Self::Never => false,
            Self::Auto => content > view,
            Self::Always => true,
        }
    }
}

/// Scroll configuration shared by the list and the scroll container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollBehavior {
    pub horizontal: ScrollPolicy,
    pub vertical: ScrollPolicy,
    /// Rows moved per mouse wheel notch.
    pub mouse_wheel: u32,
    /// Page size as a percentage of the view height (100 = one full view).
    pub page_percent: u32,
}

impl Default for ScrollBehavior {
    fn default() -> Self {
        Self {
            horizontal: ScrollPolicy::Auto,
            vertical: ScrollPolicy::Auto,
            mouse_wheel: 3,
            page_percent: 100,
        }
    }
}

impl ScrollBehavior {
    /// Vertical-only scrolling, the usual list configuration.
    pub fn vertical() -> Self {
        Self {
            horizontal: ScrollPolicy::Never,
            ..Self::default()
        }
    }

    pub fn policy(&self, axis: Axis) -> ScrollPolicy {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn with_policies(mut self, horizontal: ScrollPolicy, vertical: ScrollPolicy) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    pub fn with_mouse_wheel(mut self, rows: u32) -> Self {
        self.mouse_wheel = rows;
        self
    }

    pub fn with_page_percent(mut self, percent: u32) -> Self {
        self.page_percent = percent;
        self
    }

    /// Rows per page for a view of `view_height` rows; never less than one.
    pub fn page_rows(&self, view_height: u64) -> u64 {
        let rows = if self.page_percent == 0 {
            view_height
        } else {
            view_height.saturating_mul(self.page_percent as u64) / 100
        };
        rows.max(1)
    }
}
