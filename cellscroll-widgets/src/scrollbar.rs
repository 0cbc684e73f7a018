use cellscroll::{Axis, thumb};

use crate::{Cell, Rect, RenderContext, Style};

/// Characters used to draw a scrollbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollbarSymbols {
    pub vertical_track: char,
    pub horizontal_track: char,
    pub thumb: char,
}

impl Default for ScrollbarSymbols {
    fn default() -> Self {
        Self {
            vertical_track: '|',
            horizontal_track: '-',
            thumb: '#',
        }
    }
}

/// Draws a one-cell-thick scrollbar track and thumb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scrollbar {
    pub axis: Axis,
    pub symbols: ScrollbarSymbols,
    pub track_style: Style,
    pub thumb_style: Style,
    pub min_thumb: u32,
}

impl Scrollbar {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            symbols: ScrollbarSymbols::default(),
            track_style: Style::new(),
            thumb_style: Style::new().reversed(),
            min_thumb: 1,
        }
    }

    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    pub fn with_symbols(mut self, symbols: ScrollbarSymbols) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_styles(mut self, track: Style, thumb: Style) -> Self {
        self.track_style = track;
        self.thumb_style = thumb;
        self
    }

    pub fn with_min_thumb(mut self, min_thumb: u32) -> Self {
        self.min_thumb = min_thumb;
        self
    }

    /// Draws along the first column (vertical) or first row (horizontal) of `rect`, which is
    /// relative to `ctx`'s area.
    pub fn render(&self, ctx: &mut RenderContext<'_>, rect: Rect, total: u64, offset: u64) {
        let (len, track) = match self.axis {
            Axis::Vertical => (rect.height, self.symbols.vertical_track),
            Axis::Horizontal => (rect.width, self.symbols.horizontal_track),
        };
        if len == 0 || rect.is_empty() {
            return;
        }
        let t = thumb(total, len as u32, offset, self.min_thumb);
        for i in 0..len {
            let cell = if t.contains(i as u32) {
                Cell::new(self.symbols.thumb, self.thumb_style)
            } else {
                Cell::new(track, self.track_style)
            };
            match self.axis {
                Axis::Vertical => ctx.set(rect.x, rect.y + i as i32, cell),
                Axis::Horizontal => ctx.set(rect.x + i as i32, rect.y, cell),
            };
        }
    }
}
