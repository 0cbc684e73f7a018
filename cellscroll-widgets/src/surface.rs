use alloc::string::String;
use alloc::vec::Vec;

use unicode_width::UnicodeWidthChar;

/// A cell-grid rectangle. The origin may be negative (scrolled-out content).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    /// Bottom edge (exclusive).
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// The overlapping part of two rectangles, or `None` if they don't overlap.
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        if x2 > x1 && y2 > y1 {
            // Both differences are bounded by u16 widths/heights.
            Some(Self {
                x: x1,
                y: y1,
                width: (x2 - x1) as u16,
                height: (y2 - y1) as u16,
            })
        } else {
            None
        }
    }

    /// `rect` given relative to this rectangle's origin, in absolute coordinates.
    pub fn offset(self, rect: Self) -> Self {
        Self {
            x: self.x.saturating_add(rect.x),
            y: self.y.saturating_add(rect.y),
            ..rect
        }
    }
}

bitflags::bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Attr: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        /// Swap foreground and background.
        const REVERSE   = 1 << 4;
    }
}

/// Colors are palette indexes; `None` inherits whatever is underneath.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub fg: Option<u8>,
    pub bg: Option<u8>,
    pub attrs: Attr,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: Attr::empty(),
        }
    }

    pub const fn fg(mut self, fg: u8) -> Self {
        self.fg = Some(fg);
        self
    }

    pub const fn bg(mut self, bg: u8) -> Self {
        self.bg = Some(bg);
        self
    }

    pub fn attrs(mut self, attrs: Attr) -> Self {
        self.attrs |= attrs;
        self
    }

    pub fn reversed(self) -> Self {
        self.attrs(Attr::REVERSE)
    }

    /// Layers `other` on top: its colors win where set, attributes accumulate.
    pub fn patch(self, other: Self) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: self.attrs | other.attrs,
        }
    }
}

/// Continuation marker stored in the second column of a wide character.
pub const WIDE_CONTINUATION: char = '\0';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::new(),
        }
    }
}

impl Cell {
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

/// A row-major grid of cells: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: alloc::vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Resizes and clears the buffer.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, Cell::default());
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Returns `false` when `(x, y)` is outside the buffer.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Fills `rect`, clipped to the buffer.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let Some(r) = rect.intersect(self.bounds()) else {
            return;
        };
        for y in r.y..r.bottom() {
            let row = y as usize * self.width as usize;
            self.cells[row + r.x as usize..row + r.right() as usize].fill(cell);
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The characters of row `y`, without wide-character continuation cells.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let row = y as usize * self.width as usize;
        self.cells[row..row + self.width as usize]
            .iter()
            .map(|c| c.ch)
            .filter(|&ch| ch != WIDE_CONTINUATION)
            .collect()
    }
}

impl core::fmt::Debug for CellBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CellBuffer({}x{})", self.width, self.height)
    }
}

/// A clipped drawing target handed to widgets.
///
/// `area` is the widget's logical rectangle in buffer coordinates and may extend past the
/// buffer or start at a negative row; `clip` is the part that may actually be written. All
/// coordinates passed to the drawing methods are relative to `area`'s origin.
pub struct RenderContext<'a> {
    buffer: &'a mut CellBuffer,
    area: Rect,
    clip: Rect,
}

impl<'a> RenderContext<'a> {
    pub fn new(buffer: &'a mut CellBuffer) -> Self {
        let area = buffer.bounds();
        Self {
            buffer,
            area,
            clip: area,
        }
    }

    /// A context for `area` (absolute), clipped to the buffer.
    pub fn with_area(buffer: &'a mut CellBuffer, area: Rect) -> Self {
        let clip = area
            .intersect(buffer.bounds())
            .unwrap_or(Rect::new(area.x, area.y, 0, 0));
        Self { buffer, area, clip }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// The area's size as a local rectangle at the origin.
    pub fn local(&self) -> Rect {
        Rect::new(0, 0, self.area.width, self.area.height)
    }

    /// A child context for `rect` (relative to this area). Writes stay inside both clips.
    pub fn sub(&mut self, rect: Rect) -> RenderContext<'_> {
        let area = self.area.offset(rect);
        let clip = area
            .intersect(self.clip)
            .unwrap_or(Rect::new(area.x, area.y, 0, 0));
        RenderContext {
            buffer: &mut *self.buffer,
            area,
            clip,
        }
    }

    /// Like [`Self::sub`], but `None` when nothing of `rect` is visible.
    pub fn sub_visible(&mut self, rect: Rect) -> Option<RenderContext<'_>> {
        let area = self.area.offset(rect);
        let clip = area.intersect(self.clip)?;
        Some(RenderContext {
            buffer: &mut *self.buffer,
            area,
            clip,
        })
    }

    /// Writes one cell. Returns `false` when the position is clipped.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        let ax = self.area.x.saturating_add(x);
        let ay = self.area.y.saturating_add(y);
        if !self.clip.contains(ax, ay) {
            return false;
        }
        // The clip lies inside the buffer, so both coordinates fit in u16.
        self.buffer.set(ax as u16, ay as u16, cell)
    }

    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let abs = self.area.offset(rect);
        if let Some(r) = abs.intersect(self.clip) {
            self.buffer.fill(r, cell);
        }
    }

    /// Fills the whole area.
    pub fn fill_all(&mut self, cell: Cell) {
        self.fill(self.local(), cell);
    }

    /// Writes `text` starting at `(x, y)` and returns the number of columns it spans.
    ///
    /// Zero-width characters are skipped. A wide character that would straddle the right
    /// edge of the area is replaced by a space.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) -> u16 {
        let mut col = x;
        let right = self.area.width as i32;
        for ch in text.chars() {
            if col >= right {
                break;
            }
            let w = ch.width().unwrap_or(0) as i32;
            if w == 0 {
                continue;
            }
            if w == 2 && col + 1 >= right {
                self.set(col, y, Cell::new(' ', style));
                col += 1;
                break;
            }
            self.set(col, y, Cell::new(ch, style));
            if w == 2 {
                self.set(col + 1, y, Cell::new(WIDE_CONTINUATION, style));
            }
            col += w;
        }
        col.saturating_sub(x).clamp(0, u16::MAX as i32) as u16
    }

    /// Reads back a cell at a local position, if it is inside the clip.
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        let ax = self.area.x.saturating_add(x);
        let ay = self.area.y.saturating_add(y);
        if !self.clip.contains(ax, ay) {
            return None;
        }
        self.buffer.get(ax as u16, ay as u16)
    }
}

impl core::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderContext")
            .field("area", &self.area)
            .field("clip", &self.clip)
            .finish_non_exhaustive()
    }
}
