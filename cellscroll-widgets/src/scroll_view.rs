use alloc::boxed::Box;
use alloc::vec::Vec;

use cellscroll::{
    Axis, HeightModel, ItemLayout, ItemMetrics, Offset, RangeCalculator, ScrollBehavior, Size,
    Viewport, ViewportChangeCallback,
};
use unicode_width::UnicodeWidthChar;

use crate::{
    Cell, CellBuffer, Constraints, Event, EventResult, Key, MouseButton, Rect, RenderContext,
    ScrollController, ScrollViewOptions, Scrollbar, VirtualContent, WIDE_CONTINUATION, Widget,
};

const CELL_MAX: u64 = u16::MAX as u64;

/// Whether `content` answers every offset lookup itself, so no height table is needed.
fn is_indexed(content: &dyn VirtualContent) -> bool {
    content.total_height().is_some()
        && content.offset_for_index(0).is_some()
        && content.index_for_offset(0).is_some()
}

/// Item metrics for virtual content: the content's own lookups where it provides them, the
/// view's height table otherwise.
///
/// Indexed content is queried directly, so only the items a pass actually touches have their
/// heights read.
struct VirtualMetrics<'a> {
    content: &'a dyn VirtualContent,
    layout: &'a ItemLayout,
    indexed: bool,
}

impl<'a> VirtualMetrics<'a> {
    fn new(content: &'a dyn VirtualContent, layout: &'a ItemLayout) -> Self {
        Self {
            content,
            layout,
            indexed: is_indexed(content),
        }
    }
}

impl ItemMetrics for VirtualMetrics<'_> {
    fn item_count(&self) -> usize {
        if self.indexed {
            self.content.item_count()
        } else {
            self.layout.item_count()
        }
    }

    fn item_height(&self, index: usize) -> u32 {
        if !self.indexed {
            return self.layout.item_height(index);
        }
        if index < self.content.item_count() {
            self.content.item_height(index)
        } else {
            0
        }
    }

    fn offset_for_index(&self, index: usize) -> u64 {
        self.content
            .offset_for_index(index)
            .unwrap_or_else(|| self.layout.offset_for_index(index))
    }

    fn index_for_offset(&self, offset: u64) -> usize {
        self.content
            .index_for_offset(offset)
            .unwrap_or_else(|| self.layout.index_for_offset(offset))
            .min(self.item_count().saturating_sub(1))
    }

    fn total_height(&self) -> u64 {
        self.content
            .total_height()
            .unwrap_or_else(|| self.layout.total_height())
    }
}

/// Moves `delta` non-empty items away from `from`, stopping at either end.
fn step_items(metrics: &dyn ItemMetrics, from: usize, delta: i64) -> usize {
    let count = metrics.item_count();
    let mut index = from;
    let mut remaining = delta.unsigned_abs();
    while remaining > 0 {
        if delta < 0 {
            if index == 0 {
                break;
            }
            index -= 1;
        } else {
            if index + 1 >= count {
                break;
            }
            index += 1;
        }
        if metrics.item_height(index) > 0 {
            remaining -= 1;
        }
    }
    index
}

fn offset_by(offset: u64, delta: i64) -> u64 {
    if delta < 0 {
        offset.saturating_sub(delta.unsigned_abs())
    } else {
        offset.saturating_add(delta as u64)
    }
}

/// A scrollable container for a single child widget.
///
/// The child is probed once per [`ScrollView::set_content`]:
///
/// - Content exposing [`Widget::as_virtual_content`] is scrolled virtually. Only the items
///   in the view (plus `overscan`) are asked to draw, and vertical scrolling snaps to item
///   boundaries. Item heights are read again after a width change or when the content
///   reports [`Widget::needs_render`]; content that answers all of its offset lookups itself
///   never has its heights tabulated.
/// - Any other widget is measured with an unbounded height and drawn once into an
///   off-screen [`CellBuffer`]. Each frame copies the visible window out of it; the child is
///   drawn again only when its measured size changes or it reports
///   [`Widget::needs_render`].
///
/// Scrollbars are drawn over the last column and row, following the axis policies.
pub struct ScrollView {
    content: Option<Box<dyn Widget>>,
    is_virtual: bool,
    viewport: Viewport,
    options: ScrollViewOptions,
    layout: ItemLayout,
    cache: CellBuffer,
    cache_valid: bool,
    focused: bool,
    area: Rect,
    rendered_revision: Option<u64>,
    dirty: bool,
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollView {
    pub fn new() -> Self {
        Self::with_options(ScrollViewOptions::default())
    }

    pub fn with_options(options: ScrollViewOptions) -> Self {
        let behavior = options.behavior;
        let mut viewport = Viewport::new().with_behavior(behavior.horizontal, behavior.vertical);
        viewport.set_on_change_callback(options.on_scroll.clone());
        Self {
            content: None,
            is_virtual: false,
            viewport,
            options,
            layout: ItemLayout::new(HeightModel::Adapter),
            cache: CellBuffer::new(0, 0),
            cache_valid: false,
            focused: false,
            area: Rect::default(),
            rendered_revision: None,
            dirty: true,
        }
    }

    /// Replaces the child and scrolls back to the top.
    pub fn set_content(&mut self, content: impl Widget + 'static) {
        let mut content: Box<dyn Widget> = Box::new(content);
        self.is_virtual = content.as_virtual_content().is_some();
        vdebug!(is_virtual = self.is_virtual, "ScrollView::set_content");
        self.content = Some(content);
        self.reset_content_state();
    }

    /// Removes and returns the child.
    pub fn take_content(&mut self) -> Option<Box<dyn Widget>> {
        let content = self.content.take();
        self.is_virtual = false;
        self.reset_content_state();
        content
    }

    pub fn content(&self) -> Option<&dyn Widget> {
        self.content.as_deref()
    }

    pub fn content_mut(&mut self) -> Option<&mut Box<dyn Widget>> {
        self.content.as_mut()
    }

    /// Whether the current child is scrolled item by item.
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn options(&self) -> &ScrollViewOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ScrollViewOptions) {
        self.viewport
            .set_on_change_callback(options.on_scroll.clone());
        self.options = options;
        self.set_behavior(self.options.behavior);
    }

    pub fn set_behavior(&mut self, behavior: ScrollBehavior) {
        self.options.behavior = behavior;
        self.viewport
            .set_behavior(behavior.horizontal, behavior.vertical);
        self.cache_valid = false;
        self.dirty = true;
    }

    pub fn set_on_scroll(&mut self, on_scroll: Option<ViewportChangeCallback>) {
        self.viewport.set_on_change_callback(on_scroll.clone());
        self.options.on_scroll = on_scroll;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn offset(&self) -> Offset {
        self.viewport.offset()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.dirty = true;
        }
    }

    /// Forgets the stored item heights of virtual content; they are pulled again on the next
    /// pass. Width changes and [`Widget::needs_render`] on the content do this implicitly.
    pub fn invalidate_heights(&mut self) {
        self.layout.invalidate();
        self.dirty = true;
    }

    fn reset_content_state(&mut self) {
        self.layout = ItemLayout::new(HeightModel::Adapter);
        self.cache_valid = false;
        self.dirty = true;
        self.viewport.scroll_to_start();
        self.sync_content();
    }

    /// Pushes the child's content size into the viewport.
    fn sync_content(&mut self) {
        let view = self.viewport.view_size();
        let Some(content) = self.content.as_mut() else {
            self.viewport.set_content_size(Size::ZERO);
            return;
        };
        let size = if self.is_virtual {
            let changed = content.needs_render();
            match content.as_virtual_content() {
                Some(items) if is_indexed(&*items) => {
                    Size::new(view.width, items.total_height().unwrap_or(0))
                }
                Some(items) => {
                    if changed {
                        self.layout.invalidate();
                    }
                    self.layout.set_count(items.item_count());
                    self.layout.refresh_with(|i| items.item_height(i));
                    Size::new(view.width, self.layout.total_height())
                }
                None => {
                    vwarn!("ScrollView content no longer exposes virtual items");
                    Size::ZERO
                }
            }
        } else {
            let max_width = if self.viewport.policy(Axis::Horizontal).allows_scroll() {
                u64::MAX
            } else {
                view.width
            };
            let constraints = Constraints {
                min: Size::new(view.width, 0),
                max: Size::new(max_width, u64::MAX),
            };
            let measured = constraints.constrain(content.measure(constraints));
            Size::new(measured.width.min(CELL_MAX), measured.height.min(CELL_MAX))
        };
        self.viewport.set_content_size(size);
    }

    fn virtual_metrics(&mut self) -> Option<VirtualMetrics<'_>> {
        let content = self.content.as_mut()?.as_virtual_content()?;
        Some(VirtualMetrics::new(content, &self.layout))
    }

    /// The start of the item containing row `y`.
    fn snap(&mut self, y: u64) -> Option<u64> {
        let metrics = self.virtual_metrics()?;
        Some(metrics.offset_for_index(metrics.index_for_offset(y)))
    }

    fn virtual_scroll_by(&mut self, items: i64) {
        if items == 0 {
            return;
        }
        self.sync_content();
        let offset = self.viewport.offset().y;
        let Some(metrics) = self.virtual_metrics() else {
            return;
        };
        let index = step_items(&metrics, metrics.index_for_offset(offset), items);
        let target = metrics.offset_for_index(index);
        self.viewport.scroll_to(0, target);
    }

    fn virtual_page_by(&mut self, rows: i64) {
        if rows == 0 {
            return;
        }
        self.sync_content();
        let offset = self.viewport.offset().y;
        let Some(metrics) = self.virtual_metrics() else {
            return;
        };
        let current = metrics.index_for_offset(offset);
        let mut index = metrics.index_for_offset(offset_by(offset, rows));
        // An item taller than a page would otherwise pin the view in place.
        if index == current {
            index = step_items(&metrics, current, rows.signum());
        }
        let target = metrics.offset_for_index(index);
        self.viewport.scroll_to(0, target);
    }

    fn render_virtual(&mut self, ctx: &mut RenderContext<'_>) {
        let offset = self.viewport.offset().y;
        let view = self.viewport.view_size().height;
        let calculator = RangeCalculator::new(self.options.overscan);
        let Some(content) = self
            .content
            .as_mut()
            .and_then(|c| c.as_virtual_content())
        else {
            return;
        };
        let metrics = VirtualMetrics::new(&*content, &self.layout);
        let range = calculator.compute(&metrics, offset, view);

        // Overscanned items draw into a fully clipped context. Rows too far off screen to
        // address are skipped.
        let width = ctx.area().width;
        let mut items = Vec::with_capacity(range.len());
        for i in range.indexes() {
            let h = metrics.item_height(i);
            if h == 0 {
                continue;
            }
            let rel = metrics.offset_for_index(i) as i128 - offset as i128;
            let Ok(top) = i32::try_from(rel) else {
                continue;
            };
            items.push((i, Rect::new(0, top, width, h.min(u16::MAX as u32) as u16)));
        }
        for (i, rect) in items {
            let mut sub = ctx.sub(rect);
            content.render_item(i, &mut sub);
        }
        vtrace!(
            start = range.start_index,
            end = range.end_index,
            offset,
            "ScrollView rendered virtual items"
        );
    }

    fn render_opaque(&mut self, ctx: &mut RenderContext<'_>) {
        let size = self.viewport.content_size();
        let Some(content) = self.content.as_mut() else {
            return;
        };
        if size.is_empty() {
            return;
        }
        // Content sizes are clamped to the cell range in `sync_content`.
        let (width, height) = (size.width as u16, size.height as u16);
        let resized = self.cache.width() != width || self.cache.height() != height;
        if resized {
            self.cache.resize(width, height);
        }
        if resized || !self.cache_valid || content.needs_render() {
            self.cache.clear();
            content.layout(self.cache.bounds());
            let mut child = RenderContext::new(&mut self.cache);
            content.render(&mut child);
            content.clear_invalidation();
            self.cache_valid = true;
            vtrace!(width, height, "ScrollView re-rendered child");
        }

        let offset = self.viewport.offset();
        let view = ctx.local();
        let base = self.options.style;
        for y in 0..view.height {
            let Ok(sy) = u16::try_from(offset.y + y as u64) else {
                break;
            };
            for x in 0..view.width {
                let Ok(sx) = u16::try_from(offset.x + x as u64) else {
                    break;
                };
                let Some(&src) = self.cache.get(sx, sy) else {
                    break;
                };
                let mut cell = Cell::new(src.ch, base.patch(src.style));
                // Wide characters cut by either edge of the window become blanks.
                if (x == 0 && cell.ch == WIDE_CONTINUATION)
                    || (x + 1 == view.width && cell.ch.width() == Some(2))
                {
                    cell.ch = ' ';
                }
                ctx.set(x as i32, y as i32, cell);
            }
        }
    }

    fn scrollbar(&self, axis: Axis) -> Scrollbar {
        let style = self.options.style;
        Scrollbar::new(axis)
            .with_symbols(self.options.scrollbar_symbols)
            .with_styles(
                style.patch(self.options.track_style),
                style.patch(self.options.thumb_style),
            )
            .with_min_thumb(self.options.min_thumb)
    }

    fn draw_scrollbars(&self, ctx: &mut RenderContext<'_>) {
        let content = self.viewport.content_size();
        let view = self.viewport.view_size();
        let offset = self.viewport.offset();
        let local = ctx.local();
        if self
            .viewport
            .policy(Axis::Vertical)
            .shows_scrollbar(content.height, view.height)
        {
            let rect = Rect::new(local.right() - 1, 0, 1, local.height);
            self.scrollbar(Axis::Vertical)
                .render(ctx, rect, content.height, offset.y);
        }
        if self
            .viewport
            .policy(Axis::Horizontal)
            .shows_scrollbar(content.width, view.width)
        {
            let rect = Rect::new(0, local.bottom() - 1, local.width, 1);
            self.scrollbar(Axis::Horizontal)
                .render(ctx, rect, content.width, offset.x);
        }
    }
}

impl Widget for ScrollView {
    /// Scroll views take all the space they are offered.
    fn measure(&self, constraints: Constraints) -> Size {
        let fill = |max: u64, min: u64| if max == u64::MAX { min } else { max };
        constraints.constrain(Size::new(
            fill(constraints.max.width, constraints.min.width),
            fill(constraints.max.height, constraints.min.height),
        ))
    }

    fn layout(&mut self, area: Rect) {
        if area.width != self.area.width {
            self.layout.invalidate();
        }
        self.area = area;
        self.viewport
            .set_view_size(Size::new(area.width as u64, area.height as u64));
        self.sync_content();
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let area = ctx.area();
        if area != self.area {
            self.layout(area);
        }
        ctx.fill_all(Cell::new(' ', self.options.style));
        if area.is_empty() || self.content.is_none() {
            return;
        }

        self.sync_content();
        if self.is_virtual {
            self.render_virtual(ctx);
            if let Some(content) = self.content.as_mut() {
                content.clear_invalidation();
            }
        } else {
            self.render_opaque(ctx);
        }
        self.draw_scrollbars(ctx);
    }

    fn handle_event(&mut self, event: &Event) -> EventResult {
        let consumed = self
            .content
            .as_mut()
            .is_some_and(|c| c.handle_event(event).is_handled());
        if consumed {
            self.dirty = true;
            return EventResult::Handled;
        }
        match *event {
            Event::Key(key) => {
                if !self.focused {
                    return EventResult::Ignored;
                }
                match key {
                    Key::Up => self.scroll_by(0, -1),
                    Key::Down => self.scroll_by(0, 1),
                    Key::Left => self.scroll_by(-1, 0),
                    Key::Right => self.scroll_by(1, 0),
                    Key::PageUp => self.page_by(-1),
                    Key::PageDown => self.page_by(1),
                    Key::Home => self.scroll_to_start(),
                    Key::End => self.scroll_to_end(),
                    _ => return EventResult::Ignored,
                }
                EventResult::Handled
            }
            Event::Mouse(button) => {
                let rows = self.options.behavior.mouse_wheel as i64;
                match button {
                    MouseButton::WheelUp => self.scroll_by(0, -rows),
                    MouseButton::WheelDown => self.scroll_by(0, rows),
                }
                EventResult::Handled
            }
        }
    }

    fn needs_render(&self) -> bool {
        self.dirty
            || self.rendered_revision != Some(self.viewport.revision())
            || self.content.as_ref().is_some_and(|c| c.needs_render())
    }

    fn clear_invalidation(&mut self) {
        self.dirty = false;
        self.rendered_revision = Some(self.viewport.revision());
    }
}

impl ScrollController for ScrollView {
    /// Cells for ordinary content; whole items (vertical only) for virtual content.
    fn scroll_by(&mut self, dx: i64, dy: i64) {
        if self.is_virtual {
            self.virtual_scroll_by(dy);
        } else {
            self.viewport.scroll_by(dx, dy);
        }
    }

    /// For virtual content, `y` snaps to the start of the item that contains it.
    fn scroll_to(&mut self, x: u64, y: u64) {
        if self.is_virtual {
            self.sync_content();
            let y = self.snap(y).unwrap_or(0);
            self.viewport.scroll_to(0, y);
        } else {
            self.viewport.scroll_to(x, y);
        }
    }

    fn page_by(&mut self, pages: i64) {
        let page = self
            .options
            .behavior
            .page_rows(self.viewport.view_size().height)
            .min(i64::MAX as u64) as i64;
        let rows = pages.saturating_mul(page);
        if self.is_virtual {
            self.virtual_page_by(rows);
        } else {
            self.viewport.scroll_by(0, rows);
        }
    }

    fn scroll_to_start(&mut self) {
        self.viewport.scroll_to_start();
    }

    /// Always the exact bottom, even when that splits an item.
    fn scroll_to_end(&mut self) {
        if self.is_virtual {
            self.sync_content();
        }
        self.viewport.scroll_to_end();
    }
}

impl core::fmt::Debug for ScrollView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollView")
            .field("has_content", &self.content.is_some())
            .field("is_virtual", &self.is_virtual)
            .field("viewport", &self.viewport)
            .field("options", &self.options)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}
