use alloc::sync::Arc;

use cellscroll::{
    Align, HeightFn, HeightModel, ListState, PoolStats, Size, ViewportChangeCallback,
    VisibleRange, WidgetPool,
};

use crate::adapter::FactoryRecycler;
use crate::cache::ActiveItems;
use crate::{
    AdapterFeatures, Cell, Constraints, Event, EventResult, HeightHint, Key, ListAdapter,
    ListOptions, MouseButton, Rect, RenderContext, ScrollController, Style, Widget,
};

/// Called with the selected index and item.
pub type OnSelect<T> = Arc<dyn Fn(usize, &T) + Send + Sync>;

#[derive(Clone)]
enum HeightOverride {
    Fixed(u32),
    Function(HeightFn),
}

/// A selectable list that only binds and draws the items around its view.
///
/// Each render pass pushes the adapter's count (and, for variable heights, any new item
/// heights) into its [`ListState`], computes the overscanned range, releases pooled widgets
/// that left it, binds one widget per item in range and draws the items that intersect the
/// view. Adapters without a [`crate::WidgetFactory`] draw visible items directly.
///
/// Scrolling is selection driven: [`ScrollController`] calls and navigation keys move the
/// selection and scroll the minimum distance that keeps it visible.
pub struct VirtualList<A: ListAdapter> {
    adapter: A,
    features: AdapterFeatures,
    state: ListState,
    options: ListOptions,
    height_override: Option<HeightOverride>,
    pool: WidgetPool<A::Widget>,
    active: ActiveItems<A::Widget>,
    on_select: Option<OnSelect<A::Item>>,
    focused: bool,
    area: Rect,
    rendered_revision: Option<u64>,
    dirty: bool,
}

impl<A: ListAdapter> VirtualList<A> {
    pub fn new(adapter: A) -> Self {
        Self::with_options(adapter, ListOptions::default())
    }

    pub fn with_options(adapter: A, options: ListOptions) -> Self {
        let features = AdapterFeatures::probe(&adapter);
        vdebug!(
            count = adapter.count(),
            pooled = features.pooled_widgets,
            overscan = options.overscan,
            "VirtualList::new"
        );
        let mut state = ListState::new(HeightModel::default()).with_overscan(options.overscan);
        state.set_on_change_callback(options.on_scroll.clone());
        let mut list = Self {
            adapter,
            features,
            state,
            pool: WidgetPool::new(options.pool_max),
            options,
            height_override: None,
            active: ActiveItems::default(),
            on_select: None,
            focused: false,
            area: Rect::default(),
            rendered_revision: None,
            dirty: true,
        };
        list.apply_height_model();
        list
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Mutable access to the data. Count and height changes are picked up on the next pass;
    /// the adapter's capabilities are not re-probed.
    pub fn adapter_mut(&mut self) -> &mut A {
        self.dirty = true;
        &mut self.adapter
    }

    /// Replaces the adapter. Widgets bound or pooled for the old one are discarded through its
    /// factory.
    pub fn set_adapter(&mut self, adapter: A) {
        self.release_all();
        self.adapter = adapter;
        self.features = AdapterFeatures::probe(&self.adapter);
        vdebug!(
            count = self.adapter.count(),
            pooled = self.features.pooled_widgets,
            "VirtualList::set_adapter"
        );
        self.apply_height_model();
    }

    pub fn features(&self) -> AdapterFeatures {
        self.features
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ListOptions) {
        self.state.set_overscan(options.overscan);
        self.state.set_on_change_callback(options.on_scroll.clone());
        let pool_max = options.pool_max;
        self.options = options;
        self.set_widget_pool_max(pool_max);
        self.dirty = true;
    }

    pub fn set_on_scroll(&mut self, on_scroll: Option<ViewportChangeCallback>) {
        self.options.on_scroll = on_scroll.clone();
        self.state.set_on_change_callback(on_scroll);
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
        self.state.set_overscan(overscan);
    }

    /// Overrides the adapter: every item is `height` rows tall.
    pub fn set_item_height(&mut self, height: u32) {
        self.height_override = Some(HeightOverride::Fixed(height));
        self.apply_height_model();
    }

    /// Overrides the adapter with a height function.
    pub fn set_item_height_func(&mut self, height: impl Fn(usize) -> u32 + Send + Sync + 'static) {
        self.height_override = Some(HeightOverride::Function(Arc::new(height)));
        self.apply_height_model();
    }

    /// Drops any manual height override and goes back to the adapter's height hint.
    pub fn use_adapter_heights(&mut self) {
        self.height_override = None;
        self.apply_height_model();
    }

    /// Re-reads every item height on the next pass.
    pub fn invalidate_heights(&mut self) {
        self.state.invalidate_heights();
        self.sync();
        self.dirty = true;
    }

    pub fn set_widget_pool_max(&mut self, max: usize) {
        self.options.pool_max = max;
        self.pool.set_max(max);
        if let Some(factory) = self.adapter.widget_factory() {
            self.pool.trim(&FactoryRecycler(factory));
        }
    }

    pub fn set_style(&mut self, style: Style) {
        self.options.style = style;
        self.dirty = true;
    }

    pub fn set_selected_style(&mut self, style: Style) {
        self.options.selected_style = style;
        self.dirty = true;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Key events are only handled while focused.
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.dirty = true;
        }
    }

    /// Called when the selection moves and when Enter is pressed.
    pub fn on_select(&mut self, f: impl Fn(usize, &A::Item) + Send + Sync + 'static) {
        self.on_select = Some(Arc::new(f));
    }

    pub fn selected_index(&self) -> usize {
        self.state.selected_index()
    }

    pub fn selected_item(&self) -> Option<A::Item> {
        if self.adapter.count() == 0 {
            return None;
        }
        self.adapter.item(self.state.selected_index())
    }

    /// Selects `index` (clamped) and scrolls it into view.
    pub fn set_selected(&mut self, index: usize) {
        self.sync();
        let changed = self.state.set_selected(index);
        self.selection_moved(changed);
    }

    pub fn scroll_to_index(&mut self, index: usize) {
        self.sync();
        self.state.scroll_to_index(index);
    }

    pub fn scroll_to_index_aligned(&mut self, index: usize, align: Align) {
        self.sync();
        self.state.scroll_to_index_aligned(index, align);
    }

    pub fn scroll_to_offset(&mut self, offset: u64) {
        self.sync();
        self.state.scroll_to_offset(offset);
    }

    pub fn ensure_visible(&mut self, index: usize) {
        self.sync();
        self.state.ensure_visible(index);
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.state.visible_range()
    }

    pub fn offset(&self) -> u64 {
        self.state.offset()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Pooled widgets currently checked out of the pool.
    pub fn pool_in_use(&self) -> usize {
        self.pool.in_use()
    }

    /// Items that currently have a bound widget.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    fn apply_height_model(&mut self) {
        let model = match &self.height_override {
            Some(HeightOverride::Fixed(h)) => HeightModel::Fixed(*h),
            Some(HeightOverride::Function(f)) => HeightModel::Function(Arc::clone(f)),
            None => match self.features.height {
                HeightHint::Fixed(h) => HeightModel::Fixed(h),
                HeightHint::Variable => HeightModel::Adapter,
                HeightHint::Default => HeightModel::Fixed(1),
            },
        };
        vtrace!(model = ?model, "VirtualList height model");
        self.state.set_height_model(model);
        self.sync();
        self.dirty = true;
    }

    /// Pushes the adapter's count and any missing heights into the list state.
    fn sync(&mut self) {
        self.state.set_item_count(self.adapter.count());
        if matches!(self.state.layout().model(), HeightModel::Adapter) {
            let adapter = &self.adapter;
            self.state.refresh_heights_with(|i| adapter.item_height(i));
        }
    }

    fn selection_moved(&mut self, changed: bool) {
        if changed {
            self.dirty = true;
            self.fire_select();
        }
    }

    fn fire_select(&self) {
        let Some(cb) = &self.on_select else {
            return;
        };
        if self.adapter.count() == 0 {
            return;
        }
        let index = self.state.selected_index();
        if let Some(item) = self.adapter.item(index) {
            cb(index, &item);
        }
    }

    fn release_all(&mut self) {
        match self.adapter.widget_factory() {
            Some(factory) => {
                let recycler = FactoryRecycler(factory);
                let pool = &mut self.pool;
                self.active.drain(|w| pool.release(&recycler, w));
                self.pool.clear(&recycler);
            }
            None => {
                self.active.drain(drop);
                self.pool = WidgetPool::new(self.options.pool_max);
            }
        }
    }

    /// Row of item `index` relative to the top of the view, and its height in cells.
    ///
    /// `None` for empty items and for items whose top row is too far away to address.
    fn item_rect(&self, index: usize, width: u16) -> Option<Rect> {
        let h = self.state.item_height(index);
        if h == 0 {
            return None;
        }
        let rel = self.state.offset_for_index(index) as i128 - self.state.offset() as i128;
        let y = i32::try_from(rel).ok()?;
        Some(Rect::new(0, y, width, h.min(u16::MAX as u32) as u16))
    }

    fn render_pooled(&mut self, ctx: &mut RenderContext<'_>, range: VisibleRange) {
        let Some(factory) = self.adapter.widget_factory() else {
            vwarn!("adapter no longer provides a widget factory");
            return;
        };
        let recycler = FactoryRecycler(factory);
        let pool = &mut self.pool;
        self.active.prune(range, |w| pool.release(&recycler, w));

        let area = ctx.area();
        let selected = self.state.selected_index();
        for i in range.indexes() {
            let Some(rect) = self.item_rect(i, area.width) else {
                continue;
            };
            let Some(item) = self.adapter.item(i) else {
                continue;
            };
            let widget = self
                .active
                .get_or_insert_with(i, || self.pool.acquire(&recycler));
            factory.update_widget(widget, &item, i, i == selected);
            widget.layout(area.offset(rect));
            if let Some(mut sub) = ctx.sub_visible(rect) {
                widget.render(&mut sub);
            }
        }
    }

    fn render_direct(&mut self, ctx: &mut RenderContext<'_>, range: VisibleRange) {
        let width = ctx.area().width;
        let selected = self.state.selected_index();
        let selected_style = self.options.style.patch(self.options.selected_style);
        for i in range.indexes() {
            let Some(rect) = self.item_rect(i, width) else {
                continue;
            };
            let Some(mut sub) = ctx.sub_visible(rect) else {
                continue;
            };
            let Some(item) = self.adapter.item(i) else {
                continue;
            };
            let is_selected = i == selected;
            if is_selected {
                sub.fill_all(Cell::new(' ', selected_style));
            }
            self.adapter.render(&item, i, is_selected, &mut sub);
        }
    }
}

impl<A: ListAdapter> Widget for VirtualList<A> {
    /// Lists take all the space they are offered.
    fn measure(&self, constraints: Constraints) -> Size {
        let fill = |max: u64, min: u64| if max == u64::MAX { min } else { max };
        constraints.constrain(Size::new(
            fill(constraints.max.width, constraints.min.width),
            fill(constraints.max.height, constraints.min.height),
        ))
    }

    fn layout(&mut self, area: Rect) {
        self.area = area;
        self.state.set_viewport_height(area.height as u64);
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let area = ctx.area();
        if area != self.area {
            self.layout(area);
        }
        ctx.fill_all(Cell::new(' ', self.options.style));
        if area.is_empty() {
            return;
        }

        self.sync();
        let range = self.state.visible_range();
        if self.features.pooled_widgets {
            self.render_pooled(ctx, range);
        } else {
            self.render_direct(ctx, range);
        }
        vtrace!(
            start = range.start_index,
            end = range.end_index,
            active = self.active.len(),
            in_use = self.pool.in_use(),
            "VirtualList rendered"
        );
    }

    fn handle_event(&mut self, event: &Event) -> EventResult {
        match *event {
            Event::Key(key) => {
                if !self.focused {
                    return EventResult::Ignored;
                }
                match key {
                    Key::Up => self.scroll_by(0, -1),
                    Key::Down => self.scroll_by(0, 1),
                    Key::PageUp => self.page_by(-1),
                    Key::PageDown => self.page_by(1),
                    Key::Home => self.scroll_to_start(),
                    Key::End => self.scroll_to_end(),
                    Key::Enter => {
                        self.sync();
                        self.fire_select();
                    }
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
        self.dirty || self.rendered_revision != Some(self.state.revision())
    }

    fn clear_invalidation(&mut self) {
        self.dirty = false;
        self.rendered_revision = Some(self.state.revision());
    }
}

impl<A: ListAdapter> ScrollController for VirtualList<A> {
    /// Moves the selection by `dy` items.
    fn scroll_by(&mut self, _dx: i64, dy: i64) {
        if dy == 0 {
            return;
        }
        self.sync();
        let changed = self.state.move_selection(dy);
        self.selection_moved(changed);
    }

    /// Selects item `y`.
    fn scroll_to(&mut self, _x: u64, y: u64) {
        self.set_selected(usize::try_from(y).unwrap_or(usize::MAX));
    }

    fn page_by(&mut self, pages: i64) {
        self.sync();
        let page = self
            .options
            .behavior
            .page_rows(self.state.viewport_height())
            .min(i64::MAX as u64) as i64;
        let changed = self.state.move_selection(pages.saturating_mul(page));
        self.selection_moved(changed);
    }

    fn scroll_to_start(&mut self) {
        self.set_selected(0);
    }

    fn scroll_to_end(&mut self) {
        self.set_selected(usize::MAX);
    }
}

impl<A: ListAdapter> Drop for VirtualList<A> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<A: ListAdapter + core::fmt::Debug> core::fmt::Debug for VirtualList<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualList")
            .field("adapter", &self.adapter)
            .field("features", &self.features)
            .field("state", &self.state)
            .field("options", &self.options)
            .field("focused", &self.focused)
            .field("active", &self.active.len())
            .field("pool", &self.pool.stats())
            .finish_non_exhaustive()
    }
}
