use crate::viewport::apply_delta;
use crate::{
    Align, HeightModel, ItemLayout, ItemMetrics, RangeCalculator, ScrollBehavior, Size, Viewport,
    ViewportChangeCallback, ViewportState, VisibleRange,
};

/// The headless windowing model of a virtualized list.
///
/// Owns the item layout, a vertical [`Viewport`] whose content height always equals the
/// layout's total height, the overscan setting and the selected index. The selection is kept
/// in `[0, count - 1]` (0 when empty) after every mutation.
#[derive(Clone, Debug)]
pub struct ListState {
    layout: ItemLayout,
    viewport: Viewport,
    overscan: usize,
    selected: usize,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(HeightModel::default())
    }
}

impl ListState {
    pub fn new(model: HeightModel) -> Self {
        let behavior = ScrollBehavior::vertical();
        let mut state = Self {
            layout: ItemLayout::new(model),
            viewport: Viewport::new().with_behavior(behavior.horizontal, behavior.vertical),
            overscan: 0,
            selected: 0,
        };
        state.sync_viewport();
        state
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn layout(&self) -> &ItemLayout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&ViewportState) + Send + Sync + 'static>,
    ) {
        self.viewport.set_on_change(on_change);
    }

    pub fn set_on_change_callback(&mut self, on_change: Option<ViewportChangeCallback>) {
        self.viewport.set_on_change_callback(on_change);
    }

    pub fn revision(&self) -> u64 {
        self.viewport.revision()
    }

    pub fn item_count(&self) -> usize {
        self.layout.item_count()
    }

    pub fn set_item_count(&mut self, count: usize) {
        self.layout.set_count(count);
        self.selected = self.clamp_index(self.selected);
        self.sync_viewport();
    }

    pub fn viewport_height(&self) -> u64 {
        self.viewport.view_size().height
    }

    pub fn set_viewport_height(&mut self, height: u64) {
        self.viewport.set_view_size(Size::new(0, height));
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
    }

    pub fn set_height_model(&mut self, model: HeightModel) {
        self.layout.set_model(model);
        self.sync_viewport();
    }

    /// Pulls missing (or, after invalidation, all) heights from `height`.
    pub fn refresh_heights_with(&mut self, height: impl FnMut(usize) -> u32) {
        self.layout.refresh_with(height);
        self.sync_viewport();
    }

    pub fn invalidate_heights(&mut self) {
        self.layout.invalidate();
        self.sync_viewport();
    }

    pub fn set_item_height_at(&mut self, index: usize, height: u32) {
        if self.layout.set_item_height(index, height) {
            self.sync_viewport();
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Selects `index` (clamped) and scrolls it into view. Returns whether the selection moved.
    pub fn set_selected(&mut self, index: usize) -> bool {
        let index = self.clamp_index(index);
        let changed = index != self.selected;
        self.selected = index;
        self.ensure_visible(index);
        changed
    }

    /// Moves the selection by `delta` items, saturating at both ends.
    pub fn move_selection(&mut self, delta: i64) -> bool {
        let target = apply_delta(self.selected as u64, delta);
        self.set_selected(usize::try_from(target).unwrap_or(usize::MAX))
    }

    pub fn offset(&self) -> u64 {
        self.viewport.offset().y
    }

    pub fn max_offset(&self) -> u64 {
        self.viewport.max_offset().y
    }

    pub fn scroll_by(&mut self, rows: i64) {
        self.viewport.scroll_by(0, rows);
    }

    pub fn scroll_to_offset(&mut self, offset: u64) {
        self.viewport.scroll_to(0, offset);
    }

    /// Puts item `index` at the top of the view (as far as the content allows).
    pub fn scroll_to_index(&mut self, index: usize) {
        self.scroll_to_index_aligned(index, Align::Start);
    }

    pub fn scroll_to_index_aligned(&mut self, index: usize, align: Align) {
        let count = self.item_count();
        if count == 0 {
            self.scroll_to_offset(0);
            return;
        }
        let index = index.min(count - 1);
        let start = self.offset_for_index(index);
        let end = start.saturating_add(self.item_height(index) as u64);
        let view = self.viewport_height();

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => {
                let center = start.saturating_add(self.item_height(index) as u64 / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.offset();
                let cur_end = cur.saturating_add(view);
                if start >= cur && end <= cur_end {
                    cur
                } else if start < cur || end.saturating_sub(start) > view {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };
        self.scroll_to_offset(target);
    }

    pub fn scroll_to_start(&mut self) {
        self.scroll_to_offset(0);
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_to_offset(self.max_offset());
    }

    /// Scrolls the minimum distance that brings item `index` into view.
    ///
    /// An item taller than the view is aligned to its top.
    pub fn ensure_visible(&mut self, index: usize) {
        if self.item_count() == 0 {
            return;
        }
        self.scroll_to_index_aligned(index, Align::Auto);
    }

    pub fn visible_range(&self) -> VisibleRange {
        RangeCalculator::new(self.overscan).compute(
            &self.layout,
            self.offset(),
            self.viewport_height(),
        )
    }

    pub fn visible_range_no_overscan(&self) -> VisibleRange {
        RangeCalculator::new(0).visible(&self.layout, self.offset(), self.viewport_height())
    }

    pub fn total_height(&self) -> u64 {
        self.layout.total_height()
    }

    pub fn item_height(&self, index: usize) -> u32 {
        self.layout.item_height(index)
    }

    pub fn offset_for_index(&self, index: usize) -> u64 {
        self.layout.offset_for_index(index)
    }

    pub fn index_for_offset(&self, offset: u64) -> usize {
        self.layout.index_for_offset(offset)
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.item_count().saturating_sub(1))
    }

    fn sync_viewport(&mut self) {
        let total = self.layout.total_height();
        self.viewport.set_content_size(Size::new(0, total));
    }
}
