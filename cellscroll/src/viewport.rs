use alloc::sync::Arc;

use crate::{Axis, Offset, ScrollPolicy, Size, ViewportState};

/// A callback fired after a viewport mutation actually changed its geometry.
pub type ViewportChangeCallback = Arc<dyn Fn(&ViewportState) + Send + Sync>;

/// The offset/content/view model shared by every scroll container.
///
/// Every mutator clamps the offset into `[0, max(0, content - view)]` per axis before it
/// returns. An axis whose policy is [`ScrollPolicy::Never`] is pinned at offset 0.
///
/// Change notification is snapshot based: the `on_change` callback (and the
/// [`Viewport::revision`] counter) only advance when the resulting [`ViewportState`] differs
/// from the last notified one, so repeated no-op calls never trigger downstream work.
#[derive(Clone)]
pub struct Viewport {
    state: ViewportState,
    horizontal: ScrollPolicy,
    vertical: ScrollPolicy,
    on_change: Option<ViewportChangeCallback>,
    notified: ViewportState,
    revision: u64,
    batch_depth: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            state: ViewportState::default(),
            horizontal: ScrollPolicy::Auto,
            vertical: ScrollPolicy::Auto,
            on_change: None,
            notified: ViewportState::default(),
            revision: 0,
            batch_depth: 0,
        }
    }

    pub fn with_behavior(mut self, horizontal: ScrollPolicy, vertical: ScrollPolicy) -> Self {
        self.set_behavior(horizontal, vertical);
        self
    }

    pub fn set_behavior(&mut self, horizontal: ScrollPolicy, vertical: ScrollPolicy) {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self.clamp();
        self.commit();
    }

    pub fn policy(&self, axis: Axis) -> ScrollPolicy {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&ViewportState) + Send + Sync + 'static>,
    ) {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    pub fn set_on_change_callback(&mut self, on_change: Option<ViewportChangeCallback>) {
        self.on_change = on_change;
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn offset(&self) -> Offset {
        self.state.offset
    }

    pub fn content_size(&self) -> Size {
        self.state.content
    }

    pub fn view_size(&self) -> Size {
        self.state.view
    }

    /// Incremented once per effective change (once per batch when batching).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn max_offset(&self) -> Offset {
        let max = self.state.max_offset();
        Offset {
            x: if self.horizontal.allows_scroll() { max.x } else { 0 },
            y: if self.vertical.allows_scroll() { max.y } else { 0 },
        }
    }

    /// Whether the offset on `axis` can currently move at all.
    pub fn can_scroll(&self, axis: Axis) -> bool {
        self.max_offset().get(axis) > 0
    }

    pub fn set_content_size(&mut self, content: Size) {
        self.state.content = content;
        self.clamp();
        self.commit();
    }

    pub fn set_view_size(&mut self, view: Size) {
        self.state.view = view;
        self.clamp();
        self.commit();
    }

    pub fn set_sizes(&mut self, content: Size, view: Size) {
        self.state.content = content;
        self.state.view = view;
        self.clamp();
        self.commit();
    }

    pub fn scroll_to(&mut self, x: u64, y: u64) {
        self.state.offset = Offset { x, y };
        self.clamp();
        self.commit();
    }

    pub fn scroll_by(&mut self, dx: i64, dy: i64) {
        let Offset { x, y } = self.state.offset;
        self.state.offset = Offset {
            x: apply_delta(x, dx),
            y: apply_delta(y, dy),
        };
        self.clamp();
        self.commit();
    }

    pub fn scroll_to_start(&mut self) {
        self.scroll_to(0, 0);
    }

    pub fn scroll_to_end(&mut self) {
        let max = self.max_offset();
        self.scroll_to(max.x, max.y);
    }

    /// Batches multiple updates into a single change notification.
    ///
    /// A frame typically pushes content size, view size and offset together; without batching
    /// each setter could fire `on_change` on its own.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch_depth = self.batch_depth.saturating_add(1);
        f(self);
        debug_assert!(self.batch_depth > 0, "batch_depth underflow");
        self.batch_depth = self.batch_depth.saturating_sub(1);
        self.commit();
    }

    fn clamp(&mut self) {
        let max = self.max_offset();
        self.state.offset.x = self.state.offset.x.min(max.x);
        self.state.offset.y = self.state.offset.y.min(max.y);
    }

    fn commit(&mut self) {
        if self.batch_depth > 0 || self.state == self.notified {
            return;
        }
        self.notified = self.state;
        self.revision = self.revision.wrapping_add(1);
        vtrace!(
            x = self.state.offset.x,
            y = self.state.offset.y,
            content_h = self.state.content.height,
            view_h = self.state.view.height,
            "viewport changed"
        );
        if let Some(cb) = &self.on_change {
            cb(&self.state);
        }
    }
}

impl core::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Viewport")
            .field("state", &self.state)
            .field("horizontal", &self.horizontal)
            .field("vertical", &self.vertical)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

pub(crate) fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta < 0 {
        value.saturating_sub(delta.unsigned_abs())
    } else {
        value.saturating_add(delta as u64)
    }
}
