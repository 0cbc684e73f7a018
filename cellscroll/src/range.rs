use crate::{ItemMetrics, VisibleRange};

/// Computes which item indexes a window `[offset, offset + view)` needs.
///
/// The calculator is a plain value: it holds no layout state, so the same instance can run
/// against an [`crate::ItemLayout`] or any other [`ItemMetrics`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeCalculator {
    /// Extra items kept on each side of the visible window.
    pub overscan: usize,
}

impl RangeCalculator {
    pub const fn new(overscan: usize) -> Self {
        Self { overscan }
    }

    /// Items that intersect the window, without overscan.
    ///
    /// Returns [`VisibleRange::EMPTY`] when there are no items, the view is empty or every
    /// item is zero-height. `offset` is clamped to `max(0, total - view)` first.
    pub fn visible<M: ItemMetrics + ?Sized>(
        &self,
        metrics: &M,
        offset: u64,
        view: u64,
    ) -> VisibleRange {
        let count = metrics.item_count();
        let total = metrics.total_height();
        if count == 0 || view == 0 || total == 0 {
            return VisibleRange::EMPTY;
        }

        let offset = offset.min(total.saturating_sub(view));
        let last_row = offset.saturating_add(view - 1).min(total - 1);

        let start = metrics.index_for_offset(offset).min(count - 1);
        let end = metrics
            .index_for_offset(last_row)
            .saturating_add(1)
            .min(count);
        VisibleRange::new(start, end)
    }

    /// Items that intersect the window, extended by `overscan` on each side.
    ///
    /// Overscan counts only items with a non-zero height; zero-height items crossed on the way
    /// are included without consuming overscan.
    pub fn compute<M: ItemMetrics + ?Sized>(
        &self,
        metrics: &M,
        offset: u64,
        view: u64,
    ) -> VisibleRange {
        let range = self.visible(metrics, offset, view);
        if range.is_empty() || self.overscan == 0 {
            return range;
        }
        let count = metrics.item_count();

        if metrics.uniform_height().is_some_and(|h| h > 0) {
            return VisibleRange::new(
                range.start_index.saturating_sub(self.overscan),
                range.end_index.saturating_add(self.overscan).min(count),
            );
        }

        let mut start = range.start_index;
        let mut remaining = self.overscan;
        while start > 0 && remaining > 0 {
            start -= 1;
            if metrics.item_height(start) > 0 {
                remaining -= 1;
            }
        }

        let mut end = range.end_index;
        let mut remaining = self.overscan;
        while end < count && remaining > 0 {
            if metrics.item_height(end) > 0 {
                remaining -= 1;
            }
            end += 1;
        }

        VisibleRange::new(start, end)
    }
}
