use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::fenwick::Fenwick;

/// A per-index height provider, shared so layouts stay cheap to clone.
pub type HeightFn = Arc<dyn Fn(usize) -> u32 + Send + Sync>;

/// How item heights are obtained.
#[derive(Clone)]
pub enum HeightModel {
    /// Every item is exactly this many rows tall.
    Fixed(u32),
    /// Heights come from an owned function and are refreshed eagerly.
    Function(HeightFn),
    /// Heights are pushed in by the owner through [`ItemLayout::refresh_with`].
    Adapter,
}

impl Default for HeightModel {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

impl HeightModel {
    pub fn function(f: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

impl core::fmt::Debug for HeightModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(h) => f.debug_tuple("Fixed").field(h).finish(),
            Self::Function(_) => f.write_str("Function(<fn>)"),
            Self::Adapter => f.write_str("Adapter"),
        }
    }
}

/// Read access to an index ↔ offset mapping.
///
/// Implemented by [`ItemLayout`]; content that can answer these queries faster on its own can
/// implement it directly and still use [`crate::RangeCalculator`].
pub trait ItemMetrics {
    fn item_count(&self) -> usize;

    /// Height of item `index`, or 0 when out of range.
    fn item_height(&self, index: usize) -> u32;

    /// Sum of the heights of `[0, index)`. `index >= item_count()` yields the total height.
    fn offset_for_index(&self, index: usize) -> u64;

    /// Largest `i` with `offset_for_index(i) <= offset`, clamped to `[0, item_count - 1]`.
    /// Returns 0 when there are no items.
    fn index_for_offset(&self, offset: u64) -> usize;

    fn total_height(&self) -> u64 {
        self.offset_for_index(self.item_count())
    }

    /// `Some(h)` when every item is known to be exactly `h` rows tall.
    fn uniform_height(&self) -> Option<u32> {
        None
    }
}

impl<M: ItemMetrics + ?Sized> ItemMetrics for &M {
    fn item_count(&self) -> usize {
        (**self).item_count()
    }

    fn item_height(&self, index: usize) -> u32 {
        (**self).item_height(index)
    }

    fn offset_for_index(&self, index: usize) -> u64 {
        (**self).offset_for_index(index)
    }

    fn index_for_offset(&self, offset: u64) -> usize {
        (**self).index_for_offset(offset)
    }

    fn total_height(&self) -> u64 {
        (**self).total_height()
    }

    fn uniform_height(&self) -> Option<u32> {
        (**self).uniform_height()
    }
}

/// Maps item indexes to row offsets and back.
///
/// Fixed-height models answer every query with arithmetic. Variable models keep one `u32`
/// height per item plus a Fenwick tree of prefix sums, so lookups are `O(log n)`, appending
/// `k` items costs `O(k log n)` and a single height update is `O(log n)`. A full `O(n)`
/// rebuild happens only after [`ItemLayout::invalidate`] or a model change.
///
/// For [`HeightModel::Adapter`], heights of items that have not been pushed yet count as 0.
#[derive(Clone, Debug, Default)]
pub struct ItemLayout {
    model: HeightModel,
    count: usize,
    heights: Vec<u32>,
    sums: Fenwick,
    stale: bool,
}

impl ItemLayout {
    pub fn new(model: HeightModel) -> Self {
        let mut layout = Self {
            model: HeightModel::Fixed(1),
            count: 0,
            heights: Vec::new(),
            sums: Fenwick::new(),
            stale: false,
        };
        layout.set_model(model);
        layout
    }

    pub fn fixed(height: u32) -> Self {
        Self::new(HeightModel::Fixed(height))
    }

    pub fn model(&self) -> &HeightModel {
        &self.model
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn set_model(&mut self, model: HeightModel) {
        self.model = model;
        self.heights.clear();
        self.sums = Fenwick::new();
        self.stale = !self.model.is_fixed();
        self.refresh();
    }

    /// Grows or shrinks the item count.
    ///
    /// Shrinking truncates the height table. Growing appends for [`HeightModel::Function`];
    /// adapter-backed layouts wait for the next [`Self::refresh_with`].
    pub fn set_count(&mut self, count: usize) {
        if count == self.count {
            return;
        }
        vtrace!(from = self.count, to = count, "ItemLayout::set_count");
        self.count = count;
        if self.heights.len() > count {
            self.heights.truncate(count);
            self.sums.truncate(count);
        }
        self.refresh();
    }

    /// Marks every stored height as stale. The next refresh rebuilds the whole table.
    pub fn invalidate(&mut self) {
        if self.model.is_fixed() {
            return;
        }
        self.stale = true;
        self.refresh();
    }

    /// Brings a [`HeightModel::Function`] layout up to date. No-op for the other models.
    pub fn refresh(&mut self) {
        if let HeightModel::Function(f) = &self.model {
            let f = Arc::clone(f);
            self.refresh_with(|i| f(i));
        }
    }

    /// Brings a variable layout up to date, pulling missing heights from `height`.
    ///
    /// Only items without a stored height are queried unless the layout was invalidated.
    pub fn refresh_with(&mut self, mut height: impl FnMut(usize) -> u32) {
        if self.model.is_fixed() {
            return;
        }
        if self.stale {
            self.heights.clear();
            self.heights.reserve_exact(self.count);
            self.heights.extend((0..self.count).map(&mut height));
            self.sums = Fenwick::from_heights(&self.heights);
            self.stale = false;
            vdebug!(
                count = self.count,
                total = self.sums.total(),
                "ItemLayout rebuilt"
            );
            return;
        }
        for i in self.heights.len()..self.count {
            let h = height(i);
            self.heights.push(h);
            self.sums.push(h);
        }
    }

    /// Updates one stored height in `O(log n)`. Returns whether anything changed.
    ///
    /// Ignored for fixed models and for items without a stored height yet.
    pub fn set_item_height(&mut self, index: usize, height: u32) -> bool {
        let Some(slot) = self.heights.get_mut(index) else {
            return false;
        };
        if *slot == height {
            return false;
        }
        let delta = height as i64 - *slot as i64;
        *slot = height;
        self.sums.add(index, delta);
        true
    }

    /// Whether every item has a stored, current height.
    pub fn is_synced(&self) -> bool {
        self.model.is_fixed() || (!self.stale && self.heights.len() == self.count)
    }
}

impl ItemMetrics for ItemLayout {
    fn item_count(&self) -> usize {
        self.count
    }

    fn item_height(&self, index: usize) -> u32 {
        if index >= self.count {
            return 0;
        }
        match self.model {
            HeightModel::Fixed(h) => h,
            _ => self.heights.get(index).copied().unwrap_or(0),
        }
    }

    fn offset_for_index(&self, index: usize) -> u64 {
        let index = index.min(self.count);
        match self.model {
            HeightModel::Fixed(h) => (index as u64).saturating_mul(h as u64),
            _ => self.sums.prefix_sum(index),
        }
    }

    fn index_for_offset(&self, offset: u64) -> usize {
        if self.count == 0 {
            return 0;
        }
        let last = self.count - 1;
        match self.model {
            HeightModel::Fixed(0) => 0,
            HeightModel::Fixed(h) => {
                let i = offset / h as u64;
                usize::try_from(i).unwrap_or(usize::MAX).min(last)
            }
            _ => self.sums.upper_index(offset).min(last),
        }
    }

    fn total_height(&self) -> u64 {
        match self.model {
            HeightModel::Fixed(h) => (self.count as u64).saturating_mul(h as u64),
            _ => self.sums.total(),
        }
    }

    fn uniform_height(&self) -> Option<u32> {
        match self.model {
            HeightModel::Fixed(h) => Some(h),
            _ => None,
        }
    }
}
