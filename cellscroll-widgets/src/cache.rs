#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::HashMap;

use cellscroll::VisibleRange;

#[cfg(feature = "std")]
type IndexMap<W> = HashMap<usize, W>;
#[cfg(not(feature = "std"))]
type IndexMap<W> = BTreeMap<usize, W>;

/// Pooled widgets currently bound to item indexes.
///
/// Eviction is range based: every frame, [`ActiveItems::prune`] hands back each widget whose
/// index fell outside the freshly computed range.
#[derive(Debug)]
pub(crate) struct ActiveItems<W> {
    map: IndexMap<W>,
    scratch: Vec<usize>,
}

impl<W> Default for ActiveItems<W> {
    fn default() -> Self {
        Self {
            map: IndexMap::new(),
            scratch: Vec::new(),
        }
    }
}

impl<W> ActiveItems<W> {
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut W> {
        self.map.get_mut(&index)
    }

    /// The widget bound to `index`, creating one with `acquire` if needed.
    pub(crate) fn get_or_insert_with(&mut self, index: usize, acquire: impl FnOnce() -> W) -> &mut W {
        self.map.entry(index).or_insert_with(acquire)
    }

    /// Removes every entry outside `range`, passing each widget to `release`.
    pub(crate) fn prune(&mut self, range: VisibleRange, mut release: impl FnMut(W)) {
        self.scratch.clear();
        self.scratch
            .extend(self.map.keys().copied().filter(|&i| !range.contains(i)));
        for index in self.scratch.drain(..) {
            if let Some(widget) = self.map.remove(&index) {
                release(widget);
            }
        }
    }

    /// Removes every entry.
    pub(crate) fn drain(&mut self, mut release: impl FnMut(W)) {
        #[cfg(feature = "std")]
        for (_, widget) in self.map.drain() {
            release(widget);
        }
        #[cfg(not(feature = "std"))]
        for (_, widget) in core::mem::take(&mut self.map) {
            release(widget);
        }
    }
}
