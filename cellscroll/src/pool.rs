use alloc::vec::Vec;

/// Creates, resets and tears down pooled widgets.
pub trait Recycler<W> {
    fn create(&self) -> W;

    /// Returns a released widget to a neutral state before it is stored for reuse.
    fn reset(&self, _widget: &mut W) {}

    /// Tears down a widget that will not be reused.
    fn discard(&self, widget: W) {
        drop(widget);
    }
}

/// A [`Recycler`] built from closures.
pub struct FnRecycler<W, C, R = fn(&mut W)> {
    create: C,
    reset: Option<R>,
    _widget: core::marker::PhantomData<fn() -> W>,
}

impl<W, C: Fn() -> W> FnRecycler<W, C> {
    pub fn new(create: C) -> Self {
        Self {
            create,
            reset: None,
            _widget: core::marker::PhantomData,
        }
    }
}

impl<W, C: Fn() -> W, R: Fn(&mut W)> FnRecycler<W, C, R> {
    pub fn with_reset(create: C, reset: R) -> Self {
        Self {
            create,
            reset: Some(reset),
            _widget: core::marker::PhantomData,
        }
    }
}

impl<W, C: Fn() -> W, R: Fn(&mut W)> Recycler<W> for FnRecycler<W, C, R> {
    fn create(&self) -> W {
        (self.create)()
    }

    fn reset(&self, widget: &mut W) {
        if let Some(reset) = &self.reset {
            reset(widget);
        }
    }
}

impl<W, C, R> core::fmt::Debug for FnRecycler<W, C, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnRecycler")
            .field("has_reset", &self.reset.is_some())
            .finish_non_exhaustive()
    }
}

/// Lifetime counters for a [`WidgetPool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolStats {
    pub created: u64,
    pub reused: u64,
    pub discarded: u64,
}

/// An object pool of renderer widgets.
///
/// Released widgets are reset and kept on a LIFO free list, so a release followed by an
/// acquire hands back the same instance. With `max_free > 0` the free list never holds more
/// than `max_free` widgets; extra releases are discarded through the recycler.
#[derive(Debug)]
pub struct WidgetPool<W> {
    free: Vec<W>,
    max_free: usize,
    in_use: usize,
    stats: PoolStats,
}

impl<W> Default for WidgetPool<W> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<W> WidgetPool<W> {
    /// `max_free == 0` means unbounded.
    pub fn new(max_free: usize) -> Self {
        Self {
            free: Vec::new(),
            max_free,
            in_use: 0,
            stats: PoolStats::default(),
        }
    }

    pub fn acquire(&mut self, recycler: &(impl Recycler<W> + ?Sized)) -> W {
        self.in_use = self.in_use.saturating_add(1);
        match self.free.pop() {
            Some(widget) => {
                self.stats.reused += 1;
                widget
            }
            None => {
                self.stats.created += 1;
                vtrace!(created = self.stats.created, "WidgetPool create");
                recycler.create()
            }
        }
    }

    pub fn release(&mut self, recycler: &(impl Recycler<W> + ?Sized), mut widget: W) {
        if self.in_use == 0 {
            debug_assert!(false, "WidgetPool::release without a matching acquire");
            vwarn!("WidgetPool::release without a matching acquire");
        }
        self.in_use = self.in_use.saturating_sub(1);

        recycler.reset(&mut widget);
        if self.max_free > 0 && self.free.len() >= self.max_free {
            self.stats.discarded += 1;
            vtrace!(discarded = self.stats.discarded, "WidgetPool discard");
            recycler.discard(widget);
        } else {
            self.free.push(widget);
        }
    }

    /// Changes the free-list bound. Call [`Self::trim`] to apply it to already-free widgets.
    pub fn set_max(&mut self, max_free: usize) {
        self.max_free = max_free;
    }

    /// Discards free widgets beyond the current bound.
    pub fn trim(&mut self, recycler: &(impl Recycler<W> + ?Sized)) {
        if self.max_free == 0 {
            return;
        }
        while self.free.len() > self.max_free {
            if let Some(widget) = self.free.pop() {
                self.stats.discarded += 1;
                recycler.discard(widget);
            }
        }
    }

    /// Discards every free widget. In-use widgets are unaffected.
    pub fn clear(&mut self, recycler: &(impl Recycler<W> + ?Sized)) {
        let n = self.free.len();
        for widget in self.free.drain(..) {
            recycler.discard(widget);
        }
        self.stats.discarded += n as u64;
        if n > 0 {
            vdebug!(discarded = n, "WidgetPool cleared");
        }
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn max(&self) -> usize {
        self.max_free
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}
