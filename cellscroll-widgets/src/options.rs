use alloc::sync::Arc;

use cellscroll::{ScrollBehavior, ScrollPolicy, ViewportChangeCallback, ViewportState};

use crate::{ScrollbarSymbols, Style};

/// Configuration for [`crate::VirtualList`].
///
/// Cheap to clone: the scroll callback lives in an `Arc`.
#[derive(Clone)]
pub struct ListOptions {
    /// Extra items kept bound on each side of the view.
    pub overscan: usize,
    /// Bound on pooled free widgets; 0 keeps every released widget.
    pub pool_max: usize,
    pub behavior: ScrollBehavior,
    pub style: Style,
    /// Patched over `style` for the selected row.
    pub selected_style: Style,
    /// Fired after the list's viewport actually moved or resized.
    pub on_scroll: Option<ViewportChangeCallback>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            overscan: 2,
            pool_max: 0,
            behavior: ScrollBehavior::vertical(),
            style: Style::new(),
            selected_style: Style::new().reversed(),
            on_scroll: None,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_pool_max(mut self, pool_max: usize) -> Self {
        self.pool_max = pool_max;
        self
    }

    pub fn with_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_selected_style(mut self, selected_style: Style) -> Self {
        self.selected_style = selected_style;
        self
    }

    pub fn with_on_scroll(
        mut self,
        on_scroll: Option<impl Fn(&ViewportState) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll = on_scroll.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("overscan", &self.overscan)
            .field("pool_max", &self.pool_max)
            .field("behavior", &self.behavior)
            .field("style", &self.style)
            .field("selected_style", &self.selected_style)
            .finish_non_exhaustive()
    }
}

/// Configuration for [`crate::ScrollView`].
#[derive(Clone)]
pub struct ScrollViewOptions {
    pub behavior: ScrollBehavior,
    /// Extra items rendered around the view in virtual mode.
    pub overscan: usize,
    pub min_thumb: u32,
    pub style: Style,
    pub scrollbar_symbols: ScrollbarSymbols,
    pub track_style: Style,
    pub thumb_style: Style,
    pub on_scroll: Option<ViewportChangeCallback>,
}

impl Default for ScrollViewOptions {
    fn default() -> Self {
        Self {
            behavior: ScrollBehavior::default(),
            overscan: 0,
            min_thumb: 1,
            style: Style::new(),
            scrollbar_symbols: ScrollbarSymbols::default(),
            track_style: Style::new(),
            thumb_style: Style::new().reversed(),
            on_scroll: None,
        }
    }
}

impl ScrollViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_policies(mut self, horizontal: ScrollPolicy, vertical: ScrollPolicy) -> Self {
        self.behavior = self.behavior.with_policies(horizontal, vertical);
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_min_thumb(mut self, min_thumb: u32) -> Self {
        self.min_thumb = min_thumb;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_scrollbar_symbols(mut self, symbols: ScrollbarSymbols) -> Self {
        self.scrollbar_symbols = symbols;
        self
    }

    pub fn with_scrollbar_styles(mut self, track: Style, thumb: Style) -> Self {
        self.track_style = track;
        self.thumb_style = thumb;
        self
    }

    pub fn with_on_scroll(
        mut self,
        on_scroll: Option<impl Fn(&ViewportState) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll = on_scroll.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for ScrollViewOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollViewOptions")
            .field("behavior", &self.behavior)
            .field("overscan", &self.overscan)
            .field("min_thumb", &self.min_thumb)
            .field("style", &self.style)
            .field("scrollbar_symbols", &self.scrollbar_symbols)
            .finish_non_exhaustive()
    }
}
