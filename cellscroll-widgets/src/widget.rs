use cellscroll::Size;

use crate::{Rect, RenderContext};

/// Size bounds passed to [`Widget::measure`]. `u64::MAX` means unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraints {
    pub min: Size,
    pub max: Size,
}

impl Default for Constraints {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Constraints {
    pub const fn unbounded() -> Self {
        Self {
            min: Size::ZERO,
            max: Size::new(u64::MAX, u64::MAX),
        }
    }

    pub const fn tight(size: Size) -> Self {
        Self {
            min: size,
            max: size,
        }
    }

    pub const fn loose(max: Size) -> Self {
        Self {
            min: Size::ZERO,
            max,
        }
    }

    /// Same width bounds, unbounded height.
    pub const fn with_unbounded_height(self) -> Self {
        Self {
            min: Size::new(self.min.width, 0),
            max: Size::new(self.max.width, u64::MAX),
        }
    }

    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            size.width.clamp(self.min.width, self.max.width.max(self.min.width)),
            size.height
                .clamp(self.min.height, self.max.height.max(self.min.height)),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseButton {
    WheelUp,
    WheelDown,
}

/// Decoded input delivered to [`Widget::handle_event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    Key(Key),
    Mouse(MouseButton),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventResult {
    Handled,
    Ignored,
}

impl EventResult {
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Anything that can be measured, laid out and drawn into a [`RenderContext`].
pub trait Widget {
    /// The size this widget wants within `constraints`.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Stores the rectangle the widget was assigned, in buffer coordinates.
    fn layout(&mut self, area: Rect) {
        let _ = area;
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>);

    fn handle_event(&mut self, event: &Event) -> EventResult {
        let _ = event;
        EventResult::Ignored
    }

    /// Whether the widget's appearance changed since the last [`Self::clear_invalidation`].
    fn needs_render(&self) -> bool {
        false
    }

    fn clear_invalidation(&mut self) {}

    /// The virtualization capability, for content that can render items on demand.
    fn as_virtual_content(&mut self) -> Option<&mut dyn VirtualContent> {
        None
    }
}

impl<W: Widget + ?Sized> Widget for alloc::boxed::Box<W> {
    fn measure(&self, constraints: Constraints) -> Size {
        (**self).measure(constraints)
    }

    fn layout(&mut self, area: Rect) {
        (**self).layout(area)
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        (**self).render(ctx)
    }

    fn handle_event(&mut self, event: &Event) -> EventResult {
        (**self).handle_event(event)
    }

    fn needs_render(&self) -> bool {
        (**self).needs_render()
    }

    fn clear_invalidation(&mut self) {
        (**self).clear_invalidation()
    }

    fn as_virtual_content(&mut self) -> Option<&mut dyn VirtualContent> {
        (**self).as_virtual_content()
    }
}

/// Content made of addressable items that can be rendered one at a time.
///
/// The optional lookups let content with its own index structures bypass the generic
/// height table; returning `None` falls back to it.
pub trait VirtualContent {
    fn item_count(&self) -> usize;

    fn item_height(&self, index: usize) -> u32;

    /// Draws item `index` into a context whose area is exactly the item's rows.
    fn render_item(&mut self, index: usize, ctx: &mut RenderContext<'_>);

    fn total_height(&self) -> Option<u64> {
        None
    }

    fn index_for_offset(&self, offset: u64) -> Option<usize> {
        let _ = offset;
        None
    }

    fn offset_for_index(&self, index: usize) -> Option<u64> {
        let _ = index;
        None
    }
}

/// A widget that draws nothing, for adapters that render items directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoWidget;

impl Widget for NoWidget {
    fn measure(&self, _constraints: Constraints) -> Size {
        Size::ZERO
    }

    fn render(&mut self, _ctx: &mut RenderContext<'_>) {}
}
