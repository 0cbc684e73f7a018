use cellscroll::Recycler;

use crate::{RenderContext, Widget};

/// How a [`ListAdapter`] sizes its items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeightHint {
    /// One row per item.
    #[default]
    Default,
    /// Every item is this many rows tall.
    Fixed(u32),
    /// Heights come from [`ListAdapter::item_height`].
    Variable,
}

/// Builds and rebinds pooled item widgets.
pub trait WidgetFactory<T> {
    type Widget: Widget;

    fn new_widget(&self) -> Self::Widget;

    /// Binds `widget` to `item` at `index`. Called every frame for items in range.
    fn update_widget(&self, widget: &mut Self::Widget, item: &T, index: usize, selected: bool);

    /// Clears per-item state before the widget goes back to the pool.
    fn reset_widget(&self, _widget: &mut Self::Widget) {}

    fn discard_widget(&self, widget: Self::Widget) {
        drop(widget);
    }
}

/// The data source behind a [`crate::VirtualList`].
///
/// Adapters either draw items directly through [`Self::render`], or expose a
/// [`WidgetFactory`] so the list can keep one pooled widget per item in range. Adapters that
/// render directly use [`crate::NoWidget`] as their `Widget` type.
pub trait ListAdapter {
    type Item;
    type Widget: Widget;

    fn count(&self) -> usize;

    /// The item at `index`, or `None` when the index is out of range.
    fn item(&self, index: usize) -> Option<Self::Item>;

    /// Draws one item into a context covering exactly its rows.
    fn render(&self, item: &Self::Item, index: usize, selected: bool, ctx: &mut RenderContext<'_>);

    fn height_hint(&self) -> HeightHint {
        HeightHint::Default
    }

    /// Used with [`HeightHint::Variable`].
    fn item_height(&self, index: usize) -> u32 {
        let _ = index;
        1
    }

    fn widget_factory(&self) -> Option<&dyn WidgetFactory<Self::Item, Widget = Self::Widget>> {
        None
    }
}

/// The optional capabilities of an adapter, probed once when it is installed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdapterFeatures {
    pub height: HeightHint,
    pub pooled_widgets: bool,
}

impl AdapterFeatures {
    pub fn probe<A: ListAdapter + ?Sized>(adapter: &A) -> Self {
        Self {
            height: adapter.height_hint(),
            pooled_widgets: adapter.widget_factory().is_some(),
        }
    }
}

/// Drives a [`cellscroll::WidgetPool`] through an adapter's factory.
pub(crate) struct FactoryRecycler<'a, T, W: Widget>(pub(crate) &'a dyn WidgetFactory<T, Widget = W>);

impl<T, W: Widget> Recycler<W> for FactoryRecycler<'_, T, W> {
    fn create(&self) -> W {
        self.0.new_widget()
    }

    fn reset(&self, widget: &mut W) {
        self.0.reset_widget(widget);
    }

    fn discard(&self, widget: W) {
        self.0.discard_widget(widget);
    }
}
