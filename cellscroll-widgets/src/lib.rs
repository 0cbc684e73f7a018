//! Terminal widgets built on the `cellscroll` engine.
//!
//! `cellscroll` owns the math (viewport clamping, item offsets, visible ranges, pooling). This
//! crate puts it to work on a small cell-grid render surface:
//!
//! - [`VirtualList`]: a selectable list over a [`ListAdapter`], drawing rows directly or through
//!   pooled per-item widgets
//! - [`ScrollView`]: a scroll container for one child, either item-virtualized
//!   ([`VirtualContent`]) or rendered once off-screen and windowed
//! - [`Scrollbar`]: track and thumb drawing for either axis
//!
//! The surface types ([`CellBuffer`], [`RenderContext`], [`Widget`]) are deliberately minimal;
//! a host application copies the finished buffer to its terminal backend.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod adapter;
mod cache;
mod controller;
mod list;
mod options;
mod scroll_view;
mod scrollbar;
mod surface;
mod widget;

#[cfg(test)]
mod tests;

pub use adapter::{AdapterFeatures, HeightHint, ListAdapter, WidgetFactory};
pub use controller::ScrollController;
pub use list::{OnSelect, VirtualList};
pub use options::{ListOptions, ScrollViewOptions};
pub use scroll_view::ScrollView;
pub use scrollbar::{Scrollbar, ScrollbarSymbols};
pub use surface::{Attr, Cell, CellBuffer, Rect, RenderContext, Style, WIDE_CONTINUATION};
pub use widget::{
    Constraints, Event, EventResult, Key, MouseButton, NoWidget, VirtualContent, Widget,
};
