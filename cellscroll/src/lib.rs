//! A headless virtualization engine for terminal cell grids.
//!
//! For the list and scroll-view widgets built on top of it, see the `cellscroll-widgets` crate.
//!
//! This crate holds the pieces every scroll container needs to render huge content at a cost
//! proportional to what is on screen: a clamped offset/content/view model, an index ↔ row
//! offset mapping for fixed- and variable-height items (Fenwick prefix sums), an overscanned
//! visible-range calculator, a widget recycling pool and scrollbar thumb geometry.
//!
//! It draws nothing. A UI layer is expected to provide:
//! - the view size, in cells
//! - item counts and heights (fixed, from a function, or pushed in by an adapter)
//! - user scroll input
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod fenwick;
mod heights;
mod list;
mod pool;
mod range;
mod scrollbar;
mod state;
mod types;
mod viewport;


pub use heights::{HeightFn, HeightModel, ItemLayout, ItemMetrics};
pub use list::ListState;
pub use pool::{FnRecycler, PoolStats, Recycler, WidgetPool};
pub use range::RangeCalculator;
pub use scrollbar::{Thumb, thumb};
pub use state::ViewportState;
pub use types::{Align, Axis, Offset, ScrollBehavior, ScrollPolicy, Size, VisibleRange};
pub use viewport::{Viewport, ViewportChangeCallback};
