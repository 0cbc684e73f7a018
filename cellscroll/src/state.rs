use crate::{Offset, Size};

/// A lightweight snapshot of a viewport's geometry.
///
/// Change notification compares consecutive snapshots, so this is also what the
/// `on_change` callback receives. With `feature = "serde"`, this type implements
/// `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub offset: Offset,
    pub content: Size,
    pub view: Size,
}

impl ViewportState {
    /// `max(0, content - view)` per axis.
    pub fn max_offset(&self) -> Offset {
        Offset {
            x: self.content.width.saturating_sub(self.view.width),
            y: self.content.height.saturating_sub(self.view.height),
        }
    }
}
