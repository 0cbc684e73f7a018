/// A scrollbar thumb along a track of `view` cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thumb {
    pub start: u32,
    pub len: u32,
}

impl Thumb {
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.len)
    }

    pub fn contains(&self, cell: u32) -> bool {
        cell >= self.start && cell < self.end()
    }
}

/// Thumb geometry for content `total` rows long, shown through a `view` cell track scrolled
/// to `offset`.
///
/// When everything fits (`total <= view`) the thumb covers the whole track. Otherwise its
/// length is `view² / total` rounded half-up and kept in `[min_thumb, view]`, and its start is
/// proportional to `offset / (total - view)` over the free track. Pure integer math.
pub fn thumb(total: u64, view: u32, offset: u64, min_thumb: u32) -> Thumb {
    if view == 0 {
        return Thumb::default();
    }
    if total <= view as u64 {
        return Thumb { start: 0, len: view };
    }

    let v = view as u128;
    let total = total as u128;
    let len = div_round(v * v, total) as u32;
    let len = len.max(min_thumb).min(view);

    let scrollable = total - v;
    let offset = (offset as u128).min(scrollable);
    let free = (view - len) as u128;
    let start = div_round(offset * free, scrollable) as u32;

    Thumb {
        start: start.min(view - len),
        len,
    }
}

fn div_round(num: u128, den: u128) -> u128 {
    (num * 2 + den) / (den * 2)
}
