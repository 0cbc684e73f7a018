// Example: a million fixed-height rows and a few scroll helpers.
use cellscroll::{Align, HeightModel, ListState, thumb};

fn main() {
    let mut list = ListState::new(HeightModel::Fixed(1)).with_overscan(2);
    list.set_item_count(1_000_000);
    list.set_viewport_height(10);
    list.scroll_to_offset(123_456);

    println!("total_height={}", list.total_height());
    println!("visible_range={:?}", list.visible_range());
    println!(
        "without overscan={:?}",
        list.visible_range_no_overscan()
    );

    list.scroll_to_index_aligned(999_999, Align::End);
    println!("after scroll_to_index: offset={}", list.offset());

    let t = thumb(list.total_height(), 10, list.offset(), 1);
    println!("thumb={t:?}");
}
