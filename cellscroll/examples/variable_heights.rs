// Example: variable heights, point updates and selection-driven scrolling.
use cellscroll::{HeightModel, ListState};

fn main() {
    let mut list = ListState::new(HeightModel::function(|i| (i % 4) as u32 + 1));
    list.set_item_count(10_000);
    list.set_viewport_height(20);

    println!(
        "total={} offset_for_index(100)={} index_for_offset(250)={}",
        list.total_height(),
        list.offset_for_index(100),
        list.index_for_offset(250)
    );

    // A single height change only touches the prefix sums in O(log n).
    list.set_item_height_at(0, 40);
    println!("after set_item_height_at(0): total={}", list.total_height());

    list.set_selected(5_000);
    println!(
        "selected={} offset={} range={:?}",
        list.selected_index(),
        list.offset(),
        list.visible_range()
    );

    list.move_selection(-3);
    println!("moved up: selected={} offset={}", list.selected_index(), list.offset());
}
