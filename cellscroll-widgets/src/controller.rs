/// Programmatic scrolling, implemented by every scroll container in this crate.
///
/// What a unit means is up to the container: [`crate::VirtualList`] moves its selection by
/// items, [`crate::ScrollView`] moves its viewport by cells (or by items for virtual content).
pub trait ScrollController {
    fn scroll_by(&mut self, dx: i64, dy: i64);

    fn scroll_to(&mut self, x: u64, y: u64);

    /// Moves by `pages` pages; negative values move up.
    fn page_by(&mut self, pages: i64);

    fn scroll_to_start(&mut self);

    fn scroll_to_end(&mut self);
}
