use crate::*;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use cellscroll::{Size, ViewportState};

fn render_into(widget: &mut impl Widget, width: u16, height: u16) -> CellBuffer {
    let mut buf = CellBuffer::new(width, height);
    {
        let mut ctx = RenderContext::new(&mut buf);
        widget.render(&mut ctx);
    }
    buf
}

fn row(buf: &CellBuffer, y: u16) -> String {
    buf.row_text(y).trim_end().to_string()
}

/// Draws each item directly as `item <index>`.
struct Rows {
    count: usize,
    hint: HeightHint,
    heights: Vec<u32>,
}

impl Rows {
    fn new(count: usize) -> Self {
        Self {
            count,
            hint: HeightHint::Default,
            heights: Vec::new(),
        }
    }

    fn variable(heights: Vec<u32>) -> Self {
        Self {
            count: heights.len(),
            hint: HeightHint::Variable,
            heights,
        }
    }
}

impl ListAdapter for Rows {
    type Item = String;
    type Widget = NoWidget;

    fn count(&self) -> usize {
        self.count
    }

    fn item(&self, index: usize) -> Option<String> {
        (index < self.count).then(|| format!("item {index}"))
    }

    fn render(&self, item: &String, _index: usize, _selected: bool, ctx: &mut RenderContext<'_>) {
        ctx.put_str(0, 0, item, Style::new());
    }

    fn height_hint(&self) -> HeightHint {
        self.hint
    }

    fn item_height(&self, index: usize) -> u32 {
        self.heights.get(index).copied().unwrap_or(1)
    }
}

#[derive(Default)]
struct Label {
    text: String,
    selected: bool,
}

impl Widget for Label {
    fn measure(&self, _constraints: Constraints) -> Size {
        Size::new(self.text.len() as u64, 1)
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let style = if self.selected {
            Style::new().reversed()
        } else {
            Style::new()
        };
        ctx.put_str(0, 0, &self.text, style);
    }
}

#[derive(Clone, Default)]
struct Counters {
    created: Arc<AtomicUsize>,
    discarded: Arc<AtomicUsize>,
}

impl Counters {
    fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    fn discarded(&self) -> usize {
        self.discarded.load(Ordering::SeqCst)
    }
}

struct LabelFactory(Counters);

impl WidgetFactory<String> for LabelFactory {
    type Widget = Label;

    fn new_widget(&self) -> Label {
        self.0.created.fetch_add(1, Ordering::SeqCst);
        Label::default()
    }

    fn update_widget(&self, widget: &mut Label, item: &String, _index: usize, selected: bool) {
        widget.text.clone_from(item);
        widget.selected = selected;
    }

    fn reset_widget(&self, widget: &mut Label) {
        widget.text.clear();
        widget.selected = false;
    }

    fn discard_widget(&self, widget: Label) {
        self.0.discarded.fetch_add(1, Ordering::SeqCst);
        drop(widget);
    }
}

struct Pooled {
    count: usize,
    factory: LabelFactory,
}

impl Pooled {
    fn new(count: usize, counters: &Counters) -> Self {
        Self {
            count,
            factory: LabelFactory(counters.clone()),
        }
    }
}

impl ListAdapter for Pooled {
    type Item = String;
    type Widget = Label;

    fn count(&self) -> usize {
        self.count
    }

    fn item(&self, index: usize) -> Option<String> {
        (index < self.count).then(|| format!("row {index}"))
    }

    fn render(&self, _item: &String, _index: usize, _selected: bool, _ctx: &mut RenderContext<'_>) {
    }

    fn widget_factory(&self) -> Option<&dyn WidgetFactory<String, Widget = Label>> {
        Some(&self.factory)
    }
}

#[test]
fn rect_intersect_and_offset() {
    let a = Rect::new(0, 0, 10, 5);
    let b = Rect::new(-3, 2, 5, 10);
    assert_eq!(a.intersect(b), Some(Rect::new(0, 2, 2, 3)));
    assert_eq!(a.intersect(Rect::new(10, 0, 3, 3)), None);
    assert_eq!(a.offset(Rect::new(2, -1, 3, 1)), Rect::new(2, -1, 3, 1));
    assert!(b.contains(-3, 2));
    assert!(!b.contains(2, 2));
}

#[test]
fn rect_edges_saturate() {
    let far = Rect::new(i32::MAX - 2, i32::MAX, 10, 5);
    assert_eq!(far.right(), i32::MAX);
    assert_eq!(far.bottom(), i32::MAX);
    assert_eq!(Rect::new(0, 0, 10, 5).intersect(far), None);
    assert_eq!(
        Rect::new(0, i32::MAX, 4, 4).offset(Rect::new(0, 9, 1, 1)).y,
        i32::MAX
    );
}

#[test]
fn style_patch_layers_colors_and_attrs() {
    let base = Style::new().fg(1).bg(2).attrs(Attr::BOLD);
    let over = Style::new().bg(7).reversed();
    let s = base.patch(over);
    assert_eq!(s.fg, Some(1));
    assert_eq!(s.bg, Some(7));
    assert_eq!(s.attrs, Attr::BOLD | Attr::REVERSE);
}

#[test]
fn put_str_handles_wide_characters() {
    let mut buf = CellBuffer::new(6, 2);
    {
        let mut ctx = RenderContext::new(&mut buf);
        assert_eq!(ctx.put_str(0, 0, "a世b", Style::new()), 4);
        // The wide character would straddle the right edge.
        assert_eq!(ctx.put_str(4, 1, "x世", Style::new()), 2);
    }
    assert_eq!(buf.row_text(0), "a世b  ");
    assert_eq!(buf.get(2, 0).map(|c| c.ch), Some(WIDE_CONTINUATION));
    assert_eq!(buf.row_text(1), "    x ");
}

#[test]
fn sub_contexts_clip_to_parent() {
    let mut buf = CellBuffer::new(6, 2);
    {
        let mut ctx = RenderContext::new(&mut buf);
        let mut sub = ctx.sub(Rect::new(-2, 0, 4, 1));
        sub.put_str(0, 0, "abcd", Style::new());
        assert!(!sub.set(0, 1, Cell::new('z', Style::new())));
        assert!(ctx.sub_visible(Rect::new(10, 0, 2, 1)).is_none());
        assert!(ctx.sub_visible(Rect::new(5, 1, 4, 4)).is_some());
    }
    assert_eq!(buf.row_text(0), "cd    ");
    assert_eq!(buf.row_text(1), "      ");
}

#[test]
fn buffer_fill_is_clipped() {
    let mut buf = CellBuffer::new(4, 3);
    let cell = Cell::new('x', Style::new());
    buf.fill(Rect::new(2, 1, 10, 10), cell);
    assert_eq!(buf.row_text(0), "    ");
    assert_eq!(buf.row_text(1), "  xx");
    assert_eq!(buf.row_text(2), "  xx");
    assert!(!buf.set(4, 0, cell));
}

#[test]
fn constraints_constrain() {
    let c = Constraints {
        min: Size::new(2, 1),
        max: Size::new(10, 4),
    };
    assert_eq!(c.constrain(Size::new(0, 9)), Size::new(2, 4));
    assert_eq!(c.with_unbounded_height().max, Size::new(10, u64::MAX));
    assert_eq!(
        Constraints::tight(Size::new(3, 3)).constrain(Size::ZERO),
        Size::new(3, 3)
    );
}

#[test]
fn scrollbar_draws_track_and_thumb() {
    let mut buf = CellBuffer::new(1, 10);
    {
        let mut ctx = RenderContext::new(&mut buf);
        Scrollbar::vertical().render(&mut ctx, Rect::new(0, 0, 1, 10), 100, 0);
    }
    assert_eq!(buf.get(0, 0).map(|c| c.ch), Some('#'));
    assert!(buf.get(0, 0).is_some_and(|c| c.style.attrs.contains(Attr::REVERSE)));
    assert!((1..10).all(|y| buf.get(0, y).map(|c| c.ch) == Some('|')));

    let mut buf = CellBuffer::new(10, 1);
    {
        let mut ctx = RenderContext::new(&mut buf);
        Scrollbar::horizontal()
            .with_min_thumb(3)
            .render(&mut ctx, Rect::new(0, 0, 10, 1), 100, 90);
    }
    assert_eq!(buf.row_text(0), "-------###");
}

#[test]
fn list_direct_render_and_selected_style() {
    let mut list = VirtualList::new(Rows::new(100));
    list.layout(Rect::new(0, 0, 10, 5));

    let buf = render_into(&mut list, 10, 5);
    assert_eq!(row(&buf, 0), "item 0");
    assert_eq!(row(&buf, 4), "item 4");
    assert!(buf.get(9, 0).is_some_and(|c| c.style.attrs.contains(Attr::REVERSE)));

    list.set_selected(50);
    assert_eq!(list.offset(), 46);
    let buf = render_into(&mut list, 10, 5);
    assert_eq!(row(&buf, 0), "item 46");
    assert_eq!(row(&buf, 4), "item 50");
    assert!(buf.get(9, 4).is_some_and(|c| c.style.attrs.contains(Attr::REVERSE)));
    assert!(buf.get(9, 3).is_some_and(|c| c.style.attrs.is_empty()));
    assert_eq!(list.selected_item().as_deref(), Some("item 50"));
}

#[test]
fn list_variable_heights_from_adapter() {
    let mut list = VirtualList::new(Rows::variable(alloc::vec![1, 3, 1, 2, 2, 1]));
    assert_eq!(list.features().height, HeightHint::Variable);
    assert_eq!(list.state().total_height(), 10);
    assert_eq!(list.state().offset_for_index(3), 5);

    let buf = render_into(&mut list, 8, 4);
    assert_eq!(row(&buf, 0), "item 0");
    assert_eq!(row(&buf, 1), "item 1");
    assert_eq!(row(&buf, 2), "");
    assert_eq!(row(&buf, 3), "");

    list.set_item_height(2);
    assert_eq!(list.state().total_height(), 12);
    list.use_adapter_heights();
    assert_eq!(list.state().total_height(), 10);
}

#[test]
fn list_height_func_overrides_adapter_heights() {
    let mut list = VirtualList::new(Rows::variable(alloc::vec![1, 3, 1, 2, 2, 1]));
    list.set_item_height_func(|i| i as u32 % 2 + 1);
    assert_eq!(list.state().total_height(), 9);
    assert_eq!(list.state().offset_for_index(3), 4);

    let buf = render_into(&mut list, 8, 4);
    assert_eq!(row(&buf, 0), "item 0");
    assert_eq!(row(&buf, 1), "item 1");
    assert_eq!(row(&buf, 2), "");
    assert_eq!(row(&buf, 3), "item 2");

    // Overrides survive adapter edits until dropped.
    list.adapter_mut().heights[0] = 5;
    list.invalidate_heights();
    assert_eq!(list.state().total_height(), 9);
    list.use_adapter_heights();
    assert_eq!(list.state().total_height(), 14);
}

#[test]
fn list_renders_items_taller_than_the_row_range() {
    let mut list = VirtualList::new(Rows::variable(alloc::vec![3_000_000_000, 1, 1]));
    assert_eq!(list.state().total_height(), 3_000_000_002);

    let buf = render_into(&mut list, 10, 5);
    assert_eq!(row(&buf, 0), "item 0");
    assert_eq!(row(&buf, 4), "");

    list.set_selected(1);
    assert_eq!(list.offset(), 2_999_999_996);
    let buf = render_into(&mut list, 10, 5);
    assert_eq!(row(&buf, 0), "");
    assert_eq!(row(&buf, 4), "item 1");
}

#[test]
fn list_keys_need_focus_but_wheel_does_not() {
    let mut list = VirtualList::new(Rows::new(100));
    list.layout(Rect::new(0, 0, 10, 5));

    assert_eq!(
        list.handle_event(&Event::Key(Key::Down)),
        EventResult::Ignored
    );
    assert_eq!(list.selected_index(), 0);
    assert!(
        list.handle_event(&Event::Mouse(MouseButton::WheelDown))
            .is_handled()
    );
    assert_eq!(list.selected_index(), 3);

    list.set_focused(true);
    assert!(list.handle_event(&Event::Key(Key::Down)).is_handled());
    assert_eq!(list.selected_index(), 4);
    list.handle_event(&Event::Key(Key::End));
    assert_eq!(list.selected_index(), 99);
    assert_eq!(list.offset(), 95);
    list.handle_event(&Event::Key(Key::Home));
    assert_eq!(list.selected_index(), 0);
    list.handle_event(&Event::Key(Key::PageDown));
    assert_eq!(list.selected_index(), 5);
    assert_eq!(
        list.handle_event(&Event::Key(Key::Char('q'))),
        EventResult::Ignored
    );
}

#[test]
fn list_on_select_fires_on_change_and_enter() {
    let hits = Arc::new(AtomicUsize::new(0));
    let last = Arc::new(AtomicUsize::new(usize::MAX));
    let mut list = VirtualList::new(Rows::new(20));
    list.layout(Rect::new(0, 0, 10, 5));
    {
        let hits = Arc::clone(&hits);
        let last = Arc::clone(&last);
        list.on_select(move |i, item: &String| {
            assert_eq!(item, &format!("item {i}"));
            hits.fetch_add(1, Ordering::SeqCst);
            last.store(i, Ordering::SeqCst);
        });
    }

    list.set_selected(3);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    list.set_selected(3);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    list.set_focused(true);
    list.handle_event(&Event::Key(Key::Enter));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(last.load(Ordering::SeqCst), 3);

    list.scroll_to_start();
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(last.load(Ordering::SeqCst), 0);
    list.scroll_to_start();
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn list_pooled_widgets_stay_within_range() {
    let counters = Counters::default();
    let mut list = VirtualList::with_options(
        Pooled::new(100, &counters),
        ListOptions::new().with_overscan(2),
    );
    assert!(list.features().pooled_widgets);

    let buf = render_into(&mut list, 12, 5);
    assert_eq!(row(&buf, 0), "row 0");
    assert_eq!(row(&buf, 4), "row 4");
    assert_eq!(list.visible_range(), cellscroll::VisibleRange::new(0, 7));
    assert_eq!(list.active_len(), 7);
    assert!(list.pool_in_use() <= list.visible_range().len());

    list.set_selected(50);
    let buf = render_into(&mut list, 12, 5);
    assert_eq!(row(&buf, 4), "row 50");
    assert!(buf.get(0, 4).is_some_and(|c| c.style.attrs.contains(Attr::REVERSE)));
    assert_eq!(list.visible_range(), cellscroll::VisibleRange::new(44, 53));
    assert_eq!(list.active_len(), 9);
    assert_eq!(list.pool_in_use(), 9);

    let stats = list.pool_stats();
    assert_eq!(stats.created, 9);
    assert_eq!(stats.reused, 7);
    assert_eq!(counters.created(), 9);
    assert_eq!(counters.discarded(), 0);
}

#[test]
fn list_pool_max_discards_extra_widgets() {
    let counters = Counters::default();
    let mut list = VirtualList::with_options(
        Pooled::new(100, &counters),
        ListOptions::new().with_overscan(0).with_pool_max(2),
    );
    render_into(&mut list, 12, 5);
    assert_eq!(list.active_len(), 5);

    // Nothing overlaps the new range: two widgets are kept, three are discarded.
    list.scroll_to_offset(50);
    list.set_widget_pool_max(2);
    render_into(&mut list, 12, 5);
    assert_eq!(list.active_len(), 5);
    assert_eq!(counters.discarded(), 3);
    assert_eq!(counters.created(), 8);
}

#[test]
fn replacing_adapter_discards_through_old_factory() {
    let old = Counters::default();
    let new = Counters::default();
    let mut list = VirtualList::with_options(
        Pooled::new(100, &old),
        ListOptions::new().with_overscan(2),
    );
    render_into(&mut list, 12, 5);
    assert_eq!(old.created(), 7);

    list.set_adapter(Pooled::new(100, &new));
    assert_eq!(old.discarded(), 7);
    assert_eq!(list.active_len(), 0);
    assert_eq!(list.pool_in_use(), 0);

    render_into(&mut list, 12, 5);
    assert_eq!(new.created(), 7);
    assert_eq!(old.created(), 7);

    drop(list);
    assert_eq!(new.discarded(), 7);
}

#[test]
fn list_shrinking_adapter_clamps_selection() {
    let mut list = VirtualList::new(Rows::new(100));
    list.layout(Rect::new(0, 0, 10, 10));
    list.set_selected(95);
    list.adapter_mut().count = 20;
    let buf = render_into(&mut list, 10, 10);
    assert_eq!(list.selected_index(), 19);
    assert_eq!(list.offset(), 10);
    assert_eq!(row(&buf, 9), "item 19");

    list.adapter_mut().count = 0;
    let buf = render_into(&mut list, 10, 10);
    assert_eq!(list.selected_index(), 0);
    assert_eq!(list.offset(), 0);
    assert_eq!(row(&buf, 0), "");
    assert_eq!(list.selected_item(), None);
}

#[test]
fn list_needs_render_tracks_scrolling() {
    let mut list = VirtualList::new(Rows::new(100));
    render_into(&mut list, 10, 5);
    assert!(list.needs_render());
    list.clear_invalidation();
    assert!(!list.needs_render());

    list.scroll_to_offset(0);
    assert!(!list.needs_render());
    list.scroll_to_offset(7);
    assert!(list.needs_render());
}

/// An opaque child that counts how often it is drawn.
struct Canvas {
    lines: usize,
    width: u64,
    renders: Arc<AtomicUsize>,
    dirty: Arc<AtomicBool>,
}

impl Canvas {
    fn new(lines: usize) -> (Self, Arc<AtomicUsize>, Arc<AtomicBool>) {
        let renders = Arc::new(AtomicUsize::new(0));
        let dirty = Arc::new(AtomicBool::new(false));
        let canvas = Self {
            lines,
            width: 8,
            renders: Arc::clone(&renders),
            dirty: Arc::clone(&dirty),
        };
        (canvas, renders, dirty)
    }
}

impl Widget for Canvas {
    fn measure(&self, constraints: Constraints) -> Size {
        Size::new(constraints.min.width.max(self.width), self.lines as u64)
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        self.renders.fetch_add(1, Ordering::SeqCst);
        for y in 0..self.lines {
            ctx.put_str(0, y as i32, &format!("line {y}"), Style::new());
        }
    }

    fn needs_render(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn clear_invalidation(&mut self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

#[test]
fn scroll_view_redraws_child_only_when_needed() {
    let (canvas, renders, dirty) = Canvas::new(50);
    let mut view = ScrollView::new();
    view.set_content(canvas);
    assert!(!view.is_virtual());

    let buf = render_into(&mut view, 20, 5);
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert!(buf.row_text(0).starts_with("line 0"));
    assert_eq!(buf.get(19, 0).map(|c| c.ch), Some('#'));
    assert_eq!(buf.get(19, 1).map(|c| c.ch), Some('|'));

    render_into(&mut view, 20, 5);
    assert_eq!(renders.load(Ordering::SeqCst), 1);

    view.scroll_by(0, 10);
    assert_eq!(view.offset().y, 10);
    let buf = render_into(&mut view, 20, 5);
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert!(buf.row_text(0).starts_with("line 10"));
    assert!(buf.row_text(4).starts_with("line 14"));

    dirty.store(true, Ordering::SeqCst);
    assert!(view.needs_render());
    render_into(&mut view, 20, 5);
    assert_eq!(renders.load(Ordering::SeqCst), 2);

    // A wider view changes the measured size.
    render_into(&mut view, 30, 5);
    assert_eq!(renders.load(Ordering::SeqCst), 3);
}

#[test]
fn scroll_view_scrolls_horizontally_when_allowed() {
    let (mut canvas, _, _) = Canvas::new(3);
    canvas.width = 40;
    let mut view = ScrollView::new();
    view.set_content(canvas);
    view.layout(Rect::new(0, 0, 10, 3));
    assert_eq!(view.viewport().content_size(), Size::new(40, 3));

    view.scroll_by(5, 0);
    let buf = render_into(&mut view, 10, 3);
    assert_eq!(view.offset().x, 5);
    assert!(buf.row_text(0).starts_with('0'));
    // Horizontal scrollbar on the last row.
    assert!(
        (0..10).all(|x| matches!(buf.get(x, 2).map(|c| c.ch), Some('-' | '#')))
    );

    let (mut canvas, _, _) = Canvas::new(3);
    canvas.width = 40;
    let mut view = ScrollView::with_options(
        ScrollViewOptions::new()
            .with_policies(cellscroll::ScrollPolicy::Never, cellscroll::ScrollPolicy::Auto),
    );
    view.set_content(canvas);
    view.layout(Rect::new(0, 0, 10, 3));
    assert_eq!(view.viewport().content_size(), Size::new(10, 3));
    view.scroll_by(5, 0);
    assert_eq!(view.offset().x, 0);
}

#[test]
fn scroll_view_scrollbar_policies() {
    let (canvas, _, _) = Canvas::new(50);
    let mut view = ScrollView::with_options(
        ScrollViewOptions::new()
            .with_policies(cellscroll::ScrollPolicy::Never, cellscroll::ScrollPolicy::Never),
    );
    view.set_content(canvas);
    let buf = render_into(&mut view, 20, 5);
    assert!((0..5).all(|y| buf.get(19, y).map(|c| c.ch) == Some(' ')));
    assert!(buf.row_text(4).starts_with("line 4"));

    // Content that fits still gets a bar under `Always`, with the thumb spanning the track.
    let (canvas, _, _) = Canvas::new(3);
    let mut view = ScrollView::with_options(
        ScrollViewOptions::new()
            .with_policies(cellscroll::ScrollPolicy::Never, cellscroll::ScrollPolicy::Always),
    );
    view.set_content(canvas);
    let buf = render_into(&mut view, 20, 5);
    assert_eq!(view.viewport().max_offset().y, 0);
    assert!((0..5).all(|y| buf.get(19, y).map(|c| c.ch) == Some('#')));

    let (canvas, _, _) = Canvas::new(3);
    let mut view = ScrollView::new();
    view.set_content(canvas);
    let buf = render_into(&mut view, 20, 5);
    assert!((0..5).all(|y| buf.get(19, y).map(|c| c.ch) == Some(' ')));
}

#[test]
fn scroll_view_pages_and_ends_by_cells() {
    let (canvas, _, _) = Canvas::new(50);
    let mut view = ScrollView::new();
    view.set_content(canvas);
    view.layout(Rect::new(0, 0, 20, 5));

    view.page_by(1);
    assert_eq!(view.offset().y, 5);
    view.page_by(-3);
    assert_eq!(view.offset().y, 0);
    view.scroll_to_end();
    assert_eq!(view.offset().y, 45);
    view.page_by(-1);
    assert_eq!(view.offset().y, 40);
    view.page_by(100);
    assert_eq!(view.offset().y, 45);

    let buf = render_into(&mut view, 20, 5);
    assert!(buf.row_text(4).starts_with("line 49"));
}

#[test]
fn scroll_view_input_and_scroll_callback() {
    let changes = Arc::new(AtomicUsize::new(0));
    let options = {
        let changes = Arc::clone(&changes);
        ScrollViewOptions::new().with_on_scroll(Some(move |_: &ViewportState| {
            changes.fetch_add(1, Ordering::SeqCst);
        }))
    };
    let (canvas, _, _) = Canvas::new(50);
    let mut view = ScrollView::with_options(options);
    view.set_content(canvas);
    view.layout(Rect::new(0, 0, 20, 5));
    assert_eq!(view.viewport().max_offset().y, 45);

    assert_eq!(
        view.handle_event(&Event::Key(Key::Down)),
        EventResult::Ignored
    );
    assert!(
        view.handle_event(&Event::Mouse(MouseButton::WheelDown))
            .is_handled()
    );
    assert_eq!(view.offset().y, 3);

    view.set_focused(true);
    let before = changes.load(Ordering::SeqCst);
    view.handle_event(&Event::Key(Key::Down));
    assert_eq!(view.offset().y, 4);
    assert_eq!(changes.load(Ordering::SeqCst), before + 1);
    view.scroll_by(0, 0);
    view.scroll_to(0, 4);
    assert_eq!(changes.load(Ordering::SeqCst), before + 1);

    view.handle_event(&Event::Key(Key::PageDown));
    assert_eq!(view.offset().y, 9);
    view.handle_event(&Event::Key(Key::End));
    assert_eq!(view.offset().y, 45);
    view.handle_event(&Event::Key(Key::PageDown));
    assert_eq!(view.offset().y, 45);
    view.handle_event(&Event::Key(Key::Home));
    assert_eq!(view.offset().y, 0);
    view.page_by(2);
    assert_eq!(view.offset().y, 10);
}

/// Virtual content that records which items it was asked to draw.
struct Feed {
    heights: Vec<u32>,
    drawn: Arc<Mutex<Vec<usize>>>,
}

impl Feed {
    fn new(heights: Vec<u32>) -> (Self, Arc<Mutex<Vec<usize>>>) {
        let drawn = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                heights,
                drawn: Arc::clone(&drawn),
            },
            drawn,
        )
    }
}

impl Widget for Feed {
    fn measure(&self, constraints: Constraints) -> Size {
        constraints.min
    }

    fn render(&mut self, _ctx: &mut RenderContext<'_>) {}

    fn as_virtual_content(&mut self) -> Option<&mut dyn VirtualContent> {
        Some(self)
    }
}

impl VirtualContent for Feed {
    fn item_count(&self) -> usize {
        self.heights.len()
    }

    fn item_height(&self, index: usize) -> u32 {
        self.heights.get(index).copied().unwrap_or(0)
    }

    fn render_item(&mut self, index: usize, ctx: &mut RenderContext<'_>) {
        if let Ok(mut drawn) = self.drawn.lock() {
            drawn.push(index);
        }
        ctx.put_str(0, 0, &format!("item {index}"), Style::new());
    }
}

fn take_drawn(drawn: &Mutex<Vec<usize>>) -> Vec<usize> {
    drawn.lock().map(|mut d| core::mem::take(&mut *d)).unwrap_or_default()
}

#[test]
fn scroll_view_virtual_renders_only_visible_items() {
    let (feed, drawn) = Feed::new(alloc::vec![1; 1000]);
    let mut view = ScrollView::new();
    view.set_content(feed);
    assert!(view.is_virtual());

    let buf = render_into(&mut view, 12, 5);
    assert_eq!(take_drawn(&drawn), alloc::vec![0, 1, 2, 3, 4]);
    assert!(buf.row_text(0).starts_with("item 0"));
    assert_eq!(view.viewport().content_size(), Size::new(12, 1000));
    assert_eq!(buf.get(11, 0).map(|c| c.ch), Some('#'));

    view.scroll_to(0, 500);
    let buf = render_into(&mut view, 12, 5);
    assert_eq!(take_drawn(&drawn), alloc::vec![500, 501, 502, 503, 504]);
    assert!(buf.row_text(0).starts_with("item 500"));
    assert!(buf.row_text(4).starts_with("item 504"));
}

#[test]
fn scroll_view_virtual_scrolling_snaps_to_items() {
    let heights: Vec<u32> = (0..100).map(|i| (i % 3) as u32 + 1).collect();
    let (feed, _) = Feed::new(heights);
    let mut view = ScrollView::new();
    view.set_content(feed);
    view.layout(Rect::new(0, 0, 12, 5));
    assert_eq!(view.viewport().content_size().height, 199);

    view.scroll_to(0, 4);
    assert_eq!(view.offset().y, 3);
    view.scroll_by(0, 1);
    assert_eq!(view.offset().y, 6);
    view.scroll_by(0, -2);
    assert_eq!(view.offset().y, 1);
    view.page_by(1);
    assert_eq!(view.offset().y, 6);
    view.scroll_to_end();
    assert_eq!(view.offset().y, 194);
    view.scroll_to_start();
    assert_eq!(view.offset().y, 0);
}

#[test]
fn scroll_view_virtual_steps_over_empty_items() {
    let (feed, drawn) = Feed::new(alloc::vec![2, 0, 0, 2, 2, 2, 2, 2]);
    let mut view = ScrollView::new();
    view.set_content(feed);
    view.layout(Rect::new(0, 0, 12, 2));

    view.scroll_by(0, 1);
    assert_eq!(view.offset().y, 2);
    render_into(&mut view, 12, 2);
    assert_eq!(take_drawn(&drawn), alloc::vec![3]);

    view.scroll_by(0, -1);
    assert_eq!(view.offset().y, 0);
}

#[test]
fn scroll_view_take_content_clears() {
    let (canvas, _, _) = Canvas::new(50);
    let mut view = ScrollView::new();
    view.set_content(canvas);
    view.layout(Rect::new(0, 0, 10, 5));
    view.scroll_by(0, 20);
    assert!(view.take_content().is_some());
    assert!(view.content().is_none());
    assert_eq!(view.offset().y, 0);
    let buf = render_into(&mut view, 10, 5);
    assert_eq!(row(&buf, 0), "");
}

/// Virtual content whose item heights can change behind the view's back.
struct Notes {
    heights: Arc<Mutex<Vec<u32>>>,
    dirty: Arc<AtomicBool>,
}

impl Notes {
    fn set_all(heights: &Mutex<Vec<u32>>, height: u32) {
        if let Ok(mut h) = heights.lock() {
            h.iter_mut().for_each(|v| *v = height);
        }
    }
}

impl Widget for Notes {
    fn measure(&self, constraints: Constraints) -> Size {
        constraints.min
    }

    fn render(&mut self, _ctx: &mut RenderContext<'_>) {}

    fn needs_render(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn clear_invalidation(&mut self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    fn as_virtual_content(&mut self) -> Option<&mut dyn VirtualContent> {
        Some(self)
    }
}

impl VirtualContent for Notes {
    fn item_count(&self) -> usize {
        self.heights.lock().map(|h| h.len()).unwrap_or(0)
    }

    fn item_height(&self, index: usize) -> u32 {
        self.heights
            .lock()
            .ok()
            .and_then(|h| h.get(index).copied())
            .unwrap_or(0)
    }

    fn render_item(&mut self, index: usize, ctx: &mut RenderContext<'_>) {
        ctx.put_str(0, 0, &format!("note {index}"), Style::new());
    }
}

#[test]
fn scroll_view_virtual_rereads_heights_on_resize_and_invalidation() {
    let heights = Arc::new(Mutex::new(alloc::vec![1; 10]));
    let dirty = Arc::new(AtomicBool::new(false));
    let mut view = ScrollView::new();
    view.set_content(Notes {
        heights: Arc::clone(&heights),
        dirty: Arc::clone(&dirty),
    });
    render_into(&mut view, 10, 5);
    assert_eq!(view.viewport().content_size().height, 10);

    Notes::set_all(&heights, 2);
    view.layout(Rect::new(0, 0, 10, 5));
    assert_eq!(view.viewport().content_size().height, 10);
    view.layout(Rect::new(0, 0, 5, 5));
    assert_eq!(view.viewport().content_size().height, 20);

    Notes::set_all(&heights, 3);
    dirty.store(true, Ordering::SeqCst);
    let buf = render_into(&mut view, 5, 5);
    assert_eq!(view.viewport().content_size().height, 30);
    assert!(!dirty.load(Ordering::SeqCst));
    assert!(buf.row_text(3).starts_with("note"));
}

/// A million two-row items that answer offset lookups arithmetically.
struct Ledger {
    height_reads: Arc<AtomicUsize>,
}

impl Ledger {
    const COUNT: usize = 1_000_000;
}

impl Widget for Ledger {
    fn measure(&self, constraints: Constraints) -> Size {
        constraints.min
    }

    fn render(&mut self, _ctx: &mut RenderContext<'_>) {}

    fn as_virtual_content(&mut self) -> Option<&mut dyn VirtualContent> {
        Some(self)
    }
}

impl VirtualContent for Ledger {
    fn item_count(&self) -> usize {
        Self::COUNT
    }

    fn item_height(&self, _index: usize) -> u32 {
        self.height_reads.fetch_add(1, Ordering::SeqCst);
        2
    }

    fn render_item(&mut self, index: usize, ctx: &mut RenderContext<'_>) {
        ctx.put_str(0, 0, &format!("entry {index}"), Style::new());
    }

    fn total_height(&self) -> Option<u64> {
        Some(Self::COUNT as u64 * 2)
    }

    fn index_for_offset(&self, offset: u64) -> Option<usize> {
        usize::try_from(offset / 2).ok()
    }

    fn offset_for_index(&self, index: usize) -> Option<u64> {
        Some(index.min(Self::COUNT) as u64 * 2)
    }
}

#[test]
fn scroll_view_uses_content_lookups_without_a_height_table() {
    let height_reads = Arc::new(AtomicUsize::new(0));
    let mut view = ScrollView::new();
    view.set_content(Ledger {
        height_reads: Arc::clone(&height_reads),
    });

    let buf = render_into(&mut view, 12, 5);
    assert_eq!(view.viewport().content_size().height, 2_000_000);
    assert!(height_reads.load(Ordering::SeqCst) < 16);
    assert!(buf.row_text(0).starts_with("entry 0"));
    assert!(buf.row_text(2).starts_with("entry 1"));
    assert!(buf.row_text(4).starts_with("entry 2"));

    view.scroll_to(0, 1001);
    assert_eq!(view.offset().y, 1000);
    view.scroll_by(0, 2);
    assert_eq!(view.offset().y, 1004);
    let buf = render_into(&mut view, 12, 5);
    assert!(buf.row_text(0).starts_with("entry 502"));
    assert!(height_reads.load(Ordering::SeqCst) < 32);
}

#[test]
fn scroll_view_virtual_skips_unaddressable_rows() {
    let (feed, drawn) = Feed::new(alloc::vec![3_000_000_000, 1, 1]);
    let mut view = ScrollView::with_options(ScrollViewOptions::new().with_overscan(2));
    view.set_content(feed);

    let buf = render_into(&mut view, 12, 5);
    assert_eq!(take_drawn(&drawn), alloc::vec![0]);
    assert!(buf.row_text(0).starts_with("item 0"));

    view.scroll_to_end();
    assert_eq!(view.offset().y, 2_999_999_997);
    let buf = render_into(&mut view, 12, 5);
    assert_eq!(take_drawn(&drawn), alloc::vec![1, 2]);
    assert!(buf.row_text(3).starts_with("item 1"));
    assert!(buf.row_text(4).starts_with("item 2"));
}
