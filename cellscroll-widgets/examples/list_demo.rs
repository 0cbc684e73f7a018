// Example: a pooled-widget list, scrolled with keys, printed as plain text.
use cellscroll::Size;
use cellscroll_widgets::{
    CellBuffer, Constraints, Event, Key, ListAdapter, ListOptions, RenderContext, Style,
    VirtualList, Widget, WidgetFactory,
};

#[derive(Default)]
struct Row {
    text: String,
    selected: bool,
}

impl Widget for Row {
    fn measure(&self, _constraints: Constraints) -> Size {
        Size::new(self.text.len() as u64, 1)
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let marker = if self.selected { "> " } else { "  " };
        let n = ctx.put_str(0, 0, marker, Style::new());
        ctx.put_str(n as i32, 0, &self.text, Style::new());
    }
}

struct RowFactory;

impl WidgetFactory<u64> for RowFactory {
    type Widget = Row;

    fn new_widget(&self) -> Row {
        Row::default()
    }

    fn update_widget(&self, widget: &mut Row, item: &u64, index: usize, selected: bool) {
        widget.text = format!("#{index:<6} value={item}");
        widget.selected = selected;
    }
}

struct Squares {
    count: usize,
    factory: RowFactory,
}

impl ListAdapter for Squares {
    type Item = u64;
    type Widget = Row;

    fn count(&self) -> usize {
        self.count
    }

    fn item(&self, index: usize) -> Option<u64> {
        (index < self.count).then(|| (index as u64) * (index as u64))
    }

    fn render(&self, _item: &u64, _index: usize, _selected: bool, _ctx: &mut RenderContext<'_>) {}

    fn widget_factory(&self) -> Option<&dyn WidgetFactory<u64, Widget = Row>> {
        Some(&self.factory)
    }
}

fn print(buf: &CellBuffer) {
    for y in 0..buf.height() {
        println!("|{}|", buf.row_text(y));
    }
}

fn main() {
    let adapter = Squares {
        count: 100_000,
        factory: RowFactory,
    };
    let mut list = VirtualList::with_options(adapter, ListOptions::new().with_overscan(1));
    list.set_focused(true);

    let mut buf = CellBuffer::new(28, 6);
    for key in [Key::Down, Key::PageDown, Key::End] {
        list.handle_event(&Event::Key(key));
        let mut ctx = RenderContext::new(&mut buf);
        list.render(&mut ctx);
        println!("after {key:?}: range={:?}", list.visible_range());
        print(&buf);
    }
    println!("pool={:?}", list.pool_stats());
}
