// Example: an opaque text block inside a ScrollView with scrollbars.
use cellscroll::Size;
use cellscroll_widgets::{
    CellBuffer, Constraints, RenderContext, ScrollController, ScrollView, Style, Widget,
};

struct Paragraph(Vec<String>);

impl Widget for Paragraph {
    fn measure(&self, constraints: Constraints) -> Size {
        let width = self.0.iter().map(|l| l.len() as u64).max().unwrap_or(0);
        Size::new(width.max(constraints.min.width), self.0.len() as u64)
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        for (y, line) in self.0.iter().enumerate() {
            ctx.put_str(0, y as i32, line, Style::new());
        }
    }
}

fn main() {
    let lines = (0..40)
        .map(|i| format!("{i:>3}: {}", "lorem ipsum ".repeat(i % 5 + 1)))
        .collect();
    let mut view = ScrollView::new();
    view.set_content(Paragraph(lines));

    let mut buf = CellBuffer::new(30, 8);
    for (dx, dy) in [(0, 0), (0, 12), (10, 20)] {
        view.scroll_by(dx, dy);
        let mut ctx = RenderContext::new(&mut buf);
        view.render(&mut ctx);
        println!("offset={:?}", view.offset());
        for y in 0..buf.height() {
            println!("{}", buf.row_text(y));
        }
    }
}
