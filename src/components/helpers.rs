use ratatui::{buffer::Buffer, layout::Rect, style::Style};

/// Shades the cells one row down and one column right of `area`, clipped to `bounds`.
pub fn draw_drop_shadow(buf: &mut Buffer, area: Rect, bounds: Rect, style: Style) {
    let shadow_area = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width,
        height: area.height,
    }
    .intersection(bounds)
    .intersection(buf.area);

    for y in shadow_area.top()..shadow_area.bottom() {
        for x in shadow_area.left()..shadow_area.right() {
            let cell = &mut buf[(x, y)];
            cell.set_style(style);
            cell.set_symbol(" ");
        }
    }
}
