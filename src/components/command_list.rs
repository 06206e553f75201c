use crate::domain::models::CommandItem;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Margin, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, StatefulWidget, Widget},
};

/// Terminal rows per item: title line, then description line.
pub const ROW_HEIGHT: u16 = 2;

/// Scroll position of a rendered command list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandListState {
    offset: u16,
    last_selected: Option<usize>,
}

impl CommandListState {
    #[must_use]
    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Back to the top, as if freshly mounted.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Brings `selected` into a viewport of `viewport` rows, but only when the
    /// selection changed since the previous call.
    pub fn sync(&mut self, selected: usize, viewport: u16) {
        if self.last_selected == Some(selected) {
            return;
        }
        self.last_selected = Some(selected);
        let top = u16::try_from(selected)
            .unwrap_or(u16::MAX)
            .saturating_mul(ROW_HEIGHT);
        self.offset = scroll_into_view(self.offset, viewport, top, ROW_HEIGHT);
    }

    fn clamp(&mut self, len: usize, viewport: u16) {
        let content = u16::try_from(len)
            .unwrap_or(u16::MAX)
            .saturating_mul(ROW_HEIGHT);
        self.offset = self.offset.min(content.saturating_sub(viewport));
    }
}

/// New scroll offset that makes `[item_top, item_top + item_height)` visible.
///
/// Rows that are already fully visible leave the offset alone; otherwise the
/// offset moves by exactly the amount the row sticks out of the viewport.
#[must_use]
pub fn scroll_into_view(offset: u16, viewport: u16, item_top: u16, item_height: u16) -> u16 {
    if viewport == 0 {
        return offset;
    }
    let item_bottom = item_top.saturating_add(item_height);
    if item_top < offset {
        item_top
    } else if item_bottom > offset.saturating_add(viewport) {
        offset + (item_bottom - offset.saturating_add(viewport))
    } else {
        offset
    }
}

/// Bordered, scrollable list of commands with one highlighted entry.
pub struct CommandList<'a> {
    pub items: Vec<&'a CommandItem>,
    pub selected_index: usize,
    pub theme: &'a Theme,
    pub title: Option<&'a str>,
}

impl CommandList<'_> {
    /// Outer height needed to show `len` items without scrolling.
    #[must_use]
    pub fn required_height(len: usize) -> u16 {
        u16::try_from(len)
            .unwrap_or(u16::MAX)
            .saturating_mul(ROW_HEIGHT)
            .saturating_add(2)
    }

    /// Index of the item under (`column`, `row`) for a list rendered in `area`.
    #[must_use]
    pub fn row_at(
        area: Rect,
        state: &CommandListState,
        len: usize,
        column: u16,
        row: u16,
    ) -> Option<usize> {
        let inner = area.inner(Margin::new(1, 1));
        if column < inner.x
            || column >= inner.right()
            || row < inner.y
            || row >= inner.bottom()
        {
            return None;
        }
        let line = (row - inner.y) as usize + state.offset as usize;
        let idx = line / ROW_HEIGHT as usize;
        (idx < len).then_some(idx)
    }
}

impl StatefulWidget for CommandList<'_> {
    type State = CommandListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if self.items.is_empty() || area.width == 0 || area.height == 0 {
            return;
        }

        Clear.render(area, buf);
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focus);
        if let Some(title) = self.title {
            block = block.title(Line::from(vec![
                Span::raw(" "),
                Span::styled(title, self.theme.title),
                Span::raw(" "),
            ]));
        }
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        state.sync(self.selected_index, inner.height);
        state.clamp(self.items.len(), inner.height);

        let first = state.offset as usize;
        let last = first + inner.height as usize;
        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected_index;
            let style = if is_selected {
                self.theme.list_selected
            } else {
                self.theme.list_item
            };

            let top = i * ROW_HEIGHT as usize;
            let title = Line::from(vec![
                Span::styled(format!(" {:<3} ", item.icon.glyph()), self.theme.icon),
                Span::styled(item.title.as_str(), style),
            ]);
            let description = Line::from(vec![
                Span::raw("      "),
                Span::styled(item.description.as_str(), self.theme.list_description),
            ]);

            for (line_no, line) in [(top, title), (top + 1, description)] {
                if line_no < first || line_no >= last {
                    continue;
                }
                let y = inner.y + (line_no - first) as u16;
                let row_area = Rect::new(inner.x, y, inner.width, 1);
                if is_selected {
                    buf.set_style(row_area, self.theme.list_selected);
                }
                buf.set_line(inner.x, y, &line, inner.width);
            }
        }
    }
}
