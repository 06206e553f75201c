use crate::app::state::{ImageMenuState, ImageMode, UrlFocus, UrlForm};
use crate::app::ui::url_form_layout;
use crate::components::command_list::CommandList;
use crate::domain::models::CommandItem;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, StatefulWidget, Widget},
};

/// The image popup: the two-entry chooser, or the URL form once "Image from URL" was picked.
pub struct ImageMenu<'a> {
    pub theme: &'a Theme,
}

impl StatefulWidget for ImageMenu<'_> {
    type State = ImageMenuState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        match &mut state.mode {
            ImageMode::Choosing => {
                let items: Vec<&CommandItem> = state.items.iter().collect();
                CommandList {
                    items,
                    selected_index: state.selected_index,
                    theme: self.theme,
                    title: Some("Image"),
                }
                .render(area, buf, &mut state.list);
            }
            ImageMode::UrlEntry(form) => render_url_form(self.theme, form, area, buf),
        }
    }
}

fn render_url_form(theme: &Theme, form: &mut UrlForm, area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_focus)
        .title(Line::from(vec![
            Span::raw(" "),
            Span::styled("Image from URL", theme.title),
            Span::raw(" "),
        ]))
        .render(area, buf);

    let layout = url_form_layout(area);

    let input_border = if form.error.is_some() {
        theme.input_error
    } else if form.focus == UrlFocus::Input {
        theme.border_focus
    } else {
        theme.border
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(input_border);
    let input_inner = input_block.inner(layout.input);
    input_block.render(layout.input, buf);

    form.input.set_style(theme.input);
    form.input.set_placeholder_style(theme.dimmed);
    form.input.set_cursor_style(if form.focus == UrlFocus::Input {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    });
    (&form.input).render(input_inner, buf);

    let done_style = if form.focus == UrlFocus::Done {
        theme.button_focus
    } else {
        theme.button
    };
    Paragraph::new("Done")
        .alignment(Alignment::Center)
        .style(done_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(done_style),
        )
        .render(layout.done, buf);

    if let Some(err) = form.error {
        Paragraph::new(Span::styled(format!(" {err}"), theme.error_text)).render(layout.error, buf);
    }
}
