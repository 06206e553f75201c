use crate::app::state::{AppState, ImageMenuState, ImageMode};
use crate::components::command_list::{CommandList, CommandListState};
use crate::components::helpers::draw_drop_shadow;
use crate::components::image_menu::ImageMenu;

use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Widest a popup menu gets.
pub const POPUP_WIDTH: u16 = 44;
/// Outer height of the URL form: bordered input row plus the error row.
pub const URL_FORM_HEIGHT: u16 = 6;
const DONE_WIDTH: u16 = 8;

pub struct AppLayout {
    pub editor: Rect,
    pub status: Rect,
}

pub fn get_layout(area: Rect) -> AppLayout {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Editor
            Constraint::Length(1), // Status line
        ])
        .split(area);
    AppLayout {
        editor: main[0],
        status: main[1],
    }
}

/// Text area inside the editor border.
pub fn editor_inner(area: Rect) -> Rect {
    get_layout(area).editor.inner(Margin::new(1, 1))
}

/// Popups sit in the bottom-left corner of the editor text area.
pub fn popup_rect(area: Rect, height: u16) -> Rect {
    let inner = editor_inner(area);
    let height = height.min(inner.height);
    Rect {
        x: inner.x,
        y: inner.bottom().saturating_sub(height),
        width: POPUP_WIDTH.min(inner.width),
        height,
    }
}

pub fn slash_menu_rect(area: Rect, state: &AppState) -> Option<Rect> {
    let menu = state.slash_menu.as_ref()?;
    if menu.commands.is_empty() {
        return None;
    }
    let height = CommandList::required_height(menu.commands.len()).min(state.max_menu_height);
    Some(popup_rect(area, height))
}

pub fn image_menu_rect(area: Rect, state: &AppState) -> Option<Rect> {
    let menu = state.image_menu.as_ref()?;
    let height = match menu.mode {
        ImageMode::Choosing => {
            CommandList::required_height(menu.items.len()).min(state.max_menu_height)
        }
        ImageMode::UrlEntry(_) => URL_FORM_HEIGHT,
    };
    Some(popup_rect(area, height))
}

pub struct UrlFormLayout {
    pub input: Rect,
    pub done: Rect,
    pub error: Rect,
}

/// Splits the URL form popup (including its border) into its parts.
pub fn url_form_layout(area: Rect) -> UrlFormLayout {
    let inner = area.inner(Margin::new(1, 1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(inner);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(DONE_WIDTH)])
        .split(rows[0]);
    UrlFormLayout {
        input: cols[0],
        done: cols[1],
        error: rows[1],
    }
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

pub fn draw(f: &mut Frame, app_state: &mut AppState) {
    if f.area().width == 0 || f.area().height == 0 {
        return;
    }
    let area = f.area();
    let layout = get_layout(area);
    let theme = app_state.theme.clone();

    // --- Editor ---
    let name = app_state
        .document_path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "[scratch]".to_string());
    let dirty = if app_state.document.is_dirty() { " [+]" } else { "" };
    let border_style = if app_state.document.is_focused() {
        theme.border_focus
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("{name}{dirty}"), theme.title),
            Span::raw(" "),
        ]));
    let inner = block.inner(layout.editor);
    f.render_widget(block, layout.editor);
    f.render_widget(app_state.document.text_area(), inner);

    // --- Status line ---
    let mut spans = vec![Span::styled(" slashdoc ", theme.footer_key)];
    let pending = app_state.pending_file_count();
    if pending > 0 {
        spans.push(Span::styled(
            format!(" {pending} image(s) pending upload "),
            theme.status_info,
        ));
    }
    if let Some(err) = &app_state.last_error {
        spans.push(Span::styled(
            format!(" {} {} ", err.timestamp.format("%H:%M:%S"), err.message),
            theme.status_error,
        ));
    } else if let Some(task) = app_state.active_tasks.last() {
        let spinner = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        let frame = spinner[(app_state.frame_count % spinner.len() as u64) as usize];
        spans.push(Span::styled(format!(" {frame} {task} "), theme.status_info));
    } else if let Some(msg) = &app_state.status_message {
        spans.push(Span::styled(format!(" {msg} "), theme.status_info));
    } else {
        spans.extend([
            Span::styled(" ^S", theme.footer_key),
            Span::styled(" save ", theme.footer),
            Span::styled(" ^Q", theme.footer_key),
            Span::styled(" quit ", theme.footer),
            Span::styled(" /", theme.footer_key),
            Span::styled(" blocks ", theme.footer),
        ]);
    }
    f.render_widget(Paragraph::new(Line::from(spans)).style(theme.footer), layout.status);

    // --- Popups ---
    if let Some(rect) = slash_menu_rect(area, app_state) {
        if let Some(menu) = &mut app_state.slash_menu {
            draw_drop_shadow(f.buffer_mut(), rect, inner, theme.dimmed);
            let items = menu.items();
            let list = CommandList {
                items,
                selected_index: menu.selected_index,
                theme: &theme,
                title: Some("Blocks"),
            };
            let mut list_state: CommandListState = menu.list.clone();
            f.render_stateful_widget(list, rect, &mut list_state);
            menu.list = list_state;
        }
    }

    if let Some(rect) = image_menu_rect(area, app_state) {
        if let Some(menu) = &mut app_state.image_menu {
            draw_drop_shadow(f.buffer_mut(), rect, inner, theme.dimmed);
            f.render_stateful_widget(ImageMenu { theme: &theme }, rect, menu);
            if let ImageMode::UrlEntry(_) = menu.mode {
                place_url_cursor(f, rect, menu);
            }
        }
    }
}

/// Parks the terminal cursor on the URL input while it has focus.
fn place_url_cursor(f: &mut Frame, rect: Rect, menu: &ImageMenuState) {
    let ImageMode::UrlEntry(form) = &menu.mode else {
        return;
    };
    if form.focus != crate::app::state::UrlFocus::Input {
        return;
    }
    let input = url_form_layout(rect).input.inner(Margin::new(1, 1));
    let (_, col) = form.input.cursor();
    let col = u16::try_from(col).unwrap_or(u16::MAX);
    if input.width > 0 && input.height > 0 {
        f.set_cursor_position((input.x + col.min(input.width - 1), input.y));
    }
}
