use crate::app::key_hooks::HookTarget;
use crate::app::state::{AppMode, AppState, ImageMenuState, ImageMode, UrlFocus};
use crate::app::{action::Action, ui};
use crate::components::command_list::CommandList;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Rect, Size};

pub fn map_event_to_action(
    event: Event,
    app_state: &AppState,
    terminal_size: Size,
) -> Option<Action> {
    let area = Rect::new(0, 0, terminal_size.width, terminal_size.height);
    match event {
        Event::Key(key) => {
            if key.kind == KeyEventKind::Release {
                return None;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('q') => return Some(Action::Quit),
                    KeyCode::Char('s') => return Some(Action::Save),
                    _ => {}
                }
            }
            map_key(key, app_state)
        }
        Event::Mouse(mouse) => map_mouse(mouse, app_state, area),
        Event::Resize(w, h) => Some(Action::Resize(w, h)),
        _ => None,
    }
}

fn map_key(key: KeyEvent, app_state: &AppState) -> Option<Action> {
    match app_state.mode {
        AppMode::ImageMenu => {
            let Some(menu) = &app_state.image_menu else {
                return Some(Action::EditorInput(key));
            };
            if let Some(action) = image_menu_hook(key, app_state, menu) {
                return Some(action);
            }
            match &menu.mode {
                ImageMode::Choosing => match key.code {
                    KeyCode::Esc => Some(Action::CloseImageMenu),
                    _ => Some(Action::EditorInput(key)),
                },
                ImageMode::UrlEntry(form) => match key.code {
                    KeyCode::Esc => Some(Action::ImageUrlCancel),
                    KeyCode::Enter if form.focus == UrlFocus::Done => Some(Action::ImageUrlDone),
                    KeyCode::Enter => Some(Action::ImageUrlSubmit),
                    KeyCode::Tab | KeyCode::BackTab => {
                        Some(Action::ImageUrlFocus(match form.focus {
                            UrlFocus::Input => UrlFocus::Done,
                            UrlFocus::Done | UrlFocus::Away => UrlFocus::Input,
                        }))
                    }
                    _ if form.focus == UrlFocus::Input => Some(Action::ImageUrlInput(key)),
                    // Refocuses the field and keeps the character.
                    KeyCode::Char(_) => Some(Action::ImageUrlInput(key)),
                    _ => None,
                },
            }
        }
        AppMode::SlashMenu => match key.code {
            KeyCode::Up => Some(Action::SlashMenuPrev),
            KeyCode::Down => Some(Action::SlashMenuNext),
            KeyCode::Enter => Some(Action::SlashMenuConfirm),
            KeyCode::Esc => Some(Action::CloseSlashMenu),
            _ => Some(Action::EditorInput(key)),
        },
        AppMode::Editing => Some(Action::EditorInput(key)),
    }
}

/// The image menu's document-level key hook. It only sees keys while it is
/// the topmost subscriber and the chooser is showing.
fn image_menu_hook(key: KeyEvent, app_state: &AppState, menu: &ImageMenuState) -> Option<Action> {
    if app_state.key_hooks.top() != Some(HookTarget::ImageMenu)
        || !app_state.key_hooks.is_subscribed(menu.hook)
        || !menu.is_choosing()
    {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(Action::ImageMenuPrev),
        KeyCode::Down => Some(Action::ImageMenuNext),
        KeyCode::Enter => Some(Action::ImageMenuConfirm),
        _ => None,
    }
}

fn map_mouse(mouse: MouseEvent, app_state: &AppState, area: Rect) -> Option<Action> {
    match app_state.mode {
        AppMode::SlashMenu => {
            let menu = app_state.slash_menu.as_ref()?;
            let Some(rect) = ui::slash_menu_rect(area, app_state) else {
                return match mouse.kind {
                    MouseEventKind::Down(_) => Some(Action::CloseSlashMenu),
                    _ => None,
                };
            };
            let inside = ui::contains(rect, mouse.column, mouse.row);
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) if inside => CommandList::row_at(
                    rect,
                    &menu.list,
                    menu.commands.len(),
                    mouse.column,
                    mouse.row,
                )
                .map(Action::SlashMenuSelect),
                MouseEventKind::Down(_) if !inside => Some(Action::CloseSlashMenu),
                MouseEventKind::ScrollDown if inside => Some(Action::SlashMenuNext),
                MouseEventKind::ScrollUp if inside => Some(Action::SlashMenuPrev),
                _ => None,
            }
        }
        AppMode::ImageMenu => {
            let menu = app_state.image_menu.as_ref()?;
            let rect = ui::image_menu_rect(area, app_state)?;
            let MouseEventKind::Down(button) = mouse.kind else {
                return None;
            };
            if !ui::contains(rect, mouse.column, mouse.row) {
                return Some(Action::CloseImageMenu);
            }
            if button != MouseButton::Left {
                return None;
            }
            match &menu.mode {
                ImageMode::Choosing => CommandList::row_at(
                    rect,
                    &menu.list,
                    menu.items.len(),
                    mouse.column,
                    mouse.row,
                )
                .map(Action::ImageMenuActivate),
                ImageMode::UrlEntry(_) => {
                    let layout = ui::url_form_layout(rect);
                    if ui::contains(layout.done, mouse.column, mouse.row) {
                        Some(Action::ImageUrlDone)
                    } else if ui::contains(layout.input, mouse.column, mouse.row) {
                        Some(Action::ImageUrlFocus(UrlFocus::Input))
                    } else {
                        Some(Action::ImageUrlFocus(UrlFocus::Away))
                    }
                }
            }
        }
        AppMode::Editing => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::reducer::update;
    use crate::app::state::UrlForm;

    const SIZE: Size = Size {
        width: 80,
        height: 24,
    };

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn feed(state: &mut AppState, text: &str) {
        for c in text.chars() {
            let action = map_event_to_action(key(KeyCode::Char(c)), state, SIZE).unwrap();
            update(state, action);
        }
    }

    fn image_menu_state() -> AppState {
        let mut state = AppState::default();
        feed(&mut state, "/image");
        let action = map_event_to_action(key(KeyCode::Enter), &state, SIZE).unwrap();
        update(&mut state, action);
        assert_eq!(state.mode, AppMode::ImageMenu);
        state
    }

    #[test]
    fn test_global_shortcuts() {
        let state = AppState::default();
        let ctrl = |c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
        assert!(matches!(
            map_event_to_action(ctrl('q'), &state, SIZE),
            Some(Action::Quit)
        ));
        assert!(matches!(
            map_event_to_action(ctrl('s'), &state, SIZE),
            Some(Action::Save)
        ));
    }

    #[test]
    fn test_release_events_ignored() {
        let state = AppState::default();
        let mut release = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(map_event_to_action(Event::Key(release), &state, SIZE).is_none());
    }

    #[test]
    fn test_slash_menu_keys() {
        let mut state = AppState::default();
        feed(&mut state, "/");
        assert!(matches!(
            map_event_to_action(key(KeyCode::Down), &state, SIZE),
            Some(Action::SlashMenuNext)
        ));
        assert!(matches!(
            map_event_to_action(key(KeyCode::Esc), &state, SIZE),
            Some(Action::CloseSlashMenu)
        ));
        assert!(matches!(
            map_event_to_action(key(KeyCode::Char('h')), &state, SIZE),
            Some(Action::EditorInput(_))
        ));
    }

    #[test]
    fn test_hook_intercepts_navigation_while_choosing() {
        let state = image_menu_state();
        assert!(matches!(
            map_event_to_action(key(KeyCode::Down), &state, SIZE),
            Some(Action::ImageMenuNext)
        ));
        assert!(matches!(
            map_event_to_action(key(KeyCode::Up), &state, SIZE),
            Some(Action::ImageMenuPrev)
        ));
        assert!(matches!(
            map_event_to_action(key(KeyCode::Enter), &state, SIZE),
            Some(Action::ImageMenuConfirm)
        ));
        assert!(matches!(
            map_event_to_action(key(KeyCode::Char('x')), &state, SIZE),
            Some(Action::EditorInput(_))
        ));
    }

    #[test]
    fn test_hook_passes_through_in_url_entry() {
        let mut state = image_menu_state();
        state.image_menu.as_mut().unwrap().mode = ImageMode::UrlEntry(UrlForm::default());
        assert!(matches!(
            map_event_to_action(key(KeyCode::Enter), &state, SIZE),
            Some(Action::ImageUrlSubmit)
        ));
        assert!(matches!(
            map_event_to_action(key(KeyCode::Up), &state, SIZE),
            Some(Action::ImageUrlInput(_))
        ));
        assert!(matches!(
            map_event_to_action(key(KeyCode::Esc), &state, SIZE),
            Some(Action::ImageUrlCancel)
        ));
        assert!(matches!(
            map_event_to_action(key(KeyCode::Tab), &state, SIZE),
            Some(Action::ImageUrlFocus(UrlFocus::Done))
        ));
    }

    #[test]
    fn test_char_typed_on_done_is_forwarded_to_field() {
        let mut state = image_menu_state();
        let mut form = UrlForm::default();
        form.focus = UrlFocus::Done;
        state.image_menu.as_mut().unwrap().mode = ImageMode::UrlEntry(form);

        let action = map_event_to_action(key(KeyCode::Char('x')), &state, SIZE).unwrap();
        assert!(matches!(action, Action::ImageUrlInput(_)));
        update(&mut state, action);
        match &state.image_menu.as_ref().unwrap().mode {
            ImageMode::UrlEntry(form) => {
                assert_eq!(form.focus, UrlFocus::Input);
                assert_eq!(form.input.value(), "x");
            }
            ImageMode::Choosing => panic!("expected url entry"),
        }
        assert!(map_event_to_action(key(KeyCode::Left), &state, SIZE).is_some());
    }

    #[test]
    fn test_click_on_image_rows() {
        let state = image_menu_state();
        let rect = ui::image_menu_rect(Rect::new(0, 0, 80, 24), &state).unwrap();
        // First content row belongs to "Image Upload", the third to "Image from URL".
        assert!(matches!(
            map_event_to_action(click(rect.x + 2, rect.y + 1), &state, SIZE),
            Some(Action::ImageMenuActivate(0))
        ));
        assert!(matches!(
            map_event_to_action(click(rect.x + 2, rect.y + 3), &state, SIZE),
            Some(Action::ImageMenuActivate(1))
        ));
        assert!(matches!(
            map_event_to_action(click(rect.right() + 2, 0), &state, SIZE),
            Some(Action::CloseImageMenu)
        ));
    }

    #[test]
    fn test_click_done_and_input_in_url_form() {
        let mut state = image_menu_state();
        state.image_menu.as_mut().unwrap().mode = ImageMode::UrlEntry(UrlForm::default());
        let rect = ui::image_menu_rect(Rect::new(0, 0, 80, 24), &state).unwrap();
        let layout = ui::url_form_layout(rect);

        assert!(matches!(
            map_event_to_action(click(layout.done.x + 1, layout.done.y + 1), &state, SIZE),
            Some(Action::ImageUrlDone)
        ));
        assert!(matches!(
            map_event_to_action(click(layout.input.x + 1, layout.input.y + 1), &state, SIZE),
            Some(Action::ImageUrlFocus(UrlFocus::Input))
        ));
        assert!(matches!(
            map_event_to_action(click(layout.error.x + 1, layout.error.y), &state, SIZE),
            Some(Action::ImageUrlFocus(UrlFocus::Away))
        ));
    }

    #[test]
    fn test_click_slash_row_selects() {
        let mut state = AppState::default();
        feed(&mut state, "/");
        let rect = ui::slash_menu_rect(Rect::new(0, 0, 80, 24), &state).unwrap();
        assert!(matches!(
            map_event_to_action(click(rect.x + 2, rect.y + 3), &state, SIZE),
            Some(Action::SlashMenuSelect(1))
        ));
        assert!(matches!(
            map_event_to_action(click(79, 0), &state, SIZE),
            Some(Action::CloseSlashMenu)
        ));
    }
}
