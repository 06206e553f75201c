use super::{
    action::Action,
    command::Command,
    image_command::ImageOutcome,
    key_hooks::HookTarget,
    slash_commands::{can_trigger, query_at, BlockKind, TRIGGER},
    state::{AppMode, AppState, ErrorState, ImageMenuState, ImageMode, SlashMenuState, UploadId},
};
use crate::domain::editor::EditorChain;
use crate::domain::models::{Position, Range};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn update(state: &mut AppState, action: Action) -> Option<Command> {
    match action {
        // --- System ---
        Action::Tick => {
            state.frame_count = state.frame_count.wrapping_add(1);
        }
        Action::Resize(..) => {}
        Action::Quit => {
            close_image_menu(state);
            close_slash_menu(state);
            state.should_quit = true;
        }
        Action::Save => {
            return match &state.document_path {
                Some(path) => Some(Command::SaveDocument {
                    path: path.clone(),
                    text: state.document.text(),
                }),
                None => {
                    state.last_error = Some(ErrorState::new(
                        "No file to save to. Start slashdoc with a path.",
                    ));
                    None
                }
            };
        }

        // --- Document ---
        Action::EditorInput(key) => handle_editor_input(state, key),

        // --- Slash Menu ---
        Action::SlashMenuNext => {
            if let Some(menu) = &mut state.slash_menu {
                menu.select_next();
            }
        }
        Action::SlashMenuPrev => {
            if let Some(menu) = &mut state.slash_menu {
                menu.select_prev();
            }
        }
        Action::SlashMenuConfirm => {
            if let Some(idx) = state.slash_menu.as_ref().map(|menu| menu.selected_index) {
                run_slash_command(state, idx);
            }
        }
        Action::SlashMenuSelect(idx) => run_slash_command(state, idx),
        Action::CloseSlashMenu => close_slash_menu(state),

        // --- Image Menu ---
        Action::ImageMenuNext => {
            if let Some(menu) = &mut state.image_menu {
                menu.select_next();
            }
        }
        Action::ImageMenuPrev => {
            if let Some(menu) = &mut state.image_menu {
                menu.select_prev();
            }
        }
        Action::ImageMenuConfirm => {
            let outcome = state
                .image_menu
                .as_mut()
                .map(|menu| menu.activate_selected(&mut state.document))?;
            return handle_image_outcome(state, outcome);
        }
        Action::ImageMenuActivate(idx) => {
            let outcome = state
                .image_menu
                .as_mut()
                .map(|menu| menu.activate(idx, &mut state.document))?;
            return handle_image_outcome(state, outcome);
        }
        Action::ImageUrlInput(key) => {
            // Typing while Done (or nothing) has focus moves focus back to the field.
            if let Some(menu) = &mut state.image_menu {
                menu.set_url_focus(super::state::UrlFocus::Input);
            }
            if let Some(ImageMenuState {
                mode: ImageMode::UrlEntry(form),
                ..
            }) = &mut state.image_menu
            {
                form.input.input(key);
            }
        }
        Action::ImageUrlSubmit => {
            let outcome = state
                .image_menu
                .as_mut()
                .map(|menu| menu.submit_url(&mut state.document))?;
            return handle_image_outcome(state, outcome);
        }
        Action::ImageUrlDone => {
            let outcome = state.image_menu.as_mut().map(|menu| {
                menu.set_url_focus(super::state::UrlFocus::Done);
                menu.submit_url(&mut state.document)
            })?;
            return handle_image_outcome(state, outcome);
        }
        Action::ImageUrlCancel => {
            if let Some(menu) = &mut state.image_menu {
                menu.cancel_url();
            }
        }
        Action::ImageUrlFocus(focus) => {
            if let Some(menu) = &mut state.image_menu {
                menu.set_url_focus(focus);
            }
        }
        Action::CloseImageMenu => close_image_menu(state),

        // --- Async Results ---
        Action::ImageFilePicked(None) => {
            tracing::debug!("image picker dismissed");
        }
        Action::ImageFilePicked(Some(picked)) => {
            let inserted = state
                .image_menu
                .as_mut()
                .map(|menu| menu.file_picked(&picked.blob, &mut state.document));
            match inserted {
                None => {
                    tracing::debug!(path = %picked.path.display(), "image menu closed before pick");
                    return None;
                }
                Some(Err(e)) => {
                    report_error(state, format!("Failed to insert image: {e}"));
                    return None;
                }
                Some(Ok(())) => {}
            }

            let id = UploadId(state.next_upload_id);
            state.next_upload_id += 1;
            let token = state.image_menu.as_mut()?.begin_upload(id);
            state.status_message = Some(format!("Reading {}...", picked.path.display()));
            return Some(Command::ReadImageFile {
                id,
                path: picked.path,
                blob: picked.blob,
                token,
            });
        }
        Action::ImageFileLoaded(id, file) => {
            if !owns_upload(state, id) {
                tracing::debug!(?id, filename = %file.filename, "dropping read for closed image menu");
                return None;
            }
            if let Some(menu) = &mut state.image_menu {
                menu.finish_upload(id);
            }
            tracing::info!(
                filename = %file.filename,
                kind = file.kind.as_str(),
                "file queued for upload"
            );
            state.status_message = Some(format!("Queued {} for upload", file.filename));
            state.document_context.append_file(file);
            close_image_menu(state);
        }
        Action::ImageFileFailed(id, message) => {
            if !owns_upload(state, id) {
                return None;
            }
            if let Some(menu) = &mut state.image_menu {
                menu.finish_upload(id);
            }
            report_error(state, message);
            close_image_menu(state);
        }
        Action::OperationStarted(msg) => {
            state.status_message = Some(msg.clone());
            state.active_tasks.push(msg);
        }
        Action::OperationCompleted(result) => {
            state.active_tasks.clear();
            match result {
                Ok(msg) => {
                    state.document.mark_saved();
                    state.status_message = Some(msg);
                }
                Err(err) => report_error(state, err),
            }
        }
        Action::ErrorOccurred(err) => report_error(state, err),
    }
    None
}

fn handle_editor_input(state: &mut AppState, key: KeyEvent) {
    state.last_error = None;
    state.document.input(key);
    let cursor = state.document.cursor();

    match state.mode {
        AppMode::SlashMenu => {
            let query = state
                .slash_menu
                .as_ref()
                .and_then(|menu| query_at(state.document.lines(), menu.trigger, cursor));
            match query {
                Some(query) => {
                    if let Some(menu) = &mut state.slash_menu {
                        menu.set_query(query, cursor);
                    }
                }
                None => close_slash_menu(state),
            }
        }
        AppMode::Editing => {
            let typed_trigger = key.code == KeyCode::Char(TRIGGER)
                && !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
            if !typed_trigger || cursor.col == 0 {
                return;
            }
            let trigger = Position::new(cursor.row, cursor.col - 1);
            let opens = state.document.lines().get(trigger.row).is_some_and(|line| {
                line.chars().nth(trigger.col) == Some(TRIGGER) && can_trigger(line, trigger.col)
            });
            if opens {
                tracing::debug!(%trigger, "slash menu opened");
                state.slash_menu = Some(SlashMenuState::new(trigger));
                state.mode = AppMode::SlashMenu;
            }
        }
        AppMode::ImageMenu => {}
    }
}

fn run_slash_command(state: &mut AppState, idx: usize) {
    let Some(block) = state
        .slash_menu
        .as_ref()
        .and_then(|menu| menu.commands.get(idx))
        .map(|cmd| cmd.block)
    else {
        return;
    };
    let Some(menu) = state.slash_menu.take() else {
        return;
    };
    state.mode = AppMode::Editing;

    if block == BlockKind::Image {
        open_image_menu(state, menu.range);
        return;
    }

    let mut chain = EditorChain::new(&mut state.document)
        .focus()
        .delete_range(menu.range);
    if let Some(markdown) = block.markdown() {
        chain = chain.insert_content(markdown);
    }
    if let Err(e) = chain.run() {
        report_error(state, format!("Failed to insert block: {e}"));
    }
}

fn close_slash_menu(state: &mut AppState) {
    if state.slash_menu.take().is_some() {
        tracing::debug!("slash menu closed");
    }
    if state.mode == AppMode::SlashMenu {
        state.mode = AppMode::Editing;
    }
}

fn open_image_menu(state: &mut AppState, range: Range) {
    close_image_menu(state);
    let hook = state.key_hooks.subscribe(HookTarget::ImageMenu);
    state.image_menu = Some(ImageMenuState::new(range, hook));
    state.mode = AppMode::ImageMenu;
    tracing::info!("image menu opened");
}

/// Unmounts the image menu: cancels its reads and releases its key hook.
fn close_image_menu(state: &mut AppState) {
    if let Some(menu) = state.image_menu.take() {
        let hook = menu.unmount();
        state.key_hooks.unsubscribe(hook);
        tracing::info!("image menu closed");
    }
    if state.mode == AppMode::ImageMenu {
        state.mode = AppMode::Editing;
    }
}

fn owns_upload(state: &AppState, id: UploadId) -> bool {
    state
        .image_menu
        .as_ref()
        .is_some_and(|menu| menu.owns_upload(id))
}

fn handle_image_outcome(
    state: &mut AppState,
    outcome: anyhow::Result<ImageOutcome>,
) -> Option<Command> {
    match outcome {
        Ok(ImageOutcome::Idle) => None,
        Ok(ImageOutcome::PickFile) => Some(Command::PickImageFile),
        Ok(ImageOutcome::Inserted) => {
            state.status_message = Some("Image inserted".to_string());
            close_image_menu(state);
            None
        }
        Err(e) => {
            report_error(state, format!("Failed to insert image: {e}"));
            None
        }
    }
}

fn report_error(state: &mut AppState, message: String) {
    tracing::error!(%message);
    state.last_error = Some(ErrorState::new(message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::action::PickedFile;
    use crate::app::state::UrlFocus;
    use crate::domain::models::{FileKind, PendingFile};
    use crate::infrastructure::markdown_buffer::MarkdownBuffer;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            update(state, Action::EditorInput(key(KeyCode::Char(c))));
        }
    }

    fn open_image_menu_via_slash(state: &mut AppState) {
        type_text(state, "/ima");
        assert_eq!(state.mode, AppMode::SlashMenu);
        update(state, Action::SlashMenuConfirm);
        assert_eq!(state.mode, AppMode::ImageMenu);
    }

    #[test]
    fn test_slash_opens_menu_at_line_start_or_after_space() {
        let mut state = AppState::default();
        type_text(&mut state, "/");
        assert_eq!(state.mode, AppMode::SlashMenu);
        assert_eq!(
            state.slash_menu.as_ref().unwrap().trigger,
            Position::new(0, 0)
        );

        let mut state = AppState::default();
        type_text(&mut state, "a/");
        assert_eq!(state.mode, AppMode::Editing);
        assert!(state.slash_menu.is_none());

        let mut state = AppState::default();
        type_text(&mut state, "a /");
        assert_eq!(
            state.slash_menu.as_ref().unwrap().trigger,
            Position::new(0, 2)
        );
    }

    #[test]
    fn test_typing_filters_and_space_closes() {
        let mut state = AppState::default();
        type_text(&mut state, "/head");
        let menu = state.slash_menu.as_ref().unwrap();
        assert_eq!(menu.query, "head");
        assert_eq!(menu.commands.len(), 3);

        type_text(&mut state, " ");
        assert_eq!(state.mode, AppMode::Editing);
        assert!(state.slash_menu.is_none());
        assert_eq!(state.document.text(), "/head ");
    }

    #[test]
    fn test_backspacing_over_trigger_closes_menu() {
        let mut state = AppState::default();
        type_text(&mut state, "/");
        update(&mut state, Action::EditorInput(key(KeyCode::Backspace)));
        assert!(state.slash_menu.is_none());
        assert_eq!(state.mode, AppMode::Editing);
    }

    #[test]
    fn test_select_heading_replaces_trigger() {
        let mut state = AppState::default();
        type_text(&mut state, "/head");
        update(&mut state, Action::SlashMenuNext);
        update(&mut state, Action::SlashMenuConfirm);

        assert_eq!(state.document.text(), "## ");
        assert_eq!(state.mode, AppMode::Editing);
        assert!(state.slash_menu.is_none());
    }

    #[test]
    fn test_click_selects_by_index() {
        let mut state = AppState::default();
        type_text(&mut state, "intro /");
        update(&mut state, Action::SlashMenuSelect(6));
        assert_eq!(state.document.text(), "intro > ");
    }

    #[test]
    fn test_out_of_range_select_keeps_menu() {
        let mut state = AppState::default();
        type_text(&mut state, "/zzz");
        update(&mut state, Action::SlashMenuConfirm);
        assert_eq!(state.mode, AppMode::SlashMenu);
        assert_eq!(state.document.text(), "/zzz");
    }

    #[test]
    fn test_navigation_without_menu_is_noop() {
        let mut state = AppState::default();
        let before = state.clone();
        for action in [
            Action::SlashMenuNext,
            Action::SlashMenuPrev,
            Action::SlashMenuConfirm,
            Action::ImageMenuNext,
            Action::ImageMenuConfirm,
            Action::ImageUrlSubmit,
        ] {
            assert!(update(&mut state, action).is_none());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_key_hook_attached_once_per_mount() {
        let mut state = AppState::default();
        open_image_menu_via_slash(&mut state);
        assert_eq!(state.key_hooks.top(), Some(HookTarget::ImageMenu));

        for _ in 0..5 {
            update(&mut state, Action::ImageMenuNext);
            update(&mut state, Action::ImageMenuPrev);
        }
        assert_eq!(state.key_hooks.attach_count(), 1);
        assert_eq!(state.key_hooks.detach_count(), 0);

        update(&mut state, Action::CloseImageMenu);
        update(&mut state, Action::CloseImageMenu);
        assert_eq!(state.key_hooks.attach_count(), 1);
        assert_eq!(state.key_hooks.detach_count(), 1);
        assert_eq!(state.key_hooks.top(), None);
        assert_eq!(state.mode, AppMode::Editing);
    }

    #[test]
    fn test_url_flow_inserts_image_and_unmounts() {
        let mut state = AppState::default();
        type_text(&mut state, "see ");
        open_image_menu_via_slash(&mut state);

        update(&mut state, Action::ImageMenuActivate(1));
        for c in "https://example.com/cat.png".chars() {
            update(&mut state, Action::ImageUrlInput(key(KeyCode::Char(c))));
        }
        update(&mut state, Action::ImageUrlSubmit);

        assert_eq!(state.document.text(), "see ![](https://example.com/cat.png)");
        assert!(!state.document.is_focused());
        assert!(state.image_menu.is_none());
        assert_eq!(state.key_hooks.detach_count(), 1);
        assert_eq!(state.mode, AppMode::Editing);
    }

    #[test]
    fn test_invalid_url_keeps_form_and_done_click_then_refocus_clears() {
        let mut state = AppState::default();
        open_image_menu_via_slash(&mut state);
        update(&mut state, Action::ImageMenuActivate(1));
        for c in "nope".chars() {
            update(&mut state, Action::ImageUrlInput(key(KeyCode::Char(c))));
        }
        update(&mut state, Action::ImageUrlDone);

        let form = match &state.image_menu.as_ref().unwrap().mode {
            ImageMode::UrlEntry(form) => form.clone(),
            ImageMode::Choosing => panic!("expected url entry"),
        };
        assert!(form.error.is_some());
        assert_eq!(form.focus, UrlFocus::Done);
        assert_eq!(state.document.text(), "/ima");

        update(&mut state, Action::ImageUrlFocus(UrlFocus::Input));
        match &state.image_menu.as_ref().unwrap().mode {
            ImageMode::UrlEntry(form) => assert!(form.error.is_none()),
            ImageMode::Choosing => panic!("expected url entry"),
        }
    }

    #[test]
    fn test_upload_flow_queues_pending_file() {
        let mut state = AppState::default();
        open_image_menu_via_slash(&mut state);

        let command = update(&mut state, Action::ImageMenuConfirm);
        assert!(matches!(command, Some(Command::PickImageFile)));
        assert_eq!(state.document.text(), "");

        let command = update(
            &mut state,
            Action::ImageFilePicked(Some(PickedFile {
                path: PathBuf::from("/pics/cat.png"),
                blob: "file:///pics/cat.png".to_string(),
            })),
        );
        assert_eq!(state.document.text(), "![](file:///pics/cat.png)");
        let Some(Command::ReadImageFile { id, token, .. }) = command else {
            panic!("expected a read command, got {command:?}");
        };
        assert!(!token.is_cancelled());
        assert_eq!(state.pending_file_count(), 0);

        update(
            &mut state,
            Action::ImageFileLoaded(
                id,
                PendingFile {
                    kind: FileKind::Images,
                    blob: "file:///pics/cat.png".to_string(),
                    filename: "cat.png".to_string(),
                    content: "AQID".to_string(),
                },
            ),
        );
        assert_eq!(state.pending_file_count(), 1);
        assert_eq!(state.document_context.files()[0].kind, FileKind::Images);
        assert!(state.image_menu.is_none());
        assert_eq!(state.key_hooks.detach_count(), 1);
    }

    #[test]
    fn test_read_finishing_after_close_is_dropped() {
        let mut state = AppState::default();
        open_image_menu_via_slash(&mut state);
        update(&mut state, Action::ImageMenuConfirm);
        let command = update(
            &mut state,
            Action::ImageFilePicked(Some(PickedFile {
                path: PathBuf::from("/pics/cat.png"),
                blob: "file:///pics/cat.png".to_string(),
            })),
        );
        let Some(Command::ReadImageFile { id, token, .. }) = command else {
            panic!("expected a read command");
        };

        update(&mut state, Action::CloseImageMenu);
        assert!(token.is_cancelled());

        update(
            &mut state,
            Action::ImageFileLoaded(
                id,
                PendingFile {
                    kind: FileKind::Images,
                    blob: String::new(),
                    filename: "cat.png".to_string(),
                    content: String::new(),
                },
            ),
        );
        assert_eq!(state.pending_file_count(), 0);
    }

    #[test]
    fn test_dismissed_picker_keeps_menu_open() {
        let mut state = AppState::default();
        open_image_menu_via_slash(&mut state);
        update(&mut state, Action::ImageMenuConfirm);
        assert!(update(&mut state, Action::ImageFilePicked(None)).is_none());
        assert_eq!(state.mode, AppMode::ImageMenu);
        assert!(state.image_menu.as_ref().unwrap().is_choosing());
    }

    #[test]
    fn test_read_failure_reports_and_closes() {
        let mut state = AppState::default();
        open_image_menu_via_slash(&mut state);
        update(&mut state, Action::ImageMenuConfirm);
        let Some(Command::ReadImageFile { id, .. }) = update(
            &mut state,
            Action::ImageFilePicked(Some(PickedFile {
                path: PathBuf::from("/pics/cat.png"),
                blob: String::new(),
            })),
        ) else {
            panic!("expected a read command");
        };

        update(&mut state, Action::ImageFileFailed(id, "disk on fire".to_string()));
        assert_eq!(state.last_error.as_ref().unwrap().message, "disk on fire");
        assert!(state.image_menu.is_none());
    }

    #[test]
    fn test_save_requires_path() {
        let mut state = AppState::default();
        assert!(update(&mut state, Action::Save).is_none());
        assert!(state.last_error.is_some());

        let mut state = AppState {
            document: MarkdownBuffer::from_text("# Hi"),
            document_path: Some(PathBuf::from("post.md")),
            ..Default::default()
        };
        match update(&mut state, Action::Save) {
            Some(Command::SaveDocument { path, text }) => {
                assert_eq!(path, PathBuf::from("post.md"));
                assert_eq!(text, "# Hi");
            }
            other => panic!("expected save command, got {other:?}"),
        }
    }

    #[test]
    fn test_save_completion_marks_document_clean() {
        let mut state = AppState::default();
        type_text(&mut state, "x");
        assert!(state.document.is_dirty());
        update(&mut state, Action::OperationStarted("Saving".to_string()));
        update(&mut state, Action::OperationCompleted(Ok("Saved".to_string())));
        assert!(!state.document.is_dirty());
        assert!(state.active_tasks.is_empty());
        assert_eq!(state.status_message.as_deref(), Some("Saved"));
    }

    #[test]
    fn test_dismissed_upload_then_url_keeps_following_text() {
        let mut state = AppState::default();
        type_text(&mut state, "/ima keep this text");
        let trigger = Range::new(Position::new(0, 0), Position::new(0, 4));
        open_image_menu(&mut state, trigger);

        assert!(matches!(
            update(&mut state, Action::ImageMenuConfirm),
            Some(Command::PickImageFile)
        ));
        update(&mut state, Action::ImageFilePicked(None));
        assert_eq!(state.document.text(), " keep this text");

        update(&mut state, Action::ImageMenuActivate(1));
        for c in "https://e.com/a.png".chars() {
            update(&mut state, Action::ImageUrlInput(key(KeyCode::Char(c))));
        }
        update(&mut state, Action::ImageUrlSubmit);
        assert_eq!(state.document.text(), "![](https://e.com/a.png) keep this text");
    }

    #[test]
    fn test_second_upload_leaves_inserted_image_intact() {
        let mut state = AppState::default();
        open_image_menu_via_slash(&mut state);
        update(&mut state, Action::ImageMenuConfirm);
        update(
            &mut state,
            Action::ImageFilePicked(Some(PickedFile {
                path: PathBuf::from("/p/cat.png"),
                blob: "file:///p/cat.png".to_string(),
            })),
        );
        assert_eq!(state.document.text(), "![](file:///p/cat.png)");

        assert!(matches!(
            update(&mut state, Action::ImageMenuConfirm),
            Some(Command::PickImageFile)
        ));
        assert_eq!(state.document.text(), "![](file:///p/cat.png)");
    }

    #[test]
    fn test_typing_with_done_focused_goes_into_field() {
        let mut state = AppState::default();
        open_image_menu_via_slash(&mut state);
        update(&mut state, Action::ImageMenuActivate(1));
        update(&mut state, Action::ImageUrlDone);
        update(&mut state, Action::ImageUrlInput(key(KeyCode::Char('h'))));

        match &state.image_menu.as_ref().unwrap().mode {
            ImageMode::UrlEntry(form) => {
                assert_eq!(form.focus, UrlFocus::Input);
                assert_eq!(form.input.value(), "h");
                assert!(form.error.is_none());
            }
            ImageMode::Choosing => panic!("expected url entry"),
        }
    }
}
