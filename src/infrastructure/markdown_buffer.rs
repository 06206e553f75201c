use crate::domain::editor::{DocumentEditor, EditorOp};
use crate::domain::models::{ImageAttrs, Position, Range};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};
use url::Url;

/// The document being edited, stored as Markdown lines.
pub struct MarkdownBuffer {
    text_area: TextArea<'static>,
    focused: bool,
    dirty: bool,
    cursor_style: Style,
}

impl Default for MarkdownBuffer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Clone for MarkdownBuffer {
    fn clone(&self) -> Self {
        let mut copy = Self::new(self.text_area.lines().to_vec());
        copy.jump_to(self.cursor());
        copy.focused = self.focused;
        copy.dirty = self.dirty;
        copy.cursor_style = self.cursor_style;
        copy.text_area.set_style(self.text_area.style());
        copy.text_area
            .set_cursor_line_style(self.text_area.cursor_line_style());
        copy.apply_cursor_style();
        copy
    }
}

impl std::fmt::Debug for MarkdownBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownBuffer")
            .field("lines", &self.text_area.lines())
            .field("cursor", &self.text_area.cursor())
            .field("focused", &self.focused)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PartialEq for MarkdownBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.text_area.lines() == other.text_area.lines()
            && self.text_area.cursor() == other.text_area.cursor()
            && self.focused == other.focused
    }
}

impl MarkdownBuffer {
    pub fn new(lines: Vec<String>) -> Self {
        let text_area = if lines.is_empty() {
            TextArea::default()
        } else {
            TextArea::new(lines)
        };
        let mut buffer = Self {
            text_area,
            focused: true,
            dirty: false,
            cursor_style: Style::default().add_modifier(ratatui::style::Modifier::REVERSED),
        };
        buffer.apply_cursor_style();
        buffer
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().map(str::to_string).collect())
    }

    pub fn set_theme(&mut self, theme: &Theme) {
        self.text_area.set_style(theme.editor);
        self.text_area.set_cursor_line_style(theme.editor_cursor_line);
        self.cursor_style = theme.editor_cursor;
        self.apply_cursor_style();
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        self.text_area.lines()
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.text_area.lines().join("\n")
    }

    #[must_use]
    pub fn cursor(&self) -> Position {
        let (row, col) = self.text_area.cursor();
        Position::new(row, col)
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Feeds a key press to the buffer, refocusing it first if it was blurred.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        if !self.focused {
            self.set_focused(true);
        }
        let modified = self.text_area.input(key);
        self.dirty |= modified;
        modified
    }

    pub fn text_area(&self) -> &TextArea<'static> {
        &self.text_area
    }

    /// Chars on `row`, or 0 past the end of the document.
    fn line_len(&self, row: usize) -> usize {
        self.text_area
            .lines()
            .get(row)
            .map_or(0, |line| line.chars().count())
    }

    fn clamp(&self, pos: Position) -> Position {
        let last_row = self.text_area.lines().len().saturating_sub(1);
        let row = pos.row.min(last_row);
        Position::new(row, pos.col.min(self.line_len(row)))
    }

    fn jump_to(&mut self, pos: Position) {
        self.text_area
            .move_cursor(CursorMove::Jump(pos.row as u16, pos.col as u16));
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.apply_cursor_style();
    }

    fn apply_cursor_style(&mut self) {
        if self.focused {
            self.text_area.set_cursor_style(self.cursor_style);
        } else {
            self.text_area.set_cursor_style(Style::default());
        }
    }

    fn delete_range(&mut self, range: Range) {
        let (from, to) = {
            let a = self.clamp(range.from);
            let b = self.clamp(range.to);
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };

        // Newlines count as one char each.
        let count = if from.row == to.row {
            to.col - from.col
        } else {
            let mut count = self.line_len(from.row) - from.col + 1;
            for row in from.row + 1..to.row {
                count += self.line_len(row) + 1;
            }
            count + to.col
        };

        self.jump_to(from);
        for _ in 0..count {
            if !self.text_area.delete_next_char() {
                break;
            }
        }
        self.dirty |= count > 0;
    }

    fn insert_content(&mut self, content: &str) {
        for (i, part) in content.split('\n').enumerate() {
            if i > 0 {
                self.text_area.insert_newline();
            }
            if !part.is_empty() {
                self.text_area.insert_str(part);
            }
        }
        self.dirty |= !content.is_empty();
    }
}

/// `![alt](src "title")`, omitting an empty title.
#[must_use]
pub fn image_markdown(attrs: &ImageAttrs) -> String {
    let dest = link_destination(&attrs.src);
    match attrs.title.as_deref() {
        Some(title) if !title.is_empty() => {
            format!("![{}]({} \"{}\")", attrs.alt, dest, title.replace('"', "\\\""))
        }
        _ => format!("![{}]({})", attrs.alt, dest),
    }
}

/// A Markdown link destination for `src`. Absolute URLs are written in their
/// serialized form, which percent-encodes spaces; anything still holding
/// whitespace or unbalanced parentheses goes in angle brackets.
fn link_destination(src: &str) -> String {
    let dest = Url::parse(src).map_or_else(|_| src.to_string(), String::from);
    let mut depth: i32 = 0;
    let mut balanced = true;
    for c in dest.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                balanced &= depth >= 0;
            }
            _ => {}
        }
    }
    balanced &= depth == 0;

    if balanced && !dest.contains(|c: char| c.is_whitespace() || c == '<' || c == '>') {
        dest
    } else {
        format!("<{}>", dest.replace('<', "%3C").replace('>', "%3E"))
    }
}

impl DocumentEditor for MarkdownBuffer {
    fn apply(&mut self, op: EditorOp) -> Result<()> {
        match op {
            EditorOp::Focus => self.set_focused(true),
            EditorOp::Blur => self.set_focused(false),
            EditorOp::DeleteRange(range) => self.delete_range(range),
            EditorOp::SetImage(attrs) => self.insert_content(&image_markdown(&attrs)),
            EditorOp::InsertContent(content) => self.insert_content(&content),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::editor::EditorChain;

    fn range(from: (usize, usize), to: (usize, usize)) -> Range {
        Range::new(Position::new(from.0, from.1), Position::new(to.0, to.1))
    }

    #[test]
    fn test_delete_range_on_one_line() {
        let mut buffer = MarkdownBuffer::from_text("intro /ima");
        buffer
            .apply(EditorOp::DeleteRange(range((0, 6), (0, 10))))
            .unwrap();
        assert_eq!(buffer.text(), "intro ");
        assert_eq!(buffer.cursor(), Position::new(0, 6));
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_delete_range_across_lines() {
        let mut buffer = MarkdownBuffer::from_text("abc\ndef\nghi");
        buffer
            .apply(EditorOp::DeleteRange(range((0, 1), (2, 1))))
            .unwrap();
        assert_eq!(buffer.text(), "ahi");
    }

    #[test]
    fn test_delete_range_clamps_out_of_bounds() {
        let mut buffer = MarkdownBuffer::from_text("short");
        buffer
            .apply(EditorOp::DeleteRange(range((0, 2), (9, 99))))
            .unwrap();
        assert_eq!(buffer.text(), "sh");
    }

    #[test]
    fn test_set_image_writes_markdown_at_cursor() {
        let mut buffer = MarkdownBuffer::from_text("/");
        EditorChain::new(&mut buffer)
            .focus()
            .delete_range(range((0, 0), (0, 1)))
            .set_image(ImageAttrs {
                src: "https://example.com/cat.png".to_string(),
                alt: String::new(),
                title: Some(String::new()),
            })
            .insert_content("")
            .run()
            .unwrap();
        assert_eq!(buffer.text(), "![](https://example.com/cat.png)");
    }

    #[test]
    fn test_image_markdown_with_title() {
        let attrs = ImageAttrs {
            src: "cat.png".to_string(),
            alt: "a cat".to_string(),
            title: Some("Say \"hi\"".to_string()),
        };
        assert_eq!(image_markdown(&attrs), "![a cat](cat.png \"Say \\\"hi\\\"\")");
    }

    #[test]
    fn test_image_destination_with_spaces_stays_a_link() {
        let attrs = ImageAttrs {
            src: "https://e.com/a (1).png".to_string(),
            alt: String::new(),
            title: None,
        };
        assert_eq!(image_markdown(&attrs), "![](https://e.com/a%20(1).png)");

        let attrs = ImageAttrs {
            src: "https://e.com/a).png".to_string(),
            alt: String::new(),
            title: None,
        };
        assert_eq!(image_markdown(&attrs), "![](<https://e.com/a).png>)");

        let attrs = ImageAttrs {
            src: "my cat.png".to_string(),
            alt: String::new(),
            title: None,
        };
        assert_eq!(image_markdown(&attrs), "![](<my cat.png>)");
    }

    #[test]
    fn test_insert_multiline_content() {
        let mut buffer = MarkdownBuffer::default();
        buffer
            .apply(EditorOp::InsertContent("```\n\n```".to_string()))
            .unwrap();
        assert_eq!(buffer.lines(), ["```", "", "```"]);
    }

    #[test]
    fn test_blur_then_typing_refocuses() {
        use crossterm::event::{KeyCode, KeyModifiers};

        let mut buffer = MarkdownBuffer::default();
        buffer.apply(EditorOp::Blur).unwrap();
        assert!(!buffer.is_focused());

        buffer.input(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(buffer.is_focused());
        assert_eq!(buffer.text(), "x");
    }
}
