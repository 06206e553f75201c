use crate::domain::models::{CommandItem, Icon, Position};

/// The trigger character that opens the slash menu.
pub const TRIGGER: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    Heading(u8),
    BulletList,
    NumberedList,
    Quote,
    CodeBlock,
    Divider,
    Image,
}

impl BlockKind {
    /// Markdown that replaces the trigger text. `None` for blocks that need more
    /// input first (images) or nothing at all (plain text).
    #[must_use]
    pub fn markdown(&self) -> Option<String> {
        match self {
            BlockKind::Text | BlockKind::Image => None,
            BlockKind::Heading(level) => Some(format!("{} ", "#".repeat(*level as usize))),
            BlockKind::BulletList => Some("- ".to_string()),
            BlockKind::NumberedList => Some("1. ".to_string()),
            BlockKind::Quote => Some("> ".to_string()),
            BlockKind::CodeBlock => Some("```\n\n```".to_string()),
            BlockKind::Divider => Some("---\n".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlashCommand {
    pub item: CommandItem,
    pub block: BlockKind,
}

impl SlashCommand {
    fn new(title: &str, description: &str, terms: &[&str], icon: Icon, block: BlockKind) -> Self {
        Self {
            item: CommandItem::new(title, description, terms, icon),
            block,
        }
    }
}

#[must_use]
pub fn get_commands() -> Vec<SlashCommand> {
    vec![
        SlashCommand::new(
            "Text",
            "Just start typing with plain text.",
            &["p", "paragraph"],
            Icon::Text,
            BlockKind::Text,
        ),
        SlashCommand::new(
            "Heading 1",
            "Big section heading.",
            &["title", "big", "large"],
            Icon::Heading1,
            BlockKind::Heading(1),
        ),
        SlashCommand::new(
            "Heading 2",
            "Medium section heading.",
            &["subtitle", "medium"],
            Icon::Heading2,
            BlockKind::Heading(2),
        ),
        SlashCommand::new(
            "Heading 3",
            "Small section heading.",
            &["subtitle", "small"],
            Icon::Heading3,
            BlockKind::Heading(3),
        ),
        SlashCommand::new(
            "Bullet List",
            "Create a simple bullet list.",
            &["unordered", "point"],
            Icon::BulletList,
            BlockKind::BulletList,
        ),
        SlashCommand::new(
            "Numbered List",
            "Create a list with numbering.",
            &["ordered"],
            Icon::NumberedList,
            BlockKind::NumberedList,
        ),
        SlashCommand::new(
            "Quote",
            "Capture a quote.",
            &["blockquote"],
            Icon::Quote,
            BlockKind::Quote,
        ),
        SlashCommand::new(
            "Code",
            "Capture a code snippet.",
            &["codeblock"],
            Icon::Code,
            BlockKind::CodeBlock,
        ),
        SlashCommand::new(
            "Divider",
            "Visually separate sections.",
            &["hr", "rule", "separator"],
            Icon::Divider,
            BlockKind::Divider,
        ),
        SlashCommand::new(
            "Image",
            "Upload or embed with a link.",
            &["photo", "picture", "media"],
            Icon::Image,
            BlockKind::Image,
        ),
    ]
}

/// Commands whose title starts with `query`, or with a search term containing
/// it. Case-insensitive; catalog order is kept.
#[must_use]
pub fn search_commands(query: &str) -> Vec<SlashCommand> {
    let query = query.to_lowercase();
    get_commands()
        .into_iter()
        .filter(|cmd| {
            query.is_empty()
                || cmd.item.title.to_lowercase().starts_with(&query)
                || cmd.item.search_terms.iter().any(|term| term.contains(&query))
        })
        .collect()
}

/// Whether a trigger typed at `col` of `line` opens the menu: it must start
/// the line or follow whitespace.
#[must_use]
pub fn can_trigger(line: &str, col: usize) -> bool {
    if col == 0 {
        return true;
    }
    line.chars()
        .nth(col - 1)
        .is_some_and(char::is_whitespace)
}

/// The text typed after the trigger at `trigger`, given the cursor position.
///
/// `None` means the menu should close: the cursor left the trigger's line or
/// moved before it, the trigger was deleted, or the query contains whitespace.
#[must_use]
pub fn query_at(lines: &[String], trigger: Position, cursor: Position) -> Option<String> {
    if cursor.row != trigger.row || cursor.col <= trigger.col {
        return None;
    }
    let line = lines.get(trigger.row)?;
    let mut chars = line.chars().skip(trigger.col);
    if chars.next()? != TRIGGER {
        return None;
    }
    let query: String = chars.take(cursor.col - trigger.col - 1).collect();
    if query.chars().any(char::is_whitespace) {
        return None;
    }
    Some(query)
}
