use crate::app::slash_commands::{search_commands, SlashCommand};
use crate::components::command_list::CommandListState;
use crate::domain::models::{CommandItem, Position, Range};

#[derive(Debug, Clone, PartialEq)]
pub struct SlashMenuState {
    /// Where the trigger character sits.
    pub trigger: Position,
    /// Trigger plus the query typed after it.
    pub range: Range,
    pub query: String,
    pub commands: Vec<SlashCommand>,
    pub selected_index: usize,
    pub list: CommandListState,
}

impl SlashMenuState {
    #[must_use]
    pub fn new(trigger: Position) -> Self {
        Self {
            trigger,
            range: Range::new(trigger, Position::new(trigger.row, trigger.col + 1)),
            query: String::new(),
            commands: search_commands(""),
            selected_index: 0,
            list: CommandListState::default(),
        }
    }

    pub fn items(&self) -> Vec<&CommandItem> {
        self.commands.iter().map(|cmd| &cmd.item).collect()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&SlashCommand> {
        self.commands.get(self.selected_index)
    }

    /// Re-filters for `query`. A different result list starts over at the top.
    pub fn set_query(&mut self, query: String, cursor: Position) {
        self.range.to = cursor;
        if query == self.query {
            return;
        }
        let commands = search_commands(&query);
        if commands != self.commands {
            self.commands = commands;
            self.selected_index = 0;
            self.list.reset();
        }
        self.query = query;
    }

    pub fn select_next(&mut self) {
        if !self.commands.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.commands.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.commands.is_empty() {
            let len = self.commands.len();
            self.selected_index = (self.selected_index + len - 1) % len;
        }
    }
}
