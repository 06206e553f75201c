pub mod action;
pub mod command;
pub mod external;
pub mod image_command;
pub mod input;
pub mod key_hooks;
pub mod r#loop;
pub mod reducer;
pub mod slash_commands;
pub mod state;
pub mod ui;
pub mod uploads;
