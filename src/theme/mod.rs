use ratatui::style::{Modifier, Style};
use serde::{Deserialize, Serialize};

pub mod catppuccin;
pub mod nord;
pub mod palette;

pub use palette::{dim_color, Palette};

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub border: Style,
    pub border_focus: Style,
    pub title: Style,

    pub editor: Style,
    pub editor_cursor: Style,
    pub editor_cursor_line: Style,

    pub list_item: Style,
    pub list_selected: Style,
    pub list_description: Style,
    pub icon: Style,

    pub input: Style,
    pub input_error: Style,
    pub error_text: Style,
    pub button: Style,
    pub button_focus: Style,

    pub status_info: Style,
    pub status_error: Style,
    pub footer: Style,
    pub footer_key: Style,
    pub dimmed: Style,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteType {
    #[default]
    CatppuccinMocha,
    Nord,
}

impl Theme {
    #[must_use]
    pub fn from_palette_type(t: PaletteType) -> Self {
        match t {
            PaletteType::CatppuccinMocha => Self::from_palette(&catppuccin::CATPPUCCIN_MOCHA),
            PaletteType::Nord => Self::from_palette(&nord::NORD),
        }
    }

    #[must_use]
    pub fn from_palette(p: &Palette) -> Self {
        Self {
            border: Style::default().fg(p.surface2),
            border_focus: Style::default().fg(p.blue),
            title: Style::default()
                .bg(p.green)
                .fg(p.crust)
                .add_modifier(Modifier::BOLD),

            editor: Style::default().fg(p.text),
            editor_cursor: Style::default().fg(p.crust).bg(p.text),
            editor_cursor_line: Style::default().bg(p.base),

            list_item: Style::default().fg(p.text),
            list_selected: Style::default()
                .bg(p.surface1)
                .fg(p.text)
                .add_modifier(Modifier::BOLD),
            list_description: Style::default().fg(p.subtext0).add_modifier(Modifier::DIM),
            icon: Style::default().fg(p.mauve).add_modifier(Modifier::BOLD),

            input: Style::default().fg(p.text).bg(p.surface0),
            input_error: Style::default().fg(p.text).bg(dim_color(p.red, 0.25)),
            error_text: Style::default().fg(p.red),
            button: Style::default().fg(p.text).bg(p.surface1),
            button_focus: Style::default()
                .fg(p.crust)
                .bg(p.teal)
                .add_modifier(Modifier::BOLD),

            status_info: Style::default()
                .bg(p.blue)
                .fg(p.crust)
                .add_modifier(Modifier::BOLD),
            status_error: Style::default()
                .bg(p.red)
                .fg(p.crust)
                .add_modifier(Modifier::BOLD),
            footer: Style::default().bg(p.crust).fg(p.subtext0),
            footer_key: Style::default()
                .bg(p.surface0)
                .fg(p.yellow)
                .add_modifier(Modifier::BOLD),
            dimmed: Style::default().fg(p.overlay0).add_modifier(Modifier::DIM),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_palette_type(PaletteType::CatppuccinMocha)
    }
}
