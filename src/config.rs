use crate::theme::PaletteType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// External program that prints the chosen file path on stdout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickerConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            program: "zenity".to_string(),
            args: vec![
                "--file-selection".to_string(),
                "--file-filter=Images | *.png *.jpg *.jpeg *.gif *.webp *.svg *.avif".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub picker: PickerConfig,
    /// Upper bound for the slash menu height, in terminal rows.
    pub max_menu_height: u16,
    pub theme: PaletteType,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            picker: PickerConfig::default(),
            max_menu_height: 12,
            theme: PaletteType::default(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Reads `~/.config/slashdoc/config.toml`, falling back to defaults.
    pub fn load() -> Self {
        match get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read config");
                Self::default()
            }
        }
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.log_dir.clone().or_else(|| {
            home::home_dir().map(|mut path| {
                path.push(".local");
                path.push("state");
                path.push("slashdoc");
                path
            })
        })
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    home::home_dir().map(|mut path| {
        path.push(".config");
        path.push("slashdoc");
        path.push("config.toml");
        path
    })
}
