use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "DOC_TREE_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors: ColorConfig,
    pub layout: LayoutConfig,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub border: Color,
    pub folder: Color,
    pub document: Color,
    pub doc_meta: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub drop_allowed: Color,
    pub drop_refused: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub indent_width: usize,
    /// How many destinations the "Move to folder" menu lists
    pub move_menu_limit: usize,
    pub show_document_details: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: char,
    pub new_folder: char,
    pub new_root_folder: char,
    pub rename: char,
    pub delete: char,
    pub pick_up: char,
    pub move_menu: char,
    pub drop_at_root: char,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            border: Color::Yellow,
            folder: Color::Blue,
            document: Color::Reset,
            doc_meta: Color::DarkGray,
            selected_fg: Color::Black,
            selected_bg: Color::White,
            drop_allowed: Color::Green,
            drop_refused: Color::Red,
            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            move_menu_limit: 5,
            show_document_details: true,
        }
    }
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: 'q',
            new_folder: 'n',
            new_root_folder: 'N',
            rename: 'r',
            delete: 'd',
            pick_up: 'm',
            move_menu: 'M',
            drop_at_root: '0',
        }
    }
}

impl Config {
    /// Load from the file named by `DOC_TREE_CONFIG`, falling back to defaults
    pub fn load() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load_from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
