use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::app::App;
use crate::config::Config;
use crate::controller::{Controller, DragState, EditState};
use crate::error::{DocTreeError, Result};
use crate::seed::initial_tree;
use crate::tree::Tree;

/// Serializable picture of the panel, used by `execute`, `screenshot` and scripted tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tree: Tree,
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub edit: EditState,
    #[serde(default)]
    pub drag: Option<DragState>,
    #[serde(default)]
    pub move_menu: Option<String>,
    #[serde(default = "default_status")]
    pub status_message: String,
}

fn default_status() -> String {
    "Ready".to_string()
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            tree: initial_tree(),
            selection: Some("folder-1".to_string()),
            edit: EditState::Idle,
            drag: None,
            move_menu: None,
            status_message: default_status(),
        }
    }
}

impl Snapshot {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and reject trees that break id uniqueness
    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        if let Some(id) = snapshot.tree.duplicate_id() {
            return Err(DocTreeError::Generic(format!("Duplicate node id in snapshot: {}", id)));
        }
        Ok(snapshot)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn from_app(app: &App) -> Self {
        Snapshot {
            tree: app.tree().clone(),
            selection: app.selection.clone(),
            edit: app.controller.edit_state().clone(),
            drag: app.controller.drag().cloned(),
            move_menu: app.move_menu.clone(),
            status_message: app.status_message.clone(),
        }
    }

    pub fn into_app(self, config: Config) -> App {
        let mut app = App::new(Tree::new(), config);
        app.controller = Controller::from_parts(self.tree, self.edit, self.drag);
        app.selection = self.selection;
        app.move_menu = self.move_menu.filter(|id| app.controller.tree().find(id).is_some());
        app.status_message = self.status_message;
        app.ensure_valid_selection();
        app
    }
}
