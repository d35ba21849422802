use crate::command::Command;
use crate::config::Config;
use crate::controller::{Controller, Intent, Outcome};
use crate::tree::{FolderNode, Node, Tree};

/// Host view state around the interaction controller.
///
/// The cursor and the open menu belong to the view; the tree and the
/// rename/drag state belong to the controller.
#[derive(Debug, Clone)]
pub struct App {
    pub controller: Controller,
    pub config: Config,
    pub selection: Option<String>,
    /// Node whose "Move to folder" menu is open
    pub move_menu: Option<String>,
    pub status_message: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(tree: Tree, config: Config) -> Self {
        let mut app = Self {
            controller: Controller::new(tree),
            config,
            selection: None,
            move_menu: None,
            status_message: "Ready".to_string(),
            should_quit: false,
        };
        app.ensure_valid_selection();
        app
    }

    pub fn tree(&self) -> &Tree {
        self.controller.tree()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.as_deref().and_then(|id| self.tree().find(id))
    }

    pub fn visible_ids(&self) -> Vec<String> {
        self.tree()
            .visible_nodes_with_depth()
            .into_iter()
            .map(|(node, _)| node.id().to_string())
            .collect()
    }

    /// Folder a new folder should go into: the selected folder, or a selected document's parent
    pub fn creation_parent(&self) -> Option<String> {
        let node = self.selected_node()?;
        if node.is_folder() {
            Some(node.id().to_string())
        } else {
            self.tree()
                .ancestors_of(node.id())
                .first()
                .map(|id| id.to_string())
        }
    }

    /// Destinations listed by the open move menu
    pub fn move_menu_entries(&self) -> Vec<&FolderNode> {
        match &self.move_menu {
            Some(node_id) => self
                .controller
                .move_candidates(node_id, self.config.layout.move_menu_limit),
            None => Vec::new(),
        }
    }

    pub fn open_move_menu(&mut self) -> bool {
        match self.selection.clone() {
            Some(id) => {
                self.move_menu = Some(id);
                true
            }
            None => false,
        }
    }

    /// Pick entry `index` from the move menu, or the root when `None`
    pub fn choose_move_destination(&mut self, index: Option<usize>) -> bool {
        let Some(node) = self.move_menu.clone() else {
            return false;
        };
        let destination = match index {
            Some(index) => match self.move_menu_entries().get(index) {
                Some(folder) => Some(folder.id.clone()),
                None => return false,
            },
            None => None,
        };
        self.move_menu = None;
        self.apply(Intent::MoveTo { node, destination }.into())
    }

    /// Apply a command; returns true if anything visible changed
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Intent(intent) => self.dispatch(intent),
            Command::SelectUp => self.move_selection(-1),
            Command::SelectDown => self.move_selection(1),
            Command::Select(id) => {
                if self.visible_ids().contains(&id) {
                    self.selection = Some(id);
                    self.hover_selection();
                    true
                } else {
                    false
                }
            }
            Command::Quit => {
                self.should_quit = true;
                self.status_message = "Goodbye!".to_string();
                true
            }
            Command::Sequence(commands) => {
                let mut changed = false;
                for command in commands {
                    changed |= self.apply(command);
                }
                changed
            }
        }
    }

    fn dispatch(&mut self, intent: Intent) -> bool {
        let message = self.describe(&intent);
        let selects_new_folder = matches!(intent, Intent::CreateFolder(_));
        let state_before = (
            self.controller.edit_state().clone(),
            self.controller.drag().cloned(),
        );
        let outcome = self.controller.handle(intent);

        match outcome {
            Outcome::TreeChanged => {
                if selects_new_folder {
                    self.selection = self.controller.editing_id().map(str::to_string);
                }
                self.ensure_valid_selection();
                self.status_message = message;
                true
            }
            Outcome::StateChanged => {
                self.status_message = message;
                true
            }
            // Rejected gestures are inert; nothing is surfaced to the user,
            // but a refused drop or blank commit still ends the gesture.
            Outcome::Ignored | Outcome::Rejected(_) => {
                let state_after = (
                    self.controller.edit_state().clone(),
                    self.controller.drag().cloned(),
                );
                state_before != state_after
            }
        }
    }

    fn describe(&self, intent: &Intent) -> String {
        let name = |id: &str| {
            self.tree()
                .find(id)
                .map(|node| node.name().to_string())
                .unwrap_or_else(|| id.to_string())
        };
        let target = |dest: &Option<String>| match dest {
            Some(id) => name(id),
            None => "root".to_string(),
        };

        match intent {
            Intent::DragStart(id) => format!("Dragging {}", name(id)),
            Intent::DragOver(dest) => format!("Over {}", target(dest)),
            Intent::Drop(dest) => format!("Moved to {}", target(dest)),
            Intent::DragCancel => "Drag cancelled".to_string(),
            Intent::RenameStart(id) => format!("Renaming {}", name(id)),
            Intent::RenameChange(_) => "Renaming".to_string(),
            Intent::RenameCommit => "Renamed".to_string(),
            Intent::RenameCancel => "Rename cancelled".to_string(),
            Intent::CreateFolder(_) => "Created folder".to_string(),
            Intent::Delete(id) => format!("Deleted {}", name(id)),
            Intent::ToggleExpand(id) => format!("Toggled {}", name(id)),
            Intent::MoveTo { node, destination } => {
                format!("Moved {} to {}", name(node), target(destination))
            }
        }
    }

    fn move_selection(&mut self, delta: isize) -> bool {
        let visible = self.visible_ids();
        if visible.is_empty() {
            return false;
        }
        let current = self
            .selection
            .as_ref()
            .and_then(|sel| visible.iter().position(|id| id == sel))
            .unwrap_or(0);
        let next = current as isize + delta;
        if next < 0 || next as usize >= visible.len() {
            return false;
        }
        self.selection = Some(visible[next as usize].clone());
        self.hover_selection();
        true
    }

    /// While carrying a node, the cursor is the pointer: report it as the hover target
    fn hover_selection(&mut self) {
        if self.controller.is_dragging() {
            let target = self.selection.clone();
            self.controller.handle(Intent::DragOver(target));
        }
    }

    /// Keep the cursor on a visible node after the tree changed
    pub fn ensure_valid_selection(&mut self) {
        let visible = self.visible_ids();
        let Some(selected) = self.selection.clone() else {
            self.selection = visible.first().cloned();
            return;
        };
        if visible.contains(&selected) {
            return;
        }
        // Hidden under a collapsed folder: climb to the nearest visible ancestor.
        let ancestor = self
            .tree()
            .ancestors_of(&selected)
            .into_iter()
            .find(|id| visible.iter().any(|v| v == id))
            .map(str::to_string);
        self.selection = ancestor.or_else(|| visible.first().cloned());
    }
}
