//! Interaction controller
//!
//! Sits between discrete user gestures and the tree store. It owns the
//! ephemeral state the tree must never carry (which node is being renamed,
//! what is being dragged and where it hovers) and re-validates every gesture
//! against the current tree right before anything is applied.

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::tree::{FolderNode, Node, Tree, DEFAULT_FOLDER_NAME};

/// Discrete gestures delivered by the host view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    DragStart(String),
    /// Hovering a folder, or the root drop zone when `None`
    DragOver(Option<String>),
    Drop(Option<String>),
    /// Drag released outside any drop target
    DragCancel,
    RenameStart(String),
    RenameChange(String),
    RenameCommit,
    RenameCancel,
    CreateFolder(Option<String>),
    Delete(String),
    ToggleExpand(String),
    /// "Move to folder" menu entry
    MoveTo {
        node: String,
        destination: Option<String>,
    },
}

/// Inline rename state machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditState {
    #[default]
    Idle,
    Editing { id: String, draft: String },
}

/// Where a drag currently hovers and whether dropping there would be legal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hover {
    pub target: Option<String>,
    pub can_drop: bool,
}

/// An in-flight drag gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragState {
    pub node_id: String,
    /// Snapshot of the node taken when the drag started; display only
    pub node: Node,
    pub hover: Option<Hover>,
}

/// What handling an intent did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new tree snapshot replaced the old one
    TreeChanged,
    /// Only edit or drag state changed
    StateChanged,
    /// Nothing to do in the current state
    Ignored,
    /// The tree store refused; the tree is unchanged
    Rejected(TreeError),
}

impl Outcome {
    pub fn tree_changed(&self) -> bool {
        matches!(self, Outcome::TreeChanged)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controller {
    tree: Tree,
    edit: EditState,
    drag: Option<DragState>,
}

impl Controller {
    pub fn new(tree: Tree) -> Self {
        Self {
            tree,
            edit: EditState::Idle,
            drag: None,
        }
    }

    /// Rebuild a controller from previously captured state, dropping anything stale
    pub fn from_parts(tree: Tree, edit: EditState, drag: Option<DragState>) -> Self {
        let mut controller = Self { tree, edit, drag };
        controller.reconcile();
        controller
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.edit {
            EditState::Editing { id, .. } => Some(id),
            EditState::Idle => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.edit {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Legality of the current hover, for affordance only
    pub fn hover_can_drop(&self) -> bool {
        self.drag
            .as_ref()
            .and_then(|drag| drag.hover.as_ref())
            .map(|hover| hover.can_drop)
            .unwrap_or(false)
    }

    /// Side-effect-free legality query for the in-flight drag
    pub fn can_drop(&self, destination: Option<&str>) -> bool {
        self.drag
            .as_ref()
            .map(|drag| self.tree.can_move(&drag.node_id, destination))
            .unwrap_or(false)
    }

    /// Folders offered by the "Move to folder" menu for `node_id`
    pub fn move_candidates(&self, node_id: &str, limit: usize) -> Vec<&FolderNode> {
        self.tree
            .folders_excluding(node_id)
            .into_iter()
            .take(limit)
            .collect()
    }

    pub fn handle(&mut self, intent: Intent) -> Outcome {
        log::debug!("controller: handling {:?}", intent);

        let outcome = match intent {
            Intent::DragStart(node_id) => self.start_drag(node_id),
            Intent::DragOver(target) => self.hover(target),
            Intent::Drop(target) => self.drop_on(target),
            Intent::DragCancel => {
                if self.drag.take().is_some() {
                    Outcome::StateChanged
                } else {
                    Outcome::Ignored
                }
            }
            Intent::RenameStart(id) => self.start_rename(id),
            Intent::RenameChange(draft) => match &mut self.edit {
                EditState::Editing { draft: current, .. } => {
                    *current = draft;
                    Outcome::StateChanged
                }
                EditState::Idle => Outcome::Ignored,
            },
            Intent::RenameCommit => self.commit_rename(),
            Intent::RenameCancel => self.cancel_rename(),
            Intent::CreateFolder(parent_id) => self.create_folder(parent_id),
            Intent::Delete(id) => {
                let result = self.tree.delete(&id);
                self.apply(result)
            }
            Intent::ToggleExpand(folder_id) => {
                let result = self.tree.toggle_expanded(&folder_id);
                self.apply(result)
            }
            Intent::MoveTo { node, destination } => {
                let result = self.tree.move_node(&node, destination.as_deref());
                self.apply(result)
            }
        };

        if let Outcome::Rejected(err) = &outcome {
            log::debug!("controller: rejected ({})", err);
        }
        outcome
    }

    /// Swap in a new snapshot, or report the rejection and keep the old one
    fn apply(&mut self, result: Result<Tree, TreeError>) -> Outcome {
        match result {
            Ok(tree) => {
                self.tree = tree;
                self.reconcile();
                Outcome::TreeChanged
            }
            Err(err) => Outcome::Rejected(err),
        }
    }

    /// Bring ephemeral state back in line with the current tree
    fn reconcile(&mut self) {
        if let Some(id) = self.editing_id() {
            if self.tree.find(id).is_none() {
                log::debug!("controller: edited node {} is gone, leaving edit mode", id);
                self.edit = EditState::Idle;
            }
        }

        let dragged_gone = self
            .drag
            .as_ref()
            .map(|drag| self.tree.find(&drag.node_id).is_none())
            .unwrap_or(false);
        if dragged_gone {
            log::debug!("controller: dragged node is gone, ending drag");
            self.drag = None;
        }

        if let Some(drag) = &mut self.drag {
            if let Some(hover) = &mut drag.hover {
                hover.can_drop = self.tree.can_move(&drag.node_id, hover.target.as_deref());
            }
        }
    }

    fn start_drag(&mut self, node_id: String) -> Outcome {
        let Some(node) = self.tree.find(&node_id) else {
            return Outcome::Rejected(TreeError::NotFound(node_id));
        };
        self.drag = Some(DragState {
            node: node.clone(),
            node_id,
            hover: None,
        });
        Outcome::StateChanged
    }

    fn hover(&mut self, target: Option<String>) -> Outcome {
        let Some(drag) = &mut self.drag else {
            return Outcome::Ignored;
        };
        let can_drop = self.tree.can_move(&drag.node_id, target.as_deref());
        let hover = Some(Hover { target, can_drop });
        if drag.hover == hover {
            return Outcome::Ignored;
        }
        drag.hover = hover;
        Outcome::StateChanged
    }

    fn drop_on(&mut self, target: Option<String>) -> Outcome {
        let Some(drag) = self.drag.take() else {
            return Outcome::Ignored;
        };
        // Hover-time legality may be stale; check again against the live tree.
        let result = self.tree.move_node(&drag.node_id, target.as_deref());
        self.apply(result)
    }

    fn start_rename(&mut self, id: String) -> Outcome {
        let Some(node) = self.tree.find(&id) else {
            return Outcome::Rejected(TreeError::NotFound(id));
        };
        if let Some(previous) = self.editing_id() {
            log::debug!("controller: abandoning rename of {}", previous);
        }
        self.edit = EditState::Editing {
            draft: node.name().to_string(),
            id,
        };
        Outcome::StateChanged
    }

    fn commit_rename(&mut self) -> Outcome {
        let EditState::Editing { id, draft } = std::mem::take(&mut self.edit) else {
            return Outcome::Ignored;
        };
        // A blank draft leaves edit mode like a cancel; the node keeps its name.
        let result = self.tree.rename(&id, &draft);
        self.apply(result)
    }

    fn cancel_rename(&mut self) -> Outcome {
        match std::mem::take(&mut self.edit) {
            EditState::Editing { .. } => Outcome::StateChanged,
            EditState::Idle => Outcome::Ignored,
        }
    }

    fn create_folder(&mut self, parent_id: Option<String>) -> Outcome {
        match self.tree.create_folder(parent_id.as_deref(), DEFAULT_FOLDER_NAME) {
            Ok((tree, new_id)) => {
                self.tree = tree;
                self.reconcile();
                self.edit = EditState::Editing {
                    id: new_id,
                    draft: DEFAULT_FOLDER_NAME.to_string(),
                };
                Outcome::TreeChanged
            }
            Err(err) => Outcome::Rejected(err),
        }
    }
}
