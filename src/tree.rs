use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{MoveRejection, TreeError};

pub const DEFAULT_FOLDER_NAME: &str = "New Folder";
const FOLDER_ID_PREFIX: &str = "folder-";

/// A folder: owns an ordered list of children and an expand flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub is_expanded: bool,
}

/// A leaf entry carrying descriptive metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: String,
    pub name: String,
    pub doc_type: String,
    pub size_label: String,
}

/// A single entry in the document tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Folder(FolderNode),
    Document(DocumentNode),
}

impl FolderNode {
    /// Create a new, empty, collapsed folder
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
            is_expanded: false,
        }
    }

    pub fn expanded(mut self) -> Self {
        self.is_expanded = true;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// True if `id` appears anywhere below this folder (not counting the folder itself)
    pub fn has_descendant(&self, id: &str) -> bool {
        self.children.iter().any(|child| {
            child.id() == id
                || matches!(child, Node::Folder(folder) if folder.has_descendant(id))
        })
    }
}

impl DocumentNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        doc_type: impl Into<String>,
        size_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            doc_type: doc_type.into(),
            size_label: size_label.into(),
        }
    }
}

impl From<FolderNode> for Node {
    fn from(folder: FolderNode) -> Self {
        Node::Folder(folder)
    }
}

impl From<DocumentNode> for Node {
    fn from(document: DocumentNode) -> Self {
        Node::Document(document)
    }
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.id,
            Node::Document(document) => &document.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.name,
            Node::Document(document) => &document.name,
        }
    }

    fn set_name(&mut self, name: String) {
        match self {
            Node::Folder(folder) => folder.name = name,
            Node::Document(document) => document.name = name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Folder(_) => "folder",
            Node::Document(_) => "document",
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Document(_) => None,
        }
    }

    /// Children of a folder; documents have none
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Folder(folder) => &folder.children,
            Node::Document(_) => &[],
        }
    }

    /// True if `id` is this node or anything below it
    pub fn subtree_contains(&self, id: &str) -> bool {
        self.id() == id
            || match self {
                Node::Folder(folder) => folder.has_descendant(id),
                Node::Document(_) => false,
            }
    }
}

/// The canonical tree value: an ordered sequence of root nodes.
///
/// Every mutating operation borrows the current tree and returns a new one.
/// On error the caller keeps the snapshot it already holds, so a failed
/// operation never changes anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub roots: Vec<Node>,
}

impl Tree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    pub fn from_roots(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first search for the first node with `id`
    pub fn find(&self, id: &str) -> Option<&Node> {
        Self::find_in(&self.roots, id)
    }

    fn find_in<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
        for node in nodes {
            if node.id() == id {
                return Some(node);
            }
            if let Some(found) = Self::find_in(node.children(), id) {
                return Some(found);
            }
        }
        None
    }

    /// Find a folder by id; documents and missing ids both yield `None`
    pub fn find_folder(&self, id: &str) -> Option<&FolderNode> {
        self.find(id).and_then(Node::as_folder)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        Self::find_in_mut(&mut self.roots, id)
    }

    fn find_in_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
        for node in nodes {
            if node.id() == id {
                return Some(node);
            }
            if let Node::Folder(folder) = node {
                if let Some(found) = Self::find_in_mut(&mut folder.children, id) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn find_folder_mut(&mut self, id: &str) -> Option<&mut FolderNode> {
        match self.find_mut(id) {
            Some(Node::Folder(folder)) => Some(folder),
            _ => None,
        }
    }

    /// Remove the node with `id` from wherever it lives, returning it with its subtree
    fn detach(nodes: &mut Vec<Node>, id: &str) -> Option<Node> {
        if let Some(index) = nodes.iter().position(|node| node.id() == id) {
            return Some(nodes.remove(index));
        }
        for node in nodes.iter_mut() {
            if let Node::Folder(folder) = node {
                if let Some(found) = Self::detach(&mut folder.children, id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Create an empty, expanded folder under `parent_id`, or at the root when absent.
    ///
    /// A blank `name` falls back to [`DEFAULT_FOLDER_NAME`].
    pub fn create_folder(
        &self,
        parent_id: Option<&str>,
        name: &str,
    ) -> Result<(Tree, String), TreeError> {
        let id = self.next_folder_id();
        let name = match name.trim() {
            "" => DEFAULT_FOLDER_NAME.to_string(),
            trimmed => trimmed.to_string(),
        };
        let folder = Node::Folder(FolderNode::new(id.clone(), name).expanded());

        let mut next = self.clone();
        match parent_id {
            Some(parent_id) => {
                let parent = next
                    .find_folder_mut(parent_id)
                    .ok_or_else(|| TreeError::NotFound(parent_id.to_string()))?;
                parent.children.push(folder);
            }
            None => next.roots.push(folder),
        }

        log::debug!("create_folder: {} under {:?}", id, parent_id);
        Ok((next, id))
    }

    /// Rename any node; the name is trimmed and must not be blank
    pub fn rename(&self, id: &str, new_name: &str) -> Result<Tree, TreeError> {
        let trimmed = new_name.trim();
        if self.find(id).is_none() {
            return Err(TreeError::NotFound(id.to_string()));
        }
        if trimmed.is_empty() {
            return Err(TreeError::EmptyName);
        }

        let mut next = self.clone();
        if let Some(node) = next.find_mut(id) {
            node.set_name(trimmed.to_string());
        }
        Ok(next)
    }

    /// Flip the expand flag of a folder
    pub fn toggle_expanded(&self, folder_id: &str) -> Result<Tree, TreeError> {
        let mut next = self.clone();
        let folder = next
            .find_folder_mut(folder_id)
            .ok_or_else(|| TreeError::NotFound(folder_id.to_string()))?;
        folder.is_expanded = !folder.is_expanded;
        Ok(next)
    }

    /// Remove a node and, for folders, everything below it
    pub fn delete(&self, id: &str) -> Result<Tree, TreeError> {
        let mut next = self.clone();
        let removed = Self::detach(&mut next.roots, id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))?;
        log::debug!(
            "delete: removed {} ({} node(s))",
            id,
            Tree::from_roots(vec![removed]).stats().total_nodes
        );
        Ok(next)
    }

    /// Check whether `node_id` may be moved into `destination` (the root when `None`)
    pub fn check_move(&self, node_id: &str, destination: Option<&str>) -> Result<(), TreeError> {
        let node = self
            .find(node_id)
            .ok_or_else(|| TreeError::NotFound(node_id.to_string()))?;

        let Some(destination) = destination else {
            return Ok(());
        };

        let reject = |reason| TreeError::IllegalMove {
            node: node_id.to_string(),
            destination: destination.to_string(),
            reason,
        };

        if node_id == destination {
            return Err(reject(MoveRejection::OntoSelf));
        }
        let target = self
            .find(destination)
            .ok_or_else(|| TreeError::NotFound(destination.to_string()))?;
        if !target.is_folder() {
            return Err(reject(MoveRejection::NotAFolder));
        }
        // Documents have no children, so only folders can swallow their destination.
        if let Node::Folder(folder) = node {
            if folder.has_descendant(destination) {
                return Err(reject(MoveRejection::IntoDescendant));
            }
        }
        Ok(())
    }

    pub fn can_move(&self, node_id: &str, destination: Option<&str>) -> bool {
        self.check_move(node_id, destination).is_ok()
    }

    /// Relocate a node (with its subtree) to the end of `destination`'s children,
    /// or to the end of the root sequence when `destination` is `None`
    pub fn move_node(&self, node_id: &str, destination: Option<&str>) -> Result<Tree, TreeError> {
        self.check_move(node_id, destination)?;

        let mut next = self.clone();
        let detached = Self::detach(&mut next.roots, node_id)
            .ok_or_else(|| TreeError::NotFound(node_id.to_string()))?;

        match destination {
            Some(destination) => {
                let folder = next
                    .find_folder_mut(destination)
                    .ok_or_else(|| TreeError::NotFound(destination.to_string()))?;
                folder.children.push(detached);
            }
            None => next.roots.push(detached),
        }

        log::debug!("move_node: {} -> {:?}", node_id, destination);
        Ok(next)
    }

    /// All folders in depth-first order, skipping `exclude` and everything below it
    pub fn folders_excluding(&self, exclude: &str) -> Vec<&FolderNode> {
        let mut folders = Vec::new();
        Self::collect_folders(&self.roots, exclude, &mut folders);
        folders
    }

    fn collect_folders<'a>(nodes: &'a [Node], exclude: &str, folders: &mut Vec<&'a FolderNode>) {
        for node in nodes {
            if let Node::Folder(folder) = node {
                if folder.id == exclude {
                    continue;
                }
                folders.push(folder);
                Self::collect_folders(&folder.children, exclude, folders);
            }
        }
    }

    /// Ids of the folders enclosing `id`, nearest first. Empty for root nodes and unknown ids.
    pub fn ancestors_of(&self, id: &str) -> Vec<&str> {
        let mut path = Vec::new();
        if Self::path_to(&self.roots, id, &mut path) {
            path.reverse();
            path
        } else {
            Vec::new()
        }
    }

    fn path_to<'a>(nodes: &'a [Node], id: &str, path: &mut Vec<&'a str>) -> bool {
        for node in nodes {
            if node.id() == id {
                return true;
            }
            if let Node::Folder(folder) = node {
                path.push(&folder.id);
                if Self::path_to(&folder.children, id, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    /// True if `id` is `root_id` or lies somewhere below it
    pub fn contains_in_subtree(&self, root_id: &str, id: &str) -> bool {
        self.find(root_id)
            .map(|node| node.subtree_contains(id))
            .unwrap_or(false)
    }

    /// Next unused `folder-N` id, one past the highest numbered folder id
    pub fn next_folder_id(&self) -> String {
        let ids: HashSet<&str> = self.all_ids().into_iter().collect();
        let highest = ids
            .iter()
            .filter_map(|id| id.strip_prefix(FOLDER_ID_PREFIX))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let unused = |start: u64| {
            (start..=u64::MAX)
                .map(|n| format!("{}{}", FOLDER_ID_PREFIX, n))
                .find(|candidate| !ids.contains(candidate.as_str()))
        };

        // Past u64::MAX, reuse the lowest free number instead.
        highest
            .checked_add(1)
            .and_then(&unused)
            .or_else(|| unused(1))
            .unwrap_or_else(|| format!("{}{}", FOLDER_ID_PREFIX, ids.len() + 1))
    }

    /// Every id in depth-first order
    pub fn all_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        Self::collect_ids(&self.roots, &mut ids);
        ids
    }

    fn collect_ids<'a>(nodes: &'a [Node], ids: &mut Vec<&'a str>) {
        for node in nodes {
            ids.push(node.id());
            Self::collect_ids(node.children(), ids);
        }
    }

    /// Returns the first id that occurs more than once, if any
    pub fn duplicate_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.all_ids().into_iter().find(|id| !seen.insert(*id))
    }

    /// Flattened view respecting folder expansion, with display depth
    pub fn visible_nodes_with_depth(&self) -> Vec<(&Node, usize)> {
        let mut visible = Vec::new();
        Self::collect_visible(&self.roots, 0, &mut visible);
        visible
    }

    fn collect_visible<'a>(nodes: &'a [Node], depth: usize, visible: &mut Vec<(&'a Node, usize)>) {
        for node in nodes {
            visible.push((node, depth));
            if let Node::Folder(folder) = node {
                if folder.is_expanded {
                    Self::collect_visible(&folder.children, depth + 1, visible);
                }
            }
        }
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        Self::collect_stats(&self.roots, 0, &mut stats);
        stats
    }

    fn collect_stats(nodes: &[Node], depth: usize, stats: &mut TreeStats) {
        for node in nodes {
            stats.total_nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            match node {
                Node::Folder(folder) => {
                    stats.folders += 1;
                    if folder.is_expanded {
                        stats.expanded_folders += 1;
                    }
                    Self::collect_stats(&folder.children, depth + 1, stats);
                }
                Node::Document(_) => stats.documents += 1,
            }
        }
    }
}

/// Statistics about the document tree
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub folders: usize,
    pub documents: usize,
    pub expanded_folders: usize,
    pub max_depth: usize,
}
