use crate::tree::{DocumentNode, FolderNode, Tree};

/// The tree the panel starts with
pub fn initial_tree() -> Tree {
    let crm = FolderNode::new("folder-1", "CRM Documents")
        .expanded()
        .with_child(DocumentNode::new("doc-1", "CRM Matrix", "Database Schema", "2.4 MB").into())
        .with_child(DocumentNode::new("doc-2", "User Analytics", "Analytics", "1.2 MB").into());

    let architecture = FolderNode::new("folder-2", "Architecture")
        .with_child(DocumentNode::new("doc-3", "Tech Blueprint", "Architecture", "1.8 MB").into());

    Tree::from_roots(vec![
        crm.into(),
        architecture.into(),
        DocumentNode::new("doc-4", "Mission Plan", "Strategy Doc", "3.2 MB").into(),
        DocumentNode::new("doc-5", "Spec Codex", "Requirements", "1.1 MB").into(),
    ])
}
