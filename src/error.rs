use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocTreeError>;

/// Reasons a tree operation left the tree unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NotFound(String),

    #[error("Cannot move {node} into {destination}: {reason}")]
    IllegalMove {
        node: String,
        destination: String,
        reason: MoveRejection,
    },

    #[error("Name must not be blank")]
    EmptyName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// Dropped onto itself
    OntoSelf,
    /// Destination is a document, not a folder
    NotAFolder,
    /// Destination lies inside the moved node's subtree
    IntoDescendant,
}

impl std::fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveRejection::OntoSelf => write!(f, "drop onto itself"),
            MoveRejection::NotAFolder => write!(f, "destination is not a folder"),
            MoveRejection::IntoDescendant => write!(f, "destination is inside the moved folder"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DocTreeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("Error: {0}")]
    Generic(String),
}

impl From<String> for DocTreeError {
    fn from(error: String) -> Self {
        DocTreeError::Generic(error)
    }
}

impl From<&str> for DocTreeError {
    fn from(error: &str) -> Self {
        DocTreeError::Generic(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_message() {
        let err = TreeError::IllegalMove {
            node: "folder-1".to_string(),
            destination: "folder-3".to_string(),
            reason: MoveRejection::IntoDescendant,
        };
        assert_eq!(
            err.to_string(),
            "Cannot move folder-1 into folder-3: destination is inside the moved folder"
        );
    }

    #[test]
    fn test_tree_error_converts() {
        let err: DocTreeError = TreeError::EmptyName.into();
        assert!(matches!(err, DocTreeError::Tree(TreeError::EmptyName)));
        assert_eq!(err.to_string(), "Tree error: Name must not be blank");
    }
}
