use crate::{command::Command, config::Config, snapshot::Snapshot};

/// Result of executing a command
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub snapshot: Snapshot,
    pub changed: bool,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

/// Executes commands against snapshots without touching a terminal
pub struct Executor;

impl Executor {
    /// Execute a command against a snapshot and return the resulting state.
    ///
    /// Key bindings and layout come from `DOC_TREE_CONFIG` like the other subcommands.
    pub fn execute(snapshot: &Snapshot, command: Command) -> ExecutionResult {
        Self::execute_with_config(snapshot, command, Config::load())
    }

    pub fn execute_with_config(
        snapshot: &Snapshot,
        command: Command,
        config: Config,
    ) -> ExecutionResult {
        let mut app = snapshot.clone().into_app(config);
        let status_before = app.status_message.clone();

        let changed = app.apply(command);

        let status_message = if app.status_message != status_before {
            Some(app.status_message.clone())
        } else {
            None
        };

        ExecutionResult {
            snapshot: Snapshot::from_app(&app),
            changed,
            status_message,
            should_quit: app.should_quit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{EditState, Intent};

    #[test]
    fn test_quit_command() {
        let result = Executor::execute(&Snapshot::default(), Command::Quit);
        assert!(result.should_quit);
        assert_eq!(result.status_message.as_deref(), Some("Goodbye!"));
    }

    #[test]
    fn test_input_snapshot_untouched() {
        let snapshot = Snapshot::default();
        let result = Executor::execute(&snapshot, Intent::Delete("folder-1".into()).into());
        assert!(result.changed);
        assert!(result.snapshot.tree.find("folder-1").is_none());
        assert!(snapshot.tree.find("folder-1").is_some());
    }

    #[test]
    fn test_rejected_move_reports_nothing() {
        let result = Executor::execute(
            &Snapshot::default(),
            Intent::MoveTo { node: "folder-1".into(), destination: Some("doc-1".into()) }.into(),
        );
        assert!(!result.changed);
        assert!(result.status_message.is_none());
        assert_eq!(result.snapshot.tree, Snapshot::default().tree);
    }

    #[test]
    fn test_execute_with_config_keeps_open_menu() {
        let mut config = Config::default();
        config.layout.move_menu_limit = 1;
        let mut snapshot = Snapshot::default();
        snapshot.selection = Some("doc-4".into());
        snapshot.move_menu = Some("doc-4".into());

        let app = Executor::execute_with_config(&snapshot, Command::SelectDown, config.clone())
            .snapshot
            .into_app(config);
        assert_eq!(app.move_menu.as_deref(), Some("doc-4"));
        assert_eq!(app.move_menu_entries().len(), 1);
        assert_eq!(app.selection.as_deref(), Some("doc-5"));
    }

    #[test]
    fn test_sequence_command() {
        let sequence = Command::from_string(
            "sequence:[create_folder:root,rename_change:Archive,rename_commit]",
        )
        .unwrap();
        let result = Executor::execute(&Snapshot::default(), sequence);
        let folder = result.snapshot.tree.find_folder("folder-3").unwrap();
        assert_eq!(folder.name, "Archive");
        assert_eq!(result.snapshot.edit, EditState::Idle);
        assert_eq!(result.snapshot.selection.as_deref(), Some("folder-3"));
    }
}
