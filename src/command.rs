use serde::{Deserialize, Serialize};

use crate::controller::Intent;

const ROOT_TARGET: &str = "root";

/// Represents all commands that can be executed against the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// A gesture forwarded to the interaction controller
    Intent(Intent),

    // Cursor commands, owned by the host view
    SelectUp,
    SelectDown,
    Select(String),

    Quit,

    // Multi-step commands for testing
    Sequence(Vec<Command>),
}

impl From<Intent> for Command {
    fn from(intent: Intent) -> Self {
        Command::Intent(intent)
    }
}

fn parse_target(arg: &str) -> Option<String> {
    if arg.is_empty() || arg.eq_ignore_ascii_case(ROOT_TARGET) {
        None
    } else {
        Some(arg.to_string())
    }
}

fn format_target(target: &Option<String>) -> &str {
    target.as_deref().unwrap_or(ROOT_TARGET)
}

fn required<'a>(name: &str, arg: Option<&'a str>) -> Result<&'a str, String> {
    match arg {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("Command '{}' needs an argument", name)),
    }
}

impl Command {
    /// Parse a command from a string representation
    pub fn from_string(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if let Some(inner) = s.strip_prefix("sequence:[").and_then(|rest| rest.strip_suffix(']')) {
            if inner.trim().is_empty() {
                return Ok(Command::Sequence(vec![]));
            }
            let mut commands = Vec::new();
            for cmd_str in inner.split(',') {
                let cmd_str = cmd_str.trim();
                match Command::from_string(cmd_str) {
                    Ok(cmd) => commands.push(cmd),
                    Err(e) => {
                        return Err(format!("Invalid command in sequence '{}': {}", cmd_str, e))
                    }
                }
            }
            return Ok(Command::Sequence(commands));
        }

        let (head, arg) = match s.split_once(':') {
            Some((head, arg)) => (head, Some(arg)),
            None => (s, None),
        };

        let command = match head.to_lowercase().as_str() {
            "select_up" | "up" => Command::SelectUp,
            "select_down" | "down" => Command::SelectDown,
            "select" => Command::Select(required(head, arg)?.to_string()),
            "quit" | "q" => Command::Quit,

            "drag_start" => Intent::DragStart(required(head, arg)?.to_string()).into(),
            "drag_over" => Intent::DragOver(parse_target(arg.unwrap_or(""))).into(),
            "drop" => Intent::Drop(parse_target(arg.unwrap_or(""))).into(),
            "drag_cancel" => Intent::DragCancel.into(),
            "rename_start" => Intent::RenameStart(required(head, arg)?.to_string()).into(),
            "rename_change" => Intent::RenameChange(arg.unwrap_or("").to_string()).into(),
            "rename_commit" => Intent::RenameCommit.into(),
            "rename_cancel" => Intent::RenameCancel.into(),
            "create_folder" => Intent::CreateFolder(parse_target(arg.unwrap_or(""))).into(),
            "delete" => Intent::Delete(required(head, arg)?.to_string()).into(),
            "toggle" | "toggle_expand" => Intent::ToggleExpand(required(head, arg)?.to_string()).into(),
            "move_to" => {
                let arg = required(head, arg)?;
                let (node, destination) = arg
                    .split_once(':')
                    .ok_or_else(|| format!("move_to expects <node>:<folder|root>, got '{}'", arg))?;
                Intent::MoveTo {
                    node: node.to_string(),
                    destination: parse_target(destination),
                }
                .into()
            }
            _ => return Err(format!("Unknown command: {}", s)),
        };

        Ok(command)
    }

    /// Convert command to string representation
    pub fn to_string(&self) -> String {
        match self {
            Command::SelectUp => "select_up".to_string(),
            Command::SelectDown => "select_down".to_string(),
            Command::Select(id) => format!("select:{}", id),
            Command::Quit => "quit".to_string(),

            Command::Intent(intent) => match intent {
                Intent::DragStart(id) => format!("drag_start:{}", id),
                Intent::DragOver(target) => format!("drag_over:{}", format_target(target)),
                Intent::Drop(target) => format!("drop:{}", format_target(target)),
                Intent::DragCancel => "drag_cancel".to_string(),
                Intent::RenameStart(id) => format!("rename_start:{}", id),
                Intent::RenameChange(draft) => format!("rename_change:{}", draft),
                Intent::RenameCommit => "rename_commit".to_string(),
                Intent::RenameCancel => "rename_cancel".to_string(),
                Intent::CreateFolder(parent) => format!("create_folder:{}", format_target(parent)),
                Intent::Delete(id) => format!("delete:{}", id),
                Intent::ToggleExpand(id) => format!("toggle:{}", id),
                Intent::MoveTo { node, destination } => {
                    format!("move_to:{}:{}", node, format_target(destination))
                }
            },

            Command::Sequence(commands) => {
                format!(
                    "sequence:[{}]",
                    commands
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::from_string("up").unwrap(), Command::SelectUp);
        assert_eq!(
            Command::from_string("drag_over:root").unwrap(),
            Command::Intent(Intent::DragOver(None))
        );
        assert_eq!(
            Command::from_string("drop:folder-1").unwrap(),
            Command::Intent(Intent::Drop(Some("folder-1".to_string())))
        );
        assert_eq!(
            Command::from_string("create_folder").unwrap(),
            Command::Intent(Intent::CreateFolder(None))
        );
        assert_eq!(
            Command::from_string("move_to:doc-1:folder-2").unwrap(),
            Command::Intent(Intent::MoveTo {
                node: "doc-1".to_string(),
                destination: Some("folder-2".to_string()),
            })
        );
        assert_eq!(
            Command::from_string("rename_change:Q3: Plans").unwrap(),
            Command::Intent(Intent::RenameChange("Q3: Plans".to_string()))
        );

        assert!(Command::from_string("invalid").is_err());
        assert!(Command::from_string("").is_err());
        assert!(Command::from_string("delete").is_err());
        assert!(Command::from_string("move_to:doc-1").is_err());
    }

    #[test]
    fn test_sequence_parsing() {
        let parsed = Command::from_string("sequence:[drag_start:doc-4, drop:root]").unwrap();
        assert_eq!(
            parsed,
            Command::Sequence(vec![
                Intent::DragStart("doc-4".to_string()).into(),
                Intent::Drop(None).into(),
            ])
        );
        assert!(Command::from_string("sequence:[up,bogus]").is_err());
    }

    #[test]
    fn test_command_to_string() {
        assert_eq!(Command::SelectDown.to_string(), "select_down");
        assert_eq!(
            Command::Intent(Intent::MoveTo { node: "doc-2".into(), destination: None }).to_string(),
            "move_to:doc-2:root"
        );
        assert_eq!(Command::Intent(Intent::ToggleExpand("folder-1".into())).to_string(), "toggle:folder-1");
    }
}
