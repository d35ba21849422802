use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app::App;
use crate::command::Command;
use crate::error::{DocTreeError, Result};
use crate::event::handle_event;
use crate::screenshot::render_to_string;

/// Scripted, headless test of the panel
///
/// One step per line:
/// - `key:<keyname>` - Send a key event (e.g. `key:down`, `key:enter`, `key:m`)
/// - `char:<c>` - Send a character (e.g. `char:a`, `char: `)
/// - `cmd:<command>` - Apply a command directly (e.g. `cmd:drag_over:folder-2`)
/// - `assert:<property>:<value>` - Assert application state
/// - `screenshot:<file>` - Compare (or with overwrite, write) a rendered screenshot
/// - `# comment` - Ignored
///
/// Examples:
/// ```text
/// # Rename the first document
/// key:down
/// key:r
/// cmd:rename_change:Leads
/// key:enter
/// assert:name:doc-1:Leads
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Key(KeyCode),
    Char(char),
    Command(Command),
    Assert(String),
    Screenshot(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCommand {
    pub line: usize,
    pub step: Step,
}

#[derive(Debug, Clone)]
pub struct TestRunner {
    pub commands: Vec<TestCommand>,
    pub overwrite_mode: bool,
    pub screenshot_base_dir: Option<PathBuf>,
    pub screenshot_size: (u16, u16),
}

impl Default for TestRunner {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            overwrite_mode: false,
            screenshot_base_dir: None,
            screenshot_size: (80, 24),
        }
    }
}

impl TestRunner {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut runner = Self::from_string(&content)?;
        runner.screenshot_base_dir = path.parent().map(Path::to_path_buf);
        Ok(runner)
    }

    pub fn from_string(content: &str) -> Result<Self> {
        let mut commands = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_num = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let script_error = |message: String| DocTreeError::Script {
                line: line_num,
                message,
            };

            let step = if let Some(key) = trimmed.strip_prefix("key:") {
                Step::Key(parse_key(key).ok_or_else(|| script_error(format!("Unknown key: {}", key)))?)
            } else if let Some(value) = line.trim_start().strip_prefix("char:") {
                // Untrimmed on the right so `char: ` can send a space
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Step::Char(c),
                    _ => return Err(script_error(format!("Expected one character: {:?}", value))),
                }
            } else if let Some(command) = trimmed.strip_prefix("cmd:") {
                Step::Command(Command::from_string(command).map_err(script_error)?)
            } else if let Some(assertion) = trimmed.strip_prefix("assert:") {
                Step::Assert(assertion.to_string())
            } else if let Some(file) = trimmed.strip_prefix("screenshot:") {
                Step::Screenshot(file.to_string())
            } else {
                return Err(script_error(format!("Invalid command: {}", trimmed)));
            };

            commands.push(TestCommand { line: line_num, step });
        }

        Ok(TestRunner {
            commands,
            ..Self::default()
        })
    }

    pub fn run(&self, app: &mut App) -> TestResult {
        let start_time = Instant::now();
        let mut events_processed = 0;
        let mut assertions_passed = 0;
        let mut assertions_failed = 0;
        let mut errors = Vec::new();

        log::info!("Starting test run with {} commands", self.commands.len());

        for command in &self.commands {
            log::debug!("Line {}: {:?}", command.line, command.step);

            match &command.step {
                Step::Key(code) => {
                    handle_event(Event::Key(KeyEvent::new(*code, KeyModifiers::NONE)), app);
                    events_processed += 1;
                }
                Step::Char(c) => {
                    handle_event(Event::Key(KeyEvent::new(KeyCode::Char(*c), KeyModifiers::NONE)), app);
                    events_processed += 1;
                }
                Step::Command(cmd) => {
                    app.apply(cmd.clone());
                    events_processed += 1;
                }
                Step::Assert(assertion) => match evaluate_assertion(app, assertion) {
                    Ok(true) => {
                        assertions_passed += 1;
                        log::debug!("Assertion passed: {}", assertion);
                    }
                    Ok(false) => {
                        assertions_failed += 1;
                        errors.push(format!(
                            "line {}: assertion failed: {} ({})",
                            command.line,
                            assertion,
                            describe_actual(app, assertion)
                        ));
                    }
                    Err(e) => {
                        assertions_failed += 1;
                        errors.push(format!("line {}: assertion error: {}", command.line, e));
                    }
                },
                Step::Screenshot(file) => {
                    if let Err(e) = self.take_screenshot(app, file) {
                        errors.push(format!("line {}: screenshot failed: {}", command.line, e));
                    }
                }
            }
        }

        let duration = start_time.elapsed();
        log::info!("Test run completed in {:?}", duration);

        let success = assertions_failed == 0 && errors.is_empty();
        TestResult {
            duration,
            events_processed,
            assertions_passed,
            assertions_failed,
            errors,
            success,
        }
    }

    fn take_screenshot(&self, app: &App, filename: &str) -> Result<()> {
        let (width, height) = self.screenshot_size;
        let content = render_to_string(app, width, height)?;

        let final_path = match &self.screenshot_base_dir {
            Some(base_dir) => base_dir.join(filename),
            None => PathBuf::from(filename),
        };

        if self.overwrite_mode {
            std::fs::write(&final_path, content)?;
            println!("Screenshot saved to: {}", final_path.display());
            return Ok(());
        }

        match std::fs::read_to_string(&final_path) {
            Ok(existing) if existing == content => Ok(()),
            Ok(_) => Err(DocTreeError::Generic(format!(
                "{} differs from the rendered panel; use --overwrite to update",
                final_path.display()
            ))),
            Err(_) => Err(DocTreeError::Generic(format!(
                "{} does not exist; use --overwrite to create",
                final_path.display()
            ))),
        }
    }
}

fn parse_key(name: &str) -> Option<KeyCode> {
    let code = match name.to_lowercase().as_str() {
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        _ => {
            // Single characters keep their case so `key:M` differs from `key:m`
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

fn parse_bool(property: &str, value: &str) -> std::result::Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("{} expects a boolean value", property))
}

fn parse_count(property: &str, value: &str) -> std::result::Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("{} expects a numeric value", property))
}

fn matches_optional(actual: Option<&str>, expected: &str) -> bool {
    match actual {
        Some(actual) => actual == expected,
        None => expected == "none" || expected.is_empty(),
    }
}

/// Split `id:value`, for properties that name a node
fn node_argument(property: &str, rest: &str) -> std::result::Result<(String, String), String> {
    rest.split_once(':')
        .map(|(id, value)| (id.to_string(), value.to_string()))
        .ok_or_else(|| format!("{} expects '<id>:<value>'", property))
}

pub fn evaluate_assertion(app: &App, assertion: &str) -> std::result::Result<bool, String> {
    let (property, expected) = assertion
        .split_once(':')
        .ok_or("Assertion must be in format 'property:value'")?;
    let tree = app.tree();

    match property {
        "selected" => Ok(matches_optional(app.selection.as_deref(), expected)),
        "editing" => Ok(matches_optional(app.controller.editing_id(), expected)),
        "draft" => Ok(app.controller.draft() == Some(expected)),
        "dragging" => Ok(matches_optional(
            app.controller.drag().map(|drag| drag.node_id.as_str()),
            expected,
        )),
        "can_drop" => Ok(app.controller.hover_can_drop() == parse_bool(property, expected)?),
        "move_menu" => Ok(matches_optional(app.move_menu.as_deref(), expected)),
        "should_quit" => Ok(app.should_quit == parse_bool(property, expected)?),
        "status_contains" => Ok(app.status_message.contains(expected)),
        "exists" => Ok(tree.find(expected).is_some()),
        "missing" => Ok(tree.find(expected).is_none()),
        "visible_count" => Ok(app.visible_ids().len() == parse_count(property, expected)?),
        "node_count" => Ok(tree.stats().total_nodes == parse_count(property, expected)?),
        "name" => {
            let (id, name) = node_argument(property, expected)?;
            Ok(tree.find(&id).map(|node| node.name()) == Some(name.as_str()))
        }
        "parent" => {
            let (id, parent) = node_argument(property, expected)?;
            if tree.find(&id).is_none() {
                return Ok(false);
            }
            let actual = tree.ancestors_of(&id).first().copied().unwrap_or("root");
            Ok(actual == parent)
        }
        "child_count" => {
            let (id, count) = node_argument(property, expected)?;
            let count = parse_count(property, &count)?;
            let actual = if id == "root" {
                Some(tree.roots.len())
            } else {
                tree.find(&id).map(|node| node.children().len())
            };
            Ok(actual == Some(count))
        }
        "expanded" => {
            let (id, value) = node_argument(property, expected)?;
            let expected = parse_bool(property, &value)?;
            Ok(tree.find_folder(&id).map(|folder| folder.is_expanded) == Some(expected))
        }
        _ => Err(format!("Unknown assertion property: {}", property)),
    }
}

fn describe_actual(app: &App, assertion: &str) -> String {
    let property = assertion.split(':').next().unwrap_or_default();
    match property {
        "selected" => format!("selected is {:?}", app.selection),
        "editing" | "draft" => format!("edit state is {:?}", app.controller.edit_state()),
        "dragging" | "can_drop" => format!(
            "drag is {:?}",
            app.controller.drag().map(|drag| (&drag.node_id, &drag.hover))
        ),
        "status_contains" => format!("status is {:?}", app.status_message),
        _ => format!("tree has {} nodes", app.tree().stats().total_nodes),
    }
}

#[derive(Debug, Clone)]
pub struct TestResult {
    pub duration: Duration,
    pub events_processed: usize,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    pub errors: Vec<String>,
    pub success: bool,
}

impl TestResult {
    pub fn print_summary(&self) {
        println!("Test Results:");
        println!("   Duration: {:?}", self.duration);
        println!("   Events processed: {}", self.events_processed);
        println!("   Assertions passed: {}", self.assertions_passed);
        println!("   Assertions failed: {}", self.assertions_failed);

        if !self.errors.is_empty() {
            println!("   Errors:");
            for error in &self.errors {
                println!("     - {}", error);
            }
        }

        if self.success {
            println!("   Status: PASSED");
        } else {
            println!("   Status: FAILED");
        }
    }
}
