// Testable bodies of the non-interactive subcommands

use std::fs;
use std::path::Path;

use crate::command::Command;
use crate::config::Config;
use crate::error::{DocTreeError, Result};
use crate::executor::Executor;
use crate::screenshot;
use crate::snapshot::Snapshot;
use crate::test_runner::{TestResult, TestRunner};

/// Snapshot at `state_path`, or the sample documents
pub fn load_snapshot(state_path: Option<&str>) -> Result<Snapshot> {
    match state_path {
        Some(path) => Snapshot::load_from_file(path),
        None => Ok(Snapshot::default()),
    }
}

pub fn execute_command(
    state_path: &str,
    command_str: &str,
    output_path: Option<&str>,
    generate_screenshot: bool,
    width: u16,
    height: u16,
) -> Result<()> {
    let snapshot = Snapshot::load_from_file(state_path)?;
    let command = Command::from_string(command_str).map_err(DocTreeError::Generic)?;

    let result = Executor::execute(&snapshot, command);
    let result_json = serde_json::to_string_pretty(&result.snapshot)?;

    match output_path {
        Some(path) => {
            fs::write(path, &result_json)?;
            println!("Result saved to: {}", path);
        }
        None => println!("{}", result_json),
    }

    if !result.changed {
        eprintln!("Command changed nothing");
    }
    if let Some(status) = &result.status_message {
        eprintln!("Status: {}", status);
    }
    if result.should_quit {
        eprintln!("Command resulted in quit");
    }

    if generate_screenshot {
        let screenshot_path = output_path
            .map(|p| format!("{}.screenshot.txt", p.trim_end_matches(".json")))
            .unwrap_or_else(|| "command_result_screenshot.txt".to_string());

        let app = result.snapshot.into_app(Config::load());
        fs::write(&screenshot_path, screenshot::render_to_string(&app, width, height)?)?;
        eprintln!("Screenshot saved to: {}", screenshot_path);
    }

    Ok(())
}

pub fn save_state(output_path: Option<&str>) -> Result<()> {
    let snapshot = Snapshot::default();

    match output_path {
        Some(path) => {
            snapshot.save_to_file(path)?;
            println!("State saved to: {}", path);
        }
        None => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }

    Ok(())
}

pub fn run_script(script_path: &str, state_path: Option<&str>, overwrite: bool) -> Result<TestResult> {
    log::info!("Script: {}", script_path);
    if let Some(state) = state_path {
        log::info!("State: {}", state);
    }

    let mut app = load_snapshot(state_path)?.into_app(Config::load());
    let mut runner = TestRunner::from_file(Path::new(script_path))?;
    runner.overwrite_mode = overwrite;

    Ok(runner.run(&mut app))
}
