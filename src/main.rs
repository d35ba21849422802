use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};

use doc_tree::cli::{Cli, Commands};
use doc_tree::config::Config;
use doc_tree::error::{DocTreeError, Result};
use doc_tree::{event, main_lib, screenshot, ui};

const LOG_ENV_VAR: &str = "DOC_TREE_LOG";

fn main() -> Result<()> {
    // Log to a file only when DOC_TREE_LOG names one; stdout belongs to the TUI
    if let Ok(log_file) = std::env::var(LOG_ENV_VAR) {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        env_logger::Builder::new()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .filter_level(log::LevelFilter::Debug)
            .init();

        log::info!("doc-tree starting up");
    }

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run { state: None }) {
        Commands::Run { state } => run_interactive(state.as_deref()),
        Commands::Screenshot {
            state,
            output,
            width,
            height,
        } => screenshot::generate_screenshot(state.as_deref(), output.as_deref(), width, height),
        Commands::Execute {
            state,
            command,
            output,
            screenshot,
            width,
            height,
        } => main_lib::execute_command(
            &state,
            &command,
            output.as_deref(),
            screenshot,
            width,
            height,
        ),
        Commands::SaveState { output } => main_lib::save_state(output.as_deref()),
        Commands::Test {
            script,
            state,
            overwrite,
            verbose,
        } => run_headless_test(&script, state.as_deref(), overwrite, verbose),
    }
}

fn run_headless_test(
    script_path: &str,
    state_path: Option<&str>,
    overwrite: bool,
    verbose: bool,
) -> Result<()> {
    if verbose && std::env::var(LOG_ENV_VAR).is_err() {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    let result = main_lib::run_script(script_path, state_path, overwrite)?;
    result.print_summary();

    if result.success {
        log::info!("Test completed successfully");
        Ok(())
    } else {
        log::error!("Test failed");
        Err(DocTreeError::from("Test failed"))
    }
}

fn run_interactive(state_path: Option<&str>) -> Result<()> {
    let mut app = main_lib::load_snapshot(state_path)?.into_app(Config::load());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);
    let loop_result = (|| -> Result<()> {
        let mut needs_redraw = true;
        while !app.should_quit {
            if needs_redraw {
                terminal.draw(|f| ui::draw(f, &app))?;
            }
            needs_redraw = false;
            if crossterm::event::poll(tick_rate)? {
                let event = crossterm::event::read()?;
                needs_redraw = event::handle_event(event, &mut app);
            }
        }
        Ok(())
    })();

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &loop_result {
        log::error!("Interactive session ended with error: {}", e);
    }
    loop_result
}
