use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::fs;

use crate::{app::App, config::Config, error::Result, snapshot::Snapshot, ui};

/// Render an app once into an off-screen buffer and return it as text
pub fn render_to_string(app: &App, width: u16, height: u16) -> Result<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;
    terminal.draw(|frame| ui::draw(frame, app))?;
    Ok(buffer_to_string(terminal.backend().buffer()))
}

pub fn generate_screenshot(
    state_path: Option<&str>,
    output_path: Option<&str>,
    width: u16,
    height: u16,
) -> Result<()> {
    let snapshot = match state_path {
        Some(path) => Snapshot::load_from_file(path)?,
        None => Snapshot::default(),
    };
    let app = snapshot.into_app(Config::load());
    let screenshot = render_to_string(&app, width, height)?;

    match output_path {
        Some(path) => {
            fs::write(path, screenshot)?;
            println!("Screenshot saved to: {}", path);
        }
        None => print!("{}", screenshot),
    }

    Ok(())
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();

    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            let sym = buffer[(x, y)].symbol();
            if sym.is_empty() {
                result.push(' ');
            } else {
                result.push_str(sym);
            }
        }
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::initial_tree;

    #[test]
    fn test_buffer_to_string_has_one_line_per_row() {
        let app = App::new(initial_tree(), Config::default());
        let text = render_to_string(&app, 60, 12).unwrap();
        assert_eq!(text.lines().count(), 12);
        assert!(text.lines().all(|line| line.chars().count() == 60));
    }

    #[test]
    fn test_screenshot_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let out = dir.path().join("shot.txt");
        Snapshot::default().save_to_file(&state).unwrap();

        generate_screenshot(state.to_str(), out.to_str(), 80, 20).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("CRM Documents"));
        assert!(text.contains("Mission Plan"));
    }
}
