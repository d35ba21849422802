use doc_tree::{
    app::App,
    command::Command,
    config::Config,
    controller::Intent,
    screenshot::render_to_string,
    seed::initial_tree,
    snapshot::Snapshot,
    tree::Tree,
};

const WIDTH: u16 = 80;
const HEIGHT: u16 = 24;

fn app() -> App {
    App::new(initial_tree(), Config::default())
}

fn render(app: &App) -> String {
    render_to_string(app, WIDTH, HEIGHT).expect("render")
}

/// Panics with the full screen when `needle` is missing
fn assert_shows(screen: &str, needle: &str) {
    assert!(
        screen.contains(needle),
        "expected {:?} on screen:\n{}",
        needle,
        screen
    );
}

fn line_containing<'a>(screen: &'a str, needle: &str) -> &'a str {
    screen
        .lines()
        .find(|line| line.contains(needle))
        .unwrap_or_else(|| panic!("no line contains {:?}:\n{}", needle, screen))
}

#[test]
fn test_rendering_initial_panel() {
    let screen = render(&app());

    assert_shows(&screen, "Documents (2 folders, 5 documents)");
    assert_shows(&screen, "▼ CRM Documents");
    assert_shows(&screen, "▶ Architecture");
    assert_shows(&screen, "CRM Matrix  Database Schema · 2.4 MB");
    assert_shows(&screen, "Mission Plan  Strategy Doc · 3.2 MB");
    // Collapsed folder hides its documents
    assert!(!screen.contains("Tech Blueprint"));
    assert_shows(&screen, "Ready");
}

#[test]
fn test_rendering_indentation_follows_depth() {
    let screen = render(&app());
    let folder = line_containing(&screen, "CRM Documents");
    let document = line_containing(&screen, "CRM Matrix");
    let indent = |line: &str| line.find(|c: char| c != '│' && c != ' ').unwrap_or(0);
    assert!(indent(document) > indent(folder));
}

#[test]
fn test_rendering_hides_document_details_when_configured() {
    let mut config = Config::default();
    config.layout.show_document_details = false;
    let screen = render(&App::new(initial_tree(), config));
    assert_shows(&screen, "CRM Matrix");
    assert!(!screen.contains("Database Schema"));
}

#[test]
fn test_rendering_inline_edit() {
    let mut app = app();
    app.apply(Intent::RenameStart("doc-4".into()).into());
    app.apply(Intent::RenameChange("Roadmap".into()).into());
    let screen = render(&app);

    assert_shows(&screen, "[Roadmap_]");
    assert!(!screen.contains("Mission Plan"));
    assert_shows(&screen, "Enter: Save");
}

#[test]
fn test_rendering_drag_banner() {
    let mut app = app();
    app.apply(Command::Select("doc-5".into()));
    app.apply(Intent::DragStart("doc-5".into()).into());

    app.apply(Command::Select("folder-2".into()));
    let screen = render(&app);
    assert_shows(&screen, "Moving \"Spec Codex\": Drop here");
    assert_shows(line_containing(&screen, "Architecture"), "← drop");
    assert_shows(line_containing(&screen, "Spec Codex  Requirements"), "(moving)");

    app.apply(Command::Select("doc-4".into()));
    assert_shows(&render(&app), "Cannot drop here");

    app.apply(Intent::DragOver(None).into());
    assert_shows(&render(&app), "Drop here to move to root level");
}

#[test]
fn test_rendering_move_menu() {
    let mut app = app();
    app.apply(Command::Select("doc-4".into()));
    app.open_move_menu();
    let screen = render(&app);

    assert_shows(&screen, "Move \"Mission Plan\" to folder");
    assert_shows(&screen, "1. CRM Documents");
    assert_shows(&screen, "2. Architecture");
    assert_shows(&screen, "0. Root level");
}

#[test]
fn test_rendering_empty_tree() {
    let screen = render(&App::new(Tree::new(), Config::default()));
    assert_shows(&screen, "No documents");
}

#[test]
fn test_rendering_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut snapshot = Snapshot::default();
    snapshot.status_message = "Loaded from disk".to_string();
    snapshot.save_to_file(&path).unwrap();

    let app = Snapshot::load_from_file(&path)
        .unwrap()
        .into_app(Config::default());
    let screen = render(&app);
    assert_shows(&screen, "Loaded from disk");
    assert_eq!(screen.lines().count(), HEIGHT as usize);
}
