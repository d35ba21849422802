use doc_tree::app::App;
use doc_tree::config::Config;
use doc_tree::seed::initial_tree;
use doc_tree::test_runner::{TestResult, TestRunner};
use std::path::Path;

fn run_script(script: &str) -> TestResult {
    let runner = TestRunner::from_string(script).expect("script should parse");
    let mut app = App::new(initial_tree(), Config::default());
    runner.run(&mut app)
}

fn assert_passes(result: &TestResult) {
    if !result.success {
        result.print_summary();
        panic!("script failed: {:?}", result.errors);
    }
}

#[test]
fn test_script_drag_into_folder() {
    let path = Path::new("tests/scripts/drag_into_folder/script");
    let runner = TestRunner::from_file(path).expect("script should load");
    let mut app = App::new(initial_tree(), Config::default());
    let result = runner.run(&mut app);
    assert_passes(&result);
    assert_eq!(result.assertions_passed, 13);
}

#[test]
fn test_script_create_and_name_folder() {
    let result = run_script(
        r#"
# New folder inside the folder of the selected document
key:down
key:n
assert:editing:folder-3
assert:selected:folder-3
assert:parent:folder-3:folder-1
assert:draft:New Folder
key:backspace
key:backspace
key:backspace
key:backspace
key:backspace
key:backspace
key:backspace
key:backspace
key:backspace
key:backspace
char:Q
char:3
key:space
char:L
char:e
char:a
char:d
char:s
assert:draft:Q3 Leads
key:enter
assert:editing:none
assert:name:folder-3:Q3 Leads
assert:child_count:folder-1:3
"#,
    );
    assert_passes(&result);
}

#[test]
fn test_script_blank_rename_keeps_name() {
    let result = run_script(
        r#"
cmd:rename_start:doc-2
cmd:rename_change:
key:enter
assert:editing:none
assert:name:doc-2:User Analytics
"#,
    );
    assert_passes(&result);
}

#[test]
fn test_script_move_menu_to_root_and_back() {
    let result = run_script(
        r#"
key:down
key:M
assert:move_menu:doc-1
key:0
assert:move_menu:none
assert:parent:doc-1:root
cmd:select:doc-1
key:M
key:2
assert:parent:doc-1:folder-2
"#,
    );
    assert_passes(&result);
}

#[test]
fn test_script_folder_cannot_enter_itself() {
    let result = run_script(
        r#"
cmd:create_folder:folder-1
key:esc
cmd:drag_start:folder-1
cmd:drag_over:folder-3
assert:can_drop:false
cmd:drop:folder-3
assert:dragging:none
assert:parent:folder-3:folder-1
assert:child_count:root:4
"#,
    );
    assert_passes(&result);
}

#[test]
fn test_script_delete_and_quit() {
    let result = run_script(
        r#"
key:d
assert:missing:folder-1
assert:missing:doc-1
assert:node_count:4
assert:selected:folder-2
key:q
assert:should_quit:true
"#,
    );
    assert_passes(&result);
}

#[test]
fn test_script_failure_is_reported() {
    let result = run_script("assert:selected:doc-5\n");
    assert!(!result.success);
    assert_eq!(result.assertions_failed, 1);
}
