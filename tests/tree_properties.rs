use doc_tree::error::TreeError;
use doc_tree::seed::initial_tree;
use doc_tree::tree::{Node, Tree};
use maplit::hashset;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Create(Option<usize>),
    Rename(usize, String),
    Delete(usize),
    Move(usize, Option<usize>),
    Toggle(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::option::of(0usize..32).prop_map(Op::Create),
        (0usize..32, "[ a-zA-Z]{0,8}").prop_map(|(i, name)| Op::Rename(i, name)),
        (0usize..32).prop_map(Op::Delete),
        (0usize..32, proptest::option::of(0usize..32)).prop_map(|(i, d)| Op::Move(i, d)),
        (0usize..32).prop_map(Op::Toggle),
    ]
}

fn pick(tree: &Tree, index: usize) -> Option<String> {
    let ids = tree.all_ids();
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()].to_string())
    }
}

fn subtree_ids(node: &Node) -> HashSet<String> {
    let mut ids = hashset! { node.id().to_string() };
    for child in node.children() {
        ids.extend(subtree_ids(child));
    }
    ids
}

fn id_set(tree: &Tree) -> HashSet<String> {
    tree.all_ids().into_iter().map(str::to_string).collect()
}

fn assert_well_formed(tree: &Tree) {
    assert_eq!(tree.duplicate_id(), None, "ids must stay unique");
    for id in tree.all_ids() {
        assert!(
            !tree.ancestors_of(id).contains(&id),
            "{} is its own ancestor",
            id
        );
    }
}

/// Applies one operation, checking its postconditions, and returns the next tree
fn step(tree: Tree, op: &Op) -> Tree {
    match op {
        Op::Create(parent) => {
            let parent = parent.and_then(|i| pick(&tree, i));
            match tree.create_folder(parent.as_deref(), "") {
                Ok((next, id)) => {
                    assert!(!tree.all_ids().contains(&id.as_str()));
                    let mut expected = id_set(&tree);
                    expected.insert(id.clone());
                    assert_eq!(id_set(&next), expected);
                    assert_eq!(next.ancestors_of(&id).first().copied(), parent.as_deref());
                    next
                }
                Err(e) => {
                    // Only a document can be refused as a parent
                    assert!(matches!(e, TreeError::NotFound(_)));
                    tree
                }
            }
        }
        Op::Rename(i, name) => {
            let Some(id) = pick(&tree, *i) else { return tree };
            match tree.rename(&id, name) {
                Ok(next) => {
                    assert_eq!(next.find(&id).unwrap().name(), name.trim());
                    assert_eq!(id_set(&next), id_set(&tree));
                    next
                }
                Err(e) => {
                    assert_eq!(e, TreeError::EmptyName);
                    assert!(name.trim().is_empty());
                    tree
                }
            }
        }
        Op::Delete(i) => {
            let Some(id) = pick(&tree, *i) else { return tree };
            let removed = subtree_ids(tree.find(&id).unwrap());
            let next = tree.delete(&id).unwrap();
            let expected: HashSet<String> = id_set(&tree).difference(&removed).cloned().collect();
            assert_eq!(id_set(&next), expected);
            next
        }
        Op::Move(i, dest) => {
            let Some(id) = pick(&tree, *i) else { return tree };
            let dest = dest.and_then(|d| pick(&tree, d));
            let carried = subtree_ids(tree.find(&id).unwrap());
            match tree.move_node(&id, dest.as_deref()) {
                Ok(next) => {
                    assert_eq!(id_set(&next), id_set(&tree));
                    assert_eq!(subtree_ids(next.find(&id).unwrap()), carried);
                    // Names, expansion and child order travel unchanged
                    assert_eq!(next.find(&id), tree.find(&id));
                    assert_eq!(next.ancestors_of(&id).first().copied(), dest.as_deref());
                    next
                }
                Err(TreeError::IllegalMove { .. }) => {
                    let dest = dest.unwrap();
                    assert!(!tree.find(&dest).unwrap().is_folder() || carried.contains(&dest));
                    tree
                }
                Err(e) => panic!("unexpected error {:?}", e),
            }
        }
        Op::Toggle(i) => {
            let Some(id) = pick(&tree, *i) else { return tree };
            match tree.toggle_expanded(&id) {
                Ok(next) => {
                    let before = tree.find_folder(&id).unwrap().is_expanded;
                    assert_eq!(next.find_folder(&id).unwrap().is_expanded, !before);
                    next
                }
                Err(_) => {
                    assert!(!tree.find(&id).unwrap().is_folder());
                    tree
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_random_operations_keep_tree_well_formed(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut tree = initial_tree();
        for op in &ops {
            tree = step(tree, op);
            assert_well_formed(&tree);
        }
    }

    #[test]
    fn prop_move_agrees_with_legality_check(
        ops in prop::collection::vec(op_strategy(), 0..20),
        i in 0usize..32,
        d in proptest::option::of(0usize..32),
    ) {
        let tree = ops.iter().fold(initial_tree(), step);
        let Some(id) = pick(&tree, i) else { return Ok(()) };
        let dest = d.and_then(|d| pick(&tree, d));

        let checked = tree.check_move(&id, dest.as_deref());
        let moved = tree.move_node(&id, dest.as_deref());
        prop_assert_eq!(tree.can_move(&id, dest.as_deref()), moved.is_ok());
        match (checked, moved) {
            (Ok(()), Ok(next)) => prop_assert_eq!(next.find(&id), tree.find(&id)),
            (Err(expected), Err(actual)) => prop_assert_eq!(expected, actual),
            (checked, moved) => prop_assert!(false, "check {:?} disagrees with move {:?}", checked, moved),
        }
    }

    #[test]
    fn prop_fresh_root_folder_round_trips(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let tree = ops.iter().fold(initial_tree(), step);
        let (with_folder, id) = tree.create_folder(None, "").unwrap();
        prop_assert_eq!(with_folder.move_node(&id, None).unwrap(), with_folder);
    }
}

#[test]
fn test_delete_folder_removes_whole_subtree() {
    let tree = initial_tree();
    let next = tree.delete("folder-1").unwrap();
    assert_eq!(
        id_set(&next),
        hashset! {
            "folder-2".to_string(),
            "doc-3".to_string(),
            "doc-4".to_string(),
            "doc-5".to_string(),
        }
    );
}

#[test]
fn test_moving_fresh_root_folder_to_root_changes_nothing() {
    let (tree, id) = initial_tree().create_folder(None, "Inbox").unwrap();
    assert_eq!(tree.move_node(&id, None).unwrap(), tree);
}
