//! Comprehensive mutation tests

use pagesmith_editor::{Editor, EditorConfig, EditorError, EditorMode, Mutation, Node, NodeType, Props, ViewportClass};

fn editor() -> Editor {
    Editor::from_nodes(
        vec![
            Node::new("header", NodeType::Container)
                .with_child(Node::new("title", NodeType::Heading))
                .with_child(Node::new("link", NodeType::Link)),
            Node::new("row", NodeType::Grid)
                .with_child(Node::new("left", NodeType::Column))
                .with_child(Node::new("right", NodeType::Column)),
        ],
        EditorConfig::default(),
    )
    .unwrap()
}

fn props(pairs: &[(&str, &str)]) -> Props {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_add_child_into_missing_container() {
    let mut editor = editor();
    let result = editor.dispatch(Mutation::AddChild {
        container_id: "nowhere".to_string(),
        node: Node::new("x", NodeType::Text),
        index: None,
    });

    assert_eq!(result.unwrap_err(), EditorError::NotFound("nowhere".to_string()));
    assert!(!editor.can_undo());
}

#[test]
fn test_add_child_into_leaf() {
    let mut editor = editor();
    let result = editor.dispatch(Mutation::AddChild {
        container_id: "title".to_string(),
        node: Node::new("x", NodeType::Text),
        index: None,
    });

    assert!(matches!(result, Err(EditorError::InvalidTarget { id, .. }) if id == "title"));
}

#[test]
fn test_add_child_at_index() {
    let mut editor = editor();
    editor
        .dispatch(Mutation::AddChild {
            container_id: "header".to_string(),
            node: Node::new("logo", NodeType::Media),
            index: Some(0),
        })
        .unwrap();

    let ids: Vec<_> = editor
        .snapshot()
        .children_of("header")
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(ids, vec!["logo", "title", "link"]);
}

#[test]
fn test_column_cannot_nest_in_column() {
    let mut editor = editor();

    let add = editor.dispatch(Mutation::AddChild {
        container_id: "left".to_string(),
        node: Node::new("inner", NodeType::Column),
        index: None,
    });
    assert!(matches!(add, Err(EditorError::IncompatibleContainment { .. })));

    let moved = editor.dispatch(Mutation::MoveNode {
        id: "right".to_string(),
        container_id: "left".to_string(),
        index: 0,
    });
    assert!(matches!(moved, Err(EditorError::IncompatibleContainment { .. })));
}

#[test]
fn test_added_subtree_is_checked_below_its_top() {
    let mut editor = editor();
    let before = editor.snapshot().clone();

    let result = editor.dispatch(Mutation::AddChild {
        container_id: "root".to_string(),
        node: Node::new("outer", NodeType::Column).with_child(Node::new("inner", NodeType::Column)),
        index: None,
    });

    assert!(matches!(
        result,
        Err(EditorError::IncompatibleContainment { rule: "no-nested-columns", .. })
    ));
    assert_eq!(editor.snapshot(), &before);
    assert!(!editor.can_undo());
    assert!(editor.policy().audit(editor.snapshot().root()).is_empty());
}

#[test]
fn test_configured_nesting_rule() {
    let config: EditorConfig =
        serde_json::from_str(r#"{"forbiddenNesting":[{"child":"button","parent":"column"}]}"#).unwrap();
    let mut editor = Editor::from_nodes(vec![Node::new("col", NodeType::Column)], config).unwrap();

    let result = editor.dispatch(Mutation::AddChild {
        container_id: "col".to_string(),
        node: Node::new("btn", NodeType::Button),
        index: None,
    });

    assert!(matches!(
        result,
        Err(EditorError::IncompatibleContainment { rule: "forbidden-nesting", .. })
    ));
}

#[test]
fn test_update_node_writes_active_viewport_layer() {
    let mut editor = editor();
    editor
        .dispatch(Mutation::SetViewport {
            viewport: ViewportClass::Mobile,
        })
        .unwrap();
    editor
        .dispatch(Mutation::UpdateNode {
            id: "title".to_string(),
            styles: Some(props(&[("font-size", "18px")])),
            content: Some(props(&[("text", "Hi")])),
        })
        .unwrap();

    let title = editor.snapshot().find("title").unwrap();
    assert!(title.styles.base.is_empty());
    assert_eq!(title.styles.mobile["font-size"], "18px");
    assert_eq!(title.leaf_content().unwrap().mobile["text"], "Hi");
    assert!(editor.can_undo());
}

#[test]
fn test_update_missing_node() {
    let mut editor = editor();
    let result = editor.dispatch(Mutation::UpdateNode {
        id: "ghost".to_string(),
        styles: Some(Props::new()),
        content: None,
    });
    assert_eq!(result.unwrap_err(), EditorError::NotFound("ghost".to_string()));
}

#[test]
fn test_rename_node() {
    let mut editor = editor();
    editor
        .dispatch(Mutation::RenameNode {
            id: "row".to_string(),
            name: "Features".to_string(),
        })
        .unwrap();
    assert_eq!(editor.snapshot().find("row").unwrap().name, "Features");

    editor.undo().unwrap();
    assert_eq!(editor.snapshot().find("row").unwrap().name, "grid");
}

#[test]
fn test_delete_is_idempotent_in_effect() {
    let mut editor = editor();
    editor
        .dispatch(Mutation::DeleteNode {
            id: "header".to_string(),
        })
        .unwrap();
    let after_first = editor.snapshot().clone();
    let levels = editor.history().undo_levels();

    let second = editor.dispatch(Mutation::DeleteNode {
        id: "header".to_string(),
    });

    assert_eq!(second.unwrap_err(), EditorError::NotFound("header".to_string()));
    assert_eq!(editor.snapshot(), &after_first);
    assert_eq!(editor.history().undo_levels(), levels);
}

#[test]
fn test_delete_root_rejected() {
    let mut editor = editor();
    let result = editor.dispatch(Mutation::DeleteNode { id: "root".to_string() });
    assert!(matches!(result, Err(EditorError::InvalidTarget { .. })));
}

#[test]
fn test_move_root_rejected() {
    let mut editor = editor();
    let result = editor.dispatch(Mutation::MoveNode {
        id: "root".to_string(),
        container_id: "header".to_string(),
        index: 0,
    });
    assert!(matches!(result, Err(EditorError::InvalidTarget { .. })));
}

#[test]
fn test_move_into_self_is_cyclic() {
    let mut editor = editor();
    let result = editor.dispatch(Mutation::MoveNode {
        id: "header".to_string(),
        container_id: "header".to_string(),
        index: 0,
    });
    assert!(matches!(result, Err(EditorError::CyclicMove { .. })));
}

#[test]
fn test_move_index_clamped() {
    let mut editor = editor();
    editor
        .dispatch(Mutation::MoveNode {
            id: "title".to_string(),
            container_id: "left".to_string(),
            index: 42,
        })
        .unwrap();
    assert_eq!(editor.snapshot().find_parent("title").unwrap().id, "left");
}

#[test]
fn test_select_and_hover() {
    let mut editor = editor();
    editor
        .dispatch(Mutation::SelectNode {
            id: Some("link".to_string()),
        })
        .unwrap();
    editor
        .dispatch(Mutation::HoverNode {
            id: Some("title".to_string()),
        })
        .unwrap();

    assert_eq!(editor.selection(), Some("link"));
    assert_eq!(editor.hover(), Some("title"));
    assert!(!editor.can_undo());

    let unknown = editor.dispatch(Mutation::HoverNode {
        id: Some("ghost".to_string()),
    });
    assert_eq!(unknown.unwrap_err(), EditorError::NotFound("ghost".to_string()));
    assert_eq!(editor.hover(), Some("title"));
}

#[test]
fn test_preview_mode_hides_selection() {
    let mut editor = editor();
    editor
        .dispatch(Mutation::SelectNode {
            id: Some("link".to_string()),
        })
        .unwrap();
    editor
        .dispatch(Mutation::SetMode {
            mode: EditorMode::Preview,
        })
        .unwrap();
    assert_eq!(editor.selection(), None);

    let result = editor
        .dispatch(Mutation::SelectNode {
            id: Some("link".to_string()),
        })
        .unwrap();
    assert!(!result.committed);
    assert_eq!(editor.selection(), None);
}

#[test]
fn test_load_rejects_duplicate_ids() {
    let mut editor = editor();
    let before = editor.snapshot().clone();

    let result = editor.load(vec![Node::new("a", NodeType::Text), Node::new("a", NodeType::Text)]);

    assert_eq!(result.unwrap_err(), EditorError::DuplicateId("a".to_string()));
    assert!(EditorError::DuplicateId("a".to_string()).is_contract_violation());
    assert_eq!(editor.snapshot(), &before);
}

#[test]
fn test_load_rejects_nested_root() {
    let mut editor = editor();
    let mut nested = Node::root(vec![]);
    nested.id = "inner".to_string();

    let result = editor.load(vec![Node::new("c", NodeType::Container).with_child(nested)]);
    assert!(matches!(result, Err(EditorError::InvalidNode { .. })));
}

#[test]
fn test_load_resets_selection_and_is_undoable() {
    let mut editor = editor();
    editor
        .dispatch(Mutation::SelectNode {
            id: Some("row".to_string()),
        })
        .unwrap();

    editor.load(vec![Node::new("only", NodeType::Text)]).unwrap();
    assert_eq!(editor.selection(), None);
    assert_eq!(editor.snapshot().len(), 2);

    editor.undo().unwrap();
    assert!(editor.snapshot().contains("row"));
}
