use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagesmith_editor::{
    resolve_subtree, DragSource, DropCandidate, Editor, EditorConfig, Mutation, Node, NodeType, Overrides, Point,
    Rect, ViewportClass,
};

/// `sections` containers, each holding a grid of `columns` columns with a few leaves
fn page(sections: usize, columns: usize) -> Vec<Node> {
    (0..sections)
        .map(|s| {
            let mut grid = Node::new(format!("grid-{}", s), NodeType::Grid);
            for c in 0..columns {
                let column = Node::new(format!("col-{}-{}", s, c), NodeType::Column)
                    .with_child(
                        Node::new(format!("heading-{}-{}", s, c), NodeType::Heading)
                            .with_styles(Overrides::with_base([("font-size", "24px")])),
                    )
                    .with_child(Node::new(format!("text-{}-{}", s, c), NodeType::Text))
                    .with_child(Node::new(format!("button-{}-{}", s, c), NodeType::Button));
                grid = grid.with_child(column);
            }
            Node::new(format!("section-{}", s), NodeType::Container).with_child(grid)
        })
        .collect()
}

fn dispatch_move(c: &mut Criterion) {
    let editor = Editor::from_nodes(page(50, 4), EditorConfig::default()).unwrap();

    c.bench_function("dispatch_move_node", |b| {
        b.iter_batched(
            || Editor::from_nodes(editor.snapshot().root().children().to_vec(), EditorConfig::default()).unwrap(),
            |mut editor| {
                editor
                    .dispatch(black_box(Mutation::MoveNode {
                        id: "text-49-3".to_string(),
                        container_id: "col-0-0".to_string(),
                        index: 0,
                    }))
                    .unwrap()
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn resolve_drop(c: &mut Criterion) {
    let editor = Editor::from_nodes(page(50, 4), EditorConfig::default()).unwrap();
    let candidate = DropCandidate::new("text-25-2", Rect::new(0.0, 0.0, 300.0, 40.0));
    let source = DragSource::Existing("section-3".to_string());

    c.bench_function("resolve_drop_leaf", |b| {
        b.iter(|| editor.resolve_drop(black_box(Point::new(10.0, 30.0)), &candidate, &source))
    });
}

fn resolve_page(c: &mut Criterion) {
    let editor = Editor::from_nodes(page(50, 4), EditorConfig::default()).unwrap();

    c.bench_function("resolve_subtree_mobile", |b| {
        b.iter(|| resolve_subtree(black_box(editor.snapshot().root()), ViewportClass::Mobile))
    });
}

criterion_group!(benches, dispatch_move, resolve_drop, resolve_page);
criterion_main!(benches);
