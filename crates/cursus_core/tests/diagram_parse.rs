use cursus_core::diagram::{parse_diagram, NodeShape};
use cursus_core::roadmap_by_project_id;

fn edge_pairs(source: &str) -> Vec<(String, String)> {
    parse_diagram(source)
        .edges
        .into_iter()
        .map(|edge| (edge.from, edge.to))
        .collect()
}

#[test]
fn simple_edge_declares_both_nodes() {
    let diagram = parse_diagram("A[Start] --> B[End]");

    assert_eq!(diagram.nodes.len(), 2);
    assert_eq!(diagram.edges.len(), 1);
    assert_eq!(diagram.node("A").unwrap().label, "Start");
    assert_eq!(diagram.node("B").unwrap().label, "End");
    assert_eq!(diagram.edges[0].from, "A");
    assert_eq!(diagram.edges[0].to, "B");
}

#[test]
fn parsing_is_deterministic() {
    let source = roadmap_by_project_id("libft").unwrap().diagram;
    assert_eq!(parse_diagram(&source), parse_diagram(&source));
}

#[test]
fn first_declaration_decides_label_and_shape() {
    let diagram = parse_diagram("a[First] --> b\na(Second) --> c{Third}\nb((Bee))");

    assert_eq!(diagram.node("a").unwrap().label, "First");
    assert_eq!(diagram.node("a").unwrap().shape, NodeShape::Rect);
    assert_eq!(diagram.node("b").unwrap().shape, NodeShape::Circle);
    assert_eq!(diagram.node("c").unwrap().shape, NodeShape::Diamond);
    let ids = diagram
        .nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["a", "c", "b"]);
}

#[test]
fn edges_to_nodes_declared_later_are_kept() {
    let source = "a[A] --> b\nb[B] --> c\nc[C]";
    assert_eq!(
        edge_pairs(source),
        vec![
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "c".to_string())
        ]
    );
}

#[test]
fn edges_to_undeclared_nodes_are_dropped() {
    let source = "a[A] --> ghost\nghost --> a\na --> b[B]";
    assert_eq!(edge_pairs(source), vec![("a".to_string(), "b".to_string())]);
}

#[test]
fn reserved_words_never_become_nodes() {
    let diagram = parse_diagram(
        "flowchart TD\n    Start((START)) --> gen[General]\n    gen --> Finish((DONE))\n    subgraph Infra [0. INFRA]\n    end",
    );

    let ids = diagram
        .nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["gen"]);
    assert!(diagram.edges.is_empty());
}

#[test]
fn chains_and_groups_expand_into_edges() {
    let source = "a[A] --> b[B] --> c[C]\nd[D] & e[E] --> f[F]";
    assert_eq!(
        edge_pairs(source),
        vec![
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "c".to_string()),
            ("d".to_string(), "f".to_string()),
            ("e".to_string(), "f".to_string()),
        ]
    );
}

#[test]
fn all_link_styles_are_edges_and_labels_are_kept() {
    let diagram = parse_diagram(
        "a[A] -.-> b[B]\nb ==> c[C]\nc --- d[D]\nd -.- e[E]\ne -->|yes| f[F]\nf -- NO --> g[G]",
    );

    assert_eq!(diagram.edges.len(), 6);
    assert_eq!(diagram.edges[4].label.as_deref(), Some("yes"));
    assert_eq!(diagram.edges[5].label.as_deref(), Some("NO"));
    assert_eq!(diagram.edges[0].label, None);
}

#[test]
fn duplicate_edges_collapse() {
    let source = "a[A] --> b[B]\na --> b\na -.-> b";
    assert_eq!(edge_pairs(source).len(), 1);
}

#[test]
fn numbered_label_prefixes_are_stripped() {
    let diagram = parse_diagram(
        "x[3. Do X] --> y[\"1.2. Setup\"]\nz[2024 plan]\nw[1.2 Install] --> v[3 Do X]",
    );

    assert_eq!(diagram.node("x").unwrap().label, "Do X");
    assert_eq!(diagram.node("y").unwrap().label, "Setup");
    assert_eq!(diagram.node("z").unwrap().label, "2024 plan");
    assert_eq!(diagram.node("w").unwrap().label, "Install");
    assert_eq!(diagram.node("v").unwrap().label, "3 Do X");
}

#[test]
fn comments_styles_and_garbage_are_skipped() {
    let source = "%% comment\nclassDef done fill:#0f0\nclass a done\nstyle a fill:#f00\n@@@ nonsense\na[A] --> b[B]:::done\nlinkStyle 0 stroke:#fff";
    let diagram = parse_diagram(source);

    assert_eq!(diagram.nodes.len(), 2);
    assert_eq!(diagram.node("b").unwrap().label, "B");
    assert_eq!(diagram.edges.len(), 1);
}

#[test]
fn empty_source_yields_empty_diagram() {
    assert!(parse_diagram("").is_empty());
    assert!(parse_diagram("flowchart TD\n\n").is_empty());
}

#[test]
fn get_next_line_roadmap_resolves_inline_labeled_edges() {
    let diagram = roadmap_by_project_id("get_next_line")
        .unwrap()
        .parsed_diagram();

    assert!(diagram.node("start").is_none());
    assert_eq!(diagram.node("has_newline").unwrap().shape, NodeShape::Diamond);
    assert_eq!(diagram.node("check_static").unwrap().label, "Check Static Buffer");

    let yes = diagram
        .edges
        .iter()
        .find(|edge| edge.from == "has_newline" && edge.to == "extract")
        .unwrap();
    assert_eq!(yes.label.as_deref(), Some("YES"));
    assert!(diagram
        .edges
        .iter()
        .any(|edge| edge.from == "read_fd" && edge.to == "eof"));
}
