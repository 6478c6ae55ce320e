use cursus_core::diagram::{layout_diagram, layout_graph, parse_diagram, LayoutConfig};
use cursus_core::{available_roadmap_ids, roadmap_by_project_id};
use std::collections::HashSet;

#[test]
fn simple_diagram_places_target_below_source() {
    let diagram = parse_diagram("A[Start] --> B[End]");
    let layout = layout_diagram(&diagram, &LayoutConfig::default());

    assert_eq!(layout.nodes.len(), 2);
    let a = layout.node("A").unwrap();
    let b = layout.node("B").unwrap();
    assert_eq!(a.layer, 0);
    assert_eq!(b.layer, 1);
    assert!(b.y > a.y);
}

#[test]
fn disconnected_node_is_laid_out_once_in_trailing_layer() {
    let diagram = parse_diagram("a[A] --> b[B]\nb --> c[C]\nalone[Alone]");
    let placed = layout_graph(&diagram.nodes, &diagram.edges);

    let matches = placed
        .iter()
        .filter(|node| node.node.id == "alone")
        .collect::<Vec<_>>();
    assert_eq!(matches.len(), 1);
    let last_layer = placed.iter().map(|node| node.layer).max().unwrap();
    assert_eq!(matches[0].layer, last_layer);
    assert_eq!(matches[0].layer, 3);
}

#[test]
fn cyclic_diagram_still_terminates() {
    let diagram = parse_diagram("a[A] --> b[B]\nb --> a");
    let layout = layout_diagram(&diagram, &LayoutConfig::default());

    assert_eq!(layout.nodes.len(), 2);
    assert_eq!(layout.node("a").unwrap().layer, 0);
    assert_eq!(layout.node("b").unwrap().layer, 1);
}

#[test]
fn custom_config_scales_coordinates() {
    let diagram = parse_diagram("a[A] --> b[B]\na --> c[C]");
    let config = LayoutConfig {
        node_width: 100.0,
        node_height: 20.0,
        horizontal_gap: 10.0,
        vertical_gap: 30.0,
        margin: 5.0,
    };
    let layout = layout_diagram(&diagram, &config);

    assert_eq!(layout.node("b").unwrap().x, -55.0);
    assert_eq!(layout.node("c").unwrap().x, 55.0);
    assert_eq!(layout.node("c").unwrap().y, 50.0);
    assert_eq!(layout.bounds.min_x, -110.0);
    assert_eq!(layout.bounds.max_x, 110.0);
    assert_eq!(layout.bounds.min_y, -15.0);
    assert_eq!(layout.bounds.max_y, 65.0);
}

#[test]
fn every_catalog_roadmap_lays_out_each_node_once() {
    for id in available_roadmap_ids() {
        let roadmap = roadmap_by_project_id(id).unwrap();
        let diagram = roadmap.parsed_diagram();
        let layout = layout_diagram(&diagram, &LayoutConfig::default());

        assert_eq!(layout.nodes.len(), diagram.nodes.len(), "roadmap {id}");
        let unique = layout
            .nodes
            .iter()
            .map(|placed| placed.node.id.as_str())
            .collect::<HashSet<_>>();
        assert_eq!(unique.len(), diagram.nodes.len(), "roadmap {id}");
        assert!(!diagram.is_empty(), "roadmap {id} has no nodes");
    }
}
