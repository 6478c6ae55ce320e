use cursus_core::catalog::{load_curriculum_file, load_roadmap_file, CatalogError};
use cursus_core::model::curriculum::CurriculumValidationError;
use cursus_core::{
    available_roadmap_ids, default_curriculum, node_details, roadmap_by_project_id, Curriculum,
};
use std::fs;

#[test]
fn embedded_curriculum_has_seven_circles() {
    let curriculum = default_curriculum();
    let numbers = curriculum
        .circles()
        .iter()
        .map(|circle| circle.number)
        .collect::<Vec<_>>();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);

    let python = curriculum.project_by_id("python-modules").unwrap();
    assert_eq!(python.module_count, Some(11));
    assert_eq!(python.module_base_slug(), "python-module");

    let exam = curriculum.project_by_id("exam-rank-02").unwrap();
    assert!(exam.is_exam);
}

#[test]
fn curriculum_lookup_by_slug_covers_alternates_and_submodules() {
    let curriculum = default_curriculum();
    assert_eq!(
        curriculum.project_by_slug("ft_printf").unwrap().id,
        "ft_printf"
    );
    assert_eq!(
        curriculum.project_by_slug("python-module-07").unwrap().id,
        "python-modules"
    );
    assert!(curriculum.project_by_slug("python-module-11").is_none());
}

#[test]
fn every_curriculum_project_has_a_roadmap() {
    for project in default_curriculum().projects() {
        assert!(
            roadmap_by_project_id(&project.id).is_some(),
            "missing roadmap for {}",
            project.id
        );
    }
}

#[test]
fn roadmap_ids_are_sorted() {
    let ids = available_roadmap_ids();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert!(ids.contains(&"libft"));
    assert!(!ids.iter().any(|id| id.starts_with("python-module-")));
}

#[test]
fn python_module_roadmaps_are_generated() {
    let roadmap = roadmap_by_project_id("python-module-5").unwrap();
    assert_eq!(roadmap.project_id, "python-module-5");
    assert_eq!(roadmap.project_title, "Python SQL");
    assert!(roadmap.diagram.is_empty());
    assert!(roadmap.nodes.is_empty());

    assert_eq!(
        roadmap_by_project_id("python-module-10").unwrap().project_title,
        "Python Machine Learning"
    );
    assert!(roadmap_by_project_id("python-module-11").is_none());
    assert!(roadmap_by_project_id("no-such-project").is_none());
}

#[test]
fn node_details_follow_diagram_ids() {
    let roadmap = roadmap_by_project_id("get_next_line").unwrap();
    let details = node_details(&roadmap, "read_fd").unwrap();
    assert_eq!(details.title, "Read from File Descriptor");
    assert_eq!(details.resources.len(), 1);
    assert!(node_details(&roadmap, "nope").is_none());

    let diagram = roadmap.parsed_diagram();
    for node_id in roadmap.nodes.keys() {
        assert!(diagram.node(node_id).is_some(), "undeclared node {node_id}");
    }
}

#[test]
fn curriculum_file_must_be_valid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curriculum.json");
    fs::write(
        &path,
        r#"{ "circles": [ { "number": 1, "name": "One", "projects": [
            { "id": "a", "name": "A", "slug": "a", "difficulty": 9, "circle": 1 }
        ] } ] }"#,
    )
    .unwrap();

    match load_curriculum_file(&path) {
        Err(CatalogError::Curriculum(CurriculumValidationError::InvalidDifficulty {
            project_id,
            difficulty,
        })) => {
            assert_eq!(project_id, "a");
            assert_eq!(difficulty, 9);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(matches!(
        load_curriculum_file(dir.path().join("missing.json")),
        Err(CatalogError::Io { .. })
    ));
}

#[test]
fn custom_curriculum_and_roadmaps_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let curriculum_path = dir.path().join("curriculum.json");
    let roadmap_path = dir.path().join("roadmaps.json");
    fs::write(
        &curriculum_path,
        r#"{ "circles": [ { "number": 1, "name": "One", "projects": [
            { "id": "a", "name": "A", "slug": "a", "alt_slugs": ["aa"], "difficulty": 2, "circle": 1 }
        ] } ] }"#,
    )
    .unwrap();
    fs::write(
        &roadmap_path,
        r#"{ "roadmaps": [ { "project_id": "a", "project_title": "A", "overview": "o",
             "diagram": "x[X] --> y[Y]",
             "nodes": { "x": { "title": "X", "explanation": "first" } } } ] }"#,
    )
    .unwrap();

    let curriculum: Curriculum = load_curriculum_file(&curriculum_path).unwrap();
    assert_eq!(curriculum.project_count(), 1);
    assert_eq!(curriculum.project_by_slug("aa").unwrap().id, "a");

    let catalog = load_roadmap_file(&roadmap_path).unwrap();
    let roadmap = catalog.roadmap("a").unwrap();
    assert_eq!(roadmap.parsed_diagram().edges.len(), 1);
    assert!(roadmap.nodes["x"].resources.is_empty());
}
