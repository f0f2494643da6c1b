use courier_sim::adapters::outbound::FilesystemFloorPlanSource;
use courier_sim::domains::navigation::*;
use courier_sim::DomainError;
use std::fs;
use tempfile::tempdir;

const STUDIO: &str = r#"
robot_start = "a"
user_node = "c"
obstacles = ["b"]
edges = [["b", "c", 2]]

[items]
mug = "c"

[[rooms]]
name = "studio"
bounds = [0.0, 0.0, 10.0, 10.0]
nodes = [{ id = "a", at = [1.0, 1.0] }, { id = "b", at = [5.0, 1.0] }]
edges = [["a", "b"]]

[[rooms]]
name = "balcony"
nodes = [{ id = "c", at = [5.0, 12.0] }]
"#;

#[test]
fn test_load_toml_floor_plan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("studio.toml"), STUDIO).unwrap();
    let source = FilesystemFloorPlanSource::new(Some(dir.path().to_path_buf()));

    let plan = source.load_floor_plan("studio.toml").unwrap();
    assert_eq!(plan.robot_start, "a");
    assert_eq!(plan.user_node.as_deref(), Some("c"));

    let graph = plan.build_graph().unwrap();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.weight_between("c", "b"), Some(2));
    assert!(graph.room("balcony").unwrap().bounds.is_none());
}

#[test]
fn test_load_json_floor_plan() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("tiny.json"),
        r#"{"robot_start": "x", "rooms": [{"name": "box", "nodes": [{"id": "x", "at": [0, 0]}, {"id": "y", "at": [1, 0]}], "edges": [["x", "y"]]}]}"#,
    )
    .unwrap();
    let source = FilesystemFloorPlanSource::new(Some(dir.path().to_path_buf()));

    let graph = source.load_floor_plan("tiny.json").unwrap().build_graph().unwrap();
    assert!(graph.are_adjacent("x", "y"));
}

#[test]
fn test_save_then_list_floor_plans() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("plans");
    let source = FilesystemFloorPlanSource::new(Some(base.clone()));

    let plan = FloorPlan::from_toml_str(STUDIO).unwrap();
    source.save_floor_plan("copy.toml", &plan).unwrap();
    fs::write(base.join("notes.txt"), "not a plan").unwrap();

    assert_eq!(source.available_floor_plans().unwrap(), vec!["copy.toml"]);
    let reloaded = source.load_floor_plan("copy.toml").unwrap();
    assert_eq!(reloaded.obstacles, plan.obstacles);
    assert_eq!(reloaded.items, plan.items);
    assert_eq!(reloaded.build_graph().unwrap().edge_count(), 2);
}

#[test]
fn test_missing_file_is_an_infrastructure_error() {
    let dir = tempdir().unwrap();
    let source = FilesystemFloorPlanSource::new(Some(dir.path().to_path_buf()));
    assert!(matches!(
        source.load_floor_plan("absent.toml"),
        Err(DomainError::InfrastructureError(_))
    ));
}

#[test]
fn test_malformed_plans_are_rejected() {
    assert!(matches!(
        FloorPlan::from_toml_str("robot_start = 3"),
        Err(DomainError::InvalidCommand { .. })
    ));

    let duplicate = FloorPlan::from_toml_str(
        r#"
robot_start = "a"
[[rooms]]
name = "one"
nodes = [{ id = "a", at = [0.0, 0.0] }]
[[rooms]]
name = "two"
nodes = [{ id = "a", at = [1.0, 0.0] }]
"#,
    )
    .unwrap();
    assert!(matches!(
        duplicate.build_graph(),
        Err(DomainError::DuplicateNode { .. })
    ));
}
