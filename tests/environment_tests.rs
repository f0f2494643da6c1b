use courier_sim::application::{EnvironmentContext, ItemLocation, NavigationOutcome};
use courier_sim::config::NavigationConfig;
use courier_sim::domains::navigation::*;
use courier_sim::domains::robot::{RobotEvent, StepOutcome};
use courier_sim::DomainError;
use std::collections::BTreeSet;

fn abc_graph() -> GraphStore {
    let mut graph = GraphStore::new();
    graph.add_node("hall", "A", Position2D::new(0.0, 0.0)).unwrap();
    graph.add_node("hall", "B", Position2D::new(1.0, 0.0)).unwrap();
    graph.add_node("porch", "C", Position2D::new(2.0, 0.0)).unwrap();
    graph.add_edge("A", "B", 1).unwrap();
    graph.add_edge("B", "C", 1).unwrap();
    graph
}

fn abc_with(rules: NavigationConfig) -> EnvironmentContext {
    EnvironmentContext::new(abc_graph(), "A", rules)
        .unwrap()
        .with_items([("w".to_string(), "C".to_string())])
        .unwrap()
}

fn abc() -> EnvironmentContext {
    abc_with(NavigationConfig::default())
}

fn eight_rooms() -> EnvironmentContext {
    let source = std::fs::read_to_string("resources/floor_plans/eight_rooms.toml").unwrap();
    let plan = FloorPlan::from_toml_str(&source).unwrap();
    EnvironmentContext::from_floor_plan(&plan, NavigationConfig::default()).unwrap()
}

fn set(ids: &[&str]) -> BTreeSet<NodeId> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_line_scenario() {
    let mut env = abc();
    assert_eq!(env.plan_path("A", "C").unwrap(), vec!["A", "B", "C"]);
    assert_eq!(env.advance("B").unwrap(), StepOutcome::Moved("B".into()));

    assert!(env.mark_blocked("C").unwrap());
    assert_eq!(env.advance("C").unwrap(), StepOutcome::Blocked("C".into()));
    assert_eq!(env.current_position(), "B");

    assert_eq!(env.plan_path_avoiding("C", &set(&["C"])).unwrap(), None);
}

#[test]
fn test_blocked_advance_never_moves() {
    let mut env = abc();
    env.mark_blocked("B").unwrap();
    for _ in 0..3 {
        assert_eq!(env.advance("B").unwrap(), StepOutcome::Blocked("B".into()));
        assert_eq!(env.current_position(), "A");
        assert_eq!(env.current_coordinates(), Position2D::new(0.0, 0.0));
    }
}

#[test]
fn test_mark_blocked_is_idempotent() {
    let mut env = abc();
    assert!(env.mark_blocked("B").unwrap());
    assert!(!env.mark_blocked("B").unwrap());
    assert_eq!(env.blocked_nodes(), set(&["B"]));
    assert!(matches!(
        env.mark_blocked("Q"),
        Err(DomainError::UnknownNode { .. })
    ));
}

#[test]
fn test_hidden_obstacle_is_discovered_on_contact() {
    let mut env = abc().with_obstacles(["C".to_string()]).unwrap();

    // Unknown to the planner until the robot bumps into it.
    assert_eq!(env.plan_path("A", "C").unwrap(), vec!["A", "B", "C"]);
    assert!(env.blocked_nodes().is_empty());

    env.advance("B").unwrap();
    env.drain_events();
    assert_eq!(env.advance("C").unwrap(), StepOutcome::Blocked("C".into()));
    assert_eq!(env.blocked_nodes(), set(&["C"]));
    assert_eq!(env.current_position(), "B");

    env.advance("C").unwrap();
    let flags: Vec<bool> = env
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            RobotEvent::MoveBlocked {
                newly_discovered, ..
            } => Some(newly_discovered),
            _ => None,
        })
        .collect();
    assert_eq!(flags, vec![true, false]);
}

#[test]
fn test_robot_may_not_start_on_an_obstacle() {
    let result = abc().with_obstacles(["A".to_string()]);
    assert!(matches!(result, Err(DomainError::InvalidCommand { .. })));
}

#[test]
fn test_step_must_follow_an_edge() {
    let mut env = abc();
    assert!(matches!(
        env.advance("C"),
        Err(DomainError::NotAdjacent { from, to }) if from == "A" && to == "C"
    ));
    assert!(matches!(env.advance("nowhere"), Err(DomainError::UnknownNode { .. })));

    let mut relaxed = abc_with(NavigationConfig {
        require_adjacent_step: false,
        ..NavigationConfig::default()
    });
    assert_eq!(relaxed.advance("C").unwrap(), StepOutcome::Moved("C".into()));
    assert_eq!(relaxed.current_room(), "porch");
}

#[test]
fn test_staying_put_records_nothing() {
    let mut env = abc();
    env.drain_events();
    assert_eq!(env.advance("A").unwrap(), StepOutcome::Moved("A".into()));
    assert!(env.drain_events().is_empty());
}

#[test]
fn test_committed_path_is_consumed_while_walking() {
    let mut env = abc();
    env.plan_path("A", "C").unwrap();
    env.advance("B").unwrap();
    assert_eq!(env.robot().path, vec!["B", "C"]);

    // Stepping off the route drops it.
    env.advance("A").unwrap();
    assert!(env.robot().path.is_empty());
}

#[test]
fn test_planning_from_elsewhere_leaves_the_route_alone() {
    let mut env = eight_rooms();
    env.plan_path("lr1", "lr3").unwrap();
    env.drain_events();

    let path = env.plan_path("k1", "k4").unwrap();
    assert_eq!(path.first().map(String::as_str), Some("k1"));
    assert_eq!(path.last().map(String::as_str), Some("k4"));
    assert_eq!(env.robot().path, vec!["lr1", "lr6", "lr3"]);
    assert_eq!(env.snapshot().path, vec!["lr1", "lr6", "lr3"]);
    assert!(!env
        .drain_events()
        .iter()
        .any(|e| matches!(e, RobotEvent::PathCommitted { .. })));
}

#[test]
fn test_pick_up_and_drop_off_round_trip() {
    let mut env = abc();
    env.advance("B").unwrap();
    env.advance("C").unwrap();

    env.pick_up("w").unwrap();
    assert_eq!(env.location_of("w").unwrap(), ItemLocation::Held);
    assert!(env.all_items().is_empty());

    env.advance("B").unwrap();
    env.drop_off("w", "B").unwrap();
    assert_eq!(env.location_of("w").unwrap(), ItemLocation::AtNode("B".into()));
    assert_eq!(env.robot().held_item, None);
    assert_eq!(env.all_items().get("w").map(String::as_str), Some("B"));
}

#[test]
fn test_pick_up_failures() {
    let mut env = abc()
        .with_items([("v".to_string(), "C".to_string())])
        .unwrap();
    assert!(matches!(
        env.pick_up("w"),
        Err(DomainError::NotAtLocation { item, node }) if item == "w" && node == "A"
    ));
    assert!(matches!(env.pick_up("ghost"), Err(DomainError::UnknownItem { .. })));

    env.advance("B").unwrap();
    env.advance("C").unwrap();
    env.pick_up("w").unwrap();
    assert!(matches!(
        env.pick_up("v"),
        Err(DomainError::AlreadyHolding { held }) if held == "w"
    ));
    assert_eq!(env.location_of("v").unwrap(), ItemLocation::AtNode("C".into()));
}

#[test]
fn test_drop_off_failures() {
    let mut env = abc()
        .with_items([("v".to_string(), "C".to_string())])
        .unwrap();
    assert!(matches!(env.drop_off("w", "A"), Err(DomainError::NotHolding)));

    env.advance("B").unwrap();
    env.advance("C").unwrap();
    env.pick_up("w").unwrap();
    assert!(matches!(
        env.drop_off("v", "C"),
        Err(DomainError::WrongItem { held, requested }) if held == "w" && requested == "v"
    ));
    assert!(matches!(
        env.drop_off("w", "A"),
        Err(DomainError::WrongDropLocation { .. })
    ));
    assert!(matches!(
        env.drop_off("w", "Z"),
        Err(DomainError::UnknownNode { .. })
    ));
    assert_eq!(env.location_of("w").unwrap(), ItemLocation::Held);
}

#[test]
fn test_remote_drop_off_when_allowed() {
    let mut env = abc_with(NavigationConfig {
        require_colocated_drop_off: false,
        ..NavigationConfig::default()
    });
    env.advance("B").unwrap();
    env.advance("C").unwrap();
    env.pick_up("w").unwrap();
    env.drop_off("w", "A").unwrap();
    assert_eq!(env.location_of("w").unwrap(), ItemLocation::AtNode("A".into()));
}

#[test]
fn test_rooms_and_user() {
    let env = abc();
    assert_eq!(env.current_room(), "hall");
    assert_eq!(env.nodes_in_room("porch").unwrap(), vec!["C"]);
    assert!(matches!(env.user_location(), Err(DomainError::UserNotPlaced)));

    let env = env.with_user("C").unwrap();
    assert_eq!(env.user_location().unwrap(), "C");
}

#[test]
fn test_room_info_lists_local_edges() {
    let env = eight_rooms();
    let info = env.room_info("kitchen").unwrap();
    assert_eq!(info.nodes, vec!["k1", "k2", "k3", "k4", "k5", "k6"]);
    assert_eq!(info.edges.len(), 6);
    assert!(info
        .edges
        .iter()
        .all(|e| e.a.starts_with('k') && e.b.starts_with('k')));
    assert!(matches!(
        env.room_info("cellar"),
        Err(DomainError::RoomNotFound { .. })
    ));
}

#[test]
fn test_navigation_discovers_and_routes_around_obstacle() {
    let mut env = eight_rooms();
    assert_eq!(env.current_room(), "living room");

    assert_eq!(
        env.navigate_to("k4").unwrap(),
        NavigationOutcome::Blocked {
            node: "lr5".into(),
            stopped_at: "lr2".into()
        }
    );
    assert_eq!(env.blocked_nodes(), set(&["lr5"]));

    assert_eq!(
        env.navigate_to("k4").unwrap(),
        NavigationOutcome::Arrived {
            node: "k4".into(),
            steps: 10
        }
    );
    assert_eq!(env.current_room(), "kitchen");

    env.pick_up("banana").unwrap();
    let user = env.user_location().unwrap().clone();
    assert!(matches!(
        env.navigate_to(&user).unwrap(),
        NavigationOutcome::Arrived { ref node, .. } if node == "li3"
    ));
    env.drop_off("banana", "li3").unwrap();
    assert_eq!(
        env.location_of("banana").unwrap(),
        ItemLocation::AtNode("li3".into())
    );
}

#[test]
fn test_navigation_to_known_blockage_has_no_path() {
    let mut env = eight_rooms();
    env.mark_blocked("lr5").unwrap();
    assert_eq!(
        env.navigate_to("lr5").unwrap(),
        NavigationOutcome::NoPath {
            target: "lr5".into()
        }
    );
    assert_eq!(
        env.navigate_to("lr1").unwrap(),
        NavigationOutcome::Arrived {
            node: "lr1".into(),
            steps: 0
        }
    );
}

#[test]
fn test_snapshot_reflects_episode_state() {
    let mut env = eight_rooms();
    env.navigate_to("k4").unwrap();
    let snapshot = env.snapshot();
    assert_eq!(snapshot.robot_node, "lr2");
    assert_eq!(snapshot.robot_room, "living room");
    assert_eq!(snapshot.blocked_nodes, set(&["lr5"]));
    assert_eq!(snapshot.user_node.as_deref(), Some("li3"));
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.episode_id, env.episode_id());
    assert!(snapshot.version > 0);
}
