use crate::common::{AggregateRoot, DomainError, DomainResult};
use crate::config::NavigationConfig;
use crate::domains::navigation::{
    BlockageLedger, Edge, FloorPlan, GraphStore, ItemId, NodeId, PathFinder, Position2D, RoomName,
};
use crate::domains::robot::{ItemRegistry, Robot, RobotEvent, StepOutcome, StepRules};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use uuid::Uuid;

pub const ROBOT_ID: &str = "robot";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "node", rename_all = "snake_case")]
pub enum ItemLocation {
    Held,
    AtNode(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Arrived { node: NodeId, steps: usize },
    Blocked { node: NodeId, stopped_at: NodeId },
    NoPath { target: NodeId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub room: RoomName,
    pub nodes: Vec<NodeId>,
    pub edges: Vec<Edge>,
}

/// Read-only picture of the episode for display layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSnapshot {
    pub episode_id: Uuid,
    pub robot_node: NodeId,
    pub robot_position: Position2D,
    pub robot_room: RoomName,
    pub path: Vec<NodeId>,
    pub held_item: Option<ItemId>,
    pub items: BTreeMap<ItemId, NodeId>,
    pub blocked_nodes: BTreeSet<NodeId>,
    pub user_node: Option<NodeId>,
    pub version: u64,
}

/// Everything one episode owns: the floor plan, what has been learned about
/// it, the items on it and the robot moving through it.
#[derive(Debug, Clone)]
pub struct EnvironmentContext {
    episode_id: Uuid,
    graph: Arc<GraphStore>,
    obstacles: BTreeSet<NodeId>,
    ledger: BlockageLedger,
    items: ItemRegistry,
    robot: Robot,
    user_node: Option<NodeId>,
    rules: NavigationConfig,
}

impl EnvironmentContext {
    pub fn new(graph: GraphStore, start_node: &str, rules: NavigationConfig) -> DomainResult<Self> {
        let robot = Robot::new(ROBOT_ID.to_string(), &graph, start_node)?;
        Ok(Self {
            episode_id: Uuid::new_v4(),
            graph: Arc::new(graph),
            obstacles: BTreeSet::new(),
            ledger: BlockageLedger::new(),
            items: ItemRegistry::new(),
            robot,
            user_node: None,
            rules,
        })
    }

    pub fn from_floor_plan(plan: &FloorPlan, rules: NavigationConfig) -> DomainResult<Self> {
        let graph = plan.build_graph()?;
        let mut env = Self::new(graph, &plan.robot_start, rules)?
            .with_obstacles(plan.obstacles.iter().cloned())?
            .with_items(plan.items.clone())?;
        if let Some(user) = &plan.user_node {
            env = env.with_user(user)?;
        }
        Ok(env)
    }

    /// Nodes that are impassable but not yet known to anyone.
    pub fn with_obstacles<I>(mut self, obstacles: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = NodeId>,
    {
        for node in obstacles {
            self.graph.node(&node)?;
            if node == self.robot.current_node {
                return Err(DomainError::InvalidCommand {
                    reason: format!("Robot cannot start on obstacle {}", node),
                });
            }
            self.obstacles.insert(node);
        }
        Ok(self)
    }

    pub fn with_items<I>(mut self, items: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (ItemId, NodeId)>,
    {
        for (item, node) in items {
            self.graph.node(&node)?;
            self.items.set_location(&item, &node);
        }
        Ok(self)
    }

    pub fn with_user(mut self, node: &str) -> DomainResult<Self> {
        self.graph.node(node)?;
        self.user_node = Some(node.to_string());
        Ok(self)
    }

    pub fn episode_id(&self) -> Uuid {
        self.episode_id
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn ledger(&self) -> &BlockageLedger {
        &self.ledger
    }

    pub fn rules(&self) -> &NavigationConfig {
        &self.rules
    }

    /// Shortest path on the full topology, known blockages included.
    /// Replaces the robot's committed path only when `start` is the robot's node.
    pub fn plan_path(&mut self, start: &str, target: &str) -> DomainResult<Vec<NodeId>> {
        let path = PathFinder::new(&self.graph).shortest_path(start, target)?;
        tracing::debug!(start, target, hops = path.len().saturating_sub(1), "planned path");
        if start == self.robot.current_node {
            self.robot.commit_path(path.clone())?;
        }
        Ok(path)
    }

    /// Shortest path from the robot's node that never enters `blocked`.
    /// Replaces the robot's committed path; `None` clears it.
    pub fn plan_path_avoiding(
        &mut self,
        target: &str,
        blocked: &BTreeSet<NodeId>,
    ) -> DomainResult<Option<Vec<NodeId>>> {
        let start = self.robot.current_node.clone();
        let path = PathFinder::new(&self.graph).shortest_path_avoiding(&start, target, blocked)?;
        tracing::debug!(start = %start, target, found = path.is_some(), "planned avoiding path");
        self.robot.commit_path(path.clone().unwrap_or_default())?;
        Ok(path)
    }

    pub fn advance(&mut self, next: &str) -> DomainResult<StepOutcome> {
        let rules = StepRules {
            require_adjacent_step: self.rules.require_adjacent_step,
        };
        self.robot
            .advance(next, &self.graph, &mut self.ledger, &self.obstacles, rules)
    }

    /// Record `node` as impassable. Returns `true` if it was not known yet.
    pub fn mark_blocked(&mut self, node: &str) -> DomainResult<bool> {
        self.graph.node(node)?;
        Ok(self.ledger.mark_blocked(node))
    }

    pub fn blocked_nodes(&self) -> BTreeSet<NodeId> {
        self.ledger.all()
    }

    /// Walk to `target` along the shortest route around known blockages,
    /// stopping at the first node found to be impassable on the way.
    pub fn navigate_to(&mut self, target: &str) -> DomainResult<NavigationOutcome> {
        let blocked = self.ledger.all();
        let path = match self.plan_path_avoiding(target, &blocked)? {
            Some(path) => path,
            None => {
                return Ok(NavigationOutcome::NoPath {
                    target: target.to_string(),
                })
            }
        };

        let mut steps = 0;
        for next in path.iter().skip(1) {
            match self.advance(next)? {
                StepOutcome::Moved(_) => steps += 1,
                StepOutcome::Blocked(node) => {
                    return Ok(NavigationOutcome::Blocked {
                        node,
                        stopped_at: self.robot.current_node.clone(),
                    })
                }
            }
        }
        Ok(NavigationOutcome::Arrived {
            node: target.to_string(),
            steps,
        })
    }

    pub fn current_position(&self) -> &NodeId {
        &self.robot.current_node
    }

    pub fn current_coordinates(&self) -> Position2D {
        self.robot.position
    }

    pub fn current_room(&self) -> &str {
        self.robot.current_room(&self.graph)
    }

    pub fn pick_up(&mut self, item: &str) -> DomainResult<()> {
        self.robot.pick_up(item, &mut self.items)
    }

    pub fn drop_off(&mut self, item: &str, node: &str) -> DomainResult<()> {
        self.robot.drop_off(
            item,
            node,
            &self.graph,
            &mut self.items,
            self.rules.require_colocated_drop_off,
        )
    }

    pub fn location_of(&self, item: &str) -> DomainResult<ItemLocation> {
        if self.robot.is_holding(item) {
            return Ok(ItemLocation::Held);
        }
        self.items
            .location_of(item)
            .map(|node| ItemLocation::AtNode(node.clone()))
            .ok_or_else(|| DomainError::UnknownItem { id: item.to_string() })
    }

    /// Items lying on the floor plan; a carried item is not listed.
    pub fn all_items(&self) -> BTreeMap<ItemId, NodeId> {
        self.items.all()
    }

    pub fn nodes_in_room(&self, room: &str) -> DomainResult<Vec<NodeId>> {
        Ok(self.graph.nodes_of(room)?.to_vec())
    }

    pub fn room_info(&self, room: &str) -> DomainResult<RoomInfo> {
        Ok(RoomInfo {
            room: room.to_string(),
            nodes: self.nodes_in_room(room)?,
            edges: self.graph.edges_within_room(room)?,
        })
    }

    pub fn user_location(&self) -> DomainResult<&NodeId> {
        self.user_node.as_ref().ok_or(DomainError::UserNotPlaced)
    }

    pub fn snapshot(&self) -> EpisodeSnapshot {
        EpisodeSnapshot {
            episode_id: self.episode_id,
            robot_node: self.robot.current_node.clone(),
            robot_position: self.robot.position,
            robot_room: self.current_room().to_string(),
            path: self.robot.path.clone(),
            held_item: self.robot.held_item.clone(),
            items: self.items.all(),
            blocked_nodes: self.ledger.all(),
            user_node: self.user_node.clone(),
            version: self.robot.version(),
        }
    }

    /// Events recorded since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<RobotEvent> {
        self.robot.take_uncommitted_events()
    }
}
