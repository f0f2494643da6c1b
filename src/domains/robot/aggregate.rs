use super::events::RobotEvent;
use super::items::ItemRegistry;
use crate::common::{AggregateRoot, DomainError, DomainResult};
use crate::domains::navigation::{
    BlockageLedger, GraphStore, ItemId, NodeId, Position2D, UNKNOWN_ROOM,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of a single step. Running into a blocked node is an outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "node", rename_all = "snake_case")]
pub enum StepOutcome {
    Moved(NodeId),
    Blocked(NodeId),
}

/// Rules a step must satisfy beyond the node being registered and unblocked.
#[derive(Debug, Clone, Copy)]
pub struct StepRules {
    pub require_adjacent_step: bool,
}

impl Default for StepRules {
    fn default() -> Self {
        Self {
            require_adjacent_step: true,
        }
    }
}

/// The mobile agent. `current_node` is authoritative, `position` is derived
/// from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub id: String,
    pub current_node: NodeId,
    pub position: Position2D,
    /// Remaining committed path, starting at the current node when on route.
    pub path: Vec<NodeId>,
    pub held_item: Option<ItemId>,
    pub version: u64,
    #[serde(skip)]
    uncommitted_events: Vec<RobotEvent>,
}

impl Robot {
    pub fn new(id: String, graph: &GraphStore, start_node: &str) -> DomainResult<Self> {
        let position = graph.coordinates_of(start_node)?;
        let mut robot = Self {
            id: id.clone(),
            current_node: start_node.to_string(),
            position,
            path: Vec::new(),
            held_item: None,
            version: 0,
            uncommitted_events: Vec::new(),
        };

        robot.add_event(RobotEvent::RobotCreated {
            robot_id: id,
            start_node: start_node.to_string(),
            position,
            timestamp: Utc::now(),
        });
        Ok(robot)
    }

    pub fn current_room<'g>(&self, graph: &'g GraphStore) -> &'g str {
        graph.room_of(&self.current_node).unwrap_or(UNKNOWN_ROOM)
    }

    pub fn is_holding(&self, item: &str) -> bool {
        self.held_item.as_deref() == Some(item)
    }

    /// Replace the committed path. An empty path clears it.
    pub fn commit_path(&mut self, path: Vec<NodeId>) -> DomainResult<()> {
        self.record(RobotEvent::PathCommitted {
            robot_id: self.id.clone(),
            path,
            timestamp: Utc::now(),
        })
    }

    /// Try to step onto `next`.
    ///
    /// A node already in the ledger is refused outright. A node that is
    /// physically impassable is discovered here: it goes into the ledger and
    /// the step is refused. Either way the robot stays where it is.
    pub fn advance(
        &mut self,
        next: &str,
        graph: &GraphStore,
        ledger: &mut BlockageLedger,
        obstacles: &BTreeSet<NodeId>,
        rules: StepRules,
    ) -> DomainResult<StepOutcome> {
        let position = graph.coordinates_of(next)?;

        if ledger.is_blocked(next) {
            self.record_blocked(next, false)?;
            return Ok(StepOutcome::Blocked(next.to_string()));
        }

        if next == self.current_node {
            return Ok(StepOutcome::Moved(next.to_string()));
        }

        if rules.require_adjacent_step && !graph.are_adjacent(&self.current_node, next) {
            return Err(DomainError::NotAdjacent {
                from: self.current_node.clone(),
                to: next.to_string(),
            });
        }

        if obstacles.contains(next) {
            ledger.mark_blocked(next);
            self.record_blocked(next, true)?;
            return Ok(StepOutcome::Blocked(next.to_string()));
        }

        self.record(RobotEvent::Moved {
            robot_id: self.id.clone(),
            from: self.current_node.clone(),
            to: next.to_string(),
            position,
            timestamp: Utc::now(),
        })?;
        Ok(StepOutcome::Moved(next.to_string()))
    }

    /// Single-slot pickup, only from the node the robot stands on.
    pub fn pick_up(&mut self, item: &str, items: &mut ItemRegistry) -> DomainResult<()> {
        if let Some(held) = &self.held_item {
            return Err(DomainError::AlreadyHolding { held: held.clone() });
        }
        let location = items.location_of(item).ok_or_else(|| DomainError::UnknownItem {
            id: item.to_string(),
        })?;
        if *location != self.current_node {
            return Err(DomainError::NotAtLocation {
                item: item.to_string(),
                node: self.current_node.clone(),
            });
        }

        items.remove(item);
        self.record(RobotEvent::ItemPickedUp {
            robot_id: self.id.clone(),
            item_id: item.to_string(),
            node: self.current_node.clone(),
            timestamp: Utc::now(),
        })
    }

    pub fn drop_off(
        &mut self,
        item: &str,
        node: &str,
        graph: &GraphStore,
        items: &mut ItemRegistry,
        require_colocated: bool,
    ) -> DomainResult<()> {
        if !graph.contains(node) {
            return Err(DomainError::UnknownNode { id: node.to_string() });
        }
        match &self.held_item {
            None => return Err(DomainError::NotHolding),
            Some(held) if held != item => {
                return Err(DomainError::WrongItem {
                    held: held.clone(),
                    requested: item.to_string(),
                })
            }
            Some(_) => {}
        }
        if require_colocated && node != self.current_node {
            return Err(DomainError::WrongDropLocation {
                item: item.to_string(),
                target: node.to_string(),
                current: self.current_node.clone(),
            });
        }

        items.set_location(item, node);
        self.record(RobotEvent::ItemDroppedOff {
            robot_id: self.id.clone(),
            item_id: item.to_string(),
            node: node.to_string(),
            timestamp: Utc::now(),
        })
    }

    fn record_blocked(&mut self, node: &str, newly_discovered: bool) -> DomainResult<()> {
        self.record(RobotEvent::MoveBlocked {
            robot_id: self.id.clone(),
            node: node.to_string(),
            newly_discovered,
            timestamp: Utc::now(),
        })
    }
}

impl AggregateRoot for Robot {
    type Event = RobotEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
        match event {
            RobotEvent::RobotCreated {
                robot_id,
                start_node,
                position,
                ..
            } => {
                self.id = robot_id.clone();
                self.current_node = start_node.clone();
                self.position = *position;
                self.path.clear();
                self.held_item = None;
            }
            RobotEvent::PathCommitted { path, .. } => {
                self.path = path.clone();
            }
            RobotEvent::Moved { to, position, .. } => {
                self.current_node = to.clone();
                self.position = *position;
                // Keep the rest of the route if the step followed it.
                match self.path.iter().position(|n| n == to) {
                    Some(i) => {
                        self.path.drain(..i);
                    }
                    None => self.path.clear(),
                }
            }
            RobotEvent::ItemPickedUp { item_id, .. } => {
                self.held_item = Some(item_id.clone());
            }
            RobotEvent::ItemDroppedOff { .. } => {
                self.held_item = None;
            }
            RobotEvent::MoveBlocked { .. } => {}
        }
        self.version += 1;
        Ok(())
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }

    fn add_event(&mut self, event: Self::Event) {
        self.uncommitted_events.push(event);
    }
}
