use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown node: {id}")]
    UnknownNode { id: String },

    #[error("Node {id} is already registered in room {room}")]
    DuplicateNode { id: String, room: String },

    #[error("Room not found: {room}")]
    RoomNotFound { room: String },

    #[error("Unknown item: {id}")]
    UnknownItem { id: String },

    #[error("No path from {start} to {target}")]
    NoPathFound { start: String, target: String },

    #[error("Item {item} is not at the robot's location {node}")]
    NotAtLocation { item: String, node: String },

    #[error("Robot is already holding {held}")]
    AlreadyHolding { held: String },

    #[error("Robot is not holding any item")]
    NotHolding,

    #[error("Robot is holding {held}, not {requested}")]
    WrongItem { held: String, requested: String },

    #[error("Cannot drop {item} at {target}: robot is at {current}")]
    WrongDropLocation {
        item: String,
        target: String,
        current: String,
    },

    #[error("Node {to} is not adjacent to {from}")]
    NotAdjacent { from: String, to: String },

    #[error("No user is placed on the floor plan")]
    UserNotPlaced,

    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

impl DomainError {
    /// Stable identifier handed to planners alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::UnknownNode { .. } => "unknown_node",
            DomainError::DuplicateNode { .. } => "duplicate_node",
            DomainError::RoomNotFound { .. } => "room_not_found",
            DomainError::UnknownItem { .. } => "unknown_item",
            DomainError::NoPathFound { .. } => "no_path_found",
            DomainError::NotAtLocation { .. } => "not_at_location",
            DomainError::AlreadyHolding { .. } => "already_holding",
            DomainError::NotHolding => "not_holding",
            DomainError::WrongItem { .. } => "wrong_item",
            DomainError::WrongDropLocation { .. } => "wrong_drop_location",
            DomainError::NotAdjacent { .. } => "not_adjacent",
            DomainError::UserNotPlaced => "user_not_placed",
            DomainError::InvalidCommand { .. } => "invalid_command",
            DomainError::SerializationError(_) => "serialization_error",
            DomainError::InfrastructureError(_) => "infrastructure_error",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
