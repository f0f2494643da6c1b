pub mod environment;
pub mod gateway;
pub mod operations;

pub use environment::*;
pub use gateway::*;
pub use operations::*;
