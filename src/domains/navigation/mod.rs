pub mod blockage;
pub mod graph;
pub mod loader;
pub mod path_finder;
pub mod ports;
pub mod types;

pub use blockage::*;
pub use graph::*;
pub use loader::*;
pub use path_finder::*;
pub use ports::*;
pub use types::*;
