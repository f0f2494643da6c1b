pub mod aggregate;
pub mod error;
pub mod event;

pub use aggregate::*;
pub use error::*;
pub use event::*;
