pub mod logger;
pub mod navigation;
pub mod robot;

pub use logger::*;
pub use navigation::*;
pub use robot::*;
