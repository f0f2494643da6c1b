pub mod console_logger;
pub mod file_logger;
pub mod floor_plan_files;
pub mod multi_logger;
pub mod noop_logger;

pub use console_logger::*;
pub use file_logger::*;
pub use floor_plan_files::*;
pub use multi_logger::*;
pub use noop_logger::*;
