//! Common utilities and helpers

pub mod logging;
pub mod path;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use path::{move_file, remove_best_effort};
pub use time::TimeParser;
