//! Command implementations

mod config_cmd;
mod scan;
mod stage;

pub use config_cmd::config;
pub use scan::scan;
pub use stage::stage;
