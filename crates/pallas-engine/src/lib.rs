//! Search and evaluation for pallas.

pub mod config;
pub mod engine;
pub mod eval;
pub mod search;
pub mod time;

pub use config::{ConfigError, EngineConfig};
pub use engine::Engine;
pub use eval::evaluate;
pub use search::control::{SearchControl, SearchLimits};
pub use search::{MATE, SearchInfo, SearchResult, VALUE_WIN, depth_to_mate};
pub use time::limits_from_clock;
