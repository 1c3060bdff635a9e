//! Grid Snake - a grid-based snake simulation with multiplayer sync
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, snakes, food, logical clock)
//! - `net`: Wire messages exchanged with the game server
//! - `session`: Owned simulation context driven by the host loop
//! - `settings`: Data-driven configuration

pub mod error;
pub mod net;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SimError, SyncError};
pub use session::{FrameSink, NullSink, Session};
pub use settings::SimConfig;

/// Default configuration constants
pub mod consts {
    /// World dimensions in cells
    pub const DEFAULT_WIDTH: i32 = 50;
    pub const DEFAULT_HEIGHT: i32 = 50;

    /// Snake defaults
    pub const INITIAL_LENGTH: u32 = 3;
    /// First food sits this far ahead of the starting head
    pub const INITIAL_FOOD_DISTANCE: i32 = 10;

    /// Food defaults
    pub const FOOD_VALUE: u32 = 1;
    /// Rejection sampling bound for free-cell search
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 4096;

    /// Redraw/flush rate (Hz)
    pub const FINE_HZ: u32 = 25;
    /// World advancement period (ms)
    pub const COARSE_INTERVAL_MS: u64 = 500;
    /// Maximum ticks per `advance` call to prevent spiral of death
    pub const MAX_CATCH_UP: u32 = 8;

    /// Draw priorities (lowest drawn first)
    pub const WALL_Z_INDEX: i32 = 10;
    pub const FOOD_Z_INDEX: i32 = 20;
    pub const SNAKE_Z_INDEX: i32 = 1000;
}
