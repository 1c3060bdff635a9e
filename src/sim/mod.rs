//! Deterministic grid simulation
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Logical clock only, never wall time
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering, input or transport dependencies

pub mod clock;
pub mod entity;
pub mod geometry;
pub mod grid;
pub mod snake;
pub mod world;

pub use clock::{Clock, ClockTick};
pub use entity::{Entity, Food, ObjectId, ObjectKind, Wall, WorldObject};
pub use geometry::{Direction, GridStep, Point, Segment};
pub use grid::{CellState, Grid, Occupant};
pub use snake::{DeathCause, Snake};
pub use world::{MergeOutcome, RemoteSnake, SimEvent, TickReport, World};
