use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::sim::{Direction, Point, RemoteSnake, Segment, Snake};

/// Grid point as sent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePoint {
    pub x: i32,
    pub y: i32,
}

impl From<Point> for WirePoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<WirePoint> for Point {
    fn from(p: WirePoint) -> Self {
        Point::new(p.x, p.y)
    }
}

/// One body segment ("vector") as sent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSegment {
    pub position: WirePoint,
    pub length: u32,
    pub direction: Direction,
}

impl From<&Segment> for WireSegment {
    fn from(s: &Segment) -> Self {
        Self {
            position: s.anchor.into(),
            length: s.length,
            direction: s.direction,
        }
    }
}

impl From<WireSegment> for Segment {
    fn from(s: WireSegment) -> Self {
        Segment::new(s.position.into(), s.length, s.direction)
    }
}

/// Full state of one snake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeState {
    /// Empty when missing; rejected on merge
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub vectors: Vec<WireSegment>,
    pub alive: bool,
}

impl SnakeState {
    pub fn from_snake(id: impl Into<String>, snake: &Snake) -> Self {
        Self {
            id: id.into(),
            vectors: snake.segments().iter().map(WireSegment::from).collect(),
            alive: !snake.is_dead(),
        }
    }
}

impl TryFrom<SnakeState> for RemoteSnake {
    type Error = SyncError;

    fn try_from(state: SnakeState) -> Result<Self, Self::Error> {
        let segments = state.vectors.into_iter().map(Segment::from).collect();
        RemoteSnake::new(state.id, segments, state.alive)
    }
}

/// Reference to a snake by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeRef {
    #[serde(default)]
    pub id: String,
}

/// Server to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Assigns the local player's identity
    Howdy { id: String },
    Update(SnakeState),
    Delete(SnakeRef),
}

/// Client to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Greeting sent on connect
    Hey,
    /// The local snake's current state
    Update(SnakeState),
}
