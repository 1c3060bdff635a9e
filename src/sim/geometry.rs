//! Grid geometry: points, directions and straight body segments
//!
//! Points are plain `IVec2` values. They are `Copy`, so storing one into a
//! new owner always duplicates it.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Integer grid coordinate
pub type Point = IVec2;

/// One of the four grid directions
///
/// Serialized with the numeric encoding used on the wire (up=1 .. right=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction pointing the other way
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step for this direction (screen coordinates: up is -y)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Left => 3,
            Direction::Right => 4,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = SyncError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Up),
            2 => Ok(Direction::Down),
            3 => Ok(Direction::Left),
            4 => Ok(Direction::Right),
            other => Err(SyncError::InvalidDirection(other)),
        }
    }
}

/// Stepping along grid directions
pub trait GridStep {
    /// Move in place by `distance` cells along `direction`
    fn step(&mut self, distance: i32, direction: Direction);

    /// Copy moved by `distance` cells along `direction`
    fn stepped(self, distance: i32, direction: Direction) -> Self;
}

impl GridStep for Point {
    #[inline]
    fn step(&mut self, distance: i32, direction: Direction) {
        *self += direction.delta() * distance;
    }

    #[inline]
    fn stepped(mut self, distance: i32, direction: Direction) -> Self {
        self.step(distance, direction);
        self
    }
}

/// A straight run of snake body
///
/// `anchor` is the head-ward end; the remaining `length - 1` cells trail
/// behind it, opposite to `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub anchor: Point,
    pub length: u32,
    pub direction: Direction,
}

impl Segment {
    pub fn new(anchor: Point, length: u32, direction: Direction) -> Self {
        Self {
            anchor,
            length,
            direction,
        }
    }

    /// Cell at `index` cells behind the anchor
    pub fn cell(&self, index: u32) -> Point {
        self.anchor.stepped(index as i32, self.direction.opposite())
    }

    /// All occupied cells, anchor first
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.length).map(move |i| self.cell(i))
    }

    /// Last occupied cell (the anchor for unit segments)
    pub fn tail(&self) -> Point {
        self.cell(self.length.saturating_sub(1))
    }

    /// Shift the anchor without changing the length
    pub fn shift(&mut self, distance: i32, direction: Direction) {
        self.anchor.step(distance, direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_step_axes() {
        let p = Point::new(5, 5);
        assert_eq!(p.stepped(1, Direction::Up), Point::new(5, 4));
        assert_eq!(p.stepped(1, Direction::Down), Point::new(5, 6));
        assert_eq!(p.stepped(2, Direction::Left), Point::new(3, 5));
        assert_eq!(p.stepped(3, Direction::Right), Point::new(8, 5));
        // negative distance walks backwards
        assert_eq!(p.stepped(-1, Direction::Right), Point::new(4, 5));
    }

    #[test]
    fn test_segment_trails_behind_anchor() {
        let seg = Segment::new(Point::new(5, 5), 3, Direction::Right);
        let cells: Vec<_> = seg.cells().collect();
        assert_eq!(
            cells,
            vec![Point::new(5, 5), Point::new(4, 5), Point::new(3, 5)]
        );
        assert_eq!(seg.tail(), Point::new(3, 5));
    }

    #[test]
    fn test_empty_segment_has_no_cells() {
        let seg = Segment::new(Point::new(1, 1), 0, Direction::Up);
        assert_eq!(seg.cells().count(), 0);
    }

    #[test]
    fn test_direction_wire_encoding() {
        for d in Direction::ALL {
            assert_eq!(Direction::try_from(u8::from(d)).ok(), Some(d));
        }
        assert!(Direction::try_from(0).is_err());
        assert!(Direction::try_from(5).is_err());
        assert_eq!(serde_json::to_string(&Direction::Left).ok().as_deref(), Some("3"));
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_opposite_is_involution(d in any_direction()) {
            prop_assert_eq!(d.opposite().opposite(), d);
            prop_assert_ne!(d.opposite(), d);
        }

        #[test]
        fn prop_step_then_opposite_returns(x in -100i32..100, y in -100i32..100, n in 0i32..20, d in any_direction()) {
            let p = Point::new(x, y);
            prop_assert_eq!(p.stepped(n, d).stepped(n, d.opposite()), p);
        }
    }
}
