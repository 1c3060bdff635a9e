//! Per-tick occupancy snapshot
//!
//! Built from scratch at the start of every coarse tick and read-only after
//! that. Objects are stamped in insertion order, so when two objects share a
//! cell the later one wins.

use super::entity::{ObjectId, ObjectKind, WorldObject};
use super::geometry::Point;

/// What the snapshot records for an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    /// Position in the world's object list at snapshot time
    pub index: usize,
    pub id: ObjectId,
    pub kind: ObjectKind,
}

/// Result of a cell query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Outside,
    Empty,
    Occupied(Occupant),
}

#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Option<Occupant>>,
}

impl Grid {
    /// Empty grid
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            cells: vec![None; len],
        }
    }

    /// Stamp every object into a fresh grid
    pub fn build(width: i32, height: i32, objects: &[WorldObject]) -> Self {
        let mut grid = Self::new(width, height);
        for (index, object) in objects.iter().enumerate() {
            let occupant = Occupant {
                index,
                id: object.id,
                kind: object.kind(),
            };
            object.for_each_cell(|p| grid.stamp(p, occupant));
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[inline]
    fn index_of(&self, p: Point) -> usize {
        debug_assert!(self.contains(p), "grid index {p} outside {}x{}", self.width, self.height);
        p.y as usize * self.width as usize + p.x as usize
    }

    /// Off-grid cells are skipped; a dead snake's head may lie outside.
    fn stamp(&mut self, p: Point, occupant: Occupant) {
        if !self.contains(p) {
            log::debug!("object {} has a cell off the grid at {}", occupant.id, p);
            return;
        }
        let i = self.index_of(p);
        self.cells[i] = Some(occupant);
    }

    pub fn at(&self, p: Point) -> CellState {
        if !self.contains(p) {
            return CellState::Outside;
        }
        match self.cells[self.index_of(p)] {
            Some(occupant) => CellState::Occupied(occupant),
            None => CellState::Empty,
        }
    }

    /// Occupant of an in-bounds cell
    pub fn occupant(&self, p: Point) -> Option<Occupant> {
        match self.at(p) {
            CellState::Occupied(occupant) => Some(occupant),
            _ => None,
        }
    }

    pub fn is_free(&self, p: Point) -> bool {
        self.at(p) == CellState::Empty
    }

    /// Number of empty cells
    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Point> + '_ {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(move |(i, _)| Point::new((i % width) as i32, (i / width) as i32))
    }
}
