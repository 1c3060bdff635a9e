//! World objects
//!
//! A flat sum type over the three object variants. Lifecycle flags live on
//! the wrapper so every variant is tracked the same way.

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::snake::Snake;
use crate::consts::*;

/// Stable object identifier, allocated by the world in insertion order
pub type ObjectId = u32;

/// Variant tag, as stamped into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Wall,
    Food,
    Snake,
}

/// Something to eat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub position: Point,
    /// Drops to 0 once eaten
    pub value: u32,
    /// Fine ticks since the food appeared
    #[serde(default)]
    pub age: u32,
}

impl Food {
    pub fn new(position: Point, value: u32) -> Self {
        Self {
            position,
            value,
            age: 0,
        }
    }

    /// Take the whole nutritional value, leaving the food empty
    pub fn eat(&mut self) -> u32 {
        std::mem::take(&mut self.value)
    }
}

/// Immovable obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub position: Point,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Food(Food),
    Wall(Wall),
    Snake(Snake),
}

/// An entity plus its render/disposal bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    pub entity: Entity,
    /// Mutated since the last flush
    #[serde(skip)]
    dirty: bool,
    /// Removed at the next compaction
    #[serde(skip)]
    disposed: bool,
}

impl WorldObject {
    /// New objects start dirty so the first flush draws them
    pub fn new(id: ObjectId, entity: Entity) -> Self {
        Self {
            id,
            entity,
            dirty: true,
            disposed: false,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match &self.entity {
            Entity::Food(_) => ObjectKind::Food,
            Entity::Wall(_) => ObjectKind::Wall,
            Entity::Snake(_) => ObjectKind::Snake,
        }
    }

    /// Authoritative cell for food and walls, head cell for snakes
    pub fn position(&self) -> Point {
        match &self.entity {
            Entity::Food(food) => food.position,
            Entity::Wall(wall) => wall.position,
            Entity::Snake(snake) => snake.head(),
        }
    }

    /// Draw priority, lowest first
    pub fn z_index(&self) -> i32 {
        match self.kind() {
            ObjectKind::Wall => WALL_Z_INDEX,
            ObjectKind::Food => FOOD_Z_INDEX,
            ObjectKind::Snake => SNAKE_Z_INDEX,
        }
    }

    /// Visit every cell this object covers
    pub fn for_each_cell(&self, mut f: impl FnMut(Point)) {
        match &self.entity {
            Entity::Snake(snake) => snake.cells().for_each(f),
            _ => f(self.position()),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Schedule removal at the next compaction
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Per fine-tick hook for continuous state; never touches collision state
    pub fn small_tick(&mut self) {
        if let Entity::Food(food) = &mut self.entity {
            food.age = food.age.saturating_add(1);
        }
    }

    pub fn as_snake(&self) -> Option<&Snake> {
        match &self.entity {
            Entity::Snake(snake) => Some(snake),
            _ => None,
        }
    }

    pub fn as_snake_mut(&mut self) -> Option<&mut Snake> {
        match &mut self.entity {
            Entity::Snake(snake) => Some(snake),
            _ => None,
        }
    }

    pub fn as_food_mut(&mut self) -> Option<&mut Food> {
        match &mut self.entity {
            Entity::Food(food) => Some(food),
            _ => None,
        }
    }
}
