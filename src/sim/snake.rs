//! Snake body and movement rules
//!
//! The body is a deque of straight segments, head first. Moving grows the
//! head end; digestion decides whether the tail end shrinks.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::geometry::{Direction, GridStep, Point, Segment};

/// Why a snake stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    Snake,
    OutOfBounds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    /// Body runs, head first. Never empty.
    segments: VecDeque<Segment>,
    /// Buffered input, applied at the next coarse tick
    pub pending_direction: Direction,
    /// Food eaten but not yet turned into length
    food_eaten: u32,
    dead: bool,
    /// Network identity; `None` for the local player's snake
    identity: Option<String>,
}

impl Snake {
    /// A straight snake with its head at `head`, trailing away from `direction`
    pub fn new(head: Point, length: u32, direction: Direction) -> Self {
        Self {
            segments: VecDeque::from([Segment::new(head, length.max(1), direction)]),
            pending_direction: direction,
            food_eaten: 0,
            dead: false,
            identity: None,
        }
    }

    /// A snake mirrored from another client. `segments` must be non-empty.
    pub fn remote(identity: String, segments: Vec<Segment>) -> Self {
        debug_assert!(!segments.is_empty());
        let pending_direction = segments
            .first()
            .map(|s| s.direction)
            .unwrap_or(Direction::Right);
        Self {
            segments: segments.into(),
            pending_direction,
            food_eaten: 0,
            dead: false,
            identity: Some(identity),
        }
    }

    pub fn head_segment(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn head(&self) -> Point {
        self.head_segment().anchor
    }

    /// Direction the head is currently travelling
    pub fn heading(&self) -> Direction {
        self.head_segment().direction
    }

    pub fn segments(&self) -> &VecDeque<Segment> {
        &self.segments
    }

    /// Every body cell, head first
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments.iter().flat_map(|s| s.cells())
    }

    /// Body length in cells
    pub fn len(&self) -> u32 {
        self.segments.iter().fold(0, |n, s| n.saturating_add(s.length))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn food_eaten(&self) -> u32 {
        self.food_eaten
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn is_local(&self) -> bool {
        self.identity.is_none()
    }

    /// Buffer a direction change. Reversals are accepted.
    pub fn steer(&mut self, direction: Direction) {
        self.pending_direction = direction;
    }

    /// Cell the head would enter on the next crawl
    pub fn next_head(&self) -> Point {
        self.head().stepped(1, self.pending_direction)
    }

    pub fn feed(&mut self, value: u32) {
        self.food_eaten = self.food_eaten.saturating_add(value);
    }

    /// Terminal
    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// Move the head one cell toward the pending direction
    ///
    /// Going straight lengthens the head segment; any turn starts a new
    /// unit segment.
    pub fn crawl(&mut self) {
        if self.dead {
            return;
        }
        let direction = self.pending_direction;
        let head = &mut self.segments[0];
        if head.direction == direction {
            head.shift(1, direction);
            head.length += 1;
        } else {
            let anchor = head.anchor.stepped(1, direction);
            self.segments.push_front(Segment::new(anchor, 1, direction));
        }
    }

    /// Digest one unit of food, or shrink the tail by one cell
    pub fn resolve_tail(&mut self) {
        if self.food_eaten > 0 {
            self.food_eaten -= 1;
            return;
        }
        // a lone segment must keep its head cell
        if self.segments.len() == 1 && self.segments[0].length <= 1 {
            return;
        }
        if let Some(tail) = self.segments.back_mut() {
            tail.length = tail.length.saturating_sub(1);
            if tail.length == 0 {
                self.segments.pop_back();
            }
        }
    }

    /// Replace the whole body with a remote owner's view of it
    pub fn install(&mut self, segments: Vec<Segment>, alive: bool) {
        debug_assert!(!segments.is_empty());
        if let Some(first) = segments.first() {
            self.pending_direction = first.direction;
        }
        self.segments = segments.into();
        self.dead = !alive;
    }
}
