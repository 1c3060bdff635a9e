//! The world: object collection, coarse advancement and remote merges
//!
//! A coarse tick builds one grid snapshot and resolves every local snake
//! against it. Disposal is only applied in `clear_dirty`, so indices taken
//! from the snapshot stay valid for the whole tick.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Food, ObjectId, ObjectKind, Wall, WorldObject};
use super::geometry::{GridStep, Point, Segment};
use super::grid::{CellState, Grid};
use super::snake::{DeathCause, Snake};
use crate::error::{SimError, SyncError};
use crate::settings::SimConfig;

/// Something that happened during a coarse tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    Ate { snake: ObjectId, value: u32 },
    Died { snake: ObjectId, cause: DeathCause },
    FoodSpawned { food: ObjectId, at: Point },
}

/// Events of one coarse tick, in resolution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub events: Vec<SimEvent>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Cause of death for `snake`, if it died this tick
    pub fn death_of(&self, snake: ObjectId) -> Option<DeathCause> {
        self.events.iter().find_map(|e| match e {
            SimEvent::Died { snake: s, cause } if *s == snake => Some(*cause),
            _ => None,
        })
    }

    pub fn spawned_food(&self) -> impl Iterator<Item = Point> + '_ {
        self.events.iter().filter_map(|e| match e {
            SimEvent::FoodSpawned { at, .. } => Some(*at),
            _ => None,
        })
    }
}

/// A validated remote snake state, ready to merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSnake {
    id: String,
    segments: Vec<Segment>,
    alive: bool,
}

impl RemoteSnake {
    pub fn new(id: String, segments: Vec<Segment>, alive: bool) -> Result<Self, SyncError> {
        if id.is_empty() {
            return Err(SyncError::MissingId);
        }
        if segments.is_empty() {
            return Err(SyncError::EmptyBody);
        }
        if let Some(index) = segments.iter().position(|s| s.length == 0) {
            return Err(SyncError::ZeroLengthSegment { index });
        }
        Ok(Self { id, segments, alive })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    /// Reject bodies that cannot belong on a `width` x `height` board
    ///
    /// Anchors may sit at most one cell off the edge (a dead head), and the
    /// whole body must fit in the board's cell count.
    pub fn check_fits(&self, width: i32, height: i32) -> Result<(), SyncError> {
        let max = u64::try_from(i64::from(width) * i64::from(height)).unwrap_or(0);
        let mut total = 0u64;
        for (index, segment) in self.segments.iter().enumerate() {
            let a = segment.anchor;
            if a.x < -1 || a.y < -1 || a.x > width || a.y > height {
                return Err(SyncError::SegmentOutOfRange { index, anchor: a });
            }
            total += u64::from(segment.length);
            if total > max {
                return Err(SyncError::BodyTooLong { length: total, max });
            }
        }
        Ok(())
    }
}

/// What a remote merge did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted(ObjectId),
    Updated(ObjectId),
    /// Unknown id reported dead; nothing to do
    Ignored,
    /// The id is our own; the local simulation is authoritative
    IgnoredLocal,
}

#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    /// Insertion ordered
    objects: Vec<WorldObject>,
    /// The local player's snake
    local: Option<ObjectId>,
    /// Network identity assigned to the local player
    player_id: Option<String>,
    next_id: ObjectId,
    dirty: bool,
}

impl World {
    /// Empty world sized and ruled by `config`
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            objects: Vec::new(),
            local: None,
            player_id: None,
            next_id: 1,
            dirty: true,
        }
    }

    /// World with the local snake centred and its first food placed ahead of it
    pub fn from_config<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Result<Self, SimError> {
        config.validate()?;
        let mut world = Self::new(config.clone());

        let head = Point::new(config.width / 2, config.height / 2);
        let snake = Snake::new(head, config.initial_length, config.initial_direction);
        let food_at = head.stepped(config.initial_food_distance, config.initial_direction);
        world.spawn_local_snake(snake);

        let grid = world.build_grid();
        if grid.is_free(food_at) {
            world.add_food(food_at, config.food_value);
        } else {
            let at = place_free_cell(&grid, &[], config.max_placement_attempts, rng)?;
            world.add_food(at, config.food_value);
        }
        Ok(world)
    }

    pub fn width(&self) -> i32 {
        self.config.width
    }

    pub fn height(&self) -> i32 {
        self.config.height
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Allocate a new object ID
    fn next_object_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an object; it draws on top of earlier objects with the same z-index
    pub fn insert(&mut self, entity: Entity) -> ObjectId {
        let id = self.next_object_id();
        self.objects.push(WorldObject::new(id, entity));
        id
    }

    /// Insert a snake and make it the local player's
    pub fn spawn_local_snake(&mut self, snake: Snake) -> ObjectId {
        let id = self.insert(Entity::Snake(snake));
        self.local = Some(id);
        id
    }

    pub fn add_wall(&mut self, position: Point) -> ObjectId {
        self.insert(Entity::Wall(Wall { position }))
    }

    pub fn add_food(&mut self, position: Point, value: u32) -> ObjectId {
        self.insert(Entity::Food(Food::new(position, value)))
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn local_id(&self) -> Option<ObjectId> {
        self.local
    }

    pub fn local_snake(&self) -> Option<&Snake> {
        self.local.and_then(|id| self.get(id)).and_then(WorldObject::as_snake)
    }

    pub fn local_snake_mut(&mut self) -> Option<&mut Snake> {
        let id = self.local?;
        self.get_mut(id).and_then(WorldObject::as_snake_mut)
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    pub fn set_player_id(&mut self, id: impl Into<String>) {
        self.player_id = Some(id.into());
    }

    /// Live (not disposed) snake carrying `identity`
    pub fn find_snake(&self, identity: &str) -> Option<&WorldObject> {
        self.remote_index(identity).map(|i| &self.objects[i])
    }

    fn remote_index(&self, identity: &str) -> Option<usize> {
        self.objects.iter().position(|o| {
            !o.is_disposed() && o.as_snake().and_then(Snake::identity) == Some(identity)
        })
    }

    fn is_own_identity(&self, identity: &str) -> bool {
        self.player_id.as_deref() == Some(identity)
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind() == kind).count()
    }

    /// Occupancy snapshot of the current object set
    pub fn build_grid(&self) -> Grid {
        Grid::build(self.config.width, self.config.height, &self.objects)
    }

    /// One coarse step: snapshot, then resolve each live local snake against it
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TickReport, SimError> {
        let grid = self.build_grid();
        let mut report = TickReport::default();

        // objects appended during the tick are not resolved until the next one
        let count = self.objects.len();
        for index in 0..count {
            let object = &self.objects[index];
            let Some(snake) = object.as_snake() else {
                continue;
            };
            if object.is_disposed() || snake.is_dead() || !snake.is_local() {
                continue;
            }
            self.advance_snake(index, &grid, rng, &mut report)?;
        }

        Ok(report)
    }

    fn advance_snake<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        grid: &Grid,
        rng: &mut R,
        report: &mut TickReport,
    ) -> Result<(), SimError> {
        let Some(next) = self.objects[index].as_snake().map(Snake::next_head) else {
            return Ok(());
        };

        let mut meal = None;
        if let CellState::Occupied(occupant) = grid.at(next) {
            match occupant.kind {
                ObjectKind::Wall => {
                    self.kill(index, DeathCause::Wall, report);
                    return Ok(());
                }
                ObjectKind::Snake if self.config.fatal_snake_collision => {
                    self.kill(index, DeathCause::Snake, report);
                    return Ok(());
                }
                ObjectKind::Snake => {}
                // already eaten by an earlier snake this tick
                ObjectKind::Food if self.objects[occupant.index].is_disposed() => {}
                ObjectKind::Food => meal = Some(occupant.index),
            }
        }

        if let Some(food_index) = meal {
            // a full board must leave the meal unapplied
            let spawns = self.pick_food_cells(grid, rng)?;

            let food = &mut self.objects[food_index];
            let value = food.as_food_mut().map(Food::eat).unwrap_or(0);
            food.dispose();
            food.mark_dirty();

            let object = &mut self.objects[index];
            if let Some(snake) = object.as_snake_mut() {
                snake.feed(value);
            }
            object.mark_dirty();
            report.events.push(SimEvent::Ate {
                snake: object.id,
                value,
            });
            log::debug!("snake {} ate food worth {}", object.id, value);

            self.respawn_food(&spawns, report);
        }

        let object = &mut self.objects[index];
        let Some(snake) = object.as_snake_mut() else {
            return Ok(());
        };
        snake.crawl();
        let out_of_bounds = !grid.contains(snake.head());
        if out_of_bounds {
            snake.kill();
        }
        snake.resolve_tail();
        object.mark_dirty();

        if out_of_bounds {
            report.events.push(SimEvent::Died {
                snake: object.id,
                cause: DeathCause::OutOfBounds,
            });
            log::info!("snake {} left the grid at {}", object.id, object.position());
        }
        Ok(())
    }

    fn kill(&mut self, index: usize, cause: DeathCause, report: &mut TickReport) {
        let object = &mut self.objects[index];
        if let Some(snake) = object.as_snake_mut() {
            snake.kill();
        }
        object.mark_dirty();
        report.events.push(SimEvent::Died {
            snake: object.id,
            cause,
        });
        log::info!("snake {} died: {:?}", object.id, cause);
    }

    /// Distinct cells, empty in `grid`, for the next batch of food
    fn pick_food_cells<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        rng: &mut R,
    ) -> Result<Vec<Point>, SimError> {
        let mut taken = Vec::with_capacity(self.config.foods_per_meal as usize);
        for _ in 0..self.config.foods_per_meal {
            let at = place_free_cell(grid, &taken, self.config.max_placement_attempts, rng)?;
            taken.push(at);
        }
        Ok(taken)
    }

    /// Replace all food with fresh food at `cells`
    fn respawn_food(&mut self, cells: &[Point], report: &mut TickReport) {
        for object in self.objects.iter_mut().filter(|o| o.kind() == ObjectKind::Food) {
            if !object.is_disposed() {
                object.dispose();
                object.mark_dirty();
            }
        }
        for &at in cells {
            let food = self.add_food(at, self.config.food_value);
            report.events.push(SimEvent::FoodSpawned { food, at });
        }
    }

    /// Merge a remote snake's reported state
    ///
    /// A body that does not fit this world is rejected and changes nothing.
    pub fn update_snake(&mut self, remote: RemoteSnake) -> Result<MergeOutcome, SyncError> {
        if self.is_own_identity(&remote.id) {
            return Ok(MergeOutcome::IgnoredLocal);
        }
        remote.check_fits(self.config.width, self.config.height)?;

        if let Some(index) = self.remote_index(&remote.id) {
            let object = &mut self.objects[index];
            if let Some(snake) = object.as_snake_mut() {
                snake.install(remote.segments, remote.alive);
            }
            if !remote.alive {
                object.dispose();
                log::info!("remote snake {} died", remote.id);
            }
            object.mark_dirty();
            return Ok(MergeOutcome::Updated(object.id));
        }

        if !remote.alive {
            return Ok(MergeOutcome::Ignored);
        }

        log::info!("remote snake {} joined", remote.id);
        let id = self.insert(Entity::Snake(Snake::remote(remote.id, remote.segments)));
        Ok(MergeOutcome::Inserted(id))
    }

    /// Schedule a remote snake for removal. Returns whether one was found.
    pub fn delete_snake(&mut self, identity: &str) -> bool {
        if self.is_own_identity(identity) {
            return false;
        }
        match self.remote_index(identity) {
            Some(index) => {
                let object = &mut self.objects[index];
                object.dispose();
                object.mark_dirty();
                self.dirty = true;
                log::info!("remote snake {} left", identity);
                true
            }
            None => false,
        }
    }

    /// Per fine-tick hook for every object
    pub fn small_tick(&mut self) {
        for object in &mut self.objects {
            object.small_tick();
        }
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty || self.objects.iter().any(WorldObject::is_dirty)
    }

    /// Clear all dirty flags and drop disposed objects
    pub fn clear_dirty(&mut self) {
        for object in &mut self.objects {
            object.clear_dirty();
        }
        self.dirty = false;

        let before = self.objects.len();
        self.objects.retain(|o| !o.is_disposed());
        let removed = before - self.objects.len();
        if removed > 0 {
            log::debug!("compacted {} disposed objects", removed);
        }
    }

    /// Objects by draw priority, ties in insertion order
    pub fn render_order(&self) -> Vec<&WorldObject> {
        let mut ordered: Vec<&WorldObject> = self.objects.iter().collect();
        ordered.sort_by_key(|o| o.z_index());
        ordered
    }
}

/// A random cell that is empty in `grid` and not in `taken`
///
/// Rejection sampling first; once `max_attempts` draws miss, pick uniformly
/// from a scan of the remaining empty cells.
fn place_free_cell<R: Rng + ?Sized>(
    grid: &Grid,
    taken: &[Point],
    max_attempts: u32,
    rng: &mut R,
) -> Result<Point, SimError> {
    for _ in 0..max_attempts {
        let p = Point::new(
            rng.random_range(0..grid.width()),
            rng.random_range(0..grid.height()),
        );
        if grid.is_free(p) && !taken.contains(&p) {
            return Ok(p);
        }
    }

    let free: Vec<Point> = grid.empty_cells().filter(|p| !taken.contains(p)).collect();
    if free.is_empty() {
        log::warn!("no free cell left on the {}x{} grid", grid.width(), grid.height());
        return Err(SimError::NoFreeCell);
    }
    log::debug!(
        "sampling missed {} times; scanning {} free cells",
        max_attempts,
        free.len()
    );
    Ok(free[rng.random_range(0..free.len())])
}
