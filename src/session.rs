//! Simulation session
//!
//! Owns everything one running game needs: world, clock, RNG and the
//! message queues shared with the network layer. Input, rendering
//! and networking adapters all talk to a `Session` they are handed.

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::{SimError, SyncError};
use crate::net::{ClientMessage, ServerMessage, SnakeState, decode_server};
use crate::settings::SimConfig;
use crate::sim::{Clock, ClockTick, Direction, RemoteSnake, TickReport, World, WorldObject};

/// Receives the render-ordered world whenever it changed
pub trait FrameSink {
    fn present(&mut self, objects: &[&WorldObject]);
}

impl<F: FnMut(&[&WorldObject])> FrameSink for F {
    fn present(&mut self, objects: &[&WorldObject]) {
        self(objects)
    }
}

/// Sink that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _objects: &[&WorldObject]) {}
}

pub struct Session {
    config: SimConfig,
    world: World,
    clock: Clock,
    rng: Pcg32,
    /// Applied at the start of the next coarse tick
    inbox: VecDeque<ServerMessage>,
    outbox: Vec<ClientMessage>,
    coarse_ticks: u64,
}

impl Session {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let world = World::from_config(&config, &mut rng)?;
        log::info!(
            "Session started: {}x{} grid, seed {}",
            config.width,
            config.height,
            config.seed
        );
        Ok(Self {
            clock: Clock::from_config(&config),
            config,
            world,
            rng,
            inbox: VecDeque::new(),
            outbox: Vec::new(),
            coarse_ticks: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Coarse ticks run so far
    pub fn coarse_ticks(&self) -> u64 {
        self.coarse_ticks
    }

    /// Queue the greeting for a fresh connection
    pub fn connect(&mut self) {
        self.outbox.push(ClientMessage::Hey);
    }

    /// Buffer a direction for the local snake's next move
    pub fn steer(&mut self, direction: Direction) {
        if let Some(snake) = self.world.local_snake_mut() {
            snake.steer(direction);
        }
    }

    pub fn receive(&mut self, msg: ServerMessage) {
        self.inbox.push_back(msg);
    }

    /// Decode and queue a raw inbound message
    pub fn receive_json(&mut self, text: &str) -> Result<(), SyncError> {
        match decode_server(text) {
            Ok(msg) => {
                self.receive(msg);
                Ok(())
            }
            Err(e) => {
                log::warn!("Dropping malformed message: {}", e);
                Err(e)
            }
        }
    }

    fn apply_inbox(&mut self) {
        while let Some(msg) = self.inbox.pop_front() {
            self.apply(msg);
        }
    }

    fn apply(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::Howdy { id } => {
                log::info!("Assigned player id {}", id);
                self.world.set_player_id(id);
            }
            ServerMessage::Update(state) => {
                let merged = RemoteSnake::try_from(state)
                    .and_then(|remote| self.world.update_snake(remote));
                if let Err(e) = merged {
                    log::warn!("Rejected snake update: {}", e);
                }
            }
            ServerMessage::Delete(target) => {
                if target.id.is_empty() {
                    log::warn!("Rejected snake delete: {}", SyncError::MissingId);
                } else {
                    self.world.delete_snake(&target.id);
                }
            }
        }
    }

    /// One coarse tick: apply queued messages, then advance the world
    pub fn step(&mut self) -> Result<TickReport, SimError> {
        self.apply_inbox();
        let report = self.world.advance(&mut self.rng)?;
        self.coarse_ticks += 1;
        if !report.is_empty() {
            log::debug!("tick {}: {:?}", self.coarse_ticks, report.events);
        }
        Ok(report)
    }

    /// One fine tick: age objects, then present and clear if anything changed
    ///
    /// Returns whether a frame was presented.
    pub fn flush(&mut self, sink: &mut impl FrameSink) -> bool {
        self.world.small_tick();
        if !self.world.is_dirty() {
            return false;
        }

        let local_dirty = self
            .world
            .local_id()
            .and_then(|id| self.world.get(id))
            .is_some_and(WorldObject::is_dirty);
        if local_dirty {
            if let Some(state) = self.local_state() {
                self.outbox.push(ClientMessage::Update(state));
            }
        }

        sink.present(&self.world.render_order());
        self.world.clear_dirty();
        true
    }

    /// Run every tick due within `elapsed`, in time order
    pub fn advance(
        &mut self,
        elapsed: Duration,
        sink: &mut impl FrameSink,
    ) -> Result<Vec<TickReport>, SimError> {
        let mut reports = Vec::new();
        for tick in self.clock.advance(elapsed) {
            match tick {
                ClockTick::Coarse => reports.push(self.step()?),
                ClockTick::Fine => {
                    self.flush(sink);
                }
            }
        }
        Ok(reports)
    }

    /// Local snake in wire form; `None` until a player id is assigned
    pub fn local_state(&self) -> Option<SnakeState> {
        let id = self.world.player_id()?;
        let snake = self.world.local_snake()?;
        Some(SnakeState::from_snake(id, snake))
    }

    /// Take all outbound messages
    pub fn drain_outbox(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.outbox)
    }
}
