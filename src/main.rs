//! Grid Snake headless driver
//!
//! Usage: `grid-snake [config.json] [max_ticks]`
//!
//! Runs the simulation on logical time with a greedy autopilot steering the
//! local snake, and logs what happens. Rendering and input belong to other
//! front ends.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use grid_snake::{Session, SimConfig};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Grid Snake (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    let max_ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1000);

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let frame = session.config().fine_period();
    let mut frames = 0u64;
    let mut sink = |objects: &[&grid_snake::sim::WorldObject]| {
        frames += 1;
        log::trace!("frame with {} objects", objects.len());
    };

    while session.coarse_ticks() < max_ticks {
        if let Some(direction) = autopilot::choose(session.world()) {
            session.steer(direction);
        }
        if let Err(e) = session.advance(frame, &mut sink) {
            log::error!("Simulation stopped: {}", e);
            break;
        }
        if session.world().local_snake().is_none_or(|s| s.is_dead()) {
            break;
        }
    }

    let length = session.world().local_snake().map(|s| s.len()).unwrap_or(0);
    log::info!(
        "Finished after {} ticks and {} frames; snake length {}",
        session.coarse_ticks(),
        frames,
        length
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web; front ends embed `grid_snake::Session`
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use grid_snake::sim::{CellState, Direction, GridStep, ObjectKind, Point, World};

    /// Greedy: step toward the nearest food without hitting anything
    pub fn choose(world: &World) -> Option<Direction> {
        let snake = world.local_snake()?;
        let head = snake.head();
        let grid = world.build_grid();

        let target = world
            .objects()
            .iter()
            .filter(|o| o.kind() == ObjectKind::Food && !o.is_disposed())
            .map(|o| o.position())
            .min_by_key(|p| manhattan(*p, head));

        let safe = |d: Direction| match grid.at(head.stepped(1, d)) {
            CellState::Empty => true,
            CellState::Occupied(o) => o.kind == ObjectKind::Food,
            CellState::Outside => false,
        };

        let mut options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| *d != snake.heading().opposite() && safe(*d))
            .collect();
        if let Some(target) = target {
            options.sort_by_key(|d| manhattan(head.stepped(1, *d), target));
        }
        options.first().copied()
    }

    fn manhattan(a: Point, b: Point) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }
}
