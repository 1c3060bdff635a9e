use grid_snake::net::{ServerMessage, SnakeState, WirePoint, WireSegment};
use grid_snake::sim::{
    DeathCause, Direction, Grid, ObjectKind, Point, SimEvent, Snake, World, WorldObject,
};
use grid_snake::{NullSink, Session, SimConfig};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn ten_by_ten() -> (World, u32) {
    let mut world = World::new(SimConfig::with_size(10, 10));
    let id = world.spawn_local_snake(Snake::new(Point::new(5, 5), 3, Direction::Right));
    (world, id)
}

fn update(id: &str, anchor: (i32, i32), length: u32, direction: Direction, alive: bool) -> ServerMessage {
    ServerMessage::Update(SnakeState {
        id: id.into(),
        vectors: vec![WireSegment {
            position: WirePoint {
                x: anchor.0,
                y: anchor.1,
            },
            length,
            direction,
        }],
        alive,
    })
}

#[test]
fn straight_move_shrinks_tail() {
    let (mut world, _) = ten_by_ten();
    let mut rng = Pcg32::seed_from_u64(1);
    world.advance(&mut rng).expect("tick");

    let snake = world.local_snake().expect("snake");
    assert_eq!(snake.head(), Point::new(6, 5));
    assert_eq!(snake.len(), 3);
    let cells: Vec<_> = snake.cells().collect();
    assert_eq!(cells, vec![Point::new(6, 5), Point::new(5, 5), Point::new(4, 5)]);
}

#[test]
fn eating_suppresses_shrink_and_respawns_on_empty_cell() {
    let (mut world, id) = ten_by_ten();
    world.add_food(Point::new(6, 5), 1);
    let before: Grid = world.build_grid();
    let mut rng = Pcg32::seed_from_u64(2);

    let report = world.advance(&mut rng).expect("tick");
    assert!(report.events.contains(&SimEvent::Ate { snake: id, value: 1 }));

    let snake = world.local_snake().expect("snake");
    assert_eq!(snake.head(), Point::new(6, 5));
    assert_eq!(snake.len(), 4);

    let spawned: Vec<_> = report.spawned_food().collect();
    assert_eq!(spawned.len(), 1);
    assert!(before.is_free(spawned[0]));

    world.clear_dirty();
    let foods: Vec<_> = world
        .objects()
        .iter()
        .filter(|o| o.kind() == ObjectKind::Food)
        .collect();
    assert_eq!(foods.len(), 1);
    assert_eq!(foods[0].position(), spawned[0]);
}

#[test]
fn wall_and_bounds_deaths() {
    let (mut world, id) = ten_by_ten();
    world.add_wall(Point::new(6, 5));
    let mut rng = Pcg32::seed_from_u64(3);
    let report = world.advance(&mut rng).expect("tick");
    assert_eq!(report.death_of(id), Some(DeathCause::Wall));
    assert_eq!(world.local_snake().map(Snake::head), Some(Point::new(5, 5)));

    let mut world = World::new(SimConfig::with_size(10, 10));
    let id = world.spawn_local_snake(Snake::new(Point::new(3, 0), 2, Direction::Up));
    let report = world.advance(&mut rng).expect("tick");
    assert_eq!(report.death_of(id), Some(DeathCause::OutOfBounds));
    let snake = world.local_snake().expect("snake");
    assert!(snake.is_dead());
    assert_eq!(snake.head(), Point::new(3, -1));
}

#[test]
fn snake_collision_rule_is_configurable() {
    for fatal in [true, false] {
        let mut config = SimConfig::with_size(20, 20);
        config.fatal_snake_collision = fatal;
        let mut session = Session::new(config).expect("session");
        // a remote snake lying across the local snake's path
        session.receive(update("wall-of-snake", (11, 12), 5, Direction::Down, true));
        let report = session.step().expect("tick");

        let local = session.world().local_id().expect("local id");
        let snake = session.world().local_snake().expect("snake");
        if fatal {
            assert_eq!(report.death_of(local), Some(DeathCause::Snake));
            assert_eq!(snake.head(), Point::new(10, 10));
        } else {
            assert_eq!(report.death_of(local), None);
            assert_eq!(snake.head(), Point::new(11, 10));
        }
    }
}

#[test]
fn remote_snake_lifecycle() {
    let mut session = Session::new(SimConfig::with_size(20, 20)).expect("session");
    session.receive(ServerMessage::Howdy { id: "me".into() });
    session.receive(update("them", (2, 2), 2, Direction::Down, true));
    session.step().expect("tick");

    let count_snakes = |s: &Session| s.world().count(ObjectKind::Snake);
    assert_eq!(count_snakes(&session), 2);

    // same id again replaces instead of duplicating
    session.receive(update("them", (2, 3), 3, Direction::Down, true));
    session.step().expect("tick");
    assert_eq!(count_snakes(&session), 2);
    let them = session
        .world()
        .find_snake("them")
        .and_then(WorldObject::as_snake)
        .expect("remote");
    assert_eq!(them.len(), 3);
    assert_eq!(them.head(), Point::new(2, 3));

    // our own id is never touched by the merge path
    session.receive(update("me", (0, 0), 1, Direction::Up, false));
    session.receive(ServerMessage::Delete(grid_snake::net::SnakeRef { id: "me".into() }));
    session.step().expect("tick");
    assert!(!session.world().local_snake().expect("local").is_dead());

    // malformed messages are dropped without touching the world
    session.receive(ServerMessage::Update(SnakeState {
        id: "empty".into(),
        vectors: Vec::new(),
        alive: true,
    }));
    session.step().expect("tick");
    assert!(session.world().find_snake("empty").is_none());

    session.receive(ServerMessage::Delete(grid_snake::net::SnakeRef { id: "them".into() }));
    session.step().expect("tick");
    session.flush(&mut NullSink);
    assert_eq!(count_snakes(&session), 1);
}

#[test]
fn off_board_remote_body_is_ignored() {
    let mut session = Session::new(SimConfig::with_size(20, 20)).expect("session");
    session.receive(update("far", (i32::MAX, 0), 2, Direction::Left, true));
    session.receive(update("huge", (4, 4), u32::MAX, Direction::Down, true));
    session.receive(update("fine", (4, 4), 3, Direction::Down, true));
    session.step().expect("tick");
    session.step().expect("tick");

    assert!(session.world().find_snake("far").is_none());
    assert!(session.world().find_snake("huge").is_none());
    assert!(session.world().find_snake("fine").is_some());
    assert_eq!(session.world().count(ObjectKind::Snake), 2);
}

#[test]
fn food_lands_on_the_only_free_cell() {
    let config = SimConfig {
        max_placement_attempts: 1,
        ..SimConfig::with_size(6, 6)
    };
    let free = Point::new(5, 5);
    for seed in 0..40 {
        let mut world = World::new(config.clone());
        world.spawn_local_snake(Snake::new(Point::new(1, 0), 2, Direction::Right));
        world.add_food(Point::new(2, 0), 1);
        let keep = [Point::new(0, 0), Point::new(1, 0), Point::new(2, 0), free];
        for y in 0..6 {
            for x in 0..6 {
                if !keep.contains(&Point::new(x, y)) {
                    world.add_wall(Point::new(x, y));
                }
            }
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let report = world.advance(&mut rng).expect("a cell is free");
        assert_eq!(report.spawned_food().collect::<Vec<_>>(), vec![free]);
        let snake = world.local_snake().expect("snake");
        assert_eq!(snake.head(), Point::new(2, 0));
        assert_eq!(snake.len(), 3);
    }
}

#[test]
fn clear_dirty_then_is_dirty_is_false() {
    let mut session = Session::new(SimConfig::default()).expect("session");
    session.world_mut().clear_dirty();
    assert!(!session.world().is_dirty());
    assert!(!session.flush(&mut NullSink));
}

#[test]
fn same_seed_same_world() {
    let config = SimConfig {
        seed: 42,
        ..SimConfig::with_size(12, 12)
    };
    let mut a = Session::new(config.clone()).expect("session");
    let mut b = Session::new(config).expect("session");
    let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];
    for turn in turns.iter().cycle().take(12) {
        a.steer(*turn);
        b.steer(*turn);
        let ra = a.step();
        let rb = b.step();
        assert_eq!(ra, rb);
    }
    let positions = |s: &Session| -> Vec<Point> {
        s.world().objects().iter().map(WorldObject::position).collect()
    };
    assert_eq!(positions(&a), positions(&b));
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
    fn body_length_tracks_food(
        seed in any::<u64>(),
        fatal in any::<bool>(),
        turns in prop::collection::vec(any_direction(), 1..60),
    ) {
        let config = SimConfig {
            fatal_snake_collision: fatal,
            food_value: 2,
            ..SimConfig::with_size(16, 16)
        };
        let mut world = World::new(config);
        let id = world.spawn_local_snake(Snake::new(Point::new(8, 8), 3, Direction::Right));
        world.add_food(Point::new(10, 8), 2);
        world.add_food(Point::new(8, 10), 1);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut consumed = 0u32;

        for turn in turns {
            world.local_snake_mut().expect("snake").steer(turn);
            let report = world.advance(&mut rng).expect("tick");
            for event in &report.events {
                if let SimEvent::Ate { snake, value } = event {
                    prop_assert_eq!(*snake, id);
                    consumed += value;
                }
            }
            world.clear_dirty();

            let snake = world.local_snake().expect("snake");
            prop_assert_eq!(snake.len(), 3 + consumed - snake.food_eaten());
            prop_assert!(snake.len() >= 1);
            if !snake.is_dead() {
                prop_assert!(world.build_grid().contains(snake.head()));
            } else {
                break;
            }
        }
    }
}
