//! Scenario tests for the collision resolver, movement, fire control and the
//! engine tick cycle.

use std::collections::BTreeSet;

use battlecity_core::commands::Command;
use battlecity_core::components::{Bullet, Explosion, Tank};
use battlecity_core::constants::*;
use battlecity_core::enums::*;
use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;
use battlecity_core::types::{BulletId, ExplosionId, TankId};

use crate::dispatcher::Process;
use crate::engine::{SimConfig, SimulationEngine};
use crate::level::Level;
use crate::systems::bullets::advance_all;
use crate::systems::collision::{classify_hit, resolve, HitOutcome};
use crate::systems::fire_control::can_fire;
use crate::systems::movement::{self, MovementController};
use crate::world::World;
use crate::world_setup::TankTemplate;

fn tank(id: u32, side: Side, x: f64, y: f64) -> Tank {
    Tank {
        id: TankId(id),
        side,
        x,
        y,
        facing: Direction::Up,
        moving: false,
        hp: 1,
        bullet_speed: DEFAULT_BULLET_SPEED,
        bullet_power: DEFAULT_BULLET_POWER,
    }
}

fn bullet(id: u32, owner: u32, x: f64, y: f64, direction: Direction) -> Bullet {
    Bullet {
        id: BulletId(id),
        owner: TankId(owner),
        direction,
        speed: DEFAULT_BULLET_SPEED,
        power: DEFAULT_BULLET_POWER,
        x,
        y,
    }
}

fn world_with(tanks: Vec<Tank>, bullets: Vec<Bullet>) -> World {
    let mut world = World::default();
    world.tanks = tanks.into_iter().map(|t| (t.id, t)).collect();
    world.bullets = bullets.into_iter().map(|b| (b.id, b)).collect();
    world
}

fn destroyed_ids(events: &[GameEvent], explode: bool) -> Vec<Vec<u32>> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::DestroyBullets {
                bullets,
                spawn_explosion,
            } if *spawn_explosion == explode => {
                Some(bullets.iter().map(|b| b.id.0).collect())
            }
            _ => None,
        })
        .collect()
}

fn hurt_tanks(events: &[GameEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::HurtTank { tank_id } => Some(tank_id.0),
            _ => None,
        })
        .collect()
}

/// Engine with one player "p1" driving a tank at `(x, y)` facing `facing`.
fn engine_with_player(x: f64, y: f64, facing: Direction) -> (SimulationEngine, TankId) {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.create_player("p1", DEFAULT_PLAYER_LIVES).unwrap();
    let template = TankTemplate {
        facing,
        ..TankTemplate::player().at(x, y)
    };
    let tank_id = engine.spawn_player_tank("p1", &template).unwrap().unwrap();
    (engine, tank_id)
}

fn press(direction: Direction) -> Command {
    Command::Press {
        player: "p1".into(),
        direction,
    }
}

fn release(direction: Direction) -> Command {
    Command::Release {
        player: "p1".into(),
        direction,
    }
}

// ---- Bullet advancement ----

#[test]
fn test_bullet_moves_along_its_axis_only() {
    let world = world_with(vec![], vec![bullet(1, 9, 50.0, 50.0, Direction::Right)]);
    let moved = advance_all(&world, 100.0);
    let b = &moved[&BulletId(1)];
    assert!((b.x - 62.0).abs() < 1e-9);
    assert_eq!(b.y, 50.0);

    let world = world_with(vec![], vec![bullet(1, 9, 50.0, 50.0, Direction::Up)]);
    let b = &advance_all(&world, 100.0)[&BulletId(1)];
    assert_eq!(b.x, 50.0);
    assert!((b.y - 38.0).abs() < 1e-9);
}

#[test]
fn test_tick_commits_bullets_as_one_batch() {
    let world = world_with(
        vec![tank(1, Side::Ai, 0.0, 0.0)],
        vec![
            bullet(1, 1, 50.0, 50.0, Direction::Right),
            bullet(2, 1, 150.0, 50.0, Direction::Down),
        ],
    );
    let mut engine = SimulationEngine::with_world(SimConfig::default(), world);
    let report = engine.tick(16.0).unwrap();
    let batches: Vec<_> = report
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::UpdateBullets { .. }))
        .collect();
    assert_eq!(batches.len(), 1);
}

// ---- Hit classification ----

#[test]
fn test_classify_hit_table() {
    assert_eq!(classify_hit(Side::Player, Side::Player), HitOutcome::FriendlyFire);
    assert_eq!(classify_hit(Side::Player, Side::Ai), HitOutcome::Damage);
    assert_eq!(classify_hit(Side::Ai, Side::Player), HitOutcome::Damage);
    assert_eq!(classify_hit(Side::Ai, Side::Ai), HitOutcome::Absorbed);
}

#[test]
fn test_player_bullet_hits_ai_tank() {
    let world = world_with(
        vec![tank(1, Side::Player, 0.0, 100.0), tank(2, Side::Ai, 100.0, 100.0)],
        vec![bullet(1, 1, 105.0, 105.0, Direction::Right)],
    );
    let events = resolve(&world);
    assert_eq!(destroyed_ids(&events, true), vec![vec![1]]);
    assert!(destroyed_ids(&events, false).is_empty());
    assert_eq!(hurt_tanks(&events), vec![2]);
    assert_eq!(events.len(), 2);
}

#[test]
fn test_ai_bullet_hits_player_tank() {
    let world = world_with(
        vec![tank(1, Side::Ai, 0.0, 100.0), tank(2, Side::Player, 100.0, 100.0)],
        vec![bullet(1, 1, 105.0, 105.0, Direction::Right)],
    );
    let events = resolve(&world);
    assert_eq!(destroyed_ids(&events, true), vec![vec![1]]);
    assert_eq!(hurt_tanks(&events), vec![2]);
}

#[test]
fn test_ai_bullet_vanishes_on_ai_tank() {
    let world = world_with(
        vec![tank(1, Side::Ai, 0.0, 100.0), tank(2, Side::Ai, 100.0, 100.0)],
        vec![bullet(1, 1, 105.0, 105.0, Direction::Right)],
    );
    let events = resolve(&world);
    assert_eq!(
        events,
        vec![GameEvent::DestroyBullets {
            bullets: vec![world.bullets[&BulletId(1)].clone()],
            spawn_explosion: false,
        }]
    );
}

#[test]
fn test_player_bullet_on_player_tank_explodes_without_damage() {
    let world = world_with(
        vec![
            tank(1, Side::Player, 0.0, 100.0),
            tank(2, Side::Player, 100.0, 100.0),
        ],
        vec![bullet(1, 1, 105.0, 105.0, Direction::Right)],
    );
    let events = resolve(&world);
    assert_eq!(destroyed_ids(&events, true), vec![vec![1]]);
    assert!(hurt_tanks(&events).is_empty());
}

#[test]
fn test_bullet_never_hits_its_owner() {
    let world = world_with(
        vec![tank(1, Side::Player, 100.0, 100.0)],
        vec![bullet(1, 1, 106.5, 100.0, Direction::Up)],
    );
    assert!(resolve(&world).is_empty());
}

#[test]
fn test_bullet_with_dead_owner_skips_tank_checks() {
    let world = world_with(
        vec![tank(2, Side::Ai, 100.0, 100.0)],
        vec![bullet(1, 1, 105.0, 105.0, Direction::Right)],
    );
    assert!(resolve(&world).is_empty());
}

#[test]
fn test_tank_hit_tolerance() {
    // Bullet bottom edge exactly touching the tank top edge is a miss.
    let world = world_with(
        vec![tank(1, Side::Player, 0.0, 0.0), tank(2, Side::Ai, 100.0, 100.0)],
        vec![bullet(1, 1, 105.0, 97.0, Direction::Down)],
    );
    assert!(resolve(&world).is_empty());

    let world = world_with(
        vec![tank(1, Side::Player, 0.0, 0.0), tank(2, Side::Ai, 100.0, 100.0)],
        vec![bullet(1, 1, 105.0, 97.1, Direction::Down)],
    );
    assert_eq!(hurt_tanks(&resolve(&world)), vec![2]);
}

#[test]
fn test_colliding_bullets_cancel_silently() {
    for (first, second) in [
        (Side::Ai, Side::Player),
        (Side::Player, Side::Ai),
        (Side::Ai, Side::Ai),
        (Side::Player, Side::Player),
    ] {
        let world = world_with(
            vec![tank(1, first, 0.0, 150.0), tank(2, second, 150.0, 150.0)],
            vec![
                bullet(1, 1, 50.0, 50.0, Direction::Right),
                bullet(2, 2, 51.0, 50.0, Direction::Left),
            ],
        );
        let events = resolve(&world);
        assert_eq!(
            destroyed_ids(&events, false),
            vec![vec![1, 2]],
            "{first:?} vs {second:?}"
        );
        assert!(destroyed_ids(&events, true).is_empty());
        assert!(hurt_tanks(&events).is_empty());
    }
}

#[test]
fn test_each_bullet_lands_in_exactly_one_batch() {
    // Bullet 1 hits the AI tank and also meets bullet 2.
    let world = world_with(
        vec![tank(1, Side::Player, 0.0, 100.0), tank(2, Side::Ai, 100.0, 100.0)],
        vec![
            bullet(1, 1, 105.0, 105.0, Direction::Right),
            bullet(2, 2, 106.0, 105.0, Direction::Left),
            bullet(3, 2, -10.0, 50.0, Direction::Left),
        ],
    );
    let events = resolve(&world);

    let mut seen = Vec::new();
    for batch in destroyed_ids(&events, true)
        .into_iter()
        .chain(destroyed_ids(&events, false))
    {
        seen.extend(batch);
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(destroyed_ids(&events, false), vec![vec![2]]);
    assert_eq!(hurt_tanks(&events), vec![2]);
}

// ---- Terrain ----

#[test]
fn test_brick_cell_42_is_destroyed() {
    let mut world = world_with(
        vec![tank(1, Side::Player, 0.0, 150.0)],
        vec![bullet(1, 1, 130.0, 12.0, Direction::Up)],
    );
    world.terrain.fill(Material::Brick, [42]);
    let events = resolve(&world);
    assert_eq!(destroyed_ids(&events, true), vec![vec![1]]);
    assert!(events.contains(&GameEvent::DestroyBricks {
        cells: BTreeSet::from([42]),
    }));
}

#[test]
fn test_spread_removes_neighbouring_bricks() {
    let mut world = world_with(
        vec![tank(1, Side::Player, 0.0, 150.0)],
        vec![bullet(1, 1, 130.0, 12.0, Direction::Up)],
    );
    world.terrain.fill(Material::Brick, [41, 42, 43, 44]);
    let events = resolve(&world);
    assert!(events.contains(&GameEvent::DestroyBricks {
        cells: BTreeSet::from([41, 42, 43]),
    }));
}

#[test]
fn test_no_brick_batch_without_bricks() {
    let world = world_with(
        vec![tank(1, Side::Player, 0.0, 0.0), tank(2, Side::Ai, 100.0, 100.0)],
        vec![bullet(1, 1, 105.0, 105.0, Direction::Right)],
    );
    let events = resolve(&world);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::DestroyBricks { .. } | GameEvent::DestroySteels { .. })));
}

#[test]
fn test_steel_needs_power() {
    let mut world = world_with(
        vec![tank(1, Side::Player, 0.0, 150.0)],
        vec![bullet(1, 1, 130.0, 12.0, Direction::Up)],
    );
    world.terrain.fill(Material::Steel, [42]);
    let events = resolve(&world);
    // The bullet still explodes on steel it cannot break.
    assert_eq!(destroyed_ids(&events, true), vec![vec![1]]);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::DestroySteels { .. })));

    world.bullets.get_mut(&BulletId(1)).unwrap().power = STEEL_POWER;
    let events = resolve(&world);
    assert!(events.contains(&GameEvent::DestroySteels {
        cells: BTreeSet::from([42]),
    }));
}

#[test]
fn test_bullet_leaving_the_field_explodes() {
    let world = world_with(
        vec![tank(1, Side::Player, 100.0, 100.0)],
        vec![
            bullet(1, 1, -3.5, 50.0, Direction::Left),
            bullet(2, 1, -1.0, 80.0, Direction::Left),
        ],
    );
    let events = resolve(&world);
    // Only the bullet entirely outside is removed.
    assert_eq!(destroyed_ids(&events, true), vec![vec![1]]);
}

#[test]
fn test_off_field_bullets_explode_even_when_colliding() {
    let world = world_with(
        vec![tank(1, Side::Player, 100.0, 100.0), tank(2, Side::Ai, 150.0, 150.0)],
        vec![
            bullet(1, 1, -4.0, 50.0, Direction::Left),
            bullet(2, 2, -4.0, 51.0, Direction::Right),
        ],
    );
    let events = resolve(&world);
    assert!(destroyed_ids(&events, false).is_empty());
    assert_eq!(destroyed_ids(&events, true), vec![vec![1, 2]]);
}

// ---- Eagle ----

#[test]
fn test_eagle_is_destroyed_once() {
    let world = world_with(
        vec![tank(1, Side::Ai, 0.0, 0.0)],
        vec![
            bullet(1, 1, 100.0, 195.0, Direction::Down),
            bullet(2, 1, 108.0, 200.0, Direction::Down),
        ],
    );
    let events = resolve(&world);
    let count = events
        .iter()
        .filter(|e| matches!(e, GameEvent::DestroyEagle))
        .count();
    assert_eq!(count, 1);
    assert_eq!(events.last(), Some(&GameEvent::DestroyEagle));

    let broken = world.apply(&GameEvent::DestroyEagle).unwrap().unwrap();
    assert!(broken.eagle.broken);
    let events = resolve(&broken);
    assert!(!events.contains(&GameEvent::DestroyEagle));
}

// ---- Movement ----

#[test]
fn test_step_blocked_at_field_edge() {
    let world = world_with(vec![], vec![]);
    let mut t = tank(1, Side::Player, 0.0, 100.0);
    t.facing = Direction::Left;
    let mut out = Vec::new();
    movement::step(&world, &t, &[Direction::Left], 1.0, &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_step_blocked_by_river() {
    let mut world = world_with(vec![], vec![]);
    // River block at column 2, row 6: x 32..48, y 96..112.
    world.terrain.fill(Material::River, [6 * 13 + 2]);
    let mut t = tank(1, Side::Player, 16.0, 96.0);
    t.facing = Direction::Right;
    let mut out = Vec::new();
    movement::step(&world, &t, &[Direction::Right], 0.5, &mut out);
    assert!(out.is_empty());

    // Snow and forest do not block.
    let mut world = world_with(vec![], vec![]);
    world.terrain.fill(Material::Forest, [6 * 13 + 2]);
    movement::step(&world, &t, &[Direction::Right], 0.5, &mut out);
    assert_eq!(out.len(), 2);
}

#[test]
fn test_held_directions_last_pressed_wins() {
    let mut controller = MovementController::new(PLAYER_TANK_SPEED);
    let world = World::default();
    let mut out = Vec::new();
    for (direction, pressed) in [
        (Direction::Up, true),
        (Direction::Right, true),
        (Direction::Up, true),
    ] {
        let edge = GameEvent::DirectionEdge {
            player: "p1".into(),
            direction,
            pressed,
        };
        controller.handle(&edge, &world, &mut out).unwrap();
    }
    assert_eq!(controller.held("p1"), &[Direction::Up, Direction::Right]);

    let edge = GameEvent::DirectionEdge {
        player: "p1".into(),
        direction: Direction::Up,
        pressed: false,
    };
    controller.handle(&edge, &world, &mut out).unwrap();
    assert_eq!(controller.held("p1"), &[Direction::Right]);
    assert!(out.is_empty());
}

#[test]
fn test_turn_consumes_the_tick() {
    let (mut engine, tank_id) = engine_with_player(0.0, 100.0, Direction::Up);
    engine.queue_command(press(Direction::Right));

    let report = engine.tick(16.0).unwrap();
    assert!(report.events.contains(&GameEvent::Turn {
        tank_id,
        direction: Direction::Right,
    }));
    assert!(!report
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::Move { .. })));
    let tank = engine.world().tanks[&tank_id].clone();
    assert_eq!((tank.x, tank.y), (0.0, 100.0));
    assert_eq!(tank.facing, Direction::Right);

    engine.tick(16.0).unwrap();
    let tank = engine.world().tanks[&tank_id].clone();
    assert!((tank.x - PLAYER_TANK_SPEED * 16.0).abs() < 1e-9);
    assert!(tank.moving);
}

#[test]
fn test_releasing_a_buried_key_keeps_direction() {
    let (mut engine, tank_id) = engine_with_player(0.0, 100.0, Direction::Right);
    engine.queue_commands([press(Direction::Up), press(Direction::Right)]);
    engine.tick(16.0).unwrap();

    engine.queue_command(release(Direction::Up));
    let report = engine.tick(16.0).unwrap();
    assert!(!report
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::Turn { .. })));
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::Move { tank_id: id, .. } if *id == tank_id)));
}

#[test]
fn test_stop_move_emitted_once() {
    let (mut engine, tank_id) = engine_with_player(0.0, 100.0, Direction::Right);
    engine.queue_command(press(Direction::Right));
    let report = engine.tick(16.0).unwrap();
    assert!(report.events.contains(&GameEvent::StartMove { tank_id }));

    engine.queue_command(release(Direction::Right));
    let report = engine.tick(16.0).unwrap();
    assert!(report.events.contains(&GameEvent::StopMove { tank_id }));

    let report = engine.tick(16.0).unwrap();
    assert!(!report.events.contains(&GameEvent::StopMove { tank_id }));
    assert!(!engine.world().tanks[&tank_id].moving);
}

// ---- Fire control ----

#[test]
fn test_fire_respects_cooldown_and_limit() {
    let mut world = world_with(vec![tank(1, Side::Player, 100.0, 100.0)], vec![]);
    let t = world.tanks[&TankId(1)].clone();
    assert!(can_fire(&world, &t));

    world.cooldowns.insert(TankId(1), 300.0);
    world.time.elapsed_ms = 100.0;
    assert!(!can_fire(&world, &t));
    world.time.elapsed_ms = 300.0;
    assert!(can_fire(&world, &t));

    world
        .bullets
        .insert(BulletId(1), bullet(1, 1, 0.0, 0.0, Direction::Up));
    assert!(!can_fire(&world, &t));
}

#[test]
fn test_double_fire_adds_one_bullet() {
    let (mut engine, tank_id) = engine_with_player(100.0, 100.0, Direction::Up);
    engine.queue_commands([Command::Fire { tank_id }, Command::Fire { tank_id }]);
    let report = engine.tick(16.0).unwrap();
    let added = report
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::AddBullet { .. }))
        .count();
    assert_eq!(added, 1);

    let world = engine.world();
    let b = world.bullets.values().next().unwrap();
    assert_eq!(b.owner, tank_id);
    assert_eq!(b.direction, Direction::Up);
    assert_eq!(b.x, 100.0 + (TANK_SIZE - BULLET_SIZE) / 2.0);
    assert_eq!(world.cooldowns[&tank_id], FIRE_COOLDOWN_MS);
}

// ---- Explosions and tank destruction ----

#[test]
fn test_explosion_removed_exactly_once_after_duration() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine
        .apply(GameEvent::SpawnExplosion {
            explosion: Explosion {
                id: ExplosionId(100),
                kind: ExplosionKind::Bullet,
                x: 50.0,
                y: 50.0,
            },
        })
        .unwrap();

    let mut removed_at = Vec::new();
    for _ in 0..10 {
        let report = engine.tick(50.0).unwrap();
        let removals = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RemoveExplosion { .. }))
            .count();
        for _ in 0..removals {
            removed_at.push(report.tick);
        }
    }
    assert_eq!(removed_at, vec![4]);
    assert!(engine.world().explosions.is_empty());
}

#[test]
fn test_exploding_bullet_spawns_centred_explosion() {
    let world = world_with(
        vec![tank(1, Side::Player, 100.0, 150.0)],
        vec![bullet(1, 1, -3.0, 50.0, Direction::Left)],
    );
    let mut engine = SimulationEngine::with_world(SimConfig::default(), world);
    // Advanced 0.12 * 10 = 1.2 left, fully outside.
    engine.tick(10.0).unwrap();
    let world = engine.world();
    assert!(world.bullets.is_empty());
    let explosion = world.explosions.values().next().unwrap();
    assert_eq!(explosion.kind, ExplosionKind::Bullet);
    let centre_x = -3.0 - 1.2 + BULLET_SIZE / 2.0;
    assert!((explosion.x + BULLET_EXPLOSION_SIZE / 2.0 - centre_x).abs() < 1e-9);
    assert!((explosion.y + BULLET_EXPLOSION_SIZE / 2.0 - 51.5).abs() < 1e-9);
}

#[test]
fn test_killing_player_tank_costs_a_life() {
    let (mut engine, player_tank) = engine_with_player(100.0, 100.0, Direction::Up);
    let ai = TankTemplate::ai().at(100.0, 40.0);
    let ai_tank = engine.spawn_tank(&ai).unwrap().unwrap();
    engine.queue_command(Command::Fire { tank_id: ai_tank });

    for _ in 0..60 {
        engine.tick(16.0).unwrap();
        if !engine.world().tanks.contains_key(&player_tank) {
            break;
        }
    }

    let world = engine.world();
    assert!(!world.tanks.contains_key(&player_tank));
    assert!(world.tanks.contains_key(&ai_tank));
    let player = &world.players["p1"];
    assert!(!player.active);
    assert_eq!(player.lives, DEFAULT_PLAYER_LIVES - 1);
    assert!(world
        .explosions
        .values()
        .any(|e| e.kind == ExplosionKind::Tank));
}

// ---- Engine ----

/// Emits a spawn for an already live tank on the first AfterTick it sees.
struct DuplicateSpawn {
    tank: Tank,
    armed: bool,
}

impl Process for DuplicateSpawn {
    fn name(&self) -> &'static str {
        "duplicate_spawn"
    }

    fn handle(
        &mut self,
        event: &GameEvent,
        _world: &World,
        out: &mut Vec<GameEvent>,
    ) -> Result<(), SimError> {
        if matches!(event, GameEvent::AfterTick) && std::mem::take(&mut self.armed) {
            out.push(GameEvent::SpawnTank {
                tank: self.tank.clone(),
            });
        }
        Ok(())
    }
}

#[test]
fn test_duplicate_id_aborts_and_restores() {
    let (mut engine, tank_id) = engine_with_player(0.0, 100.0, Direction::Right);
    engine.register_process(DuplicateSpawn {
        tank: engine.world().tanks[&tank_id].clone(),
        armed: true,
    });
    let before = engine.world();

    engine.queue_commands([press(Direction::Right), Command::Fire { tank_id }]);
    let err = engine.tick(16.0).unwrap_err();
    assert_eq!(
        err,
        SimError::DuplicateId {
            kind: "tank",
            id: tank_id.0
        }
    );
    // Movement, the new bullet and the cooldown are all rolled back.
    assert_eq!(*engine.world(), *before);
    assert_eq!(engine.time().tick, 0);

    // The held key survives the rollback; the fire intent does not.
    let report = engine.tick(16.0).unwrap();
    assert_eq!(report.tick, 1);
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::Move { .. })));
    assert!(!report
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::AddBullet { .. })));
    assert!(engine.world().bullets.is_empty());
}

#[test]
fn test_prepared_world_ids_are_not_reused() {
    // Bullet 1 and explosion 5 are already live when the engine starts.
    let mut world = world_with(
        vec![tank(1, Side::Player, 0.0, 100.0), tank(2, Side::Ai, 150.0, 150.0)],
        vec![bullet(1, 1, -3.0, 20.0, Direction::Left)],
    );
    world.explosions.insert(
        ExplosionId(5),
        Explosion {
            id: ExplosionId(5),
            kind: ExplosionKind::Bullet,
            x: 80.0,
            y: 80.0,
        },
    );
    let mut engine = SimulationEngine::with_world(SimConfig::default(), world);

    engine.queue_command(Command::Fire { tank_id: TankId(2) });
    engine.tick(16.0).unwrap();

    let world = engine.world();
    // Bullet 1 left the field and exploded; tank 2's shot got a fresh id.
    assert!(!world.bullets.contains_key(&BulletId(1)));
    assert_eq!(world.bullets[&BulletId(2)].owner, TankId(2));
    assert!(world.explosions.contains_key(&ExplosionId(5)));
    assert!(world.explosions.contains_key(&ExplosionId(6)));
}

#[test]
fn test_process_order() {
    let engine = SimulationEngine::new(SimConfig::default());
    assert_eq!(
        engine.process_names(),
        vec![
            "movement",
            "fire_control",
            "bullets",
            "explosion_timers",
            "collision",
            "destruction"
        ]
    );
}

#[test]
fn test_spawn_slots_fill_then_refuse() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut xs = Vec::new();
    for _ in 0..3 {
        let id = engine.spawn_tank(&TankTemplate::ai()).unwrap().unwrap();
        xs.push(engine.world().tanks[&id].x as i64);
    }
    xs.sort_unstable();
    assert_eq!(xs, vec![0, 96, 192]);
    assert_eq!(engine.spawn_tank(&TankTemplate::ai()).unwrap(), None);
}

#[test]
fn test_spawn_for_unknown_player_fails() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert!(matches!(
        engine.spawn_player_tank("nobody", &TankTemplate::player()),
        Err(SimError::InvariantViolation(_))
    ));
}

#[test]
fn test_determinism_same_seed() {
    let run = |seed: u64| {
        let level = Level::stage_1().unwrap();
        let mut engine = SimulationEngine::from_level(
            SimConfig {
                seed,
                ..Default::default()
            },
            &level,
        );
        engine.create_player("p1", 3).unwrap();
        let player = engine
            .spawn_player_tank("p1", &TankTemplate::player())
            .unwrap()
            .unwrap();
        let mut ai = Vec::new();
        for _ in 0..3 {
            ai.extend(engine.spawn_tank(&TankTemplate::ai()).unwrap());
        }

        let mut frames = Vec::new();
        for i in 0..200u32 {
            if i % 20 == 0 {
                engine.queue_command(Command::Fire { tank_id: player });
                for &tank_id in &ai {
                    engine.queue_command(Command::Fire { tank_id });
                }
            }
            if i == 10 {
                engine.queue_command(press(Direction::Left));
            }
            engine.tick(16.0).unwrap();
            frames.push(serde_json::to_string(&engine.snapshot()).unwrap());
        }
        frames
    };

    assert_eq!(run(12345), run(12345), "snapshots diverged with same seed");
}

#[test]
fn test_player_stops_at_river_on_stage_1() {
    let level = Level::stage_1().unwrap();
    let mut engine = SimulationEngine::from_level(SimConfig::default(), &level);
    engine.create_player("p1", 3).unwrap();
    let tank_id = engine
        .spawn_player_tank("p1", &TankTemplate::player())
        .unwrap()
        .unwrap();
    engine.queue_command(press(Direction::Up));
    for _ in 0..100 {
        engine.tick(16.0).unwrap();
    }
    let tank = engine.world().tanks[&tank_id].clone();
    assert_eq!(tank.x, PLAYER_SPAWN_X);
    // River block at row 10 spans y 160..176.
    assert!(tank.y > 175.0 && tank.y < 177.0);
}

#[test]
fn test_snapshot_lists_terrain_cells() {
    let level = Level::stage_1().unwrap();
    let engine = SimulationEngine::from_level(SimConfig::default(), &level);
    let snapshot = engine.snapshot();
    assert!(snapshot.terrain.steels.contains(&(6 * 26 + 12)));
    assert_eq!(snapshot.terrain.rivers.len(), 4);
    assert!(!snapshot.eagle.broken);
}
