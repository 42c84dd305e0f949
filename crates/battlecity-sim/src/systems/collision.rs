//! Collision resolver.
//!
//! Runs once per tick on `AfterTick`, against the single snapshot it is handed.
//! Phases, in order:
//!
//! 0. bullets vs. the eagle (skipped once the eagle is broken)
//! 1. bullets vs. tanks, classified by (bullet side, tank side)
//! 2. bullets vs. bullets (mutual silent cancellation)
//! 3. bullets vs. brick and steel cells
//!
//! The phases only classify. Destroy batches are built afterwards so every
//! bullet lands in exactly one batch, and an id marked exploding is never
//! downgraded to silent.

use std::collections::BTreeSet;

use battlecity_core::components::Bullet;
use battlecity_core::constants::{STEEL_POWER, TANK_HIT_TOLERANCE};
use battlecity_core::enums::{Material, Side};
use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;
use battlecity_core::types::{BulletId, TankId};

use crate::dispatcher::Process;
use crate::queries::{self, bullet_box, eagle_box, spread_box, tank_box};
use crate::world::World;

pub struct CollisionResolver;

impl Process for CollisionResolver {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn handle(
        &mut self,
        event: &GameEvent,
        world: &World,
        out: &mut Vec<GameEvent>,
    ) -> Result<(), SimError> {
        if matches!(event, GameEvent::AfterTick) {
            out.extend(resolve(world));
        }
        Ok(())
    }
}

/// What happens when a bullet reaches a tank of another owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Bullet explodes, the tank is unharmed.
    FriendlyFire,
    /// Bullet explodes and the tank takes damage.
    Damage,
    /// Bullet vanishes without an explosion, the tank is unharmed.
    Absorbed,
}

pub fn classify_hit(bullet_side: Side, tank_side: Side) -> HitOutcome {
    match (bullet_side, tank_side) {
        (Side::Player, Side::Player) => HitOutcome::FriendlyFire,
        (Side::Player, Side::Ai) | (Side::Ai, Side::Player) => HitOutcome::Damage,
        (Side::Ai, Side::Ai) => HitOutcome::Absorbed,
    }
}

/// Per-pass classification state.
#[derive(Debug, Default)]
struct Marks {
    exploding: BTreeSet<BulletId>,
    silent: BTreeSet<BulletId>,
    hurt_tanks: BTreeSet<TankId>,
    eagle_hit: bool,
}

/// Run every phase against `world` and return the resulting events.
///
/// Order of the output: exploding bullets, brick removals, steel removals,
/// silent bullets, out-of-field bullets, tank damage, eagle destruction.
pub fn resolve(world: &World) -> Vec<GameEvent> {
    let mut marks = Marks::default();
    check_eagle(world, &mut marks);
    check_tanks(world, &mut marks);
    check_bullet_pairs(world, &mut marks);
    check_terrain(world, &mut marks);
    build_events(world, marks)
}

fn check_eagle(world: &World, marks: &mut Marks) {
    if world.eagle.broken {
        return;
    }
    let eagle = eagle_box(&world.eagle);
    for bullet in world.bullets.values() {
        if eagle.collides(&bullet_box(bullet), 0.0) {
            marks.exploding.insert(bullet.id);
            marks.eagle_hit = true;
        }
    }
}

fn check_tanks(world: &World, marks: &mut Marks) {
    for bullet in world.bullets.values() {
        let Some(bullet_side) = queries::side_of_bullet(world, bullet.id) else {
            log::debug!("{} has no live owner, skipping tank checks", bullet.id);
            continue;
        };
        let bbox = bullet_box(bullet);
        for tank in world.tanks.values() {
            if tank.id == bullet.owner {
                continue;
            }
            if !tank_box(tank).collides(&bbox, -TANK_HIT_TOLERANCE) {
                continue;
            }
            match classify_hit(bullet_side, tank.side) {
                HitOutcome::FriendlyFire => {
                    marks.exploding.insert(bullet.id);
                }
                HitOutcome::Damage => {
                    marks.hurt_tanks.insert(tank.id);
                    marks.exploding.insert(bullet.id);
                }
                HitOutcome::Absorbed => {
                    marks.silent.insert(bullet.id);
                }
            }
        }
    }
}

fn check_bullet_pairs(world: &World, marks: &mut Marks) {
    let bullets: Vec<&Bullet> = world.bullets.values().collect();
    for (i, a) in bullets.iter().enumerate() {
        let abox = bullet_box(a);
        for b in &bullets[i + 1..] {
            if abox.collides(&bullet_box(b), 0.0) {
                marks.silent.insert(a.id);
                marks.silent.insert(b.id);
            }
        }
    }
}

fn check_terrain(world: &World, marks: &mut Marks) {
    for bullet in world.bullets.values() {
        let bbox = bullet_box(bullet);
        if world.terrain.overlaps(Material::Brick, &bbox)
            || world.terrain.overlaps(Material::Steel, &bbox)
        {
            marks.exploding.insert(bullet.id);
        }
    }
}

fn build_events(world: &World, marks: Marks) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let exploding: Vec<Bullet> = select(world, |id| marks.exploding.contains(id));
    if !exploding.is_empty() {
        let (bricks, steels) = terrain_sweep(world, &exploding);
        log::debug!(
            "destroying {} bullets with explosion, {} bricks, {} steels",
            exploding.len(),
            bricks.len(),
            steels.len()
        );
        events.push(GameEvent::DestroyBullets {
            bullets: exploding,
            spawn_explosion: true,
        });
        if !bricks.is_empty() {
            events.push(GameEvent::DestroyBricks { cells: bricks });
        }
        if !steels.is_empty() {
            events.push(GameEvent::DestroySteels { cells: steels });
        }
    }

    // Bullets entirely off the field always explode, even if also marked silent.
    let off_field: BTreeSet<BulletId> = world
        .bullets
        .values()
        .filter(|b| !marks.exploding.contains(&b.id))
        .filter(|b| queries::is_entirely_outside_field(&bullet_box(b)))
        .map(|b| b.id)
        .collect();

    let silent: Vec<Bullet> = select(world, |id| {
        marks.silent.contains(id) && !marks.exploding.contains(id) && !off_field.contains(id)
    });
    if !silent.is_empty() {
        log::debug!("destroying {} bullets silently", silent.len());
        events.push(GameEvent::DestroyBullets {
            bullets: silent,
            spawn_explosion: false,
        });
    }

    let outside: Vec<Bullet> = select(world, |id| off_field.contains(id));
    if !outside.is_empty() {
        events.push(GameEvent::DestroyBullets {
            bullets: outside,
            spawn_explosion: true,
        });
    }

    events.extend(
        marks
            .hurt_tanks
            .iter()
            .map(|&tank_id| GameEvent::HurtTank { tank_id }),
    );

    if marks.eagle_hit {
        log::info!("eagle destroyed at tick {}", world.time.tick);
        events.push(GameEvent::DestroyEagle);
    }

    events
}

fn select(world: &World, keep: impl Fn(&BulletId) -> bool) -> Vec<Bullet> {
    world
        .bullets
        .values()
        .filter(|bullet| keep(&bullet.id))
        .cloned()
        .collect()
}

/// Present brick cells, and steel cells for bullets with enough power, under
/// the spread boxes of `bullets`. Indices from all bullets are unioned.
pub fn terrain_sweep(world: &World, bullets: &[Bullet]) -> (BTreeSet<usize>, BTreeSet<usize>) {
    let mut bricks = BTreeSet::new();
    let mut steels = BTreeSet::new();
    for bullet in bullets {
        let spread = spread_box(bullet);
        bricks.extend(world.terrain.present_cells_in(Material::Brick, &spread));
        if bullet.power >= STEEL_POWER {
            steels.extend(world.terrain.present_cells_in(Material::Steel, &spread));
        }
    }
    (bricks, steels)
}
