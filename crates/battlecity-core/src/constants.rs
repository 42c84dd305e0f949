//! Simulation constants and tuning parameters.
//!
//! Distances are world units, durations are milliseconds and speeds are
//! world units per millisecond.

/// Default tick source frequency (Hz).
pub const TICK_RATE: u32 = 60;

/// Milliseconds per tick at the default tick rate.
pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- Field ---

/// World units per block.
pub const BLOCK_SIZE: f64 = 16.0;

/// Field edge length in blocks (the field is square).
pub const FIELD_BLOCKS: usize = 13;

/// Field edge length in world units.
pub const FIELD_SIZE: f64 = BLOCK_SIZE * FIELD_BLOCKS as f64;

/// Largest coordinate a tank may occupy on either axis.
pub const TANK_MAX_COORD: f64 = BLOCK_SIZE * (FIELD_BLOCKS - 1) as f64;

// --- Footprints ---

/// Tank edge length.
pub const TANK_SIZE: f64 = BLOCK_SIZE;

/// Bullet edge length.
pub const BULLET_SIZE: f64 = 3.0;

/// Eagle (base) edge length.
pub const EAGLE_SIZE: f64 = BLOCK_SIZE;

/// Default eagle position: bottom row, centre column.
pub const EAGLE_X: f64 = 6.0 * BLOCK_SIZE;
pub const EAGLE_Y: f64 = 12.0 * BLOCK_SIZE;

// --- Collision ---

/// Minimum bullet power that removes steel.
pub const STEEL_POWER: u32 = 3;

/// Lateral margin added on each side of a bullet's box for terrain sweeps.
pub const BULLET_EXPLOSION_SPREAD: f64 = 4.0;

/// Inward tolerance for bullet/tank overlap; rejects grazing contacts.
pub const TANK_HIT_TOLERANCE: f64 = 0.02;

/// Inward tolerance for tank movement checks against terrain and tanks.
pub const TANK_TERRAIN_TOLERANCE: f64 = 0.01;

// --- Tanks ---

/// Player tank movement speed (48 units per second).
pub const PLAYER_TANK_SPEED: f64 = 48.0 / 1000.0;

/// Hit points of a freshly spawned tank.
pub const DEFAULT_TANK_HP: u32 = 1;

/// Speed of a bullet fired by a basic tank.
pub const DEFAULT_BULLET_SPEED: f64 = 120.0 / 1000.0;

/// Power of a bullet fired by a basic tank.
pub const DEFAULT_BULLET_POWER: u32 = 1;

/// Minimum time between two shots of the same tank.
pub const FIRE_COOLDOWN_MS: f64 = 300.0;

/// Live bullets a single tank may own at once.
pub const MAX_LIVE_BULLETS_PER_TANK: usize = 1;

/// Lives a newly created player starts with.
pub const DEFAULT_PLAYER_LIVES: u32 = 3;

// --- Spawning ---

/// X coordinates of the top-row spawn slots (y = 0).
pub const SPAWN_SLOTS_X: [f64; 3] = [0.0, 6.0 * BLOCK_SIZE, 12.0 * BLOCK_SIZE];

/// Where the first player's tank enters the field.
pub const PLAYER_SPAWN_X: f64 = 4.0 * BLOCK_SIZE;
pub const PLAYER_SPAWN_Y: f64 = 12.0 * BLOCK_SIZE;

// --- Explosions ---

pub const BULLET_EXPLOSION_SIZE: f64 = 12.0;
pub const TANK_EXPLOSION_SIZE: f64 = 32.0;

/// How long an explosion stays on screen before its removal fires.
pub const BULLET_EXPLOSION_DURATION_MS: f64 = 200.0;
pub const TANK_EXPLOSION_DURATION_MS: f64 = 500.0;
