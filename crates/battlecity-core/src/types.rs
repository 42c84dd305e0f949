//! Fundamental identifier, geometric and timing types.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a live tank.
    TankId,
    "tank"
);
entity_id!(
    /// Identifier of a live bullet.
    BulletId,
    "bullet"
);
entity_id!(
    /// Identifier of a live explosion.
    ExplosionId,
    "explosion"
);

/// Axis-aligned box in world units. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square box of edge `size` at `(x, y)`.
    pub fn square(x: f64, y: f64, size: f64) -> Self {
        Self::new(x, y, size, size)
    }

    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn center(&self) -> DVec2 {
        self.origin() + DVec2::new(self.width, self.height) / 2.0
    }

    /// Inclusive overlap test. A positive `threshold` widens the test on
    /// every side, a negative one shrinks it, so touching edges collide at
    /// threshold zero.
    pub fn collides(&self, other: &Rect, threshold: f64) -> bool {
        between(
            self.x - other.width,
            other.x,
            self.x + self.width,
            threshold,
        ) && between(
            self.y - other.height,
            other.y,
            self.y + self.height,
            threshold,
        )
    }

    /// Box shrunk by `margin` on every side.
    pub fn shrink(&self, margin: f64) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }

    /// Box widened by `margin` on the left and right.
    pub fn widen_x(&self, margin: f64) -> Rect {
        Rect::new(self.x - margin, self.y, self.width + 2.0 * margin, self.height)
    }

    /// Box widened by `margin` above and below.
    pub fn widen_y(&self, margin: f64) -> Rect {
        Rect::new(self.x, self.y - margin, self.width, self.height + 2.0 * margin)
    }
}

fn between(min: f64, value: f64, max: f64, threshold: f64) -> bool {
    min - threshold <= value && value <= max + threshold
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks applied so far.
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl SimTime {
    /// Advance by one tick of `delta_ms`.
    pub fn advance(&mut self, delta_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += delta_ms;
    }
}
