use crate::foundation::core::{Point, Rgb8, Vec2};

/// Default downward acceleration in pixels per tick squared.
pub const DEFAULT_GRAVITY: f64 = 0.5;
/// Default per-tick velocity multiplier.
pub const DEFAULT_DRAG: f64 = 0.98;

/// How a particle is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleShape {
    /// Filled circle.
    #[default]
    Disc,
    /// Filled axis-aligned square.
    Square,
    /// Four-point cross.
    Star,
}

/// A point mass with a finite lifetime measured in ticks.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Particle {
    /// Position in canvas pixels.
    pub position: Point,
    /// Displacement per tick.
    pub velocity: Vec2,
    /// Ticks remaining.
    pub lifetime: f64,
    /// Lifetime at creation; opacity is `lifetime / max_lifetime`.
    pub max_lifetime: f64,
    /// Colour at full opacity.
    pub color: Rgb8,
    /// Radius (disc), half-extent (square) or arm length (star) in pixels.
    pub size: u32,
    /// Drawn shape.
    pub shape: ParticleShape,
    /// Added to `velocity.y` every tick.
    pub gravity: f64,
    /// Multiplies velocity every tick.
    pub drag: f64,
}

impl Particle {
    /// Create a particle with default gravity and drag.
    pub fn new(
        position: Point,
        velocity: Vec2,
        lifetime: f64,
        color: Rgb8,
        size: u32,
        shape: ParticleShape,
    ) -> Self {
        Self {
            position,
            velocity,
            lifetime,
            max_lifetime: lifetime,
            color,
            size,
            shape,
            gravity: DEFAULT_GRAVITY,
            drag: DEFAULT_DRAG,
        }
    }

    /// Override gravity.
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Override drag.
    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    /// Advance one tick: gravity, then drag, then position, then lifetime.
    pub fn update(&mut self) {
        self.velocity.y += self.gravity;
        self.velocity *= self.drag;
        self.position += self.velocity;
        self.lifetime -= 1.0;
    }

    /// Alive while lifetime is positive.
    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// `lifetime / max_lifetime` clamped to `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        if self.max_lifetime <= 0.0 {
            return 0.0;
        }
        (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/particle.rs"]
mod tests;
