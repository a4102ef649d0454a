use std::f64::consts::TAU;

use rand::Rng;

use crate::foundation::core::{Point, Rgb8, Vec2};
use crate::foundation::error::GifwrightResult;
use crate::frame::buffer::FrameRgb;
use crate::particles::particle::{DEFAULT_DRAG, DEFAULT_GRAVITY, Particle, ParticleShape};
use crate::particles::render::render_particles;

/// Colours used by [`ParticleSystem::emit_confetti`] when the caller passes none.
pub const CONFETTI_COLORS: [Rgb8; 6] = [
    Rgb8::new(255, 107, 107),
    Rgb8::new(255, 159, 64),
    Rgb8::new(255, 218, 121),
    Rgb8::new(107, 185, 240),
    Rgb8::new(162, 155, 254),
    Rgb8::new(255, 182, 193),
];

/// Colours used by [`ParticleSystem::emit_sparkles`].
pub const SPARKLE_COLORS: [Rgb8; 3] = [
    Rgb8::new(255, 255, 200),
    Rgb8::new(255, 255, 255),
    Rgb8::new(255, 255, 150),
];

/// Parameters of one radial burst.
///
/// Each particle gets a direction uniform in `[0, angular_spread)`, a speed uniform in
/// `speed * [1 - speed_jitter, 1 + speed_jitter]` and a lifetime uniform in
/// `lifetime * [1 - lifetime_jitter, 1 + lifetime_jitter]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Emission {
    /// Particles to create.
    pub count: usize,
    /// Arc of directions in radians, starting at +x.
    pub angular_spread: f64,
    /// Mean initial speed in pixels per tick.
    pub speed: f64,
    /// Relative speed variation, clamped to `[0, 1]`.
    pub speed_jitter: f64,
    /// Particle colour.
    pub color: Rgb8,
    /// Mean lifetime in ticks.
    pub lifetime: f64,
    /// Relative lifetime variation, clamped to `[0, 1]`.
    pub lifetime_jitter: f64,
    /// Particle size.
    pub size: u32,
    /// Particle shape.
    pub shape: ParticleShape,
    /// Gravity for every emitted particle.
    pub gravity: f64,
    /// Drag for every emitted particle.
    pub drag: f64,
}

impl Default for Emission {
    fn default() -> Self {
        Self {
            count: 10,
            angular_spread: TAU,
            speed: 5.0,
            speed_jitter: 0.5,
            color: Rgb8::new(255, 200, 0),
            lifetime: 20.0,
            lifetime_jitter: 0.3,
            size: 3,
            shape: ParticleShape::Disc,
            gravity: DEFAULT_GRAVITY,
            drag: DEFAULT_DRAG,
        }
    }
}

/// Insertion-ordered set of live particles.
///
/// After every [`ParticleSystem::update`] the collection holds only particles that are still
/// alive.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Live particles in emission order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Return `true` when no particles are alive.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Add one particle with explicit kinematics.
    pub fn spawn(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Emit a radial burst at `origin`. Returns the number of particles added.
    pub fn emit<R: Rng + ?Sized>(&mut self, rng: &mut R, origin: Point, e: &Emission) -> usize {
        let speed_j = e.speed_jitter.clamp(0.0, 1.0);
        let life_j = e.lifetime_jitter.clamp(0.0, 1.0);
        self.particles.reserve(e.count);
        for _ in 0..e.count {
            let angle = if e.angular_spread > 0.0 {
                rng.gen_range(0.0..e.angular_spread)
            } else {
                0.0
            };
            let speed = e.speed * rng.gen_range((1.0 - speed_j)..=(1.0 + speed_j));
            let lifetime = e.lifetime * rng.gen_range((1.0 - life_j)..=(1.0 + life_j));
            let p = Particle::new(
                origin,
                Vec2::from_angle(angle) * speed,
                lifetime,
                e.color,
                e.size,
                e.shape,
            )
            .with_gravity(e.gravity)
            .with_drag(e.drag);
            self.particles.push(p);
        }
        e.count
    }

    /// Burst of falling paper: random squares and discs thrown upward under light gravity.
    ///
    /// An empty `colors` slice selects [`CONFETTI_COLORS`].
    pub fn emit_confetti<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Point,
        count: usize,
        colors: &[Rgb8],
    ) -> usize {
        let colors = if colors.is_empty() {
            &CONFETTI_COLORS[..]
        } else {
            colors
        };
        self.particles.reserve(count);
        for _ in 0..count {
            let color = colors[rng.gen_range(0..colors.len())];
            let velocity = Vec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-8.0..-2.0));
            let shape = if rng.gen_bool(0.5) {
                ParticleShape::Square
            } else {
                ParticleShape::Disc
            };
            let size = rng.gen_range(2..=4);
            let lifetime = rng.gen_range(40.0..60.0);
            let p = Particle::new(origin, velocity, lifetime, color, size, shape).with_gravity(0.3);
            self.particles.push(p);
        }
        count
    }

    /// Short-lived stars drifting outward with no gravity.
    pub fn emit_sparkles<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Point,
        count: usize,
    ) -> usize {
        self.particles.reserve(count);
        for _ in 0..count {
            let color = SPARKLE_COLORS[rng.gen_range(0..SPARKLE_COLORS.len())];
            let angle = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(1.0..3.0);
            let lifetime = rng.gen_range(15.0..30.0);
            let p = Particle::new(
                origin,
                Vec2::from_angle(angle) * speed,
                lifetime,
                color,
                2,
                ParticleShape::Star,
            )
            .with_gravity(0.0)
            .with_drag(0.95);
            self.particles.push(p);
        }
        count
    }

    /// Advance every particle one tick, then drop the dead ones.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.update();
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Draw every live particle onto `frame`, faded by its opacity.
    pub fn render(&self, frame: &mut FrameRgb) -> GifwrightResult<()> {
        render_particles(&self.particles, frame)
    }

    /// Drop every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/system.rs"]
mod tests;
