//! Point-mass particle simulation used to generate animated content.

/// Single particle state and physics step.
pub mod particle;
pub(crate) mod render;
/// Particle collection, burst emitters and rendering.
pub mod system;
