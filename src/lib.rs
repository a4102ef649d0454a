//! gifwright turns procedurally drawn frames into animated GIFs that fit an upload budget.
//!
//! The crate has two halves:
//!
//! - A small particle engine ([`ParticleSystem`]) that simulates point masses under gravity and
//!   drag and draws them onto RGB frames.
//! - A size-constrained GIF pipeline: frames accumulate in a [`FrameSequence`], and
//!   [`FrameSequence::save`] runs them through the optimizer stages.
//!
//! # Pipeline overview
//!
//! 1. **Deduplicate**: drop frames nearly identical to the last kept one.
//! 2. **Fit profile**: for the emoji target, resample to 128x128, keep at most 12 frames and
//!    cap the palette at 48 colours.
//! 3. **Quantize**: build one palette from a sample of frames and remap every frame onto it.
//! 4. **Encode**: write a looping GIF and report its size against the profile budget.
//!
//! Going over budget is reported, not fatal: the artifact is still produced and the returned
//! [`GifReport`] carries warnings and suggestions.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Whole-frame post effects.
pub mod effects;
/// GIF serialization, artifact IO and read-back.
pub mod encode;
mod foundation;
/// RGB frames and frame sequences.
pub mod frame;
/// Deduplication, profiles, quantization and the staged optimizer.
pub mod optimize;
pub mod particles;

pub use crate::effects::blur::motion_blur;
pub use crate::effects::shake::{apply_screen_shake, screen_shake_offset, shake_rng};
pub use crate::encode::gif::{GifEncodeOpts, encode_gif};
pub use crate::encode::probe::{GifProbe, ValidationReport, probe_gif, probe_gif_bytes, validate_gif};
pub use crate::encode::write_artifact;
pub use crate::foundation::core::{Canvas, Fps, Point, Rgb8, Vec2};
pub use crate::foundation::error::{GifwrightError, GifwrightResult};
pub use crate::frame::buffer::FrameRgb;
pub use crate::frame::sequence::FrameSequence;
pub use crate::optimize::dedup::{DedupBaseline, deduplicate, similarity};
pub use crate::optimize::pipeline::{EncodedArtifact, GifReport, SaveOpts, optimize};
pub use crate::optimize::profile::{
    DimensionCheck, DimensionFit, OptimizationProfile, Profile, SizeCheck, check_size,
    optimization_suggestions, validate_dimensions,
};
pub use crate::optimize::quantize::{Dither, Palette, QuantizedSequence, quantize};
pub use crate::particles::particle::{Particle, ParticleShape};
pub use crate::particles::system::{Emission, ParticleSystem};
