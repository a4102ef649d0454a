//! Whole-frame post effects applied by drawing code before frames reach a sequence.

/// Blend with the previous frame.
pub mod blur;
/// Random whole-frame translation.
pub mod shake;
