/// Core value types (frame rate, canvas, colour).
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
