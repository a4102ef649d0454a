/// Owned RGB8 frame buffer.
pub mod buffer;
/// Frame accumulation at a fixed canvas and frame rate.
pub mod sequence;
