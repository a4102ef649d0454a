/// Frame similarity and near-duplicate removal.
pub mod dedup;
/// Typestate optimizer stages and the save options/report.
pub mod pipeline;
/// Upload targets, byte budgets and dimension checks.
pub mod profile;
/// Palette synthesis and remapping.
pub mod quantize;
