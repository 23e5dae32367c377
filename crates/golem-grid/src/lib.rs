//! Palette-indexed voxel grid and tile palette crate.
#![forbid(unsafe_code)]

pub mod grid;
pub mod palette;

// Re-exports for convenience (match original crate layout)
pub use grid::{GridError, VoxelGrid};
pub use palette::{Palette, Tile};
