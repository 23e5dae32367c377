//! Composite tile grid: pre-meshed sub-tiles placed on a coarse grid with
//! discrete cube-symmetry rotations.
#![forbid(unsafe_code)]

use golem_geom::{Mat3, Mat4, Vec3};
use golem_grid::VoxelGrid;
use golem_mesh_cpu::{MeshId, MeshRegistry, synthesize_grid_mesh};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMapError {
    /// Write rejected because the tile index does not reference the palette.
    TileOutOfRange { value: u16, limit: usize },
    /// Write rejected because the rotation code is not a cube symmetry.
    InvalidRotation { code: u16 },
}

impl std::fmt::Display for TileMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileMapError::TileOutOfRange { value, limit } => {
                write!(f, "tile index {} out of range: 0 - {}", value, limit)
            }
            TileMapError::InvalidRotation { code } => {
                write!(f, "invalid rotation code {}", code)
            }
        }
    }
}

impl std::error::Error for TileMapError {}

/// One cell: a palette index (0 = empty) and a rotation code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileRef {
    pub index: u16,
    pub rot: u16,
}

impl TileRef {
    pub const EMPTY: TileRef = TileRef { index: 0, rot: 0 };
}

/// Palette element of a composite tile grid: anything that can produce a
/// mesh handle on demand.
pub trait MeshedTile {
    /// Current handle, 0 while never meshed.
    fn mesh_id(&self) -> MeshId;
    /// Returns the handle, synthesizing the mesh first if missing or stale.
    fn ensure_mesh(&mut self, reg: &mut dyn MeshRegistry) -> MeshId;
}

impl MeshedTile for VoxelGrid {
    fn mesh_id(&self) -> MeshId {
        self.mesh_id
    }

    fn ensure_mesh(&mut self, reg: &mut dyn MeshRegistry) -> MeshId {
        synthesize_grid_mesh(self, reg)
    }
}

/// One draw-submission record for the renderer collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub mesh: MeshId,
    pub transform: Mat4,
}

/// Dense coarse grid of `(tile, rotation)` cells over a palette of meshed
/// tiles. Same wrap-around addressing as `VoxelGrid`; the renderable list
/// is rebuilt lazily after mutations.
pub struct TileMap<T: MeshedTile> {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    /// Tile palette; index 0 is the reserved empty tile.
    pub palette: Vec<T>,
    /// World-space spacing between neighboring cells.
    pub tile_size: f32,
    content: Vec<TileRef>,
    renderables: Vec<Placement>,
    dirty_rev: u64,
    built_rev: u64,
}

impl<T: MeshedTile> TileMap<T> {
    pub fn new(palette: Vec<T>, sx: usize, sy: usize, sz: usize, tile_size: f32) -> Self {
        assert!(sx > 0 && sy > 0 && sz > 0, "tilemap dimensions must be positive");
        assert!(!palette.is_empty(), "tile palette needs the reserved slot 0");
        Self {
            sx,
            sy,
            sz,
            palette,
            tile_size,
            content: vec![TileRef::EMPTY; sx * sy * sz],
            renderables: Vec::new(),
            dirty_rev: 1,
            built_rev: 0,
        }
    }

    /// Cubic map with equal extent along every axis.
    pub fn cube(palette: Vec<T>, size: usize, tile_size: f32) -> Self {
        Self::new(palette, size, size, size, tile_size)
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        let x = x.rem_euclid(self.sx as i32) as usize;
        let y = y.rem_euclid(self.sy as i32) as usize;
        let z = z.rem_euclid(self.sz as i32) as usize;
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> u16 {
        self.content[self.index(x, y, z)].index
    }

    #[inline]
    pub fn get_rot(&self, x: i32, y: i32, z: i32) -> u16 {
        self.content[self.index(x, y, z)].rot
    }

    #[inline]
    pub fn get_raw(&self, x: i32, y: i32, z: i32) -> TileRef {
        self.content[self.index(x, y, z)]
    }

    /// Palette tile referenced at wrapped coordinates; `None` when empty.
    pub fn get_tile(&self, x: i32, y: i32, z: i32) -> Option<&T> {
        match self.get(x, y, z) {
            0 => None,
            v => self.palette.get(v as usize),
        }
    }

    fn check_index(&self, value: u16) -> Result<(), TileMapError> {
        if value as usize >= self.palette.len() {
            return Err(TileMapError::TileOutOfRange {
                value,
                limit: self.palette.len(),
            });
        }
        Ok(())
    }

    fn check_rot(&self, code: u16) -> Result<(), TileMapError> {
        let ok = u8::try_from(code)
            .map(golem_symmetry::is_valid)
            .unwrap_or(false);
        if ok { Ok(()) } else { Err(TileMapError::InvalidRotation { code }) }
    }

    /// Stores a tile index, preserving the cell's rotation.
    pub fn set(&mut self, x: i32, y: i32, z: i32, value: u16) -> Result<(), TileMapError> {
        self.check_index(value)?;
        let idx = self.index(x, y, z);
        self.content[idx].index = value;
        self.bump_rev();
        Ok(())
    }

    /// Stores a rotation code, preserving the cell's tile index.
    pub fn set_rot(&mut self, x: i32, y: i32, z: i32, code: u16) -> Result<(), TileMapError> {
        self.check_rot(code)?;
        let idx = self.index(x, y, z);
        self.content[idx].rot = code;
        self.bump_rev();
        Ok(())
    }

    /// Stores a whole cell, checking both halves before touching it.
    pub fn set_raw(&mut self, x: i32, y: i32, z: i32, value: TileRef) -> Result<(), TileMapError> {
        self.check_index(value.index)?;
        self.check_rot(value.rot)?;
        let idx = self.index(x, y, z);
        self.content[idx] = value;
        self.bump_rev();
        Ok(())
    }

    /// Geometric center of the map volume, in cell units.
    #[inline]
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.sx as f32, self.sy as f32, self.sz as f32) * 0.5
    }

    /// Placement records for every non-empty cell.
    ///
    /// Rebuilt on the first call after a mutation, triggering mesh synthesis
    /// for any palette tile that has none yet; cached otherwise.
    pub fn renderables(&mut self, reg: &mut dyn MeshRegistry) -> &[Placement] {
        if self.built_rev != self.dirty_rev {
            self.renderables.clear();
            for x in 0..self.sx as i32 {
                for y in 0..self.sy as i32 {
                    for z in 0..self.sz as i32 {
                        let cell = self.content[self.index(x, y, z)];
                        if cell.index == 0 {
                            continue;
                        }
                        let Some(tile) = self.palette.get_mut(cell.index as usize) else {
                            continue;
                        };
                        let mesh = tile.ensure_mesh(reg);
                        let rot = golem_symmetry::matrix(cell.rot as u8)
                            .copied()
                            .unwrap_or(Mat3::IDENTITY);
                        let pos = Vec3::new(x as f32, y as f32, z as f32) * self.tile_size;
                        self.renderables.push(Placement {
                            mesh,
                            transform: Mat4::from_translation(pos) * Mat4::from_mat3(rot),
                        });
                    }
                }
            }
            self.built_rev = self.dirty_rev;
        }
        &self.renderables
    }

    #[inline]
    fn bump_rev(&mut self) {
        self.dirty_rev = self.dirty_rev.wrapping_add(1).max(1);
    }
}
