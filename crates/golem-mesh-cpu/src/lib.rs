//! CPU meshing crate: voxel-face quad emission and mesh registration.
#![forbid(unsafe_code)]

use golem_geom::{Aabb, Vec3};
use golem_grid::VoxelGrid;

pub mod face;
pub mod registry;

pub use face::Face;
pub use registry::{MeshId, MeshRegistry, MeshStore};

/// Flat vertex/index arrays for one mesh: position, normal, and RGBA color
/// per vertex, `u32` triangle indices.
#[derive(Default, Clone)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub col: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    /// Appends a unit quad on `face` of the voxel centered at `center`.
    ///
    /// Corners run `+t+b, -t+b, -t-b, +t-b` around the face normal, fanned
    /// as `(0,1,2)` `(0,2,3)`; all four share `face`'s normal and `color`.
    pub fn add_quad(&mut self, center: Vec3, face: Face, color: [f32; 4]) {
        let n = face.normal();
        let t = face.tangent();
        let b = face.bitangent();
        let base = (self.pos.len() / 3) as u32;
        let corners = [
            center + n * 0.5 + t * 0.5 + b * 0.5,
            center + n * 0.5 - t * 0.5 + b * 0.5,
            center + n * 0.5 - t * 0.5 - b * 0.5,
            center + n * 0.5 + t * 0.5 - b * 0.5,
        ];
        for c in corners {
            self.pos.extend_from_slice(&[c.x, c.y, c.z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.col.extend_from_slice(&color);
        }
        self.idx.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.idx.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Bounding box over all vertices; `None` for an empty build.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut points = self.pos.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2]));
        let first = points.next()?;
        let mut bb = Aabb::new(first, first);
        for p in points {
            bb.expand(p);
        }
        Some(bb)
    }
}

/// Emits one quad per visible voxel face of `grid`.
///
/// A face is visible when the neighboring cell inside the grid is empty, or
/// when it lies on the outer boundary and `grid.show_boundaries` is set.
/// Neighbor tests deliberately do not wrap: the torus addressing is a
/// storage property, not a visibility one.
pub fn build_grid_mesh(grid: &VoxelGrid) -> MeshBuild {
    let (sx, sy, sz) = (grid.sx as i32, grid.sy as i32, grid.sz as i32);
    let offset = if grid.centered { grid.center() } else { Vec3::ZERO };
    let mut build = MeshBuild::default();

    for x in 0..sx {
        for y in 0..sy {
            for z in 0..sz {
                let value = grid.get(x, y, z);
                if value == 0 {
                    continue;
                }
                let Some(tile) = grid.palette.get(value) else {
                    continue;
                };
                let center = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5) - offset;
                for f in Face::ALL {
                    let (dx, dy, dz) = f.delta();
                    let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                    let inside =
                        nx >= 0 && nx < sx && ny >= 0 && ny < sy && nz >= 0 && nz < sz;
                    let visible = if inside {
                        grid.get(nx, ny, nz) == 0
                    } else {
                        grid.show_boundaries
                    };
                    if visible {
                        build.add_quad(center, f, tile.color);
                    }
                }
            }
        }
    }
    build
}

/// Synthesizes (or re-synthesizes) the mesh for `grid` into `reg`.
///
/// No-op when the grid is unchanged since the last synthesis. Otherwise the
/// build replaces the grid's existing mesh in place, or registers a fresh
/// handle if the grid never had one.
pub fn synthesize_grid_mesh(grid: &mut VoxelGrid, reg: &mut dyn MeshRegistry) -> MeshId {
    if grid.mesh_id != 0 && !grid.is_mesh_dirty() {
        return grid.mesh_id;
    }
    let build = build_grid_mesh(grid);
    log::debug!(
        "mesh for {}x{}x{} grid: {} vertices, {} indices",
        grid.sx,
        grid.sy,
        grid.sz,
        build.vertex_count(),
        build.index_count()
    );
    if grid.mesh_id == 0 {
        grid.mesh_id = reg.create(build);
    } else {
        reg.update(grid.mesh_id, build);
    }
    grid.mark_mesh_built();
    grid.mesh_id
}
