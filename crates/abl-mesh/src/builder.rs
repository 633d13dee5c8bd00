//! Structured box mesh builder.

use abl_core::{Real, Vec3};

use crate::error::{MeshError, MeshResult};
use crate::mesh::{Mesh, MeshParts, PatchKind};

/// Names of the six physical patches, in face order.
pub const BOX_PATCHES: [&str; 6] = ["west", "east", "south", "north", "lower", "upper"];

/// Builder for a uniform hexahedral box mesh.
///
/// The `lower` patch is a wall (the ground); the other five sides are
/// generic patches. `decompose` cuts the box into slabs along x, one per
/// partition, with `Processor` patches on the cut planes.
#[derive(Debug, Clone)]
pub struct BoxMeshBuilder {
    cells: [usize; 3],
    lengths: [Real; 3],
    origin: Vec3,
}

impl BoxMeshBuilder {
    pub fn new(cells: [usize; 3], lengths: [Real; 3]) -> Self {
        Self {
            cells,
            lengths,
            origin: Vec3::zeros(),
        }
    }

    pub fn origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn n_global_cells(&self) -> usize {
        self.cells.iter().product()
    }

    /// Build the whole box as a single partition.
    pub fn build(&self) -> MeshResult<Mesh> {
        self.check()?;
        self.build_slab(0, self.cells[0], 0, 1)
    }

    /// Build `n_parts` slabs along x. Partition `r` is returned at index `r`.
    pub fn decompose(&self, n_parts: usize) -> MeshResult<Vec<Mesh>> {
        self.check()?;
        let nx = self.cells[0];
        if n_parts == 0 || n_parts > nx {
            return Err(MeshError::InvalidSpec {
                what: format!("cannot split {nx} x-cells into {n_parts} partitions"),
            });
        }
        (0..n_parts)
            .map(|rank| {
                let i0 = rank * nx / n_parts;
                let i1 = (rank + 1) * nx / n_parts;
                self.build_slab(i0, i1, rank, n_parts)
            })
            .collect()
    }

    fn check(&self) -> MeshResult<()> {
        if self.cells.contains(&0) {
            return Err(MeshError::InvalidSpec {
                what: format!("cell counts must be positive, got {:?}", self.cells),
            });
        }
        if self.lengths.iter().any(|l| !(l.is_finite() && *l > 0.0)) {
            return Err(MeshError::InvalidSpec {
                what: format!("lengths must be positive, got {:?}", self.lengths),
            });
        }
        Ok(())
    }

    fn build_slab(&self, i0: usize, i1: usize, rank: usize, n_parts: usize) -> MeshResult<Mesh> {
        let [nx, ny, nz] = self.cells;
        let dx = self.lengths[0] / nx as Real;
        let dy = self.lengths[1] / ny as Real;
        let dz = self.lengths[2] / nz as Real;
        let nxl = i1 - i0;

        let local = |i: usize, j: usize, k: usize| (i - i0) + nxl * (j + ny * k);
        let centre = |i: usize, j: usize, k: usize| {
            self.origin
                + Vec3::new(
                    (i as Real + 0.5) * dx,
                    (j as Real + 0.5) * dy,
                    (k as Real + 0.5) * dz,
                )
        };

        let n_cells = nxl * ny * nz;
        let mut parts = MeshParts {
            cell_centres: Vec::with_capacity(n_cells),
            cell_volumes: vec![dx * dy * dz; n_cells],
            global_cells: Vec::with_capacity(n_cells),
            n_global_cells: self.n_global_cells(),
            ..MeshParts::default()
        };

        for k in 0..nz {
            for j in 0..ny {
                for i in i0..i1 {
                    parts.cell_centres.push(centre(i, j, k));
                    parts.global_cells.push(i + nx * (j + ny * k));
                }
            }
        }

        // Internal faces, visited in owner order so owner < neighbour holds.
        let ax = Vec3::new(dy * dz, 0.0, 0.0);
        let ay = Vec3::new(0.0, dx * dz, 0.0);
        let az = Vec3::new(0.0, 0.0, dx * dy);
        for k in 0..nz {
            for j in 0..ny {
                for i in i0..i1 {
                    let c = centre(i, j, k);
                    let owner = local(i, j, k);
                    let mut push = |n: usize, area: Vec3, offset: Vec3| {
                        parts.owner.push(owner);
                        parts.neighbour.push(n);
                        parts.face_areas.push(area);
                        parts.face_centres.push(c + offset);
                    };
                    if i + 1 < i1 {
                        push(local(i + 1, j, k), ax, Vec3::new(0.5 * dx, 0.0, 0.0));
                    }
                    if j + 1 < ny {
                        push(local(i, j + 1, k), ay, Vec3::new(0.0, 0.5 * dy, 0.0));
                    }
                    if k + 1 < nz {
                        push(local(i, j, k + 1), az, Vec3::new(0.0, 0.0, 0.5 * dz));
                    }
                }
            }
        }

        let mut boundary = |cells: Vec<(usize, usize, usize)>, area: Vec3, offset: Vec3| {
            let size = cells.len();
            for (i, j, k) in cells {
                parts.owner.push(local(i, j, k));
                parts.face_areas.push(area);
                parts.face_centres.push(centre(i, j, k) + offset);
            }
            size
        };

        let x_plane = |i: usize| -> Vec<(usize, usize, usize)> {
            (0..nz)
                .flat_map(|k| (0..ny).map(move |j| (i, j, k)))
                .collect()
        };
        let y_plane = |j: usize| -> Vec<(usize, usize, usize)> {
            (0..nz)
                .flat_map(|k| (i0..i1).map(move |i| (i, j, k)))
                .collect()
        };
        let z_plane = |k: usize| -> Vec<(usize, usize, usize)> {
            (0..ny)
                .flat_map(|j| (i0..i1).map(move |i| (i, j, k)))
                .collect()
        };

        // Physical patches exist on every partition, possibly empty.
        let west = if i0 == 0 { x_plane(0) } else { Vec::new() };
        let east = if i1 == nx { x_plane(nx - 1) } else { Vec::new() };
        let sizes = [
            boundary(west, -ax, Vec3::new(-0.5 * dx, 0.0, 0.0)),
            boundary(east, ax, Vec3::new(0.5 * dx, 0.0, 0.0)),
            boundary(y_plane(0), -ay, Vec3::new(0.0, -0.5 * dy, 0.0)),
            boundary(y_plane(ny - 1), ay, Vec3::new(0.0, 0.5 * dy, 0.0)),
            boundary(z_plane(0), -az, Vec3::new(0.0, 0.0, -0.5 * dz)),
            boundary(z_plane(nz - 1), az, Vec3::new(0.0, 0.0, 0.5 * dz)),
        ];

        let mut patches: Vec<(String, PatchKind, usize)> = BOX_PATCHES
            .iter()
            .zip(sizes)
            .map(|(name, size)| {
                let kind = if *name == "lower" {
                    PatchKind::Wall
                } else {
                    PatchKind::Patch
                };
                (name.to_string(), kind, size)
            })
            .collect();

        if n_parts > 1 {
            if rank > 0 {
                let size = boundary(x_plane(i0), -ax, Vec3::new(-0.5 * dx, 0.0, 0.0));
                patches.push((
                    format!("procBoundary{}to{}", rank, rank - 1),
                    PatchKind::Processor {
                        neighbour_rank: rank - 1,
                    },
                    size,
                ));
            }
            if rank + 1 < n_parts {
                let size = boundary(x_plane(i1 - 1), ax, Vec3::new(0.5 * dx, 0.0, 0.0));
                patches.push((
                    format!("procBoundary{}to{}", rank, rank + 1),
                    PatchKind::Processor {
                        neighbour_rank: rank + 1,
                    },
                    size,
                ));
            }
        }

        parts.patches = patches;
        Mesh::from_parts(parts)
    }
}
