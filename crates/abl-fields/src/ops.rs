//! Finite-volume interpolation and Gauss gradients.

use abl_core::{Real, Tensor, Vec3};
use abl_mesh::Mesh;
use rayon::prelude::*;

use crate::field::VolField;
use crate::value::FieldValue;

/// Linear interpolation of cell values onto the internal faces.
pub fn interpolate<T: FieldValue>(mesh: &Mesh, field: &VolField<T>) -> Vec<T> {
    let weights = mesh.interpolation_weights();
    let owner = mesh.owner();
    let neighbour = mesh.neighbour();
    let cells = field.internal();
    weights
        .iter()
        .enumerate()
        .map(|(f, &w)| cells[owner[f]] * w + cells[neighbour[f]] * (1.0 - w))
        .collect()
}

/// Values on every mesh face: interpolated internal faces, then boundary values.
pub fn face_values<T: FieldValue>(mesh: &Mesh, field: &VolField<T>) -> Vec<T> {
    let mut values = interpolate(mesh, field);
    values.reserve(mesh.n_boundary_faces());
    for pf in field.patches() {
        values.extend_from_slice(pf.values());
    }
    values
}

/// Gauss gradient from a full set of face values.
pub fn gauss_grad(mesh: &Mesh, faces: &[Real]) -> Vec<Vec3> {
    let owner = mesh.owner();
    let neighbour = mesh.neighbour();
    let areas = mesh.face_areas();
    let mut grad = vec![Vec3::zeros(); mesh.n_cells()];
    for (f, &phi) in faces.iter().enumerate() {
        let flux = areas[f] * phi;
        grad[owner[f]] += flux;
        if f < neighbour.len() {
            grad[neighbour[f]] -= flux;
        }
    }
    grad.par_iter_mut()
        .zip(mesh.cell_volumes().par_iter())
        .for_each(|(g, &v)| *g /= v);
    grad
}

pub fn grad_scalar(mesh: &Mesh, field: &VolField<Real>) -> Vec<Vec3> {
    gauss_grad(mesh, &face_values(mesh, field))
}

/// Velocity gradient with `grad(U)[(i, j)] = d U_j / d x_i`.
pub fn grad_vector(mesh: &Mesh, field: &VolField<Vec3>) -> Vec<Tensor> {
    let faces = face_values(mesh, field);
    let owner = mesh.owner();
    let neighbour = mesh.neighbour();
    let areas = mesh.face_areas();
    let mut grad = vec![Tensor::zeros(); mesh.n_cells()];
    for (f, uf) in faces.iter().enumerate() {
        let flux = areas[f] * uf.transpose();
        grad[owner[f]] += flux;
        if f < neighbour.len() {
            grad[neighbour[f]] -= flux;
        }
    }
    grad.par_iter_mut()
        .zip(mesh.cell_volumes().par_iter())
        .for_each(|(g, &v)| *g /= v);
    grad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryCondition;
    use abl_mesh::BoxMeshBuilder;

    fn linear_in_z(mesh: &Mesh) -> VolField<Real> {
        let mut f = VolField::uniform(mesh, "T", 0.0, |_| BoundaryCondition::Calculated);
        for (v, c) in f.internal_mut().iter_mut().zip(mesh.cell_centres()) {
            *v = 2.0 * c.z + 1.0;
        }
        f
    }

    #[test]
    fn interpolation_is_exact_for_linear_fields() {
        let mesh = BoxMeshBuilder::new([2, 2, 3], [2.0, 2.0, 3.0])
            .build()
            .unwrap();
        let f = linear_in_z(&mesh);
        let faces = interpolate(&mesh, &f);
        for (i, v) in faces.iter().enumerate() {
            let expected = 2.0 * mesh.face_centres()[i].z + 1.0;
            assert!((v - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn gradient_of_linear_field_in_interior_cells() {
        let mesh = BoxMeshBuilder::new([3, 3, 3], [3.0, 3.0, 3.0])
            .build()
            .unwrap();
        let f = linear_in_z(&mesh);
        let grad = grad_scalar(&mesh, &f);
        // Cell 13 is the centre cell, all of its faces are internal.
        assert!((grad[13] - Vec3::new(0.0, 0.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn uniform_vector_has_zero_gradient() {
        let mesh = BoxMeshBuilder::new([2, 2, 2], [1.0, 1.0, 1.0])
            .build()
            .unwrap();
        let u = VolField::uniform(&mesh, "U", Vec3::new(3.0, 1.0, 0.0), |_| {
            BoundaryCondition::ZeroGradient
        });
        for g in grad_vector(&mesh, &u) {
            assert!(g.norm() < 1e-12);
        }
    }
}
