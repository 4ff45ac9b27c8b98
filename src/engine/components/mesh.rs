use std::f32::consts::PI;

use crate::engine::error::{ViewerError, ViewerResult};
use crate::engine::utils::math::Vec3;

/// CPU-side triangle mesh. Positions, normals and texture coordinates share
/// one index space; `faces` holds three indices per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub tex_coords: Vec<f32>,
    pub faces: Vec<u32>,
    pub min: Vec3,
    pub max: Vec3,
}

impl TriangleMesh {
    pub fn new(positions: Vec<f32>, normals: Vec<f32>, tex_coords: Vec<f32>, faces: Vec<u32>) -> Self {
        let mut mesh = Self {
            positions,
            normals,
            tex_coords,
            faces,
            min: [0.0; 3],
            max: [0.0; 3],
        };
        mesh.compute_bounding_box();
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.faces.len() / 3
    }

    pub fn compute_bounding_box(&mut self) {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for vertex in self.positions.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(vertex[axis]);
                max[axis] = max[axis].max(vertex[axis]);
            }
        }
        if self.positions.len() < 3 {
            min = [0.0; 3];
            max = [0.0; 3];
        }
        self.min = min;
        self.max = max;
    }

    pub fn validate(&self) -> ViewerResult<()> {
        if self.positions.len() % 3 != 0 {
            return Err(ViewerError::InvalidMesh(format!(
                "{} position floats is not a multiple of 3",
                self.positions.len()
            )));
        }
        let vertex_count = self.vertex_count();
        if vertex_count == 0 {
            return Err(ViewerError::InvalidMesh("mesh has no vertices".to_string()));
        }
        if self.normals.len() != self.positions.len() {
            return Err(ViewerError::InvalidMesh(format!(
                "{} normal floats for {} position floats",
                self.normals.len(),
                self.positions.len()
            )));
        }
        if self.tex_coords.len() / 2 != vertex_count || self.tex_coords.len() % 2 != 0 {
            return Err(ViewerError::InvalidMesh(format!(
                "{} texture coordinate floats for {} vertices",
                self.tex_coords.len(),
                vertex_count
            )));
        }
        if self.faces.is_empty() || self.faces.len() % 3 != 0 {
            return Err(ViewerError::InvalidMesh(format!(
                "{} face indices is not a positive multiple of 3",
                self.faces.len()
            )));
        }
        if let Some(index) = self.faces.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ViewerError::InvalidMesh(format!(
                "face index {} out of range for {} vertices",
                index, vertex_count
            )));
        }
        Ok(())
    }

    /// UV sphere with a duplicated seam column so texture coordinates wrap
    /// cleanly. Triangles are counter-clockwise seen from outside; pole
    /// rows emit one triangle per slice.
    pub fn sphere(radius: f32, stacks: u32, slices: u32) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let ring = slices + 1;

        let vertex_total = ((stacks + 1) * ring) as usize;
        let mut positions = Vec::with_capacity(vertex_total * 3);
        let mut normals = Vec::with_capacity(vertex_total * 3);
        let mut tex_coords = Vec::with_capacity(vertex_total * 2);

        for i in 0..=stacks {
            let v = i as f32 / stacks as f32;
            let phi = PI * v;
            for j in 0..=slices {
                let u = j as f32 / slices as f32;
                let theta = 2.0 * PI * u;
                let normal = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
                positions.extend(normal.iter().map(|n| n * radius));
                normals.extend_from_slice(&normal);
                tex_coords.extend_from_slice(&[u, 1.0 - v]);
            }
        }

        let mut faces = Vec::with_capacity((slices * (2 * stacks - 2) * 3) as usize);
        for i in 0..stacks {
            for j in 0..slices {
                let a = i * ring + j;
                let b = a + ring;
                if i != 0 {
                    faces.extend_from_slice(&[a, a + 1, b]);
                }
                if i != stacks - 1 {
                    faces.extend_from_slice(&[a + 1, b + 1, b]);
                }
            }
        }

        Self::new(positions, normals, tex_coords, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> TriangleMesh {
        TriangleMesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn single_triangle_is_valid() {
        let mesh = single_triangle();
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.min, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.max, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut mesh = single_triangle();
        mesh.faces[2] = 3;
        assert!(matches!(mesh.validate(), Err(ViewerError::InvalidMesh(_))));
    }

    #[test]
    fn mismatched_normals_are_rejected() {
        let mut mesh = single_triangle();
        mesh.normals.truncate(6);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mesh = TriangleMesh::default();
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn sphere_satisfies_mesh_invariants() {
        let sphere = TriangleMesh::sphere(1.0, 16, 32);
        assert!(sphere.validate().is_ok());
        assert_eq!(sphere.vertex_count(), 17 * 33);
        assert_eq!(sphere.face_count(), 32 * (2 * 16 - 2));
        for axis in 0..3 {
            assert!((sphere.min[axis] + 1.0).abs() < 1e-4);
            assert!((sphere.max[axis] - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn sphere_normals_point_outwards_with_ccw_winding() {
        let sphere = TriangleMesh::sphere(2.0, 8, 12);
        let p = |i: u32| {
            let i = i as usize * 3;
            [sphere.positions[i], sphere.positions[i + 1], sphere.positions[i + 2]]
        };
        for tri in sphere.faces.chunks_exact(3) {
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let n = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let centroid = [a[0] + b[0] + c[0], a[1] + b[1] + c[1], a[2] + b[2] + c[2]];
            let facing = n[0] * centroid[0] + n[1] * centroid[1] + n[2] * centroid[2];
            assert!(facing > 0.0);
        }
    }
}
