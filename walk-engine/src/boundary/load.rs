use std::path::Path;

use nalgebra::{Matrix4, Point3};

use crate::boundary::BoundarySet;
use crate::error::LoadError;
use crate::geometry::Triangle;

impl BoundarySet {
    /// Builds a boundary from an indexed triangle list.
    ///
    /// `positions` holds packed `xyz` triples and every three consecutive
    /// `indices` form one triangle. Vertices are moved to world space by
    /// `world` before the triangle is built.
    pub fn from_indexed(
        positions: &[f32],
        indices: &[u32],
        world: &Matrix4<f32>,
    ) -> Result<Self, LoadError> {
        let mut boundary = Self::new();
        boundary.append_indexed(positions, indices, world)?;
        Ok(boundary)
    }

    /// Appends the triangles of an indexed list and returns how many were kept.
    ///
    /// Degenerate triangles are dropped; a trailing incomplete index triple is
    /// ignored.
    pub fn append_indexed(
        &mut self,
        positions: &[f32],
        indices: &[u32],
        world: &Matrix4<f32>,
    ) -> Result<usize, LoadError> {
        let vertex_count = positions.len() / 3;
        let vertex = |index: u32| {
            let i = index as usize;
            if i >= vertex_count {
                return Err(LoadError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
            Ok(world.transform_point(&Point3::new(
                positions[i * 3],
                positions[i * 3 + 1],
                positions[i * 3 + 2],
            )))
        };

        let before = self.len();
        let mut skipped = 0_usize;
        for face in indices.chunks_exact(3) {
            let triangle = Triangle::new(vertex(face[0])?, vertex(face[1])?, vertex(face[2])?);
            if triangle.is_degenerate() {
                skipped += 1;
                continue;
            }
            self.push(triangle);
        }

        if skipped > 0 {
            tracing::trace!("Skipped {} degenerate triangles", skipped);
        }

        Ok(self.len() - before)
    }

    /// Builds a boundary from every mesh of already loaded models.
    pub fn from_models(models: &[tobj::Model], world: &Matrix4<f32>) -> Result<Self, LoadError> {
        let mut boundary = Self::new();
        for model in models {
            let kept = boundary.append_indexed(&model.mesh.positions, &model.mesh.indices, world)?;
            tracing::trace!("Mesh `{}` contributed {} triangles", model.name, kept);
        }
        Ok(boundary)
    }

    /// Loads an OBJ file and places it in the world with `world`.
    pub fn load_obj(path: &Path, world: &Matrix4<f32>) -> Result<Self, LoadError> {
        let start = std::time::Instant::now();

        let (models, _materials) =
            tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|source| LoadError::Obj {
                path: path.to_path_buf(),
                source,
            })?;

        let boundary = Self::from_models(&models, world)?;

        tracing::debug!(
            "Boundary {} loaded in {:?} with {} triangles",
            path.display(),
            start.elapsed(),
            boundary.len()
        );

        Ok(boundary)
    }
}
