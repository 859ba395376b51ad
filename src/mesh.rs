//! Sphere geometry generation and GPU-resident meshes.
//!
//! Geometry lives in two stages:
//!
//! - [`SphereGeometry`] is the CPU-side result of UV-sphere tessellation:
//!   interleaved [`Vertex3d`] data plus `u32` triangle indices. It is
//!   generated once, validated, and never mutated.
//! - [`Mesh`] is that geometry after a single upload into GPU vertex and
//!   index buffers. Meshes are immutable after creation.
//!
//! ```no_run
//! use esfera::{GpuContext, Mesh, SphereGeometry};
//!
//! fn build(gpu: &GpuContext) -> Result<Mesh, esfera::MeshError> {
//!     let geometry = SphereGeometry::generate(1.0, 128, 64)?;
//!     Ok(Mesh::new(gpu, &geometry))
//! }
//! ```

use crate::gpu::GpuContext;

/// Errors from geometry generation.
#[derive(Debug)]
pub enum MeshError {
    /// A tessellation parameter was out of range.
    InvalidParameter(String),
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::InvalidParameter(msg) => write!(f, "invalid mesh parameter: {}", msg),
        }
    }
}

impl std::error::Error for MeshError {}

/// A vertex with position, normal, and texture coordinates.
///
/// `#[repr(C)]` plus [`bytemuck::Pod`] gives a predictable 32-byte layout
/// for direct GPU upload: position at offset 0, normal at 12, uv at 24.
/// The matte and metal shaders ignore the uv channel; keeping the stride
/// uniform lets all three materials share one vertex layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// Position in model space.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
    /// Equirectangular texture coordinates in [0, 1].
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// Vertex buffer layout for pipelines consuming [`Vertex3d`]:
    /// position at shader location 0, normal at 1, uv at 2.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    /// Creates a new vertex.
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// CPU-side UV-sphere tessellation, ready for GPU upload.
///
/// Invariants held by construction: every index is less than the vertex
/// count, and the index count is a multiple of 3.
#[derive(Clone, Debug)]
pub struct SphereGeometry {
    /// Interleaved vertex attributes.
    pub vertices: Vec<Vertex3d>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl SphereGeometry {
    /// Tessellates a UV sphere centered at the origin.
    ///
    /// The latitude/longitude grid has `(stacks + 1) * (slices + 1)`
    /// vertices. The ring at the seam (`theta = 0` and `theta = 2*PI`) and
    /// the pole rings are deliberately duplicated so texture coordinates
    /// stay continuous across the seam; that duplication is part of the
    /// contract, not wasted data.
    ///
    /// Normals equal the normalized position, since the sphere is centered
    /// at the origin. UVs are an equirectangular mapping with `v = 1` at
    /// the north pole.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParameter`] for `radius <= 0`,
    /// `slices < 3`, or `stacks < 2`; anything smaller tessellates to
    /// degenerate, zero-area triangles.
    pub fn generate(radius: f32, slices: u32, stacks: u32) -> Result<Self, MeshError> {
        if !(radius > 0.0) {
            return Err(MeshError::InvalidParameter(format!(
                "radius must be positive, got {}",
                radius
            )));
        }
        if slices < 3 {
            return Err(MeshError::InvalidParameter(format!(
                "need at least 3 slices, got {}",
                slices
            )));
        }
        if stacks < 2 {
            return Err(MeshError::InvalidParameter(format!(
                "need at least 2 stacks, got {}",
                stacks
            )));
        }

        let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);

        for i in 0..=stacks {
            let phi = std::f32::consts::PI * i as f32 / stacks as f32;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for j in 0..=slices {
                let theta = 2.0 * std::f32::consts::PI * j as f32 / slices as f32;
                let x = ring_radius * theta.cos();
                let z = ring_radius * theta.sin();

                let position = [radius * x, radius * y, radius * z];
                let normal = [x, y, z];
                let uv = [j as f32 / slices as f32, 1.0 - i as f32 / stacks as f32];

                vertices.push(Vertex3d::new(position, normal, uv));
            }
        }

        for i in 0..stacks {
            for j in 0..slices {
                let first = i * (slices + 1) + j;
                let second = first + slices + 1;

                indices.extend_from_slice(&[first, second, first + 1]);
                indices.extend_from_slice(&[second, second + 1, first + 1]);
            }
        }

        Ok(Self { vertices, indices })
    }

    /// Number of indices, which is also the draw call's vertex count.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// GPU-resident sphere geometry with vertex and index buffers.
///
/// Created once from a [`SphereGeometry`]; the buffers are never written
/// again after the initial upload.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Uploads geometry into static GPU buffers.
    pub fn new(gpu: &GpuContext, geometry: &SphereGeometry) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Vertex Buffer"),
                contents: bytemuck::cast_slice(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Index Buffer"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.index_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn rejects_degenerate_parameters() {
        assert!(matches!(
            SphereGeometry::generate(0.0, 16, 8),
            Err(MeshError::InvalidParameter(_))
        ));
        assert!(matches!(
            SphereGeometry::generate(-1.0, 16, 8),
            Err(MeshError::InvalidParameter(_))
        ));
        assert!(matches!(
            SphereGeometry::generate(1.0, 2, 8),
            Err(MeshError::InvalidParameter(_))
        ));
        assert!(matches!(
            SphereGeometry::generate(1.0, 16, 1),
            Err(MeshError::InvalidParameter(_))
        ));
    }

    #[test]
    fn accepts_minimum_parameters() {
        let geom = SphereGeometry::generate(1.0, 3, 2).unwrap();
        assert_eq!(geom.vertices.len(), 4 * 3);
        assert_eq!(geom.indices.len(), 3 * 2 * 6);
    }

    #[test]
    fn counts_match_grid() {
        for (slices, stacks) in [(3u32, 2u32), (8, 4), (128, 64)] {
            let geom = SphereGeometry::generate(2.5, slices, stacks).unwrap();
            assert_eq!(
                geom.vertices.len() as u32,
                (slices + 1) * (stacks + 1),
                "{slices}x{stacks} vertex count"
            );
            assert_eq!(
                geom.index_count(),
                slices * stacks * 6,
                "{slices}x{stacks} index count"
            );
        }
    }

    #[test]
    fn indices_stay_in_bounds_and_triangulated() {
        let geom = SphereGeometry::generate(1.0, 12, 7).unwrap();
        assert_eq!(geom.indices.len() % 3, 0);
        let vertex_count = geom.vertices.len() as u32;
        assert!(geom.indices.iter().all(|&i| i < vertex_count));
    }

    #[test]
    fn vertices_lie_on_sphere_with_unit_normals() {
        let radius = 3.25;
        let geom = SphereGeometry::generate(radius, 24, 12).unwrap();
        for v in &geom.vertices {
            let p = Vec3::from(v.position);
            let n = Vec3::from(v.normal);
            assert!(
                (p.length() - radius).abs() < 1e-4,
                "position off sphere: {p:?}"
            );
            assert!((n.length() - 1.0).abs() < 1e-4, "normal not unit: {n:?}");
            assert!((p.normalize() - n).length() < 1e-4, "normal not radial");
        }
    }

    #[test]
    fn seam_vertices_are_duplicated() {
        let geom = SphereGeometry::generate(1.0, 8, 4).unwrap();
        // First and last vertex of a mid ring share a position but carry
        // different u coordinates.
        let ring = &geom.vertices[2 * 9..3 * 9];
        let first = ring[0];
        let last = ring[8];
        assert!((Vec3::from(first.position) - Vec3::from(last.position)).length() < 1e-5);
        assert!((first.uv[0] - 0.0).abs() < 1e-6);
        assert!((last.uv[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn uv_runs_top_to_bottom() {
        let geom = SphereGeometry::generate(1.0, 4, 2).unwrap();
        // North pole ring has v = 1, south pole ring v = 0.
        assert!((geom.vertices[0].uv[1] - 1.0).abs() < 1e-6);
        assert!((geom.vertices.last().unwrap().uv[1]).abs() < 1e-6);
    }
}
