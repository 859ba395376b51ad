//! esfera: a small wgpu renderer for shaded sphere demos.
//!
//! The crate builds UV-sphere meshes on the GPU, flies a mouse-look camera
//! around them, and shades them with one of three surface models (metal,
//! matte, water). Each demo binary is a thin wrapper over [`run`] with a
//! different [`Material`].
//!
//! ```no_run
//! use esfera::{DemoConfig, Material, run};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     run(DemoConfig::new("Metal Sphere", Material::metal()))
//! }
//! ```

pub mod app;
pub mod camera;
pub mod gpu;
pub mod input;
pub mod material;
pub mod mesh;
pub mod sphere_pass;
pub mod transform;

pub use app::{DemoConfig, run};
pub use camera::{CameraInput, FlyCamera, perspective};
pub use gpu::{GpuContext, GpuError};
pub use input::Input;
pub use material::{Material, MaterialKind, MaterialUniforms};
pub use mesh::{Mesh, MeshError, SphereGeometry, Vertex3d};
pub use sphere_pass::{DrawCall, FrameUniforms, ModelUniforms, SpherePass, depth_correction};
pub use transform::{Axis, rotate, translate};

pub use glam::{Mat4, Vec2, Vec3, Vec4};
pub use winit::keyboard::KeyCode;
