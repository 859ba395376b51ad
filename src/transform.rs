//! Affine transform helpers for camera and model matrices.
//!
//! The camera and the demo scenes compose their matrices from two primitive
//! operations, [`translate`] and [`rotate`], both expressed over [`glam::Mat4`].
//! Transforms produced this way are always pure rotation + translation, so the
//! bottom row stays `[0, 0, 0, 1]` and the translation column can be read back
//! directly as a world position.
//!
//! # Local vs. global
//!
//! Multiplication order decides which space an operation happens in:
//!
//! - `local = true` right-multiplies, applying the operation in the
//!   transform's own (local) frame. Used for camera pitch and dolly/strafe.
//! - `local = false` left-multiplies, applying it in world space.
//!   Used for camera yaw about the world Y axis.
//!
//! ```
//! use esfera::{rotate, translate, Axis};
//! use glam::Mat4;
//!
//! // Place something five units back, then yaw it 90 degrees in world space.
//! let m = translate(Mat4::IDENTITY, 0.0, 0.0, 5.0);
//! let m = rotate(m, 90.0, Axis::Y, false);
//! ```

use glam::Mat4;

/// A principal axis for [`rotate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Right-multiplies `matrix` by a pure translation.
///
/// Because the translation is applied on the right, the offset is expressed
/// in the matrix's local frame: translating a camera transform by
/// `(0, 0, -d)` moves it `d` units along its own forward direction,
/// wherever it is facing.
pub fn translate(matrix: Mat4, dx: f32, dy: f32, dz: f32) -> Mat4 {
    matrix * Mat4::from_translation(glam::Vec3::new(dx, dy, dz))
}

/// Multiplies `matrix` by a rotation of `angle_degrees` about a principal axis.
///
/// With `local = true` the rotation is right-multiplied and happens about the
/// matrix's own axes; with `local = false` it is left-multiplied and happens
/// about the world axes.
pub fn rotate(matrix: Mat4, angle_degrees: f32, axis: Axis, local: bool) -> Mat4 {
    let angle = angle_degrees.to_radians();
    let rotation = match axis {
        Axis::X => Mat4::from_rotation_x(angle),
        Axis::Y => Mat4::from_rotation_y(angle),
        Axis::Z => Mat4::from_rotation_z(angle),
    };

    if local {
        matrix * rotation
    } else {
        rotation * matrix
    }
}
