//! A free-fly camera driven by pointer deltas and held direction keys.
//!
//! [`FlyCamera`] keeps its state as a camera-to-world matrix and mutates it
//! with the affine helpers from [`crate::transform`]: yaw is a world-axis Y
//! rotation, pitch a local-axis X rotation, and movement a local-space
//! translation. The projection matrix is cached and only recomputed when the
//! aspect ratio changes.
//!
//! Input arrives pull-style once per frame as a [`CameraInput`], a plain
//! struct with no windowing types in it. Whether the pointer is captured
//! ("look active") is the host's decision; when it is false the camera
//! ignores the frame entirely and deltas are discarded, not buffered.
//!
//! ```
//! use esfera::{CameraInput, FlyCamera};
//! use glam::Vec2;
//!
//! let mut camera = FlyCamera::new(16.0 / 9.0);
//! camera.update(&CameraInput {
//!     pointer_delta: Vec2::new(12.0, -3.0),
//!     look_active: true,
//!     forward: true,
//!     ..Default::default()
//! });
//! ```

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::transform::{Axis, rotate, translate};

/// Pitch is blocked once the angle between the camera's view axis and world
/// up leaves this open interval, keeping the camera from rolling over the
/// poles.
const PITCH_GUARD_MIN_DEG: f32 = 30.0;
const PITCH_GUARD_MAX_DEG: f32 = 170.0;

/// One frame of camera input, polled by the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraInput {
    /// Relative pointer motion since the previous frame, in pixels.
    pub pointer_delta: Vec2,
    /// True while the pointer is captured and look-control is active.
    pub look_active: bool,
    /// Held direction keys, mapped to local-space dolly/strafe steps.
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Free-fly camera state: a camera-to-world transform plus sensitivities
/// and a cached perspective projection.
#[derive(Clone, Debug)]
pub struct FlyCamera {
    transform: Mat4,
    /// Degrees of yaw per pixel of horizontal pointer motion.
    pub sensitivity_x: f32,
    /// Degrees of pitch per pixel of vertical pointer motion.
    pub sensitivity_y: f32,
    /// World units moved per frame per held direction key.
    pub key_sensitivity: f32,
    fov_y_degrees: f32,
    near: f32,
    far: f32,
    aspect: f32,
    projection: Mat4,
}

impl FlyCamera {
    /// Creates a camera at `(0, 0, 5)` looking toward the origin, with the
    /// demo defaults: 60 degree vertical field of view, 0.01 near plane,
    /// 10000 far plane.
    pub fn new(aspect: f32) -> Self {
        let fov_y_degrees = 60.0;
        let near = 0.01;
        let far = 10000.0;
        Self {
            transform: translate(Mat4::IDENTITY, 0.0, 0.0, 5.0),
            sensitivity_x: 0.1,
            sensitivity_y: 0.1,
            key_sensitivity: 0.008,
            fov_y_degrees,
            near,
            far,
            aspect,
            projection: perspective(fov_y_degrees, aspect, near, far),
        }
    }

    /// Sets the vertical field of view in degrees.
    pub fn fov(mut self, fov_y_degrees: f32) -> Self {
        self.fov_y_degrees = fov_y_degrees;
        self.projection = perspective(self.fov_y_degrees, self.aspect, self.near, self.far);
        self
    }

    /// Sets the near and far clipping planes.
    pub fn clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self.projection = perspective(self.fov_y_degrees, self.aspect, self.near, self.far);
        self
    }

    /// Sets the pointer-look sensitivities, in degrees per pixel.
    pub fn sensitivity(mut self, x: f32, y: f32) -> Self {
        self.sensitivity_x = x;
        self.sensitivity_y = y;
        self
    }

    /// Sets the per-frame key movement step, in world units.
    pub fn move_step(mut self, step: f32) -> Self {
        self.key_sensitivity = step;
        self
    }

    /// Replaces the camera-to-world transform.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// The current camera-to-world transform.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// World-space camera position, read straight from the translation
    /// column. Valid because the transform only ever accumulates rotations
    /// and translations, never scale.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// World-to-camera matrix for uploading to shaders. A rigid inverse of
    /// the camera-to-world transform.
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.inverse()
    }

    /// The cached projection matrix (OpenGL depth convention, -1 to 1).
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Current aspect ratio the projection was built for.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Rebuilds the projection if the aspect ratio actually changed.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect != self.aspect && aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.projection = perspective(self.fov_y_degrees, aspect, self.near, self.far);
        }
    }

    /// Applies one frame of input.
    ///
    /// When `look_active` is false the frame is a no-op: pointer deltas are
    /// discarded and key movement is suppressed, matching a released pointer
    /// grab. Otherwise yaw/pitch are applied first, then one fixed-size
    /// local-space step per held direction key.
    pub fn update(&mut self, input: &CameraInput) {
        if !input.look_active {
            return;
        }

        let yaw = input.pointer_delta.x * self.sensitivity_x;
        let pitch = input.pointer_delta.y * self.sensitivity_y;
        self.look(yaw, pitch);

        let step = self.key_sensitivity;
        if input.forward {
            self.transform = translate(self.transform, 0.0, 0.0, -step);
        }
        if input.back {
            self.transform = translate(self.transform, 0.0, 0.0, step);
        }
        if input.right {
            self.transform = translate(self.transform, step, 0.0, 0.0);
        }
        if input.left {
            self.transform = translate(self.transform, -step, 0.0, 0.0);
        }
    }

    /// Applies yaw about the world Y axis and, if the gimbal guard allows
    /// it, pitch about the camera's local X axis. Angles in degrees.
    ///
    /// The guard measures the angle between the camera's view axis and
    /// world up before the update and only admits pitch while that angle
    /// stays inside (30, 170) degrees on the side the pitch is heading,
    /// so the camera can always pitch back out of the clamp.
    pub fn look(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        let view_axis = self.transform.z_axis.truncate();
        let angle = view_axis.angle_between(Vec3::Y).to_degrees();

        self.transform = rotate(self.transform, yaw_degrees, Axis::Y, false);

        let pitch_allowed = (pitch_degrees > 0.0 && angle < PITCH_GUARD_MAX_DEG)
            || (pitch_degrees < 0.0 && angle > PITCH_GUARD_MIN_DEG);
        if pitch_allowed {
            self.transform = rotate(self.transform, pitch_degrees, Axis::X, true);
        }
    }

    /// Angle between the camera's view axis and world up, in degrees.
    /// 90 means level; the pitch guard clamps this to (30, 170).
    pub fn tilt_degrees(&self) -> f32 {
        self.transform
            .z_axis
            .truncate()
            .angle_between(Vec3::Y)
            .to_degrees()
    }
}

/// Builds a symmetric perspective projection.
///
/// Uses the standard OpenGL depth convention: a view-space point at
/// `z = -near` projects to NDC depth -1 and `z = -far` to +1. The render
/// pass remaps that range into wgpu's 0..1 clip space with a constant
/// correction matrix, so this function stays the testable, convention-pure
/// core.
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let d = 1.0 / (fov_y_degrees.to_radians() / 2.0).tan();
    Mat4::from_cols(
        Vec4::new(d / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, d, 0.0, 0.0),
        Vec4::new(0.0, 0.0, (far + near) / (near - far), -1.0),
        Vec4::new(0.0, 0.0, 2.0 * far * near / (near - far), 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for (ca, cb) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert!((ca - cb).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }

    fn ndc_depth(proj: Mat4, z: f32) -> f32 {
        let clip = proj * Vec4::new(0.0, 0.0, z, 1.0);
        clip.z / clip.w
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let proj = perspective(60.0, 1.0, 0.01, 1000.0);
        assert!((ndc_depth(proj, -0.01) + 1.0).abs() < 1e-4);
        assert!((ndc_depth(proj, -1000.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn perspective_focal_terms() {
        let proj = perspective(90.0, 2.0, 0.1, 100.0);
        // d = 1 / tan(45 deg) = 1
        assert!((proj.x_axis.x - 0.5).abs() < 1e-5);
        assert!((proj.y_axis.y - 1.0).abs() < 1e-5);
        assert!((proj.z_axis.w + 1.0).abs() < 1e-6);
    }

    #[test]
    fn starts_behind_origin_looking_forward() {
        let camera = FlyCamera::new(1.0);
        assert!((camera.position() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-6);
        // Level camera: view axis is 90 degrees from world up.
        assert!((camera.tilt_degrees() - 90.0).abs() < 1e-3);
        // View and transform are mutual inverses.
        assert_mat_eq(camera.view_matrix() * camera.transform(), Mat4::IDENTITY);
    }

    #[test]
    fn pointer_yaw_is_world_y_rotation() {
        let mut camera = FlyCamera::new(1.0);
        let start = camera.transform();
        camera.update(&CameraInput {
            pointer_delta: Vec2::new(100.0, 0.0),
            look_active: true,
            ..Default::default()
        });
        // 100 px * 0.1 deg/px = 10 degrees about world Y.
        let expected = rotate(start, 100.0 * camera.sensitivity_x, Axis::Y, false);
        assert_mat_eq(camera.transform(), expected);
    }

    #[test]
    fn inactive_look_discards_input() {
        let mut camera = FlyCamera::new(1.0);
        let start = camera.transform();
        camera.update(&CameraInput {
            pointer_delta: Vec2::new(500.0, 300.0),
            look_active: false,
            forward: true,
            left: true,
            ..Default::default()
        });
        assert_mat_eq(camera.transform(), start);
    }

    #[test]
    fn pitch_guard_blocks_past_the_top() {
        let mut camera = FlyCamera::new(1.0);
        // 80.5 degrees of local pitch tilts the view axis 170.5 degrees
        // from world up, past the guard.
        camera.set_transform(rotate(Mat4::IDENTITY, 80.5, Axis::X, true));
        assert!((camera.tilt_degrees() - 170.5).abs() < 1e-2);

        // Further positive pitch is clamped out.
        camera.update(&CameraInput {
            pointer_delta: Vec2::new(0.0, 10.0),
            look_active: true,
            ..Default::default()
        });
        assert!((camera.tilt_degrees() - 170.5).abs() < 1e-2);

        // Pitching back toward level still works.
        camera.update(&CameraInput {
            pointer_delta: Vec2::new(0.0, -10.0),
            look_active: true,
            ..Default::default()
        });
        assert!((camera.tilt_degrees() - 169.5).abs() < 1e-2);
    }

    #[test]
    fn pitch_guard_blocks_past_the_bottom() {
        let mut camera = FlyCamera::new(1.0);
        camera.set_transform(rotate(Mat4::IDENTITY, -60.5, Axis::X, true));
        assert!((camera.tilt_degrees() - 29.5).abs() < 1e-2);

        camera.look(0.0, -1.0);
        assert!((camera.tilt_degrees() - 29.5).abs() < 1e-2);

        camera.look(0.0, 1.0);
        assert!((camera.tilt_degrees() - 30.5).abs() < 1e-2);
    }

    #[test]
    fn pitch_guard_overshoots_by_at_most_one_step() {
        // The guard checks the angle before applying the step, so a sweep
        // toward the pole lands at most one step past 170 and then stops.
        let mut camera = FlyCamera::new(1.0);
        camera.set_transform(rotate(Mat4::IDENTITY, 75.0, Axis::X, true));
        for _ in 0..10 {
            camera.look(0.0, 2.0);
        }
        let tilt = camera.tilt_degrees();
        assert!(tilt > 169.0 && tilt < 172.1, "tilt = {tilt}");

        let stuck = camera.tilt_degrees();
        camera.look(0.0, 2.0);
        assert!((camera.tilt_degrees() - stuck).abs() < 1e-3);

        camera.look(0.0, -2.0);
        assert!(camera.tilt_degrees() < stuck - 1.0);
    }

    #[test]
    fn key_steps_move_in_local_space() {
        let mut camera = FlyCamera::new(1.0);
        camera.update(&CameraInput {
            look_active: true,
            forward: true,
            ..Default::default()
        });
        let expected = 5.0 - camera.key_sensitivity;
        assert!((camera.position() - Vec3::new(0.0, 0.0, expected)).length() < 1e-6);

        // After a 90 degree world yaw, a forward step heads down world -X.
        let mut yawed = FlyCamera::new(1.0);
        yawed.set_transform(rotate(
            translate(Mat4::IDENTITY, 0.0, 0.0, 5.0),
            90.0,
            Axis::Y,
            false,
        ));
        let before = yawed.position();
        yawed.update(&CameraInput {
            look_active: true,
            forward: true,
            ..Default::default()
        });
        let motion = yawed.position() - before;
        assert!((motion - Vec3::new(-yawed.key_sensitivity, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn opposed_keys_cancel() {
        let mut camera = FlyCamera::new(1.0);
        let start = camera.position();
        camera.update(&CameraInput {
            look_active: true,
            forward: true,
            back: true,
            left: true,
            right: true,
            ..Default::default()
        });
        assert!((camera.position() - start).length() < 1e-6);
    }

    #[test]
    fn projection_recomputes_only_on_aspect_change() {
        let mut camera = FlyCamera::new(1.0);
        let initial = camera.projection_matrix();
        camera.set_aspect(1.0);
        assert_mat_eq(camera.projection_matrix(), initial);

        camera.set_aspect(2.0);
        assert_mat_eq(camera.projection_matrix(), perspective(60.0, 2.0, 0.01, 10000.0));
    }

    #[test]
    fn view_matrix_tracks_movement() {
        let mut camera = FlyCamera::new(1.0);
        camera.look(30.0, -5.0);
        camera.update(&CameraInput {
            look_active: true,
            forward: true,
            right: true,
            ..Default::default()
        });
        // A rigid transform's inverse undoes it exactly.
        assert_mat_eq(camera.view_matrix() * camera.transform(), Mat4::IDENTITY);
        // And the view maps the camera position to the view-space origin.
        let origin = camera.view_matrix() * camera.position().extend(1.0);
        assert!(origin.xyz().length() < 1e-4);
    }
}
