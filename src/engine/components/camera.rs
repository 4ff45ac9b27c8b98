use crate::engine::utils::math::{
    build_orbit_view_matrix, mat4x4_identity, mat4x4_perspective, vec3_length, vec3_midpoint,
    vec3_sub, Mat4x4, Vec3,
};

/// Degrees of orbit per pixel of pointer travel.
const ROTATION_SPEED: f32 = 0.5;
/// Degrees of orbit per keyboard step.
const ROTATION_STEP: f32 = 5.0;
/// Fraction of the model diagonal zoomed per pixel of pointer travel.
const ZOOM_SPEED: f32 = 0.01;
/// Fraction of the model diagonal zoomed per keyboard step.
const ZOOM_STEP: f32 = 0.1;
/// Initial distance as a multiple of the model diagonal.
const FRAMING_FACTOR: f32 = 1.5;
/// Closest approach as a multiple of the bounding radius, so the eye stays
/// outside the model.
const MIN_RADIUS_FACTOR: f32 = 1.05;
const MAX_DISTANCE_FACTOR: f32 = 10.0;
const ABSOLUTE_MIN_DISTANCE: f32 = 1e-3;
const MAX_PITCH: f32 = 89.0;

/// Orbit camera around the loaded mesh. Pure state and math; the renderer
/// turns it into matrices and a viewport each frame.
#[derive(Debug, Clone)]
pub struct Camera {
    viewport: [i32; 4],
    field_of_view: f32,
    z_near: f32,
    z_far: f32,
    target: Vec3,
    model_size: f32,
    distance: f32,
    min_distance: f32,
    max_distance: f32,
    pitch: f32,
    yaw: f32,
    rotating: bool,
    zooming: bool,
    rotation_anchor: (f32, f32),
    zoom_anchor: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        let mut camera = Self {
            viewport: [0, 0, 1, 1],
            field_of_view: 60.0,
            z_near: 0.0001,
            z_far: 100.0,
            target: [0.0; 3],
            model_size: 1.0,
            distance: FRAMING_FACTOR,
            min_distance: ABSOLUTE_MIN_DISTANCE,
            max_distance: MAX_DISTANCE_FACTOR,
            pitch: 0.0,
            yaw: 0.0,
            rotating: false,
            zooming: false,
            rotation_anchor: (0.0, 0.0),
            zoom_anchor: 0.0,
        };
        camera.update_distance_limits();
        camera
    }

    /// Non-positive sizes are coerced to 1.
    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = [x, y, width.max(1), height.max(1)];
    }

    pub fn viewport(&self) -> [i32; 4] {
        self.viewport
    }

    pub fn set_projection(&mut self, fov_y_degrees: f32, z_near: f32, z_far: f32) {
        self.field_of_view = fov_y_degrees;
        self.z_near = z_near;
        self.z_far = z_far;
        self.update_distance_limits();
        self.distance = self.clamp_distance(self.distance);
    }

    /// Frames the axis-aligned box `[min, max]`: orbit around its center
    /// from a distance proportional to its diagonal.
    pub fn update_model(&mut self, min: Vec3, max: Vec3) {
        self.target = vec3_midpoint(min, max);

        let diagonal = vec3_length(vec3_sub(max, min));
        self.model_size = if diagonal.is_finite() && diagonal > f32::EPSILON {
            diagonal
        } else {
            1.0
        };
        self.update_distance_limits();
        self.distance = self.clamp_distance(self.model_size * FRAMING_FACTOR);
    }

    fn update_distance_limits(&mut self) {
        let radius = self.model_size * 0.5;
        self.min_distance = (radius * MIN_RADIUS_FACTOR)
            .max(self.z_near)
            .max(ABSOLUTE_MIN_DISTANCE);
        self.max_distance = (self.model_size * MAX_DISTANCE_FACTOR).max(self.min_distance);
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        if distance.is_nan() {
            return self.min_distance;
        }
        distance.clamp(self.min_distance, self.max_distance)
    }

    pub fn start_rotating(&mut self, x: f32, y: f32) {
        self.rotating = true;
        self.rotation_anchor = (x, y);
    }

    pub fn stop_rotating(&mut self, _x: f32, _y: f32) {
        self.rotating = false;
    }

    /// Vertical pointer travel tilts the orbit (rotation about X).
    pub fn set_rotation_x(&mut self, y: f32) {
        if !self.rotating || !y.is_finite() {
            return;
        }
        let delta = y - self.rotation_anchor.1;
        self.pitch = (self.pitch + delta * ROTATION_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
        self.rotation_anchor.1 = y;
    }

    /// Horizontal pointer travel spins the orbit (rotation about Y).
    pub fn set_rotation_y(&mut self, x: f32) {
        if !self.rotating || !x.is_finite() {
            return;
        }
        let delta = x - self.rotation_anchor.0;
        self.yaw = wrap_degrees(self.yaw + delta * ROTATION_SPEED);
        self.rotation_anchor.0 = x;
    }

    pub fn start_zooming(&mut self, _x: f32, y: f32) {
        self.zooming = true;
        self.zoom_anchor = y;
    }

    pub fn stop_zooming(&mut self, _x: f32, _y: f32) {
        self.zooming = false;
    }

    /// Dragging down moves away from the target; never closer than the
    /// minimum distance, so the camera cannot cross the model surface.
    pub fn safe_zoom(&mut self, y: f32) {
        if !self.zooming || !y.is_finite() {
            return;
        }
        let delta = y - self.zoom_anchor;
        self.distance = self.clamp_distance(self.distance + delta * ZOOM_SPEED * self.model_size);
        self.zoom_anchor = y;
    }

    pub fn zoom(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.distance = self.clamp_distance(self.distance + delta * ZOOM_STEP * self.model_size);
    }

    pub fn rotate(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.yaw = wrap_degrees(self.yaw + delta * ROTATION_STEP);
    }

    pub fn projection(&self) -> Mat4x4 {
        let aspect_ratio = (self.viewport[2] as f32) / (self.viewport[3] as f32);
        mat4x4_perspective(self.field_of_view.to_radians(), aspect_ratio, self.z_near, self.z_far)
    }

    pub fn view(&self) -> Mat4x4 {
        build_orbit_view_matrix(
            self.target,
            self.distance,
            self.pitch.to_radians(),
            self.yaw.to_radians(),
        )
    }

    /// The mesh is never moved on its own; all placement lives in `view`.
    pub fn model(&self) -> Mat4x4 {
        mat4x4_identity()
    }

    /// Model matrix for the skybox.
    pub fn identity(&self) -> Mat4x4 {
        mat4x4_identity()
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_zooming(&self) -> bool {
        self.zooming
    }
}

fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}
