//! Row-major matrix helpers. Matrices are uploaded with `transpose = true`.

pub type Vec3 = [f32; 3];
pub type Mat3x3 = [f32; 9];
pub type Mat4x4 = [f32; 16];

#[rustfmt::skip]
pub fn mat4x4_identity() -> Mat4x4 {
    [
      1.0, 0.0, 0.0, 0.0,
      0.0, 1.0, 0.0, 0.0,
      0.0, 0.0, 1.0, 0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

#[rustfmt::skip]
pub fn mat4x4_translate(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
      1.0, 0.0, 0.0,  x,
      0.0, 1.0, 0.0,  y,
      0.0, 0.0, 1.0,  z,
      0.0, 0.0, 0.0, 1.0
    ]
}

#[rustfmt::skip]
pub fn mat4x4_rot_x(angle: f32) -> Mat4x4 {
    let c = angle.cos();
    let s = angle.sin();

    [
      1.0, 0.0, 0.0, 0.0,
      0.0,  c,  -s,  0.0,
      0.0,  s,   c,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

#[rustfmt::skip]
pub fn mat4x4_rot_y(angle: f32) -> Mat4x4 {
    let c = angle.cos();
    let s = angle.sin();

    [
       c,  0.0,  s,  0.0,
      0.0, 1.0, 0.0, 0.0,
      -s,  0.0,  c,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn vec4_dot(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

pub fn mat4x4_row(mat: &Mat4x4, row: usize) -> [f32; 4] {
    let start_idx = row * 4;
    [mat[start_idx], mat[start_idx + 1], mat[start_idx + 2], mat[start_idx + 3]]
}

pub fn mat4x4_col(mat: &Mat4x4, col: usize) -> [f32; 4] {
    [mat[col], mat[4 + col], mat[8 + col], mat[12 + col]]
}

pub fn mat4x4_mul(a: Mat4x4, b: Mat4x4) -> Mat4x4 {
    let mut ret = [0.0; 16];
    for (i, cell) in ret.iter_mut().enumerate() {
        let row = i / 4;
        let col = i % 4;
        *cell = vec4_dot(mat4x4_row(&a, row), mat4x4_col(&b, col));
    }
    ret
}

#[rustfmt::skip]
pub fn mat4x4_perspective(fov_y_radians: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4x4 {
    let f = 1.0 / (fov_y_radians * 0.5).tan();
    let range_inv = 1.0 / (near - far);

    [
        f / aspect_ratio, 0.0, 0.0,                          0.0,
        0.0,              f,   0.0,                          0.0,
        0.0,              0.0, (near + far) * range_inv,     (2.0 * near * far) * range_inv,
        0.0,              0.0, -1.0,                         0.0,
    ]
}

/// Orbit view: the camera sits `distance` units in front of `target`,
/// looking at it after rotating the world by `pitch` then `yaw` (radians).
pub fn build_orbit_view_matrix(target: Vec3, distance: f32, pitch: f32, yaw: f32) -> Mat4x4 {
    let recenter = mat4x4_translate(-target[0], -target[1], -target[2]);
    let orientation = mat4x4_mul(mat4x4_rot_x(pitch), mat4x4_rot_y(yaw));
    let pull_back = mat4x4_translate(0.0, 0.0, -distance);
    mat4x4_mul(pull_back, mat4x4_mul(orientation, recenter))
}

#[rustfmt::skip]
pub fn mat3x3_identity() -> Mat3x3 {
    [
      1.0, 0.0, 0.0,
      0.0, 1.0, 0.0,
      0.0, 0.0, 1.0
    ]
}

/// Upper-left 3x3 block of a 4x4 matrix.
#[rustfmt::skip]
pub fn mat4x4_upper_left(m: &Mat4x4) -> Mat3x3 {
    [
        m[0], m[1], m[2],
        m[4], m[5], m[6],
        m[8], m[9], m[10],
    ]
}

#[rustfmt::skip]
pub fn mat3x3_transpose(m: Mat3x3) -> Mat3x3 {
    [
        m[0], m[3], m[6],
        m[1], m[4], m[7],
        m[2], m[5], m[8],
    ]
}

pub fn mat3x3_determinant(m: &Mat3x3) -> f32 {
    m[0] * (m[4] * m[8] - m[5] * m[7])
        - m[1] * (m[3] * m[8] - m[5] * m[6])
        + m[2] * (m[3] * m[7] - m[4] * m[6])
}

/// Returns `None` for singular matrices.
pub fn mat3x3_inverse(m: &Mat3x3) -> Option<Mat3x3> {
    let det = mat3x3_determinant(m);
    if det.abs() <= f32::EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    Some([
        (m[4] * m[8] - m[5] * m[7]) * inv_det,
        (m[2] * m[7] - m[1] * m[8]) * inv_det,
        (m[1] * m[5] - m[2] * m[4]) * inv_det,
        (m[5] * m[6] - m[3] * m[8]) * inv_det,
        (m[0] * m[8] - m[2] * m[6]) * inv_det,
        (m[2] * m[3] - m[0] * m[5]) * inv_det,
        (m[3] * m[7] - m[4] * m[6]) * inv_det,
        (m[1] * m[6] - m[0] * m[7]) * inv_det,
        (m[0] * m[4] - m[1] * m[3]) * inv_det,
    ])
}

/// Inverse-transpose of the upper 3x3 block of `model_view`. Falls back to
/// the plain upper block when it is singular.
pub fn normal_matrix(model_view: &Mat4x4) -> Mat3x3 {
    let upper = mat4x4_upper_left(model_view);
    match mat3x3_inverse(&upper) {
        Some(inverse) => mat3x3_transpose(inverse),
        None => upper,
    }
}

pub fn mat3x3_mul(a: &Mat3x3, b: &Mat3x3) -> Mat3x3 {
    let mut ret = [0.0; 9];
    for (i, cell) in ret.iter_mut().enumerate() {
        let row = i / 3;
        let col = i % 3;
        *cell = a[row * 3] * b[col] + a[row * 3 + 1] * b[3 + col] + a[row * 3 + 2] * b[6 + col];
    }
    ret
}

pub fn mat4x4_transform_point(m: &Mat4x4, p: Vec3) -> Vec3 {
    let v = [p[0], p[1], p[2], 1.0];
    let w = vec4_dot(mat4x4_row(m, 3), v);
    let w = if w.abs() > f32::EPSILON { w } else { 1.0 };
    [
        vec4_dot(mat4x4_row(m, 0), v) / w,
        vec4_dot(mat4x4_row(m, 1), v) / w,
        vec4_dot(mat4x4_row(m, 2), v) / w,
    ]
}

pub fn vec3_length(v: Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn vec3_sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn vec3_midpoint(a: Vec3, b: Vec3) -> Vec3 {
    [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5, (a[2] + b[2]) * 0.5]
}
