//! Fixed skybox cube, built at compile time.
//!
//! ```text
//!        4--------5
//!       /|       /|
//!      6--------7 |
//!      | |      | |
//!      | 0------|-1
//!      |/       |/
//!      2--------3
//! ```

pub const SKYBOX_SCALE: f32 = 5.0;

#[rustfmt::skip]
pub const SKYBOX_VERTICES: [f32; 24] = [
    -SKYBOX_SCALE, -SKYBOX_SCALE, -SKYBOX_SCALE,
     SKYBOX_SCALE, -SKYBOX_SCALE, -SKYBOX_SCALE,
    -SKYBOX_SCALE, -SKYBOX_SCALE,  SKYBOX_SCALE,
     SKYBOX_SCALE, -SKYBOX_SCALE,  SKYBOX_SCALE,
    -SKYBOX_SCALE,  SKYBOX_SCALE, -SKYBOX_SCALE,
     SKYBOX_SCALE,  SKYBOX_SCALE, -SKYBOX_SCALE,
    -SKYBOX_SCALE,  SKYBOX_SCALE,  SKYBOX_SCALE,
     SKYBOX_SCALE,  SKYBOX_SCALE,  SKYBOX_SCALE,
];

#[rustfmt::skip]
pub const SKYBOX_INDICES: [u32; 36] = [
    // top
    4, 7, 6,
    4, 5, 7,
    // bottom
    0, 3, 1,
    0, 2, 3,
    // front
    0, 1, 4,
    4, 1, 5,
    // back
    6, 3, 2,
    6, 7, 3,
    // left
    6, 2, 0,
    4, 6, 0,
    // right
    1, 3, 7,
    7, 5, 1,
];

pub const SKYBOX_VERTEX_COUNT: usize = SKYBOX_VERTICES.len() / 3;
