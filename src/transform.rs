//! Model, view, projection and viewport matrices.
//!
//! Vertices are 4x1 columns multiplied on the right, so the full chain is
//! `viewport * divide(projection * view * model * vertex)`. The camera looks
//! down -Z. After projection and divide the near plane lands on z = +1 and the
//! far plane on z = -1, so after the viewport a larger depth means closer to
//! the camera.

use std::f32::consts::PI;

use crate::math::{Matrix, Vector3, Vector3f};

/// Depth range of the viewport transform, the z-buffer resolution.
pub const DEPTH: f32 = 255.0;

fn degrees_to_radians(degrees: f32) -> f32 {
    return degrees * PI / 180.0;
}

/// Rotation by `angle` degrees around `axis` (Rodrigues' formula), as a 4x4
/// homogeneous matrix. The axis does not have to be normalized.
pub fn model_matrix(angle: f32, axis: Vector3f) -> Matrix {
    let mut axis = axis;
    axis.normalize();
    let angle = degrees_to_radians(angle);
    let (sin, cos) = angle.sin_cos();
    let (x, y, z) = (axis.x, axis.y, axis.z);

    // Outer product n * n^T and the cross product matrix [n]x, padded to 4x4.
    let mut outer = Matrix::new(4, 4);
    let mut skew = Matrix::new(4, 4);
    for i in 0..3 {
        for j in 0..3 {
            outer[i][j] = axis[i] * axis[j];
        }
    }
    skew[0][1] = -z;
    skew[0][2] = y;
    skew[1][0] = z;
    skew[1][2] = -x;
    skew[2][0] = -y;
    skew[2][1] = x;

    let mut rotation = Matrix::identity(4) * cos + (1.0 - cos) * outer + sin * skew;
    rotation[3][3] = 1.0;
    return rotation;
}

/// World to camera transform for a camera at `eye` looking at `target`.
///
/// A zero-length view direction or an `up` parallel to it has no valid basis;
/// the result is still finite but collapses the degenerate axes to zero.
pub fn look_at(eye: Vector3f, target: Vector3f, up: Vector3f) -> Matrix {
    let z = (eye - target).normalized();
    let x = Vector3::cross(up, z).normalized();
    let y = Vector3::cross(z, x).normalized();
    if x.norm() == 0.0 {
        log::warn!("look_at: degenerate camera basis (eye {eye}, target {target}, up {up})");
    }

    let mut rotation = Matrix::identity(4);
    let mut translation = Matrix::identity(4);
    for i in 0..3 {
        rotation[0][i] = x[i];
        rotation[1][i] = y[i];
        rotation[2][i] = z[i];
        translation[i][3] = -eye[i];
    }
    // Translate first, then rotate into the camera basis.
    return rotation * translation;
}

/// Perspective projection into the [-1, 1]^3 cube.
///
/// `fov_y` is the vertical field of view in degrees, `z_near`/`z_far` are
/// positive distances in front of the camera.
pub fn projection(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Matrix {
    let n = -z_near;
    let f = -z_far;
    let top = (degrees_to_radians(fov_y) / 2.0).tan() * z_near;
    let bottom = -top;
    let right = aspect_ratio * top;
    let left = -right;

    // Squashes the frustum into a box, keeping z on the near and far planes.
    let perspective_to_ortho = Matrix::from([
        n, 0.0, 0.0, 0.0,
        0.0, n, 0.0, 0.0,
        0.0, 0.0, n + f, -n * f,
        0.0, 0.0, 1.0, 0.0,
    ]);
    let ortho_translate = Matrix::from([
        1.0, 0.0, 0.0, -(right + left) / 2.0,
        0.0, 1.0, 0.0, -(top + bottom) / 2.0,
        0.0, 0.0, 1.0, -(n + f) / 2.0,
        0.0, 0.0, 0.0, 1.0,
    ]);
    let ortho_scale = Matrix::from([
        2.0 / (right - left), 0.0, 0.0, 0.0,
        0.0, 2.0 / (top - bottom), 0.0, 0.0,
        0.0, 0.0, 2.0 / (n - f), 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    // Translate then scale the box into the unit cube.
    return ortho_scale * ortho_translate * perspective_to_ortho;
}

/// Divides x, y, z of a homogeneous column by w and sets w to 1, in place.
pub fn perspective_divide(clip: &mut Matrix) -> &mut Matrix {
    let w = clip[3][0];
    for i in 0..3 {
        clip[i][0] /= w;
    }
    clip[3][0] = 1.0;
    return clip;
}

/// Maps normalized device coordinates onto the pixel rectangle at (x, y) of
/// the given size, and z from [-1, 1] onto [0, DEPTH].
pub fn viewport(x: i32, y: i32, width: u32, height: u32) -> Matrix {
    let (x, y) = (x as f32, y as f32);
    let (w, h) = (width as f32, height as f32);

    // [-1, 1] -> [0, 2]
    let mut shift = Matrix::identity(4);
    for i in 0..3 {
        shift[i][3] = 1.0;
    }
    // [0, 2] -> [0, 1]
    let mut halve = Matrix::identity(4);
    for i in 0..3 {
        halve[i][i] = 0.5;
    }
    // [0, 1] -> [0, w] x [0, h] x [0, DEPTH]
    let mut stretch = Matrix::identity(4);
    stretch[0][0] = w;
    stretch[1][1] = h;
    stretch[2][2] = DEPTH;
    // Move to the viewport origin.
    let mut origin = Matrix::identity(4);
    origin[0][3] = x;
    origin[1][3] = y;

    return origin * stretch * halve * shift;
}

/// Runs one vertex through the whole chain and returns screen x, y and depth.
pub fn to_screen(vertex: Vector3f, mvp: &Matrix, viewport: &Matrix) -> Vector3f {
    let mut clip = mvp * &Matrix::from(vertex);
    return (viewport * &*perspective_divide(&mut clip)).to_vector3();
}
