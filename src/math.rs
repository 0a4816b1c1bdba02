//! Small linear algebra core: fixed-arity vectors and a runtime-sized matrix.

pub mod matrix;
pub mod vector;

pub use matrix::{Matrix, MatrixError, SINGULAR_EPSILON};
pub use vector::{Scalar, Vector2, Vector2f, Vector2i, Vector3, Vector3f, Vector3i, Vector4, Vector4f};
