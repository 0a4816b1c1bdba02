use std::fmt;
use std::ops;

use thiserror::Error;

use super::vector::{Vector3f, Vector4f};

/// Determinants with a smaller magnitude are treated as zero by `inverse`.
/// Fixed constant, not scaled by the matrix contents.
pub const SINGULAR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("dimension mismatch: {op} of {lhs_rows}x{lhs_cols} and {rhs_rows}x{rhs_cols}")]
    DimensionMismatch {
        op: &'static str,
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },
    #[error("{op} needs a square matrix, got {rows}x{cols}")]
    NotSquare {
        op: &'static str,
        rows: usize,
        cols: usize,
    },
    #[error("matrix is singular (determinant {determinant})")]
    Singular { determinant: f32 },
    #[error("expected 9 or 16 values for a square matrix, got {0}")]
    InvalidLength(usize),
}

/// Dense row-major matrix of f32 with dimensions fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Default for Matrix {
    /// 4x4 zero matrix.
    fn default() -> Self {
        return Matrix::new(4, 4);
    }
}

impl Matrix {
    /// Zero-filled matrix of the given size.
    pub fn new(rows: usize, cols: usize) -> Self {
        return Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        };
    }

    pub fn identity(n: usize) -> Self {
        let mut result = Matrix::new(n, n);
        for i in 0..n {
            result[i][i] = 1.0;
        }
        return result;
    }

    /// Builds a 3x3 or 4x4 matrix from a row-major list of 9 or 16 values.
    pub fn from_slice(values: &[f32]) -> Result<Self, MatrixError> {
        let n = match values.len() {
            9 => 3,
            16 => 4,
            len => return Err(MatrixError::InvalidLength(len)),
        };
        return Ok(Self {
            rows: n,
            cols: n,
            data: values.to_vec(),
        });
    }

    pub fn rows(&self) -> usize {
        return self.rows;
    }

    pub fn cols(&self) -> usize {
        return self.cols;
    }

    pub fn is_square(&self) -> bool {
        return self.rows == self.cols;
    }

    pub fn is_finite(&self) -> bool {
        return self.data.iter().all(|value| value.is_finite());
    }

    /// First column of a 4xN matrix read as a 3D point, ignoring w.
    pub fn to_vector3(&self) -> Vector3f {
        assert!(self.rows >= 3, "to_vector3 needs at least 3 rows, got {}", self.rows);
        return Vector3f::new(self[0][0], self[1][0], self[2][0]);
    }

    /// First column of a 4xN matrix.
    pub fn to_vector4(&self) -> Vector4f {
        assert!(self.rows >= 4, "to_vector4 needs at least 4 rows, got {}", self.rows);
        return Vector4f::new(self[0][0], self[1][0], self[2][0], self[3][0]);
    }

    pub fn checked_add(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return Err(self.mismatch("addition", rhs));
        }
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(a, b)| a + b)
            .collect();
        return Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        });
    }

    pub fn checked_mul(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.cols != rhs.rows {
            return Err(self.mismatch("multiplication", rhs));
        }
        let mut result = Matrix::new(self.rows, rhs.cols);
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self[i][k] * rhs[k][j];
                }
                result[i][j] = sum;
            }
        }
        return Ok(result);
    }

    pub fn scale(&self, factor: f32) -> Matrix {
        return Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|value| value * factor).collect(),
        };
    }

    pub fn transpose(&self) -> Matrix {
        let mut result = Matrix::new(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                result[j][i] = self[i][j];
            }
        }
        return result;
    }

    /// Determinant by cofactor expansion along the first row.
    /// Factorial cost, fine for the 4x4 matrices used here.
    pub fn determinant(&self) -> Result<f32, MatrixError> {
        self.require_square("determinant")?;
        return Ok(self.cofactor_expansion());
    }

    fn cofactor_expansion(&self) -> f32 {
        match self.rows {
            0 => return 1.0,
            1 => return self[0][0],
            2 => return self[0][0] * self[1][1] - self[0][1] * self[1][0],
            _ => (),
        }
        let mut result = 0.0;
        for col in 0..self.cols {
            let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
            result += sign * self[0][col] * self.minor(0, col).cofactor_expansion();
        }
        return result;
    }

    /// Matrix with the given row and column removed.
    fn minor(&self, row: usize, col: usize) -> Matrix {
        let mut result = Matrix::new(self.rows - 1, self.cols - 1);
        let mut index = 0;
        for i in (0..self.rows).filter(|&i| i != row) {
            for j in (0..self.cols).filter(|&j| j != col) {
                result.data[index] = self[i][j];
                index += 1;
            }
        }
        return result;
    }

    /// Signed minor at (row, col): positive when row + col is even.
    pub fn algebraic_complement(&self, row: usize, col: usize) -> Result<f32, MatrixError> {
        self.require_square("algebraic complement")?;
        assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) is outside a {}x{} matrix",
            self.rows,
            self.cols
        );
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        return Ok(sign * self.minor(row, col).cofactor_expansion());
    }

    /// Transpose of the matrix of algebraic complements.
    pub fn adjugate(&self) -> Result<Matrix, MatrixError> {
        self.require_square("adjugate")?;
        let mut complements = Matrix::new(self.rows, self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                complements[i][j] = self.algebraic_complement(i, j)?;
            }
        }
        return Ok(complements.transpose());
    }

    pub fn inverse(&self) -> Result<Matrix, MatrixError> {
        let determinant = self.determinant()?;
        if determinant.abs() < SINGULAR_EPSILON {
            return Err(MatrixError::Singular { determinant });
        }
        return Ok(self.adjugate()?.scale(1.0 / determinant));
    }

    fn require_square(&self, op: &'static str) -> Result<(), MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                op,
                rows: self.rows,
                cols: self.cols,
            });
        }
        return Ok(());
    }

    fn mismatch(&self, op: &'static str, rhs: &Matrix) -> MatrixError {
        return MatrixError::DimensionMismatch {
            op,
            lhs_rows: self.rows,
            lhs_cols: self.cols,
            rhs_rows: rhs.rows,
            rhs_cols: rhs.cols,
        };
    }
}

/// Row-major 4x4 literal.
impl From<[f32; 16]> for Matrix {
    fn from(values: [f32; 16]) -> Self {
        return Matrix {
            rows: 4,
            cols: 4,
            data: values.to_vec(),
        };
    }
}

/// Row-major 3x3 literal.
impl From<[f32; 9]> for Matrix {
    fn from(values: [f32; 9]) -> Self {
        return Matrix {
            rows: 3,
            cols: 3,
            data: values.to_vec(),
        };
    }
}

/// Homogeneous point: 4x1 column with w = 1.
impl From<Vector3f> for Matrix {
    fn from(v: Vector3f) -> Self {
        return Matrix {
            rows: 4,
            cols: 1,
            data: vec![v.x, v.y, v.z, 1.0],
        };
    }
}

impl From<Vector4f> for Matrix {
    fn from(v: Vector4f) -> Self {
        return Matrix {
            rows: 4,
            cols: 1,
            data: vec![v.x, v.y, v.z, v.w],
        };
    }
}

/// Row access, `m[row][col]`. The row index is bounds checked.
impl ops::Index<usize> for Matrix {
    type Output = [f32];

    fn index(&self, row: usize) -> &[f32] {
        assert!(row < self.rows, "row {row} out of bounds for {} rows", self.rows);
        return &self.data[row * self.cols..(row + 1) * self.cols];
    }
}

impl ops::IndexMut<usize> for Matrix {
    fn index_mut(&mut self, row: usize) -> &mut [f32] {
        assert!(row < self.rows, "row {row} out of bounds for {} rows", self.rows);
        return &mut self.data[row * self.cols..(row + 1) * self.cols];
    }
}

// Operator forms treat a dimension mismatch as a caller bug and panic.
impl ops::Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        match self.checked_mul(rhs) {
            Ok(result) => return result,
            Err(err) => panic!("{err}"),
        }
    }
}

impl ops::Mul<Matrix> for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        return &self * &rhs;
    }
}

impl ops::Mul<&Matrix> for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        return &self * rhs;
    }
}

impl ops::Add<&Matrix> for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: &Matrix) -> Matrix {
        match self.checked_add(rhs) {
            Ok(result) => return result,
            Err(err) => panic!("{err}"),
        }
    }
}

impl ops::Add<Matrix> for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Matrix) -> Matrix {
        return &self + &rhs;
    }
}

impl ops::Mul<f32> for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f32) -> Matrix {
        return self.scale(rhs);
    }
}

impl ops::Mul<f32> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f32) -> Matrix {
        return self.scale(rhs);
    }
}

impl ops::Mul<Matrix> for f32 {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        return rhs.scale(self);
    }
}

impl ops::Mul<&Matrix> for f32 {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        return rhs.scale(self);
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            let row: Vec<String> = self[i].iter().map(|value| value.to_string()).collect();
            writeln!(f, "{}", row.join("\t"))?;
        }
        return Ok(());
    }
}
