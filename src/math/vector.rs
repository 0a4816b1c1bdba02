use std::fmt;
use std::ops;

/// Component type of the fixed-arity vectors. Implemented for f32 and i32.
pub trait Scalar:
    Copy
    + Default
    + PartialOrd
    + fmt::Debug
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
{
}

impl Scalar for f32 {}
impl Scalar for i32 {}

/// Vector2 storing 2 scalars.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector2<T: Scalar> {
    pub x: T,
    pub y: T,
}

/// Vector3 storing 3 scalars.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3<T: Scalar> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// Vector4 storing 4 scalars. Used for homogeneous coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector4<T: Scalar> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

pub type Vector2f = Vector2<f32>;
pub type Vector2i = Vector2<i32>;
pub type Vector3f = Vector3<f32>;
pub type Vector3i = Vector3<i32>;
pub type Vector4f = Vector4<f32>;

impl<T: Scalar> Vector2<T> {
    pub fn new(x: T, y: T) -> Self {
        return Self { x, y };
    }
}

impl<T: Scalar> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        return Self { x, y, z };
    }

    /// Dot product of 2 Vector3's.
    pub fn dot(a: Self, b: Self) -> T {
        return a.x * b.x + a.y * b.y + a.z * b.z;
    }

    /// Cross product of 2 Vector3's.
    pub fn cross(a: Self, b: Self) -> Self {
        return Self {
            x: a.y * b.z - a.z * b.y,
            y: a.z * b.x - a.x * b.z,
            z: a.x * b.y - a.y * b.x,
        };
    }
}

impl<T: Scalar> Vector4<T> {
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        return Self { x, y, z, w };
    }

    /// Dot product of 2 Vector4's.
    pub fn dot(a: Self, b: Self) -> T {
        return a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w;
    }
}

impl Vector2f {
    pub fn norm(&self) -> f32 {
        return (self.x * self.x + self.y * self.y).sqrt();
    }
}

impl Vector3f {
    /// Euclidean norm of a Vector3.
    pub fn norm(&self) -> f32 {
        return Vector3::dot(*self, *self).sqrt();
    }

    /// Rescales the vector in place to unit length.
    pub fn normalize(&mut self) -> &mut Self {
        return self.normalize_to(1.0);
    }

    /// Rescales the vector in place to the given length.
    /// A zero vector has no direction and is left untouched.
    pub fn normalize_to(&mut self, length: f32) -> &mut Self {
        let norm = self.norm();
        if norm > 0.0 {
            *self = *self * (length / norm);
        }
        return self;
    }

    /// Unit length copy of the vector.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        return self;
    }

    pub fn is_finite(&self) -> bool {
        return self.x.is_finite() && self.y.is_finite() && self.z.is_finite();
    }
}

impl Vector4f {
    /// Euclidean norm of a Vector4.
    pub fn norm(&self) -> f32 {
        return Vector4::dot(*self, *self).sqrt();
    }

    /// Rescales the vector in place to the given length.
    /// A zero vector has no direction and is left untouched.
    pub fn normalize_to(&mut self, length: f32) -> &mut Self {
        let norm = self.norm();
        if norm > 0.0 {
            *self = *self * (length / norm);
        }
        return self;
    }

    pub fn normalize(&mut self) -> &mut Self {
        return self.normalize_to(1.0);
    }
}

impl From<Vector3i> for Vector3f {
    fn from(v: Vector3i) -> Self {
        return Vector3f::new(v.x as f32, v.y as f32, v.z as f32);
    }
}

impl From<Vector2i> for Vector2f {
    fn from(v: Vector2i) -> Self {
        return Vector2f::new(v.x as f32, v.y as f32);
    }
}

// Componentwise arithmetic for every arity. Scalar multiplication is
// `vector * scalar`; f32 also gets `scalar * vector`.
macro_rules! impl_componentwise {
    ($name:ident { $($field:ident),+ }) => {
        impl<T: Scalar> ops::Add for $name<T> {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                return Self { $($field: self.$field + rhs.$field),+ };
            }
        }

        impl<T: Scalar> ops::Sub for $name<T> {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                return Self { $($field: self.$field - rhs.$field),+ };
            }
        }

        impl<T: Scalar> ops::Mul<T> for $name<T> {
            type Output = Self;

            fn mul(self, rhs: T) -> Self {
                return Self { $($field: self.$field * rhs),+ };
            }
        }

        impl ops::Mul<$name<f32>> for f32 {
            type Output = $name<f32>;

            fn mul(self, rhs: $name<f32>) -> $name<f32> {
                return rhs * self;
            }
        }

        impl<T: Scalar> ops::AddAssign for $name<T> {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }
    };
}

impl_componentwise!(Vector2 { x, y });
impl_componentwise!(Vector3 { x, y, z });
impl_componentwise!(Vector4 { x, y, z, w });

// Out-of-range indices clamp to the last component instead of panicking.
impl<T: Scalar> ops::Index<usize> for Vector2<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            _ => &self.y,
        }
    }
}

impl<T: Scalar> ops::IndexMut<usize> for Vector2<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match i {
            0 => &mut self.x,
            _ => &mut self.y,
        }
    }
}

impl<T: Scalar> ops::Index<usize> for Vector3<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }
}

impl<T: Scalar> ops::IndexMut<usize> for Vector3<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }
}

impl<T: Scalar> ops::Index<usize> for Vector4<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => &self.w,
        }
    }
}

impl<T: Scalar> ops::IndexMut<usize> for Vector4<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => &mut self.w,
        }
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Vector3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "({}, {}, {})", self.x, self.y, self.z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_basis_vectors_follows_right_hand_rule() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(Vector3::cross(x, y), Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(Vector3::cross(y, x), Vector3f::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn integer_vectors_support_componentwise_ops() {
        let a = Vector3i::new(1, 2, 3);
        let b = Vector3i::new(4, 5, 6);
        assert_eq!(a + b, Vector3i::new(5, 7, 9));
        assert_eq!(b - a, Vector3i::new(3, 3, 3));
        assert_eq!(a * 2, Vector3i::new(2, 4, 6));
        assert_eq!(Vector3::dot(a, b), 32);
    }

    #[test]
    fn index_out_of_range_clamps_to_last_component() {
        let mut v = Vector3f::new(1.0, 2.0, 3.0);
        assert_eq!(v[7], 3.0);
        v[5] = 9.0;
        assert_eq!(v.z, 9.0);

        let mut w = Vector4f::new(1.0, 2.0, 3.0, 4.0);
        w[1] += 10.0;
        assert_eq!(w.y, 12.0);
        assert_eq!(w[100], 4.0);

        let uv = Vector2f::new(0.25, 0.75);
        assert_eq!(uv[3], 0.75);
    }

    #[test]
    fn normalize_to_target_length() {
        let mut v = Vector3f::new(3.0, 0.0, 4.0);
        v.normalize_to(10.0);
        assert!((v.norm() - 10.0).abs() < 1e-5);
        assert!((v.x - 6.0).abs() < 1e-5);
    }

    #[test]
    fn normalizing_zero_vector_keeps_it_finite() {
        let mut v = Vector3f::default();
        v.normalize();
        assert!(v.is_finite());
        assert_eq!(v, Vector3f::default());
    }

    #[test]
    fn scalar_multiplication_is_symmetric() {
        let v = Vector2f::new(1.0, -2.0);
        assert_eq!(2.0 * v, v * 2.0);
    }
}
