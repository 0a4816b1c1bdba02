use crate::canvas::Color;
use crate::math::{Matrix, MatrixError, Vector2f, Vector3, Vector3f, Vector4f};
use crate::model::{Diffuse, Mesh};

/// Programmable stage of the pipeline.
///
/// `vertex` is called for the three corners of a face before `fragment` is
/// called for its covered pixels, so implementations keep per-face state
/// between the two.
pub trait Shader {
    /// Clip-space position of corner `nth` of face `face`.
    fn vertex(&mut self, face: usize, nth: usize) -> Vector4f;
    /// Color at the given barycentric coordinates, `None` to discard.
    fn fragment(&self, bar: Vector3f) -> Option<Color>;
}

/// Textured Gouraud shading: diffuse light intensity computed per vertex from
/// the mesh normals, interpolated across the face.
pub struct GouraudShader<'a, D: Diffuse + ?Sized> {
    mesh: &'a Mesh,
    diffuse: &'a D,
    transform: Matrix,        // projection * view * model, for positions.
    normal_matrix: Matrix,    // Inverse transpose of model, for normals.
    to_light: Vector3f,       // Unit vector pointing at the light.
    // Varyings written by the vertex stage.
    intensities: Vector3f,
    uvs: [Vector2f; 3],
}

impl<'a, D: Diffuse + ?Sized> GouraudShader<'a, D> {
    /// `light_direction` is the direction the light travels in.
    pub fn new(
        mesh: &'a Mesh,
        diffuse: &'a D,
        model: &Matrix,
        view: &Matrix,
        projection: &Matrix,
        light_direction: Vector3f,
    ) -> Self {
        let normal_matrix = match model.inverse() {
            Ok(inverse) => inverse.transpose(),
            // Singular model matrices collapse a dimension anyway; the rotation
            // part is still usable for lighting.
            Err(err @ MatrixError::Singular { .. }) => {
                log::warn!("Gouraud shader: {err}, lighting with the model matrix itself");
                model.clone()
            }
            Err(err) => panic!("model matrix must be 4x4: {err}"),
        };
        let mut to_light = light_direction * -1.0;
        to_light.normalize();
        return Self {
            mesh,
            diffuse,
            transform: projection * &(view * model),
            normal_matrix,
            to_light,
            intensities: Vector3f::default(),
            uvs: [Vector2f::default(); 3],
        };
    }

    fn transform_normal(&self, normal: Vector3f) -> Vector3f {
        let column = &self.normal_matrix * &Matrix::from(Vector4f::new(normal.x, normal.y, normal.z, 0.0));
        return column.to_vector3().normalized();
    }

    fn face_normal(&self, face: usize) -> Vector3f {
        let a = self.mesh.vertex(face, 0);
        let b = self.mesh.vertex(face, 1);
        let c = self.mesh.vertex(face, 2);
        return Vector3::cross(b - a, c - a);
    }
}

impl<'a, D: Diffuse + ?Sized> Shader for GouraudShader<'a, D> {
    fn vertex(&mut self, face: usize, nth: usize) -> Vector4f {
        let normal = match self.mesh.normal(face, nth) {
            Some(normal) => normal,
            None => self.face_normal(face),
        };
        let normal = self.transform_normal(normal);
        self.intensities[nth] = Vector3::dot(normal, self.to_light).max(0.0);
        self.uvs[nth] = self.mesh.uv(face, nth);
        return (&self.transform * &Matrix::from(self.mesh.vertex(face, nth))).to_vector4();
    }

    fn fragment(&self, bar: Vector3f) -> Option<Color> {
        let intensity = Vector3::dot(self.intensities, bar);
        let uv = self.uvs[0] * bar.x + self.uvs[1] * bar.y + self.uvs[2] * bar.z;
        return Some(self.diffuse.diffuse(uv).scaled(intensity));
    }
}
