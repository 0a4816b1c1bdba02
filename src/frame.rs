//! Per-frame orchestration: transforms every face of a mesh and hands the
//! screen-space triangles to the rasterizer.

use crate::canvas::{Canvas, DepthBuffer};
use crate::math::{Matrix, Vector2f, Vector3, Vector3f, Vector4f};
use crate::model::{Diffuse, Mesh};
use crate::raster::{rasterize_shaded, rasterize_triangle};
use crate::shader::Shader;
use crate::transform::{look_at, model_matrix, perspective_divide, projection, viewport};

/// Faces facing away from the light still get this much light.
pub const AMBIENT_FLOOR: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vector3f,
    pub target: Vector3f,
    pub up: Vector3f,
}

impl Default for Camera {
    fn default() -> Self {
        return Camera {
            eye: Vector3f::new(0.0, 0.0, 3.0),
            target: Vector3f::new(0.0, 0.0, 0.0),
            up: Vector3f::new(0.0, 1.0, 0.0),
        };
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Matrix {
        return look_at(self.eye, self.target, self.up);
    }
}

/// Perspective parameters, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        return Lens {
            fov_y: 45.0,
            z_near: 0.1,
            z_far: 50.0,
        };
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub faces_drawn: usize,
    pub faces_skipped: usize,
}

/// Everything one rendering session owns: both buffers, the camera, the
/// light and the fixed projection/viewport matrices.
pub struct RenderContext {
    pub canvas: Canvas,
    pub depth: DepthBuffer,
    pub camera: Camera,
    /// Direction the light travels in.
    pub light_direction: Vector3f,
    pub lens: Lens,
    viewport: Matrix,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        return RenderContext {
            canvas: Canvas::new(width, height),
            depth: DepthBuffer::new(width, height),
            camera: Camera::default(),
            light_direction: Vector3f::new(0.0, 0.0, -1.0),
            lens: Lens::default(),
            viewport: viewport(0, 0, width, height),
        };
    }

    pub fn width(&self) -> u32 {
        return self.canvas.width();
    }

    pub fn height(&self) -> u32 {
        return self.canvas.height();
    }

    pub fn viewport_matrix(&self) -> &Matrix {
        return &self.viewport;
    }

    pub fn projection_matrix(&self) -> Matrix {
        let aspect_ratio = self.width() as f32 / self.height() as f32;
        return projection(self.lens.fov_y, aspect_ratio, self.lens.z_near, self.lens.z_far);
    }

    /// Clears pixels to black and depth to negative infinity.
    pub fn begin_frame(&mut self) {
        self.canvas.clear();
        self.depth.clear();
    }

    /// Screen position of a clip-space point, or `None` if the point is on
    /// or behind the camera plane (w >= 0, since the camera looks down -Z)
    /// or lands on non-finite coordinates.
    fn clip_to_screen(&self, clip: Vector4f) -> Option<Vector3f> {
        if !(clip.w < 0.0) {
            return None;
        }
        let mut column = Matrix::from(clip);
        let screen = (&self.viewport * &*perspective_divide(&mut column)).to_vector3();
        if !screen.is_finite() {
            return None;
        }
        return Some(screen);
    }

    /// Draws the textured mesh rotated by `angle` degrees around the Y axis,
    /// lit with flat per-face intensity.
    pub fn render_model<D: Diffuse + ?Sized>(&mut self, mesh: &Mesh, diffuse: &D, angle: f32) -> FrameStats {
        let model = model_matrix(angle, Vector3f::new(0.0, 1.0, 0.0));
        let mvp = self.projection_matrix() * (self.camera.view_matrix() * model);
        let mut stats = FrameStats::default();

        for face in 0..mesh.n_faces() {
            let mut screen = [Vector3f::default(); 3];
            let mut uvs = [Vector2f::default(); 3];
            let mut visible = true;
            for nth in 0..3 {
                let clip = (&mvp * &Matrix::from(mesh.vertex(face, nth))).to_vector4();
                match self.clip_to_screen(clip) {
                    Some(point) => screen[nth] = point,
                    None => visible = false,
                }
                uvs[nth] = mesh.uv(face, nth);
            }
            if !visible {
                stats.faces_skipped += 1;
                continue;
            }

            // Screen space is y up with depth growing toward the viewer, so this
            // points away from the camera for faces that face it.
            let normal = Vector3::cross(screen[2] - screen[0], screen[1] - screen[0]).normalized();
            let intensity = Vector3::dot(normal, self.light_direction).max(AMBIENT_FLOOR);
            rasterize_triangle(&mut self.canvas, &mut self.depth, screen, uvs, diffuse, intensity);
            stats.faces_drawn += 1;
        }

        log::debug!("render_model: {stats:?}");
        return stats;
    }

    /// Draws the mesh with a programmable shader.
    pub fn render_shaded<S: Shader + ?Sized>(&mut self, mesh: &Mesh, shader: &mut S) -> FrameStats {
        let mut stats = FrameStats::default();
        for face in 0..mesh.n_faces() {
            let mut screen = [Vector3f::default(); 3];
            let mut visible = true;
            for nth in 0..3 {
                match self.clip_to_screen(shader.vertex(face, nth)) {
                    Some(point) => screen[nth] = point,
                    None => visible = false,
                }
            }
            if !visible {
                stats.faces_skipped += 1;
                continue;
            }
            rasterize_shaded(&mut self.canvas, &mut self.depth, screen, shader);
            stats.faces_drawn += 1;
        }

        log::debug!("render_shaded: {stats:?}");
        return stats;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Color, BLACK, WHITE};
    use crate::model::FaceVertex;

    fn single_triangle(z: f32) -> Mesh {
        let corner = |v| FaceVertex { vertex: v, uv: None, normal: None };
        return Mesh::new(
            vec![Vector3f::new(-1.0, -1.0, z), Vector3f::new(1.0, -1.0, z), Vector3f::new(0.0, 1.0, z)],
            vec![],
            vec![],
            vec![[corner(0), corner(1), corner(2)]],
        );
    }

    #[test]
    fn empty_mesh_renders_nothing() {
        let mut context = RenderContext::new(32, 32);
        context.begin_frame();
        let stats = context.render_model(&Mesh::default(), &WHITE, 0.0);
        assert_eq!(stats, FrameStats::default());
        assert!(context.canvas.as_pixel_data().iter().all(|&c| c == 0));
        assert!(context.depth.as_slice().iter().all(|z| *z == f32::NEG_INFINITY));
    }

    #[test]
    fn facing_triangle_is_drawn_at_full_light() {
        let mut context = RenderContext::new(64, 64);
        context.begin_frame();
        let stats = context.render_model(&single_triangle(0.0), &WHITE, 0.0);
        assert_eq!(stats.faces_drawn, 1);
        let center = context.canvas.get_pixel(32, 28).unwrap();
        assert!(center.r >= 254, "{center:?}");
        assert!(context.depth.get(32, 28).is_finite());
        // Corners of the screen stay empty.
        assert_eq!(context.canvas.get_pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn triangle_behind_the_camera_is_skipped() {
        let mut context = RenderContext::new(32, 32);
        context.begin_frame();
        let stats = context.render_model(&single_triangle(5.0), &WHITE, 0.0);
        assert_eq!(stats, FrameStats { faces_drawn: 0, faces_skipped: 1 });
    }

    #[test]
    fn back_facing_triangle_gets_the_ambient_floor() {
        let mut context = RenderContext::new(64, 64);
        context.begin_frame();
        context.render_model(&single_triangle(0.0), &Color::new(200, 200, 200), 180.0);
        assert_eq!(context.canvas.get_pixel(32, 28), Some(Color::new(20, 20, 20)));
    }

    #[test]
    fn begin_frame_resets_both_buffers() {
        let mut context = RenderContext::new(16, 16);
        context.render_model(&single_triangle(0.0), &WHITE, 0.0);
        context.begin_frame();
        assert!(context.canvas.as_pixel_data().iter().all(|&c| c == 0));
        assert!(context.depth.as_slice().iter().all(|z| *z == f32::NEG_INFINITY));
    }
}
