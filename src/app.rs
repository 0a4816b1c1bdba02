use std::error::Error;
use std::time;

use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};

use crate::canvas::{Canvas, BLUE};
use crate::config::{Params, Scene};
use crate::frame::{FrameStats, RenderContext};
use crate::math::Vector3f;
use crate::model::{Mesh, Texture};
use crate::raster::{fill_flat_triangle, fill_line};
use crate::shader::GouraudShader;
use crate::transform::model_matrix;

/// Model rotation per frame, in degrees.
const ANGLE_STEP: f32 = 1.0;

/// Owns the session state and produces one finished frame per call.
pub struct SceneRenderer {
    scene: Scene,
    context: RenderContext,
    mesh: Mesh,
    texture: Texture,
    angle: f32,
}

impl SceneRenderer {
    /// Loads assets for mesh scenes. Missing files give an empty frame, not an error.
    pub fn new(params: &Params) -> Self {
        let (mesh, texture) = match params.scene {
            Scene::Model | Scene::Gouraud => (
                Mesh::load_or_empty(&params.mesh_path),
                Texture::load_or_blank(&params.texture_path),
            ),
            Scene::Line | Scene::Triangle => (Mesh::default(), Texture::blank()),
        };
        return Self::with_assets(params.scene, params.width, params.height, mesh, texture);
    }

    pub fn with_assets(scene: Scene, width: u32, height: u32, mesh: Mesh, texture: Texture) -> Self {
        return SceneRenderer {
            scene,
            context: RenderContext::new(width, height),
            mesh,
            texture,
            angle: 0.0,
        };
    }

    pub fn context(&self) -> &RenderContext {
        return &self.context;
    }

    /// Renders the next frame and returns it with the top-left origin that
    /// windows and image files expect.
    pub fn render_next(&mut self) -> &Canvas {
        self.context.begin_frame();
        let stats = match self.scene {
            Scene::Line => {
                fill_line(&mut self.context.canvas, 0, 0, 500, 500, BLUE);
                FrameStats::default()
            }
            Scene::Triangle => {
                fill_flat_triangle(
                    &mut self.context.canvas,
                    [
                        Vector3f::new(100.0, 100.0, 0.0),
                        Vector3f::new(100.0, 500.0, 0.0),
                        Vector3f::new(500.0, 500.0, 0.0),
                    ],
                );
                FrameStats { faces_drawn: 1, faces_skipped: 0 }
            }
            Scene::Model => self.context.render_model(&self.mesh, &self.texture, self.angle),
            Scene::Gouraud => {
                let model = model_matrix(self.angle, Vector3f::new(0.0, 1.0, 0.0));
                let view = self.context.camera.view_matrix();
                let projection = self.context.projection_matrix();
                let mut shader = GouraudShader::new(
                    &self.mesh,
                    &self.texture,
                    &model,
                    &view,
                    &projection,
                    self.context.light_direction,
                );
                self.context.render_shaded(&self.mesh, &mut shader)
            }
        };
        if stats.faces_skipped > 0 {
            log::debug!("Frame at {} degrees skipped {} faces", self.angle, stats.faces_skipped);
        }
        self.angle = (self.angle + ANGLE_STEP) % 360.0;
        self.context.canvas.flip_vertically();
        return &self.context.canvas;
    }
}

/// Renders `frames` frames without opening a window and saves the last one
/// if an output path is configured.
pub fn run_headless(params: &Params, frames: u32) -> Result<(), Box<dyn Error>> {
    let mut renderer = SceneRenderer::new(params);
    let time_begin = time::Instant::now();
    for _ in 1..frames {
        renderer.render_next();
    }
    let canvas = renderer.render_next();
    log::info!(
        "Rendered {} frames of {:?} in {:.3}s",
        frames,
        params.scene,
        time_begin.elapsed().as_secs_f32()
    );
    if let Some(path) = &params.output_path {
        canvas.save(path)?;
    }
    return Ok(());
}

/// Helper, defining exit event to be an Escape key press or the window closing.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    match window_event {
        event::WindowEvent::KeyboardInput(event) => {
            return event.input.key_code == Some(event::VirtualKeyCode::Escape) && event.input.state.is_released();
        }
        event::WindowEvent::CloseRequested(_) | event::WindowEvent::Destroyed(_) => return true,
        _ => return false,
    }
}

/// Shows frames in a window until Escape is pressed, then saves the last
/// frame if an output path is configured. Must run inside the show-image context.
pub fn run_window(params: &Params) -> Result<(), Box<dyn Error>> {
    let mut renderer = SceneRenderer::new(params);

    let window_options = WindowOptions {
        size: Some([params.width, params.height]),
        ..Default::default()
    };
    let window = create_window("output", window_options)?;
    let event_channel = window.event_channel()?;

    let mut exit = false;
    let mut frame_counter_time_begin = time::Instant::now();
    let mut frame_counter: u32 = 0;
    while !exit {
        let canvas = renderer.render_next();
        let image_data = ImageView::new(ImageInfo::rgb8(canvas.width(), canvas.height()), canvas.as_pixel_data());
        window.set_image("image", image_data)?;

        // Draining everything that piled up in the event channel, looking for an exit event.
        exit = event_channel.try_iter().fold(false, |exit, window_event| exit | is_exit_event(window_event));

        if params.print_fps {
            frame_counter += 1;
            if frame_counter_time_begin.elapsed().as_secs_f32() > 1.0 {
                log::info!("FPS --- {}", frame_counter);
                frame_counter_time_begin = time::Instant::now();
                frame_counter = 0;
            }
        }
    }

    if let Some(path) = &params.output_path {
        renderer.context().canvas.save(path)?;
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Origin, BLACK, CYAN};

    #[test]
    fn line_scene_draws_a_blue_diagonal() {
        let mut renderer = SceneRenderer::with_assets(Scene::Line, 64, 64, Mesh::default(), Texture::blank());
        let canvas = renderer.render_next();
        assert_eq!(canvas.origin(), Origin::TopLeft);
        assert_eq!(canvas.get_pixel(0, 0), Some(BLUE));
        assert_eq!(canvas.get_pixel(63, 63), Some(BLUE));
        assert_eq!(canvas.get_pixel(10, 0), Some(BLACK));
    }

    #[test]
    fn triangle_scene_is_stable_across_frames() {
        let mut renderer = SceneRenderer::with_assets(Scene::Triangle, 600, 600, Mesh::default(), Texture::blank());
        let first = renderer.render_next().as_pixel_data().to_vec();
        let second = renderer.render_next();
        assert_eq!(first, second.as_pixel_data());
        assert_eq!(second.get_pixel(150, 400), Some(CYAN));
        assert_eq!(second.get_pixel(400, 150), Some(BLACK));
    }

    #[test]
    fn mesh_scene_with_missing_assets_is_a_blank_frame() {
        let params = Params {
            width: 32,
            height: 32,
            mesh_path: "missing/mesh.obj".into(),
            texture_path: "missing/texture.tga".into(),
            ..Params::default()
        };
        let mut renderer = SceneRenderer::new(&params);
        assert!(renderer.render_next().as_pixel_data().iter().all(|&c| c == 0));
    }
}
