use std::path::Path;

use crate::error::RenderError;

/// Struct, representing raw rgb8 pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
pub const BLUE: Color = Color { r: 0, g: 0, b: 255 };
pub const CYAN: Color = Color { r: 0, g: 255, b: 255 };

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        return Color { r, g, b };
    }

    /// Get convex combination of two colors: t * c_1 + (1 - t) * c_2.
    /// t is unrestricted, channels saturate at 0 and 255.
    pub fn blend(color_1: Color, color_2: Color, t: f32) -> Color {
        fn mix(a: u8, b: u8, t: f32) -> u8 {
            return (t * a as f32 + (1.0 - t) * b as f32).clamp(0.0, 255.0) as u8;
        }
        return Color {
            r: mix(color_1.r, color_2.r, t),
            g: mix(color_1.g, color_2.g, t),
            b: mix(color_1.b, color_2.b, t),
        };
    }

    /// Every channel multiplied by `intensity`, clamped to the 8-bit range.
    pub fn scaled(self, intensity: f32) -> Color {
        return Color::blend(self, BLACK, intensity);
    }
}

/// Pixels in a `width` x `height` grid. Multiplied in usize so large
/// dimensions don't wrap.
fn cell_count(width: u32, height: u32) -> usize {
    return width as usize * height as usize;
}

/// Row order of the pixel data as currently laid out in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Row 0 is the bottom of the picture, y grows upward.
    BottomLeft,
    /// Row 0 is the top of the picture, as image files and windows expect.
    TopLeft,
}

/// Canvas, holding its width, height and private flat array(vec) of rgb8 pixel data.
///
/// Coordinates passed to `set_pixel`/`get_pixel` are always y-up with (0, 0)
/// in the bottom left; `origin` only describes the memory layout, which
/// `flip_vertically` toggles before handing the data to a top-left consumer.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    origin: Origin,
    pixel_data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Canvas {
        let capacity = 3 * cell_count(width, height);
        return Canvas {
            width,
            height,
            origin: Origin::BottomLeft,
            pixel_data: vec![0; capacity],
        };
    }

    pub fn width(&self) -> u32 {
        return self.width;
    }

    pub fn height(&self) -> u32 {
        return self.height;
    }

    pub fn origin(&self) -> Origin {
        return self.origin;
    }

    /// Raw rgb8 rows in the current `origin` order.
    pub fn as_pixel_data(&self) -> &[u8] {
        return &self.pixel_data[..];
    }

    /// Sets all pixels to black and restores the bottom-left layout.
    pub fn clear(&mut self) {
        self.pixel_data.fill(0);
        self.origin = Origin::BottomLeft;
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        return x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32;
    }

    fn index(&self, x: i32, y: i32) -> usize {
        let row = match self.origin {
            Origin::BottomLeft => y,
            Origin::TopLeft => self.height as i32 - 1 - y,
        };
        return 3 * (x as usize + row as usize * self.width as usize);
    }

    /// Sets pixel at (x, y) to a color. Coordinates outside the canvas are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let index = self.index(x, y);
        self.pixel_data[index..index + 3].copy_from_slice(&[color.r, color.g, color.b]);
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let index = self.index(x, y);
        let pixel = &self.pixel_data[index..index + 3];
        return Some(Color::new(pixel[0], pixel[1], pixel[2]));
    }

    /// Reverses row order in memory and toggles `origin`.
    pub fn flip_vertically(&mut self) {
        let stride = 3 * self.width as usize;
        let height = self.height as usize;
        for row in 0..height / 2 {
            let (top, bottom) = self.pixel_data.split_at_mut((height - 1 - row) * stride);
            top[row * stride..(row + 1) * stride].swap_with_slice(&mut bottom[..stride]);
        }
        self.origin = match self.origin {
            Origin::BottomLeft => Origin::TopLeft,
            Origin::TopLeft => Origin::BottomLeft,
        };
    }

    /// Pixel data with the top row first, copying only if a flip is needed.
    pub fn to_top_left(&self) -> Vec<u8> {
        if self.origin == Origin::TopLeft {
            return self.pixel_data.clone();
        }
        let mut copy = self.clone();
        copy.flip_vertically();
        return copy.pixel_data;
    }

    /// Encodes the canvas into an image file, format picked from the extension.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        image::save_buffer(path, &self.to_top_left(), self.width, self.height, image::ColorType::Rgb8)?;
        log::info!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        return Ok(());
    }
}

/// Per-pixel depth, addressed by `x + y * width`. Larger values are closer.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> DepthBuffer {
        return DepthBuffer {
            width,
            height,
            values: vec![f32::NEG_INFINITY; cell_count(width, height)],
        };
    }

    pub fn width(&self) -> u32 {
        return self.width;
    }

    pub fn height(&self) -> u32 {
        return self.height;
    }

    /// Resets every value to negative infinity, so any fragment passes.
    pub fn clear(&mut self) {
        self.values.fill(f32::NEG_INFINITY);
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        return self.values[x as usize + y as usize * self.width as usize];
    }

    /// Depth test: stores `z` and returns true only if it is nearer (greater)
    /// than what the pixel holds.
    pub fn test_and_set(&mut self, x: u32, y: u32, z: f32) -> bool {
        let index = x as usize + y as usize * self.width as usize;
        if z <= self.values[index] {
            return false;
        }
        self.values[index] = z;
        return true;
    }

    pub fn as_slice(&self) -> &[f32] {
        return &self.values[..];
    }
}
