//! Triangle and line rasterization on a `Canvas`, with an optional depth test.
//!
//! Screen coordinates are floats in pixels, y up. A pixel (x, y) is covered
//! when its center (x + 0.5, y + 0.5) has no negative barycentric coordinate.

use crate::canvas::{Canvas, Color, DepthBuffer, CYAN};
use crate::math::{Vector2f, Vector3, Vector3f};
use crate::model::Diffuse;
use crate::shader::Shader;

/// Returned by `barycentric` for triangles with less than half a pixel of area.
pub const DEGENERATE: Vector3f = Vector3f { x: -1.0, y: 1.0, z: 1.0 };

/// Barycentric coordinates of `point` (x, y only) in the triangle `v`.
///
/// The weights follow the vertex order. Degenerate triangles give
/// `DEGENERATE`, whose negative first weight makes every point look outside.
pub fn barycentric(v: [Vector3f; 3], point: Vector3f) -> Vector3f {
    let raw_cross = Vector3::cross(
        Vector3f::new(v[2].x - v[0].x, v[1].x - v[0].x, v[0].x - point.x),
        Vector3f::new(v[2].y - v[0].y, v[1].y - v[0].y, v[0].y - point.y),
    );
    if raw_cross.z.abs() < 1.0 {
        return DEGENERATE;
    }
    return Vector3f {
        x: 1.0 - (raw_cross.x + raw_cross.y) / raw_cross.z,
        y: raw_cross.y / raw_cross.z,
        z: raw_cross.x / raw_cross.z,
    };
}

fn is_outside(bar: Vector3f) -> bool {
    return bar.x < 0.0 || bar.y < 0.0 || bar.z < 0.0;
}

/// Pixel rectangle [x0, x1) x [y0, y1) around a triangle, clamped to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoundingBox {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl BoundingBox {
    fn of_triangle(v: &[Vector3f; 3], width: u32, height: u32) -> BoundingBox {
        let min_x = v[0].x.min(v[1].x).min(v[2].x);
        let max_x = v[0].x.max(v[1].x).max(v[2].x);
        let min_y = v[0].y.min(v[1].y).min(v[2].y);
        let max_y = v[0].y.max(v[1].y).max(v[2].y);
        // Float to int casts saturate, so huge or infinite coordinates clamp too.
        return BoundingBox {
            x0: (min_x.floor() as i32).max(0),
            y0: (min_y.floor() as i32).max(0),
            x1: (max_x.ceil() as i32).min(width as i32),
            y1: (max_y.ceil() as i32).min(height as i32),
        };
    }
}

/// Calls `visit(x, y, barycentric)` for every covered pixel of the triangle.
fn for_each_covered_pixel<F>(v: [Vector3f; 3], width: u32, height: u32, mut visit: F)
where
    F: FnMut(i32, i32, Vector3f),
{
    let bbox = BoundingBox::of_triangle(&v, width, height);
    for y in bbox.y0..bbox.y1 {
        for x in bbox.x0..bbox.x1 {
            let center = Vector3f::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
            let bar = barycentric(v, center);
            if is_outside(bar) {
                continue;
            }
            visit(x, y, bar);
        }
    }
}

fn interpolate_depth(v: &[Vector3f; 3], bar: Vector3f) -> f32 {
    return v[0].z * bar.x + v[1].z * bar.y + v[2].z * bar.z;
}

/// Fills a triangle with the diffuse color at the interpolated uv, scaled by
/// `intensity`. Only fragments nearer than the depth buffer are written.
///
/// UVs are interpolated linearly in screen space, without perspective correction.
pub fn rasterize_triangle<D: Diffuse + ?Sized>(
    canvas: &mut Canvas,
    depth: &mut DepthBuffer,
    v: [Vector3f; 3],
    uvs: [Vector2f; 3],
    diffuse: &D,
    intensity: f32,
) {
    let (width, height) = (canvas.width(), canvas.height());
    for_each_covered_pixel(v, width, height, |x, y, bar| {
        let z = interpolate_depth(&v, bar);
        if !depth.test_and_set(x as u32, y as u32, z) {
            return;
        }
        let uv = uvs[0] * bar.x + uvs[1] * bar.y + uvs[2] * bar.z;
        canvas.set_pixel(x, y, diffuse.diffuse(uv).scaled(intensity));
    });
}

/// Same coverage and depth test as `rasterize_triangle`, with the color
/// coming from `shader.fragment`. A `None` fragment keeps the depth write
/// but leaves the pixel untouched.
pub fn rasterize_shaded<S: Shader + ?Sized>(
    canvas: &mut Canvas,
    depth: &mut DepthBuffer,
    v: [Vector3f; 3],
    shader: &S,
) {
    let (width, height) = (canvas.width(), canvas.height());
    for_each_covered_pixel(v, width, height, |x, y, bar| {
        let z = interpolate_depth(&v, bar);
        if !depth.test_and_set(x as u32, y as u32, z) {
            return;
        }
        if let Some(color) = shader.fragment(bar) {
            canvas.set_pixel(x, y, color);
        }
    });
}

/// Single color fill of the covered pixels, no depth test.
pub fn fill_flat_triangle(canvas: &mut Canvas, v: [Vector3f; 3]) {
    let (width, height) = (canvas.width(), canvas.height());
    for_each_covered_pixel(v, width, height, |x, y, _| {
        canvas.set_pixel(x, y, CYAN);
    });
}

/// Bresenham line from (x0, y0) to (x1, y1). The endpoint furthest along the
/// major axis is left unlit.
pub fn fill_line(canvas: &mut Canvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let (mut x0, mut y0, mut x1, mut y1) = (x0, y0, x1, y1);
    // Step along the major axis; a steep line is drawn transposed.
    let steep = (x0 - x1).abs() < (y0 - y1).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let derror = 2 * (y1 - y0).abs();
    let step = if y1 > y0 { 1 } else { -1 };
    let mut error = 0;
    let mut y = y0;
    for x in x0..x1 {
        if steep {
            canvas.set_pixel(y, x, color);
        } else {
            canvas.set_pixel(x, y, color);
        }
        error += derror;
        if error > dx {
            y += step;
            error -= 2 * dx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BLACK, BLUE, WHITE};

    fn triangle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> [Vector3f; 3] {
        return [
            Vector3f::new(a.0, a.1, 0.0),
            Vector3f::new(b.0, b.1, 0.0),
            Vector3f::new(c.0, c.1, 0.0),
        ];
    }

    fn lit_pixels(canvas: &Canvas) -> Vec<(i32, i32)> {
        let mut pixels = Vec::new();
        for y in 0..canvas.height() as i32 {
            for x in 0..canvas.width() as i32 {
                if canvas.get_pixel(x, y) != Some(BLACK) {
                    pixels.push((x, y));
                }
            }
        }
        return pixels;
    }

    #[test]
    fn barycentric_of_interior_point_sums_to_one() {
        let v = triangle((10.0, 10.0), (90.0, 20.0), (40.0, 80.0));
        let bar = barycentric(v, Vector3f::new(45.0, 35.0, 0.0));
        for w in [bar.x, bar.y, bar.z] {
            assert!(w > 0.0 && w < 1.0, "{bar}");
        }
        assert!((bar.x + bar.y + bar.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn barycentric_at_vertices() {
        let v = triangle((10.0, 10.0), (90.0, 20.0), (40.0, 80.0));
        assert_eq!(barycentric(v, v[0]), Vector3f::new(1.0, 0.0, 0.0));
        let at_b = barycentric(v, v[1]);
        assert!((at_b - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-5);
        let at_c = barycentric(v, v[2]);
        assert!((at_c - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn barycentric_reconstructs_the_point() {
        let v = triangle((0.0, 0.0), (50.0, 10.0), (20.0, 60.0));
        let p = Vector3f::new(25.0, 20.0, 0.0);
        let bar = barycentric(v, p);
        let back = v[0] * bar.x + v[1] * bar.y + v[2] * bar.z;
        assert!((back.x - p.x).abs() < 1e-3 && (back.y - p.y).abs() < 1e-3);
    }

    #[test]
    fn degenerate_triangle_reports_sentinel() {
        let collinear = triangle((0.0, 0.0), (10.0, 10.0), (20.0, 20.0));
        assert_eq!(barycentric(collinear, Vector3f::new(5.0, 5.0, 0.0)), DEGENERATE);
        let tiny = triangle((0.0, 0.0), (0.5, 0.0), (0.0, 0.5));
        assert!(is_outside(barycentric(tiny, Vector3f::new(0.1, 0.1, 0.0))));
    }

    #[test]
    fn bounding_box_is_clamped_to_canvas() {
        let v = triangle((-20.5, 3.2), (30.0, 99.0), (5.0, -1.0));
        let bbox = BoundingBox::of_triangle(&v, 16, 8);
        assert_eq!(bbox, BoundingBox { x0: 0, y0: 0, x1: 16, y1: 8 });

        let infinite = triangle((f32::NEG_INFINITY, 0.0), (1.0, 1.0), (2.0, f32::INFINITY));
        let bbox = BoundingBox::of_triangle(&infinite, 16, 8);
        assert_eq!(bbox, BoundingBox { x0: 0, y0: 0, x1: 2, y1: 8 });
    }

    #[test]
    fn flat_triangle_covers_exactly_the_pixels_with_inside_centers() {
        let mut canvas = Canvas::new(64, 64);
        let v = triangle((5.0, 5.0), (5.0, 45.0), (45.0, 45.0));
        fill_flat_triangle(&mut canvas, v);
        let lit = lit_pixels(&canvas);
        let expected: Vec<(i32, i32)> = (0..64)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .filter(|&(x, y)| x >= 5 && y < 45 && y >= x)
            .collect();
        assert_eq!(lit, expected);
        assert_eq!(canvas.get_pixel(5, 5), Some(CYAN));
    }

    #[test]
    fn fully_offscreen_triangle_draws_nothing() {
        let mut canvas = Canvas::new(16, 16);
        fill_flat_triangle(&mut canvas, triangle((-40.0, -40.0), (-20.0, -40.0), (-30.0, -10.0)));
        assert!(lit_pixels(&canvas).is_empty());
    }

    #[test]
    fn textured_triangle_scales_by_intensity_and_writes_depth() {
        let mut canvas = Canvas::new(32, 32);
        let mut depth = DepthBuffer::new(32, 32);
        let mut v = triangle((0.0, 0.0), (32.0, 0.0), (0.0, 32.0));
        for corner in v.iter_mut() {
            corner.z = 10.0;
        }
        let uvs = [Vector2f::default(); 3];
        rasterize_triangle(&mut canvas, &mut depth, v, uvs, &Color::new(200, 100, 50), 0.5);
        assert_eq!(canvas.get_pixel(3, 3), Some(Color::new(100, 50, 25)));
        assert!((depth.get(3, 3) - 10.0).abs() < 1e-4);
        assert_eq!(depth.get(31, 31), f32::NEG_INFINITY);
    }

    #[test]
    fn nearer_fragment_wins_regardless_of_draw_order() {
        let far = |z| {
            let mut v = triangle((0.0, 0.0), (20.0, 0.0), (0.0, 20.0));
            for corner in v.iter_mut() {
                corner.z = z;
            }
            v
        };
        let uvs = [Vector2f::default(); 3];
        for order in [[5.0, 50.0], [50.0, 5.0]] {
            let mut canvas = Canvas::new(20, 20);
            let mut depth = DepthBuffer::new(20, 20);
            for z in order {
                let color = if z > 10.0 { WHITE } else { BLUE };
                rasterize_triangle(&mut canvas, &mut depth, far(z), uvs, &color, 1.0);
            }
            assert_eq!(canvas.get_pixel(2, 2), Some(WHITE));
            assert!((depth.get(2, 2) - 50.0).abs() < 1e-4);
        }
    }

    #[test]
    fn horizontal_line_stops_before_its_far_end() {
        let mut canvas = Canvas::new(10, 10);
        fill_line(&mut canvas, 7, 2, 1, 2, WHITE);
        let expected: Vec<(i32, i32)> = (1..7).map(|x| (x, 2)).collect();
        assert_eq!(lit_pixels(&canvas), expected);
    }

    #[test]
    fn diagonal_line_has_one_pixel_per_column() {
        let mut canvas = Canvas::new(10, 10);
        fill_line(&mut canvas, 0, 0, 5, 5, WHITE);
        let expected: Vec<(i32, i32)> = (0..5).map(|i| (i, i)).collect();
        assert_eq!(lit_pixels(&canvas), expected);
        assert_eq!(canvas.get_pixel(5, 5), Some(BLACK));
    }

    #[test]
    fn steep_line_has_one_pixel_per_row() {
        let mut canvas = Canvas::new(10, 10);
        fill_line(&mut canvas, 2, 9, 4, 0, WHITE);
        let lit = lit_pixels(&canvas);
        assert_eq!(lit.len(), 9);
        for y in 0..9 {
            assert_eq!(lit.iter().filter(|p| p.1 == y).count(), 1);
        }
        assert!(lit.contains(&(4, 0)) && !lit.contains(&(2, 9)));
    }

    #[test]
    fn point_line_draws_nothing() {
        let mut canvas = Canvas::new(4, 4);
        fill_line(&mut canvas, 2, 2, 2, 2, WHITE);
        assert!(lit_pixels(&canvas).is_empty());
    }

    #[test]
    fn line_leaving_the_canvas_is_clipped() {
        let mut canvas = Canvas::new(5, 5);
        fill_line(&mut canvas, -3, 2, 10, 2, WHITE);
        assert_eq!(lit_pixels(&canvas).len(), 5);
    }
}
