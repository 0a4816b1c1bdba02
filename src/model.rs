//! Triangle mesh and diffuse texture, loaded from Wavefront OBJ and image files.
//!
//! Loading failures never reach the renderer: `load_or_empty`/`load_or_blank`
//! log the problem and hand back an empty mesh or a blank texture, which
//! render as a no-op frame.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use image::{Rgb, RgbImage};
use obj::raw::object::Polygon;
use obj::raw::{parse_obj, RawObj};

use crate::canvas::{Color, WHITE};
use crate::error::RenderError;
use crate::math::{Vector2f, Vector3f};

/// Indices of one triangle corner into the mesh lists, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceVertex {
    pub vertex: usize,
    pub uv: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceVertex {
    pub fn new(vertex: usize, uv: usize, normal: usize) -> Self {
        return Self {
            vertex,
            uv: Some(uv),
            normal: Some(normal),
        };
    }
}

pub type Face = [FaceVertex; 3];

/// Immutable triangle mesh: positions, texture coordinates, normals and faces.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vector3f>,
    uvs: Vec<Vector2f>,
    normals: Vec<Vector3f>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Builds a mesh, dropping faces that index past the end of a list.
    pub fn new(vertices: Vec<Vector3f>, uvs: Vec<Vector2f>, normals: Vec<Vector3f>, faces: Vec<Face>) -> Mesh {
        let mut mesh = Mesh {
            vertices,
            uvs,
            normals,
            faces: Vec::with_capacity(faces.len()),
        };
        let total = faces.len();
        for face in faces {
            if mesh.face_is_valid(&face) {
                mesh.faces.push(face);
            }
        }
        if mesh.faces.len() < total {
            log::warn!("Dropped {} faces with out of range indices", total - mesh.faces.len());
        }
        return mesh;
    }

    fn face_is_valid(&self, face: &Face) -> bool {
        return face.iter().all(|corner| {
            corner.vertex < self.vertices.len()
                && corner.uv.map_or(true, |uv| uv < self.uvs.len())
                && corner.normal.map_or(true, |n| n < self.normals.len())
        });
    }

    /// Parses OBJ text. Polygons that are not triangles are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Mesh, RenderError> {
        let raw = parse_obj(reader)?;
        return Ok(Mesh::from_raw(raw));
    }

    pub fn load(path: &Path) -> Result<Mesh, RenderError> {
        let mesh = Mesh::from_reader(BufReader::new(File::open(path)?))?;
        log::info!(
            "Loaded {}: {} vertices, {} uvs, {} normals, {} faces",
            path.display(),
            mesh.vertices.len(),
            mesh.uvs.len(),
            mesh.normals.len(),
            mesh.faces.len()
        );
        return Ok(mesh);
    }

    /// Loads a mesh, falling back to an empty one if the file can't be read.
    pub fn load_or_empty(path: &Path) -> Mesh {
        match Mesh::load(path) {
            Ok(mesh) => return mesh,
            Err(err) => {
                log::warn!("Failed to load mesh {}: {err}", path.display());
                return Mesh::default();
            }
        }
    }

    fn from_raw(raw: RawObj) -> Mesh {
        let vertices = raw.positions.iter().map(|&(x, y, z, _)| Vector3f::new(x, y, z)).collect();
        let uvs = raw.tex_coords.iter().map(|&(u, v, _)| Vector2f::new(u, v)).collect();
        let normals = raw.normals.iter().map(|&(x, y, z)| Vector3f::new(x, y, z)).collect();

        let mut faces = Vec::with_capacity(raw.polygons.len());
        let mut skipped = 0;
        for polygon in &raw.polygons {
            let corners: Vec<FaceVertex> = match polygon {
                Polygon::P(indices) => indices
                    .iter()
                    .map(|&vertex| FaceVertex { vertex, uv: None, normal: None })
                    .collect(),
                Polygon::PT(indices) => indices
                    .iter()
                    .map(|&(vertex, uv)| FaceVertex { vertex, uv: Some(uv), normal: None })
                    .collect(),
                Polygon::PN(indices) => indices
                    .iter()
                    .map(|&(vertex, normal)| FaceVertex { vertex, uv: None, normal: Some(normal) })
                    .collect(),
                Polygon::PTN(indices) => indices
                    .iter()
                    .map(|&(vertex, uv, normal)| FaceVertex::new(vertex, uv, normal))
                    .collect(),
            };
            match corners.as_slice() {
                &[a, b, c] => faces.push([a, b, c]),
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("Skipped {skipped} non-triangular faces");
        }
        return Mesh::new(vertices, uvs, normals, faces);
    }

    pub fn n_vertices(&self) -> usize {
        return self.vertices.len();
    }

    pub fn n_uvs(&self) -> usize {
        return self.uvs.len();
    }

    pub fn n_normals(&self) -> usize {
        return self.normals.len();
    }

    pub fn n_faces(&self) -> usize {
        return self.faces.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.faces.is_empty();
    }

    pub fn face(&self, index: usize) -> &Face {
        return &self.faces[index];
    }

    pub fn vertex(&self, face: usize, nth: usize) -> Vector3f {
        return self.vertices[self.faces[face][nth].vertex];
    }

    /// Texture coordinate of a corner, (0, 0) when the face has none.
    pub fn uv(&self, face: usize, nth: usize) -> Vector2f {
        return match self.faces[face][nth].uv {
            Some(index) => self.uvs[index],
            None => Vector2f::default(),
        };
    }

    pub fn normal(&self, face: usize, nth: usize) -> Option<Vector3f> {
        return self.faces[face][nth].normal.map(|index| self.normals[index]);
    }

    /// Smallest and largest coordinates over all vertices.
    pub fn bounding_box(&self) -> Option<(Vector3f, Vector3f)> {
        let first = *self.vertices.first()?;
        let bounds = self.vertices.iter().fold((first, first), |(mut low, mut high), v| {
            for i in 0..3 {
                low[i] = low[i].min(v[i]);
                high[i] = high[i].max(v[i]);
            }
            (low, high)
        });
        return Some(bounds);
    }
}

/// Source of surface color at a texture coordinate.
pub trait Diffuse {
    fn diffuse(&self, uv: Vector2f) -> Color;
}

/// A solid color ignores the coordinate.
impl Diffuse for Color {
    fn diffuse(&self, _uv: Vector2f) -> Color {
        return *self;
    }
}

/// Diffuse map. v = 0 is the bottom row of the picture.
#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbImage,
}

impl Texture {
    pub fn new(image: RgbImage) -> Texture {
        return Texture { image };
    }

    /// Single white texel.
    pub fn blank() -> Texture {
        return Texture::new(RgbImage::from_pixel(1, 1, Rgb([WHITE.r, WHITE.g, WHITE.b])));
    }

    pub fn load(path: &Path) -> Result<Texture, RenderError> {
        let image = image::open(path)?.to_rgb8();
        log::info!("Loaded texture {}: {}x{}", path.display(), image.width(), image.height());
        return Ok(Texture::new(image));
    }

    /// Loads a texture, falling back to a blank one if the file can't be read.
    pub fn load_or_blank(path: &Path) -> Texture {
        match Texture::load(path) {
            Ok(texture) => return texture,
            Err(err) => {
                log::warn!("Failed to load texture {}: {err}", path.display());
                return Texture::blank();
            }
        }
    }

    pub fn width(&self) -> u32 {
        return self.image.width();
    }

    pub fn height(&self) -> u32 {
        return self.image.height();
    }
}

impl Diffuse for Texture {
    fn diffuse(&self, uv: Vector2f) -> Color {
        let (width, height) = self.image.dimensions();
        let x = (uv.x * width as f32) as i64;
        let y = ((1.0 - uv.y) * height as f32) as i64;
        let x = x.clamp(0, width as i64 - 1) as u32;
        let y = y.clamp(0, height as i64 - 1) as u32;
        let Rgb([r, g, b]) = *self.image.get_pixel(x, y);
        return Color::new(r, g, b);
    }
}
