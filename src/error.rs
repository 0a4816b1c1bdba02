use thiserror::Error;

/// Failures at the file boundary: reading meshes and textures, writing frames.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("obj error: {0}")]
    Obj(#[from] obj::ObjError),
}
