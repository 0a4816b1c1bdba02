//! Minimal software rasterizer: a small linear algebra core, the
//! model/view/projection/viewport transform chain and a barycentric
//! triangle rasterizer with a depth buffer.

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod frame;
pub mod math;
pub mod model;
pub mod raster;
pub mod shader;
pub mod transform;

pub use canvas::{Canvas, Color, DepthBuffer};
pub use error::RenderError;
pub use frame::{Camera, FrameStats, RenderContext};
pub use math::{Matrix, MatrixError};
pub use model::{Diffuse, Mesh, Texture};
