use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 800;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown scene '{0}', expected one of: line, triangle, model, gouraud")]
    UnknownScene(String),
    #[error("flag {0} needs a value")]
    MissingValue(String),
    #[error("invalid value '{value}' for {flag}")]
    InvalidNumber { flag: String, value: String },
    #[error("unknown flag {0}")]
    UnknownFlag(String),
}

/// Demo scene to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// A single Bresenham line.
    Line,
    /// One flat colored triangle, no depth test.
    Triangle,
    /// Textured mesh, flat per-face lighting.
    Model,
    /// Textured mesh through the Gouraud shader.
    Gouraud,
}

impl FromStr for Scene {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        return match name {
            "line" => Ok(Scene::Line),
            "triangle" => Ok(Scene::Triangle),
            "model" => Ok(Scene::Model),
            "gouraud" => Ok(Scene::Gouraud),
            _ => Err(ConfigError::UnknownScene(name.to_string())),
        };
    }
}

/// Session parameters for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub width: u32,
    pub height: u32,
    pub scene: Scene,
    pub mesh_path: PathBuf,
    pub texture_path: PathBuf,
    /// Where the last frame is written on exit.
    pub output_path: Option<PathBuf>,
    /// Render this many frames without a window, then exit.
    pub headless_frames: Option<u32>,
    pub print_fps: bool,
}

impl Default for Params {
    fn default() -> Self {
        return Params {
            width: WIDTH,
            height: HEIGHT,
            scene: Scene::Model,
            mesh_path: PathBuf::from("assets/african_head.obj"),
            texture_path: PathBuf::from("assets/african_head_diffuse.tga"),
            output_path: None,
            headless_frames: None,
            print_fps: false,
        };
    }
}

impl Params {
    /// Parses command line flags, skipping the program name.
    ///
    /// `-s <scene>`, `-m <mesh.obj>`, `-t <texture>`, `-o <output.png>`,
    /// `-n <frames>` (headless), `-w <width>`, `-h <height>`, `--fps`.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Params, ConfigError> {
        let mut params = Params::default();
        let mut args = args.into_iter().skip(1);
        while let Some(flag) = args.next() {
            if flag == "--fps" {
                params.print_fps = true;
                continue;
            }
            let value = match flag.as_str() {
                "-s" | "-m" | "-t" | "-o" | "-n" | "-w" | "-h" => match args.next() {
                    Some(value) => value,
                    None => return Err(ConfigError::MissingValue(flag)),
                },
                _ => return Err(ConfigError::UnknownFlag(flag)),
            };
            match flag.as_str() {
                "-s" => params.scene = value.parse()?,
                "-m" => params.mesh_path = PathBuf::from(value),
                "-t" => params.texture_path = PathBuf::from(value),
                "-o" => params.output_path = Some(PathBuf::from(value)),
                "-n" => params.headless_frames = Some(parse_positive(&flag, &value)?),
                "-w" => params.width = parse_positive(&flag, &value)?,
                _ => params.height = parse_positive(&flag, &value)?,
            }
        }
        return Ok(params);
    }
}

fn parse_positive(flag: &str, value: &str) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(number) if number > 0 => return Ok(number),
        _ => {
            return Err(ConfigError::InvalidNumber {
                flag: flag.to_string(),
                value: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        return std::iter::once("tiny_rasterizer")
            .chain(list.iter().copied())
            .map(String::from)
            .collect();
    }

    #[test]
    fn no_flags_gives_defaults() {
        assert_eq!(Params::from_args(args(&[])).unwrap(), Params::default());
    }

    #[test]
    fn all_flags_are_read() {
        let params = Params::from_args(args(&[
            "-s", "gouraud", "-m", "a.obj", "-t", "a.tga", "-o", "out.png", "-n", "3", "-w", "320", "-h", "200",
            "--fps",
        ]))
        .unwrap();
        assert_eq!(params.scene, Scene::Gouraud);
        assert_eq!(params.mesh_path, PathBuf::from("a.obj"));
        assert_eq!(params.texture_path, PathBuf::from("a.tga"));
        assert_eq!(params.output_path, Some(PathBuf::from("out.png")));
        assert_eq!(params.headless_frames, Some(3));
        assert_eq!((params.width, params.height), (320, 200));
        assert!(params.print_fps);
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(
            Params::from_args(args(&["-s", "teapot"])),
            Err(ConfigError::UnknownScene("teapot".into()))
        );
        assert_eq!(Params::from_args(args(&["-o"])), Err(ConfigError::MissingValue("-o".into())));
        assert_eq!(
            Params::from_args(args(&["-w", "0"])),
            Err(ConfigError::InvalidNumber { flag: "-w".into(), value: "0".into() })
        );
        assert_eq!(Params::from_args(args(&["-x"])), Err(ConfigError::UnknownFlag("-x".into())));
    }
}
