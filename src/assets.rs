//! Bundled sprite images.
//!
//! The four PNGs under `assets/` are compiled into the binary and decoded
//! once at startup into plain RGBA buffers.

use std::fmt;
use std::io::{self, Cursor};

use log::debug;
use png::{BitDepth, ColorType, Transformations};

use crate::entities::SpriteKind;

const BACKGROUND_PNG: &[u8] = include_bytes!("../assets/background.png");
const BIRD_PNG: &[u8] = include_bytes!("../assets/bird.png");
const UPPER_PIPE_PNG: &[u8] = include_bytes!("../assets/upperPipe.png");
const LOWER_PIPE_PNG: &[u8] = include_bytes!("../assets/lowerPipe.png");

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum AssetError {
    Decode {
        name: &'static str,
        source: png::DecodingError,
    },
    Unsupported {
        name: &'static str,
        color_type: ColorType,
        bit_depth: BitDepth,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Decode { name, source } => {
                write!(f, "failed to decode asset {name}: {source}")
            }
            AssetError::Unsupported {
                name,
                color_type,
                bit_depth,
            } => write!(
                f,
                "asset {name} has unsupported layout {color_type:?}/{bit_depth:?} (want 8-bit RGB or RGBA)"
            ),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Decode { source, .. } => Some(source),
            AssetError::Unsupported { .. } => None,
        }
    }
}

impl From<AssetError> for io::Error {
    fn from(err: AssetError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

// ── Image ─────────────────────────────────────────────────────────────────────

/// A decoded RGBA8 image, rows top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl Image {
    /// Decode a PNG held in memory. `name` only labels errors.
    pub fn decode(name: &'static str, bytes: &[u8]) -> Result<Image, AssetError> {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        // Palette and low bit depths come out as plain 8-bit samples
        decoder.set_transformations(Transformations::EXPAND);
        let mut reader = decoder
            .read_info()
            .map_err(|source| AssetError::Decode { name, source })?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|source| AssetError::Decode { name, source })?;
        let bytes = &buf[..info.buffer_size()];

        let channels = match (info.color_type, info.bit_depth) {
            (ColorType::Rgba, BitDepth::Eight) => 4,
            (ColorType::Rgb, BitDepth::Eight) => 3,
            (color_type, bit_depth) => {
                return Err(AssetError::Unsupported {
                    name,
                    color_type,
                    bit_depth,
                })
            }
        };
        let pixels = bytes
            .chunks_exact(channels)
            .map(|px| match *px {
                [r, g, b, a] => [r, g, b, a],
                [r, g, b] => [r, g, b, 255],
                _ => unreachable!("chunks_exact yields {channels} samples"),
            })
            .collect();

        debug!("decoded {name}: {}x{}", info.width, info.height);
        Ok(Image {
            width: info.width as usize,
            height: info.height as usize,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.pixels[y * self.width + x]
    }

    /// Nearest-neighbour lookup for normalised coordinates in `[0, 1)`.
    /// Out-of-range inputs are clamped to the border.
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        self.pixel(x, y)
    }
}

// ── Asset set ─────────────────────────────────────────────────────────────────

pub struct Assets {
    pub background: Image,
    pub bird: Image,
    pub upper_pipe: Image,
    pub lower_pipe: Image,
}

impl Assets {
    /// Decode every bundled image. Fails on the first broken one.
    pub fn load() -> Result<Assets, AssetError> {
        Ok(Assets {
            background: Image::decode("background.png", BACKGROUND_PNG)?,
            bird: Image::decode("bird.png", BIRD_PNG)?,
            upper_pipe: Image::decode("upperPipe.png", UPPER_PIPE_PNG)?,
            lower_pipe: Image::decode("lowerPipe.png", LOWER_PIPE_PNG)?,
        })
    }

    pub fn get(&self, kind: SpriteKind) -> &Image {
        match kind {
            SpriteKind::Background => &self.background,
            SpriteKind::Bird => &self.bird,
            SpriteKind::UpperPipe => &self.upper_pipe,
            SpriteKind::LowerPipe => &self.lower_pipe,
        }
    }
}
