use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub trait DataReader {
    fn read_data(&self) -> Result<Data, ReadError>;
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode GeoTIFF '{path}': {source}")]
    GeoTiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },
    #[error("Unsupported pixel format in '{0}'")]
    PixelFormat(PathBuf),
    #[error("Failed to parse scene metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("No file found for band '{band}' under {directory}")]
    MissingFile { band: String, directory: PathBuf },
    #[error("Band '{band}' is {found:?}, expected {expected:?}")]
    Dimensions {
        band: String,
        expected: (u32, u32),
        found: (u32, u32),
    },
    #[error("Band '{band}' holds {found} samples, expected {expected}")]
    SampleCount {
        band: String,
        expected: usize,
        found: usize,
    },
}

/// A single-band raster in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    pub width: u32,
    pub height: u32,
    pub buffer: Vec<f32>,
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min_value = self
            .buffer
            .iter()
            .copied()
            .filter(|x| !x.is_nan())
            .fold(f32::NAN, f32::min);

        let max_value = self
            .buffer
            .iter()
            .copied()
            .filter(|x| !x.is_nan())
            .fold(f32::NAN, f32::max);

        write!(
            f,
            "{}x{}, {} samples, min {}, max {}",
            self.width,
            self.height,
            self.buffer.len(),
            min_value,
            max_value,
        )
    }
}
