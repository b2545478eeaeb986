use super::{Data, DataReader, ReadError};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tiff::decoder::{Decoder, DecodingResult};

pub struct GeoTiffReader {
    pub file_name: PathBuf,
}

impl GeoTiffReader {
    pub fn new<P: Into<PathBuf>>(file_name: P) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    fn tiff_error(&self, source: tiff::TiffError) -> ReadError {
        ReadError::GeoTiff {
            path: self.file_name.clone(),
            source,
        }
    }
}

impl DataReader for GeoTiffReader {
    fn read_data(&self) -> Result<Data, ReadError> {
        let file = File::open(&self.file_name)?;

        let reader = BufReader::new(file);

        let mut decoder = Decoder::new(reader).map_err(|e| self.tiff_error(e))?;

        let (width, height) = decoder.dimensions().map_err(|e| self.tiff_error(e))?;

        let image_data: Vec<f32> = match decoder.read_image().map_err(|e| self.tiff_error(e))? {
            DecodingResult::U8(data) => data.iter().map(|&x| x as f32).collect(),
            DecodingResult::U16(data) => data.iter().map(|&x| x as f32).collect(),
            DecodingResult::U32(data) => data.iter().map(|&x| x as f32).collect(),
            DecodingResult::I16(data) => data.iter().map(|&x| x as f32).collect(),
            DecodingResult::I32(data) => data.iter().map(|&x| x as f32).collect(),
            DecodingResult::F32(data) => data,
            DecodingResult::F64(data) => data.iter().map(|&x| x as f32).collect(),
            _ => return Err(ReadError::PixelFormat(self.file_name.clone())),
        };

        Ok(Data {
            width,
            height,
            buffer: image_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufWriter;
    use tempfile::tempdir;
    use tiff::encoder::{TiffEncoder, colortype};

    #[test]
    fn test_read_u16_raster_as_f32() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("l1_flags.tif");
        let file = BufWriter::new(File::create(&path).unwrap());
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder
            .write_image::<colortype::Gray16>(3, 2, &[0, 1, 8, 128, 32, 4])
            .unwrap();
        drop(encoder);

        let data = GeoTiffReader::new(&path).read_data().unwrap();
        assert_eq!((data.width, data.height), (3, 2));
        assert_eq!(data.buffer, vec![0.0, 1.0, 8.0, 128.0, 32.0, 4.0]);
        assert_eq!(data.to_string(), "3x2, 6 samples, min 0, max 128");
    }

    #[test]
    fn test_missing_file() {
        let result = GeoTiffReader::new("/nonexistent/radiance_1.tif").read_data();
        assert!(matches!(result, Err(ReadError::Io(_))));
    }
}
