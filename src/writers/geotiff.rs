use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tiff::encoder::{TiffEncoder, colortype};

use super::WriteError;

fn tiff_error(path: &Path) -> impl Fn(tiff::TiffError) -> WriteError + '_ {
    move |source| WriteError::GeoTiff {
        path: path.to_path_buf(),
        source,
    }
}

pub fn write_f32_band(
    path: &Path,
    width: u32,
    height: u32,
    data: &[f32],
) -> Result<(), WriteError> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(writer).map_err(tiff_error(path))?;
    encoder
        .write_image::<colortype::Gray32Float>(width, height, data)
        .map_err(tiff_error(path))
}

pub fn write_u16_band(
    path: &Path,
    width: u32,
    height: u32,
    data: &[u16],
) -> Result<(), WriteError> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(writer).map_err(tiff_error(path))?;
    encoder
        .write_image::<colortype::Gray16>(width, height, data)
        .map_err(tiff_error(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::{DataReader, GeoTiffReader};
    use tempfile::tempdir;

    #[test]
    fn test_written_bands_read_back() {
        let dir = tempdir().unwrap();

        let values = dir.path().join("algal_2.tif");
        write_f32_band(&values, 2, 2, &[0.5, -1.25, 5.0, 2.0]).unwrap();
        let data = GeoTiffReader::new(&values).read_data().unwrap();
        assert_eq!(data.buffer, vec![0.5, -1.25, 5.0, 2.0]);

        let flags = dir.path().join("result_flags.tif");
        write_u16_band(&flags, 4, 1, &[0, 1, 0x0180, 2]).unwrap();
        let data = GeoTiffReader::new(&flags).read_data().unwrap();
        assert_eq!((data.width, data.height), (4, 1));
        assert_eq!(data.buffer, vec![0.0, 1.0, 384.0, 2.0]);
    }

    #[test]
    fn test_wrong_sample_count_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.tif");
        let result = write_f32_band(&path, 3, 3, &[0.0; 4]);
        assert!(matches!(result, Err(WriteError::GeoTiff { .. })));
    }
}
