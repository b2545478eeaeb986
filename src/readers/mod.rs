pub mod geotiff;
pub mod types;

pub use geotiff::GeoTiffReader;
pub use types::{Data, DataReader, ReadError};
