use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("bounding box needs 4 values [south, north, west, east], got {0}")]
    InvalidBoundingBox(usize),
}
