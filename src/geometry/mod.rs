//! Coordinate types and the dataset-calibrated affine transform

mod point;
mod transform;

pub use point::Point3;
pub use transform::{AffineTransform, DatasetExtent};
