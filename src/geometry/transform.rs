//! Per-axis affine mapping between host physical units and SWC units

use super::point::Point3;
use serde::{Deserialize, Serialize};

/// Physical extent and voxel size of a volumetric dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetExtent {
    /// Lower corner in physical units
    pub min: Point3,
    /// Upper corner in physical units
    pub max: Point3,
    /// Voxel count along x, y, z
    pub size: [u64; 3],
}

impl DatasetExtent {
    pub fn new(min: Point3, max: Point3, size: [u64; 3]) -> Self {
        Self { min, max, size }
    }
}

/// Scale-and-offset transform applied independently on each axis
///
/// Forward: `(p - offset) * scale`. Inverse: `p / scale + offset`.
/// No axis ever has a zero scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub scale: [f64; 3],
    pub offset: Point3,
    /// Set when the Z axis was inverted to compensate a reversed Z extent
    pub z_flipped: bool,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            scale: [1.0; 3],
            offset: Point3::default(),
            z_flipped: false,
        }
    }

    /// Compute the forward transform for a dataset
    ///
    /// Each axis scales by `size / (max - min)`, falling back to 1.0 when the
    /// extent is degenerate or the axis has no voxels. When `|min.z| > |max.z|` on a non-degenerate Z
    /// extent, the Z origin moves to `max.z` and the Z scale is negated.
    pub fn from_extent(extent: &DatasetExtent) -> Self {
        let min = extent.min.to_array();
        let max = extent.max.to_array();

        let mut scale = [1.0; 3];
        for axis in 0..3 {
            let span = max[axis] - min[axis];
            if span == 0.0 || extent.size[axis] == 0 {
                continue;
            }
            scale[axis] = extent.size[axis] as f64 / span;
        }

        let mut offset = extent.min;
        let mut z_flipped = false;
        if extent.min.z.abs() > extent.max.z.abs() && extent.max.z - extent.min.z != 0.0 {
            tracing::warn!(
                min_z = extent.min.z,
                max_z = extent.max.z,
                "Detected potential Z-flip (|minZ| > |maxZ|), adjusting offset and scale"
            );
            offset.z = extent.max.z;
            scale[2] = -scale[2];
            z_flipped = true;
        }

        let transform = Self {
            scale,
            offset,
            z_flipped,
        };
        tracing::debug!(scale = ?transform.scale, offset = %transform.offset, "computed pixel transform");
        transform
    }

    /// Map a host point into SWC units (export direction)
    pub fn apply_forward(&self, p: Point3) -> Point3 {
        Point3::new(
            (p.x - self.offset.x) * self.scale[0],
            (p.y - self.offset.y) * self.scale[1],
            (p.z - self.offset.z) * self.scale[2],
        )
    }

    /// Map an SWC point back into host units (import direction)
    pub fn apply_inverse(&self, p: Point3) -> Point3 {
        Point3::new(
            p.x / self.scale[0] + self.offset.x,
            p.y / self.scale[1] + self.offset.y,
            p.z / self.scale[2] + self.offset.z,
        )
    }
}
