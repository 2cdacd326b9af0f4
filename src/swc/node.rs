//! A single SWC sample

use crate::geometry::Point3;

/// Parent id of a root node
pub const ROOT_PARENT: i64 = -1;

/// One row of an SWC file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwcNode {
    /// 1-based sample id
    pub id: i64,
    /// Structure type code (3 = dendrite by SWC convention)
    pub node_type: i32,
    pub position: Point3,
    pub radius: f64,
    /// Id of the parent sample, or [`ROOT_PARENT`]
    pub parent: i64,
}

impl SwcNode {
    pub fn new(id: i64, node_type: i32, position: Point3, radius: f64, parent: i64) -> Self {
        Self {
            id,
            node_type,
            position,
            radius,
            parent,
        }
    }

    /// Whether this sample starts a tree (parent id zero or negative)
    pub fn is_root(&self) -> bool {
        self.parent <= 0
    }
}
