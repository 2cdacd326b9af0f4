//! Point graph of a single filament as read from the host

use crate::geometry::Point3;
use thiserror::Error;

/// Type code used when the host supplies no type for a point
pub const DEFAULT_NODE_TYPE: i32 = 3;

/// Errors raised while assembling a filament graph
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("filament has {points} points but {radii} radii")]
    RadiusCountMismatch { points: usize, radii: usize },
}

/// Type code at `index`, or [`DEFAULT_NODE_TYPE`] when the list is absent,
/// empty, or too short
pub fn node_type_at(types: Option<&[i32]>, index: usize) -> i32 {
    types
        .and_then(|t| t.get(index))
        .copied()
        .unwrap_or(DEFAULT_NODE_TYPE)
}

/// Undirected point graph of one filament
///
/// Points are indexed from 0. Edges are raw index pairs exactly as the host
/// reported them, so they may point outside the point range, repeat, or form
/// cycles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilamentGraph {
    positions: Vec<Point3>,
    radii: Vec<f64>,
    types: Option<Vec<i32>>,
    edges: Vec<(i64, i64)>,
}

impl FilamentGraph {
    /// Assemble a graph, requiring one radius per point
    pub fn new(
        positions: Vec<Point3>,
        radii: Vec<f64>,
        types: Option<Vec<i32>>,
        edges: Vec<(i64, i64)>,
    ) -> Result<Self, GraphError> {
        if positions.len() != radii.len() {
            return Err(GraphError::RadiusCountMismatch {
                points: positions.len(),
                radii: radii.len(),
            });
        }
        Ok(Self {
            positions,
            radii,
            types,
            edges,
        })
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn types(&self) -> Option<&[i32]> {
        self.types.as_deref()
    }

    pub fn edges(&self) -> &[(i64, i64)] {
        &self.edges
    }

    /// Type code of a point, falling back to the default
    pub fn node_type(&self, index: usize) -> i32 {
        node_type_at(self.types(), index)
    }
}
