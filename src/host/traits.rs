//! Capability traits for the host application
//!
//! The converters only see these narrow interfaces, never a concrete host
//! object model.

use crate::geometry::{DatasetExtent, Point3};
use crate::graph::{FilamentGraph, GraphError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by host implementations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Could not connect to host: {0}")]
    Connection(String),

    #[error("No dataset loaded")]
    NoDataset,

    #[error("Filament index {index} out of range (count {count})")]
    FilamentOutOfRange { index: usize, count: usize },

    #[error("Failed to open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("Invalid filament data: {0}")]
    Graph(#[from] GraphError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Data for a filament created on the host
#[derive(Debug, Clone, PartialEq)]
pub struct NewFilament {
    pub positions: Vec<Point3>,
    pub radii: Vec<f64>,
    pub types: Vec<i32>,
    pub edges: Vec<(i64, i64)>,
    pub time_index: u32,
}

/// A Filaments object: a named collection of filaments
pub trait Filaments {
    fn name(&self) -> String;

    fn set_name(&mut self, name: &str);

    fn filament_count(&self) -> usize;

    fn positions(&self, index: usize) -> HostResult<Vec<Point3>>;

    fn radii(&self, index: usize) -> HostResult<Vec<f64>>;

    /// Raw undirected edges as point index pairs
    fn edges(&self, index: usize) -> HostResult<Vec<(i64, i64)>>;

    /// Per-point type codes, if the host tracks them
    fn types(&self, index: usize) -> HostResult<Option<Vec<i32>>>;

    /// Append a filament, returning its index
    fn add_filament(&mut self, filament: NewFilament) -> HostResult<usize>;

    fn set_beginning_vertex(&mut self, filament: usize, vertex: usize) -> HostResult<()>;

    /// Read one filament as a validated graph
    fn graph(&self, index: usize) -> HostResult<FilamentGraph> {
        let graph = FilamentGraph::new(
            self.positions(index)?,
            self.radii(index)?,
            self.types(index)?,
            self.edges(index)?,
        )?;
        Ok(graph)
    }
}

/// One child of a scene container
pub enum SceneChild<'a> {
    Filaments(&'a dyn Filaments),
    Container(&'a dyn Container),
    /// Anything else (volumes, spots, surfaces, ...)
    Other,
}

/// A node of the host's scene tree that holds children
pub trait Container {
    fn child_count(&self) -> usize;

    /// Child at `index`, or `None` if it cannot be read
    fn child(&self, index: usize) -> Option<SceneChild<'_>>;
}

/// The host application
pub trait Host {
    /// Concrete Filaments type this host creates
    type Filaments: Filaments;

    fn version(&self) -> String;

    /// Extent of the loaded dataset, `None` while nothing is loaded
    fn dataset(&self) -> Option<DatasetExtent>;

    /// The Filaments object currently selected by the user
    fn selection(&self) -> Option<&dyn Filaments>;

    fn scene(&self) -> Option<&dyn Container>;

    fn create_filaments(&self) -> Self::Filaments;

    fn add_to_scene(&mut self, filaments: Self::Filaments) -> HostResult<()>;

    /// Ask the host to load a file; data may become available later
    fn open_file(&mut self, path: &Path) -> HostResult<()>;
}

/// Depth-first search for the first Filaments object in a scene tree
///
/// Children of each container are scanned in order and the first Filaments
/// child wins; nested containers are pushed on a stack for later descent.
pub fn find_first_filaments(scene: &dyn Container) -> Option<&dyn Filaments> {
    let mut stack: Vec<&dyn Container> = vec![scene];

    while let Some(container) = stack.pop() {
        for index in 0..container.child_count() {
            match container.child(index) {
                Some(SceneChild::Filaments(filaments)) => return Some(filaments),
                Some(SceneChild::Container(nested)) => stack.push(nested),
                Some(SceneChild::Other) | None => {}
            }
        }
    }

    None
}
