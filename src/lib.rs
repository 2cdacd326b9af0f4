//! filament-swc: Filaments to SWC conversion
//!
//! Converts neuron traces between a microscopy host's Filaments objects and
//! the SWC morphology format, in both directions, plus a batch exporter for
//! whole directory trees.
//!
//! # Core Concepts
//!
//! - **Filament graph**: points, radii, optional types and raw undirected edges
//! - **Forest**: BFS spanning forest of one filament, numbered from 1
//! - **Combined SWC**: several forests merged into one dense id sequence
//! - **Affine transform**: per-axis scale and offset calibrated from the
//!   dataset extent, with a Z inversion for reversed Z extents
//!
//! # Example
//!
//! ```
//! use filament_swc::{convert, to_swc_string, AffineTransform, FilamentGraph, Point3};
//!
//! let graph = FilamentGraph::new(
//!     vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
//!     vec![1.0, 1.0],
//!     None,
//!     vec![(0, 1)],
//! )
//! .unwrap();
//! let conversion = convert(&graph, &AffineTransform::identity());
//! let text = to_swc_string(conversion.forest.nodes());
//! assert_eq!(text.lines().nth(1), Some("2 3 1.000000 0.000000 0.000000 1.000000 1"));
//! ```

pub mod batch;
pub mod boundary;
pub mod config;
pub mod convert;
mod error;
mod geometry;
mod graph;
pub mod host;
pub mod logging;
pub mod picker;
pub mod swc;

pub use batch::{run_batch, BatchOptions, BatchSummary, FileResult, FileStatus};
pub use config::{ConfigError, Settings};
pub use convert::{export_filaments, import_swc, ExportOptions, ExportReport, ImportReport};
pub use error::{Error, Result, ResultExt};
pub use geometry::{AffineTransform, DatasetExtent, Point3};
pub use graph::{
    convert, merge, node_type_at, CombinedSwc, Conversion, FilamentGraph, Forest, ForestSpan,
    GraphError, DEFAULT_NODE_TYPE,
};
pub use host::{Filaments, Host, HostError, SceneFileHost};
pub use swc::{parse_swc, to_swc_string, SwcError, SwcNode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
