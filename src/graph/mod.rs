//! Filament graphs and their conversion to SWC forests

mod filament;
mod forest;
mod merge;


pub use filament::{node_type_at, FilamentGraph, GraphError, DEFAULT_NODE_TYPE};
pub use forest::{convert, Conversion, Forest};
pub use merge::{merge, CombinedSwc, ForestSpan};
