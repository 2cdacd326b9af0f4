//! SWC to Filaments import

use crate::error::{Error, Result, ResultExt};
use crate::geometry::AffineTransform;
use crate::host::{Filaments, Host, HostError, NewFilament};
use crate::swc::{ids_are_sequential, load_swc, reconstruct_edges, SwcNode};
use serde::Serialize;
use std::path::Path;

/// Host type code for dendrite points
pub const HOST_DENDRITE_TYPE: i32 = 0;

/// Summary of one import call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    /// Name given to the new Filaments object
    pub name: String,
    pub nodes: usize,
    pub edges: usize,
    pub roots: usize,
    /// Row index of the filament's beginning vertex
    pub beginning_vertex: usize,
    pub transform: AffineTransform,
}

/// Load an SWC file into a new Filaments object in the host scene
///
/// Coordinates are mapped back through the inverse of the dataset's export
/// transform. Edges come from the parent column, as 0-based row indices.
pub fn import_swc<H: Host>(host: &mut H, path: &Path) -> Result<ImportReport> {
    let dataset = host.dataset().ok_or(HostError::NoDataset)?;
    let transform = AffineTransform::from_extent(&dataset);

    let nodes = load_swc(path).with_context(|| format!("Reading {}", path.display()))?;
    if nodes.is_empty() {
        return Err(Error::EmptySwc(path.to_path_buf()));
    }
    if !ids_are_sequential(&nodes) {
        tracing::warn!(
            "Node ids in {} are not 1..{} in row order; edges may not match rows",
            path.display(),
            nodes.len()
        );
    }

    let edges = reconstruct_edges(&nodes);
    let roots = nodes.iter().filter(|n| n.is_root()).count();
    let beginning_vertex = nodes.iter().position(SwcNode::is_root).unwrap_or(0);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let filament = NewFilament {
        positions: nodes
            .iter()
            .map(|n| transform.apply_inverse(n.position))
            .collect(),
        radii: nodes.iter().map(|n| n.radius).collect(),
        types: vec![HOST_DENDRITE_TYPE; nodes.len()],
        edges,
        time_index: 0,
    };
    let report = ImportReport {
        name,
        nodes: nodes.len(),
        edges: filament.edges.len(),
        roots,
        beginning_vertex,
        transform,
    };

    let mut filaments = host.create_filaments();
    let index = filaments.add_filament(filament)?;
    filaments.set_beginning_vertex(index, beginning_vertex)?;
    filaments.set_name(&report.name);
    host.add_to_scene(filaments)?;

    tracing::info!(
        "Imported {} ({} nodes, {} edges)",
        report.name,
        report.nodes,
        report.edges
    );
    Ok(report)
}
