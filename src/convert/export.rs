//! Filaments to SWC export

use crate::error::{Error, Result, ResultExt};
use crate::geometry::{AffineTransform, DatasetExtent};
use crate::graph::{convert, merge, Forest};
use crate::host::{Filaments, Host, HostError};
use crate::swc::save_swc;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Which files an export writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Also write one file per filament
    pub write_individual: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            write_individual: true,
        }
    }
}

impl ExportOptions {
    pub fn combined_only() -> Self {
        Self {
            write_individual: false,
        }
    }
}

impl From<&crate::config::ExportSettings> for ExportOptions {
    fn from(settings: &crate::config::ExportSettings) -> Self {
        Self {
            write_individual: settings.write_individual,
        }
    }
}

/// Outcome for one filament
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilamentExport {
    pub index: usize,
    pub nodes: usize,
    pub trees: usize,
    pub dropped_edges: usize,
    /// The filament had no points
    pub skipped: bool,
    /// Per-filament file, when one was written
    pub path: Option<PathBuf>,
}

/// Summary of one export call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub name: String,
    pub filament_count: usize,
    pub transform: AffineTransform,
    pub filaments: Vec<FilamentExport>,
    /// Combined file, unless there was nothing to write
    pub combined_path: Option<PathBuf>,
    pub combined_nodes: usize,
}

impl ExportReport {
    pub fn is_written(&self) -> bool {
        self.combined_path.is_some()
    }

    pub fn exported_filaments(&self) -> usize {
        self.filaments.iter().filter(|f| !f.skipped).count()
    }
}

/// `<savename without extension>_filament_<index>.swc`
pub fn individual_path(savename: &Path, index: usize) -> PathBuf {
    let mut name = savename.with_extension("").into_os_string();
    name.push(format!("_filament_{}.swc", index));
    PathBuf::from(name)
}

/// The selected Filaments object and the dataset it belongs to
pub fn selected_export_source<H: Host>(host: &H) -> Result<(DatasetExtent, &dyn Filaments)> {
    let filaments = host.selection().ok_or(Error::NoSelection)?;
    let dataset = host.dataset().ok_or(HostError::NoDataset)?;
    Ok((dataset, filaments))
}

/// Convert every filament and write the SWC file(s)
///
/// Filaments without points are skipped. The combined file holds all
/// non-empty filaments renumbered into one id sequence and is not written
/// when nothing remains.
pub fn export_filaments(
    dataset: &DatasetExtent,
    filaments: &dyn Filaments,
    savename: &Path,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let transform = AffineTransform::from_extent(dataset);
    let count = filaments.filament_count();
    let mut report = ExportReport {
        name: filaments.name(),
        filament_count: count,
        transform,
        filaments: Vec::with_capacity(count),
        combined_path: None,
        combined_nodes: 0,
    };

    tracing::info!("Processing Filaments object: {}", report.name);
    if count == 0 {
        tracing::warn!("Filaments object contains 0 filaments.");
        return Ok(report);
    }

    let mut forests: Vec<Forest> = Vec::with_capacity(count);
    for index in 0..count {
        let _span = tracing::info_span!("filament", index).entered();
        let graph = filaments
            .graph(index)
            .with_context(|| format!("Reading filament {}", index))?;
        let conversion = convert(&graph, &transform);

        if conversion.is_empty_input() {
            tracing::warn!("Filament {} has no points, skipping", index);
            report.filaments.push(FilamentExport {
                index,
                nodes: 0,
                trees: 0,
                dropped_edges: conversion.dropped_edges.len(),
                skipped: true,
                path: None,
            });
            continue;
        }

        let mut entry = FilamentExport {
            index,
            nodes: conversion.forest.len(),
            trees: conversion.forest.tree_count(),
            dropped_edges: conversion.dropped_edges.len(),
            skipped: false,
            path: None,
        };

        if options.write_individual {
            let path = individual_path(savename, index);
            save_swc(&path, conversion.forest.nodes())
                .with_context(|| format!("Writing {}", path.display()))?;
            tracing::info!("Saved filament {} to {}", index, path.display());
            entry.path = Some(path);
        }

        tracing::debug!(
            index,
            nodes = entry.nodes,
            trees = entry.trees,
            "Converted filament"
        );
        report.filaments.push(entry);
        forests.push(conversion.forest);
    }

    let combined = merge(&forests);
    if combined.is_empty() {
        tracing::warn!("No SWC content for {}", report.name);
        return Ok(report);
    }

    save_swc(savename, combined.nodes())
        .with_context(|| format!("Writing {}", savename.display()))?;
    tracing::info!(
        "Saved {} nodes from {} filament(s) to {}",
        combined.len(),
        combined.spans().len(),
        savename.display()
    );
    report.combined_nodes = combined.len();
    report.combined_path = Some(savename.to_path_buf());
    Ok(report)
}
