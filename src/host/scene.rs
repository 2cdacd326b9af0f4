//! Host backed by a JSON scene snapshot on disk
//!
//! A snapshot holds the dataset extent, the scene tree with its Filaments
//! objects, and the name of the selected object. Opening a file replaces the
//! whole snapshot, the way the application replaces its scene when it loads a
//! new dataset.

use super::traits::{
    Container, Filaments, Host, HostError, HostResult, NewFilament, SceneChild,
};
use crate::geometry::{DatasetExtent, Point3};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const DEFAULT_FILAMENTS_NAME: &str = "Filaments";

/// One filament: a point graph plus host bookkeeping
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilamentRecord {
    pub positions: Vec<Point3>,
    pub radii: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<i32>>,
    #[serde(default)]
    pub edges: Vec<(i64, i64)>,
    #[serde(default)]
    pub time_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beginning_vertex: Option<usize>,
}

impl From<NewFilament> for FilamentRecord {
    fn from(filament: NewFilament) -> Self {
        Self {
            positions: filament.positions,
            radii: filament.radii,
            types: Some(filament.types),
            edges: filament.edges,
            time_index: filament.time_index,
            beginning_vertex: None,
        }
    }
}

/// A named Filaments object in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilamentsObject {
    pub name: String,
    #[serde(default)]
    pub filaments: Vec<FilamentRecord>,
}

impl Default for FilamentsObject {
    fn default() -> Self {
        Self {
            name: DEFAULT_FILAMENTS_NAME.to_string(),
            filaments: Vec::new(),
        }
    }
}

impl FilamentsObject {
    pub fn new(name: impl Into<String>, filaments: Vec<FilamentRecord>) -> Self {
        Self {
            name: name.into(),
            filaments,
        }
    }

    fn record(&self, index: usize) -> HostResult<&FilamentRecord> {
        self.filaments
            .get(index)
            .ok_or(HostError::FilamentOutOfRange {
                index,
                count: self.filaments.len(),
            })
    }

    fn record_mut(&mut self, index: usize) -> HostResult<&mut FilamentRecord> {
        let count = self.filaments.len();
        self.filaments
            .get_mut(index)
            .ok_or(HostError::FilamentOutOfRange { index, count })
    }
}

impl Filaments for FilamentsObject {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn filament_count(&self) -> usize {
        self.filaments.len()
    }

    fn positions(&self, index: usize) -> HostResult<Vec<Point3>> {
        Ok(self.record(index)?.positions.clone())
    }

    fn radii(&self, index: usize) -> HostResult<Vec<f64>> {
        Ok(self.record(index)?.radii.clone())
    }

    fn edges(&self, index: usize) -> HostResult<Vec<(i64, i64)>> {
        Ok(self.record(index)?.edges.clone())
    }

    fn types(&self, index: usize) -> HostResult<Option<Vec<i32>>> {
        Ok(self.record(index)?.types.clone())
    }

    fn add_filament(&mut self, filament: NewFilament) -> HostResult<usize> {
        self.filaments.push(filament.into());
        Ok(self.filaments.len() - 1)
    }

    fn set_beginning_vertex(&mut self, filament: usize, vertex: usize) -> HostResult<()> {
        self.record_mut(filament)?.beginning_vertex = Some(vertex);
        Ok(())
    }
}

/// A node of the scene tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneObject {
    Group(SceneGroup),
    Filaments(FilamentsObject),
    /// Volumes, spots, surfaces and anything else the converter ignores
    Other {
        #[serde(default)]
        name: String,
    },
}

/// A scene node with ordered children
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<SceneObject>,
}

impl SceneGroup {
    /// Find a Filaments object anywhere below this group by name
    pub fn find_filaments(&self, name: &str) -> Option<&FilamentsObject> {
        self.children.iter().find_map(|child| match child {
            SceneObject::Filaments(f) if f.name == name => Some(f),
            SceneObject::Group(group) => group.find_filaments(name),
            _ => None,
        })
    }
}

impl Container for SceneGroup {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<SceneChild<'_>> {
        Some(match self.children.get(index)? {
            SceneObject::Group(group) => SceneChild::Container(group),
            SceneObject::Filaments(filaments) => SceneChild::Filaments(filaments),
            SceneObject::Other { .. } => SceneChild::Other,
        })
    }
}

fn default_version() -> String {
    format!("filament-swc scene {}", crate::VERSION)
}

/// Serialized state of the host application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub dataset: Option<DatasetExtent>,
    /// Name of the selected Filaments object
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub scene: SceneGroup,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            dataset: None,
            selection: None,
            scene: SceneGroup::default(),
        }
    }
}

impl SceneDocument {
    pub fn load(path: &Path) -> HostResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save(&self, path: &Path) -> HostResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Host implementation over a scene snapshot file
///
/// The default host has an empty scene and no backing file; it is ready for
/// [`Host::open_file`].
#[derive(Debug, Default)]
pub struct SceneFileHost {
    path: PathBuf,
    document: SceneDocument,
}

impl SceneFileHost {
    pub fn new(path: impl Into<PathBuf>, document: SceneDocument) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    /// Load a snapshot and attach to it
    pub fn connect(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref();
        let document = SceneDocument::load(path)
            .map_err(|e| HostError::Connection(format!("{}: {}", path.display(), e)))?;
        tracing::info!(
            path = %path.display(),
            version = %document.version,
            "Connected to scene"
        );
        Ok(Self::new(path, document))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &SceneDocument {
        &self.document
    }

    /// Write the snapshot back to the file it came from
    pub fn save(&self) -> HostResult<()> {
        self.document.save(&self.path)
    }

    /// Write the snapshot to a new file and continue from there
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> HostResult<()> {
        self.path = path.into();
        self.save()
    }
}

impl Host for SceneFileHost {
    type Filaments = FilamentsObject;

    fn version(&self) -> String {
        self.document.version.clone()
    }

    fn dataset(&self) -> Option<DatasetExtent> {
        self.document.dataset
    }

    fn selection(&self) -> Option<&dyn Filaments> {
        let name = self.document.selection.as_deref()?;
        self.document
            .scene
            .find_filaments(name)
            .map(|f| f as &dyn Filaments)
    }

    fn scene(&self) -> Option<&dyn Container> {
        Some(&self.document.scene)
    }

    fn create_filaments(&self) -> FilamentsObject {
        FilamentsObject::default()
    }

    fn add_to_scene(&mut self, filaments: FilamentsObject) -> HostResult<()> {
        tracing::debug!(name = %filaments.name, "Adding Filaments object to scene");
        self.document
            .scene
            .children
            .push(SceneObject::Filaments(filaments));
        Ok(())
    }

    fn open_file(&mut self, path: &Path) -> HostResult<()> {
        let document = SceneDocument::load(path).map_err(|e| HostError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "Opened file in host");
        self.document = document;
        self.path = path.to_path_buf();
        Ok(())
    }
}
