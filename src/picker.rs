//! File and folder selection
//!
//! Commands accept explicit paths; anything left out is asked for through a
//! [`PathPicker`]. Nothing chosen means the user cancelled, and the command
//! stops before any conversion work starts.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// What the user is asked to choose
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRequest {
    /// Destination of an SWC export
    SaveSwc,
    /// SWC file to import
    OpenSwc,
    /// Root folder searched for batch inputs
    InputFolder,
    /// Root folder for batch outputs
    OutputFolder { initial: Option<PathBuf> },
}

impl PathRequest {
    pub fn title(&self) -> &'static str {
        match self {
            PathRequest::SaveSwc => "Save SWC File",
            PathRequest::OpenSwc => "Select SWC File",
            PathRequest::InputFolder => "Select Input Folder",
            PathRequest::OutputFolder { .. } => "Select Output Folder for SWC Files",
        }
    }
}

/// Source of user-chosen paths
pub trait PathPicker {
    /// The chosen path, or `None` if the user dismissed the prompt
    fn pick(&self, request: &PathRequest) -> Option<PathBuf>;
}

/// Picker for non-interactive runs; never chooses anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPicker;

impl PathPicker for NoPicker {
    fn pick(&self, request: &PathRequest) -> Option<PathBuf> {
        tracing::debug!("No picker available for '{}'", request.title());
        None
    }
}

/// Native file dialogs
#[cfg(feature = "dialogs")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogPicker;

#[cfg(feature = "dialogs")]
impl PathPicker for DialogPicker {
    fn pick(&self, request: &PathRequest) -> Option<PathBuf> {
        let dialog = rfd::FileDialog::new().set_title(request.title());
        match request {
            PathRequest::SaveSwc => dialog
                .add_filter("SWC files", &["swc"])
                .add_filter("All files", &["*"])
                .save_file(),
            PathRequest::OpenSwc => dialog
                .add_filter("SWC files", &["swc"])
                .add_filter("All files", &["*"])
                .pick_file(),
            PathRequest::InputFolder => dialog.pick_folder(),
            PathRequest::OutputFolder { initial } => match initial {
                Some(dir) => dialog.set_directory(dir).pick_folder(),
                None => dialog.pick_folder(),
            },
        }
    }
}

/// The interactive picker when built with dialogs, otherwise [`NoPicker`]
#[cfg(feature = "dialogs")]
pub fn default_picker() -> Box<dyn PathPicker> {
    Box::new(DialogPicker)
}

#[cfg(not(feature = "dialogs"))]
pub fn default_picker() -> Box<dyn PathPicker> {
    Box::new(NoPicker)
}

/// Use `explicit` if given, otherwise ask the picker
pub fn resolve_path(
    explicit: Option<&Path>,
    picker: &dyn PathPicker,
    request: PathRequest,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    picker.pick(&request).ok_or_else(|| {
        tracing::info!("No path chosen for '{}', cancelling", request.title());
        Error::Cancelled(format!("no path chosen for '{}'", request.title()))
    })
}
