//! Host application capability layer
//!
//! The conversion pipelines talk to the host through [`Host`], [`Filaments`]
//! and [`Container`]. [`SceneFileHost`] implements them over JSON scene
//! snapshots.

mod scene;
mod traits;

pub use scene::{
    FilamentRecord, FilamentsObject, SceneDocument, SceneFileHost, SceneGroup, SceneObject,
};
pub use traits::{
    find_first_filaments, Container, Filaments, Host, HostError, HostResult, NewFilament,
    SceneChild,
};
