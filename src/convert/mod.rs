//! Export and import pipelines between a host and SWC files

mod export;
mod import;

pub use export::{
    export_filaments, individual_path, selected_export_source, ExportOptions, ExportReport,
    FilamentExport,
};
pub use import::{import_swc, ImportReport, HOST_DENDRITE_TYPE};
