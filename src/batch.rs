//! Batch export over a directory tree
//!
//! Every input file is opened in the host, exported to a mirrored location
//! under the output root, and judged on its own. A failing file is logged and
//! counted; the loop always moves on to the next one.

use crate::boundary::{error_chain, isolate};
use crate::config::BatchSettings;
use crate::convert::{export_filaments, ExportOptions};
use crate::error::{Error, Result, ResultExt};
use crate::geometry::DatasetExtent;
use crate::host::{find_first_filaments, Host};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Where to read, where to write, and how long to wait for the host
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub extensions: Vec<String>,
    pub dataset_timeout: Duration,
    pub poll_interval: Duration,
}

impl BatchOptions {
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        settings: &BatchSettings,
    ) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            extensions: settings.extensions.clone(),
            dataset_timeout: settings.dataset_timeout(),
            poll_interval: settings.poll_interval(),
        }
    }
}

/// How a single input file ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Exported { output: PathBuf, nodes: usize },
    /// The host never reported a loaded dataset
    DatasetTimeout,
    /// The scene holds no Filaments object
    NoFilaments,
    /// Filaments were found but none had points
    NoContent,
    Failed { error: String },
}

impl FileStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, FileStatus::Exported { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    pub input: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Results of a whole batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub files: Vec<FileResult>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.status.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Write the summary as pretty JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Files under `root` with one of `extensions`, sorted by path
pub fn discover_inputs(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::MissingDirectory(root.to_path_buf()));
    }

    let mut inputs = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            inputs.push(entry.into_path());
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// `<output_root>/<input dir relative to input_root>/<stem>.swc`
pub fn output_path_for(input: &Path, input_root: &Path, output_root: &Path) -> PathBuf {
    let relative = input
        .parent()
        .and_then(|dir| dir.strip_prefix(input_root).ok())
        .unwrap_or_else(|| Path::new(""));
    let stem = input.file_stem().unwrap_or_default();

    let mut file_name = stem.to_os_string();
    file_name.push(".swc");
    output_root.join(relative).join(file_name)
}

/// Poll the host until it reports a dataset or `timeout` passes
pub fn wait_for_dataset<H: Host>(
    host: &H,
    timeout: Duration,
    poll: Duration,
) -> Option<DatasetExtent> {
    let start = Instant::now();
    loop {
        if let Some(dataset) = host.dataset() {
            return Some(dataset);
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return None;
        }
        thread::sleep(poll.min(timeout - elapsed));
    }
}

fn process_file<H: Host>(
    host: &mut H,
    input: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<FileStatus> {
    if let Some(dir) = output.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("Creating {}", dir.display()))?;
    }

    host.open_file(input)?;
    let Some(dataset) = wait_for_dataset(&*host, options.dataset_timeout, options.poll_interval)
    else {
        tracing::error!("Timeout waiting for dataset: {}", input.display());
        return Ok(FileStatus::DatasetTimeout);
    };

    let Some(filaments) = host.scene().and_then(find_first_filaments) else {
        tracing::warn!("No Filaments found in: {}", input.display());
        return Ok(FileStatus::NoFilaments);
    };

    let report = export_filaments(&dataset, filaments, output, &ExportOptions::combined_only())?;
    if report.is_written() {
        tracing::info!("Saved: {}", output.display());
        Ok(FileStatus::Exported {
            output: output.to_path_buf(),
            nodes: report.combined_nodes,
        })
    } else {
        tracing::warn!("No SWC content for: {}", input.display());
        Ok(FileStatus::NoContent)
    }
}

/// Export the first Filaments object of every input file
pub fn run_batch<H: Host>(host: &mut H, options: &BatchOptions) -> Result<BatchSummary> {
    let started_at = Utc::now();
    let inputs = discover_inputs(&options.input_root, &options.extensions)?;
    if inputs.is_empty() {
        tracing::warn!(
            "No {} files found under {}",
            options.extensions.join("/"),
            options.input_root.display()
        );
    }

    let total = inputs.len();
    let mut files = Vec::with_capacity(total);
    for (position, input) in inputs.into_iter().enumerate() {
        tracing::info!("[{}/{}] Opening: {}", position + 1, total, input.display());
        let output = output_path_for(&input, &options.input_root, &options.output_root);

        let status = isolate(|| {
            process_file(host, &input, &output, options)
                .with_context(|| format!("Processing {}", input.display()))
        })
        .unwrap_or_else(|err| {
            tracing::error!("Error processing file: {}", error_chain(&err));
            FileStatus::Failed {
                error: err.to_string(),
            }
        });

        files.push(FileResult { input, status });
    }

    let summary = BatchSummary {
        input_root: options.input_root.clone(),
        output_root: options.output_root.clone(),
        started_at,
        finished_at: Utc::now(),
        files,
    };
    tracing::info!(
        "Exported {} / {} file(s) to {}",
        summary.succeeded(),
        summary.total(),
        summary.output_root.display()
    );
    Ok(summary)
}
