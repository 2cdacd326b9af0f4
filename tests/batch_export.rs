//! Batch export over a directory of scene files

mod common;

use common::{chain_record, document, extent, write_scene};
use filament_swc::config::BatchSettings;
use filament_swc::host::{Container, FilamentRecord, FilamentsObject, HostResult};
use filament_swc::swc::load_swc;
use filament_swc::{
    run_batch, BatchOptions, DatasetExtent, Error, FileStatus, Filaments, Host, SceneFileHost,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn options(input: &Path, output: &Path) -> BatchOptions {
    let mut options = BatchOptions::new(input, output, &BatchSettings::default());
    options.dataset_timeout = Duration::ZERO;
    options.poll_interval = Duration::from_millis(1);
    options
}

/// Input tree covering every per-file outcome
fn populate(input: &Path) {
    write_scene(
        &input.join("a.ims"),
        &document(
            Some(extent()),
            None,
            vec![FilamentsObject::new("a", vec![chain_record(3, 0.0)])],
        ),
    );
    write_scene(
        &input.join("sub").join("b.IMSR"),
        &document(
            Some(extent()),
            None,
            vec![FilamentsObject::new(
                "b",
                vec![chain_record(2, 0.0), chain_record(4, 2.0)],
            )],
        ),
    );
    write_scene(
        &input.join("sub").join("c.ims"),
        &document(None, None, vec![FilamentsObject::new("c", vec![chain_record(2, 0.0)])]),
    );
    write_scene(&input.join("d.ims"), &document(Some(extent()), None, vec![]));
    write_scene(
        &input.join("e.ims"),
        &document(
            Some(extent()),
            None,
            vec![FilamentsObject::new("e", vec![FilamentRecord::default()])],
        ),
    );
    std::fs::write(input.join("f.ims"), "not a scene").unwrap();
    std::fs::write(input.join("notes.txt"), "ignored").unwrap();
}

fn relative(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap().to_path_buf()
}

#[test]
fn every_file_gets_its_own_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    populate(&input);

    let mut host = SceneFileHost::default();
    let summary = run_batch(&mut host, &options(&input, &output)).unwrap();

    let inputs: Vec<PathBuf> = summary.files.iter().map(|f| relative(&f.input, &input)).collect();
    assert_eq!(
        inputs,
        vec![
            PathBuf::from("a.ims"),
            PathBuf::from("d.ims"),
            PathBuf::from("e.ims"),
            PathBuf::from("f.ims"),
            PathBuf::from("sub/b.IMSR"),
            PathBuf::from("sub/c.ims"),
        ]
    );

    assert!(matches!(
        &summary.files[0].status,
        FileStatus::Exported { nodes: 3, .. }
    ));
    assert_eq!(summary.files[1].status, FileStatus::NoFilaments);
    assert_eq!(summary.files[2].status, FileStatus::NoContent);
    assert!(matches!(&summary.files[3].status, FileStatus::Failed { error } if error.contains("f.ims")));
    assert!(matches!(
        &summary.files[4].status,
        FileStatus::Exported { nodes: 6, .. }
    ));
    assert_eq!(summary.files[5].status, FileStatus::DatasetTimeout);

    assert_eq!(summary.total(), 6);
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 4);
    assert!(summary.finished_at >= summary.started_at);
}

#[test]
fn outputs_mirror_input_tree_without_individual_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    populate(&input);

    let mut host = SceneFileHost::default();
    run_batch(&mut host, &options(&input, &output)).unwrap();

    let a = load_swc(output.join("a.swc")).unwrap();
    assert_eq!(a.len(), 3);

    let b = load_swc(output.join("sub").join("b.swc")).unwrap();
    let parents: Vec<i64> = b.iter().map(|n| n.parent).collect();
    assert_eq!(parents, vec![-1, 1, -1, 3, 4, 5]);

    assert!(!output.join("d.swc").exists());
    assert!(!output.join("e.swc").exists());
    assert!(!output.join("sub").join("c.swc").exists());
    assert!(!output.join("a_filament_0.swc").exists());
}

#[test]
fn summary_report_is_written_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    populate(&input);

    let mut host = SceneFileHost::default();
    let summary = run_batch(&mut host, &options(&input, &output)).unwrap();
    let report = dir.path().join("reports").join("batch.json");
    summary.save_json(&report).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    let statuses: Vec<&str> = json["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["status"].as_str().unwrap())
        .collect();
    assert_eq!(
        statuses,
        vec![
            "exported",
            "no_filaments",
            "no_content",
            "failed",
            "exported",
            "dataset_timeout"
        ]
    );
}

#[test]
fn empty_input_tree_yields_empty_summary() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = SceneFileHost::default();
    let summary = run_batch(&mut host, &options(dir.path(), &dir.path().join("out"))).unwrap();
    assert_eq!(summary.total(), 0);
    assert_eq!(summary.succeeded(), 0);
}

#[test]
fn missing_input_root_aborts_batch() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = SceneFileHost::default();
    let err = run_batch(&mut host, &options(&dir.path().join("absent"), dir.path())).unwrap_err();
    assert!(matches!(err, Error::MissingDirectory(_)));
}

/// Host that panics while opening one particular file
struct Exploding {
    inner: SceneFileHost,
    trigger: &'static str,
}

impl Host for Exploding {
    type Filaments = FilamentsObject;

    fn version(&self) -> String {
        self.inner.version()
    }

    fn dataset(&self) -> Option<DatasetExtent> {
        self.inner.dataset()
    }

    fn selection(&self) -> Option<&dyn Filaments> {
        self.inner.selection()
    }

    fn scene(&self) -> Option<&dyn Container> {
        self.inner.scene()
    }

    fn create_filaments(&self) -> FilamentsObject {
        self.inner.create_filaments()
    }

    fn add_to_scene(&mut self, filaments: FilamentsObject) -> HostResult<()> {
        self.inner.add_to_scene(filaments)
    }

    fn open_file(&mut self, path: &Path) -> HostResult<()> {
        if path.ends_with(self.trigger) {
            panic!("host crashed while opening {}", path.display());
        }
        self.inner.open_file(path)
    }
}

#[test]
fn panicking_file_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    populate(&input);

    let mut host = Exploding {
        inner: SceneFileHost::default(),
        trigger: "a.ims",
    };
    let summary = run_batch(&mut host, &options(&input, &output)).unwrap();

    match &summary.files[0].status {
        FileStatus::Failed { error } => assert!(error.contains("host crashed")),
        other => panic!("unexpected status {other:?}"),
    }
    assert_eq!(summary.total(), 6);
    assert_eq!(summary.succeeded(), 1);
    assert!(output.join("sub").join("b.swc").exists());
}
