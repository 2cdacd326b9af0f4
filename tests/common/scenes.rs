//! Scene snapshot builders

use filament_swc::host::{FilamentRecord, FilamentsObject, SceneDocument, SceneGroup, SceneObject};
use filament_swc::{DatasetExtent, Point3};
use std::path::Path;

/// 10 x 10 x 10 extent with one voxel per unit
pub fn extent() -> DatasetExtent {
    DatasetExtent::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(10.0, 10.0, 10.0),
        [10, 10, 10],
    )
}

/// Extent whose Z range triggers the inversion
pub fn flipped_extent() -> DatasetExtent {
    DatasetExtent::new(
        Point3::new(-4.0, -4.0, -30.0),
        Point3::new(4.0, 4.0, 2.0),
        [16, 16, 8],
    )
}

/// Straight line of `points` points along X starting at `x0`
pub fn chain_record(points: usize, x0: f64) -> FilamentRecord {
    FilamentRecord {
        positions: (0..points)
            .map(|i| Point3::new(x0 + i as f64, 1.0, 1.0))
            .collect(),
        radii: vec![0.5; points],
        edges: (1..points as i64).map(|i| (i - 1, i)).collect(),
        ..Default::default()
    }
}

/// Soma with two branches, a cycle closing the branches, an isolated point
/// and one edge pointing past the last point
pub fn branching_record() -> FilamentRecord {
    FilamentRecord {
        positions: vec![
            Point3::new(5.0, 5.0, 5.0),
            Point3::new(6.0, 5.0, 5.0),
            Point3::new(4.0, 5.0, 5.0),
            Point3::new(7.0, 6.0, 5.0),
            Point3::new(3.0, 6.0, 5.0),
            Point3::new(9.0, 9.0, 9.0),
        ],
        radii: vec![2.0, 1.0, 1.0, 0.5, 0.5, 0.25],
        types: Some(vec![1, 3, 3, 3]),
        edges: vec![(0, 1), (0, 2), (1, 3), (2, 4), (3, 4), (4, 17)],
        ..Default::default()
    }
}

/// Snapshot with the given Filaments objects nested one group deep
pub fn document(
    dataset: Option<DatasetExtent>,
    selection: Option<&str>,
    objects: Vec<FilamentsObject>,
) -> SceneDocument {
    let mut children = vec![SceneObject::Other {
        name: "Volume".to_string(),
    }];
    children.push(SceneObject::Group(SceneGroup {
        name: "Tracing".to_string(),
        children: objects.into_iter().map(SceneObject::Filaments).collect(),
    }));
    SceneDocument {
        dataset,
        selection: selection.map(str::to_string),
        scene: SceneGroup {
            name: "Surpass Scene".to_string(),
            children,
        },
        ..Default::default()
    }
}

pub fn write_scene(path: &Path, document: &SceneDocument) {
    document.save(path).unwrap();
}
