//! Snapshot writer tests — key layout, directory creation, idempotency.

use ndarray::Array2;
use topoform::snapshot::{JsonSnapshotWriter, SnapshotSink};

fn sample_density() -> Array2<f64> {
    Array2::from_shape_fn((2, 3), |(y, x)| 0.1 + 0.1 * (y * 3 + x) as f64)
}

#[test]
fn writes_snapshot_under_key_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = JsonSnapshotWriter::new(dir.path());

    let density = sample_density();
    writer.write(&density, 0.125, 20, "triangle/data/N=10_k=20").unwrap();

    let path = dir.path().join("triangle/data/N=10_k=20.json");
    assert!(path.is_file(), "snapshot file missing at {}", path.display());

    let contents = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();

    assert_eq!(value["objective"], 0.125);
    assert_eq!(value["iteration"], 20);

    let data = value["data"].as_array().unwrap();
    assert_eq!(data.len(), 2, "expected ny rows");
    assert_eq!(data[0].as_array().unwrap().len(), 3, "expected nx columns");
    assert_eq!(data[1][2], 0.6);
}

/// Writing the same key twice replaces the file in place.
#[test]
fn rewriting_a_key_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = JsonSnapshotWriter::new(dir.path());

    let density = sample_density();
    writer.write(&density, 1.0, 0, "run/data/N=4_k=0").unwrap();
    writer.write(&density, 1.0, 0, "run/data/N=4_k=0").unwrap();

    let data_dir = dir.path().join("run/data");
    let entries: Vec<_> = std::fs::read_dir(&data_dir).unwrap().collect();
    assert_eq!(entries.len(), 1, "same key must map to a single file");

    let contents = std::fs::read_to_string(data_dir.join("N=4_k=0.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["objective"], 1.0);
}
