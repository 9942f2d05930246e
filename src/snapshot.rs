//! Snapshot persistence — periodic dumps of the density field and
//! objective so an interrupted or diverged run still leaves usable data.
//!
//! The driver produces snapshots; a [`SnapshotSink`] decides where they
//! go. Writes are synchronous and blocking: a snapshot failure must
//! surface immediately, never be silently lost.

use crate::types::{DensityField, TopoformError};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
//  Sink capability
// ─────────────────────────────────────────────────────────────

/// Destination for density snapshots.
///
/// `key` is a relative destination like `triangle/data/N=10_k=20`;
/// writes must be idempotent per key and create intermediate storage
/// locations as needed.
pub trait SnapshotSink {
    fn write(
        &mut self,
        density: &DensityField,
        objective: f64,
        iteration: usize,
        key: &str,
    ) -> Result<(), TopoformError>;
}

// ─────────────────────────────────────────────────────────────
//  JSON file writer
// ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SnapshotData {
    /// Density cell values, row-major, ny rows of nx columns.
    data: Vec<Vec<f64>>,
    objective: f64,
    iteration: usize,
}

/// Writes each snapshot as `<root>/<key>.json`, creating directories
/// along the way. Re-writing the same key replaces the file.
pub struct JsonSnapshotWriter {
    root: PathBuf,
}

impl JsonSnapshotWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SnapshotSink for JsonSnapshotWriter {
    fn write(
        &mut self,
        density: &DensityField,
        objective: f64,
        iteration: usize,
        key: &str,
    ) -> Result<(), TopoformError> {
        let path = self.root.join(format!("{key}.json"));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = density.rows().into_iter().map(|row| row.to_vec()).collect();
        let snapshot = SnapshotData { data, objective, iteration };

        let file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(file, &snapshot)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  In-memory sink
// ─────────────────────────────────────────────────────────────

/// Keeps snapshots in memory; used by tests to observe the driver's
/// snapshot cadence without touching the filesystem.
#[derive(Default)]
pub struct MemorySink {
    pub snapshots: Vec<MemorySnapshot>,
}

pub struct MemorySnapshot {
    pub density: DensityField,
    pub objective: f64,
    pub iteration: usize,
    pub key: String,
}

impl SnapshotSink for MemorySink {
    fn write(
        &mut self,
        density: &DensityField,
        objective: f64,
        iteration: usize,
        key: &str,
    ) -> Result<(), TopoformError> {
        self.snapshots.push(MemorySnapshot {
            density: density.clone(),
            objective,
            iteration,
            key: key.to_string(),
        });
        Ok(())
    }
}
