//! Uniform rectangular domain discretization.
//!
//! The driver and the volume projector only ever need one discretization
//! operation: integrate a piecewise-constant field over the domain. The
//! grid here is the minimal carrier of that capability — `nx × ny` equal
//! cells over a `width × height` rectangle, one field value per cell.
//! Everything PDE-shaped (function spaces, assembly) belongs to the
//! physical model behind the [`crate::problem::PhysicalModel`] trait.

use crate::types::{DensityField, TopoformError};
use ndarray::Array2;

// ─────────────────────────────────────────────────────────────
//  Integration capability
// ─────────────────────────────────────────────────────────────

/// Domain integration, injected into the projector and the driver so the
/// root-finder is independent of any particular discretization.
pub trait DomainIntegrator {
    /// ∫ field dx over the whole domain.
    fn integrate(&self, field: &Array2<f64>) -> f64;
}

// ─────────────────────────────────────────────────────────────
//  Grid
// ─────────────────────────────────────────────────────────────

/// Uniform cell grid over a rectangular domain.
///
/// `resolution` is the number of cells per unit length, so a 2×1 domain
/// at resolution 10 has 20 × 10 cells. Field arrays are indexed
/// `[row, column]` = `[y, x]`.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: f64,
    pub height: f64,
    pub resolution: usize,
    pub nx: usize,
    pub ny: usize,
}

impl Grid {
    pub fn new(width: f64, height: f64, resolution: usize) -> Result<Self, TopoformError> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(TopoformError::Config(format!(
                "domain dimensions must be positive, got {width} x {height}"
            )));
        }
        if resolution == 0 {
            return Err(TopoformError::Config("resolution must be at least 1".into()));
        }
        let nx = (width * resolution as f64).round() as usize;
        let ny = (height * resolution as f64).round() as usize;
        if nx == 0 || ny == 0 {
            return Err(TopoformError::Config(format!(
                "domain {width} x {height} at resolution {resolution} has an empty cell grid"
            )));
        }
        Ok(Self { width, height, resolution, nx, ny })
    }

    /// Field shape, (rows, columns) = (ny, nx).
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn cell_area(&self) -> f64 {
        self.area() / (self.nx * self.ny) as f64
    }

    /// A field with every cell set to `value`.
    pub fn uniform(&self, value: f64) -> DensityField {
        Array2::from_elem(self.shape(), value)
    }
}

impl DomainIntegrator for Grid {
    /// Piecewise-constant quadrature: cell area × sum of cell values.
    fn integrate(&self, field: &Array2<f64>) -> f64 {
        debug_assert_eq!(field.dim(), self.shape(), "field shape does not match grid");
        self.cell_area() * field.sum()
    }
}
