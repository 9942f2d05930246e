//! The physics boundary: capability traits for the per-problem physical
//! model and the control-field smoothing filter.
//!
//! The optimizer treats the physics as a black box that can price a
//! density field (scalar objective) and differentiate that price with
//! respect to density. PDE discretization, assembly and the state /
//! adjoint solves all live behind [`PhysicalModel`]; concrete elasticity
//! and fluid models are external collaborators built on top of this
//! trait.

use crate::design::{DesignArguments, SolverParameters};
use crate::grid::{DomainIntegrator, Grid};
use crate::types::{DensityField, Gradient, TopoformError};

// ─────────────────────────────────────────────────────────────
//  Control filter
// ─────────────────────────────────────────────────────────────

/// Spatial smoothing applied to the control field before physics
/// evaluation (regularization). Owned and invoked by the physical model,
/// not by the driver.
pub trait ControlFilter {
    fn apply(&self, rho: &DensityField) -> DensityField;
}

/// The trivial filter: passes the control field through unchanged.
pub struct IdentityFilter;

impl ControlFilter for IdentityFilter {
    fn apply(&self, rho: &DensityField) -> DensityField {
        rho.clone()
    }
}

// ─────────────────────────────────────────────────────────────
//  Physical model capability
// ─────────────────────────────────────────────────────────────

/// A physical problem that can evaluate the optimization objective and
/// its gradient at a given density.
///
/// Evaluation is stateful: `calculate_objective` runs the forward solve
/// and caches whatever state the gradient needs, so
/// `calculate_objective_gradient` is only valid after an objective
/// evaluation and differentiates at the density last passed to it.
/// The driver preserves this ordering; other callers must too.
pub trait PhysicalModel {
    /// One-time setup from the shared domain description and the parsed
    /// design. Called exactly once, before any evaluation.
    fn init(
        &mut self,
        filter: Box<dyn ControlFilter>,
        grid: &Grid,
        parameters: &SolverParameters,
        arguments: &DesignArguments,
    ) -> Result<(), TopoformError>;

    /// Scalar objective at this density (runs the forward solve).
    fn calculate_objective(&mut self, rho: &DensityField) -> Result<f64, TopoformError>;

    /// Objective gradient at the density last passed to
    /// [`PhysicalModel::calculate_objective`].
    fn calculate_objective_gradient(&mut self) -> Result<Gradient, TopoformError>;
}

// ─────────────────────────────────────────────────────────────
//  Linear reference model
// ─────────────────────────────────────────────────────────────

/// The simplest model satisfying the [`PhysicalModel`] contract:
/// objective `∫ w·ρ dx` for a fixed weight field `w`, gradient `w`.
///
/// There is no PDE here — the model exists as an executable reference
/// for the evaluation-ordering contract and as the workhorse of the
/// driver tests, where its closed-form optimum makes convergence easy
/// to check.
pub struct LinearWeightModel {
    weight: Gradient,
    context: Option<(Grid, Box<dyn ControlFilter>)>,
    evaluated: bool,
}

impl LinearWeightModel {
    pub fn new(weight: Gradient) -> Self {
        Self { weight, context: None, evaluated: false }
    }
}

impl PhysicalModel for LinearWeightModel {
    fn init(
        &mut self,
        filter: Box<dyn ControlFilter>,
        grid: &Grid,
        _parameters: &SolverParameters,
        _arguments: &DesignArguments,
    ) -> Result<(), TopoformError> {
        if self.weight.dim() != grid.shape() {
            return Err(TopoformError::Model(format!(
                "weight field shape {:?} does not match grid shape {:?}",
                self.weight.dim(),
                grid.shape()
            )));
        }
        self.context = Some((grid.clone(), filter));
        Ok(())
    }

    fn calculate_objective(&mut self, rho: &DensityField) -> Result<f64, TopoformError> {
        let (grid, filter) = self
            .context
            .as_ref()
            .ok_or_else(|| TopoformError::Model("model evaluated before init".into()))?;
        let filtered = filter.apply(rho);
        self.evaluated = true;
        Ok(grid.integrate(&(&filtered * &self.weight)))
    }

    fn calculate_objective_gradient(&mut self) -> Result<Gradient, TopoformError> {
        if !self.evaluated {
            return Err(TopoformError::Model(
                "gradient requested before any objective evaluation".into(),
            ));
        }
        Ok(self.weight.clone())
    }
}
