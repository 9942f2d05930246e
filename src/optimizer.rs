//! Entropic mirror descent driver.
//!
//! The optimization loop, iteration by iteration:
//!
//! 1. **Gradient** of the objective at the current density (the model's
//!    forward/adjoint state is already positioned there).
//! 2. **Latent step**: `half_step = ψ − step_size(k)·gradient`.
//! 3. **Projection** of the half step back onto the volume-feasible
//!    manifold ([`crate::projection`]).
//! 4. **Re-evaluation** of the objective at `ρ = squash(ψ)`; an increase
//!    terminates the solve as [`SolveStatus::Diverged`].
//! 5. **Stopping check**: the L2 density change against a tolerance that
//!    scales with the step size, capped by an absolute ceiling.
//!
//! The step size grows linearly (`base_rate·(k+1)`) — deliberately
//! aggressive, relying on the projection to keep the iterate feasible
//! and on the divergence check to halt when the growth destabilizes the
//! descent. Snapshots go to the sink on a fixed cadence and once more at
//! termination, whatever the terminal condition.

use crate::design::Design;
use crate::grid::{DomainIntegrator, Grid};
use crate::latent::{squash_field, unsquash_field};
use crate::problem::{ControlFilter, PhysicalModel};
use crate::projection::project;
use crate::snapshot::SnapshotSink;
use crate::types::{
    DensityField, IterationRecord, LatentField, SolveReport, SolveStatus, SolverOptions,
    TopoformError,
};

// ─────────────────────────────────────────────────────────────
//  Progress observer
// ─────────────────────────────────────────────────────────────

/// Receives one [`IterationRecord`] per iteration plus a final record at
/// termination. Decouples the loop from any particular output sink.
pub trait ProgressObserver {
    fn record(&mut self, record: &IterationRecord);
}

/// Discards all records.
pub struct QuietObserver;

impl ProgressObserver for QuietObserver {
    fn record(&mut self, _record: &IterationRecord) {}
}

/// Prints the human-readable progress table to stderr.
#[derive(Default)]
pub struct ConsoleObserver {
    header_printed: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressObserver for ConsoleObserver {
    fn record(&mut self, r: &IterationRecord) {
        if !self.header_printed {
            eprintln!("Iteration │ Objective │ ΔObjective │     Δρ    │  Δρ-tol");
            eprintln!("──────────┼───────────┼────────────┼───────────┼──────────");
            self.header_printed = true;
        }
        let objective_delta = match r.objective_delta {
            Some(delta) => fit(delta, 10),
            None => format!("{:>10}", "None"),
        };
        eprintln!(
            "{:^9} │ {} │ {} │ {} │ {}",
            r.iteration,
            fit(r.objective, 9),
            objective_delta,
            fit(r.density_delta, 9),
            fit(r.margin(), 10),
        );
    }
}

/// Format `value` into at most `width` characters, right-aligned,
/// trading precision for fit and falling back to exponent notation.
fn fit(value: f64, width: usize) -> String {
    for precision in (0..=width).rev() {
        let s = format!("{value:.precision$}");
        if s.len() <= width {
            return format!("{s:>width$}");
        }
    }
    format!("{value:>width$.1e}")
}

// ─────────────────────────────────────────────────────────────
//  Solver
// ─────────────────────────────────────────────────────────────

/// Drives one topology optimization problem to a terminal condition.
///
/// The solver is the sole owner of the density and latent fields; both
/// are replaced wholesale each iteration, never shared or mutated from
/// elsewhere. The physical model is a black box behind
/// [`PhysicalModel`]; any parallelism lives inside its solves.
pub struct Solver<'a> {
    grid: Grid,
    /// Required material volume, `width · height · fraction`.
    volume: f64,
    design_name: String,
    rho: DensityField,
    model: &'a mut dyn PhysicalModel,
    options: SolverOptions,
}

impl<'a> Solver<'a> {
    /// Set up the domain, initialize the density uniformly at the target
    /// volume fraction, and hand the model its one-time setup.
    pub fn new(
        design: &Design,
        resolution: usize,
        model: &'a mut dyn PhysicalModel,
        filter: Box<dyn ControlFilter>,
        options: SolverOptions,
    ) -> Result<Self, TopoformError> {
        let parameters = &design.parameters;
        let grid = Grid::new(parameters.width, parameters.height, resolution)?;
        let volume = parameters.width * parameters.height * parameters.fraction;
        let rho = grid.uniform(parameters.fraction);

        model.init(filter, &grid, parameters, &design.arguments)?;

        Ok(Self {
            grid,
            volume,
            design_name: design.name.clone(),
            rho,
            model,
            options,
        })
    }

    /// Step size at iteration k: `base_rate · (k + 1)`, strictly
    /// increasing.
    pub fn step_size(&self, k: usize) -> f64 {
        self.options.base_rate * (k + 1) as f64
    }

    /// Stopping tolerance at iteration k: `min(step_size(k)·ntol, itol)`.
    pub fn tolerance(&self, k: usize) -> f64 {
        (self.step_size(k) * self.options.step_tolerance)
            .min(self.options.iteration_tolerance)
    }

    /// One entropic mirror descent step: latent-space gradient descent
    /// followed by the volume projection.
    fn step(&mut self, psi: &LatentField, step_size: f64) -> Result<LatentField, TopoformError> {
        let gradient = self.model.calculate_objective_gradient()?;
        let half_step = psi - &(gradient * step_size);
        project(&half_step, self.volume, &self.grid, &self.options)
    }

    fn snapshot_key(&self, k: usize) -> String {
        format!("{}/data/N={}_k={}", self.design_name, self.grid.resolution, k)
    }

    /// Run the optimization to a terminal condition.
    ///
    /// Returns the final density, objective and status; the terminal
    /// snapshot is written before returning regardless of which
    /// condition was hit.
    pub fn solve(
        &mut self,
        sink: &mut dyn SnapshotSink,
        observer: &mut dyn ProgressObserver,
    ) -> Result<SolveReport, TopoformError> {
        let mut psi = unsquash_field(&self.rho);
        let mut difference = f64::INFINITY;
        let mut objective = self.model.calculate_objective(&self.rho)?;
        check_finite(objective, 0)?;
        let mut objective_delta: Option<f64> = None;

        let mut status = SolveStatus::Exhausted;
        let mut steps = self.options.max_iterations;

        for k in 0..self.options.max_iterations {
            observer.record(&IterationRecord {
                iteration: k,
                objective,
                objective_delta,
                density_delta: difference,
                tolerance: self.tolerance(k),
            });
            if k % self.options.snapshot_cadence == 0 {
                sink.write(&self.rho, objective, k, &self.snapshot_key(k))?;
            }

            let step_size = self.step_size(k);
            psi = self.step(&psi, step_size)?;

            let previous_rho = std::mem::replace(&mut self.rho, squash_field(&psi));
            let previous_objective = objective;
            objective = self.model.calculate_objective(&self.rho)?;
            check_finite(objective, k + 1)?;
            let delta = previous_objective - objective;
            objective_delta = Some(delta);

            if delta < 0.0 {
                status = SolveStatus::Diverged;
                steps = k + 1;
                break;
            }

            let squared_change = (&self.rho - &previous_rho).mapv(|d| d * d);
            difference = self.grid.integrate(&squared_change).sqrt();

            if difference < self.tolerance(k) {
                status = SolveStatus::Converged;
                steps = k + 1;
                break;
            }
        }

        observer.record(&IterationRecord {
            iteration: steps,
            objective,
            objective_delta,
            density_delta: difference,
            tolerance: self.tolerance(steps),
        });
        eprintln!("EXIT: {status}");

        sink.write(&self.rho, objective, steps, &self.snapshot_key(steps))?;

        Ok(SolveReport {
            status,
            density: self.rho.clone(),
            objective,
            iterations: steps,
        })
    }
}

fn check_finite(objective: f64, iteration: usize) -> Result<(), TopoformError> {
    if objective.is_finite() {
        Ok(())
    } else {
        Err(TopoformError::NonFiniteObjective { iteration, value: objective })
    }
}
