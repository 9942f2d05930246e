use ndarray::Array2;
use std::fmt;

// ─────────────────────────────────────────────────────────────
//  Field aliases
// ─────────────────────────────────────────────────────────────

/// Per-cell material occupancy over the domain, values strictly in (0, 1).
pub type DensityField = Array2<f64>;

/// Unconstrained transform of the density field (see [`crate::latent`]).
pub type LatentField = Array2<f64>;

/// ∂objective/∂density at the current design point.
pub type Gradient = Array2<f64>;

// ─────────────────────────────────────────────────────────────
//  Error type
// ─────────────────────────────────────────────────────────────

/// Unified error type for all fallible operations in the crate.
///
/// Every function in the public API returns `Result<T, TopoformError>`
/// instead of panicking. Configuration and degeneracy errors are
/// unrecoverable for the current solve and carry enough context to
/// diagnose the input that caused them.
#[derive(Debug)]
pub enum TopoformError {
    /// Malformed design input (bad objective name, wrong-length tuple,
    /// unknown side, inconsistent flow boundary conditions, ...).
    Config(String),
    /// The Newton projection derivative evaluated to exactly zero;
    /// the projector cannot make progress.
    DegenerateDerivative,
    /// The physical model returned a non-finite objective value.
    NonFiniteObjective { iteration: usize, value: f64 },
    /// The physical model failed to evaluate.
    Model(String),
    /// A snapshot could not be written.
    Io(std::io::Error),
    /// Snapshot or design (de)serialization failed.
    Json(serde_json::Error),
}

impl fmt::Display for TopoformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::DegenerateDerivative => {
                write!(f, "got derivative equal to zero while projecting psi")
            }
            Self::NonFiniteObjective { iteration, value } => {
                write!(f, "objective is not finite at iteration {iteration}: {value}")
            }
            Self::Model(msg) => write!(f, "physical model error: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "serialization error: {e}"),
        }
    }
}

impl std::error::Error for TopoformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TopoformError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TopoformError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ─────────────────────────────────────────────────────────────
//  Solver options
// ─────────────────────────────────────────────────────────────

/// Tunable knobs for the mirror descent driver and the embedded Newton
/// projection. The defaults reproduce the reference behavior.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Iteration budget for the outer mirror descent loop.
    pub max_iterations: usize,
    /// Base step size; the step at iteration k is `base_rate * (k + 1)`.
    pub base_rate: f64,
    /// Step-size-proportional stopping tolerance factor (ntol).
    pub step_tolerance: f64,
    /// Absolute ceiling on the stopping tolerance (itol).
    pub iteration_tolerance: f64,
    /// Write a snapshot every this many iterations.
    pub snapshot_cadence: usize,
    /// Iteration cap for the Newton volume projection.
    pub newton_max_iterations: usize,
    /// Newton early-exit threshold on |update|.
    pub newton_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            base_rate: 25.0,
            step_tolerance: 1e-5,
            iteration_tolerance: 1e-2,
            snapshot_cadence: 10,
            newton_max_iterations: 10,
            newton_tolerance: 1e-12,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Solve status / report
// ─────────────────────────────────────────────────────────────

/// Terminal condition of a mirror descent solve. Divergence and budget
/// exhaustion are expected outcomes of the method under its aggressive
/// step-size policy, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Density change dropped below the stopping tolerance.
    Converged,
    /// A step increased the objective value.
    Diverged,
    /// Iteration budget reached without meeting the tolerance.
    Exhausted,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged => write!(f, "optimal solution found"),
            Self::Diverged => write!(f, "step increased objective value"),
            Self::Exhausted => write!(f, "iteration did not converge"),
        }
    }
}

/// Outcome of a solve: which terminal condition was hit, where the
/// iterate ended up, and how much work it took.
#[derive(Debug)]
pub struct SolveReport {
    pub status: SolveStatus,
    /// Final density field (cell values, ny × nx).
    pub density: DensityField,
    /// Objective at the final density.
    pub objective: f64,
    /// Number of mirror descent steps taken.
    pub iterations: usize,
}

// ─────────────────────────────────────────────────────────────
//  Iteration record
// ─────────────────────────────────────────────────────────────

/// Per-iteration progress values handed to the observer.
#[derive(Debug, Clone, Copy)]
pub struct IterationRecord {
    pub iteration: usize,
    pub objective: f64,
    /// `previous − new`; `None` before the first step.
    pub objective_delta: Option<f64>,
    /// L2 norm of the density change; infinite before the first step.
    pub density_delta: f64,
    /// Stopping tolerance in effect at this iteration.
    pub tolerance: f64,
}

impl IterationRecord {
    /// How far the density change sits above the stopping tolerance;
    /// the solve stops once this goes negative.
    pub fn margin(&self) -> f64 {
        self.density_delta - self.tolerance
    }
}
