//! Newton projection onto the volume-feasible latent manifold.
//!
//! Given a latent field h and a required volume V, find the scalar shift
//! c with
//!
//! ```text
//!     ∫ squash(h + c) dx = V
//! ```
//!
//! and return h + c. The shift exists and is unique because the left side
//! is continuous and strictly increasing in c with range (0, |Ω|), so any
//! V strictly between 0 and the domain area is attained exactly once.
//! Newton's method on f(c) = ∫squash(h+c)dx − V converges in a handful of
//! iterations in practice; the iteration count is capped regardless.

use crate::grid::DomainIntegrator;
use crate::latent::{squash_diff_field, squash_field};
use crate::types::{LatentField, SolverOptions, TopoformError};

/// Shift `half_step` so the volume constraint is fulfilled.
///
/// A derivative of exactly zero (a fully saturated latent field) is a
/// hard error: the root-finder cannot make progress and any shift it
/// returned would be wrong. Exhausting the iteration cap is not — the
/// best shift found is returned with a warning, and the outer loop's own
/// convergence checks catch any resulting quality degradation.
pub fn project(
    half_step: &LatentField,
    volume: f64,
    integrator: &dyn DomainIntegrator,
    options: &SolverOptions,
) -> Result<LatentField, TopoformError> {
    let mut c = 0.0;
    let mut converged = false;

    for _ in 0..options.newton_max_iterations {
        let shifted = half_step.mapv(|x| x + c);
        let error = integrator.integrate(&squash_field(&shifted)) - volume;
        let derivative = integrator.integrate(&squash_diff_field(&shifted));
        if derivative == 0.0 {
            return Err(TopoformError::DegenerateDerivative);
        }

        let newton_step = error / derivative;
        c -= newton_step;
        if newton_step.abs() < options.newton_tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        eprintln!(
            "warning: volume projection reached maximum iteration without converging; \
             result may not be accurate"
        );
    }

    Ok(half_step.mapv(|x| x + c))
}
