//! Latent ↔ density transforms — pure ℝ → ℝ math.
//!
//! The optimizer never steps the density field directly. It works on an
//! unconstrained latent field ψ related to the density ρ by the logistic
//! squashing map, which keeps ρ strictly inside (0, 1) no matter how far
//! a gradient step travels:
//!
//! ```text
//!     squash(x)   = 1 / (1 + exp(−x))           ℝ → (0, 1)
//!     unsquash(p) = ln(p / (1 − p))             (0, 1) → ℝ
//! ```
//!
//! `unsquash` is only defined strictly inside (0, 1); every density field
//! in this crate is the image of a finite latent field, so the bound holds
//! by construction.

use crate::types::{DensityField, Gradient, LatentField};

// ─────────────────────────────────────────────────────────────
//  Scalar maps
// ─────────────────────────────────────────────────────────────

/// Logistic squashing function, ℝ → (0, 1), monotone increasing.
#[inline]
pub fn squash(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of [`squash`]:  squash(x)·(1 − squash(x)).
#[inline]
pub fn squash_diff(x: f64) -> f64 {
    let s = squash(x);
    s * (1.0 - s)
}

/// Inverse of [`squash`] (the logit). Caller must guarantee p ∈ (0, 1).
#[inline]
pub fn unsquash(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

// ─────────────────────────────────────────────────────────────
//  Field maps
// ─────────────────────────────────────────────────────────────

/// Map a latent field to the density field it represents.
pub fn squash_field(psi: &LatentField) -> DensityField {
    psi.mapv(squash)
}

/// Pointwise squashing derivative of a latent field.
pub fn squash_diff_field(psi: &LatentField) -> Gradient {
    psi.mapv(squash_diff)
}

/// Map a density field back to latent space.
pub fn unsquash_field(rho: &DensityField) -> LatentField {
    rho.mapv(unsquash)
}
