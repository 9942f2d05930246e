//! **Topoform** — entropic mirror descent topology optimization for 2D
//! density fields.
//!
//! This crate implements the complete optimization pipeline:
//!
//! 1. **Design input** (`design`): JSON design files parsed and validated
//!    into typed parameters and boundary geometry.
//! 2. **Domain** (`grid`): uniform cell grid with the one discretization
//!    operation the core needs, domain integration.
//! 3. **Transforms** (`latent`): the logistic squash between latent and
//!    density space.
//! 4. **Projection** (`projection`): Newton enforcement of the volume
//!    constraint in latent space.
//! 5. **Driver** (`optimizer`): the mirror descent loop with adaptive
//!    step size, convergence policy and periodic snapshots.
//! 6. **Physics boundary** (`problem`): capability traits for the
//!    per-problem PDE model and control filter.
//! 7. **Snapshots** (`snapshot`): sink trait + JSON file writer.

pub mod types;
pub mod latent;
pub mod grid;
pub mod design;
pub mod problem;
pub mod projection;
pub mod optimizer;
pub mod snapshot;
