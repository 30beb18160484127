//! oncoscore-tabular — Fitted artifacts and the tabular scoring pipeline:
//! preprocessing transform, probability scorers, risk tiering, and the
//! per-instance attribution engine, plus the three clinical modules that
//! compose them.
//!
//! Everything here is read-only after startup: artifacts are deserialized
//! once, validated against their module's feature schema, and shared across
//! requests without locking.

pub mod artifacts;
pub mod attribution;
pub mod model;
pub mod modules;
pub mod tiering;
pub mod transform;

pub use model::TabularModel;
pub use tiering::TierCutoffs;
pub use transform::FittedTransform;
