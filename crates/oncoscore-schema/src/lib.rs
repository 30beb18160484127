//! oncoscore-schema — Declared per-module feature schemas and the raw-input
//! normalizer that turns caller maps into fixed-order feature vectors.
//!
//! The one-hot column order produced here is part of each module's contract
//! with its fitted preprocessing artifacts; it must never depend on request
//! content.

pub mod normalize;
pub mod raw;
pub mod spec;

pub use normalize::normalize;
pub use raw::{RawInput, RawValue};
pub use spec::{FeatureSpec, FieldKind, FieldSpec};

/// Fixed-length ordered numeric vector, one entry per encoded column.
/// Missing optional values are the NaN sentinel until imputation.
pub type FeatureVector = Vec<f64>;
