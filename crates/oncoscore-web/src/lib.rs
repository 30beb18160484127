//! oncoscore-web — HTTP boundary for the scoring pipeline.
//! Exposes the prediction endpoints, the model-info endpoints, and the
//! health probe; owns the process-wide artifact bundle.

pub mod artifacts;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
