//! oncoscore-cytology — Pap smear cytology image classification using Candle.
//!
//! Wraps a fitted ResNet-50 exported as safetensors. The network itself is
//! opaque to the rest of the pipeline: bytes in, a probability simplex over
//! the fixed five-class cytology vocabulary out.

mod model;
mod preprocess;

pub use model::{CytologyModel, CytologyPrediction};
