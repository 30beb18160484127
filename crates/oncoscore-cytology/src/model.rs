//! Fitted ResNet-50 wrapper.

use std::path::Path;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Func, Module, VarBuilder};
use candle_transformers::models::resnet;
use serde::{Deserialize, Serialize};
use tracing::info;

use oncoscore_common::{PredictError, Result};

use crate::preprocess::{decode_image, to_input_tensor};

#[derive(Debug, Deserialize)]
struct ClassesFile {
    classes: Vec<String>,
}

/// Classification result for one image.
#[derive(Debug, Clone, Serialize)]
pub struct CytologyPrediction {
    pub prediction: String,
    pub confidence: f64,
    pub classes: Vec<String>,
    /// (label, probability) in vocabulary order.
    pub class_probabilities: Vec<(String, f64)>,
}

/// The fitted cytology classifier. Loaded once at startup and shared
/// read-only across requests; inference allocates per-request tensors only.
pub struct CytologyModel {
    net: Func<'static>,
    classes: Vec<String>,
    device: Device,
}

impl CytologyModel {
    /// Load the class vocabulary and network weights from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let start = Instant::now();
        let classes_path = dir.join("classes.json");
        let weights_path = dir.join("model.safetensors");

        let bytes = std::fs::read(&classes_path).map_err(|e| {
            PredictError::ModelUnavailable(format!("{}: {}", classes_path.display(), e))
        })?;
        let ClassesFile { classes } = serde_json::from_slice(&bytes).map_err(|e| {
            PredictError::ModelUnavailable(format!("{}: {}", classes_path.display(), e))
        })?;
        if classes.is_empty() {
            return Err(PredictError::ModelUnavailable(
                "cytology class vocabulary is empty".to_string(),
            ));
        }

        let device = Device::cuda_if_available(0).unwrap_or(Device::Cpu);
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
                .map_err(|e| {
                    PredictError::ModelUnavailable(format!("{}: {}", weights_path.display(), e))
                })?
        };
        let net = resnet::resnet50(classes.len(), vb).map_err(|e| {
            PredictError::ModelUnavailable(format!("resnet50 weights: {e}"))
        })?;

        info!(
            classes = classes.len(),
            elapsed = ?start.elapsed(),
            "cytology model loaded"
        );

        Ok(Self {
            net,
            classes,
            device,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Classify one uploaded image buffer.
    pub fn classify(&self, bytes: &[u8]) -> Result<CytologyPrediction> {
        let img = decode_image(bytes)?;
        let input = to_input_tensor(&img, &self.device)?;

        let logits = self
            .net
            .forward(&input)
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let probs = softmax_row(&logits)?;

        let (best_index, best_prob) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or((0, 0.0));

        Ok(CytologyPrediction {
            prediction: self.classes[best_index].clone(),
            confidence: best_prob,
            classes: self.classes.clone(),
            class_probabilities: self
                .classes
                .iter()
                .cloned()
                .zip(probs.iter().copied())
                .collect(),
        })
    }
}

fn softmax_row(logits: &Tensor) -> Result<Vec<f64>> {
    let probs = candle_nn::ops::softmax(logits, candle_core::D::Minus1)
        .and_then(|t| t.squeeze(0))
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(|e| PredictError::Inference(e.to_string()))?;
    Ok(probs.into_iter().map(f64::from).collect())
}
