//! Image decoding and tensor preparation for the cytology network.

use candle_core::{Device, Tensor};
use image::imageops::FilterType;
use image::DynamicImage;

use oncoscore_common::{PredictError, Result};

/// Input side length the network was trained on.
pub const INPUT_SIZE: u32 = 224;

/// ImageNet channel statistics used at training time.
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decode an uploaded image buffer. Format is sniffed from the bytes, so a
/// mislabelled extension is harmless; an undecodable buffer is a request
/// error, not a fault.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(PredictError::Decode("empty image payload".to_string()));
    }
    image::load_from_memory(bytes).map_err(|e| PredictError::Decode(e.to_string()))
}

/// Resize to the network input and normalize into a (1, 3, H, W) tensor.
pub fn to_input_tensor(img: &DynamicImage, device: &Device) -> Result<Tensor> {
    let resized = img
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();

    let size = INPUT_SIZE as usize;
    let mut planes = vec![0.0f32; 3 * size * size];
    for (x, y, pixel) in resized.enumerate_pixels() {
        let offset = y as usize * size + x as usize;
        for c in 0..3 {
            planes[c * size * size + offset] = (pixel.0[c] as f32 / 255.0 - MEAN[c]) / STD[c];
        }
    }

    Tensor::from_vec(planes, (1, 3, size, size), device)
        .map_err(|e| PredictError::Inference(e.to_string()))
}
