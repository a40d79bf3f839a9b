use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use image::imageops::FilterType;
use tract_onnx::prelude::*;

use super::FoodLabel;
use crate::Classifier;
use crate::error::ClassifyError;

const INPUT_SIZE: usize = 224;
// Normalization constants of the ViT feature extractor.
const MEAN: f32 = 0.5;
const STD: f32 = 0.5;

/// Pretrained Vision Transformer classifier running on tract.
///
/// The optimized model plan and its label table are loaded once at startup
/// and shared read-only across requests. Inference is CPU-bound, so each
/// call runs on the blocking thread pool.
pub struct VitClassifier {
    inner: Arc<Inner>,
}

struct Inner {
    plan: TypedSimplePlan<TypedModel>,
    labels: Vec<String>,
}

impl VitClassifier {
    /// Loads the ONNX model and the label table (one class name per line,
    /// in class-index order).
    pub fn load(
        model_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
    ) -> anyhow::Result<Self> {
        let plan = tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, 224, 224)),
            )?
            .into_optimized()?
            .into_runnable()?;

        let labels = std::fs::read_to_string(labels_path)?
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        anyhow::ensure!(!labels.is_empty(), "label table is empty");

        Ok(Self {
            inner: Arc::new(Inner { plan, labels }),
        })
    }
}

#[async_trait]
impl Classifier for VitClassifier {
    async fn classify(&self, image: Vec<u8>) -> Result<FoodLabel, ClassifyError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.classify(&image))
            .await
            .map_err(|err| ClassifyError::Inference(anyhow::Error::new(err)))?
    }
}

impl Inner {
    fn classify(&self, image: &[u8]) -> Result<FoodLabel, ClassifyError> {
        let image = decode(image)?;
        let input = preprocess(&image);

        let outputs = self
            .plan
            .run(tvec!(input.into_tensor().into()))
            .map_err(ClassifyError::Inference)?;
        let logits = outputs[0]
            .to_array_view::<f32>()
            .map_err(ClassifyError::Inference)?;

        let class_idx = argmax(logits.iter().copied());
        let label = self.labels.get(class_idx).ok_or_else(|| {
            ClassifyError::Inference(anyhow::anyhow!(
                "class index {class_idx} is outside the label table ({} entries)",
                self.labels.len()
            ))
        })?;

        Ok(FoodLabel::from_class_label(label))
    }
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, ClassifyError> {
    image::load_from_memory(bytes).map_err(ClassifyError::Decode)
}

/// Resizes to the model's fixed input resolution and normalizes each RGB
/// channel into [-1, 1], laid out as a [1, 3, 224, 224] tensor.
fn preprocess(image: &DynamicImage) -> tract_ndarray::Array4<f32> {
    let resized = image
        .resize_exact(INPUT_SIZE as u32, INPUT_SIZE as u32, FilterType::Triangle)
        .to_rgb8();

    tract_ndarray::Array4::from_shape_fn((1, 3, INPUT_SIZE, INPUT_SIZE), |(_, c, y, x)| {
        let value = resized.get_pixel(x as u32, y as u32)[c];
        (value as f32 / 255.0 - MEAN) / STD
    })
}

// Ties go to the lowest class index.
fn argmax(scores: impl Iterator<Item = f32>) -> usize {
    let mut best = 0;
    let mut best_score = f32::NEG_INFINITY;

    for (index, score) in scores.enumerate() {
        if score > best_score {
            best_score = score;
            best = index;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_the_highest_score() {
        assert_eq!(argmax([0.1, 0.7, 0.2].into_iter()), 1);
    }

    #[test]
    fn argmax_ties_resolve_to_the_lowest_index() {
        assert_eq!(argmax([0.3, 0.9, 0.9, 0.1].into_iter()), 1);
        assert_eq!(argmax([0.5, 0.5].into_iter()), 0);
    }

    #[test]
    fn preprocess_produces_a_normalized_model_input() {
        let white = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            64,
            48,
            image::Rgb([255, 255, 255]),
        ));
        let input = preprocess(&white);
        assert_eq!(input.shape(), &[1, 3, 224, 224]);
        assert!(input.iter().all(|&v| (v - 1.0).abs() < f32::EPSILON));

        let black =
            DynamicImage::ImageRgb8(image::RgbImage::from_pixel(10, 10, image::Rgb([0, 0, 0])));
        let input = preprocess(&black);
        assert!(input.iter().all(|&v| (v + 1.0).abs() < f32::EPSILON));
    }

    #[test]
    fn valid_image_bytes_decode() {
        let mut bytes = Vec::new();
        image::RgbImage::from_pixel(4, 4, image::Rgb([200, 180, 40]))
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();

        assert!(decode(&bytes).is_ok());
    }

    #[test]
    fn garbage_bytes_fail_with_a_decode_error() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)));
    }
}
