mod classifier;
mod error;
mod nutrition;

use std::sync::Arc;

use async_trait::async_trait;

pub use classifier::{FoodLabel, VitClassifier};
pub use error::{ClassifyError, LookupError, PipelineError};
pub use nutrition::{NutritionClient, NutritionRecord};

/// A pretrained model mapping an uploaded image to a single best-guess
/// food name.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: Vec<u8>) -> Result<FoodLabel, ClassifyError>;
}

/// An external source of nutrition facts for a named food.
#[async_trait]
pub trait NutritionSource: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<NutritionRecord>, LookupError>;
}

/// Classify-then-lookup composition shared by every front surface.
pub struct Pipeline {
    classifier: Arc<dyn Classifier>,
    nutrition: Arc<dyn NutritionSource>,
}

impl Pipeline {
    pub fn new(classifier: Arc<dyn Classifier>, nutrition: Arc<dyn NutritionSource>) -> Self {
        Self {
            classifier,
            nutrition,
        }
    }

    /// Runs the full pipeline on raw uploaded image bytes.
    ///
    /// A label the nutrition source does not recognize comes back as an
    /// empty result set, not an error; classification and lookup failures
    /// propagate unchanged.
    pub async fn run(&self, image: Vec<u8>) -> Result<Vec<NutritionRecord>, PipelineError> {
        let label = self.classifier.classify(image).await?;
        tracing::debug!(%label, "image classified");

        let records = self.nutrition.lookup(label.as_str()).await?;
        Ok(records)
    }
}
