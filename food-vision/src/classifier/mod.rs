mod vit;

use derive_more::Display;

pub use vit::VitClassifier;

/// Bare food name derived from a classifier class label.
///
/// Class labels in the model's label table may carry comma-separated
/// qualifiers ("ice cream, icecream"); only the text before the first
/// comma names the food.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub struct FoodLabel(String);

impl FoodLabel {
    pub fn from_class_label(label: &str) -> Self {
        let bare = label.split_once(',').map_or(label, |(name, _)| name);
        Self(bare.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
