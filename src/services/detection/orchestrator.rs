// Two-stage detection
// Origin first; the model-family classifier only runs for AI-authored code
// when the caller asked for it.

use crate::models::{BatchItemResult, DetectionMode, DisplayLabels, LanguageTag, Prediction};
use crate::services::labels::{map_model_family_label, map_origin_label, AI_LABEL};
use crate::services::providers::{Classifier, ClassifierError};
use crate::services::text_processor::normalize_code;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Detector {
    origin: Arc<dyn Classifier>,
    family: Arc<dyn Classifier>,
}

impl Detector {
    pub fn new(origin: Arc<dyn Classifier>, family: Arc<dyn Classifier>) -> Self {
        Self { origin, family }
    }

    /// Classify one snippet. Blocks on the classifier collaborators.
    pub fn classify(
        &self,
        code: &str,
        language: &LanguageTag,
        mode: DetectionMode,
    ) -> Result<BatchItemResult, ClassifierError> {
        let snippet = normalize_code(code, language);
        let source = self.detect_origin(&snippet)?;

        let ai_model = if mode == DetectionMode::Advanced && source == AI_LABEL {
            Some(self.detect_family(&snippet)?)
        } else {
            None
        };

        debug!(
            language = %language,
            mode = mode.as_str(),
            source = %source,
            ai_model = ai_model.as_deref().unwrap_or("-"),
            "detector.classified"
        );
        Ok(BatchItemResult { source, ai_model })
    }

    /// Labels for the single-snippet checker. `detail` falls back to the
    /// origin label whenever origin is not AI.
    pub fn classify_for_display(
        &self,
        code: &str,
        language: &LanguageTag,
    ) -> Result<DisplayLabels, ClassifierError> {
        let item = self.classify(code, language, DetectionMode::Advanced)?;
        let detail = item.ai_model.unwrap_or_else(|| item.source.clone());
        Ok(DisplayLabels {
            result: item.source,
            detail,
        })
    }

    fn detect_origin(&self, snippet: &str) -> Result<String, ClassifierError> {
        let prediction = run_classifier(self.origin.as_ref(), snippet)?;
        Ok(map_origin_label(&prediction.label))
    }

    fn detect_family(&self, snippet: &str) -> Result<String, ClassifierError> {
        let prediction = run_classifier(self.family.as_ref(), snippet)?;
        Ok(map_model_family_label(&prediction.label))
    }
}

fn run_classifier(classifier: &dyn Classifier, snippet: &str) -> Result<Prediction, ClassifierError> {
    classifier.classify(snippet).map_err(|e| {
        warn!(classifier = classifier.name(), error = %e, "classifier.failed");
        e
    })
}
