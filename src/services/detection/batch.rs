// Batch Detection
// Validates a batch payload, fans items out to the blocking pool and
// gathers results back in input order.

use crate::models::{BatchItemResult, BatchResponse, DetectionMode, LanguageTag};
use crate::services::providers::ClassifierError;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use super::orchestrator::Detector;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("No code list provided.")]
    NoCodeList,
    #[error("Language list must match code list length.")]
    LanguageMismatch,
    #[error("Code and language entries must be strings.")]
    NonStringEntry,
    #[error("Classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("Batch worker failed: {0}")]
    Worker(String),
}

impl BatchError {
    /// Malformed payloads are the caller's fault; everything else is ours.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BatchError::NoCodeList | BatchError::LanguageMismatch | BatchError::NonStringEntry
        )
    }
}

/// A validated batch: index-aligned (code, language) pairs plus the mode.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub items: Vec<(String, LanguageTag)>,
    pub mode: DetectionMode,
}

/// Validate `{code: [..], language: [..], mode?: ".."}`. First failure wins.
pub fn parse_batch_request(payload: &Value) -> Result<BatchRequest, BatchError> {
    let codes = match payload.get("code").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list,
        _ => return Err(BatchError::NoCodeList),
    };
    let languages = match payload.get("language").and_then(Value::as_array) {
        Some(list) if list.len() == codes.len() => list,
        _ => return Err(BatchError::LanguageMismatch),
    };
    let mode = payload
        .get("mode")
        .and_then(Value::as_str)
        .map(DetectionMode::from_str)
        .unwrap_or_default();

    let items = codes
        .iter()
        .zip(languages)
        .map(|(code, language)| match (code.as_str(), language.as_str()) {
            (Some(code), Some(language)) => Ok((code.to_string(), LanguageTag::parse(language))),
            _ => Err(BatchError::NonStringEntry),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BatchRequest { items, mode })
}

/// Classify every item, at most `max_concurrency` at a time.
///
/// Results are index-aligned with `request.items` regardless of completion
/// order. Any collaborator failure fails the whole batch.
pub async fn run_batch(
    detector: Arc<Detector>,
    request: BatchRequest,
    max_concurrency: usize,
) -> Result<Vec<BatchItemResult>, BatchError> {
    let BatchRequest { items, mode } = request;
    let total = items.len();
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut join_set: JoinSet<Result<(usize, BatchItemResult), BatchError>> = JoinSet::new();

    for (index, (code, language)) in items.into_iter().enumerate() {
        let detector = Arc::clone(&detector);
        let semaphore = Arc::clone(&semaphore);
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| BatchError::Worker("semaphore closed".to_string()))?;
            let item = tokio::task::spawn_blocking(move || detector.classify(&code, &language, mode))
                .await
                .map_err(|e| BatchError::Worker(e.to_string()))??;
            Ok::<_, BatchError>((index, item))
        });
    }

    let mut slots: Vec<Option<BatchItemResult>> = vec![None; total];
    while let Some(res) = join_set.join_next().await {
        let (index, item) = res.map_err(|e| BatchError::Worker(e.to_string()))??;
        slots[index] = Some(item);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| BatchError::Worker(format!("missing result for item {}", index)))
        })
        .collect()
}

/// Validate and run a batch payload end to end.
pub async fn handle_batch(
    detector: Arc<Detector>,
    payload: &Value,
    max_concurrency: usize,
) -> Result<BatchResponse, BatchError> {
    let request_id = Uuid::new_v4();
    let request = match parse_batch_request(payload) {
        Ok(request) => request,
        Err(e) => {
            info!(%request_id, error = %e, "batch.rejected");
            return Err(e);
        }
    };

    let started = Instant::now();
    let item_count = request.items.len();
    info!(%request_id, items = item_count, mode = request.mode.as_str(), "batch.started");

    match run_batch(detector, request, max_concurrency).await {
        Ok(results) => {
            info!(
                %request_id,
                items = item_count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "batch.completed"
            );
            Ok(BatchResponse { results })
        }
        Err(e) => {
            warn!(%request_id, error = %e, "batch.failed");
            Err(e)
        }
    }
}
