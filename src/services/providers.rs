// Classifier Providers
// Origin and model-family classifiers are external collaborators reached
// through the `Classifier` trait; `HttpClassifier` talks to an inference server.

use crate::models::Prediction;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Invalid classifier response: {0}")]
    InvalidResponse(String),
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}

/// A text classifier returning its top label.
///
/// Calls block the current thread for the duration of inference.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Prediction, ClassifierError>;

    fn name(&self) -> &str {
        "classifier"
    }
}

#[derive(Debug, Clone, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Text-classification inference endpoint client.
///
/// Must be driven from a blocking thread (e.g. `spawn_blocking`): `classify`
/// parks on the runtime handle until the response arrives.
pub struct HttpClassifier {
    name: String,
    client: Client,
    url: String,
    api_key: Option<String>,
    runtime: Handle,
}

impl HttpClassifier {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        runtime: Handle,
    ) -> Result<Self, ClassifierError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name: name.into(),
            client,
            url: url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            runtime,
        })
    }

    async fn call_inference_api(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let start = Instant::now();

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&InferenceRequest { inputs: text });
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;
        let prediction = parse_prediction(&data)?;

        debug!(
            classifier = %self.name,
            label = %prediction.label,
            score = prediction.score,
            latency_ms = start.elapsed().as_millis() as u64,
            "classifier.prediction"
        );
        Ok(prediction)
    }
}

impl Classifier for HttpClassifier {
    fn classify(&self, text: &str) -> Result<Prediction, ClassifierError> {
        self.runtime.block_on(self.call_inference_api(text))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Extract the top prediction from an inference response.
///
/// Accepts `{label, score}`, `[{label, score}, ...]` and `[[{label, score}, ...]]`;
/// the first entry is taken as the top prediction.
pub fn parse_prediction(data: &Value) -> Result<Prediction, ClassifierError> {
    let mut current = data;
    while let Some(items) = current.as_array() {
        current = items
            .first()
            .ok_or_else(|| ClassifierError::InvalidResponse("empty prediction list".to_string()))?;
    }

    if let Some(err) = current.get("error").and_then(Value::as_str) {
        return Err(ClassifierError::Unavailable(err.to_string()));
    }

    let label = current
        .get("label")
        .and_then(Value::as_str)
        .ok_or_else(|| ClassifierError::InvalidResponse(format!("missing label in {}", current)))?;
    let score = current.get("score").and_then(Value::as_f64).unwrap_or(0.0);

    Ok(Prediction::new(label, score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Local inference server answering every POST with a fixed status and body.
    async fn spawn_inference_server(status: StatusCode, body: &'static str) -> (SocketAddr, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(
                "/classify",
                post(
                    move |State(captured): State<Captured>, headers: HeaderMap, Json(payload): Json<Value>| async move {
                        let auth = headers
                            .get(AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        captured.lock().unwrap().push((auth, payload));
                        (status, body)
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, captured)
    }

    fn classifier_for(addr: SocketAddr, api_key: Option<&str>) -> HttpClassifier {
        HttpClassifier::new(
            "origin",
            format!("http://{}/classify", addr),
            api_key.map(str::to_string),
            Duration::from_secs(5),
            Handle::current(),
        )
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_http_classifier_posts_inputs_with_bearer_key() {
        let (addr, captured) = spawn_inference_server(
            StatusCode::OK,
            r#"[[{"label": "LABEL_1", "score": 0.9}, {"label": "LABEL_0", "score": 0.1}]]"#,
        )
        .await;
        let classifier = classifier_for(addr, Some("secret"));

        let prediction = tokio::task::spawn_blocking(move || classifier.classify("Language: C\n\nint x;"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(prediction.label, "LABEL_1");
        assert!((prediction.score - 0.9).abs() < 1e-9);

        let requests = captured.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.as_deref(), Some("Bearer secret"));
        assert_eq!(requests[0].1, json!({"inputs": "Language: C\n\nint x;"}));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_http_classifier_non_success_is_api_error() {
        let (addr, captured) = spawn_inference_server(StatusCode::SERVICE_UNAVAILABLE, "loading").await;
        let classifier = classifier_for(addr, Some("   "));

        let err = tokio::task::spawn_blocking(move || classifier.classify("x"))
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::ApiError { status: 503, ref message } if message == "loading"
        ));

        // Blank keys are dropped, so no Authorization header goes out.
        let requests = captured.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_http_classifier_without_key_sends_no_header() {
        let (addr, captured) =
            spawn_inference_server(StatusCode::OK, r#"{"label": "LABEL_0", "score": 0.6}"#).await;
        let classifier = classifier_for(addr, None);
        assert_eq!(classifier.name(), "origin");

        let prediction = tokio::task::spawn_blocking(move || classifier.classify("y"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(prediction.label, "LABEL_0");
        assert_eq!(captured.lock().unwrap()[0].0, None);
    }

    #[test]
    fn test_parse_flat_list() {
        let data = json!([{"label": "LABEL_1", "score": 0.97}]);
        let p = parse_prediction(&data).unwrap();
        assert_eq!(p.label, "LABEL_1");
        assert!((p.score - 0.97).abs() < 1e-9);
    }

    #[test]
    fn test_parse_nested_list_takes_first() {
        let data = json!([[{"label": "LABEL_2", "score": 0.8}, {"label": "LABEL_0", "score": 0.1}]]);
        assert_eq!(parse_prediction(&data).unwrap().label, "LABEL_2");
    }

    #[test]
    fn test_parse_bare_object_without_score() {
        let p = parse_prediction(&json!({"label": "LABEL_0"})).unwrap();
        assert_eq!(p, Prediction::new("LABEL_0", 0.0));
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert!(matches!(
            parse_prediction(&json!([])),
            Err(ClassifierError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_prediction(&json!([{"score": 0.5}])),
            Err(ClassifierError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_server_error_payload() {
        let data = json!({"error": "Model is currently loading"});
        assert!(matches!(
            parse_prediction(&data),
            Err(ClassifierError::Unavailable(msg)) if msg.contains("loading")
        ));
    }
}
