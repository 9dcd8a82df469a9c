// Detection Module
// Code origin detection organized into:
// - orchestrator: two-stage origin / model-family classification of one snippet
// - batch: payload validation and ordered, bounded-concurrency batch runs

pub mod orchestrator;
pub mod batch;

pub use orchestrator::Detector;
pub use batch::{handle_batch, parse_batch_request, run_batch, BatchError, BatchRequest};
