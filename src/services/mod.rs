// Code Detective Core Services

pub mod text_processor;
pub mod labels;
pub mod config_store;
pub mod providers;
pub mod detection;

pub use text_processor::*;
pub use labels::*;
pub use config_store::*;
pub use providers::*;

pub use detection::{
    handle_batch,
    parse_batch_request,
    run_batch,
    BatchError,
    BatchRequest,
    Detector,
};
