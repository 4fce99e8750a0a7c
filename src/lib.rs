//! MT Validator - translation quality validation for inference services
//!
//! This library evaluates the translation quality of a Triton-style inference
//! endpoint against a FLORES-style parallel corpus, scored with corpus-level
//! chrF2++. Batches of segments are dispatched over bounded concurrent HTTP
//! calls and correlated back to their slots regardless of completion order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod eval;

// Re-export key types for convenience
pub use self::core::{
    config::ValidatorConfig,
    dispatcher::Dispatcher,
    errors::ValidationError,
    models::{DispatchOutcome, InferenceRequest, TranslationJob},
};

pub use self::eval::{
    chrf::ChrfScorer,
    corpus::Corpus,
    runner::{EvalRunner, PairEvaluation},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
