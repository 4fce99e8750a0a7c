//! Core data models for translation validation

use serde::{Deserialize, Serialize};

/// One unit of translation work: a text segment, its language pair, and the
/// result slot it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub text: String,
    pub source_lang: Option<String>,
    pub target_lang: String,
    /// Position in the batch. Assigned once by the driver, never changed.
    pub index: usize,
}

impl TranslationJob {
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            source_lang: None,
            target_lang: target_lang.into(),
            index,
        }
    }

    pub fn with_source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = Some(source_lang.into());
        self
    }
}

/// Model-selection parameters sent with every inference request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceParameters {
    pub tgt_lang: String,
    pub translation_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_id_threshold: Option<f64>,
}

/// One input tensor in the inference request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceInput {
    pub name: String,
    pub shape: [usize; 2],
    pub datatype: String,
    pub data: Vec<String>,
}

impl InferenceInput {
    /// Single-text input tensor as the translate model expects it
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            name: "INPUT_TEXT".to_string(),
            shape: [1, 1],
            datatype: "BYTES".to_string(),
            data: vec![text.into()],
        }
    }
}

/// Wire payload for one translation call. Built once per job, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub parameters: InferenceParameters,
    pub inputs: Vec<InferenceInput>,
}

impl InferenceRequest {
    /// Build the request for a job. Pure and local; all requests are built
    /// before any of them is sent.
    pub fn for_job(
        job: &TranslationJob,
        translation_model: &str,
        language_id_threshold: Option<f64>,
    ) -> Self {
        Self {
            parameters: InferenceParameters {
                tgt_lang: job.target_lang.clone(),
                translation_model: translation_model.to_string(),
                src_lang: job.source_lang.clone(),
                language_id_threshold,
            },
            inputs: vec![InferenceInput::text(job.text.clone())],
        }
    }
}

/// Complete output of one dispatch call: a slot-addressed result sequence
/// plus the failures that did not fill their slot.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// One slot per input job, indexed by the job's `index`. `None` means the
    /// job failed and has a matching entry in `errors`.
    pub translations: Vec<Option<String>>,
    /// Human-readable description of each per-job failure, in completion
    /// order.
    pub errors: Vec<String>,
}

impl DispatchOutcome {
    pub fn with_capacity(len: usize) -> Self {
        Self {
            translations: vec![None; len],
            errors: Vec::new(),
        }
    }

    /// Number of populated slots
    pub fn translated_count(&self) -> usize {
        self.translations.iter().filter(|t| t.is_some()).count()
    }
}
