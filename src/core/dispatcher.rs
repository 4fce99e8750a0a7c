//! Concurrent request dispatcher for the translate inference endpoint
//!
//! Fans a batch of jobs out over bounded concurrent HTTP calls and correlates
//! each response back to the slot its job owns. Transport-level failures abort
//! the whole batch; application-level rejections are collected per job and the
//! batch keeps going.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::core::config::ValidatorConfig;
use crate::core::errors::{Result, ValidationError};
use crate::core::models::{DispatchOutcome, InferenceRequest, TranslationJob};

/// Classification of one completed call
enum CallOutcome {
    /// The response carried a translation for the job in this slot
    Translated { index: usize, text: String },
    /// Valid JSON response without a translation field; the job failed but
    /// the batch continues
    Rejected { index: usize, description: String },
}

/// Dispatcher with a fixed in-flight cap shared by all calls of one dispatch
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    endpoint: String,
    translation_model: String,
    language_id_threshold: Option<f64>,
    semaphore: Arc<Semaphore>,
}

impl Dispatcher {
    /// Create a new dispatcher. Configuration problems surface here, before
    /// any network activity.
    pub fn new(config: &ValidatorConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(config.max_concurrent)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            translation_model: config.translation_model.clone(),
            language_id_threshold: config.language_id_threshold,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = ValidatorConfig::load()?;
        Self::new(&config)
    }

    /// Dispatch a batch of jobs and reassemble the responses into one slot
    /// per job.
    ///
    /// Slot `i` of the returned outcome is populated if and only if job `i`
    /// produced a translation; every failed job has an entry in `errors`.
    /// A transport failure on any call aborts the remaining calls and
    /// propagates instead of returning a partial outcome.
    pub async fn dispatch(&self, jobs: &[TranslationJob]) -> Result<DispatchOutcome> {
        let mut outcome = DispatchOutcome::with_capacity(jobs.len());
        if jobs.is_empty() {
            return Ok(outcome);
        }

        self.check_indices(jobs)?;

        // Build every wire payload up front, in index order. Construction is
        // pure; only the calls themselves run concurrently.
        let requests: Vec<InferenceRequest> = jobs
            .iter()
            .map(|job| {
                InferenceRequest::for_job(
                    job,
                    &self.translation_model,
                    self.language_id_threshold,
                )
            })
            .collect();

        debug!("dispatching {} jobs to {}", jobs.len(), self.endpoint);

        // Completion order is unconstrained; the slot index carried through
        // each call restores the batch order. Dropping this stream (on a
        // transport error below) abandons every outstanding call.
        let mut in_flight: FuturesUnordered<_> = jobs
            .iter()
            .zip(requests)
            .map(|(job, request)| self.call(job, request))
            .collect();

        while let Some(completed) = in_flight.next().await {
            match completed? {
                CallOutcome::Translated { index, text } => {
                    outcome.translations[index] = Some(text);
                }
                CallOutcome::Rejected { index, description } => {
                    warn!("job {} rejected: {}", index, description);
                    outcome.errors.push(description);
                }
            }
        }

        debug!(
            "dispatch complete: {}/{} translated, {} errors",
            outcome.translated_count(),
            jobs.len(),
            outcome.errors.len()
        );

        Ok(outcome)
    }

    /// Every slot must be owned by exactly one job
    fn check_indices(&self, jobs: &[TranslationJob]) -> Result<()> {
        let mut seen = vec![false; jobs.len()];
        for job in jobs {
            if job.index >= jobs.len() || seen[job.index] {
                return Err(ValidationError::ConfigError {
                    message: format!(
                        "job indices must cover 0..{} exactly once (found {})",
                        jobs.len(),
                        job.index
                    ),
                });
            }
            seen[job.index] = true;
        }
        Ok(())
    }

    /// Perform one call under the concurrency cap and classify its outcome.
    ///
    /// Only transport-level problems (connect error, timeout, undecodable
    /// body) are `Err`; an HTTP error status with a JSON body is a rejection,
    /// because the service answered and the input was the problem.
    async fn call(&self, job: &TranslationJob, request: InferenceRequest) -> Result<CallOutcome> {
        let _permit = self.semaphore.acquire().await.unwrap();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ValidationError::TransportError {
                text: job.text.clone(),
                message: e.to_string(),
            })?;

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ValidationError::TransportError {
                    text: job.text.clone(),
                    message: e.to_string(),
                })?;

        // An empty translation is still a translation; missing fields are not.
        match body["outputs"][0]["data"][0].as_str() {
            Some(translated) => Ok(CallOutcome::Translated {
                index: job.index,
                text: translated.to_string(),
            }),
            None => Ok(CallOutcome::Rejected {
                index: job.index,
                description: format!("\"{}\" rejected by service: {}", job.text, body),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted behavior for one input text
    #[derive(Clone)]
    enum Behavior {
        /// Respond with this translation after the given delay
        Translate { text: String, delay_ms: u64 },
        /// Respond with a JSON error body (payload failure)
        Reject,
        /// Respond with a non-JSON body (transport failure)
        Garbage,
    }

    #[derive(Clone, Default)]
    struct MockService {
        behaviors: Arc<HashMap<String, Behavior>>,
        hits: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        peak_in_flight: Arc<AtomicUsize>,
    }

    impl MockService {
        fn scripted(behaviors: HashMap<String, Behavior>) -> Self {
            Self {
                behaviors: Arc::new(behaviors),
                ..Default::default()
            }
        }
    }

    async fn infer(
        State(svc): State<MockService>,
        Json(body): Json<serde_json::Value>,
    ) -> axum::response::Response {
        svc.hits.fetch_add(1, Ordering::SeqCst);
        let current = svc.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        svc.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let input = body["inputs"][0]["data"][0]
            .as_str()
            .unwrap_or_default()
            .to_string();

        let response = match svc.behaviors.get(&input) {
            Some(Behavior::Translate { text, delay_ms }) => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Json(json!({"outputs": [{"data": [text]}]})).into_response()
            }
            Some(Behavior::Reject) => {
                Json(json!({"error": format!("unsupported input: {input}")})).into_response()
            }
            Some(Behavior::Garbage) => "definitely not json".into_response(),
            None => {
                Json(json!({"outputs": [{"data": [format!("echo:{input}")]}]})).into_response()
            }
        };

        svc.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }

    async fn spawn_mock(svc: MockService) -> String {
        let app = Router::new().route("/infer", post(infer)).with_state(svc);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/infer")
    }

    fn config_for(endpoint: String, max_concurrent: usize) -> ValidatorConfig {
        ValidatorConfig {
            endpoint,
            max_concurrent,
            ..Default::default()
        }
    }

    fn jobs_from(texts: &[&str]) -> Vec<TranslationJob> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| TranslationJob::new(*text, "fra", i).with_source_lang("eng"))
            .collect()
    }

    #[tokio::test]
    async fn test_all_success_correlates_by_index_not_completion_order() {
        // Earlier jobs sleep longer, so completions arrive in reverse.
        let behaviors: HashMap<String, Behavior> = [
            ("hello", "bonjour", 120),
            ("goodbye", "au revoir", 80),
            ("thanks", "merci", 40),
            ("yes", "oui", 0),
        ]
        .iter()
        .map(|(input, output, delay_ms)| {
            (
                input.to_string(),
                Behavior::Translate {
                    text: output.to_string(),
                    delay_ms: *delay_ms,
                },
            )
        })
        .collect();

        let endpoint = spawn_mock(MockService::scripted(behaviors)).await;
        let dispatcher = Dispatcher::new(&config_for(endpoint, 8)).unwrap();

        let jobs = jobs_from(&["hello", "goodbye", "thanks", "yes"]);
        let outcome = dispatcher.dispatch(&jobs).await.unwrap();

        assert_eq!(outcome.translations.len(), jobs.len());
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.translations[0].as_deref(), Some("bonjour"));
        assert_eq!(outcome.translations[1].as_deref(), Some("au revoir"));
        assert_eq!(outcome.translations[2].as_deref(), Some("merci"));
        assert_eq!(outcome.translations[3].as_deref(), Some("oui"));
    }

    #[tokio::test]
    async fn test_payload_failure_is_recorded_and_batch_continues() {
        let behaviors: HashMap<String, Behavior> =
            [("broken".to_string(), Behavior::Reject)].into_iter().collect();

        let endpoint = spawn_mock(MockService::scripted(behaviors)).await;
        let dispatcher = Dispatcher::new(&config_for(endpoint, 8)).unwrap();

        let jobs = jobs_from(&["one", "broken", "three", "four"]);
        let outcome = dispatcher.dispatch(&jobs).await.unwrap();

        assert_eq!(outcome.translations.len(), 4);
        assert_eq!(outcome.translated_count(), 3);
        assert!(outcome.translations[1].is_none());
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("broken"));
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_the_batch() {
        let behaviors: HashMap<String, Behavior> =
            [("poison".to_string(), Behavior::Garbage)].into_iter().collect();

        let endpoint = spawn_mock(MockService::scripted(behaviors)).await;
        let dispatcher = Dispatcher::new(&config_for(endpoint, 8)).unwrap();

        let jobs = jobs_from(&["fine", "poison", "also fine"]);
        let result = dispatcher.dispatch(&jobs).await;

        match result {
            Err(ValidationError::TransportError { text, .. }) => assert_eq!(text, "poison"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_transport_failure() {
        // Nothing listens here; the connect itself fails.
        let dispatcher =
            Dispatcher::new(&config_for("http://127.0.0.1:9/infer".to_string(), 4)).unwrap();

        let jobs = jobs_from(&["hello"]);
        assert!(matches!(
            dispatcher.dispatch(&jobs).await,
            Err(ValidationError::TransportError { .. })
        ));
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_the_limit() {
        let behaviors: HashMap<String, Behavior> = (0..20)
            .map(|i| {
                (
                    format!("text-{i}"),
                    Behavior::Translate {
                        text: format!("out-{i}"),
                        delay_ms: 20,
                    },
                )
            })
            .collect();

        let svc = MockService::scripted(behaviors);
        let peak = svc.peak_in_flight.clone();
        let endpoint = spawn_mock(svc).await;
        let dispatcher = Dispatcher::new(&config_for(endpoint, 3)).unwrap();

        let texts: Vec<String> = (0..20).map(|i| format!("text-{i}")).collect();
        let jobs: Vec<TranslationJob> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| TranslationJob::new(text.clone(), "fra", i))
            .collect();

        let outcome = dispatcher.dispatch(&jobs).await.unwrap();

        assert_eq!(outcome.translated_count(), 20);
        assert!(
            peak.load(Ordering::SeqCst) <= 3,
            "peak in-flight {} exceeded limit",
            peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn test_serial_and_wide_limits_agree() {
        let endpoint = spawn_mock(MockService::default()).await;

        let texts: Vec<String> = (0..100).map(|i| format!("segment {i}")).collect();
        let jobs: Vec<TranslationJob> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| TranslationJob::new(text.clone(), "fra", i))
            .collect();

        let serial = Dispatcher::new(&config_for(endpoint.clone(), 1)).unwrap();
        let wide = Dispatcher::new(&config_for(endpoint, 50)).unwrap();

        let serial_outcome = serial.dispatch(&jobs).await.unwrap();
        let wide_outcome = wide.dispatch(&jobs).await.unwrap();

        assert_eq!(serial_outcome.translations, wide_outcome.translations);
        assert!(serial_outcome.errors.is_empty());
        assert!(wide_outcome.errors.is_empty());
        assert_eq!(
            serial_outcome.translations[42].as_deref(),
            Some("echo:segment 42")
        );
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let svc = MockService::default();
        let hits = svc.hits.clone();
        let endpoint = spawn_mock(svc).await;
        let dispatcher = Dispatcher::new(&config_for(endpoint, 8)).unwrap();

        let outcome = dispatcher.dispatch(&[]).await.unwrap();

        assert!(outcome.translations.is_empty());
        assert!(outcome.errors.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_indices_rejected_before_any_call() {
        let svc = MockService::default();
        let hits = svc.hits.clone();
        let endpoint = spawn_mock(svc).await;
        let dispatcher = Dispatcher::new(&config_for(endpoint, 8)).unwrap();

        let jobs = vec![
            TranslationJob::new("a", "fra", 0),
            TranslationJob::new("b", "fra", 0),
        ];

        assert!(matches!(
            dispatcher.dispatch(&jobs).await,
            Err(ValidationError::ConfigError { .. })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_translation_is_a_success() {
        let behaviors: HashMap<String, Behavior> = [(
            "mute".to_string(),
            Behavior::Translate {
                text: String::new(),
                delay_ms: 0,
            },
        )]
        .into_iter()
        .collect();

        let endpoint = spawn_mock(MockService::scripted(behaviors)).await;
        let dispatcher = Dispatcher::new(&config_for(endpoint, 2)).unwrap();

        let jobs = jobs_from(&["mute"]);
        let outcome = dispatcher.dispatch(&jobs).await.unwrap();

        assert_eq!(outcome.translations[0].as_deref(), Some(""));
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_zero_concurrency_is_a_configuration_failure() {
        let config = config_for("http://localhost:8000/infer".to_string(), 0);
        assert!(matches!(
            Dispatcher::new(&config),
            Err(ValidationError::ConfigError { .. })
        ));
    }
}
