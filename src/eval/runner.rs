//! Batch driver: feeds corpus batches through the dispatcher and scores the
//! accumulated translations for one language pair

use tracing::{debug, info};

use crate::core::config::ValidatorConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::errors::Result;
use crate::core::models::TranslationJob;
use crate::eval::chrf::ChrfScorer;
use crate::eval::corpus::{split_join, Corpus};

/// Outcome of evaluating one language pair over the whole corpus
#[derive(Debug, Clone)]
pub struct PairEvaluation {
    /// Corpus-level chrF2++ score of the successful translations
    pub score: f64,
    /// Per-job failure descriptions accumulated across all batches
    pub errors: Vec<String>,
    /// Number of jobs that produced a translation
    pub translated: usize,
    /// Total jobs dispatched
    pub dispatched: usize,
}

/// Driver that owns one dispatcher and one scorer
#[derive(Debug, Clone)]
pub struct EvalRunner {
    dispatcher: Dispatcher,
    scorer: ChrfScorer,
    batch_size: usize,
    chunks_per_batch: usize,
}

impl EvalRunner {
    pub fn new(config: &ValidatorConfig) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
            scorer: ChrfScorer::default(),
            batch_size: config.batch_size,
            chunks_per_batch: config.chunks_per_batch,
        })
    }

    /// Evaluate `src -> tgt` over the corpus.
    ///
    /// Both columns are resolved before any network activity; an unmapped
    /// code fails here. Each corpus batch is joined into a few chunk-texts,
    /// dispatched concurrently, and the translations are paired with the
    /// reference chunks of the same slots. Failed slots drop both sides, so
    /// candidates and references stay aligned. A transport failure
    /// propagates and abandons the pair.
    pub async fn evaluate_pair(
        &self,
        corpus: &Corpus,
        src: &str,
        tgt: &str,
        use_src: bool,
    ) -> Result<PairEvaluation> {
        let src_column = corpus.column(src)?;
        let ref_column = corpus.column(tgt)?;

        info!(
            "evaluating {} -> {} ({} rows, src_lang {})",
            src,
            tgt,
            src_column.len(),
            if use_src { "sent" } else { "omitted" }
        );

        let mut candidates = Vec::new();
        let mut references = Vec::new();
        let mut errors = Vec::new();
        let mut dispatched = 0;

        let batches = src_column
            .chunks(self.batch_size)
            .zip(ref_column.chunks(self.batch_size));

        for (src_batch, ref_batch) in batches {
            let texts = split_join(src_batch, self.chunks_per_batch);
            let refs = split_join(ref_batch, self.chunks_per_batch);

            let jobs: Vec<TranslationJob> = texts
                .into_iter()
                .enumerate()
                .map(|(i, text)| {
                    let job = TranslationJob::new(text, tgt, i);
                    if use_src {
                        job.with_source_lang(src)
                    } else {
                        job
                    }
                })
                .collect();
            dispatched += jobs.len();

            let outcome = self.dispatcher.dispatch(&jobs).await?;

            for (slot, reference) in outcome.translations.into_iter().zip(refs) {
                if let Some(translation) = slot {
                    candidates.push(translation);
                    references.push(reference);
                }
            }
            errors.extend(outcome.errors);
        }

        debug!(
            "{} -> {}: {}/{} chunks translated, {} errors",
            src,
            tgt,
            candidates.len(),
            dispatched,
            errors.len()
        );

        let score = self.scorer.corpus_score(&candidates, &references);
        Ok(PairEvaluation {
            score,
            errors,
            translated: candidates.len(),
            dispatched,
        })
    }
}
