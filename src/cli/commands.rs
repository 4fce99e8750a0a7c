//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;

/// Commands for the MT validator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sweep the full language table against the inference service
    Sweep {
        /// Evaluate only the first N languages of the table
        #[arg(long)]
        limit: Option<usize>,

        /// Write the markdown report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate a single language pair
    Pair {
        /// Source language code (model notation, e.g. fra or fra_Latn)
        #[arg(long)]
        src: String,

        /// Target language code (default: eng)
        #[arg(long, default_value = "eng")]
        tgt: String,

        /// Translation model to request
        #[arg(short, long, default_value = "seamlessm4t_text2text")]
        model: String,

        /// Omit src_lang and let the service identify the language
        #[arg(long)]
        no_src: bool,
    },
}

/// Handle the sweep command
pub async fn handle_sweep(limit: Option<usize>, output: Option<PathBuf>) -> anyhow::Result<()> {
    use crate::core::config::ValidatorConfig;
    use crate::eval::corpus::Corpus;
    use crate::eval::languages::{ENGLISH, LANGUAGE_CODES};
    use crate::eval::report::{SweepReport, SweepRow, SCORE_COLUMNS};
    use crate::eval::runner::EvalRunner;
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;
    use tracing::{info, warn};

    let start_time = Instant::now();

    let config = ValidatorConfig::load()?;
    let corpus = Corpus::load(&config.dataset_dir)?;

    info!("Starting language sweep");
    info!("Endpoint: {}", config.endpoint);
    info!("Corpus: {} ({} rows)", config.dataset_dir.display(), corpus.rows());

    // One runner per model; both share the endpoint and limits.
    let seamless_runner = EvalRunner::new(&ValidatorConfig {
        translation_model: "seamlessm4t".to_string(),
        ..config.clone()
    })?;
    let nllb_runner = EvalRunner::new(&ValidatorConfig {
        translation_model: "nllb".to_string(),
        ..config.clone()
    })?;

    let languages: &[(&str, &str)] = match limit {
        Some(limit) => &LANGUAGE_CODES[..limit.min(LANGUAGE_CODES.len())],
        None => LANGUAGE_CODES,
    };

    let pb = ProgressBar::new(languages.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap()
        .progress_chars("=>-"));

    let mut report = SweepReport::default();
    let mut failed_cells = 0;

    for (seamless, nllb) in languages {
        pb.set_message(format!("Evaluating: {seamless}"));

        let mut scores = [None; SCORE_COLUMNS];
        let mut errors = Vec::new();
        let cells = [
            (&seamless_runner, *seamless, ENGLISH.0, true),
            (&seamless_runner, *seamless, ENGLISH.0, false),
            (&nllb_runner, *nllb, ENGLISH.1, true),
            (&nllb_runner, *nllb, ENGLISH.1, false),
        ];

        for (column, (runner, src, tgt, use_src)) in cells.into_iter().enumerate() {
            match runner.evaluate_pair(&corpus, src, tgt, use_src).await {
                Ok(eval) => {
                    scores[column] = Some(eval.score);
                    errors.extend(eval.errors);
                }
                Err(e) => {
                    // One dead pair must not sink the rest of the sweep.
                    failed_cells += 1;
                    warn!("{} -> {} failed: {}", src, tgt, e);
                }
            }
        }

        report.rows.push(SweepRow {
            seamless_code: seamless.to_string(),
            nllb_code: nllb.to_string(),
            scores,
            errors,
        });
        pb.inc(1);
    }

    pb.finish_with_message("Completed");

    let rendered = report.render();
    match &output {
        Some(path) => tokio::fs::write(path, &rendered).await?,
        None => println!("{rendered}"),
    }

    let duration = start_time.elapsed();
    info!(
        "Completed: {} languages, {} failed cells in {:?}",
        report.rows.len(),
        failed_cells,
        duration
    );

    println!("\n✅ Sweep completed!");
    println!("   Languages: {}", report.rows.len());
    println!("   Failed cells: {failed_cells}");
    if let Some(path) = output {
        println!("   Report: {}", path.display());
    }
    println!("   Time: {duration:?}");

    Ok(())
}

/// Handle the single-pair command
pub async fn handle_pair(
    src: String,
    tgt: String,
    model: String,
    no_src: bool,
) -> anyhow::Result<()> {
    use crate::core::config::ValidatorConfig;
    use crate::eval::corpus::Corpus;
    use crate::eval::runner::EvalRunner;
    use tracing::info;

    let config = ValidatorConfig {
        translation_model: model,
        ..ValidatorConfig::load()?
    };
    let corpus = Corpus::load(&config.dataset_dir)?;

    info!("Evaluating {} -> {} with {}", src, tgt, config.translation_model);

    let runner = EvalRunner::new(&config)?;
    let eval = runner.evaluate_pair(&corpus, &src, &tgt, !no_src).await?;

    println!("\n✅ {src} -> {tgt} ({})", config.translation_model);
    println!("   chrF2++: {:.1}", eval.score);
    println!("   Translated: {}/{}", eval.translated, eval.dispatched);

    if !eval.errors.is_empty() {
        println!("\n⚠️  {} failed jobs:", eval.errors.len());
        for error in &eval.errors {
            println!("   - {error}");
        }
    }

    Ok(())
}
