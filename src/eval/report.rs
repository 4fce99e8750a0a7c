//! Markdown report for the language sweep

use chrono::Utc;

/// Score columns per language row: each model with and without `src_lang`
pub const SCORE_COLUMNS: usize = 4;

/// One language's results across both models
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub seamless_code: String,
    pub nllb_code: String,
    /// SeamlessM4T w/ src, SeamlessM4T no src, NLLB w/ src, NLLB no src.
    /// `None` marks a pair that failed entirely.
    pub scores: [Option<f64>; SCORE_COLUMNS],
    /// Per-job failures collected from all four evaluations
    pub errors: Vec<String>,
}

/// Full sweep results
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub rows: Vec<SweepRow>,
}

impl SweepReport {
    /// Column means over the rows that produced a score
    pub fn column_means(&self) -> [Option<f64>; SCORE_COLUMNS] {
        let mut means = [None; SCORE_COLUMNS];
        for (column, mean) in means.iter_mut().enumerate() {
            let scores: Vec<f64> = self
                .rows
                .iter()
                .filter_map(|row| row.scores[column])
                .collect();
            if !scores.is_empty() {
                *mean = Some(scores.iter().sum::<f64>() / scores.len() as f64);
            }
        }
        means
    }

    /// Render the markdown table, mean row, and error dump
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Generated {}\n\n",
            Utc::now().format("%Y-%m-%d %H:%M UTC")
        ));
        out.push_str("| SeamlessM4T Language ");
        out.push_str("| SeamlessM4T chrF2++ w/ src_lang ");
        out.push_str("| SeamlessM4T chrF2++ no src_lang ");
        out.push_str("| NLLB Language ");
        out.push_str("| NLLB chrF2++ w/ src_lang ");
        out.push_str("| NLLB chrF2++ no src_lang |\n");
        out.push_str("| :--: | :--: | :--: | :--: | :--: | :--: |\n");

        for row in &self.rows {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                row.seamless_code,
                cell(row.scores[0]),
                cell(row.scores[1]),
                row.nllb_code,
                cell(row.scores[2]),
                cell(row.scores[3]),
            ));
        }

        let means = self.column_means();
        out.push_str(&format!(
            "| **Mean** | {} | {} | | {} | {} |\n",
            mean_cell(means[0]),
            mean_cell(means[1]),
            mean_cell(means[2]),
            mean_cell(means[3]),
        ));

        let failed: Vec<&SweepRow> = self.rows.iter().filter(|r| !r.errors.is_empty()).collect();
        if !failed.is_empty() {
            out.push_str("\n## Per-job failures\n");
            for row in failed {
                out.push_str(&format!(
                    "\n### {} / {}\n",
                    row.seamless_code, row.nllb_code
                ));
                for error in &row.errors {
                    out.push_str(&format!("- {error}\n"));
                }
            }
        }

        out
    }
}

fn cell(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{score:.1}"),
        None => "-".to_string(),
    }
}

fn mean_cell(mean: Option<f64>) -> String {
    match mean {
        Some(mean) => format!("**{mean:.2}**"),
        None => "**-**".to_string(),
    }
}
