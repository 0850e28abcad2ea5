use std::path::Path;

use tracing::{error, info, instrument};

use crate::error::{Result, ToolError};
use crate::io::excel_read::{SourceBundle, SourceData};
use crate::io::excel_write::{self, ExportOutcome};
use crate::matcher;
use crate::model::{Dataset, Level, MatchResult, NameColumn, Strategy};

/// Outcome of one reference-vs-source comparison within a batch.
#[derive(Debug)]
pub enum PairOutcome {
    /// The comparison ran and its result was handed to the exporter.
    Completed {
        source: String,
        result: MatchResult,
        export: ExportOutcome,
    },
    /// The comparison failed, typically on a schema error. Sibling
    /// comparisons in the batch are unaffected.
    Failed { source: String, error: ToolError },
}

/// Runs one strategy over every source in the bundle at the given
/// granularity and exports each result. A failure in one pair is recorded
/// in its outcome without aborting the rest of the batch.
#[instrument(level = "info", skip_all, fields(?level, ?strategy, threshold))]
pub fn run_comparisons(
    bundle: &SourceBundle,
    level: Level,
    strategy: Strategy,
    threshold: f64,
    output_dir: &Path,
) -> Result<Vec<PairOutcome>> {
    if !(0.0..=100.0).contains(&threshold) {
        return Err(ToolError::InvalidThreshold(threshold));
    }
    let reference_column = bundle.reference.level_column(level)?;
    info!(
        reference = %bundle.reference.name(),
        distinct_names = reference_column.len(),
        "reference column resolved"
    );

    let mut outcomes = Vec::new();
    for source in sources_at_level(bundle, level) {
        let outcome = match compare_pair(
            &bundle.reference,
            &reference_column,
            &source.dataset,
            level,
            strategy,
            threshold,
            output_dir,
        ) {
            Ok((result, export)) => PairOutcome::Completed {
                source: source.dataset.name().to_string(),
                result,
                export,
            },
            Err(err) => {
                error!(source = %source.dataset.name(), %err, "comparison failed");
                PairOutcome::Failed {
                    source: source.dataset.name().to_string(),
                    error: err,
                }
            }
        };
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

fn sources_at_level(bundle: &SourceBundle, level: Level) -> impl Iterator<Item = &SourceData> {
    bundle
        .sources
        .iter()
        .filter(move |source| level == Level::Commune || source.sections)
}

fn compare_pair(
    reference: &Dataset,
    reference_column: &NameColumn,
    other: &Dataset,
    level: Level,
    strategy: Strategy,
    threshold: f64,
    output_dir: &Path,
) -> Result<(MatchResult, ExportOutcome)> {
    let other_column = other.level_column(level)?;
    let result = match strategy {
        Strategy::Exact => matcher::compare_exact(reference_column, &other_column),
        Strategy::CaseInsensitive => {
            matcher::compare_case_insensitive(reference_column, &other_column)
        }
        Strategy::Normalized => matcher::compare_normalized(reference_column, &other_column),
        Strategy::Fuzzy => matcher::compare_fuzzy(reference_column, &other_column, threshold),
    };
    let export = excel_write::export_result(
        &result,
        output_dir,
        reference.name(),
        other.name(),
        other_column.label(),
        level,
    )?;
    Ok((result, export))
}

/// Prints the three-line per-pair summary followed by the export
/// disposition.
pub fn print_summary(reference_name: &str, outcome: &PairOutcome) {
    match outcome {
        PairOutcome::Completed {
            source,
            result,
            export,
        } => {
            println!("\n{reference_name} vs {source}");
            println!("  common in both    : {}", result.common.len());
            println!("  missing in {source:<7}: {}", result.missing_in_other.len());
            println!("  extra in {source:<9}: {}", result.extra_in_other.len());
            match export {
                ExportOutcome::Written(path) => println!("  exported: {}", path.display()),
                ExportOutcome::SkippedEmpty => {
                    println!("  export skipped: all result sets are empty")
                }
            }
        }
        PairOutcome::Failed { source, error } => {
            println!("\n{reference_name} vs {source}");
            println!("  failed: {error}");
        }
    }
}
