use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Table, Workbook, Worksheet};
use tracing::debug;

use crate::error::Result;
use crate::model::{Level, MatchPair, MatchResult};

/// Disposition of one export request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// The comparison workbook was written to the given path.
    Written(PathBuf),
    /// Every section of the result was empty; nothing was written.
    SkippedEmpty,
}

/// Materialises a [`MatchResult`] as a three-sheet workbook (`Common`,
/// `Missing`, `Extra`) under `output_dir`. A result with no rows in any
/// section is skipped instead of producing an empty artifact.
pub fn export_result(
    result: &MatchResult,
    output_dir: &Path,
    reference_name: &str,
    source_name: &str,
    column_label: &str,
    level: Level,
) -> Result<ExportOutcome> {
    if result.is_empty() {
        return Ok(ExportOutcome::SkippedEmpty);
    }

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(artifact_name(reference_name, source_name, level));

    let mut workbook = Workbook::new();

    let common = workbook.add_worksheet();
    common.set_name("Common")?;
    write_common(common, result, source_name, column_label)?;

    let missing = workbook.add_worksheet();
    missing.set_name("Missing")?;
    write_single_column(missing, column_label, &result.missing_in_other)?;

    let extra = workbook.add_worksheet();
    extra.set_name("Extra")?;
    write_single_column(extra, column_label, &result.extra_in_other)?;

    workbook.save(&path)?;
    debug!(path = %path.display(), "comparison workbook written");
    Ok(ExportOutcome::Written(path))
}

/// Derives the artifact filename from the source name and comparison
/// granularity.
fn artifact_name(reference_name: &str, source_name: &str, level: Level) -> String {
    match level {
        Level::Commune => format!("comparison_{reference_name}_vs_{source_name}.xlsx"),
        Level::CommuneSection => {
            format!("Comparison_ADM2_&ADM3_{reference_name}_vs_{source_name}.xlsx")
        }
    }
}

fn write_common(
    worksheet: &mut Worksheet,
    result: &MatchResult,
    source_name: &str,
    column_label: &str,
) -> Result<()> {
    // The header layout follows the first entry: scored pairs carry a
    // third column for the similarity score.
    let headers: Vec<&str> = match result.common.first() {
        Some(MatchPair::ScoredPair { .. }) => vec!["Reference", source_name, "Score"],
        Some(MatchPair::Pair { .. }) => vec!["Reference", source_name],
        None => vec![column_label],
    };
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (index, pair) in result.common.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet.write_string(row, 0, pair.reference())?;
        worksheet.write_string(row, 1, pair.other())?;
        if let MatchPair::ScoredPair { score, .. } = pair {
            worksheet.write_number(row, 2, *score)?;
        }
    }

    add_filter_table(worksheet, headers.len(), result.common.len())?;
    Ok(())
}

fn write_single_column(worksheet: &mut Worksheet, header: &str, values: &[String]) -> Result<()> {
    worksheet.write_string(0, 0, header)?;
    for (index, value) in values.iter().enumerate() {
        worksheet.write_string((index + 1) as u32, 0, value)?;
    }
    add_filter_table(worksheet, 1, values.len())?;
    Ok(())
}

fn add_filter_table(worksheet: &mut Worksheet, columns: usize, rows: usize) -> Result<()> {
    if rows == 0 {
        return Ok(());
    }
    let mut table = Table::new();
    let table = table.set_autofilter(true);
    let col_end = (columns as u16).saturating_sub(1);
    worksheet.add_table(0, 0, rows as u32, col_end, &table)?;
    Ok(())
}
