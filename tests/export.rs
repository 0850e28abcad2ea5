use calamine::{DataType, Reader, Xlsx, open_workbook};
use geodata_tools::io::excel_write::{ExportOutcome, export_result};
use geodata_tools::model::{COMBINED_COLUMN, COMMUNE_COLUMN, Level, MatchPair, MatchResult};
use tempfile::tempdir;

fn read_sheet(path: &std::path::Path, name: &str) -> calamine::Range<DataType> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("workbook opened");
    workbook
        .worksheet_range(name)
        .expect("sheet present")
        .expect("sheet readable")
}

fn cell(range: &calamine::Range<DataType>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        other => panic!("unexpected cell {other:?}"),
    }
}

#[test]
fn empty_result_skips_the_export() {
    let temp_dir = tempdir().expect("temporary directory");
    let result = MatchResult::default();

    let outcome = export_result(
        &result,
        temp_dir.path(),
        "OCHA",
        "SCOPE",
        COMMUNE_COLUMN,
        Level::Commune,
    )
    .expect("export evaluated");

    assert_eq!(outcome, ExportOutcome::SkippedEmpty);
    let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
        .expect("output directory listed")
        .collect();
    assert!(entries.is_empty(), "no artifact may be written");
}

#[test]
fn single_missing_row_produces_one_populated_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let result = MatchResult {
        common: Vec::new(),
        missing_in_other: vec!["Thomassique".to_string()],
        extra_in_other: Vec::new(),
    };

    let outcome = export_result(
        &result,
        temp_dir.path(),
        "OCHA",
        "COMET",
        COMMUNE_COLUMN,
        Level::Commune,
    )
    .expect("export written");

    let path = match outcome {
        ExportOutcome::Written(path) => path,
        other => panic!("expected a written artifact, got {other:?}"),
    };
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("comparison_OCHA_vs_COMET.xlsx")
    );

    let missing = read_sheet(&path, "Missing");
    assert_eq!(cell(&missing, 0, 0), COMMUNE_COLUMN);
    assert_eq!(cell(&missing, 1, 0), "Thomassique");
    assert_eq!(missing.height(), 2);

    // The other two sections stay header-only.
    assert_eq!(read_sheet(&path, "Common").height(), 1);
    assert_eq!(read_sheet(&path, "Extra").height(), 1);
}

#[test]
fn scored_pairs_write_a_score_column() {
    let temp_dir = tempdir().expect("temporary directory");
    let result = MatchResult {
        common: vec![MatchPair::ScoredPair {
            reference: "Port-au-Prince".to_string(),
            other: "Port au Prince".to_string(),
            score: 100.0,
        }],
        missing_in_other: Vec::new(),
        extra_in_other: Vec::new(),
    };

    let outcome = export_result(
        &result,
        temp_dir.path(),
        "OCHA",
        "SCOPE",
        COMMUNE_COLUMN,
        Level::Commune,
    )
    .expect("export written");

    let path = match outcome {
        ExportOutcome::Written(path) => path,
        other => panic!("expected a written artifact, got {other:?}"),
    };

    let common = read_sheet(&path, "Common");
    assert_eq!(cell(&common, 0, 0), "Reference");
    assert_eq!(cell(&common, 0, 1), "SCOPE");
    assert_eq!(cell(&common, 0, 2), "Score");
    assert_eq!(cell(&common, 1, 0), "Port-au-Prince");
    assert_eq!(cell(&common, 1, 1), "Port au Prince");
    assert_eq!(common.get_value((1, 2)), Some(&DataType::Float(100.0)));
}

#[test]
fn combined_level_uses_its_own_filename_pattern() {
    let temp_dir = tempdir().expect("temporary directory");
    let result = MatchResult {
        common: vec![MatchPair::Pair {
            reference: "Jacmel_&_1ere Bas Cap Rouge".to_string(),
            other: "Jacmel_&_1ere Bas Cap Rouge".to_string(),
        }],
        missing_in_other: Vec::new(),
        extra_in_other: Vec::new(),
    };

    let outcome = export_result(
        &result,
        temp_dir.path(),
        "OCHA",
        "SCOPE",
        COMBINED_COLUMN,
        Level::CommuneSection,
    )
    .expect("export written");

    match outcome {
        ExportOutcome::Written(path) => assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("Comparison_ADM2_&ADM3_OCHA_vs_SCOPE.xlsx")
        ),
        other => panic!("expected a written artifact, got {other:?}"),
    }
}
