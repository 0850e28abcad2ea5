use std::path::{Path, PathBuf};

use geodata_tools::ToolError;
use geodata_tools::config::{ColumnMap, Config, SourceSpec, TrimSuffix};
use geodata_tools::io::excel_read::load_source;
use geodata_tools::model::{COMMUNE_COLUMN, DEPARTMENT_COLUMN, SECTION_COLUMN};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

fn write_rows(path: &Path, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, *value)
                .expect("cell written");
        }
    }
    workbook.save(path).expect("workbook saved");
}

fn spec(name: &str, path: PathBuf, columns: Vec<ColumnMap>) -> SourceSpec {
    SourceSpec {
        name: name.to_string(),
        path,
        sheet: None,
        header_row: 0,
        columns,
        sections: false,
        trim_suffix: None,
    }
}

fn commune_mapping(from: &str) -> Vec<ColumnMap> {
    vec![ColumnMap {
        from: from.to_string(),
        to: COMMUNE_COLUMN.to_string(),
    }]
}

#[test]
fn loader_trims_cells_and_deduplicates_at_extraction() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("scope.xlsx");
    write_rows(
        &path,
        &[
            &["Commune"],
            &["  Jacmel "],
            &["Jacmel"],
            &["Marigot"],
            &[""],
        ],
    );

    let dataset =
        load_source(&spec("SCOPE", path, commune_mapping("Commune"))).expect("dataset loaded");
    let communes = dataset.column(COMMUNE_COLUMN).expect("commune column");

    assert_eq!(communes.values(), ["Jacmel", "Marigot"]);
}

#[test]
fn loader_honours_the_header_row_offset() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("comet.xlsx");
    write_rows(
        &path,
        &[
            &["COMET extract 2024"],
            &["Breakdown 1", "Breakdown 2"],
            &["Ouest", "Gressier"],
            &["Ouest", "Kenscoff"],
        ],
    );

    let mut source = spec(
        "COMET",
        path,
        vec![
            ColumnMap {
                from: "Breakdown 1".to_string(),
                to: DEPARTMENT_COLUMN.to_string(),
            },
            ColumnMap {
                from: "Breakdown 2".to_string(),
                to: COMMUNE_COLUMN.to_string(),
            },
        ],
    );
    source.header_row = 1;

    let dataset = load_source(&source).expect("dataset loaded");
    let communes = dataset.column(COMMUNE_COLUMN).expect("commune column");

    assert_eq!(communes.values(), ["Gressier", "Kenscoff"]);
}

#[test]
fn loader_strips_the_configured_suffix() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("less.xlsx");
    write_rows(
        &path,
        &[
            &["Loading Point description"],
            &["Jeremie,HT"],
            &["Les Cayes,HT"],
            &["Miragoane"],
        ],
    );

    let mut source = spec("LESS", path, commune_mapping("Loading Point description"));
    source.trim_suffix = Some(TrimSuffix {
        column: COMMUNE_COLUMN.to_string(),
        suffix: ",HT".to_string(),
    });

    let dataset = load_source(&source).expect("dataset loaded");
    let communes = dataset.column(COMMUNE_COLUMN).expect("commune column");

    assert_eq!(communes.values(), ["Jeremie", "Les Cayes", "Miragoane"]);
}

#[test]
fn absent_mapped_header_names_the_column_and_dataset() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("scope.xlsx");
    write_rows(&path, &[&["Commune"], &["Jacmel"]]);

    let error = load_source(&spec("SCOPE", path, commune_mapping("Departement")))
        .expect_err("schema error expected");

    match error {
        ToolError::MissingColumn { column, dataset } => {
            assert_eq!(column, "Departement");
            assert_eq!(dataset, "SCOPE");
        }
        other => panic!("expected a missing-column error, got {other}"),
    }
}

#[test]
fn combined_column_skips_rows_with_a_blank_side() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("scope.xlsx");
    write_rows(
        &path,
        &[
            &["Commune", "Section Communale"],
            &["Jacmel", "1ere Bas Cap Rouge"],
            &["Marigot", ""],
            &["Jacmel", "2eme Fond Melon"],
        ],
    );

    let dataset = load_source(&spec(
        "SCOPE",
        path,
        vec![
            ColumnMap {
                from: "Commune".to_string(),
                to: COMMUNE_COLUMN.to_string(),
            },
            ColumnMap {
                from: "Section Communale".to_string(),
                to: SECTION_COLUMN.to_string(),
            },
        ],
    ))
    .expect("dataset loaded");

    let combined = dataset.combined_column().expect("combined column");
    assert_eq!(
        combined.values(),
        [
            "Jacmel_&_1ere Bas Cap Rouge",
            "Jacmel_&_2eme Fond Melon",
        ]
    );
}

#[test]
fn config_file_overrides_defaults() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("sources.json");
    std::fs::write(
        &path,
        serde_json::json!({
            "fuzzy_threshold": 85.0,
            "reference": {
                "name": "OCHA",
                "path": "data/ocha.xlsx",
                "sheet": "ADM3",
                "columns": [{"from": "ADM2_EN", "to": COMMUNE_COLUMN}]
            },
            "sources": [{
                "name": "SCOPE",
                "path": "data/scope.xlsx",
                "columns": [{"from": "Commune", "to": COMMUNE_COLUMN}],
                "sections": true
            }]
        })
        .to_string(),
    )
    .expect("config written");

    let config = Config::load(&path).expect("config loaded");

    assert_eq!(config.fuzzy_threshold, 85.0);
    assert_eq!(config.output_dir, PathBuf::from("output"));
    assert_eq!(config.reference.sheet.as_deref(), Some("ADM3"));
    assert_eq!(config.sources.len(), 1);
    assert!(config.sources[0].sections);
}

#[test]
fn out_of_range_threshold_is_rejected() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("sources.json");
    std::fs::write(
        &path,
        serde_json::json!({
            "fuzzy_threshold": 140.0,
            "reference": {
                "name": "OCHA",
                "path": "data/ocha.xlsx",
                "columns": []
            },
            "sources": []
        })
        .to_string(),
    )
    .expect("config written");

    let error = Config::load(&path).expect_err("threshold must be rejected");
    assert!(matches!(error, ToolError::InvalidThreshold(value) if value == 140.0));
}
