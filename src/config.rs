use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ToolError};
use crate::model::{COMMUNE_COLUMN, DEPARTMENT_COLUMN, SECTION_COLUMN};

/// Acceptance threshold applied by the fuzzy strategy when none is given.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 90.0;

/// Run configuration: the reference dataset, the comparison sources, and
/// the tunables shared by every comparison.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Fuzzy-match acceptance threshold in the 0-100 range.
    #[serde(default = "default_threshold")]
    pub fuzzy_threshold: f64,
    /// Directory comparison workbooks are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// The dataset every source is compared against.
    pub reference: SourceSpec,
    /// The comparison sources, in run order.
    pub sources: Vec<SourceSpec>,
}

/// Describes how one source workbook maps onto the canonical columns.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    /// Display name of the source (used in summaries and filenames).
    pub name: String,
    /// Path of the source workbook.
    pub path: PathBuf,
    /// Sheet to read; the first sheet when absent.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Zero-based index of the header row within the sheet.
    #[serde(default)]
    pub header_row: u32,
    /// Source header to canonical header mappings, in output order.
    pub columns: Vec<ColumnMap>,
    /// Whether the source carries section communale data usable at the
    /// commune + section granularity.
    #[serde(default)]
    pub sections: bool,
    /// Optional literal suffix stripped from one canonical column.
    #[serde(default)]
    pub trim_suffix: Option<TrimSuffix>,
}

/// Renames one source header to its canonical counterpart.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMap {
    pub from: String,
    pub to: String,
}

/// A literal suffix to strip from every value of one canonical column.
#[derive(Debug, Clone, Deserialize)]
pub struct TrimSuffix {
    pub column: String,
    pub suffix: String,
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.fuzzy_threshold) {
            return Err(ToolError::InvalidThreshold(self.fuzzy_threshold));
        }
        Ok(())
    }
}

impl Default for Config {
    /// The standard Haiti reconciliation layout: OCHA as the reference,
    /// compared against COMET, SCOPE, and LESS workbooks under `data/`.
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            output_dir: default_output_dir(),
            reference: SourceSpec {
                name: "OCHA".to_string(),
                path: PathBuf::from("data/Derniere_version_Officielle_Source_OCHA.xlsx"),
                sheet: Some("ADM3".to_string()),
                header_row: 0,
                columns: vec![
                    ColumnMap::new("ADM1_EN", DEPARTMENT_COLUMN),
                    ColumnMap::new("ADM2_PCODE", "ADM2_PCODE"),
                    ColumnMap::new("ADM2_EN", COMMUNE_COLUMN),
                    ColumnMap::new("ADM3_EN", SECTION_COLUMN),
                ],
                sections: true,
                trim_suffix: None,
            },
            sources: vec![
                SourceSpec {
                    name: "COMET".to_string(),
                    path: PathBuf::from("data/Administrative_Area_COMET.xlsx"),
                    sheet: None,
                    // The COMET export carries a banner row above the headers.
                    header_row: 1,
                    columns: vec![
                        ColumnMap::new("Breakdown 1", DEPARTMENT_COLUMN),
                        ColumnMap::new("Breakdown 2", COMMUNE_COLUMN),
                        ColumnMap::new("Point of Interest", SECTION_COLUMN),
                    ],
                    sections: false,
                    trim_suffix: None,
                },
                SourceSpec {
                    name: "SCOPE".to_string(),
                    path: PathBuf::from("data/Administrative_Area_SCOPE.xlsx"),
                    sheet: None,
                    header_row: 0,
                    columns: vec![
                        ColumnMap::new("Departement", DEPARTMENT_COLUMN),
                        ColumnMap::new("Commune", COMMUNE_COLUMN),
                        ColumnMap::new("Section Communale", SECTION_COLUMN),
                    ],
                    sections: true,
                    trim_suffix: None,
                },
                SourceSpec {
                    name: "LESS".to_string(),
                    path: PathBuf::from("data/HTCO LESS destination locations.xlsx"),
                    sheet: None,
                    header_row: 0,
                    columns: vec![ColumnMap::new("Loading Point description", COMMUNE_COLUMN)],
                    sections: false,
                    // LESS commune names carry a country suffix, e.g. "Jeremie,HT".
                    trim_suffix: Some(TrimSuffix {
                        column: COMMUNE_COLUMN.to_string(),
                        suffix: ",HT".to_string(),
                    }),
                },
            ],
        }
    }
}

impl ColumnMap {
    fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_FUZZY_THRESHOLD
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
