use crate::error::{Result, ToolError};

/// Canonical header for the department (ADM1) column.
pub const DEPARTMENT_COLUMN: &str = "Departement_ADM1";
/// Canonical header for the commune (ADM2) column, the primary
/// reconciliation key.
pub const COMMUNE_COLUMN: &str = "Commune_ADM2";
/// Canonical header for the section communale (ADM3) column.
pub const SECTION_COLUMN: &str = "Section_Communale_ADM3";
/// Header of the derived commune + section column.
pub const COMBINED_COLUMN: &str = "ADM2_&_ADM3";
/// Literal separator joining commune and section in the derived column.
pub const COMBINED_SEPARATOR: &str = "_&_";

/// Matching strategy applied to a pair of name columns, in increasing
/// order of tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Byte-for-byte equality.
    Exact,
    /// Equality after lower-casing.
    CaseInsensitive,
    /// Equality after accent, punctuation, and whitespace folding.
    Normalized,
    /// Token-order-insensitive similarity above a threshold.
    Fuzzy,
}

/// Granularity of a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Commune (ADM2) names only.
    Commune,
    /// Commune + section communale, joined with [`COMBINED_SEPARATOR`].
    CommuneSection,
}

/// An ordered sequence of distinct name strings drawn from one column of
/// one source dataset. Construction de-duplicates with first-seen-wins
/// semantics; the values keep their original spelling for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct NameColumn {
    label: String,
    values: Vec<String>,
}

impl NameColumn {
    /// Builds a column from raw cell values, trimming each value and
    /// dropping blanks and later duplicates.
    pub fn from_values<I, S>(label: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = std::collections::HashSet::new();
        let mut distinct: Vec<String> = Vec::new();
        for value in values {
            let trimmed = value.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            if seen.insert(trimmed.to_string()) {
                distinct.push(trimmed.to_string());
            }
        }
        Self {
            label: label.into(),
            values: distinct,
        }
    }

    /// Header the column was extracted under.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Distinct values in first-seen order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A reconciled entry in the common section of a [`MatchResult`].
#[derive(Debug, Clone, PartialEq)]
pub enum MatchPair {
    /// Names matched by one of the equality strategies.
    Pair { reference: String, other: String },
    /// Names matched by the fuzzy strategy, with the similarity score in
    /// the 0-100 range.
    ScoredPair {
        reference: String,
        other: String,
        score: f64,
    },
}

impl MatchPair {
    /// Reference-side spelling of the entry.
    pub fn reference(&self) -> &str {
        match self {
            MatchPair::Pair { reference, .. } => reference,
            MatchPair::ScoredPair { reference, .. } => reference,
        }
    }

    /// Other-side spelling of the entry.
    pub fn other(&self) -> &str {
        match self {
            MatchPair::Pair { other, .. } => other,
            MatchPair::ScoredPair { other, .. } => other,
        }
    }
}

/// Output of a single comparison: which names agree, which reference
/// names have no counterpart, and which other-dataset names are
/// extraneous. Constructed fresh per comparison and never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchResult {
    /// Matched entries, in reference-column order.
    pub common: Vec<MatchPair>,
    /// Reference names with no acceptable counterpart.
    pub missing_in_other: Vec<String>,
    /// Other-dataset names with no acceptable counterpart in the
    /// reference.
    pub extra_in_other: Vec<String>,
}

impl MatchResult {
    /// True when all three sections are empty.
    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.missing_in_other.is_empty() && self.extra_in_other.is_empty()
    }
}

/// A loaded source table: canonical column headers plus rows of trimmed
/// cell values. Produced once by the loader and shared read-only across
/// comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Creates a dataset from canonical headers and row-major cells.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Name of the source the dataset was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extracts the distinct non-blank values of one canonical column.
    /// A column absent from the dataset is a schema error naming both the
    /// column and the dataset.
    pub fn column(&self, name: &str) -> Result<NameColumn> {
        let index = self.column_index(name)?;
        Ok(NameColumn::from_values(
            name,
            self.rows.iter().map(|row| cell(row, index)),
        ))
    }

    /// Extracts the derived commune + section column. Rows where either
    /// side is blank are skipped.
    pub fn combined_column(&self) -> Result<NameColumn> {
        let commune = self.column_index(COMMUNE_COLUMN)?;
        let section = self.column_index(SECTION_COLUMN)?;
        let values = self.rows.iter().filter_map(|row| {
            let commune = cell(row, commune);
            let section = cell(row, section);
            if commune.is_empty() || section.is_empty() {
                None
            } else {
                Some(format!("{commune}{COMBINED_SEPARATOR}{section}"))
            }
        });
        Ok(NameColumn::from_values(COMBINED_COLUMN, values))
    }

    /// Extracts the column compared at the given granularity.
    pub fn level_column(&self, level: Level) -> Result<NameColumn> {
        match level {
            Level::Commune => self.column(COMMUNE_COLUMN),
            Level::CommuneSection => self.combined_column(),
        }
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| ToolError::MissingColumn {
                column: name.to_string(),
                dataset: self.name.clone(),
            })
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}
