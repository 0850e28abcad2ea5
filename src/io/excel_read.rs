use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::config::{Config, SourceSpec};
use crate::error::{Result, ToolError};
use crate::model::Dataset;

/// A comparison source together with its granularity capability.
#[derive(Debug, Clone)]
pub struct SourceData {
    pub dataset: Dataset,
    /// Whether the source participates in commune + section comparisons.
    pub sections: bool,
}

/// The processed datasets for one run: the reference plus every
/// comparison source, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct SourceBundle {
    pub reference: Dataset,
    pub sources: Vec<SourceData>,
}

/// Loads every dataset named by the configuration.
pub fn load_bundle(config: &Config) -> Result<SourceBundle> {
    let reference = load_source(&config.reference)?;
    let sources = config
        .sources
        .iter()
        .map(|spec| {
            Ok(SourceData {
                dataset: load_source(spec)?,
                sections: spec.sections,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SourceBundle { reference, sources })
}

/// Reads one source workbook into a [`Dataset`] with canonical headers,
/// following the sheet, header offset, and column mapping of its spec.
pub fn load_source(spec: &SourceSpec) -> Result<Dataset> {
    if !spec.path.exists() {
        return Err(ToolError::MissingInput(spec.path.clone()));
    }
    let mut workbook: Xlsx<_> = open_workbook(&spec.path)?;
    let sheet_name = resolve_sheet(&workbook, spec)?;
    let range = read_sheet(&mut workbook, &sheet_name)?;

    let mut rows = range.rows().skip(spec.header_row as usize);
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|c| cell_to_string(Some(c))).collect(),
        None => Vec::new(),
    };

    let indices = spec
        .columns
        .iter()
        .map(|mapping| {
            headers
                .iter()
                .position(|header| header == &mapping.from)
                .ok_or_else(|| ToolError::MissingColumn {
                    column: mapping.from.clone(),
                    dataset: spec.name.clone(),
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    let columns: Vec<String> = spec.columns.iter().map(|m| m.to.clone()).collect();
    let mut data: Vec<Vec<String>> = Vec::new();
    for row in rows {
        let cells: Vec<String> = indices
            .iter()
            .zip(&columns)
            .map(|(&index, column)| {
                let value = cell_to_string(row.get(index));
                apply_trim_suffix(spec, column, value.trim())
            })
            .collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        data.push(cells);
    }

    debug!(
        source = %spec.name,
        sheet = %sheet_name,
        row_count = data.len(),
        "source workbook loaded"
    );
    Ok(Dataset::new(spec.name.clone(), columns, data))
}

fn resolve_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &Xlsx<R>,
    spec: &SourceSpec,
) -> Result<String> {
    match &spec.sheet {
        Some(name) => Ok(name.clone()),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ToolError::InvalidWorkbook(format!("no sheets in {}", spec.name))),
    }
}

fn read_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn apply_trim_suffix(spec: &SourceSpec, column: &str, value: &str) -> String {
    match &spec.trim_suffix {
        Some(trim) if trim.column == column => value
            .strip_suffix(&trim.suffix)
            .unwrap_or(value)
            .trim()
            .to_string(),
        _ => value.to_string(),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
