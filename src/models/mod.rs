pub mod table;

pub use table::{CoefficientTable, ModelCollection, INTERCEPT_KEY};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal failures while loading the coefficient source.
///
/// Per-cell problems never surface here: a cell that fails numeric coercion
/// silently loads as `0.0`. Only an unusable source (missing, unreadable,
/// or structurally broken) is an error, and it aborts the run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("coefficient directory not found: {0}")]
    MissingSource(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse coefficient sheet {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("coefficient sheet {name} has no coefficient row")]
    EmptySheet { name: String },

    #[error("no coefficient sheets (*.csv) in {0}")]
    NoSheets(PathBuf),
}

/// Parse every `*.csv` sheet in `dir` into a [`ModelCollection`].
///
/// File stem = model name, header row = feature names, first data row =
/// coefficient values. The source is read once per process; the returned
/// collection is immutable and shared by reference afterwards.
pub fn load_models(dir: &Path) -> Result<ModelCollection, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingSource(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();

    let mut collection = ModelCollection::new();
    for path in &paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        collection.insert(load_sheet(path, &name)?);
    }

    if collection.is_empty() {
        return Err(LoadError::NoSheets(dir.to_path_buf()));
    }
    Ok(collection)
}

fn load_sheet(path: &Path, name: &str) -> Result<CoefficientTable, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    // The coefficients live in the first data row; anything below it is
    // ignored, matching the source workbook convention.
    let row = match reader.records().next() {
        Some(Ok(record)) => record,
        Some(Err(source)) => {
            return Err(LoadError::Csv {
                path: path.to_path_buf(),
                source,
            })
        }
        None => {
            return Err(LoadError::EmptySheet {
                name: name.to_string(),
            })
        }
    };

    let entries = headers
        .iter()
        .zip(row.iter())
        .map(|(feature, cell)| (feature.trim().to_string(), coerce_cell(cell)))
        .collect();

    Ok(CoefficientTable::new(name, entries))
}

/// Load-time cell coercion: any cell that does not parse as a finite number
/// becomes `0.0`, so a bad cell contributes nothing to any score.
fn coerce_cell(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
