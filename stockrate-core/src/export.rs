//! CSV persistence of successful records.
//!
//! Writes `Rate,Symbol` tables. Failures are reported and returned as a
//! status value; they never touch the in-memory table.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::StockRecord;

pub const HEADER: [&str; 2] = ["Rate", "Symbol"];

/// Default directory for saved tables, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("permission denied: unable to save symbols to {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("IO error while saving symbols to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write CSV to {}: {message}", path.display())]
    Csv { path: PathBuf, message: String },
}

impl PersistError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            PersistError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            PersistError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    fn from_csv(path: &Path, source: csv::Error) -> Self {
        let message = source.to_string();
        match source.into_kind() {
            csv::ErrorKind::Io(e) => Self::from_io(path, e),
            _ => PersistError::Csv {
                path: path.to_path_buf(),
                message,
            },
        }
    }
}

/// What happened to a persist request.
#[derive(Debug)]
pub enum PersistStatus {
    Written { path: PathBuf, rows: usize },
    /// Nothing to write.
    Skipped,
    Failed(PersistError),
}

impl PersistStatus {
    pub fn is_written(&self) -> bool {
        matches!(self, PersistStatus::Written { .. })
    }
}

/// Render records as CSV text with the `Rate,Symbol` header.
pub fn records_to_csv(records: &[StockRecord]) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HEADER)?;
    for r in records {
        wtr.write_record([r.rate.to_string().as_str(), r.symbol.as_str()])?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

fn try_persist(path: &Path, records: &[StockRecord]) -> Result<(), PersistError> {
    let text = records_to_csv(records).map_err(|e| PersistError::from_csv(path, e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PersistError::from_io(path, e))?;
    }
    std::fs::write(path, text).map_err(|e| PersistError::from_io(path, e))
}

/// Write `records` to `path`, creating the parent directory.
pub fn persist(path: &Path, records: &[StockRecord]) -> PersistStatus {
    if records.is_empty() {
        log::info!("No successful symbols to save.");
        return PersistStatus::Skipped;
    }

    match try_persist(path, records) {
        Ok(()) => {
            log::info!("Successful symbols saved to {}.", path.display());
            PersistStatus::Written {
                path: path.to_path_buf(),
                rows: records.len(),
            }
        }
        Err(e) => {
            log::error!("{e}");
            PersistStatus::Failed(e)
        }
    }
}

/// Save under `output_dir/filename`.
pub fn save_successful_symbols(
    output_dir: &Path,
    filename: &str,
    records: &[StockRecord],
) -> PersistStatus {
    persist(&output_dir.join(filename), records)
}
