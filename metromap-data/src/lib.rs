//! Loading transit datasets from JSON files on disk.
//!
//! Responsibilities:
//! - Read prepared datasets and raw route-relation dumps.
//! - Validate record ids, way lengths and coordinates on the way in.
//! - Provide the capability-based file helpers used by the CLI.
//!
//! Boundaries:
//! - Do not encode rendering rules (live in `metromap-core`).
//! - No network access; acquisition happens upstream.

#![forbid(unsafe_code)]

use std::io::BufReader;

use camino::Utf8Path;
use serde::de::DeserializeOwned;

use metromap_core::Dataset;

mod error;
mod fs;
mod raw;

pub use error::{DatasetError, RecordKind};
pub use fs::{create_utf8_file, file_is_file, open_utf8_file};

use raw::{RawDataset, RawRelationDump};

/// Layout of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Lines already resolved to way counts and stop lists.
    #[default]
    Dataset,
    /// Route masters and route relations, resolved while loading.
    Relations,
}

impl InputFormat {
    /// Load `path` in this format.
    ///
    /// # Errors
    /// See [`load_dataset`] and [`load_relation_dump`].
    pub fn load(self, path: &Utf8Path) -> Result<Dataset, DatasetError> {
        match self {
            Self::Dataset => load_dataset(path),
            Self::Relations => load_relation_dump(path),
        }
    }
}

/// Load a prepared dataset.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use metromap_data::load_dataset;
///
/// # fn main() -> Result<(), metromap_data::DatasetError> {
/// let dataset = load_dataset(Utf8Path::new("paris-data.json"))?;
/// println!("{} lines", dataset.lines.len());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns [`DatasetError`] when the file cannot be read or parsed, or when
/// a record fails validation.
pub fn load_dataset(path: &Utf8Path) -> Result<Dataset, DatasetError> {
    read_json::<RawDataset>(path)?.into_dataset()
}

/// Load a relation dump and assemble one line per route master.
///
/// # Errors
/// As [`load_dataset`], plus [`DatasetError::MissingRelation`] when a route
/// master lists a relation the dump does not contain.
pub fn load_relation_dump(path: &Utf8Path) -> Result<Dataset, DatasetError> {
    read_json::<RawRelationDump>(path)?.into_dataset()
}

fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, DatasetError> {
    let file = open_utf8_file(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
