//! Test helpers for composing on-disk render inputs.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Two lines sharing an interchange whose name is spelled differently on
/// each line.
pub(super) const CROSSING_DATASET: &str = r##"{
  "network_name": "Métro de Paris",
  "lines": [
    {"name": "Métro 1", "ref": "1", "color": "#FFCD00",
     "ways": {"10": 1, "11": 1}, "stops": [1, 2, 3]},
    {"name": "Métro 4", "ref": "4", "color": "#C04191",
     "ways": {"20": 1}, "stops": [4, 6]}
  ],
  "ways": {
    "10": {"id": 10, "nd": [1, 2]},
    "11": {"id": 11, "nd": [2, 3]},
    "20": {"id": 20, "nd": [4, 6]}
  },
  "nodes": {
    "1": {"id": 1, "lat": 48.85, "lon": 2.30, "tag": {"name": "Ouest"}},
    "2": {"id": 2, "lat": 48.85, "lon": 2.35, "tag": {"name": "Réaumur Sébastopol"}},
    "3": {"id": 3, "lat": 48.85, "lon": 2.40, "tag": {"name": "Est"}},
    "4": {"id": 4, "lat": 48.90, "lon": 2.35, "tag": {"name": "Nord"}},
    "6": {"id": 6, "lat": 48.85, "lon": 2.35, "tag": {"name": "Réaumur - Sébastopol"}}
  }
}"##;

/// Temporary directory holding render inputs.
pub(super) struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub(super) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub(super) fn root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().to_path_buf()).expect("utf-8 workspace")
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root().join(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}
