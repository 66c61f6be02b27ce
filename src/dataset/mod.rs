use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{FilterError, Result};
use crate::filter::{filter_blocks, FilterStats};
use crate::index::AlignmentIndex;

/// File names of a dataset directory. The defaults are the upstream layout:
/// `align.nt` holding the alignment links, `left.rdf` / `right.rdf` the two
/// graph dumps, and filtered outputs written as `left2.rdf` / `right2.rdf`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetLayout {
    #[serde(default = "default_align")]
    pub align: String,
    #[serde(default = "default_left")]
    pub left: String,
    #[serde(default = "default_right")]
    pub right: String,
    /// Inserted between the input file stem and its extension to name the
    /// output file.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

fn default_align() -> String {
    "align.nt".to_string()
}
fn default_left() -> String {
    "left.rdf".to_string()
}
fn default_right() -> String {
    "right.rdf".to_string()
}
fn default_output_suffix() -> String {
    "2".to_string()
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            align: default_align(),
            left: default_left(),
            right: default_right(),
            output_suffix: default_output_suffix(),
        }
    }
}

impl DatasetLayout {
    /// Load a layout from a YAML or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file: {}", path.display()))?;

        let layout = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        Ok(layout)
    }

    /// Use `layout.yaml` / `layout.json` from the dataset directory when
    /// present, the upstream defaults otherwise.
    pub fn for_dataset_dir(dir: &Path) -> anyhow::Result<Self> {
        for name in ["layout.yaml", "layout.yml", "layout.json"] {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }
        Ok(Self::default())
    }

    /// Output path for one side's input file: stem + suffix + extension.
    pub fn output_path(&self, dir: &Path, input_name: &str) -> PathBuf {
        let input = Path::new(input_name);
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(input_name);
        match input.extension().and_then(|s| s.to_str()) {
            Some(ext) => dir.join(format!("{}{}.{}", stem, self.output_suffix, ext)),
            None => dir.join(format!("{}{}", stem, self.output_suffix)),
        }
    }
}

/// Outcome of filtering one side of the dataset.
#[derive(Debug, Clone)]
pub struct SideReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: FilterStats,
}

/// Outcome of a whole run: index sizes plus both sides' filter stats.
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub left_uris: usize,
    pub right_uris: usize,
    pub left: SideReport,
    pub right: SideReport,
}

/// Filter one dataset directory: build the alignment index once, then
/// stream each side's dump through the block filter against its set.
///
/// All three inputs are checked up front so a missing file is reported
/// before any work starts. Each output is written to a temp file in the
/// dataset directory and renamed onto the final path only after the pass
/// succeeds, so a failed run never leaves a half-written output.
pub fn filter_dataset(dir: &Path, layout: &DatasetLayout) -> Result<DatasetReport> {
    let align_path = dir.join(&layout.align);
    let left_path = dir.join(&layout.left);
    let right_path = dir.join(&layout.right);

    for path in [&align_path, &left_path, &right_path] {
        if !path.exists() {
            return Err(FilterError::DatasetNotFound { path: path.clone() });
        }
    }

    let index = AlignmentIndex::from_ntriples_file(&align_path)?;
    index.log_summary();

    let left = filter_side(dir, layout, &layout.left, index.left())?;
    let right = filter_side(dir, layout, &layout.right, index.right())?;

    Ok(DatasetReport {
        left_uris: index.left().len(),
        right_uris: index.right().len(),
        left,
        right,
    })
}

fn filter_side(
    dir: &Path,
    layout: &DatasetLayout,
    input_name: &str,
    used: &HashSet<String>,
) -> Result<SideReport> {
    let input = dir.join(input_name);
    let output = layout.output_path(dir, input_name);

    let file = File::open(&input).map_err(|e| FilterError::io("open", &input, e))?;
    let reader = BufReader::new(file);

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| FilterError::io("create", dir, e))?;
    let stats = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let stats = filter_blocks(reader, &mut writer, used, &input, &output)?;
        writer
            .flush()
            .map_err(|e| FilterError::io("write", &output, e))?;
        stats
    };

    tmp.persist(&output)
        .map_err(|e| FilterError::io("rename", &output, e.error))?;

    info!(
        "{} -> {}: kept {} of {} blocks",
        input.display(),
        output.display(),
        stats.blocks_kept,
        stats.blocks_kept + stats.blocks_dropped
    );

    Ok(SideReport {
        input,
        output,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_matches_upstream_names() {
        let layout = DatasetLayout::default();
        assert_eq!(layout.align, "align.nt");
        assert_eq!(layout.left, "left.rdf");
        assert_eq!(layout.right, "right.rdf");
        assert_eq!(layout.output_suffix, "2");
    }

    #[test]
    fn test_output_path_inserts_suffix_before_extension() {
        let layout = DatasetLayout::default();
        let out = layout.output_path(Path::new("datasets/d1"), "left.rdf");
        assert_eq!(out, PathBuf::from("datasets/d1/left2.rdf"));
    }

    #[test]
    fn test_output_path_without_extension() {
        let layout = DatasetLayout::default();
        let out = layout.output_path(Path::new("d"), "left");
        assert_eq!(out, PathBuf::from("d/left2"));
    }

    #[test]
    fn test_layout_from_yaml_with_partial_fields() {
        let layout: DatasetLayout = serde_yaml::from_str("left: ontology-a.rdf\n").unwrap();
        assert_eq!(layout.left, "ontology-a.rdf");
        assert_eq!(layout.right, "right.rdf");
        assert_eq!(layout.output_suffix, "2");
    }

    #[test]
    fn test_missing_input_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = filter_dataset(dir.path(), &DatasetLayout::default()).unwrap_err();
        match err {
            FilterError::DatasetNotFound { path } => {
                assert!(path.ends_with("align.nt"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
