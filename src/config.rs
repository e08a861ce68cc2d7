// src/config.rs

use crate::export::OutputFormats;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

/// Everything one run needs. Every path is optional; which combinations are
/// valid is decided when the input is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Salary list, `.pdf` or `.txt`.
    pub input: Option<PathBuf>,
    /// Where extracted PDF text is saved.
    pub output_txt: Option<PathBuf>,
    /// CSV with `name` and `gender` columns.
    pub gender_csv: Option<PathBuf>,
    /// JSON/YAML map of job department code → classification.
    #[serde(alias = "dept_class_json")]
    pub dept_class_map: Option<PathBuf>,
    /// Directory for the exported tables; defaults to the input's directory.
    pub output_dir: Option<PathBuf>,
    pub formats: OutputFormats,
}

impl PipelineConfig {
    /// Load a YAML config file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening config {:?}", path))?;
        serde_yaml::from_reader(file).with_context(|| format!("parsing config {:?}", path))
    }

    /// Overlay the paths set in `other` onto `self`.
    pub fn merge_paths(mut self, other: PipelineConfig) -> Self {
        self.input = other.input.or(self.input);
        self.output_txt = other.output_txt.or(self.output_txt);
        self.gender_csv = other.gender_csv.or(self.gender_csv);
        self.dept_class_map = other.dept_class_map.or(self.dept_class_map);
        self.output_dir = other.output_dir.or(self.output_dir);
        self
    }

    /// Output directory for `input`: the configured one, else the input's parent.
    pub fn output_dir_for(&self, input: &Path) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_yaml_with_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("run.yaml");
        fs::write(
            &path,
            "input: data/salaries.txt\ndept_class_json: data/depts.json\nformats:\n  parquet: true\n",
        )?;

        let cfg = PipelineConfig::from_yaml_file(&path)?;
        assert_eq!(cfg.input, Some(PathBuf::from("data/salaries.txt")));
        assert_eq!(cfg.dept_class_map, Some(PathBuf::from("data/depts.json")));
        assert_eq!(cfg.gender_csv, None);
        assert_eq!(
            cfg.formats,
            OutputFormats {
                csv: true,
                feather: true,
                parquet: true
            }
        );
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("run.yaml");
        fs::write(&path, "inptu: typo.txt\n")?;
        assert!(PipelineConfig::from_yaml_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = PipelineConfig {
            input: Some("a.txt".into()),
            gender_csv: Some("g.csv".into()),
            ..Default::default()
        };
        let overrides = PipelineConfig {
            input: Some("b.txt".into()),
            ..Default::default()
        };
        let merged = base.merge_paths(overrides);
        assert_eq!(merged.input, Some(PathBuf::from("b.txt")));
        assert_eq!(merged.gender_csv, Some(PathBuf::from("g.csv")));
    }

    #[test]
    fn output_dir_defaults_to_input_parent() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.output_dir_for(Path::new("data/s.txt")), PathBuf::from("data"));
        assert_eq!(cfg.output_dir_for(Path::new("s.txt")), PathBuf::from("."));

        let cfg = PipelineConfig {
            output_dir: Some("out".into()),
            ..Default::default()
        };
        assert_eq!(cfg.output_dir_for(Path::new("data/s.txt")), PathBuf::from("out"));
    }
}
