// src/enrich/mod.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::HashMap, fs::File, io::BufReader, path::Path};
use tracing::{debug, info};

/// First name from a `"Last, First Middle"` name: the first token of the part
/// between the first and second `", "` (so `"Doe, Jane, Jr"` → `"Jane"`).
pub fn first_name(full_name: &str) -> Option<&str> {
    let (_, rest) = full_name.split_once(", ")?;
    rest.split(", ").next()?.split_whitespace().next()
}

/// One row of the names/genders table. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct GenderRow {
    name: String,
    gender: Option<String>,
}

/// First name → estimated gender label.
#[derive(Debug, Clone, Default)]
pub struct GenderLookup {
    by_first_name: HashMap<String, String>,
}

impl GenderLookup {
    /// Load a CSV with `name` and `gender` header columns.
    ///
    /// The first row for a name wins; rows with an empty gender are skipped.
    #[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("opening gender table {:?}", path))?;

        let mut by_first_name = HashMap::new();
        for (idx, result) in rdr.deserialize::<GenderRow>().enumerate() {
            let row = result
                .with_context(|| format!("CSV parse error in {:?} at record {}", path, idx))?;
            if let Some(gender) = row.gender.filter(|g| !g.is_empty()) {
                by_first_name.entry(row.name).or_insert(gender);
            }
        }

        info!(names = by_first_name.len(), "loaded gender table");
        Ok(Self { by_first_name })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut by_first_name = HashMap::new();
        for (k, v) in pairs {
            by_first_name.entry(k.into()).or_insert_with(|| v.into());
        }
        Self { by_first_name }
    }

    pub fn len(&self) -> usize {
        self.by_first_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_first_name.is_empty()
    }

    pub fn get(&self, first_name: &str) -> Option<&str> {
        self.by_first_name.get(first_name).map(String::as_str)
    }

    /// Estimated gender for a full `"Last, First ..."` name; `None` without a comma or match.
    pub fn estimate(&self, full_name: &str) -> Option<&str> {
        let first = first_name(full_name);
        if first.is_none() {
            debug!(name = full_name, "no first name derivable");
        }
        first.and_then(|f| self.get(f))
    }
}

/// Job-department code → department classification.
#[derive(Debug, Clone, Default)]
pub struct DeptClassLookup {
    by_code: HashMap<String, String>,
}

impl DeptClassLookup {
    /// Load a JSON object (or YAML mapping for `.yaml`/`.yml`) of code → label strings.
    #[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening department class map {:?}", path))?;
        let reader = BufReader::new(file);

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let by_code: HashMap<String, String> = if is_yaml {
            serde_yaml::from_reader(reader)
                .with_context(|| format!("parsing department class map {:?}", path))?
        } else {
            serde_json::from_reader(reader)
                .with_context(|| format!("parsing department class map {:?}", path))?
        };

        info!(codes = by_code.len(), "loaded department class map");
        Ok(Self { by_code })
    }

    pub fn from_map(by_code: HashMap<String, String>) -> Self {
        Self { by_code }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Upper-cased class for an exact code match.
    pub fn classify(&self, job_department: &str) -> Option<String> {
        self.by_code.get(job_department).map(|c| c.to_uppercase())
    }
}
