// src/export/mod.rs

use crate::process::FacultyTable;
use anyhow::{anyhow, Context, Result};
use arrow::{csv::WriterBuilder, ipc::writer::FileWriter, record_batch::RecordBatch};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use serde::Deserialize;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

fn default_true() -> bool {
    true
}

/// Which files a run writes. CSV and Feather by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OutputFormats {
    #[serde(default = "default_true")]
    pub csv: bool,
    #[serde(default = "default_true")]
    pub feather: bool,
    #[serde(default)]
    pub parquet: bool,
}

impl Default for OutputFormats {
    fn default() -> Self {
        Self {
            csv: true,
            feather: true,
            parquet: false,
        }
    }
}

/// A fully written hidden temp file waiting to be renamed onto `path`.
#[derive(Debug)]
pub struct StagedFile {
    tmp_path: PathBuf,
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the temp file into place.
    pub fn commit(self) -> Result<PathBuf> {
        fs::rename(&self.tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&self.tmp_path);
            anyhow!("renaming {:?} -> {:?}: {}", self.tmp_path, self.path, e)
        })?;
        Ok(self.path)
    }

    /// Remove the temp file, leaving `path` untouched.
    pub fn discard(self) {
        let _ = fs::remove_file(&self.tmp_path);
    }
}

/// Write the content for `path` into a hidden sibling temp file.
///
/// On failure the temp file is removed; `path` is never touched here.
pub fn stage<F>(path: &Path, write: F) -> Result<StagedFile>
where
    F: FnOnce(File) -> Result<()>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("output path {:?} has no file name", path))?
        .to_string_lossy();
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let tmp = File::create(&tmp_path).with_context(|| format!("creating {:?}", tmp_path))?;
    if let Err(e) = write(tmp) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.context(format!("writing {:?}", path)));
    }
    Ok(StagedFile {
        tmp_path,
        path: path.to_path_buf(),
    })
}

/// Write a file via a hidden sibling temp file, renamed over `path` on success.
///
/// On failure the temp file is removed and `path` is left untouched.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    stage(path, write)?.commit().map(|_| ())
}

/// Serializes one batch into an open file.
pub type Encoder = fn(&RecordBatch, File) -> Result<()>;

/// Row-oriented CSV with a header row.
pub fn encode_csv(batch: &RecordBatch, file: File) -> Result<()> {
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch).context("encoding CSV")?;
    let mut file = writer.into_inner();
    file.flush()?;
    Ok(())
}

/// Arrow IPC file, readable as Feather v2.
pub fn encode_feather(batch: &RecordBatch, file: File) -> Result<()> {
    let mut writer = FileWriter::try_new(file, &batch.schema()).context("creating IPC writer")?;
    writer.write(batch).context("writing IPC batch")?;
    writer.finish().context("finishing IPC file")?;
    Ok(())
}

pub fn encode_parquet(batch: &RecordBatch, file: File) -> Result<()> {
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Parquet writer")?;
    writer.write(batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    write_atomic(path, |file| encode_csv(batch, file))
}

pub fn write_feather(batch: &RecordBatch, path: &Path) -> Result<()> {
    write_atomic(path, |file| encode_feather(batch, file))
}

pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    write_atomic(path, |file| encode_parquet(batch, file))
}

impl OutputFormats {
    /// `(extension, encoder)` for every enabled format, in write order.
    pub fn encoders(&self) -> Vec<(&'static str, Encoder)> {
        let all: [(bool, &'static str, Encoder); 3] = [
            (self.csv, "csv", encode_csv),
            (self.feather, "feather", encode_feather),
            (self.parquet, "parquet", encode_parquet),
        ];
        all.into_iter()
            .filter(|(enabled, _, _)| *enabled)
            .map(|(_, ext, enc)| (ext, enc))
            .collect()
    }
}

/// Stage every `<out_dir>/<stem>.<ext>` and rename them into place only once all
/// encoders have succeeded. A failing encoder leaves no output of this run behind.
fn write_outputs(
    batch: &RecordBatch,
    out_dir: &Path,
    stem: &str,
    encoders: &[(&str, Encoder)],
) -> Result<Vec<PathBuf>> {
    let mut staged: Vec<StagedFile> = Vec::with_capacity(encoders.len());
    for (ext, encode) in encoders {
        let path = out_dir.join(format!("{}.{}", stem, ext));
        match stage(&path, |file| encode(batch, file)) {
            Ok(file) => staged.push(file),
            Err(e) => {
                staged.into_iter().for_each(StagedFile::discard);
                return Err(e);
            }
        }
    }

    let mut written = Vec::with_capacity(staged.len());
    let mut pending = staged.into_iter();
    while let Some(file) = pending.next() {
        match file.commit() {
            Ok(path) => {
                debug!(path = %path.display(), "wrote output");
                written.push(path);
            }
            Err(e) => {
                pending.for_each(StagedFile::discard);
                return Err(e);
            }
        }
    }
    Ok(written)
}

/// Write `table` as `<out_dir>/<stem>.{csv,feather,parquet}` per `formats`.
///
/// Returns the paths written, in that order.
#[tracing::instrument(level = "info", skip(table, out_dir), fields(out_dir = %out_dir.as_ref().display(), rows = table.len()))]
pub fn write_table<P: AsRef<Path>>(
    table: &FacultyTable,
    out_dir: P,
    stem: &str,
    formats: &OutputFormats,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).with_context(|| format!("creating output dir {:?}", out_dir))?;

    let batch = table.to_record_batch()?;
    let written = write_outputs(&batch, out_dir, stem, &formats.encoders())?;

    info!(files = written.len(), "export complete");
    Ok(written)
}
