// src/source.rs

use crate::export::write_atomic;
use anyhow::{anyhow, bail, Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

/// Where the salary-list text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Pre-extracted text.
    Text(PathBuf),
    /// A PDF whose extracted text is also saved to `text_out`.
    Pdf { pdf: PathBuf, text_out: PathBuf },
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

impl InputSource {
    /// Accept a `.txt` input, or a `.pdf` input together with a text output path.
    pub fn resolve(input: Option<&Path>, output_txt: Option<&Path>) -> Result<Self> {
        match (input, output_txt) {
            (Some(pdf), Some(text_out)) if has_extension(pdf, "pdf") => Ok(InputSource::Pdf {
                pdf: pdf.to_path_buf(),
                text_out: text_out.to_path_buf(),
            }),
            (Some(txt), _) if has_extension(txt, "txt") => Ok(InputSource::Text(txt.to_path_buf())),
            _ => bail!(
                "either an input .pdf and output .txt, or an input .txt must be provided (got input {:?}, output txt {:?})",
                input,
                output_txt
            ),
        }
    }

    /// The document the user pointed at; its stem names the outputs.
    pub fn input_path(&self) -> &Path {
        match self {
            InputSource::Text(path) => path,
            InputSource::Pdf { pdf, .. } => pdf,
        }
    }

    pub fn stem(&self) -> Result<String> {
        self.input_path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("input {:?} has no file stem", self.input_path()))
    }

    /// Read the whole document as text, extracting and saving it first for PDFs.
    #[tracing::instrument(level = "info", skip(self), fields(input = %self.input_path().display()))]
    pub fn load_text(&self) -> Result<String> {
        match self {
            InputSource::Text(path) => {
                fs::read_to_string(path).with_context(|| format!("reading {:?}", path))
            }
            InputSource::Pdf { pdf, text_out } => {
                let text = pdf_extract::extract_text(pdf)
                    .map_err(|e| anyhow!("failed to extract PDF text from {:?}: {}", pdf, e))?;
                write_atomic(text_out, |mut file| {
                    file.write_all(text.as_bytes())?;
                    Ok(())
                })?;
                info!(chars = text.len(), text_out = %text_out.display(), "saved extracted text");
                Ok(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn resolves_text_input() -> Result<()> {
        let src = InputSource::resolve(Some(Path::new("data/salaries.txt")), None)?;
        assert_eq!(src, InputSource::Text(PathBuf::from("data/salaries.txt")));
        assert_eq!(src.stem()?, "salaries");

        // an output path alongside a text input is ignored
        let src = InputSource::resolve(
            Some(Path::new("salaries.TXT")),
            Some(Path::new("other.txt")),
        )?;
        assert_eq!(src, InputSource::Text(PathBuf::from("salaries.TXT")));
        Ok(())
    }

    #[test]
    fn resolves_pdf_with_text_output() -> Result<()> {
        let src = InputSource::resolve(
            Some(Path::new("in/salaries.pdf")),
            Some(Path::new("out/salaries.txt")),
        )?;
        assert_eq!(
            src,
            InputSource::Pdf {
                pdf: PathBuf::from("in/salaries.pdf"),
                text_out: PathBuf::from("out/salaries.txt"),
            }
        );
        assert_eq!(src.stem()?, "salaries");
        Ok(())
    }

    #[test]
    fn rejects_incomplete_configuration() {
        assert!(InputSource::resolve(None, None).is_err());
        assert!(InputSource::resolve(None, Some(Path::new("out.txt"))).is_err());
        assert!(InputSource::resolve(Some(Path::new("salaries.pdf")), None).is_err());
        assert!(InputSource::resolve(Some(Path::new("salaries.csv")), None).is_err());
    }

    #[test]
    fn loads_text_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("salaries.txt");
        fs::write(&path, "Name: Doe, Jane  \n")?;
        let text = InputSource::Text(path).load_text()?;
        assert_eq!(text, "Name: Doe, Jane  \n");
        Ok(())
    }

    #[test]
    fn unreadable_pdf_fails_without_saving_text() -> Result<()> {
        let dir = tempdir()?;
        let pdf = dir.path().join("x.pdf");
        fs::write(&pdf, b"this is not a PDF document at all")?;
        let text_out = dir.path().join("x.txt");

        let src = InputSource::resolve(Some(pdf.as_path()), Some(text_out.as_path()))?;
        let err = src.load_text().expect_err("garbage bytes must not extract");
        assert!(format!("{err:#}").contains("x.pdf"), "error should name the file: {err:#}");
        assert!(!text_out.exists());
        assert!(!dir.path().join(".x.txt.tmp").exists());
        Ok(())
    }

    #[test]
    fn missing_text_file_is_an_error() {
        let src = InputSource::Text(PathBuf::from("/definitely/not/here.txt"));
        assert!(src.load_text().is_err());
    }
}
