// src/pipeline.rs

use crate::{
    config::PipelineConfig,
    enrich::{DeptClassLookup, GenderLookup},
    export,
    extract::parse_document,
    process::FacultyTable,
    source::InputSource,
};
use anyhow::Result;
use std::{path::PathBuf, time::Instant};
use tracing::info;

/// Outcome of one run.
#[derive(Debug)]
pub struct RunReport {
    pub table: FacultyTable,
    /// Records extracted from the document, degenerate blocks included.
    pub extracted: usize,
    pub outputs: Vec<PathBuf>,
}

/// Parse, type, enrich and export one salary list.
///
/// Configuration and lookup files are checked before the document is read;
/// any failure aborts the run without leaving partial output files.
#[tracing::instrument(level = "info", skip(config))]
pub fn run(config: &PipelineConfig) -> Result<RunReport> {
    let start = Instant::now();

    // ─── 1) resolve input ────────────────────────────────────────────
    let source = InputSource::resolve(config.input.as_deref(), config.output_txt.as_deref())?;
    let stem = source.stem()?;
    let out_dir = config.output_dir_for(source.input_path());

    // ─── 2) load lookups ─────────────────────────────────────────────
    let gender = config
        .gender_csv
        .as_ref()
        .map(GenderLookup::load)
        .transpose()?;
    let dept_classes = config
        .dept_class_map
        .as_ref()
        .map(DeptClassLookup::load)
        .transpose()?;

    // ─── 3) parse + type ─────────────────────────────────────────────
    let raw = source.load_text()?;
    let records = parse_document(&raw);
    let table = FacultyTable::build(&records, gender.as_ref(), dept_classes.as_ref());

    // ─── 4) export ───────────────────────────────────────────────────
    let outputs = export::write_table(&table, &out_dir, &stem, &config.formats)?;

    info!(
        rows = table.len(),
        extracted = records.len(),
        elapsed = ?start.elapsed(),
        "run complete"
    );
    Ok(RunReport {
        table,
        extracted: records.len(),
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Field;
    use crate::test_support::{init_test_logging, FULL_BLOCK};
    use arrow::array::{Array, Float64Array, StringArray};
    use arrow::ipc::reader::FileReader;
    use chrono::NaiveDate;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn second_block() -> String {
        FULL_BLOCK.replace("Doe, Jane Q", "Roe, Rick")
    }

    /// Two employee blocks, each closed by a separator line as in the salary list.
    fn salary_list(second: &str) -> String {
        let sep = "-".repeat(80);
        format!(
            "Unclassified Personnel List                Page 1\n{}{}\n{}{}\n",
            FULL_BLOCK, sep, second, sep
        )
    }

    fn two_block_document() -> String {
        salary_list(&second_block().replace("Rank: Professor      ", ""))
    }

    #[test]
    fn second_block_lacks_only_job_rank() {
        let records = parse_document(&two_block_document());
        assert_eq!(records.len(), 3);
        assert!(records[0].is_complete());
        assert_eq!(records[1].missing(), vec![Field::JobRank]);
        assert!(records[2].is_empty());
    }

    #[test]
    fn restoring_job_rank_keeps_both_blocks() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("salaries.txt");
        fs::write(&input, salary_list(&second_block()))?;

        let config = PipelineConfig {
            input: Some(input),
            ..Default::default()
        };
        let report = run(&config)?;
        assert_eq!(report.table.len(), 2);
        assert_eq!(report.table.records()[1].name, "Roe, Rick");
        assert_eq!(report.table.records()[1].appt_percent, Some(100.0));
        Ok(())
    }

    #[test]
    fn end_to_end_keeps_only_complete_block() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("salaries.txt");
        fs::write(&input, two_block_document())?;
        let genders = dir.path().join("names.csv");
        fs::write(&genders, "name,gender\nJane,F\nRick,M\n")?;
        let depts = dir.path().join("depts.json");
        fs::write(&depts, r#"{"BIOL": "stem"}"#)?;

        let config = PipelineConfig {
            input: Some(input),
            gender_csv: Some(genders),
            dept_class_map: Some(depts),
            ..Default::default()
        };
        let report = run(&config)?;

        assert_eq!(report.extracted, 3);
        assert_eq!(report.table.len(), 1);
        let row = &report.table.records()[0];
        assert_eq!(row.name, "Doe, Jane Q");
        assert_eq!(row.job_rank, "Professor");
        assert_eq!(row.annual_salary, Some(98765.0));
        assert_eq!(row.appt_start_date, NaiveDate::from_ymd_opt(2023, 8, 16));
        assert_eq!(row.estimated_gender.as_deref(), Some("F"));
        assert_eq!(row.dept_class.as_deref(), Some("STEM"));

        assert_eq!(
            report.outputs,
            vec![dir.path().join("salaries.csv"), dir.path().join("salaries.feather")]
        );
        let csv = fs::read_to_string(dir.path().join("salaries.csv"))?;
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.lines().next().unwrap_or_default().ends_with(",appt_percent,estimated_gender,dept_class"));

        let reader = FileReader::try_new(File::open(dir.path().join("salaries.feather"))?, None)?;
        let batch = reader.into_iter().next().expect("one batch")?;
        assert_eq!(batch.num_rows(), 1);
        let salary = batch
            .column_by_name("annual_salary")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(salary.value(0), 98765.0);
        let class = batch
            .column_by_name("dept_class")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(class.value(0), "STEM");
        Ok(())
    }

    #[test]
    fn separate_output_dir_is_created() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("fy24.txt");
        fs::write(&input, two_block_document())?;
        let out = dir.path().join("nested/out");

        let config = PipelineConfig {
            input: Some(input),
            output_dir: Some(out.clone()),
            ..Default::default()
        };
        let report = run(&config)?;
        assert!(out.join("fy24.csv").exists());
        assert!(out.join("fy24.feather").exists());
        assert_eq!(report.table.columns().len(), 13);
        Ok(())
    }

    #[test]
    fn bad_lookup_aborts_before_writing() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("salaries.txt");
        fs::write(&input, two_block_document())?;
        let depts = dir.path().join("depts.json");
        fs::write(&depts, "{not json")?;

        let config = PipelineConfig {
            input: Some(input),
            dept_class_map: Some(depts),
            ..Default::default()
        };
        assert!(run(&config).is_err());
        assert!(!dir.path().join("salaries.csv").exists());
        assert!(!dir.path().join("salaries.feather").exists());
        Ok(())
    }

    #[test]
    fn missing_input_is_a_configuration_error() {
        assert!(run(&PipelineConfig::default()).is_err());
    }
}
