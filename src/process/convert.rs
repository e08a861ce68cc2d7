// src/process/convert.rs

use crate::enrich::{DeptClassLookup, GenderLookup};
use crate::extract::{EmployeeRecord, Field};
use crate::process::schema::{build_arrow_schema, faculty_columns, Column, ColumnKind, ColumnSource};
use crate::process::{date_parser, utils};
use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Date32Builder, Float64Builder, StringBuilder},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One employee with every column coerced to its target type.
#[derive(Debug, Clone, PartialEq)]
pub struct FacultyRecord {
    pub name: String,
    pub department: String,
    pub job_department: String,
    pub job_type: String,
    pub job_title: String,
    pub job_rank: String,
    pub annual_salary: Option<f64>,
    pub first_hired_date: Option<NaiveDate>,
    pub adj_service_date: Option<NaiveDate>,
    pub rank_start_date: Option<NaiveDate>,
    pub appt_start_date: Option<NaiveDate>,
    pub appt_end_date: Option<NaiveDate>,
    pub appt_percent: Option<f64>,
    pub estimated_gender: Option<String>,
    pub dept_class: Option<String>,
}

/// A typed value borrowed from a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(Option<&'a str>),
    Float(Option<f64>),
    Date(Option<NaiveDate>),
}

impl<'a> Cell<'a> {
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Text(v) => v.is_none(),
            Cell::Float(v) => v.is_none(),
            Cell::Date(v) => v.is_none(),
        }
    }

    fn as_text(self) -> Option<&'a str> {
        match self {
            Cell::Text(v) => v,
            _ => None,
        }
    }

    fn as_float(self) -> Option<f64> {
        match self {
            Cell::Float(v) => v,
            _ => None,
        }
    }

    fn as_date(self) -> Option<NaiveDate> {
        match self {
            Cell::Date(v) => v,
            _ => None,
        }
    }
}

fn float_cell(rec: &EmployeeRecord, field: Field) -> Option<f64> {
    let raw = rec.get(field)?;
    let parsed = utils::parse_amount(raw);
    if parsed.is_none() {
        warn!(field = %field, value = raw, "unparsable number, storing null");
    }
    parsed
}

fn date_cell(rec: &EmployeeRecord, field: Field) -> Option<NaiveDate> {
    let raw = rec.get(field)?;
    let parsed = date_parser::parse_list_date(raw);
    if parsed.is_none() {
        debug!(field = %field, value = raw, "unparsable date, storing null");
    }
    parsed
}

impl FacultyRecord {
    /// Coerce a complete record; `None` when any field is absent.
    pub fn from_employee(rec: &EmployeeRecord) -> Option<FacultyRecord> {
        if !rec.is_complete() {
            return None;
        }
        let text = |f: Field| rec.get(f).map(str::to_string);
        Some(FacultyRecord {
            name: text(Field::Name)?,
            department: text(Field::Department)?,
            job_department: text(Field::JobDepartment)?,
            job_type: text(Field::JobType)?,
            job_title: text(Field::JobTitle)?,
            job_rank: text(Field::JobRank)?,
            annual_salary: float_cell(rec, Field::AnnualSalary),
            first_hired_date: date_cell(rec, Field::FirstHiredDate),
            adj_service_date: date_cell(rec, Field::AdjServiceDate),
            rank_start_date: date_cell(rec, Field::RankStartDate),
            appt_start_date: date_cell(rec, Field::ApptStartDate),
            appt_end_date: date_cell(rec, Field::ApptEndDate),
            appt_percent: float_cell(rec, Field::ApptPercent),
            estimated_gender: None,
            dept_class: None,
        })
    }

    pub fn cell(&self, source: ColumnSource) -> Cell<'_> {
        match source {
            ColumnSource::Extracted(field) => match field {
                Field::Name => Cell::Text(Some(&self.name)),
                Field::Department => Cell::Text(Some(&self.department)),
                Field::JobDepartment => Cell::Text(Some(&self.job_department)),
                Field::JobType => Cell::Text(Some(&self.job_type)),
                Field::JobTitle => Cell::Text(Some(&self.job_title)),
                Field::JobRank => Cell::Text(Some(&self.job_rank)),
                Field::AnnualSalary => Cell::Float(self.annual_salary),
                Field::FirstHiredDate => Cell::Date(self.first_hired_date),
                Field::AdjServiceDate => Cell::Date(self.adj_service_date),
                Field::RankStartDate => Cell::Date(self.rank_start_date),
                Field::ApptStartDate => Cell::Date(self.appt_start_date),
                Field::ApptEndDate => Cell::Date(self.appt_end_date),
                Field::ApptPercent => Cell::Float(self.appt_percent),
            },
            ColumnSource::EstimatedGender => Cell::Text(self.estimated_gender.as_deref()),
            ColumnSource::DeptClass => Cell::Text(self.dept_class.as_deref()),
        }
    }
}

/// Per-column overview printed after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub non_null: usize,
}

/// Typed faculty rows plus which enrichment columns they carry.
#[derive(Debug, Clone, Default)]
pub struct FacultyTable {
    records: Vec<FacultyRecord>,
    with_gender: bool,
    with_dept_class: bool,
}

impl FacultyTable {
    /// Drop incomplete records and coerce the rest, keeping document order.
    pub fn from_records(records: &[EmployeeRecord]) -> FacultyTable {
        let mut rows = Vec::with_capacity(records.len());
        let mut empty = 0usize;
        let mut incomplete = 0usize;

        for rec in records {
            if rec.is_empty() {
                empty += 1;
                continue;
            }
            match FacultyRecord::from_employee(rec) {
                Some(row) => rows.push(row),
                None => {
                    incomplete += 1;
                    debug!(
                        name = rec.get(Field::Name).unwrap_or("<unknown>"),
                        missing = ?rec.missing(),
                        "dropping incomplete record"
                    );
                }
            }
        }

        info!(
            kept = rows.len(),
            incomplete,
            empty,
            "typed faculty records"
        );
        FacultyTable {
            records: rows,
            with_gender: false,
            with_dept_class: false,
        }
    }

    /// Type `records` and apply whichever lookups are supplied.
    pub fn build(
        records: &[EmployeeRecord],
        gender: Option<&GenderLookup>,
        dept_classes: Option<&DeptClassLookup>,
    ) -> FacultyTable {
        let mut table = FacultyTable::from_records(records);
        if let Some(lookup) = gender {
            table.attach_gender(lookup);
        }
        if let Some(lookup) = dept_classes {
            table.attach_dept_class(lookup);
        }
        table
    }

    /// Fill `estimated_gender` from the first name of each row.
    pub fn attach_gender(&mut self, lookup: &GenderLookup) {
        let mut matched = 0usize;
        for row in &mut self.records {
            row.estimated_gender = lookup.estimate(&row.name).map(str::to_string);
            matched += usize::from(row.estimated_gender.is_some());
        }
        self.with_gender = true;
        info!(matched, rows = self.records.len(), "attached estimated_gender");
    }

    /// Fill `dept_class` from each row's job department code.
    pub fn attach_dept_class(&mut self, lookup: &DeptClassLookup) {
        let mut matched = 0usize;
        for row in &mut self.records {
            row.dept_class = lookup.classify(&row.job_department);
            matched += usize::from(row.dept_class.is_some());
        }
        self.with_dept_class = true;
        info!(matched, rows = self.records.len(), "attached dept_class");
    }

    pub fn records(&self) -> &[FacultyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> Vec<Column> {
        faculty_columns(self.with_gender, self.with_dept_class)
    }

    pub fn column_summaries(&self) -> Vec<ColumnSummary> {
        self.columns()
            .into_iter()
            .map(|col| ColumnSummary {
                name: col.name,
                kind: col.kind,
                non_null: self
                    .records
                    .iter()
                    .filter(|r| !r.cell(col.source).is_null())
                    .count(),
            })
            .collect()
    }

    /// Convert the table into one Arrow batch with the table's column order.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let cols = self.columns();
        let n = self.records.len();
        let mut out: Vec<ArrayRef> = Vec::with_capacity(cols.len());

        for col in &cols {
            let cells = self.records.iter().map(|r| r.cell(col.source));
            let arr: ArrayRef = match col.kind {
                ColumnKind::Text => {
                    let mut b = StringBuilder::with_capacity(n, n * 16);
                    for cell in cells {
                        b.append_option(cell.as_text());
                    }
                    Arc::new(b.finish())
                }
                ColumnKind::Float => {
                    let mut b = Float64Builder::with_capacity(n);
                    for cell in cells {
                        b.append_option(cell.as_float());
                    }
                    Arc::new(b.finish())
                }
                ColumnKind::Date => {
                    let mut b = Date32Builder::with_capacity(n);
                    for cell in cells {
                        b.append_option(cell.as_date().map(date_parser::to_date32));
                    }
                    Arc::new(b.finish())
                }
            };
            out.push(arr);
        }

        RecordBatch::try_new(build_arrow_schema(&cols), out)
            .context("building faculty record batch")
    }
}
