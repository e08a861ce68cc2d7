// src/process/schema.rs

use crate::extract::Field;
use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use std::{fmt, sync::Arc};

/// Semantic type of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Float,
    Date,
}

impl ColumnKind {
    /// Target type for each extracted field.
    pub fn of(field: Field) -> ColumnKind {
        match field {
            Field::Name
            | Field::Department
            | Field::JobDepartment
            | Field::JobType
            | Field::JobTitle
            | Field::JobRank => ColumnKind::Text,
            Field::AnnualSalary | Field::ApptPercent => ColumnKind::Float,
            Field::FirstHiredDate
            | Field::AdjServiceDate
            | Field::RankStartDate
            | Field::ApptStartDate
            | Field::ApptEndDate => ColumnKind::Date,
        }
    }

    /// Map a column kind into an Arrow DataType.
    ///
    /// - Text  → Utf8
    /// - Float → Float64
    /// - Date  → Date32 (days since epoch, rendered `YYYY-MM-DD` in CSV)
    pub fn arrow_type(self) -> DataType {
        match self {
            ColumnKind::Text => DataType::Utf8,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Date => DataType::Date32,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnKind::Text => "string",
            ColumnKind::Float => "float64",
            ColumnKind::Date => "date",
        })
    }
}

/// Where a column's values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    Extracted(Field),
    EstimatedGender,
    DeptClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub source: ColumnSource,
}

pub const ESTIMATED_GENDER: &str = "estimated_gender";
pub const DEPT_CLASS: &str = "dept_class";

/// Ordered output columns: the thirteen extracted fields, then any enrichment columns.
pub fn faculty_columns(with_gender: bool, with_dept_class: bool) -> Vec<Column> {
    let mut cols: Vec<Column> = Field::ALL
        .iter()
        .map(|&f| Column {
            name: f.name(),
            kind: ColumnKind::of(f),
            source: ColumnSource::Extracted(f),
        })
        .collect();
    if with_gender {
        cols.push(Column {
            name: ESTIMATED_GENDER,
            kind: ColumnKind::Text,
            source: ColumnSource::EstimatedGender,
        });
    }
    if with_dept_class {
        cols.push(Column {
            name: DEPT_CLASS,
            kind: ColumnKind::Text,
            source: ColumnSource::DeptClass,
        });
    }
    cols
}

/// Build an ArrowSchema (inside an Arc) from a slice of `Column`s.
pub fn build_arrow_schema(cols: &[Column]) -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = cols
        .iter()
        .map(|col| ArrowField::new(col.name, col.kind.arrow_type(), /* nullable = */ true))
        .collect();

    Arc::new(ArrowSchema::new(fields))
}
