// src/extract/fields.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// One attribute of an employee block, in output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Department,
    JobDepartment,
    JobType,
    JobTitle,
    JobRank,
    AnnualSalary,
    FirstHiredDate,
    AdjServiceDate,
    RankStartDate,
    ApptStartDate,
    ApptEndDate,
    ApptPercent,
}

pub const FIELD_COUNT: usize = 13;

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Name,
        Field::Department,
        Field::JobDepartment,
        Field::JobType,
        Field::JobTitle,
        Field::JobRank,
        Field::AnnualSalary,
        Field::FirstHiredDate,
        Field::AdjServiceDate,
        Field::RankStartDate,
        Field::ApptStartDate,
        Field::ApptEndDate,
        Field::ApptPercent,
    ];

    /// Column name used in the output table.
    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Department => "department",
            Field::JobDepartment => "job_department",
            Field::JobType => "job_type",
            Field::JobTitle => "job_title",
            Field::JobRank => "job_rank",
            Field::AnnualSalary => "annual_salary",
            Field::FirstHiredDate => "first_hired_date",
            Field::AdjServiceDate => "adj_service_date",
            Field::RankStartDate => "rank_start_date",
            Field::ApptStartDate => "appt_start_date",
            Field::ApptEndDate => "appt_end_date",
            Field::ApptPercent => "appt_percent",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whitespace allowed between a label's colon and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    /// Exactly one space.
    Space,
    /// One or more whitespace characters, line breaks included.
    Whitespace,
}

/// Where a captured value stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// First run of two or more whitespace characters (column padding).
    DoubleSpace,
    /// First line break.
    Newline,
}

/// How to find one field in a block.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub label: &'static str,
    pub gap: Gap,
    pub terminator: Terminator,
}

const fn spec(field: Field, label: &'static str, terminator: Terminator) -> FieldSpec {
    FieldSpec {
        field,
        label,
        gap: Gap::Space,
        terminator,
    }
}

/// Label table for the salary list layout.
///
/// Short values are padded to the next column with runs of spaces, so they end
/// at a double space. Job type, the hire/service/rank dates and the appointment
/// percent sit at the end of their line and end at the line break.
pub const FIELD_SPECS: [FieldSpec; FIELD_COUNT] = [
    spec(Field::Name, "Name", Terminator::DoubleSpace),
    spec(Field::Department, "Home Orgn", Terminator::DoubleSpace),
    spec(Field::JobDepartment, "Job Orgn", Terminator::DoubleSpace),
    spec(Field::JobType, "Job Type", Terminator::Newline),
    spec(Field::JobTitle, "Job Title", Terminator::DoubleSpace),
    spec(Field::JobRank, "Rank", Terminator::DoubleSpace),
    FieldSpec {
        field: Field::AnnualSalary,
        label: "Annual Salary Rate",
        gap: Gap::Whitespace,
        terminator: Terminator::DoubleSpace,
    },
    spec(Field::FirstHiredDate, "First Hired", Terminator::Newline),
    spec(Field::AdjServiceDate, "Adj Service Date", Terminator::Newline),
    spec(Field::RankStartDate, "Rank Effective Date", Terminator::Newline),
    spec(Field::ApptStartDate, "Appt Begin Date", Terminator::DoubleSpace),
    spec(Field::ApptEndDate, "Appt End Date", Terminator::DoubleSpace),
    spec(Field::ApptPercent, "Appt Percent", Terminator::Newline),
];

impl FieldSpec {
    /// Pattern capturing the shortest value after `<label>:`, `.` matching newlines.
    pub fn pattern(&self) -> String {
        let gap = match self.gap {
            Gap::Space => " ",
            Gap::Whitespace => r"\s+",
        };
        let terminator = match self.terminator {
            Terminator::DoubleSpace => r"\s{2,}",
            Terminator::Newline => r"\n",
        };
        format!(
            r"(?s){}:{}(.+?){}",
            regex::escape(self.label),
            gap,
            terminator
        )
    }
}

static FIELD_PATTERNS: Lazy<Vec<(Field, Regex)>> = Lazy::new(|| {
    FIELD_SPECS
        .iter()
        .map(|spec| {
            let re = Regex::new(&spec.pattern()).expect("field pattern must compile");
            (spec.field, re)
        })
        .collect()
});

/// Raw field values of one employee block.
///
/// Every field has a slot; a present value is trimmed and never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeRecord {
    values: [Option<String>; FIELD_COUNT],
}

impl EmployeeRecord {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Set a field; blank values are stored as absent.
    pub fn set(&mut self, field: Field, value: Option<&str>) {
        self.values[field.index()] = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
    }

    /// `(field, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&str>)> + '_ {
        Field::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// Fields with no value.
    pub fn missing(&self) -> Vec<Field> {
        self.iter()
            .filter(|(_, v)| v.is_none())
            .map(|(f, _)| f)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// True for the records produced by separator-only or boundary blocks.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Extract every labeled field from one block.
///
/// The leftmost match of each label wins; labels missing from the block leave
/// the field absent. A value containing a double space is cut at it.
pub fn extract_record(block: &str) -> EmployeeRecord {
    let mut record = EmployeeRecord::default();
    for (field, re) in FIELD_PATTERNS.iter() {
        let value = re
            .captures(block)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        record.set(*field, value);
    }
    record
}
