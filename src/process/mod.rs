// src/process/mod.rs

pub mod convert;
pub mod date_parser;
pub mod schema;
pub mod utils;

pub use convert::{Cell, ColumnSummary, FacultyRecord, FacultyTable};
pub use schema::{build_arrow_schema, faculty_columns, Column, ColumnKind, ColumnSource};
