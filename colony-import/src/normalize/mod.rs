//! Colony import normalizer
//!
//! workbook -> per-sheet header sniff -> per-row forward-fill scan ->
//! cage / mouse creates against a [`ColonyStore`](crate::store::ColonyStore).

pub mod columns;
pub mod parsers;
pub mod scan;

pub use columns::{find_column, ColumnMap};
pub use parsers::{parse_cage_number, parse_date, parse_quantity, parse_sex, parse_text, serial_to_date};
pub use scan::{scan_rows, CageContext, RowPlan, ScanStats};
