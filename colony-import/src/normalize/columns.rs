//! Header column sniffing
//!
//! Each field is located by substring match against the header labels.
//! The first header (left to right) containing any of the field's markers
//! wins; later duplicates are ignored.

use serde::Serialize;

use crate::sheet::Cell;

pub const CAGE_NUMBER_MARKERS: &[&str] = &["笼号", "笼"];
pub const GROUP_ID_MARKERS: &[&str] = &["总编号"];
pub const SEX_MARKERS: &[&str] = &["性别"];
pub const QUANTITY_MARKERS: &[&str] = &["数量"];
pub const GENOTYPE_MARKERS: &[&str] = &["鉴定"];
pub const DOB_MARKERS: &[&str] = &["出生"];
pub const MATING_DATE_MARKERS: &[&str] = &["配笼"];
pub const NOTES_MARKERS: &[&str] = &["备注"];

/// Column index of every field the importer reads; `None` when absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub cage_number: Option<usize>,
    pub group_id: Option<usize>,
    pub sex: Option<usize>,
    pub quantity: Option<usize>,
    pub genotype: Option<usize>,
    pub dob: Option<usize>,
    pub mating_date: Option<usize>,
    pub notes: Option<usize>,
}

impl ColumnMap {
    /// Sniff all columns from a header row
    pub fn sniff(headers: &[Cell]) -> Self {
        Self {
            cage_number: find_column(headers, CAGE_NUMBER_MARKERS),
            group_id: find_column(headers, GROUP_ID_MARKERS),
            sex: find_column(headers, SEX_MARKERS),
            quantity: find_column(headers, QUANTITY_MARKERS),
            genotype: find_column(headers, GENOTYPE_MARKERS),
            dob: find_column(headers, DOB_MARKERS),
            mating_date: find_column(headers, MATING_DATE_MARKERS),
            notes: find_column(headers, NOTES_MARKERS),
        }
    }
}

/// Index of the first non-empty header containing any marker
pub fn find_column(headers: &[Cell], markers: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        if header.is_blank() {
            return false;
        }
        let label = header.text();
        markers.iter().any(|marker| label.contains(marker))
    })
}
