//! Read-only workbook inspection
//!
//! Shows what the importer would see: sheet names, row counts, headers, a
//! few leading data rows and the sniffed column map.

use std::fmt::Write as _;

use serde::Serialize;

use crate::normalize::ColumnMap;
use crate::sheet::{Row, Sheet};

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct SheetAnalysis {
    pub name: String,
    pub row_count: usize,
    pub header: Option<Row>,
    pub preview: Vec<Row>,
    pub columns: ColumnMap,
}

pub fn analyze_sheet(sheet: &Sheet, preview_rows: usize) -> SheetAnalysis {
    SheetAnalysis {
        name: sheet.name.clone(),
        row_count: sheet.rows.len(),
        header: sheet.header().cloned(),
        preview: sheet.data_rows().iter().take(preview_rows).cloned().collect(),
        columns: sheet.header().map(|h| ColumnMap::sniff(h)).unwrap_or_default(),
    }
}

pub fn analyze_workbook(sheets: &[Sheet], preview_rows: usize) -> Vec<SheetAnalysis> {
    sheets.iter().map(|s| analyze_sheet(s, preview_rows)).collect()
}

/// Human-readable report
pub fn render_report(analyses: &[SheetAnalysis]) -> String {
    let mut out = String::new();
    let names: Vec<&str> = analyses.iter().map(|a| a.name.as_str()).collect();

    let _ = writeln!(out, "=== Workbook analysis ===");
    let _ = writeln!(out, "Sheets: {:?}", names);

    for (index, analysis) in analyses.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "=== Sheet {}: {} ===", index + 1, analysis.name);
        let _ = writeln!(out, "Rows: {}", analysis.row_count);
        if let Some(header) = &analysis.header {
            let _ = writeln!(out, "Header: {}", render_row(header));
            let _ = writeln!(out, "Columns: {}", render_columns(&analysis.columns));
        }
        if !analysis.preview.is_empty() {
            let _ = writeln!(out, "First {} rows:", analysis.preview.len());
            for (i, row) in analysis.preview.iter().enumerate() {
                let _ = writeln!(out, "  {}: {}", i + 1, render_row(row));
            }
        }
    }

    out
}

fn render_row(row: &Row) -> String {
    serde_json::to_string(row).unwrap_or_default()
}

fn render_columns(columns: &ColumnMap) -> String {
    let fields = [
        ("cage", columns.cage_number),
        ("group", columns.group_id),
        ("sex", columns.sex),
        ("quantity", columns.quantity),
        ("genotype", columns.genotype),
        ("dob", columns.dob),
        ("mating", columns.mating_date),
        ("notes", columns.notes),
    ];
    fields
        .iter()
        .map(|(name, col)| match col {
            Some(c) => format!("{}={}", name, c),
            None => format!("{}=-", name),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_analysis_limits_preview() {
        let mut rows = vec![row!["笼号", "性别"]];
        for i in 0..10 {
            rows.push(row![format!("C{}", i).as_str(), "♂"]);
        }
        let sheet = Sheet::new("NAT10", rows);

        let analysis = analyze_sheet(&sheet, 3);
        assert_eq!(analysis.row_count, 11);
        assert_eq!(analysis.preview.len(), 3);
        assert_eq!(analysis.columns.cage_number, Some(0));
        assert_eq!(analysis.columns.sex, Some(1));
    }

    #[test]
    fn test_report_mentions_every_sheet() {
        let sheets = vec![
            Sheet::new("NAT10", vec![row!["笼号"], row!["A1"]]),
            Sheet::new("Empty", vec![]),
        ];
        let report = render_report(&analyze_workbook(&sheets, DEFAULT_PREVIEW_ROWS));

        assert!(report.contains("Sheet 1: NAT10"));
        assert!(report.contains("Sheet 2: Empty"));
        assert!(report.contains("Rows: 0"));
        assert!(report.contains("cage=0"));
        assert!(report.contains("sex=-"));
    }
}
