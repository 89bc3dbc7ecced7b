//! In-memory workbook representation
//!
//! A workbook is an ordered list of sheets; each sheet is an ordered list
//! of rows and row 0 is the header. Cells keep the loose typing of the
//! source spreadsheet.

use serde::Serialize;

/// One spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    /// Numbers, including date serials
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Empty cell or text that is only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::Bool(_) => false,
        }
    }

    /// Display text; whole numbers render without a fractional part
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(f) => {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Trimmed text, `None` when blank
    pub fn trimmed(&self) -> Option<String> {
        let text = self.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Number(f)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Number(i as f64)
    }
}

impl From<i32> for Cell {
    fn from(i: i32) -> Self {
        Cell::Number(f64::from(i))
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

pub type Row = Vec<Cell>;

/// One sheet; by convention one strain
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Rows after the header
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Cell at `col` of `row`, `Empty` when the column is absent or out of range
pub fn cell_at(row: &[Cell], col: Option<usize>) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    col.and_then(|c| row.get(c)).unwrap_or(&EMPTY)
}

/// Build a row from heterogeneous literals: `row!["A1", 2, None::<&str>]`
#[macro_export]
macro_rules! row {
    ($($cell:expr),* $(,)?) => {
        vec![$($crate::sheet::Cell::from($cell)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text("  \t".into()).is_blank());
        assert!(!Cell::Text(" x ".into()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn test_text_of_whole_numbers() {
        assert_eq!(Cell::Number(12.0).text(), "12");
        assert_eq!(Cell::Number(1.5).text(), "1.5");
        assert_eq!(Cell::Text(" 001 ".into()).trimmed().as_deref(), Some("001"));
        assert_eq!(Cell::Empty.trimmed(), None);
    }

    #[test]
    fn test_cell_at_out_of_range() {
        let row = row!["A1"];
        assert_eq!(cell_at(&row, Some(0)), &Cell::Text("A1".into()));
        assert_eq!(cell_at(&row, Some(5)), &Cell::Empty);
        assert_eq!(cell_at(&row, None), &Cell::Empty);
    }

    #[test]
    fn test_data_rows_of_header_only_sheet() {
        let sheet = Sheet::new("S", vec![row!["笼号"]]);
        assert!(sheet.data_rows().is_empty());
        assert!(Sheet::default().data_rows().is_empty());
    }
}
