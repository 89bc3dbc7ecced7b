//! colony-import library
//!
//! Converts a colony spreadsheet (one worksheet per strain) into strain,
//! cage and mouse records. The binary in `main.rs` wires it to the SQLite
//! database; tests drive it through in-memory stores.

pub mod analyze;
pub mod error;
pub mod import;
pub mod normalize;
pub mod seed;
pub mod sheet;
pub mod store;
pub mod workbook;

pub use error::{ImportError, ImportResult};
pub use import::{import_sheet, import_workbook, ImportSummary, SheetSummary};
pub use sheet::{Cell, Row, Sheet};
pub use store::{ColonyStore, SqliteColonyStore};
