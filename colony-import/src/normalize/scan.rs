//! Row-scan state machine
//!
//! Spreadsheets group several mouse rows under one cage by leaving the
//! cage-number cell blank on continuation rows. The scan carries a
//! [`CageContext`] from row to row to rebuild that grouping.

use colony_common::db::{NewCage, NewMouse};
use colony_common::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::columns::ColumnMap;
use super::parsers::{parse_cage_number, parse_date, parse_quantity, parse_sex, parse_text};
use crate::error::ImportError;
use crate::sheet::{cell_at, Cell};
use crate::store::ColonyStore;

/// Cage that continuation rows attach to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CageContext {
    /// No cage established yet, or the last cage row conflicted
    #[default]
    NoCage,
    InCage(Uuid),
}

/// What one data row asks for, independent of scan state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowPlan {
    /// Present when the row carries a cage number
    pub cage: Option<NewCage>,
    /// Present when sex, quantity or genotype holds data
    pub mouse: Option<NewMouse>,
}

impl RowPlan {
    /// Interpret a row against the sniffed columns
    ///
    /// The notes cell belongs to the cage on rows that open a cage and to
    /// the mouse on every other row.
    pub fn from_row(row: &[Cell], columns: &ColumnMap) -> Self {
        let cage_number = parse_cage_number(cell_at(row, columns.cage_number));

        let sex_cell = cell_at(row, columns.sex);
        let quantity_cell = cell_at(row, columns.quantity);
        let genotype_cell = cell_at(row, columns.genotype);
        let notes = parse_text(cell_at(row, columns.notes));

        let has_mouse_data =
            !(sex_cell.is_blank() && quantity_cell.is_blank() && genotype_cell.is_blank());

        let mouse = has_mouse_data.then(|| NewMouse {
            sex: parse_sex(sex_cell),
            quantity: parse_quantity(quantity_cell),
            genotype: parse_text(genotype_cell),
            dob: parse_date(cell_at(row, columns.dob)),
            notes: if cage_number.is_none() { notes.clone() } else { None },
        });

        let cage = cage_number.map(|cage_number| NewCage {
            cage_number,
            group_id: parse_text(cell_at(row, columns.group_id)),
            mating_date: parse_date(cell_at(row, columns.mating_date)),
            notes,
        });

        Self { cage, mouse }
    }
}

/// Per-sheet scan counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub cages_created: usize,
    pub mice_created: usize,
    pub cage_conflicts: usize,
    pub orphan_rows: usize,
    pub blank_rows: usize,
    pub mouse_failures: usize,
}

/// Scan data rows of one sheet, emitting creates against `store`
///
/// Cage conflicts and mouse insert failures are counted and logged; any
/// other cage error is returned since it means the store is unusable.
pub async fn scan_rows<S: ColonyStore + ?Sized>(
    store: &S,
    strain_id: Uuid,
    rows: &[Vec<Cell>],
    columns: &ColumnMap,
) -> Result<ScanStats, ImportError> {
    let mut stats = ScanStats::default();
    let mut context = CageContext::NoCage;

    for (index, row) in rows.iter().enumerate() {
        // 1-based sheet row number, header included
        let row_number = index + 2;

        if row.is_empty() {
            continue;
        }

        let plan = RowPlan::from_row(row, columns);

        if let Some(cage) = &plan.cage {
            match store.create_cage(strain_id, cage).await {
                Ok(cage_id) => {
                    stats.cages_created += 1;
                    context = CageContext::InCage(cage_id);
                }
                Err(Error::Conflict(_)) => {
                    warn!(
                        "Row {}: cage {} already exists, skipping it and its rows",
                        row_number, cage.cage_number
                    );
                    stats.cage_conflicts += 1;
                    context = CageContext::NoCage;
                    continue;
                }
                Err(e) => return Err(ImportError::Store(e)),
            }
        }

        let CageContext::InCage(cage_id) = context else {
            debug!("Row {}: no cage context, dropped", row_number);
            stats.orphan_rows += 1;
            continue;
        };

        let Some(mouse) = &plan.mouse else {
            stats.blank_rows += 1;
            continue;
        };

        match store.create_mouse(cage_id, mouse).await {
            Ok(_) => stats.mice_created += 1,
            Err(e) => {
                debug!("Row {}: mouse insert failed: {}", row_number, e);
                stats.mouse_failures += 1;
            }
        }
    }

    Ok(stats)
}
