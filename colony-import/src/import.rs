//! Workbook import: one strain per sheet

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ImportResult;
use crate::normalize::{scan_rows, ColumnMap, ScanStats};
use crate::sheet::Sheet;
use crate::store::ColonyStore;

/// Outcome of importing one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub name: String,
    /// Set when the sheet had no data rows and produced no strain
    pub skipped: bool,
    pub strain_id: Option<Uuid>,
    pub stats: ScanStats,
}

/// Outcome of a whole import run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub sheets: Vec<SheetSummary>,
}

impl ImportSummary {
    pub fn strains_created(&self) -> usize {
        self.sheets.iter().filter(|s| s.strain_id.is_some()).count()
    }

    pub fn cages_created(&self) -> usize {
        self.sheets.iter().map(|s| s.stats.cages_created).sum()
    }

    pub fn mice_created(&self) -> usize {
        self.sheets.iter().map(|s| s.stats.mice_created).sum()
    }

    pub fn cage_conflicts(&self) -> usize {
        self.sheets.iter().map(|s| s.stats.cage_conflicts).sum()
    }
}

/// Import one sheet as a strain
///
/// Sheets with fewer than two rows are skipped without creating a strain.
/// Strain creation errors propagate.
pub async fn import_sheet<S: ColonyStore + ?Sized>(store: &S, sheet: &Sheet) -> ImportResult<SheetSummary> {
    info!("Processing strain sheet: {}", sheet.name);

    let Some(header) = sheet.header().filter(|_| sheet.rows.len() >= 2) else {
        info!("  Sheet {} skipped (no data rows)", sheet.name);
        return Ok(SheetSummary {
            name: sheet.name.clone(),
            skipped: true,
            strain_id: None,
            stats: ScanStats::default(),
        });
    };

    let strain_id = store.create_strain(&sheet.name).await?;

    let columns = ColumnMap::sniff(header);
    if columns.cage_number.is_none() {
        warn!("  Sheet {} has no cage-number column; no rows can be placed", sheet.name);
    }

    let stats = scan_rows(store, strain_id, sheet.data_rows(), &columns).await?;

    info!(
        "  Created {} cages, {} mouse records ({} cage conflicts, {} failed mouse rows)",
        stats.cages_created, stats.mice_created, stats.cage_conflicts, stats.mouse_failures
    );

    Ok(SheetSummary {
        name: sheet.name.clone(),
        skipped: false,
        strain_id: Some(strain_id),
        stats,
    })
}

/// Wipe existing colony data, then import every sheet in order
pub async fn import_workbook<S: ColonyStore + ?Sized>(store: &S, sheets: &[Sheet]) -> ImportResult<ImportSummary> {
    info!("Found {} strain sheets", sheets.len());

    info!("Clearing existing strains, cages and mice");
    store.wipe().await?;

    let mut summary = ImportSummary::default();
    for sheet in sheets {
        summary.sheets.push(import_sheet(store, sheet).await?);
    }

    info!("========== Import complete ==========");
    info!("Strains: {}", summary.strains_created());
    info!("Cages:   {}", summary.cages_created());
    info!("Mice:    {}", summary.mice_created());
    if summary.cage_conflicts() > 0 {
        warn!("Duplicate cage numbers skipped: {}", summary.cage_conflicts());
    }

    Ok(summary)
}
