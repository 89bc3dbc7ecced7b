//! colony-import - load a colony spreadsheet into the colony database
//!
//! Subcommands:
//! - `import <file>`: wipe strains/cages/mice and rebuild them from the workbook
//! - `analyze <file>`: print sheets, headers and leading rows without writing
//! - `seed`: reset to the default laboratory and demo accounts

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colony_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use colony_common::db::init_database;
use colony_import::analyze::{analyze_workbook, render_report, DEFAULT_PREVIEW_ROWS};
use colony_import::seed::{ensure_admin, seed_database};
use colony_import::workbook::read_workbook;
use colony_import::{import_workbook, SqliteColonyStore};
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "colony-import", version, about = "Mouse colony spreadsheet importer")]
struct Cli {
    /// Root folder holding colony.db (overrides COLONY_ROOT_FOLDER and config file)
    #[arg(long, global = true, env = "COLONY_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replace all strains, cages and mice with the workbook contents
    Import {
        /// Path to the .xlsx/.xls/.ods workbook
        file: PathBuf,
    },
    /// Describe the workbook without touching the database
    Analyze {
        file: PathBuf,

        /// Data rows to preview per sheet
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,
    },
    /// Reset the database to the default laboratory and accounts
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let toml_config = TomlConfig::load_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            toml_config
                .logging
                .level
                .parse::<Directive>()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        ))
        .init();

    info!(
        "Starting colony-import v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Command::Analyze { file, rows } = &cli.command {
        let sheets = read_workbook(file).with_context(|| format!("reading {}", file.display()))?;
        print!("{}", render_report(&analyze_workbook(&sheets, *rows)));
        return Ok(());
    }

    let root_folder = RootFolderResolver::new("colony-import")
        .with_cli_arg(cli.root_folder.clone())
        .with_toml(toml_config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path).await?;

    match cli.command {
        Command::Import { file } => {
            info!("Reading workbook: {}", file.display());
            let sheets = read_workbook(&file).with_context(|| format!("reading {}", file.display()))?;

            let store = SqliteColonyStore::new(pool.clone());
            let summary = import_workbook(&store, &sheets).await?;
            ensure_admin(&pool).await?;

            println!(
                "Imported {} strains, {} cages, {} mouse records",
                summary.strains_created(),
                summary.cages_created(),
                summary.mice_created()
            );
        }
        Command::Seed => {
            seed_database(&pool).await?;
            println!("Seeded default laboratory and accounts");
        }
        Command::Analyze { .. } => {}
    }

    pool.close().await;
    Ok(())
}
