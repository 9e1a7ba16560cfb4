//! CLI commands for data export

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::clock::{Clock, SystemClock};
use crate::error::{BackofficeError, BackofficeResult};
use crate::export::{
    default_json_file_name, export_json, export_sheet, export_workbook, Sheet,
    DEFAULT_WORKBOOK_NAME,
};
use crate::storage::Storage;

/// Which entity to put in a single-sheet workbook
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SheetArg {
    Clients,
    Orders,
    Purchases,
}

impl From<SheetArg> for Sheet {
    fn from(arg: SheetArg) -> Self {
        match arg {
            SheetArg::Clients => Sheet::Clients,
            SheetArg::Orders => Sheet::ServiceOrders,
            SheetArg::Purchases => Sheet::Purchases,
        }
    }
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export everything as a JSON backup (re-importable)
    Json {
        /// Output file (default: backup-erp-YYYY-MM-DD.json)
        output: Option<PathBuf>,
    },

    /// Export to an Excel workbook, one sheet per entity
    Xlsx {
        /// Output file (default: dados-erp.xlsx, or the sheet's own name)
        output: Option<PathBuf>,

        /// Export only one entity type
        #[arg(short, long, value_enum)]
        sheet: Option<SheetArg>,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> BackofficeResult<()> {
    let clock = SystemClock;

    match cmd {
        ExportCommands::Json { output } => {
            let output =
                output.unwrap_or_else(|| PathBuf::from(default_json_file_name(clock.today())));

            let file = File::create(&output).map_err(|e| {
                BackofficeError::Export(format!(
                    "Failed to create file {}: {}",
                    output.display(),
                    e
                ))
            })?;
            let mut writer = BufWriter::new(file);

            let counts = export_json(storage, &clock, &mut writer)?;
            println!("Exported {} to: {}", counts, output.display());
        }

        ExportCommands::Xlsx { output, sheet } => match sheet {
            Some(sheet) => {
                let sheet = Sheet::from(sheet);
                let output =
                    output.unwrap_or_else(|| PathBuf::from(sheet.default_file_name()));
                let rows = export_sheet(storage, &clock, sheet, &output)?;
                println!(
                    "Exported {} row(s) of {} to: {}",
                    rows,
                    sheet.name(),
                    output.display()
                );
            }
            None => {
                let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK_NAME));
                let counts = export_workbook(storage, &clock, &output)?;
                println!("Exported {} to: {}", counts, output.display());
            }
        },
    }

    Ok(())
}
