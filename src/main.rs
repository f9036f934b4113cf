use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ifc_sync::config::Config;
use ifc_sync::export::write_csv;
use ifc_sync::progress::Progress;
use ifc_sync::store::JsonModel;
use ifc_sync::workflow::{run_workflow, sync_sheet};

#[derive(Parser, Debug)]
#[command(name = "ifc-sync")]
#[command(about = "Extract IFC element data to an editable table and sync edits back")]
#[command(version)]
struct Args {
    /// Model file name inside the input folder (default: first model file found)
    file: Option<String>,

    /// Export the extracted table to CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Sync an edited sheet into an analysis model instead of extracting
    #[arg(long, value_name = "SHEET", requires = "model")]
    sync: Option<PathBuf>,

    /// Analysis model file that receives the synced edits
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Redirect input/output folders to ephemeral temp storage
    #[arg(long)]
    temp: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env().with_temp_storage(args.temp);

    if let (Some(sheet), Some(model)) = (&args.sync, &args.model) {
        let summary = sync_sheet::<JsonModel>(sheet, model, &mut Progress::none())?;
        println!(
            "Synced {} elements ({} properties written, {} rows skipped)",
            summary.elements_updated, summary.properties_written, summary.rows_skipped
        );
        return Ok(());
    }

    let mut report = |current: usize, total: usize, message: &str| {
        info!(current, total, "{}", message);
    };
    let mut progress = Progress::new(&mut report);

    let result = run_workflow::<JsonModel>(&config, args.file.as_deref(), &mut progress)?;

    if let Some(csv_path) = &args.csv {
        write_csv(&result.table, csv_path)?;
        println!("Exported table: {}", csv_path.display());
    }

    println!(
        "Extracted {} elements from {}",
        result.row_count,
        result.source_path.display()
    );
    println!("Analysis copy: {}", result.analysis_path.display());

    Ok(())
}
