// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;

use car_warehouse::{logger, Cli, Command, Warehouse, WarehouseConfig};

fn main() {
    if let Err(e) = run() {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = WarehouseConfig::from_cli(&cli).context("Failed to load configuration")?;
    logger::init_cli_logger(config.verbose);

    tracing::debug!("Cars file: {}", config.cars_file.display());
    tracing::debug!("Makers file: {}", config.makers_file.display());

    let mut warehouse = Warehouse::open(config)?;

    match &cli.command {
        None | Some(Command::Ui) => run_ui_mode(&warehouse)?,
        Some(command) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            warehouse.run(command, &mut out)?;
        }
    }

    warehouse.save().context("Failed to save the car file")?;

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(warehouse: &Warehouse) -> Result<()> {
    tracing::info!(
        "Browsing {} car(s) from {} maker(s)",
        warehouse.cars().len(),
        warehouse.makers().len()
    );

    let mut app = ui::App::new(
        warehouse.cars().clone(),
        warehouse.makers().clone(),
        warehouse.current_year(),
    );
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_warehouse: &Warehouse) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a subcommand, e.g. car-warehouse list");
    std::process::exit(1);
}
