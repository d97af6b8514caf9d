// ⚙️ Configuration - command line plus an optional TOML file
//
// Precedence: command-line flag > config file > built-in default.

use crate::error::{Result, WarehouseError};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CARS_FILE: &str = "data/usedcars.txt";
pub const DEFAULT_MAKERS_FILE: &str = "data/carmakers.txt";

// ============================================================================
// COMMAND LINE
// ============================================================================

#[derive(Debug, Clone, Parser)]
#[command(name = "car-warehouse")]
#[command(about = "Used car warehouse inventory", version)]
pub struct Cli {
    /// TOML file with [data] and [logging] tables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Car record file
    #[arg(long)]
    pub cars: Option<PathBuf>,

    /// Car maker file
    #[arg(long)]
    pub makers: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Values are taken raw and go through crate::validation
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show every car in the warehouse
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show the car makers and their models
    Makers,

    /// Search the inventory
    Search {
        #[command(subcommand)]
        by: SearchBy,
    },

    /// Add a new car
    Add(AddArgs),

    /// Delete a car by registration number
    Delete { registration: String },

    /// Edit the colours or the price of a car
    Edit {
        registration: String,

        #[command(subcommand)]
        field: EditField,
    },

    /// Browse the inventory in the terminal
    Ui,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SearchBy {
    /// By registration number
    Reg { registration: String },

    /// By maker number and model number (model 0 = ANY)
    Maker { maker: String, model: String },

    /// Cars no older than MAX_AGE years
    Age { max_age: String },

    /// Cars priced between MIN and MAX
    Price { min: String, max: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum EditField {
    /// New colours, e.g. "White,Blue"
    Colours { colours: String },

    Price { price: String },
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[arg(long = "reg")]
    pub registration: String,

    #[arg(long)]
    pub year: String,

    /// Up to three comma-separated colours
    #[arg(long)]
    pub colours: String,

    /// Maker number as listed by `makers`
    #[arg(long)]
    pub maker: String,

    /// Model number of the chosen maker
    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub price: String,
}

// ============================================================================
// CONFIG FILE
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub data: Option<DataConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub cars_file: Option<PathBuf>,
    pub makers_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| WarehouseError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| WarehouseError::Config(format!("TOML parsing error: {}", e)))
    }
}

// ============================================================================
// RESOLVED SETTINGS
// ============================================================================

/// Settings after merging flags, config file and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    pub cars_file: PathBuf,
    pub makers_file: PathBuf,
    pub verbose: bool,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        WarehouseConfig {
            cars_file: PathBuf::from(DEFAULT_CARS_FILE),
            makers_file: PathBuf::from(DEFAULT_MAKERS_FILE),
            verbose: false,
        }
    }
}

impl WarehouseConfig {
    /// Read `--config` if given, then apply the flags on top
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, file))
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> Self {
        let defaults = WarehouseConfig::default();
        let data = file.data.unwrap_or_default();
        let logging = file.logging.unwrap_or_default();

        WarehouseConfig {
            cars_file: cli
                .cars
                .clone()
                .or(data.cars_file)
                .unwrap_or(defaults.cars_file),
            makers_file: cli
                .makers
                .clone()
                .or(data.makers_file)
                .unwrap_or(defaults.makers_file),
            verbose: cli.verbose || logging.verbose.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("car-warehouse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let cli = parse(&["list"]);
        let config = WarehouseConfig::merge(&cli, FileConfig::default());
        assert_eq!(config, WarehouseConfig::default());
    }

    #[test]
    fn test_file_values_apply() {
        let file = FileConfig::from_toml_str(
            r#"
            [data]
            cars_file = "/srv/cars.txt"

            [logging]
            verbose = true
            "#,
        )
        .unwrap();
        let config = WarehouseConfig::merge(&parse(&[]), file);
        assert_eq!(config.cars_file, PathBuf::from("/srv/cars.txt"));
        assert_eq!(config.makers_file, PathBuf::from(DEFAULT_MAKERS_FILE));
        assert!(config.verbose);
    }

    #[test]
    fn test_flags_override_file() {
        let file = FileConfig::from_toml_str("[data]\ncars_file = \"/srv/cars.txt\"\n").unwrap();
        let cli = parse(&["--cars", "local.txt", "makers"]);
        let config = WarehouseConfig::merge(&cli, file);
        assert_eq!(config.cars_file, PathBuf::from("local.txt"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = FileConfig::from_toml_str("[data\n").unwrap_err();
        assert!(matches!(err, WarehouseError::Config(_)));
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = parse(&["search", "price", "5000", "10000"]);
        assert!(matches!(
            cli.command,
            Some(Command::Search { by: SearchBy::Price { ref min, ref max } }) if min == "5000" && max == "10000"
        ));

        let cli = parse(&[
            "add", "--reg", "AB12CD", "--year", "2015", "--colours", "Red", "--maker", "1",
            "--model", "1", "--price", "8000",
        ]);
        assert!(matches!(cli.command, Some(Command::Add(ref args)) if args.registration == "AB12CD"));
    }
}
