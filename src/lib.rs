// Car Warehouse - Core Library
// Exposes the stores, entities and validation for the CLI, the TUI and tests

pub mod error;
pub mod validation;
pub mod entities;
pub mod codec;
pub mod store;
pub mod catalog;
pub mod config;
pub mod logger;
pub mod warehouse;

// Re-export commonly used types
pub use error::{Result, WarehouseError};
pub use entities::{
    Car, Colours, COLOUR_SLOTS,
    CarMaker, ModelChoice, ANY_MODEL,
};
pub use store::{CarId, CarRecordStore, LoadStatus};
pub use catalog::CarMakerCatalog;
pub use config::{Cli, Command, WarehouseConfig};
pub use warehouse::Warehouse;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
