//! Data module - CSV loading, cleaning and filtering

mod filter;
mod loader;
mod processor;
mod record;

pub use filter::{apply_filters, FilterOptions, FilterSelection};
pub use loader::DataLoader;
pub use record::{CrashRecord, CrashTable, YearBin, UNKNOWN};
