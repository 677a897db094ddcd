pub mod csv;

pub use crate::error::ExportError;
pub use csv::export_csv;
