//! Concrete adapter implementations for ports, plus text presentation.

#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
pub mod file_blob_adapter;
pub mod memory_blob_adapter;
pub mod file_config_adapter;
pub mod csv_adapter;
pub mod svg_chart_adapter;
pub mod text_table;
