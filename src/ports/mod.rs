//! Port traits implemented by [`crate::adapters`].

pub mod blob_port;
pub mod config_port;
pub mod report_port;
