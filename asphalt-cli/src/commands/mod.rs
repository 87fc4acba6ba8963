//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cache`] - Cache management (stats, clear, sweep, remove)
//! - [`config`] - Configuration management (path, show, init)
//! - [`diagnostics`] - Endpoint status and setup summary for bug reports
//! - [`edit`] - Submit a smoothness correction for one road
//! - [`load`] - Show a region from the cache
//! - [`refresh`] - Fetch a region from Overpass
//! - [`regions`] - List the selectable regions

pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod edit;
pub mod load;
pub mod refresh;
pub mod regions;
