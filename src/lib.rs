pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod models;
pub mod sync;
pub mod vcs;

pub use crate::config::Config;
pub use crate::core::generate::generate_ignore_file;
pub use crate::core::resolve::{Precedence, ResolveOptions, resolve};
pub use crate::error::{ConfigError, ResolveError, SyncError};
pub use crate::models::{IgnoreEntry, IgnoreKind};
pub use crate::sync::{SyncReport, SyncRequest, execute_offline_sync};
