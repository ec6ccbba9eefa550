//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Configuration loading (config)
//! - The records-editor HTTP client (records_client)
//! - Tracing-backed notifier and navigator used by the CLI (console)

pub mod config;
pub mod console;
pub mod records_client;

pub use config::Config;
pub use console::{LogNavigator, LogNotifier};
pub use records_client::RecordsEditorClient;
