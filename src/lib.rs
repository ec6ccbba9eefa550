pub mod domain;
pub mod infrastructure;
pub mod models;
pub mod modules;
pub mod services;

// Short paths for the most used pieces
pub use infrastructure::config;
pub use modules::quick_marc;
