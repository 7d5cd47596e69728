pub mod alert;
pub mod config;
pub mod config_loader;

pub use alert::{Alert, Quantity, Side, DEFAULT_QTY, DEFAULT_SYMBOL};
pub use config::{AppConfig, BybitConfig, ServerConfig};
pub use config_loader::ConfigLoader;
