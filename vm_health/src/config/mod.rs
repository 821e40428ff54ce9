pub mod settings;

pub use settings::{AppConfig, ClientConfig, ResourceConfig};
