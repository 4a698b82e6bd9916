pub mod config;
pub mod domain;
pub mod error;
pub mod lyris_client;
pub mod record_api;
pub mod telemetry;
pub mod xml;

pub use error::{LyrisError, LyrisResult};
pub use lyris_client::LyrisClient;
