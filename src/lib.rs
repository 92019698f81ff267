pub mod api;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod poll;
pub mod transport;

pub use client::NightconvClient;
pub use config::ClientConfig;
pub use error::ConversionError;
pub use poll::ConversionStatus;
