pub mod types;
pub mod wire;

pub use types::{AudioMetadata, ConversionRequest, OutputFormat, TaskHandle};
pub use wire::{PollResult, SubmitReply};
