use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;
use tracing::debug;

use crate::api::wire;
use crate::api::{AudioMetadata, ConversionRequest};
use crate::clock::{Sleeper, TokioSleeper};
use crate::config::ClientConfig;
use crate::error::ConversionError;
use crate::poll::{ConversionStatus, PollMachine};
use crate::transport::{HttpTransport, Transport};

pub const CONVERT_PATH: &str = "/api/convert/";
pub const CHECK_PATH: &str = "/api/convert/check";
pub const DESCRIBE_PATH: &str = "/api/media/describe";
pub const RECENTS_PATH: &str = "/api/media/recents";
pub const FILE_PATH: &str = "/api/media/file";

// Unreserved characters stay as-is; everything else is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode(component: &str) -> String {
    utf8_percent_encode(component, COMPONENT).to_string()
}

pub fn check_path(task_id: &str) -> String {
    format!("{}?task_id={}", CHECK_PATH, encode(task_id))
}

pub fn describe_path(file_id: &str) -> String {
    format!("{}/{}", DESCRIBE_PATH, encode(file_id))
}

pub fn file_path(file_id: &str, filename: &str) -> String {
    format!("{}/{}/{}", FILE_PATH, encode(file_id), encode(filename))
}

/// Client for the conversion service.
///
/// Holds no per-conversion state: concurrent `convert_audio` calls each run
/// their own poll loop with their own task handle and callback.
pub struct NightconvClient<T: Transport, S: Sleeper = TokioSleeper> {
    transport: T,
    sleeper: S,
    poll_interval: Duration,
    max_upload_bytes: u64,
}

impl NightconvClient<HttpTransport, TokioSleeper> {
    pub fn new(config: &ClientConfig) -> Result<Self, ConversionError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_parts(transport, TokioSleeper, config))
    }

    /// Absolute download link for a converted file.
    pub fn file_url(&self, file_id: &str, filename: &str) -> String {
        format!("{}{}", self.transport.base_url(), file_path(file_id, filename))
    }
}

impl<T: Transport, S: Sleeper> NightconvClient<T, S> {
    pub fn with_parts(transport: T, sleeper: S, config: &ClientConfig) -> Self {
        Self {
            transport,
            sleeper,
            poll_interval: config.poll_interval,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submits `request` and polls until the server reports a result.
    ///
    /// `on_status` runs once per still-pending check. There is no timeout and
    /// no cancellation; dropping the returned future is the only way out.
    pub async fn convert_audio<F>(
        &self,
        request: &ConversionRequest,
        mut on_status: F,
    ) -> Result<String, ConversionError>
    where
        F: FnMut(ConversionStatus) + Send,
    {
        request.validate(self.max_upload_bytes)?;

        let mut machine = PollMachine::new(self.poll_interval);
        let reply = match self.transport.submit(CONVERT_PATH, request).await {
            Ok(body) => wire::parse_submit(&body),
            Err(e) => Err(e),
        };
        machine.on_submit(reply);

        while let Some(task) = machine.pending_task() {
            let path = check_path(task.as_str());
            let result = match self.transport.get_text(&path).await {
                Ok(body) => wire::parse_check(&body),
                Err(e) => Err(e),
            };

            if let Some(status) = machine.on_check(result) {
                on_status(status);
                self.sleeper.sleep(machine.interval()).await;
            }
        }

        // on_submit leaves the machine Polling or terminal, and the loop above
        // only exits once it is terminal.
        machine
            .outcome()
            .unwrap_or_else(|| unreachable!("poll loop exited in state {:?}", machine.state()))
    }

    pub async fn get_audio_info(&self, file_id: &str) -> Result<AudioMetadata, ConversionError> {
        let body = self.transport.get_text(&describe_path(file_id)).await?;
        wire::parse_metadata(&body)
    }

    pub async fn get_recent_files(&self) -> Result<Vec<String>, ConversionError> {
        let body = self.transport.get_text(RECENTS_PATH).await?;
        let recents = wire::parse_recents(&body)?;
        debug!("{} recent files", recents.len());
        Ok(recents)
    }

    /// Fetches the converted audio itself.
    pub async fn download_file(&self, file_id: &str, filename: &str) -> Result<Vec<u8>, ConversionError> {
        self.transport.get_bytes(&file_path(file_id, filename)).await
    }
}
