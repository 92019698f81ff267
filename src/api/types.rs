use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::config::{ALLOWED_FORMATS, MAX_SCALE};
use crate::error::ConversionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Ogg,
    M4a,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Ogg => "ogg",
            OutputFormat::M4a => "m4a",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ogg" => Ok(OutputFormat::Ogg),
            "m4a" => Ok(OutputFormat::M4a),
            other => Err(ConversionError::InvalidRequest(format!(
                "output format {:?} is not one of {}",
                other,
                ALLOWED_FORMATS.join(", ")
            ))),
        }
    }
}

/// Everything needed for one submission. Immutable once built.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    filename: String,
    format: OutputFormat,
    pitch_scale: f64,
    tempo_scale: f64,
    audio: Vec<u8>,
}

impl ConversionRequest {
    pub fn new(
        filename: impl Into<String>,
        format: OutputFormat,
        pitch_scale: f64,
        tempo_scale: f64,
        audio: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            format,
            pitch_scale,
            tempo_scale,
            audio,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn pitch_scale(&self) -> f64 {
        self.pitch_scale
    }

    pub fn tempo_scale(&self) -> f64 {
        self.tempo_scale
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    /// Checks the request against what the backend will accept.
    pub fn validate(&self, max_bytes: u64) -> Result<(), ConversionError> {
        check_scale("pitch", self.pitch_scale)?;
        check_scale("tempo", self.tempo_scale)?;

        if self.audio.is_empty() {
            return Err(ConversionError::InvalidRequest(
                "audio payload is empty".to_string(),
            ));
        }
        if self.audio.len() as u64 > max_bytes {
            return Err(ConversionError::InvalidRequest(format!(
                "audio payload is {} bytes, limit is {}",
                self.audio.len(),
                max_bytes
            )));
        }
        Ok(())
    }
}

fn check_scale(name: &str, value: f64) -> Result<(), ConversionError> {
    if value.is_finite() && value > 0.0 && value <= MAX_SCALE {
        Ok(())
    } else {
        Err(ConversionError::InvalidRequest(format!(
            "{} scale must be in (0, {}], got {}",
            name, MAX_SCALE, value
        )))
    }
}

/// Opaque server-issued key for one in-flight conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        TaskHandle(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only description of a stored file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AudioMetadata {
    pub filename: String,
    pub content_type: String,
    pub expire_time: String,
    pub length: u64,
    #[serde(default)]
    pub file_id: Option<String>,
}

impl AudioMetadata {
    /// Parses `expire_time`. The backend sometimes omits the offset, in which
    /// case the timestamp is UTC.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.expire_time) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.expire_time, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
