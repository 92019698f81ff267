//! Server reply shapes.
//!
//! Each endpoint may only answer with the shapes enumerated here; anything
//! else is rejected at this boundary with the raw body attached.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::types::{AudioMetadata, TaskHandle};
use crate::error::ConversionError;

/// Immediate answer to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitReply {
    Accepted(TaskHandle),
    Rejected(String),
}

/// Answer to one status check.
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult {
    Complete { file_id: String },
    Pending { position: u64 },
    Failed { detail: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSubmit {
    Accepted { task_id: String },
    Rejected { detail: Value },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCheck {
    Status {
        complete: bool,
        #[serde(default)]
        position: Option<u64>,
        #[serde(default)]
        file_id: Option<String>,
    },
    Failed {
        detail: Value,
    },
}

#[derive(Deserialize)]
struct Detail {
    detail: Value,
}

fn unexpected(body: &str) -> ConversionError {
    ConversionError::UnexpectedResponse(body.to_string())
}

// Struct shapes would also match JSON arrays positionally, so only objects
// are let through.
fn object(body: &str) -> Result<Value, ConversionError> {
    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        _ => Err(unexpected(body)),
    }
}

fn shape<T: DeserializeOwned>(value: Value, body: &str) -> Result<T, ConversionError> {
    serde_json::from_value(value).map_err(|_| unexpected(body))
}

// Validation failures carry a list in `detail`; keep it as JSON text.
fn detail_text(detail: Value) -> String {
    match detail {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn server_error(value: Value, body: &str) -> ConversionError {
    match serde_json::from_value::<Detail>(value) {
        Ok(d) => ConversionError::ServerError(detail_text(d.detail)),
        Err(_) => unexpected(body),
    }
}

pub fn parse_submit(body: &str) -> Result<SubmitReply, ConversionError> {
    match shape::<RawSubmit>(object(body)?, body)? {
        RawSubmit::Accepted { task_id } => Ok(SubmitReply::Accepted(TaskHandle::new(task_id))),
        RawSubmit::Rejected { detail } => Ok(SubmitReply::Rejected(detail_text(detail))),
    }
}

pub fn parse_check(body: &str) -> Result<PollResult, ConversionError> {
    match shape::<RawCheck>(object(body)?, body)? {
        RawCheck::Status { complete: true, file_id: Some(file_id), .. } => {
            Ok(PollResult::Complete { file_id })
        }
        RawCheck::Status { position: Some(position), .. } => Ok(PollResult::Pending { position }),
        RawCheck::Status { .. } => Err(unexpected(body)),
        RawCheck::Failed { detail } => Ok(PollResult::Failed {
            detail: detail_text(detail),
        }),
    }
}

pub fn parse_metadata(body: &str) -> Result<AudioMetadata, ConversionError> {
    let value = object(body)?;
    if value.get("detail").is_some() {
        return Err(server_error(value, body));
    }
    shape(value, body)
}

pub fn parse_recents(body: &str) -> Result<Vec<String>, ConversionError> {
    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Array(_)) => shape(value, body),
        Ok(value @ Value::Object(_)) => Err(server_error(value, body)),
        _ => Err(unexpected(body)),
    }
}

/// Turns the body of a failed download into an error.
pub fn parse_download_error(body: &str) -> ConversionError {
    match object(body) {
        Ok(value) => server_error(value, body),
        Err(e) => e,
    }
}
