#![allow(dead_code)]

use async_trait::async_trait;
use nightconv::api::{ConversionRequest, OutputFormat};
use nightconv::clock::Sleeper;
use nightconv::transport::Transport;
use nightconv::ConversionError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Everything the client did, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    Submit { path: String, format: String, pitch: f64, tempo: f64 },
    Get(String),
    Sleep(Duration),
    Status(String),
}

pub type TraceLog = Arc<Mutex<Vec<Trace>>>;

pub struct ScriptedTransport {
    log: TraceLog,
    replies: Mutex<VecDeque<Result<String, ConversionError>>>,
    downloads: Mutex<VecDeque<Result<Vec<u8>, ConversionError>>>,
}

impl ScriptedTransport {
    pub fn new(log: TraceLog, replies: Vec<&str>) -> Self {
        Self {
            log,
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            downloads: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_results(log: TraceLog, replies: Vec<Result<String, ConversionError>>) -> Self {
        Self {
            log,
            replies: Mutex::new(replies.into_iter().collect()),
            downloads: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push_download(&self, result: Result<Vec<u8>, ConversionError>) {
        self.downloads.lock().unwrap().push_back(result);
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    fn next(&self) -> Result<String, ConversionError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("client issued more requests than scripted")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn submit(&self, path: &str, request: &ConversionRequest) -> Result<String, ConversionError> {
        self.log.lock().unwrap().push(Trace::Submit {
            path: path.to_string(),
            format: request.format().to_string(),
            pitch: request.pitch_scale(),
            tempo: request.tempo_scale(),
        });
        self.next()
    }

    async fn get_text(&self, path: &str) -> Result<String, ConversionError> {
        self.log.lock().unwrap().push(Trace::Get(path.to_string()));
        self.next()
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ConversionError> {
        self.log.lock().unwrap().push(Trace::Get(path.to_string()));
        self.downloads
            .lock()
            .unwrap()
            .pop_front()
            .expect("no download scripted")
    }
}

/// Records requested delays and returns immediately.
pub struct RecordingSleeper {
    log: TraceLog,
}

impl RecordingSleeper {
    pub fn new(log: TraceLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.log.lock().unwrap().push(Trace::Sleep(duration));
    }
}

pub fn new_log() -> TraceLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn sample_request() -> ConversionRequest {
    ConversionRequest::new("song.mp3", OutputFormat::Ogg, 1.25, 1.1, vec![0u8; 64])
}

pub fn gets(log: &TraceLog) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|t| match t {
            Trace::Get(p) => Some(p.clone()),
            _ => None,
        })
        .collect()
}

pub fn statuses(log: &TraceLog) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|t| match t {
            Trace::Status(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}
