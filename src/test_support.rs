//! In-memory stand-ins for the Shortening API and the clipboard.

use crate::api_client::{LookupResponse, ShortenApi, ShortenRequest, ShortenResponse};
use crate::clipboard::ClipboardSink;
use crate::errors::ApiError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replies with queued results in order, recording every request
#[derive(Default)]
pub struct ScriptedApi {
    pub shorten_results: Mutex<VecDeque<Result<ShortenResponse, ApiError>>>,
    pub lookup_results: Mutex<VecDeque<Result<LookupResponse, ApiError>>>,
    pub requests: Mutex<Vec<ShortenRequest>>,
    pub lookups: Mutex<Vec<String>>,
    /// Never answer a shorten request
    pub hang: bool,
}

impl ScriptedApi {
    pub fn replying(results: Vec<Result<ShortenResponse, ApiError>>) -> Self {
        Self {
            shorten_results: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    pub fn with_lookup(self, result: Result<LookupResponse, ApiError>) -> Self {
        self.lookup_results.lock().unwrap().push_back(result);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ShortenApi for ScriptedApi {
    async fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.shorten_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport("no scripted response")))
    }

    async fn lookup(&self, short_id: &str) -> Result<LookupResponse, ApiError> {
        self.lookups.lock().unwrap().push(short_id.to_string());
        self.lookup_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport("no scripted response")))
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub copies: Vec<String>,
    pub fail: bool,
}

impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("no clipboard");
        }
        self.copies.push(text.to_string());
        Ok(())
    }
}

pub fn short(short_url: &str) -> Result<ShortenResponse, ApiError> {
    Ok(ShortenResponse {
        short_url: short_url.to_string(),
    })
}
