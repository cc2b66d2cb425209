//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use llmwire_core::http::{Header, HttpTransport};
use llmwire_core::providers::{ProviderError, ProviderResponse, ProviderResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// What a vendor client handed to the transport
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<Header>,
    pub body: String,
    pub sse: bool,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }
}

/// Transport double that records requests and replays scripted outcomes.
/// Once the script runs out, the fallback response is returned.
pub struct RecordingTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    script: Mutex<VecDeque<Result<(u16, String), String>>>,
    fallback: (u16, String),
}

impl RecordingTransport {
    pub fn ok(status: u16, body: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            fallback: (status, body.to_string()),
        }
    }

    /// Queue a response
    pub fn then_status(self, status: u16, body: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok((status, body.to_string())));
        self
    }

    /// Queue a network failure
    pub fn then_network_error(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn record(
        &self,
        url: &str,
        headers: &[Header],
        body: String,
        sse: bool,
    ) -> ProviderResult<ProviderResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.to_vec(),
            body,
            sse,
        });
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok((status, body))) => Ok(ProviderResponse::new(status, body)),
            Some(Err(message)) => Err(ProviderError::Network(message)),
            None => Ok(ProviderResponse::new(
                self.fallback.0,
                self.fallback.1.clone(),
            )),
        }
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn post(
        &self,
        url: &str,
        headers: &[Header],
        body: String,
    ) -> ProviderResult<ProviderResponse> {
        self.record(url, headers, body, false)
    }

    async fn post_sse(
        &self,
        url: &str,
        headers: &[Header],
        body: String,
    ) -> ProviderResult<ProviderResponse> {
        self.record(url, headers, body, true)
    }
}
