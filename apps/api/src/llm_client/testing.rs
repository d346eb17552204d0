//! Scripted transport for exercising the client and pipeline without a network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{LlmError, LlmRequest, LlmTransport};

/// Owned copy of a request seen by `ScriptedTransport`.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub prompt: String,
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Replays queued responses in order and records every request it receives.
/// Once the script runs dry every call fails with a non-transient 400.
pub struct ScriptedTransport {
    configured: bool,
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            configured: false,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmTransport for ScriptedTransport {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, request: &LlmRequest<'_>) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            prompt: request.prompt.to_string(),
            system: request.system.map(str::to_string),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::api(400, "script exhausted")))
    }
}

impl LlmError {
    pub fn api(status: u16, message: &str) -> Self {
        LlmError::Api {
            status,
            message: message.to_string(),
        }
    }
}
