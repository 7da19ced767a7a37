//! Fakes for exercising the pipeline without network or wall-clock waits
//!
//! Compiled for tests and behind the `test-util` feature for dependent crates.

use async_trait::async_trait;
use docbrief_common::{ApiError, ApiFailure};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::llm_trait::CompletionClient;
use crate::sleeper::Sleeper;
use crate::types::ChatMessage;

/// Something observed by a fake, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Call(Vec<ChatMessage>),
    Sleep(Duration),
}

/// Shared timeline between a fake client and a fake sleeper
pub type EventLog = Arc<Mutex<Vec<Event>>>;

type Responder = dyn Fn(usize, &[ChatMessage]) -> Result<String, ApiError> + Send + Sync;

/// Completion client that answers from a script and records every request
pub struct ScriptedClient {
    responder: Box<Responder>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    log: Option<EventLog>,
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::from_fn(|_, _| Ok("ok".to_string()))
    }
}

impl ScriptedClient {
    /// Reply with `f(call_index, messages)`
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(usize, &[ChatMessage]) -> Result<String, ApiError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(f),
            requests: Mutex::new(Vec::new()),
            log: None,
        }
    }

    /// Reply with the given results in order; calls past the end fail
    pub fn with_replies(replies: Vec<Result<String, ApiError>>) -> Self {
        let replies = Mutex::new(VecDeque::from(replies));
        Self::from_fn(move |_, _| {
            replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ApiError::Failed {
                        attempts: 1,
                        cause: ApiFailure::Network("script exhausted".to_string()),
                    })
                })
        })
    }

    /// Also append each call to `log`
    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ApiError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(messages.to_vec());
            requests.len() - 1
        };
        if let Some(log) = &self.log {
            log.lock().unwrap().push(Event::Call(messages.to_vec()));
        }
        (self.responder)(index, messages)
    }
}

/// Records requested waits without blocking
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
    log: Option<EventLog>,
}

impl RecordingSleeper {
    /// Also append each wait to `log`
    pub fn with_log(log: EventLog) -> Self {
        Self {
            waits: Arc::default(),
            log: Some(log),
        }
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
        if let Some(log) = &self.log {
            log.lock().unwrap().push(Event::Sleep(duration));
        }
    }
}
