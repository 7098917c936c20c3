use halo_core::{HaloError, Llm, LlmRequest, LlmResponse, LlmResponseStream, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Reply {
    Response(LlmResponse),
    Error(String),
}

/// Scripted model for tests.
///
/// Each call first checks the `when` rules against the request text, then
/// pops the next queued reply, then falls back to the default reply. Every
/// request is recorded.
pub struct MockLlm {
    name: String,
    rules: Vec<(String, Reply)>,
    queue: Mutex<VecDeque<Reply>>,
    default: Option<Reply>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            queue: Mutex::new(VecDeque::new()),
            default: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, response: LlmResponse) -> Self {
        self.push(Reply::Response(response));
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(LlmResponse::text(text))
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(Reply::Error(message.into()));
        self
    }

    /// Answer with `text` whenever any request message contains `needle`.
    pub fn when(mut self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Reply::Response(LlmResponse::text(text))));
        self
    }

    pub fn when_error(mut self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Reply::Error(message.into())));
        self
    }

    pub fn with_default(mut self, text: impl Into<String>) -> Self {
        self.default = Some(Reply::Response(LlmResponse::text(text)));
        self
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(reply);
        }
    }

    fn next_reply(&self, req: &LlmRequest) -> Option<Reply> {
        let haystack: String =
            req.contents.iter().map(|c| c.text()).collect::<Vec<_>>().join("\n");
        if let Some((_, reply)) = self.rules.iter().find(|(needle, _)| haystack.contains(needle)) {
            return Some(reply.clone());
        }
        let queued = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        queued.or_else(|| self.default.clone())
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, req: LlmRequest, _stream: bool) -> Result<LlmResponseStream> {
        let reply = self.next_reply(&req);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(req);
        }
        match reply {
            Some(Reply::Response(response)) => {
                let stream = async_stream::stream! {
                    yield Ok(response);
                };
                Ok(Box::pin(stream))
            }
            Some(Reply::Error(message)) => Err(HaloError::Model(message)),
            None => Err(HaloError::Model(format!("mock '{}' has no scripted reply", self.name))),
        }
    }
}
