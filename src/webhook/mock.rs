use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ChatRequest, DispatchError, Webhook};

/// A scripted webhook for tests. Returns pre-defined replies in order and
/// remembers every request it was sent.
pub struct MockWebhook {
    replies: Vec<Result<String, DispatchError>>,
    index: AtomicUsize,
    seen: Mutex<Vec<ChatRequest>>,
}

impl MockWebhook {
    pub fn new(replies: Vec<Result<String, DispatchError>>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A webhook that answers every message with the same text.
    pub fn answering(answer: &str, times: usize) -> Self {
        Self::new(vec![Ok(answer.to_string()); times])
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Webhook for MockWebhook {
    async fn send(&self, request: &ChatRequest) -> Result<String, DispatchError> {
        self.seen.lock().unwrap().push(request.clone());
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        self.replies.get(i).cloned().unwrap_or_else(|| {
            Err(DispatchError::Connection(format!(
                "mock webhook: no more replies (called {} times)",
                i + 1
            )))
        })
    }
}
