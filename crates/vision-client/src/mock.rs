//! Canned vision model for tests and local runs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::content::{ContentBlock, ImageInput};
use crate::error::ClientError;
use crate::VisionModel;

/// A vision model that returns a canned reply.
pub struct MockVisionModel {
    outcome: Result<Vec<ContentBlock>, ClientError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockVisionModel {
    /// Reply with a single text block.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_blocks(vec![ContentBlock::text(text)])
    }

    pub fn with_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            outcome: Ok(blocks),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call with `error`.
    pub fn failing(error: ClientError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering, to exercise deadlines.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `analyze` calls started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionModel for MockVisionModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, _image: &ImageInput) -> Result<Vec<ContentBlock>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}
