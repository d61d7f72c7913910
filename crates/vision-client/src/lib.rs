//! Vision model client
//!
//! Sends an advertisement image to a multimodal completion service and
//! returns the reply's content blocks. Provides:
//!
//! - [`VisionModel`] - the seam the HTTP endpoint depends on
//! - [`AnthropicClient`] - Anthropic Messages API implementation
//! - [`MockVisionModel`] - canned replies for tests and local runs
//! - [`deadline`] - first-to-settle race between a request and a timer
//!
//! Requests are never retried. A timeout or an upstream error is returned
//! to the caller as a [`ClientError`].

pub mod anthropic;
pub mod content;
pub mod deadline;
pub mod error;
pub mod mock;
pub mod prompt;

use async_trait::async_trait;

pub use anthropic::AnthropicClient;
pub use content::{first_text, ContentBlock, ImageInput};
pub use deadline::{first_settled, with_deadline, Elapsed};
pub use error::ClientError;
pub use mock::MockVisionModel;

/// A model that can review an advertisement image
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Provider name (e.g., "anthropic", "mock")
    fn name(&self) -> &str;

    /// Send the image with the fixed review prompt and return the reply blocks
    async fn analyze(&self, image: &ImageInput) -> Result<Vec<ContentBlock>, ClientError>;
}
