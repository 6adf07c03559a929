pub mod http;
pub mod schema;
pub mod scrub;
pub mod wire;

pub use http::HttpTransport;
pub use schema::{AnswerField, extract_answer, interpret_response};
pub use scrub::{redact_url, scrub_secret_patterns};
pub use wire::WireFormat;

use crate::conversation::Message;
use crate::error::TransportError;
use async_trait::async_trait;

/// Everything one send carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub context: String,
    pub history: Vec<Message>,
}

/// One request per call: no retry, no cancellation. Every failure comes back
/// as a [`TransportError`]; implementations must not panic.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    fn name(&self) -> &str;

    /// Answer text, possibly empty when the endpoint had nothing to say.
    async fn send(&self, request: &ChatRequest) -> Result<String, TransportError>;
}
