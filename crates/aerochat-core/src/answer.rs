//! Remote answer service trait.

use crate::error::Result;
use async_trait::async_trait;

/// The retrieval-augmented answer backend, as seen by the session layer.
///
/// The service is a black box that may internally perform retrieval-augmented
/// generation; the session logic only needs this contract. Per-domain routing
/// (domain tag to backend handle) is configuration inside the implementation,
/// not session logic.
///
/// Implementations must enforce a bounded timeout so an unresponsive backend
/// resolves to a failure rather than hanging an in-flight send.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Asks the backend routed for `domain` to answer `question`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteAnswer` when the call fails or times out.
    async fn ask(&self, domain: &str, question: &str) -> Result<String>;
}
