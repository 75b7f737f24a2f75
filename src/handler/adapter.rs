//! Transport-neutral view of an incoming call.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// What the transport layer knows about a request before the gateway looks
/// at its payload: an id, the call metadata and an optional deadline.
///
/// Transport integrations (gRPC interceptors, HTTP extractors) build one per
/// call. Metadata values are untrusted; only a [`ResolveIdentity`]
/// implementation interprets them.
///
/// # Examples
///
/// ```
/// use gateway_core::handler::RequestContext;
///
/// let request = RequestContext::new("req-7")
///     .with_metadata("organization_id", "org-1")
///     .with_metadata("user_id", "alice@example.com");
///
/// assert_eq!(request.request_id(), "req-7");
/// assert_eq!(request.metadata("organization_id"), Some("org-1"));
/// assert!(request.deadline().is_none());
/// ```
///
/// [`ResolveIdentity`]: super::ResolveIdentity
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    metadata: HashMap<String, String>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context with the transport's request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            metadata: HashMap::new(),
            deadline: None,
        }
    }

    /// Creates a context with a fresh random request id, for transports that
    /// do not carry one.
    pub fn generated() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Adds a metadata entry, replacing any previous value for `key`.
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Builder form of [`insert_metadata`](Self::insert_metadata).
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_metadata(key, value);
        self
    }

    /// Sets the instant by which the request must complete.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the request id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the metadata value for `key`.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Returns the transport deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = RequestContext::generated();
        let b = RequestContext::generated();

        assert_ne!(a.request_id(), b.request_id());
        assert!(Uuid::parse_str(a.request_id()).is_ok());
    }

    #[test]
    fn later_metadata_replaces_earlier() {
        let mut request = RequestContext::new("req-1").with_metadata("roles", "Owner");
        request.insert_metadata("roles", "Operator");

        assert_eq!(request.metadata("roles"), Some("Operator"));
        assert_eq!(request.metadata("missing"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_relative_to_now() {
        let now = Instant::now();
        let request = RequestContext::new("req-1").with_timeout(Duration::from_secs(2));

        assert_eq!(request.deadline(), Some(now + Duration::from_secs(2)));
    }
}
