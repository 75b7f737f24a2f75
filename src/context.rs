use std::time::Duration;

use tokio::time::Instant;

use crate::error::AuthorizationFailure;
use crate::guard;
use crate::handler::{RequestContext, ResolveIdentity};
use crate::identity::CallerIdentity;
use crate::logging::OpLog;
use crate::state::{Authorized, Identified, Received};

/// Per-request execution context.
///
/// `Ctx<S>` is generic over the pipeline state:
/// - `Ctx<Received>`: request id, operation and deadline only
/// - `Ctx<Identified>`: plus the resolved caller identity
/// - `Ctx<Authorized>`: the identity has been checked against the request
///
/// Managers only accept `&Ctx<Authorized>`, so a backend call cannot be made
/// for a request that skipped identity resolution or the organization guard.
///
/// `Ctx` cannot be constructed by user code; the handler pipeline builds it
/// from a [`RequestContext`].
///
/// ```compile_fail
/// use gateway_core::handler::RequestContext;
/// use gateway_core::Ctx;
///
/// let request = RequestContext::new("req-1");
/// let ctx = Ctx::received(&request, "clusters.list", None);
/// ```
#[derive(Debug, Clone)]
pub struct Ctx<S = Authorized> {
    request_id: String,
    operation: &'static str,
    deadline: Option<Instant>,
    state: S,
}

// ============================================================================
// Shared methods (available on all states)
// ============================================================================

impl<S> Ctx<S> {
    /// Returns the request id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the name of the operation being served.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Returns the instant by which every backend call must complete.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns a logger stamped with the request id and operation.
    pub fn log(&self) -> OpLog<'_> {
        OpLog::new(&self.request_id, self.operation)
    }
}

// ============================================================================
// Ctx<Received>
// ============================================================================

impl Ctx<Received> {
    /// Starts a context for `operation`.
    ///
    /// The transport deadline wins; without one, `default_timeout` from now
    /// is used. With neither, backend calls are not time-bounded.
    pub(crate) fn received(
        request: &RequestContext,
        operation: &'static str,
        default_timeout: Option<Duration>,
    ) -> Self {
        let deadline = request
            .deadline()
            .or_else(|| default_timeout.map(|timeout| Instant::now() + timeout));

        Self {
            request_id: request.request_id().to_string(),
            operation,
            deadline,
            state: Received::new(),
        }
    }

    /// Resolves the caller identity from the request context.
    ///
    /// # Errors
    ///
    /// Returns an `Unauthenticated` failure if the resolver cannot produce an
    /// identity. There is no anonymous fallback.
    pub fn identify(
        self,
        resolver: &dyn ResolveIdentity,
        request: &RequestContext,
    ) -> Result<Ctx<Identified>, AuthorizationFailure> {
        let identity = resolver.resolve_identity(request)?;

        Ok(Ctx {
            request_id: self.request_id,
            operation: self.operation,
            deadline: self.deadline,
            state: Identified { identity },
        })
    }
}

// ============================================================================
// Ctx<Identified>
// ============================================================================

impl Ctx<Identified> {
    /// Returns the resolved caller identity.
    pub fn identity(&self) -> &CallerIdentity {
        &self.state.identity
    }

    /// Clears the context for the organization named by the request.
    ///
    /// # Errors
    ///
    /// Returns a `CrossOrganization` failure if `requested_organization` is
    /// not the caller's own.
    pub fn authorize(
        self,
        requested_organization: &str,
    ) -> Result<Ctx<Authorized>, AuthorizationFailure> {
        guard::check_organization(&self.state.identity, requested_organization)?;

        Ok(Ctx {
            request_id: self.request_id,
            operation: self.operation,
            deadline: self.deadline,
            state: Authorized {
                identity: self.state.identity,
            },
        })
    }
}

// ============================================================================
// Ctx<Authorized>
// ============================================================================

impl Ctx<Authorized> {
    #[cfg(test)]
    pub(crate) fn new_authorized(
        request_id: impl Into<String>,
        operation: &'static str,
        identity: CallerIdentity,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            operation,
            deadline,
            state: Authorized { identity },
        }
    }

    /// Returns the caller identity.
    pub fn identity(&self) -> &CallerIdentity {
        &self.state.identity
    }

    /// Returns the caller's organization, which is also the request's.
    pub fn organization_id(&self) -> &str {
        self.state.identity.organization_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthorizationKind;
    use crate::handler::MetadataIdentityResolver;

    fn request_for(org: &str) -> RequestContext {
        let mut request = RequestContext::new("req-1");
        request.insert_metadata("organization_id", org);
        request.insert_metadata("user_id", "alice@example.com");
        request
    }

    #[test]
    fn transitions_carry_request_id_and_operation() {
        let request = request_for("org-1");
        let ctx = Ctx::received(&request, "clusters.list", None)
            .identify(&MetadataIdentityResolver::default(), &request)
            .expect("identity resolves")
            .authorize("org-1")
            .expect("same organization");

        assert_eq!(ctx.request_id(), "req-1");
        assert_eq!(ctx.operation(), "clusters.list");
        assert_eq!(ctx.organization_id(), "org-1");
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn authorize_rejects_foreign_organization() {
        let request = request_for("org-1");
        let result = Ctx::received(&request, "users.remove", None)
            .identify(&MetadataIdentityResolver::default(), &request)
            .expect("identity resolves")
            .authorize("org-2");

        assert_eq!(
            result.unwrap_err().kind(),
            AuthorizationKind::CrossOrganization
        );
    }

    #[test]
    fn identify_fails_closed_without_credentials() {
        let request = RequestContext::new("req-anon");
        let result = Ctx::received(&request, "users.list", None)
            .identify(&MetadataIdentityResolver::default(), &request);

        assert_eq!(result.unwrap_err().kind(), AuthorizationKind::Unauthenticated);
    }

    #[tokio::test]
    async fn default_timeout_applies_without_transport_deadline() {
        let request = request_for("org-1");
        let before = Instant::now();
        let ctx = Ctx::received(&request, "nodes.list", Some(Duration::from_secs(5)));

        let deadline = ctx.deadline().expect("deadline set");
        assert!(deadline >= before + Duration::from_secs(5));
    }

    #[tokio::test]
    async fn transport_deadline_wins_over_default() {
        let deadline = Instant::now() + Duration::from_millis(250);
        let request = request_for("org-1").with_deadline(deadline);
        let ctx = Ctx::received(&request, "nodes.list", Some(Duration::from_secs(30)));

        assert_eq!(ctx.deadline(), Some(deadline));
    }
}
