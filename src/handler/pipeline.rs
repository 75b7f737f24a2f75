use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::context::Ctx;
use crate::entities::Scoped;
use crate::error::{GatewayError, ValidationFailure};
use crate::logging::OpLog;
use crate::validate::{validate, Validate};
use crate::verified::Verified;

use super::{RequestContext, ResolveIdentity};

/// The admission steps every operation runs before touching a backend.
///
/// Order is fixed: identity, organization guard, validation. The first
/// failing step ends the request. A request aimed at another organization is
/// therefore refused before its payload is inspected.
#[derive(Clone)]
pub struct Pipeline {
    resolver: Arc<dyn ResolveIdentity>,
    default_timeout: Option<Duration>,
}

impl Pipeline {
    /// Creates a pipeline. `default_timeout` bounds requests whose transport
    /// gave no deadline.
    pub fn new(resolver: Arc<dyn ResolveIdentity>, default_timeout: Option<Duration>) -> Self {
        Self {
            resolver,
            default_timeout,
        }
    }

    /// Admits `payload` for `operation`.
    ///
    /// # Errors
    ///
    /// `Authorization` if the caller is unknown or targets another
    /// organization; `Validation` if the payload breaks a rule.
    pub fn admit<R>(
        &self,
        operation: &'static str,
        request: &RequestContext,
        payload: R,
    ) -> Result<(Ctx, Verified<R>), GatewayError>
    where
        R: Scoped + Validate,
    {
        self.admit_with(operation, request, || Ok(payload))
    }

    /// Admits a payload that still has to be decoded.
    ///
    /// `decode` runs once the caller is identified, so an unknown caller
    /// learns nothing about the payload. The organization guard then checks
    /// the decoded request before any validation rule runs.
    ///
    /// # Errors
    ///
    /// As [`admit`](Self::admit); a decoding failure is a `Validation` error
    /// reported after identity and before the guard.
    pub fn admit_with<R, F>(
        &self,
        operation: &'static str,
        request: &RequestContext,
        decode: F,
    ) -> Result<(Ctx, Verified<R>), GatewayError>
    where
        R: Scoped + Validate,
        F: FnOnce() -> Result<R, ValidationFailure>,
    {
        let log = OpLog::new(request.request_id(), operation);

        let ctx = Ctx::received(request, operation, self.default_timeout)
            .identify(self.resolver.as_ref(), request)
            .map_err(|failure| {
                log.warn(format_args!("rejected: {failure}"));
                failure
            })?;

        let payload = decode().map_err(|failure| {
            log.info(format_args!("undecodable payload: {failure}"));
            failure
        })?;

        let caller = ctx.identity().clone();
        let ctx = ctx.authorize(payload.organization_id()).map_err(|failure| {
            log.warn(format_args!(
                "rejected: {failure} (caller {} of {})",
                caller.user_id(),
                caller.organization_id()
            ));
            failure
        })?;

        let payload = validate(payload).map_err(|failure| {
            log.info(format_args!("rejected: {failure}"));
            failure
        })?;

        log.debug(format_args!("admitted"));
        Ok((ctx, payload))
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClusterId, LabelOp, UpdateClusterRequest};
    use crate::error::{AuthorizationKind, ErrorCode};
    use crate::handler::MetadataIdentityResolver;

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(MetadataIdentityResolver::default()), None)
    }

    fn caller(org: &str) -> RequestContext {
        RequestContext::new("req-1")
            .with_metadata("organization_id", org)
            .with_metadata("user_id", "alice@example.com")
    }

    #[test]
    fn admits_own_organization() {
        let (ctx, payload) = pipeline()
            .admit("clusters.info", &caller("org-1"), ClusterId::new("org-1", "c1"))
            .expect("admitted");

        assert_eq!(ctx.organization_id(), "org-1");
        assert_eq!(ctx.operation(), "clusters.info");
        assert_eq!(payload.as_ref().cluster_id, "c1");
    }

    #[test]
    fn guard_runs_before_validation() {
        // Invalid payload for a foreign organization: the guard answers.
        let error = pipeline()
            .admit("clusters.info", &caller("org-1"), ClusterId::new("org-2", ""))
            .unwrap_err();

        match error {
            GatewayError::Authorization(failure) => {
                assert_eq!(failure.kind(), AuthorizationKind::CrossOrganization)
            }
            other => panic!("expected authorization failure, got {other:?}"),
        }
    }

    #[test]
    fn identity_runs_before_guard() {
        let anonymous = RequestContext::new("req-anon");

        let error = pipeline()
            .admit("clusters.info", &anonymous, ClusterId::new("org-2", "c1"))
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::Unauthenticated);
    }

    #[test]
    fn validation_failure_names_the_field() {
        let request = UpdateClusterRequest {
            organization_id: "org-1".to_string(),
            cluster_id: "c1".to_string(),
            label_op: LabelOp::Add,
            ..UpdateClusterRequest::default()
        };

        let error = pipeline()
            .admit("clusters.update", &caller("org-1"), request)
            .unwrap_err();

        match error {
            GatewayError::Validation(failure) => assert_eq!(failure.field(), Some("labels")),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn decoding_waits_for_identity() {
        let mut decoded = false;

        let error = pipeline()
            .admit_with("clusters.info", &RequestContext::new("req-1"), || {
                decoded = true;
                Ok(ClusterId::new("org-1", "c1"))
            })
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::Unauthenticated);
        assert!(!decoded);
    }

    #[test]
    fn decoding_failure_is_a_validation_error() {
        let error = pipeline()
            .admit_with::<ClusterId, _>("clusters.info", &caller("org-1"), || {
                Err(ValidationFailure::rule("invalid payload"))
            })
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::InvalidArgument);
    }
}
