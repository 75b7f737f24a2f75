//! Caller identity resolution.

use crate::config::IdentityConfig;
use crate::error::AuthorizationFailure;
use crate::identity::CallerIdentity;

use super::RequestContext;

/// Produces the authenticated caller of a request.
///
/// Implementations must fail closed: a request without usable credentials
/// yields [`AuthorizationFailure::unauthenticated`], never a default
/// identity.
pub trait ResolveIdentity: Send + Sync {
    /// Resolves the caller of `request`.
    ///
    /// # Errors
    ///
    /// Returns an `Unauthenticated` failure when the caller cannot be
    /// established.
    fn resolve_identity(&self, request: &RequestContext) -> Result<CallerIdentity, AuthorizationFailure>;
}

/// Reads the caller from request metadata placed there by an upstream
/// authenticator (for example a JWT interceptor).
///
/// Organization and user must both be present and non-empty. Roles are an
/// optional comma-separated list.
#[derive(Debug, Clone, Default)]
pub struct MetadataIdentityResolver {
    keys: IdentityConfig,
}

impl MetadataIdentityResolver {
    /// Uses the metadata key names from `config`.
    pub fn from_config(config: &IdentityConfig) -> Self {
        Self {
            keys: config.clone(),
        }
    }

    fn required<'r>(&self, request: &'r RequestContext, key: &str) -> Result<&'r str, AuthorizationFailure> {
        request
            .metadata(key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(AuthorizationFailure::unauthenticated)
    }
}

impl ResolveIdentity for MetadataIdentityResolver {
    fn resolve_identity(&self, request: &RequestContext) -> Result<CallerIdentity, AuthorizationFailure> {
        let organization_id = self.required(request, &self.keys.organization_key)?;
        let user_id = self.required(request, &self.keys.user_key)?;

        let roles = request
            .metadata(&self.keys.roles_key)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty());

        Ok(CallerIdentity::new(organization_id, user_id).with_roles(roles))
    }
}
