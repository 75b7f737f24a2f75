//! Organization scope enforcement.
//!
//! The guard is the only place where cross-tenant access is decided. It runs
//! after the caller identity is resolved and before the request is validated,
//! so well-formed and malformed requests for a foreign organization are
//! rejected the same way.

use crate::error::AuthorizationFailure;
use crate::identity::CallerIdentity;

/// Checks that `requested` names the caller's own organization.
///
/// The comparison is exact: no trimming or case folding. An empty requested
/// organization never matches a resolved identity.
///
/// # Errors
///
/// Returns [`AuthorizationFailure::cross_organization`] on any mismatch.
///
/// # Examples
///
/// ```
/// use gateway_core::{guard, CallerIdentity};
///
/// let caller = CallerIdentity::new("org-1", "alice@example.com");
/// assert!(guard::check_organization(&caller, "org-1").is_ok());
/// assert!(guard::check_organization(&caller, "org-2").is_err());
/// ```
pub fn check_organization(
    identity: &CallerIdentity,
    requested: &str,
) -> Result<(), AuthorizationFailure> {
    if identity.organization_id() == requested {
        Ok(())
    } else {
        Err(AuthorizationFailure::cross_organization())
    }
}
