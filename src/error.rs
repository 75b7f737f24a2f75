use std::fmt;

/// Message returned for every cross-organization access attempt.
///
/// Deliberately identical for all requests so that a denial never confirms
/// whether the other organization or resource exists.
pub const CROSS_ORGANIZATION_MESSAGE: &str = "cannot access requested organization";

/// Message returned when the caller identity cannot be resolved.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "missing/invalid credentials";

/// Errors returned by every gateway operation.
///
/// The three kinds never overlap: a request is rejected before any backend
/// call (`Validation`, `Authorization`) or a backend call failed (`Backend`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request is malformed.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationFailure),
    /// The caller may not act on the requested organization.
    #[error("access denied: {0}")]
    Authorization(#[from] AuthorizationFailure),
    /// A downstream call failed or timed out.
    #[error("{0}")]
    Backend(#[from] BackendFailure),
}

impl GatewayError {
    /// Maps the error onto the status set exposed by the transport layer.
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::Validation(_) => ErrorCode::InvalidArgument,
            GatewayError::Authorization(failure) => match failure.kind() {
                AuthorizationKind::Unauthenticated => ErrorCode::Unauthenticated,
                AuthorizationKind::CrossOrganization => ErrorCode::PermissionDenied,
            },
            GatewayError::Backend(failure) => failure.error().kind().into(),
        }
    }

    /// Returns true if the request never reached a backend.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, GatewayError::Backend(_))
    }
}

/// Status codes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed request
    InvalidArgument,
    /// No usable caller identity
    Unauthenticated,
    /// Caller is not allowed to access the target
    PermissionDenied,
    /// Target resource does not exist
    NotFound,
    /// Target resource already exists
    AlreadyExists,
    /// Backend could not be reached
    Unavailable,
    /// The request deadline expired
    DeadlineExceeded,
    /// Any other backend failure
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::Unauthenticated => "unauthenticated",
            ErrorCode::PermissionDenied => "permission_denied",
            ErrorCode::NotFound => "not_found",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::DeadlineExceeded => "deadline_exceeded",
            ErrorCode::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// A request failed a validation rule.
///
/// Carries the message of the first violated rule and, when the rule is
/// about a single field, the name of that field.
///
/// # Examples
///
/// ```
/// use gateway_core::ValidationFailure;
///
/// let failure = ValidationFailure::missing("cluster_id");
/// assert_eq!(failure.field(), Some("cluster_id"));
/// assert_eq!(failure.message(), "cluster_id cannot be empty");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationFailure {
    field: Option<&'static str>,
    message: String,
}

impl ValidationFailure {
    /// Creates a failure for a rule that concerns a specific field.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }

    /// Creates a failure for a rule spanning several fields.
    pub fn rule(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Creates the standard "`<field>` cannot be empty" failure.
    pub fn missing(field: &'static str) -> Self {
        Self::new(field, format!("{field} cannot be empty"))
    }

    /// Returns the offending field, if the rule concerns one.
    pub fn field(&self) -> Option<&'static str> {
        self.field
    }

    /// Returns the rule message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why the caller was turned away before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationKind {
    /// No identity could be resolved from the request context
    Unauthenticated,
    /// The request names an organization other than the caller's
    CrossOrganization,
}

impl fmt::Display for AuthorizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationKind::Unauthenticated => write!(f, "unauthenticated"),
            AuthorizationKind::CrossOrganization => write!(f, "cross-organization"),
        }
    }
}

/// The caller may not perform the request.
///
/// Messages are fixed strings and never mention the requested organization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthorizationFailure {
    kind: AuthorizationKind,
    message: &'static str,
}

impl AuthorizationFailure {
    /// The caller's organization differs from the requested one.
    pub fn cross_organization() -> Self {
        Self {
            kind: AuthorizationKind::CrossOrganization,
            message: CROSS_ORGANIZATION_MESSAGE,
        }
    }

    /// The request carries no usable identity.
    pub fn unauthenticated() -> Self {
        Self {
            kind: AuthorizationKind::Unauthenticated,
            message: MISSING_CREDENTIALS_MESSAGE,
        }
    }

    /// Returns the failure kind.
    pub fn kind(&self) -> AuthorizationKind {
        self.kind
    }

    /// Returns the caller-facing message.
    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Failure categories reported by backend clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorKind {
    /// Resource does not exist
    NotFound,
    /// Resource already exists
    AlreadyExists,
    /// Backend rejected the arguments
    InvalidArgument,
    /// Backend refused the operation
    PermissionDenied,
    /// Backend could not be reached
    Unavailable,
    /// The call did not finish before the request deadline
    DeadlineExceeded,
    /// Anything else
    Internal,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ErrorCode::from(*self).fmt(f)
    }
}

impl From<BackendErrorKind> for ErrorCode {
    fn from(kind: BackendErrorKind) -> Self {
        match kind {
            BackendErrorKind::NotFound => ErrorCode::NotFound,
            BackendErrorKind::AlreadyExists => ErrorCode::AlreadyExists,
            BackendErrorKind::InvalidArgument => ErrorCode::InvalidArgument,
            BackendErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            BackendErrorKind::Unavailable => ErrorCode::Unavailable,
            BackendErrorKind::DeadlineExceeded => ErrorCode::DeadlineExceeded,
            BackendErrorKind::Internal => ErrorCode::Internal,
        }
    }
}

/// An error returned by a backend client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    kind: BackendErrorKind,
    message: String,
}

impl BackendError {
    /// Creates a backend error.
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::NotFound, message)
    }

    /// Shorthand for an `Unavailable` error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Unavailable, message)
    }

    /// Shorthand for an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Internal, message)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> BackendErrorKind {
        self.kind
    }

    /// Returns the backend's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A backend call made on behalf of a gateway operation failed.
///
/// Wraps the backend's error unchanged, tagged with the operation name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {error}")]
pub struct BackendFailure {
    operation: &'static str,
    #[source]
    error: BackendError,
}

impl BackendFailure {
    /// Wraps a backend error for the named operation.
    pub fn new(operation: &'static str, error: BackendError) -> Self {
        Self { operation, error }
    }

    /// The request deadline expired before the operation completed.
    pub fn deadline_exceeded(operation: &'static str) -> Self {
        Self::new(
            operation,
            BackendError::new(
                BackendErrorKind::DeadlineExceeded,
                "request deadline expired before the backend answered",
            ),
        )
    }

    /// Returns the failed operation's name.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Returns the underlying backend error.
    pub fn error(&self) -> &BackendError {
        &self.error
    }

    /// Returns true if the failure is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        self.error.kind() == BackendErrorKind::DeadlineExceeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_the_field() {
        let failure = ValidationFailure::missing("organization_id");
        assert_eq!(failure.to_string(), "organization_id cannot be empty");
        assert_eq!(failure.field(), Some("organization_id"));
    }

    #[test]
    fn cross_organization_message_is_generic() {
        let failure = AuthorizationFailure::cross_organization();
        assert_eq!(failure.message(), "cannot access requested organization");
        assert_eq!(failure.kind(), AuthorizationKind::CrossOrganization);
    }

    #[test]
    fn backend_failure_carries_operation_name() {
        let failure =
            BackendFailure::new("clusters.list", BackendError::unavailable("connection refused"));
        let text = failure.to_string();
        assert!(text.starts_with("clusters.list failed"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn codes_follow_failure_kind() {
        let validation: GatewayError = ValidationFailure::missing("email").into();
        assert_eq!(validation.code(), ErrorCode::InvalidArgument);
        assert!(validation.is_rejection());

        let denied: GatewayError = AuthorizationFailure::cross_organization().into();
        assert_eq!(denied.code(), ErrorCode::PermissionDenied);

        let anonymous: GatewayError = AuthorizationFailure::unauthenticated().into();
        assert_eq!(anonymous.code(), ErrorCode::Unauthenticated);

        let timeout: GatewayError = BackendFailure::deadline_exceeded("nodes.list").into();
        assert_eq!(timeout.code(), ErrorCode::DeadlineExceeded);
        assert!(!timeout.is_rejection());
    }
}
