//! Type-state markers for the request pipeline.
//!
//! A [`Ctx`](crate::Ctx) moves through these states in a fixed order:
//!
//! ```text
//! Ctx<Received> --identify--> Ctx<Identified> --authorize--> Ctx<Authorized>
//! ```
//!
//! The identified and authorized states carry the caller identity, so an
//! identity can only be read once it has been resolved.

use crate::identity::CallerIdentity;

/// A request that has not been attributed to a caller yet.
///
/// Only the pipeline creates this marker:
///
/// ```compile_fail
/// let forged = gateway_core::Received::new();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Received {
    _private: (),
}

impl Received {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

/// The caller identity has been resolved but not checked against the request.
#[derive(Debug, Clone)]
pub struct Identified {
    pub(crate) identity: CallerIdentity,
}

/// The caller has been cleared to act on the requested organization.
///
/// The identity field is crate-private, so the marker cannot be built
/// around an arbitrary caller:
///
/// ```compile_fail
/// use gateway_core::{Authorized, CallerIdentity};
///
/// let forged = Authorized {
///     identity: CallerIdentity::new("org-1", "alice@example.com"),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Authorized {
    pub(crate) identity: CallerIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn received_marker_is_zero_sized() {
        assert_eq!(std::mem::size_of::<Received>(), 0);
        let _received = Received::new();
    }
}
