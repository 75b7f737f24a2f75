use std::collections::BTreeSet;

/// The resolved, trusted identity of the caller.
///
/// Built once per request by a [`ResolveIdentity`](crate::handler::ResolveIdentity)
/// implementation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    organization_id: String,
    user_id: String,
    roles: BTreeSet<String>,
}

impl CallerIdentity {
    /// Creates an identity for a user of the given organization.
    pub fn new(organization_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            user_id: user_id.into(),
            roles: BTreeSet::new(),
        }
    }

    /// Adds roles to the identity.
    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// The organization the caller belongs to.
    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    /// The caller's user identifier.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The caller's roles.
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Returns true if the caller holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
