use serde::{Deserialize, Serialize};

use super::impl_scoped;
use crate::secret::Secret;

/// Identifies a user by email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserId {
    pub organization_id: String,
    pub email: String,
}

impl UserId {
    /// Creates a user id.
    pub fn new(organization_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            email: email.into(),
        }
    }
}

/// Creates a user with an initial role.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddUserRequest {
    pub organization_id: String,
    pub email: String,
    pub password: Secret<String>,
    pub name: String,
    pub role_name: String,
}

/// A user of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub organization_id: String,
    pub email: String,
    pub name: String,
    pub role_id: String,
    pub role_name: String,
}

/// Users of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<User>,
}

/// Changes profile fields of a user. `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub organization_id: String,
    pub email: String,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Replaces a user's password. The current one must be supplied.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordRequest {
    pub organization_id: String,
    pub email: String,
    pub password: Secret<String>,
    pub new_password: Secret<String>,
}

/// Gives a user a different role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignRoleRequest {
    pub organization_id: String,
    pub email: String,
    pub role_id: String,
}

/// A role users can be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub organization_id: String,
    pub role_id: String,
    pub name: String,
    pub description: String,
    /// Platform roles cannot be assigned through the public API
    pub internal: bool,
}

/// Roles of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleList {
    pub roles: Vec<Role>,
}

impl_scoped!(
    UserId,
    AddUserRequest,
    UpdateUserRequest,
    ChangePasswordRequest,
    AssignRoleRequest,
);
